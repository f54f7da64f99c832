// ── Command API ──
//
// Every write the front end can request, as one enum. The controller
// routes each variant to the matching mutation.

use std::sync::Arc;

use roombook_types::{Booking, NewBookingPayload, Room, RoomFormPayload};

/// All write operations against the booking service.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Room operations ──────────────────────────────────────────────
    CreateRoom(RoomFormPayload),
    UpdateRoom {
        id: String,
        payload: RoomFormPayload,
    },
    DeleteRoom {
        id: String,
    },

    // ── Booking operations ───────────────────────────────────────────
    CreateBooking(NewBookingPayload),
    UpdateBooking {
        id: String,
        payload: NewBookingPayload,
    },
    CancelBooking {
        id: String,
    },
    DeleteBooking {
        id: String,
    },

    // ── Data ─────────────────────────────────────────────────────────
    Reload,
}

/// What a successful command produced.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Ok,
    Room(Arc<Room>),
    Booking(Arc<Booking>),
}
