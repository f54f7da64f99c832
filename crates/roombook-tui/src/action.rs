//! All UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use roombook_core::{Booking, NewBookingPayload, Notice, Room, RoomFormPayload, ViewState};

use crate::screen::ScreenId;

/// Destructive operation waiting for a y/n answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteRoom { id: String, label: String },
    CancelBooking { id: String, label: String },
    DeleteBooking { id: String, label: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteRoom { label, .. } => write!(f, "Delete room {label}?"),
            Self::CancelBooking { label, .. } => write!(f, "Cancel booking {label}?"),
            Self::DeleteBooking { label, .. } => {
                write!(f, "Delete booking {label}? This cannot be undone.")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data Events (from the controller) ─────────────────────────
    RoomsUpdated(Arc<Vec<Arc<Room>>>),
    BookingsUpdated(Arc<Vec<Arc<Booking>>>),
    ViewChanged(Box<ViewState>),
    Notify(Notice),

    // ── Room intents ──────────────────────────────────────────────
    NewRoom,
    EditRoom(Arc<Room>),
    CloseRoomForm,
    SubmitRoom(RoomFormPayload),

    // ── Booking intents ───────────────────────────────────────────
    NewBooking,
    EditBooking(Arc<Booking>),
    CloseBookingForm,
    SubmitBooking(NewBookingPayload),
    ToggleBookingView,

    // ── Confirm Dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Data transfer ─────────────────────────────────────────────
    Reload,
    Export,
    Import(PathBuf),
}
