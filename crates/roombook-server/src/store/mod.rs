// ── Data access layer ──
//
// The API service talks to persistence only through `Store`. Business
// rules (defaults, ordering, cancellation) stay in the handlers, so any
// backend that can list, get, insert, replace and delete rows will do.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use roombook_types::{Booking, Room};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),
}

/// Row-level access to rooms and bookings.
///
/// `update_*` replaces the row with the same id and returns `None` when
/// there is none. `delete_*` returns whether a row was removed.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Rooms ────────────────────────────────────────────────────────
    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError>;
    async fn get_room(&self, id: &str) -> Result<Option<Room>, StoreError>;
    async fn insert_room(&self, room: Room) -> Result<Room, StoreError>;
    async fn update_room(&self, room: Room) -> Result<Option<Room>, StoreError>;
    async fn delete_room(&self, id: &str) -> Result<bool, StoreError>;

    // ── Bookings ─────────────────────────────────────────────────────
    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError>;
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError>;
    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError>;
    async fn update_booking(&self, booking: Booking) -> Result<Option<Booking>, StoreError>;
    async fn delete_booking(&self, id: &str) -> Result<bool, StoreError>;
}
