// ── Central reactive data store ──
//
// Local mirror of the server's rooms and bookings. Mutations are
// broadcast to subscribers via `watch` channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use roombook_types::{Booking, ExportDocument, Room};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::stream::EntityStream;

/// Reactive store for the two entity collections.
pub struct DataStore {
    pub(crate) rooms: EntityCollection<Room>,
    pub(crate) bookings: EntityCollection<Booking>,
    pub(crate) last_load: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_load, _) = watch::channel(None);

        Self {
            rooms: EntityCollection::new(),
            bookings: EntityCollection::new(),
            last_load,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn rooms_snapshot(&self) -> Arc<Vec<Arc<Room>>> {
        self.rooms.snapshot()
    }

    pub fn bookings_snapshot(&self) -> Arc<Vec<Arc<Booking>>> {
        self.bookings.snapshot()
    }

    pub fn room(&self, id: &str) -> Option<Arc<Room>> {
        self.rooms.get(id)
    }

    pub fn booking(&self, id: &str) -> Option<Arc<Booking>> {
        self.bookings.get(id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    /// When the collections were last populated by a load or an import.
    pub fn last_load(&self) -> Option<DateTime<Utc>> {
        *self.last_load.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_rooms(&self) -> EntityStream<Room> {
        EntityStream::new(self.rooms.subscribe())
    }

    pub fn subscribe_bookings(&self) -> EntityStream<Booking> {
        EntityStream::new(self.bookings.subscribe())
    }

    // ── Bulk operations ──────────────────────────────────────────────

    /// Owned copy of both collections, in display order.
    pub fn to_document(&self) -> ExportDocument {
        ExportDocument {
            rooms: self.rooms.snapshot().iter().map(|r| Room::clone(r)).collect(),
            bookings: self
                .bookings
                .snapshot()
                .iter()
                .map(|b| Booking::clone(b))
                .collect(),
        }
    }

    /// Replace both collections wholesale.
    pub(crate) fn apply_document(&self, document: ExportDocument) {
        self.rooms.replace_all(document.rooms);
        self.bookings.replace_all(document.bookings);
    }

    pub(crate) fn mark_loaded(&self) {
        self.last_load.send_modify(|t| *t = Some(Utc::now()));
    }

    pub(crate) fn clear(&self) {
        self.rooms.clear();
        self.bookings.clear();
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
