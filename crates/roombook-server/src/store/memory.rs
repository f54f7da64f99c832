use async_trait::async_trait;
use indexmap::IndexMap;
use roombook_types::{Booking, Room};
use tokio::sync::RwLock;

use super::{Store, StoreError};

/// In-process store. Rows keep insertion order; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: RwLock<IndexMap<String, Room>>,
    bookings: RwLock<IndexMap<String, Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing rows, e.g. from a fixture.
    pub fn with_data(rooms: Vec<Room>, bookings: Vec<Booking>) -> Self {
        Self {
            rooms: RwLock::new(rooms.into_iter().map(|r| (r.id.clone(), r)).collect()),
            bookings: RwLock::new(bookings.into_iter().map(|b| (b.id.clone(), b)).collect()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.rooms.read().await.values().cloned().collect())
    }

    async fn get_room(&self, id: &str) -> Result<Option<Room>, StoreError> {
        Ok(self.rooms.read().await.get(id).cloned())
    }

    async fn insert_room(&self, room: Room) -> Result<Room, StoreError> {
        self.rooms.write().await.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    async fn update_room(&self, room: Room) -> Result<Option<Room>, StoreError> {
        let mut rooms = self.rooms.write().await;
        Ok(rooms.get_mut(&room.id).map(|slot| {
            slot.clone_from(&room);
            room
        }))
    }

    async fn delete_room(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.rooms.write().await.shift_remove(id).is_some())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.bookings.read().await.values().cloned().collect())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        self.bookings
            .write()
            .await
            .insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, booking: Booking) -> Result<Option<Booking>, StoreError> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings.get_mut(&booking.id).map(|slot| {
            slot.clone_from(&booking);
            booking
        }))
    }

    async fn delete_booking(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.bookings.write().await.shift_remove(id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use roombook_types::RoomStatus;

    fn room(id: &str, code: &str) -> Room {
        Room {
            id: id.into(),
            code: code.into(),
            name: format!("Room {code}"),
            capacity: 8,
            equipment: Vec::new(),
            status: RoomStatus::Available,
        }
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let store = MemoryStore::new();
        store.insert_room(room("b", "2")).await.unwrap();
        store.insert_room(room("a", "1")).await.unwrap();
        store.insert_room(room("c", "3")).await.unwrap();
        store.delete_room("a").await.unwrap();

        let ids: Vec<_> = store
            .list_rooms()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let store = MemoryStore::with_data(vec![room("a", "1")], Vec::new());
        assert!(store.update_room(room("zz", "9")).await.unwrap().is_none());
        assert_eq!(store.list_rooms().await.unwrap(), vec![room("a", "1")]);
    }

    #[tokio::test]
    async fn update_replaces_row() {
        let store = MemoryStore::with_data(vec![room("a", "1")], Vec::new());
        let updated = store.update_room(room("a", "42")).await.unwrap().unwrap();
        assert_eq!(updated.code, "42");
        assert_eq!(store.get_room("a").await.unwrap().unwrap().code, "42");
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = MemoryStore::with_data(vec![room("a", "1")], Vec::new());
        assert!(store.delete_room("a").await.unwrap());
        assert!(!store.delete_room("a").await.unwrap());
        assert!(!store.delete_booking("nope").await.unwrap());
    }
}
