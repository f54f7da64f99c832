// Room catalog endpoints: /api/rooms

use roombook_types::{Room, RoomFormPayload};

use crate::{ApiClient, Error};

impl ApiClient {
    /// `GET /api/rooms`
    pub async fn list_rooms(&self) -> Result<Vec<Room>, Error> {
        self.get(&["api", "rooms"]).await
    }

    /// `POST /api/rooms`
    pub async fn create_room(&self, payload: &RoomFormPayload) -> Result<Room, Error> {
        self.post(&["api", "rooms"], payload).await
    }

    /// `PUT /api/rooms/{id}`. Fails with [`Error::NotFound`] for unknown ids.
    pub async fn update_room(&self, id: &str, payload: &RoomFormPayload) -> Result<Room, Error> {
        self.put(&["api", "rooms", id], payload).await
    }

    /// `DELETE /api/rooms/{id}`. Succeeds for unknown ids too.
    pub async fn delete_room(&self, id: &str) -> Result<(), Error> {
        self.delete(&["api", "rooms", id]).await
    }
}
