// Booking endpoints: /api/bookings

use roombook_types::{Booking, NewBookingPayload};

use crate::{ApiClient, Error};

impl ApiClient {
    /// `GET /api/bookings`, ordered by date then start time.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, Error> {
        self.get(&["api", "bookings"]).await
    }

    /// `POST /api/bookings`. The server forces status to `confirmed`.
    pub async fn create_booking(&self, payload: &NewBookingPayload) -> Result<Booking, Error> {
        self.post(&["api", "bookings"], payload).await
    }

    /// `PUT /api/bookings/{id}`
    pub async fn update_booking(
        &self,
        id: &str,
        payload: &NewBookingPayload,
    ) -> Result<Booking, Error> {
        self.put(&["api", "bookings", id], payload).await
    }

    /// `PATCH /api/bookings/{id}/cancel`
    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, Error> {
        self.patch(&["api", "bookings", id, "cancel"]).await
    }

    /// `DELETE /api/bookings/{id}`
    pub async fn delete_booking(&self, id: &str) -> Result<(), Error> {
        self.delete(&["api", "bookings", id]).await
    }
}
