pub(crate) mod bookings;
pub(crate) mod rooms;

use axum::Json;
use roombook_types::Ack;

use crate::error::ServerError;

pub(crate) async fn health() -> Json<Ack> {
    Json(Ack::OK)
}

pub(crate) async fn fallback() -> ServerError {
    ServerError::NotFound("Not found")
}
