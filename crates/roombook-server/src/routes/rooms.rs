// /api/rooms

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use roombook_types::{Ack, Room, RoomFormPayload};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ServerError;
use crate::extractors::JsonBody;

const NOT_FOUND: &str = "Room not found";

fn validate(payload: &RoomFormPayload) -> Result<(), ServerError> {
    if payload.capacity == 0 {
        return Err(ServerError::Validation("capacity must be at least 1".into()));
    }
    Ok(())
}

pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ServerError> {
    Ok(Json(state.store.list_rooms().await?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RoomFormPayload>,
) -> Result<(StatusCode, Json<Room>), ServerError> {
    validate(&payload)?;

    let room = Room::from_payload(Uuid::new_v4().to_string(), &payload);
    let room = state.store.insert_room(room).await?;
    info!(id = %room.id, code = %room.code, "room created");

    Ok((StatusCode::CREATED, Json(room)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<RoomFormPayload>,
) -> Result<Json<Room>, ServerError> {
    validate(&payload)?;

    let mut room = state
        .store
        .get_room(&id)
        .await?
        .ok_or(ServerError::NotFound(NOT_FOUND))?;
    room.apply(&payload);

    let room = state
        .store
        .update_room(room)
        .await?
        .ok_or(ServerError::NotFound(NOT_FOUND))?;
    info!(id = %room.id, "room updated");

    Ok(Json(room))
}

/// Idempotent: unknown ids are acknowledged too.
pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ServerError> {
    if state.store.delete_room(&id).await? {
        info!(%id, "room deleted");
    }
    Ok(Json(Ack::OK))
}
