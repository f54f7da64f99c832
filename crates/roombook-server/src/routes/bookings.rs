// /api/bookings

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use roombook_types::{Ack, Booking, BookingStatus, NewBookingPayload};
use tracing::{debug, info};
use uuid::Uuid;

use crate::AppState;
use crate::error::ServerError;
use crate::extractors::JsonBody;

const NOT_FOUND: &str = "Booking not found";

// ── Booking rules ────────────────────────────────────────────────────

/// A new booking: always confirmed, with the placeholder room name when
/// the payload has none.
fn new_booking(id: String, payload: NewBookingPayload, default_room_name: &str) -> Booking {
    let room_name = payload
        .room_name()
        .unwrap_or(default_room_name)
        .to_owned();
    Booking {
        id,
        room_code: payload.room_code,
        room_name,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        status: BookingStatus::Confirmed,
        organizer: payload.organizer,
        note: payload.note,
    }
}

/// Full-field update. Status is untouched and an empty room name keeps
/// the existing snapshot.
fn apply_update(booking: &mut Booking, payload: NewBookingPayload) {
    if let Some(name) = payload.room_name() {
        booking.room_name = name.to_owned();
    }
    booking.room_code = payload.room_code;
    booking.date = payload.date;
    booking.start_time = payload.start_time;
    booking.end_time = payload.end_time;
    booking.organizer = payload.organizer;
    booking.note = payload.note;
}

/// Mark cancelled and append the suffix to the note. Returns `false`
/// for a booking that was already cancelled, which is left as is.
fn apply_cancel(booking: &mut Booking, suffix: &str) -> bool {
    if booking.status == BookingStatus::Cancelled {
        return false;
    }
    booking.status = BookingStatus::Cancelled;
    let mut note = booking.note.take().unwrap_or_default();
    note.push_str(suffix);
    booking.note = Some(note);
    true
}

async fn check_room_code(state: &AppState, code: &str) -> Result<(), ServerError> {
    if !state.config.strict_room_codes {
        return Ok(());
    }
    let rooms = state.store.list_rooms().await?;
    if rooms.iter().any(|room| room.code == code) {
        Ok(())
    } else {
        Err(ServerError::UnknownRoom(code.to_owned()))
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

pub(crate) async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Booking>>, ServerError> {
    let mut bookings = state.store.list_bookings().await?;
    bookings.sort_by(|a, b| a.slot_key().cmp(&b.slot_key()));
    Ok(Json(bookings))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewBookingPayload>,
) -> Result<(StatusCode, Json<Booking>), ServerError> {
    check_room_code(&state, &payload.room_code).await?;

    let booking = new_booking(
        Uuid::new_v4().to_string(),
        payload,
        &state.config.default_room_name,
    );
    let booking = state.store.insert_booking(booking).await?;
    info!(id = %booking.id, room = %booking.room_code, date = %booking.date, "booking created");

    Ok((StatusCode::CREATED, Json(booking)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<NewBookingPayload>,
) -> Result<Json<Booking>, ServerError> {
    let mut booking = state
        .store
        .get_booking(&id)
        .await?
        .ok_or(ServerError::NotFound(NOT_FOUND))?;
    check_room_code(&state, &payload.room_code).await?;

    apply_update(&mut booking, payload);
    let booking = state
        .store
        .update_booking(booking)
        .await?
        .ok_or(ServerError::NotFound(NOT_FOUND))?;
    info!(id = %booking.id, "booking updated");

    Ok(Json(booking))
}

pub(crate) async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ServerError> {
    let mut booking = state
        .store
        .get_booking(&id)
        .await?
        .ok_or(ServerError::NotFound(NOT_FOUND))?;

    if !apply_cancel(&mut booking, &state.config.cancel_suffix) {
        debug!(%id, "booking already cancelled");
        return Ok(Json(booking));
    }

    let booking = state
        .store
        .update_booking(booking)
        .await?
        .ok_or(ServerError::NotFound(NOT_FOUND))?;
    info!(id = %booking.id, "booking cancelled");

    Ok(Json(booking))
}

/// Idempotent: unknown ids are acknowledged too.
pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ServerError> {
    if state.store.delete_booking(&id).await? {
        info!(%id, "booking deleted");
    }
    Ok(Json(Ack::OK))
}
