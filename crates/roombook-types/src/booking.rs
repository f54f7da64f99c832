use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle state of a booking.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    /// Whether the booking still occupies its slot.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// A reservation of a room for a date and time range.
///
/// `room_name` is a snapshot taken when the booking was made. Renaming
/// the room later does not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub room_code: String,
    pub room_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub organizer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Booking {
    /// Sort key used for listings: date first, then start time.
    pub fn slot_key(&self) -> (&str, &str) {
        (&self.date, &self.start_time)
    }
}

/// Create/update input for a booking.
///
/// There is no status field: new bookings are always confirmed, and
/// updates never change status. A `status` key in incoming JSON is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingPayload {
    pub room_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub organizer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewBookingPayload {
    /// The supplied room name, treating an empty string as absent.
    pub fn room_name(&self) -> Option<&str> {
        self.room_name.as_deref().filter(|name| !name.is_empty())
    }
}

impl From<&Booking> for NewBookingPayload {
    fn from(booking: &Booking) -> Self {
        Self {
            room_code: booking.room_code.clone(),
            room_name: Some(booking.room_name.clone()),
            date: booking.date.clone(),
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            organizer: booking.organizer.clone(),
            note: booking.note.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn camel_case_round_trip() {
        let raw = json!({
            "id": "b1",
            "roomCode": "101",
            "roomName": "Lab A",
            "date": "2025-03-01",
            "startTime": "10:00",
            "endTime": "11:00",
            "status": "pending",
            "organizer": "X"
        });
        let booking: Booking = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(booking.room_code, "101");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.note, None);
        assert_eq!(serde_json::to_value(&booking).unwrap(), raw);
    }

    #[test]
    fn payload_ignores_status_field() {
        let raw = json!({
            "roomCode": "101",
            "date": "2025-03-01",
            "startTime": "10:00",
            "endTime": "11:00",
            "organizer": "X",
            "status": "cancelled"
        });
        let payload: NewBookingPayload = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.room_name, None);
        assert_eq!(payload.organizer, "X");
    }

    #[test]
    fn empty_room_name_counts_as_absent() {
        let payload = NewBookingPayload {
            room_name: Some(String::new()),
            ..NewBookingPayload::default()
        };
        assert_eq!(payload.room_name(), None);
    }

    #[test]
    fn cancelled_is_inactive() {
        assert!(BookingStatus::Confirmed.is_active());
        assert!(BookingStatus::Pending.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
