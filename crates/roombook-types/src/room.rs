use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::equipment::{format_equipment, parse_equipment};

/// Availability of a room in the catalog.
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
pub enum RoomStatus {
    #[default]
    Available,
    Booked,
    Maintenance,
}

/// A bookable room as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub code: String,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub status: RoomStatus,
}

impl Room {
    /// Build a room from a form payload under a freshly assigned id.
    pub fn from_payload(id: String, payload: &RoomFormPayload) -> Self {
        Self {
            id,
            code: payload.code.clone(),
            name: payload.name.clone(),
            capacity: payload.capacity,
            equipment: payload.equipment_tags(),
            status: payload.status,
        }
    }

    /// Replace every mutable field from a form payload. The id is kept.
    pub fn apply(&mut self, payload: &RoomFormPayload) {
        self.code.clone_from(&payload.code);
        self.name.clone_from(&payload.name);
        self.capacity = payload.capacity;
        self.equipment = payload.equipment_tags();
        self.status = payload.status;
    }
}

/// Create/update input for a room. Equipment travels as a delimited string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomFormPayload {
    pub code: String,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub equipment: String,
    pub status: RoomStatus,
}

impl RoomFormPayload {
    pub fn equipment_tags(&self) -> Vec<String> {
        parse_equipment(&self.equipment)
    }
}

impl From<&Room> for RoomFormPayload {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.clone(),
            name: room.name.clone(),
            capacity: room.capacity,
            equipment: format_equipment(&room.equipment),
            status: room.status,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn lab() -> RoomFormPayload {
        RoomFormPayload {
            code: "303".into(),
            name: "Lab C".into(),
            capacity: 40,
            equipment: "wifi, board".into(),
            status: RoomStatus::Available,
        }
    }

    #[test]
    fn from_payload_splits_equipment() {
        let room = Room::from_payload("r1".into(), &lab());
        assert_eq!(room.equipment, vec!["wifi", "board"]);
        assert_eq!(room.code, "303");
        assert_eq!(room.capacity, 40);
    }

    #[test]
    fn apply_keeps_id() {
        let mut room = Room::from_payload("r1".into(), &lab());
        let mut payload = lab();
        payload.name = "Lab D".into();
        payload.status = RoomStatus::Maintenance;
        payload.equipment = String::new();
        room.apply(&payload);

        assert_eq!(room.id, "r1");
        assert_eq!(room.name, "Lab D");
        assert_eq!(room.status, RoomStatus::Maintenance);
        assert!(room.equipment.is_empty());
    }

    #[test]
    fn form_prefill_joins_equipment() {
        let room = Room::from_payload("r1".into(), &lab());
        let payload = RoomFormPayload::from(&room);
        assert_eq!(payload.equipment, "wifi, board");
    }

    #[test]
    fn status_is_lowercase_on_the_wire() {
        let room = Room::from_payload("r1".into(), &lab());
        let value = serde_json::to_value(&room).unwrap();
        assert_eq!(value["status"], json!("available"));
        assert_eq!(RoomStatus::Maintenance.to_string(), "maintenance");
        assert_eq!("booked".parse::<RoomStatus>().unwrap(), RoomStatus::Booked);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = json!({
            "id": "r1", "code": "1", "name": "x", "capacity": 1,
            "equipment": [], "status": "closed"
        });
        assert!(serde_json::from_value::<Room>(raw).is_err());
    }
}
