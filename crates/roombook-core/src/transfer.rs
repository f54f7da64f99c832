// ── Import / export documents ──
//
// Export writes the local `{rooms, bookings}` snapshot as pretty JSON.
// Import is a client-only override: a document is validated in full
// before anything in the store changes.

use std::collections::HashSet;

use chrono::NaiveDate;
use roombook_types::ExportDocument;
use serde_json::Value;

use crate::error::CoreError;
use crate::store::Keyed;

/// `room-booking-export-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("room-booking-export-{}.json", date.format("%Y-%m-%d"))
}

pub(crate) fn render(document: &ExportDocument) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse and validate an import document.
///
/// The top level must be an object with arrays at `rooms` and `bookings`,
/// every element must be a well-formed record, and ids must be unique
/// within each collection.
pub(crate) fn parse(raw: &str) -> Result<ExportDocument, CoreError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| invalid(format!("not JSON: {e}")))?;

    for field in ["rooms", "bookings"] {
        if !value.get(field).is_some_and(Value::is_array) {
            return Err(invalid(format!("`{field}` must be an array")));
        }
    }

    let document: ExportDocument =
        serde_json::from_value(value).map_err(|e| invalid(format!("malformed record: {e}")))?;

    ensure_unique("room", &document.rooms)?;
    ensure_unique("booking", &document.bookings)?;

    Ok(document)
}

fn ensure_unique<T: Keyed>(kind: &str, entities: &[T]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(entities.len());
    for entity in entities {
        if !seen.insert(entity.key()) {
            return Err(invalid(format!("duplicate {kind} id {}", entity.key())));
        }
    }
    Ok(())
}

fn invalid(detail: String) -> CoreError {
    CoreError::ValidationFailed {
        message: format!("import rejected: {detail}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "rooms": [{
                "id": "r1", "code": "101", "name": "Lab A", "capacity": 12,
                "equipment": ["tv"], "status": "available"
            }],
            "bookings": [{
                "id": "b1", "roomCode": "101", "roomName": "Lab A",
                "date": "2025-03-01", "startTime": "10:00", "endTime": "11:00",
                "status": "confirmed", "organizer": "X", "note": "standup"
            }]
        })
    }

    #[test]
    fn file_name_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(export_file_name(date), "room-booking-export-2025-03-01.json");
    }

    #[test]
    fn accepts_valid_document() {
        let doc = parse(&sample().to_string()).unwrap();
        assert_eq!(doc.rooms.len(), 1);
        assert_eq!(doc.bookings[0].note.as_deref(), Some("standup"));
    }

    #[test]
    fn accepts_empty_arrays() {
        let doc = parse(r#"{"rooms": [], "bookings": []}"#).unwrap();
        assert_eq!(doc, ExportDocument::default());
    }

    #[test]
    fn rejects_missing_bookings() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("bookings");
        let err = parse(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("`bookings` must be an array"));
    }

    #[test]
    fn rejects_non_array_rooms() {
        let mut value = sample();
        value["rooms"] = json!({ "r1": {} });
        assert!(matches!(
            parse(&value.to_string()),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn rejects_non_object_and_garbage() {
        assert!(parse("[]").is_err());
        assert!(parse("null").is_err());
        assert!(parse("{ not json").is_err());
    }

    #[test]
    fn rejects_bad_status() {
        let mut value = sample();
        value["bookings"][0]["status"] = json!("tentative");
        assert!(parse(&value.to_string()).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut value = sample();
        let room = value["rooms"][0].clone();
        value["rooms"].as_array_mut().unwrap().push(room);
        let err = parse(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("duplicate room id r1"));
    }

    #[test]
    fn render_is_pretty_and_parses_back() {
        let doc = parse(&sample().to_string()).unwrap();
        let text = render(&doc).unwrap();
        assert!(text.contains("\n  \"rooms\""));
        assert_eq!(parse(&text).unwrap(), doc);
    }
}
