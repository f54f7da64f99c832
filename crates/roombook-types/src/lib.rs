//! Wire and domain types shared by the roombook server and its clients.
//!
//! Field names follow the JSON contract (`camelCase`), status enums are
//! closed sets serialized in lowercase.

pub mod booking;
pub mod document;
pub mod equipment;
pub mod room;

pub use booking::{Booking, BookingStatus, NewBookingPayload};
pub use document::{Ack, ErrorBody, ExportDocument};
pub use equipment::{format_equipment, parse_equipment};
pub use room::{Room, RoomFormPayload, RoomStatus};
