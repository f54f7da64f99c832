// roombook-core: reactive state layer between roombook-api and front ends.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod notice;
pub mod stats;
pub mod store;
pub mod stream;
pub mod transfer;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::ControllerConfig;
pub use controller::Controller;
pub use error::CoreError;
pub use notice::{Notice, NoticeLevel};
pub use stats::Stats;
pub use store::DataStore;
pub use stream::EntityStream;
pub use transfer::export_file_name;
pub use view::{BookingView, FormMode, Section, ViewState};

// Re-export wire types so front ends only need this crate.
pub use roombook_types::{
    Booking, BookingStatus, ExportDocument, NewBookingPayload, Room, RoomFormPayload, RoomStatus,
    format_equipment, parse_equipment,
};
