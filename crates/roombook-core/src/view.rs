// ── UI mode state ──
//
// Which section is shown and which form (if any) is open. Owned by the
// controller so every front end follows the same transitions.

use roombook_types::{Booking, Room};
use strum::{Display, EnumIter};

/// Top-level navigation target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Section {
    #[default]
    Overview,
    Catalog,
    Bookings,
}

/// Per-entity form state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum FormMode {
    #[default]
    List,
    Create,
    Edit,
}

/// How the booking list is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum BookingView {
    #[default]
    Table,
    Schedule,
}

impl BookingView {
    pub fn toggled(self) -> Self {
        match self {
            Self::Table => Self::Schedule,
            Self::Schedule => Self::Table,
        }
    }
}

/// Snapshot of every UI mode flag.
///
/// `editing_*` is `Some` only while the matching mode is [`FormMode::Edit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub section: Section,
    pub booking_mode: FormMode,
    pub booking_view: BookingView,
    pub room_mode: FormMode,
    pub editing_booking: Option<Booking>,
    pub editing_room: Option<Room>,
    pub loading: bool,
}

impl ViewState {
    /// Enter a section, resetting that section's form state.
    pub(crate) fn navigate(&mut self, section: Section) {
        self.section = section;
        match section {
            Section::Bookings => self.reset_bookings(),
            Section::Catalog => self.close_room_form(),
            Section::Overview => {}
        }
    }

    pub(crate) fn reset_bookings(&mut self) {
        self.booking_mode = FormMode::List;
        self.booking_view = BookingView::Table;
        self.editing_booking = None;
    }

    pub(crate) fn close_booking_form(&mut self) {
        self.booking_mode = FormMode::List;
        self.editing_booking = None;
    }

    pub(crate) fn close_room_form(&mut self) {
        self.room_mode = FormMode::List;
        self.editing_room = None;
    }
}
