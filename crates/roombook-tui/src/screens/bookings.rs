//! Bookings screen: table or schedule in list mode, booking form in
//! create/edit mode.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use roombook_core::{
    Booking, BookingStatus, BookingView, FormMode, NewBookingPayload, Room, ViewState,
};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{Form, FormEvent};
use crate::widgets::schedule;

const ROOM: &str = "Room";
const DATE: &str = "Date";
const START: &str = "Start";
const END: &str = "End";
const ORGANIZER: &str = "Organizer";
const NOTE: &str = "Note";

/// Defaults for a fresh booking: today, first room, a one-hour slot.
fn blank_payload(rooms: &[Arc<Room>]) -> NewBookingPayload {
    NewBookingPayload {
        room_code: rooms.first().map(|r| r.code.clone()).unwrap_or_default(),
        date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        start_time: "09:00".into(),
        end_time: "10:00".into(),
        ..NewBookingPayload::default()
    }
}

/// Form prefilled from `payload`. The room is a choice over known room
/// codes, or free text when the catalog is empty.
pub fn booking_form(title: &str, payload: &NewBookingPayload, rooms: &[Arc<Room>]) -> Form {
    let form = Form::new(title);
    let form = if rooms.is_empty() {
        form.text(ROOM, payload.room_code.clone())
    } else {
        let mut codes: Vec<String> = rooms.iter().map(|r| r.code.clone()).collect();
        if !payload.room_code.is_empty() && !codes.contains(&payload.room_code) {
            codes.insert(0, payload.room_code.clone());
        }
        form.choice(ROOM, codes, &payload.room_code)
    };
    form.text(DATE, payload.date.clone())
        .text(START, payload.start_time.clone())
        .text(END, payload.end_time.clone())
        .text(ORGANIZER, payload.organizer.clone())
        .text(NOTE, payload.note.clone().unwrap_or_default())
}

/// Read the form back into a payload.
///
/// The room name is the snapshot already on `editing` when the room is
/// unchanged, otherwise the current name of the chosen room. An unknown
/// code sends no name and the server applies its default.
pub fn booking_payload(
    form: &Form,
    rooms: &[Arc<Room>],
    editing: Option<&Booking>,
) -> NewBookingPayload {
    let room_code = form.value(ROOM).to_owned();
    let room_name = match editing {
        Some(booking) if booking.room_code == room_code => Some(booking.room_name.clone()),
        _ => rooms
            .iter()
            .find(|r| r.code == room_code)
            .map(|r| r.name.clone()),
    };
    let note = Some(form.value(NOTE))
        .filter(|n| !n.is_empty())
        .map(str::to_owned);

    NewBookingPayload {
        room_code,
        room_name,
        date: form.value(DATE).to_owned(),
        start_time: form.value(START).to_owned(),
        end_time: form.value(END).to_owned(),
        organizer: form.value(ORGANIZER).to_owned(),
        note,
    }
}

fn booking_label(booking: &Booking) -> String {
    format!(
        "{} {} {}-{}",
        booking.room_code, booking.date, booking.start_time, booking.end_time
    )
}

pub struct BookingsScreen {
    focused: bool,
    rooms: Arc<Vec<Arc<Room>>>,
    bookings: Arc<Vec<Arc<Booking>>>,
    table_state: TableState,
    booking_view: BookingView,
    schedule_scroll: u16,
    mode: FormMode,
    editing: Option<Booking>,
    form: Option<Form>,
}

impl BookingsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            rooms: Arc::new(Vec::new()),
            bookings: Arc::new(Vec::new()),
            table_state: TableState::default().with_selected(Some(0)),
            booking_view: BookingView::Table,
            schedule_scroll: 0,
            mode: FormMode::List,
            editing: None,
            form: None,
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected(&self) -> Option<&Arc<Booking>> {
        self.bookings.get(self.selected_index())
    }

    fn select(&mut self, idx: usize) {
        let clamped = if self.bookings.is_empty() {
            0
        } else {
            idx.min(self.bookings.len() - 1)
        };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        match self.booking_view {
            BookingView::Table => {
                self.select(self.selected_index().saturating_add_signed(delta));
            }
            BookingView::Schedule => {
                self.schedule_scroll = if delta < 0 {
                    self.schedule_scroll.saturating_sub(1)
                } else {
                    self.schedule_scroll.saturating_add(1)
                };
            }
        }
    }

    fn sync_view(&mut self, view: &ViewState) {
        if view.booking_view != self.booking_view {
            self.booking_view = view.booking_view;
            self.schedule_scroll = 0;
        }
        if view.booking_mode == self.mode {
            return;
        }
        self.mode = view.booking_mode;
        self.editing.clone_from(&view.editing_booking);
        self.form = match (view.booking_mode, &view.editing_booking) {
            (FormMode::Create, _) => Some(booking_form(
                "New booking",
                &blank_payload(&self.rooms),
                &self.rooms,
            )),
            (FormMode::Edit, Some(booking)) => Some(booking_form(
                &format!("Edit booking {}", booking_label(booking)),
                &NewBookingPayload::from(booking),
                &self.rooms,
            )),
            _ => None,
        };
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match form.handle_key(key) {
            FormEvent::Close => Some(Action::CloseBookingForm),
            FormEvent::Submit => Some(Action::SubmitBooking(booking_payload(
                form,
                &self.rooms,
                self.editing.as_ref(),
            ))),
            FormEvent::Edited | FormEvent::Ignored => None,
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            Cell::from("Date").style(theme::table_header()),
            Cell::from("Time").style(theme::table_header()),
            Cell::from("Room").style(theme::table_header()),
            Cell::from("Organizer").style(theme::table_header()),
            Cell::from("Status").style(theme::table_header()),
            Cell::from("Note").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .bookings
            .iter()
            .enumerate()
            .map(|(i, booking)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let row_style = if is_selected {
                    theme::table_selected()
                } else if booking.status == BookingStatus::Cancelled {
                    Style::default()
                        .fg(theme::BORDER_GRAY)
                        .add_modifier(Modifier::DIM)
                } else {
                    theme::table_row()
                };

                Row::new(vec![
                    Cell::from(format!("{prefix}{}", booking.date))
                        .style(Style::default().fg(theme::CORAL)),
                    Cell::from(format!("{}-{}", booking.start_time, booking.end_time)),
                    Cell::from(format!("{} {}", booking.room_code, booking.room_name))
                        .style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(booking.organizer.clone()),
                    Cell::from(booking.status.to_string()).style(
                        Style::default().fg(theme::booking_status_color(booking.status)),
                    ),
                    Cell::from(booking.note.clone().unwrap_or_default()),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(18),
            Constraint::Min(14),
            Constraint::Length(10),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_schedule(&self, frame: &mut Frame, area: Rect) {
        let days = schedule::group_by_day(&self.bookings);
        let lines = if days.is_empty() {
            vec![Line::from(Span::styled("  No bookings", theme::key_hint()))]
        } else {
            schedule::schedule_lines(&days)
        };
        frame.render_widget(
            Paragraph::new(lines).scroll((self.schedule_scroll, 0)),
            area,
        );
    }
}

impl Component for BookingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.select(0);
                self.schedule_scroll = 0;
                None
            }
            KeyCode::Char('G') => {
                self.select(usize::MAX);
                None
            }
            KeyCode::Char('n') => Some(Action::NewBooking),
            KeyCode::Char('v') => Some(Action::ToggleBookingView),
            KeyCode::Char('e') | KeyCode::Enter if self.booking_view == BookingView::Table => self
                .selected()
                .map(|booking| Action::EditBooking(Arc::clone(booking))),
            KeyCode::Char('c') if self.booking_view == BookingView::Table => {
                self.selected().map(|booking| {
                    Action::ShowConfirm(ConfirmAction::CancelBooking {
                        id: booking.id.clone(),
                        label: booking_label(booking),
                    })
                })
            }
            KeyCode::Char('d') if self.booking_view == BookingView::Table => {
                self.selected().map(|booking| {
                    Action::ShowConfirm(ConfirmAction::DeleteBooking {
                        id: booking.id.clone(),
                        label: booking_label(booking),
                    })
                })
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RoomsUpdated(rooms) => self.rooms = Arc::clone(rooms),
            Action::BookingsUpdated(bookings) => {
                self.bookings = Arc::clone(bookings);
                self.select(self.selected_index());
            }
            Action::ViewChanged(view) => self.sync_view(view),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(form) = &self.form {
            form.render(frame, area);
            return;
        }

        let view_label = match self.booking_view {
            BookingView::Table => "table",
            BookingView::Schedule => "schedule",
        };
        let block = Block::default()
            .title(format!(
                " Bookings ({}) · {view_label} ",
                self.bookings.len()
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table or schedule
            Constraint::Length(1), // hints
        ])
        .split(inner);

        match self.booking_view {
            BookingView::Table => self.render_table(frame, layout[0]),
            BookingView::Schedule => self.render_schedule(frame, layout[0]),
        }

        let mut hints = vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("new  ", theme::key_hint()),
        ];
        if self.booking_view == BookingView::Table {
            hints.extend([
                Span::styled("e ", theme::key_hint_key()),
                Span::styled("edit  ", theme::key_hint()),
                Span::styled("c ", theme::key_hint_key()),
                Span::styled("cancel  ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete  ", theme::key_hint()),
            ]);
        }
        hints.extend([
            Span::styled("v ", theme::key_hint_key()),
            Span::styled("table/schedule", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(Line::from(hints)), layout[1]);
    }

    fn captures_input(&self) -> bool {
        self.form.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use roombook_core::RoomStatus;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn room(code: &str, name: &str) -> Arc<Room> {
        Arc::new(Room {
            id: format!("id-{code}"),
            code: code.into(),
            name: name.into(),
            capacity: 10,
            equipment: Vec::new(),
            status: RoomStatus::Available,
        })
    }

    fn booking() -> Booking {
        Booking {
            id: "b1".into(),
            room_code: "A-101".into(),
            room_name: "Old name".into(),
            date: "2025-03-01".into(),
            start_time: "09:00".into(),
            end_time: "10:30".into(),
            status: BookingStatus::Confirmed,
            organizer: "Petrova".into(),
            note: Some("bring markers".into()),
        }
    }

    fn screen_with_rooms() -> BookingsScreen {
        let mut screen = BookingsScreen::new();
        screen
            .update(&Action::RoomsUpdated(Arc::new(vec![
                room("A-101", "Renamed hall"),
                room("B-2", "Lab"),
            ])))
            .unwrap();
        screen
    }

    #[test]
    fn edit_keeps_the_snapshot_name_when_room_is_unchanged() {
        let rooms = vec![room("A-101", "Renamed hall")];
        let original = booking();
        let form = booking_form("Edit", &NewBookingPayload::from(&original), &rooms);

        let payload = booking_payload(&form, &rooms, Some(&original));
        assert_eq!(payload, NewBookingPayload::from(&original));
    }

    #[test]
    fn changing_room_takes_the_new_rooms_name() {
        let rooms = vec![room("A-101", "Hall"), room("B-2", "Lab")];
        let original = booking();
        let mut form = booking_form("Edit", &NewBookingPayload::from(&original), &rooms);
        form.handle_key(press(KeyCode::Right));

        let payload = booking_payload(&form, &rooms, Some(&original));
        assert_eq!(payload.room_code, "B-2");
        assert_eq!(payload.room_name.as_deref(), Some("Lab"));
    }

    #[test]
    fn orphan_room_code_stays_selectable() {
        let rooms = vec![room("B-2", "Lab")];
        let form = booking_form("Edit", &NewBookingPayload::from(&booking()), &rooms);
        assert_eq!(form.value(ROOM), "A-101");
    }

    #[test]
    fn empty_catalog_uses_free_text_room() {
        let mut form = booking_form("New", &NewBookingPayload::default(), &[]);
        for c in "Z-9".chars() {
            form.handle_key(press(KeyCode::Char(c)));
        }
        let payload = booking_payload(&form, &[], None);
        assert_eq!(payload.room_code, "Z-9");
        assert_eq!(payload.room_name, None);
        assert_eq!(payload.note, None);
    }

    #[test]
    fn create_mode_prefills_first_room_and_submits() {
        let mut screen = screen_with_rooms();
        let view = ViewState {
            booking_mode: FormMode::Create,
            ..ViewState::default()
        };
        screen.update(&Action::ViewChanged(Box::new(view))).unwrap();
        assert!(screen.captures_input());

        let action = screen.handle_key_event(press(KeyCode::Enter)).unwrap();
        let Some(Action::SubmitBooking(payload)) = action else {
            panic!("expected SubmitBooking, got {action:?}");
        };
        assert_eq!(payload.room_code, "A-101");
        assert_eq!(payload.room_name.as_deref(), Some("Renamed hall"));
        assert_eq!(payload.start_time, "09:00");
    }

    #[test]
    fn cancel_and_delete_ask_for_confirmation() {
        let mut screen = screen_with_rooms();
        screen
            .update(&Action::BookingsUpdated(Arc::new(vec![Arc::new(booking())])))
            .unwrap();

        let action = screen.handle_key_event(press(KeyCode::Char('c'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::ShowConfirm(ConfirmAction::CancelBooking { ref id, .. })) if id == "b1"
        ));

        let action = screen.handle_key_event(press(KeyCode::Char('d'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::ShowConfirm(ConfirmAction::DeleteBooking { ref id, .. })) if id == "b1"
        ));
    }

    #[test]
    fn schedule_view_disables_row_actions() {
        let mut screen = screen_with_rooms();
        screen
            .update(&Action::BookingsUpdated(Arc::new(vec![Arc::new(booking())])))
            .unwrap();
        let view = ViewState {
            booking_view: BookingView::Schedule,
            ..ViewState::default()
        };
        screen.update(&Action::ViewChanged(Box::new(view))).unwrap();

        assert!(screen.handle_key_event(press(KeyCode::Char('d'))).unwrap().is_none());
        assert!(matches!(
            screen.handle_key_event(press(KeyCode::Char('v'))).unwrap(),
            Some(Action::ToggleBookingView)
        ));
    }
}
