//! Room catalog: room table in list mode, room form in create/edit mode.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use strum::IntoEnumIterator;

use roombook_core::{
    FormMode, Notice, Room, RoomFormPayload, RoomStatus, ViewState, format_equipment,
};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{Form, FormEvent};

const CODE: &str = "Code";
const NAME: &str = "Name";
const CAPACITY: &str = "Capacity";
const EQUIPMENT: &str = "Equipment";
const STATUS: &str = "Status";

/// Form prefilled from `payload`.
pub fn room_form(title: &str, payload: &RoomFormPayload) -> Form {
    let capacity = if payload.capacity == 0 {
        String::new()
    } else {
        payload.capacity.to_string()
    };
    Form::new(title)
        .text(CODE, payload.code.clone())
        .text(NAME, payload.name.clone())
        .text(CAPACITY, capacity)
        .text(EQUIPMENT, payload.equipment.clone())
        .choice(
            STATUS,
            RoomStatus::iter().map(|s| s.to_string()).collect(),
            &payload.status.to_string(),
        )
}

/// Read the form back into a payload. Only the capacity can fail to convert.
pub fn room_payload(form: &Form) -> Result<RoomFormPayload, String> {
    let raw_capacity = form.value(CAPACITY);
    let capacity = raw_capacity
        .parse::<u32>()
        .map_err(|_| format!("Capacity must be a whole number, got '{raw_capacity}'"))?;
    Ok(RoomFormPayload {
        code: form.value(CODE).to_owned(),
        name: form.value(NAME).to_owned(),
        capacity,
        equipment: form.value(EQUIPMENT).to_owned(),
        status: form.value(STATUS).parse().unwrap_or_default(),
    })
}

pub struct CatalogScreen {
    focused: bool,
    rooms: Arc<Vec<Arc<Room>>>,
    table_state: TableState,
    mode: FormMode,
    form: Option<Form>,
}

impl CatalogScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            rooms: Arc::new(Vec::new()),
            table_state: TableState::default().with_selected(Some(0)),
            mode: FormMode::List,
            form: None,
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected(&self) -> Option<&Arc<Room>> {
        self.rooms.get(self.selected_index())
    }

    fn select(&mut self, idx: usize) {
        let clamped = if self.rooms.is_empty() {
            0
        } else {
            idx.min(self.rooms.len() - 1)
        };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        self.select(self.selected_index().saturating_add_signed(delta));
    }

    /// Open or close the form when the controller's room mode changes.
    fn sync_mode(&mut self, view: &ViewState) {
        if view.room_mode == self.mode {
            return;
        }
        self.mode = view.room_mode;
        self.form = match (view.room_mode, &view.editing_room) {
            (FormMode::Create, _) => Some(room_form("New room", &RoomFormPayload::default())),
            (FormMode::Edit, Some(room)) => Some(room_form(
                &format!("Edit room {}", room.code),
                &RoomFormPayload::from(room),
            )),
            _ => None,
        };
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match form.handle_key(key) {
            FormEvent::Close => Some(Action::CloseRoomForm),
            FormEvent::Submit => Some(match room_payload(form) {
                Ok(payload) => Action::SubmitRoom(payload),
                Err(message) => Action::Notify(Notice::error(message)),
            }),
            FormEvent::Edited | FormEvent::Ignored => None,
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Rooms ({}) ", self.rooms.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let header = Row::new(vec![
            Cell::from("Code").style(theme::table_header()),
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Capacity").style(theme::table_header()),
            Cell::from("Equipment").style(theme::table_header()),
            Cell::from("Status").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .rooms
            .iter()
            .enumerate()
            .map(|(i, room)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                Row::new(vec![
                    Cell::from(format!("{prefix}{}", room.code)).style(
                        Style::default()
                            .fg(theme::NEON_CYAN)
                            .add_modifier(if is_selected {
                                Modifier::BOLD
                            } else {
                                Modifier::empty()
                            }),
                    ),
                    Cell::from(room.name.clone()),
                    Cell::from(room.capacity.to_string()),
                    Cell::from(format_equipment(&room.equipment))
                        .style(Style::default().fg(theme::LIGHT_BLUE)),
                    Cell::from(room.status.to_string())
                        .style(Style::default().fg(theme::room_status_color(room.status))),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Length(9),
            Constraint::Min(20),
            Constraint::Length(12),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("new  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}

impl Component for CatalogScreen {
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
                None
            }
            KeyCode::Char('G') => {
                self.select(usize::MAX);
                None
            }
            KeyCode::Char('n') => Some(Action::NewRoom),
            KeyCode::Char('e') | KeyCode::Enter => {
                self.selected().map(|room| Action::EditRoom(Arc::clone(room)))
            }
            KeyCode::Char('d') => self.selected().map(|room| {
                Action::ShowConfirm(ConfirmAction::DeleteRoom {
                    id: room.id.clone(),
                    label: format!("{} {}", room.code, room.name),
                })
            }),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RoomsUpdated(rooms) => {
                self.rooms = Arc::clone(rooms);
                self.select(self.selected_index());
            }
            Action::ViewChanged(view) => self.sync_mode(view),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match &self.form {
            Some(form) => form.render(frame, area),
            None => self.render_table(frame, area),
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
