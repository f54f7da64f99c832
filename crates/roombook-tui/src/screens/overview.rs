//! Overview screen: headline stat cards and the next upcoming bookings.
//!
//! Layout:
//! ┌─ Rooms ─┐ ┌─ Available ─┐ ┌─ Active bookings ─┐ ┌─ Equipment ─┐
//! └─────────┘ └─────────────┘ └───────────────────┘ └─────────────┘
//! ┌─ Upcoming ───────────────────────────────────────────────────────┐
//! └──────────────────────────────────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use roombook_core::{Booking, Room, Stats};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const UPCOMING_LIMIT: usize = 12;

pub struct OverviewScreen {
    focused: bool,
    rooms: Arc<Vec<Arc<Room>>>,
    bookings: Arc<Vec<Arc<Booking>>>,
    loading: bool,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            rooms: Arc::new(Vec::new()),
            bookings: Arc::new(Vec::new()),
            loading: false,
        }
    }

    fn render_card(frame: &mut Frame, area: Rect, title: &str, value: usize, color: Color) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let y_offset = inner.height.saturating_sub(1) / 2;
        let centered = Rect {
            x: inner.x,
            y: inner.y + y_offset,
            width: inner.width,
            height: 1.min(inner.height),
        };
        let text = Paragraph::new(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(text, centered);
    }

    fn upcoming_lines(&self) -> Vec<Line<'static>> {
        let mut active: Vec<&Arc<Booking>> =
            self.bookings.iter().filter(|b| b.status.is_active()).collect();
        active.sort_by(|a, b| a.slot_key().cmp(&b.slot_key()));

        active
            .into_iter()
            .take(UPCOMING_LIMIT)
            .map(|b| {
                Line::from(vec![
                    Span::styled(format!("  {} ", b.date), Style::default().fg(theme::CORAL)),
                    Span::styled(
                        format!("{}-{}  ", b.start_time, b.end_time),
                        Style::default().fg(theme::LIGHT_BLUE),
                    ),
                    Span::styled(format!("{:<8}", b.room_code), theme::title_style()),
                    Span::styled(format!(" {}", b.organizer), theme::table_row()),
                ])
            })
            .collect()
    }
}

impl Component for OverviewScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RoomsUpdated(rooms) => self.rooms = Arc::clone(rooms),
            Action::BookingsUpdated(bookings) => self.bookings = Arc::clone(bookings),
            Action::ViewChanged(view) => self.loading = view.loading,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(5), // stat cards
            Constraint::Min(3),    // upcoming
            Constraint::Length(1), // hints
        ])
        .split(area);

        let stats = Stats::compute(&self.rooms, &self.bookings);
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(layout[0]);
        Self::render_card(frame, cards[0], "Rooms", stats.total_rooms, theme::NEON_CYAN);
        Self::render_card(
            frame,
            cards[1],
            "Available",
            stats.available_rooms,
            theme::SUCCESS_GREEN,
        );
        Self::render_card(
            frame,
            cards[2],
            "Active bookings",
            stats.active_bookings,
            theme::ELECTRIC_YELLOW,
        );
        Self::render_card(
            frame,
            cards[3],
            "Equipment",
            stats.equipment_items,
            theme::CORAL,
        );

        let block = Block::default()
            .title(" Upcoming ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(self.focused));
        let inner = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);

        let lines = if self.loading {
            vec![Line::from(Span::styled("  Loading…", theme::key_hint()))]
        } else {
            let lines = self.upcoming_lines();
            if lines.is_empty() {
                vec![Line::from(Span::styled("  No active bookings", theme::key_hint()))]
            } else {
                lines
            }
        };
        frame.render_widget(Paragraph::new(lines), inner);

        let hints = Line::from(vec![
            Span::styled("  r ", theme::key_hint_key()),
            Span::styled("reload  ", theme::key_hint()),
            Span::styled("x ", theme::key_hint_key()),
            Span::styled("export  ", theme::key_hint()),
            Span::styled("i ", theme::key_hint_key()),
            Span::styled("import", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
