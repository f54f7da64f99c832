//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use roombook_core::{Command, Controller, CoreError, Notice};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::terminal::{Input, Session};
use crate::theme;

const NOTICE_TTL: Duration = Duration::from_secs(4);
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// A notice in the status bar until it has been up for [`NOTICE_TTL`].
#[derive(Debug)]
struct Toast {
    notice: Notice,
    shown: Instant,
}

impl Toast {
    fn new(notice: Notice, shown: Instant) -> Self {
        Self { notice, shown }
    }

    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown) > NOTICE_TTL
    }
}

pub struct App {
    controller: Controller,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    loading: bool,
    help_visible: bool,
    /// Path being typed for an import, while the prompt is open.
    import_prompt: Option<String>,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    notification: Option<Toast>,
    counts: (usize, usize),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    bridge_cancel: CancellationToken,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            controller,
            active_screen: ScreenId::default(),
            screens: create_screens().into_iter().collect(),
            running: true,
            loading: false,
            help_visible: false,
            import_prompt: None,
            pending_confirm: None,
            notification: None,
            counts: (0, 0),
            action_tx,
            action_rx,
            bridge_cancel: CancellationToken::new(),
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop until quit.
    ///
    /// Input and actions are handled as they arrive; the screen is redrawn
    /// on the next frame tick after anything changed.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = Session::start()?;
        self.init_screens()?;

        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        let cancel = self.bridge_cancel.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
        });

        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut dirty = true;

        info!(size = ?session.size().unwrap_or((80, 24)), "TUI event loop started");

        while self.running {
            tokio::select! {
                input = session.input() => {
                    match input {
                        Some(Input::Key(key)) => {
                            if let Some(action) = self.handle_key_event(key)? {
                                self.action_tx.send(action)?;
                            }
                        }
                        Some(Input::Resize) => {}
                        None => break,
                    }
                    dirty = true;
                }
                Some(action) = self.action_rx.recv() => {
                    self.process_action(&action)?;
                    dirty = true;
                }
                _ = frames.tick() => {
                    if self.notification.take_if(|t| t.expired(Instant::now())).is_some() {
                        dirty = true;
                    }
                    if dirty {
                        session.draw(|frame| self.render(frame))?;
                        dirty = false;
                    }
                }
            }
        }

        self.bridge_cancel.cancel();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Modal overlays first, then an open
    /// form, then global keys, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if let Some(path) = self.import_prompt.as_mut() {
            return Ok(match key.code {
                KeyCode::Esc => {
                    self.import_prompt = None;
                    None
                }
                KeyCode::Enter => {
                    let path = std::mem::take(path);
                    self.import_prompt = None;
                    let path = path.trim();
                    (!path.is_empty()).then(|| Action::Import(PathBuf::from(path)))
                }
                KeyCode::Backspace => {
                    path.pop();
                    None
                }
                KeyCode::Char(c) => {
                    path.push(c);
                    None
                }
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let screen_captures = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());

        if !screen_captures {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char('?')) => {
                    return Ok(Some(Action::ToggleHelp));
                }
                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                    let n = u8::try_from(c).map_or(0, |b| b - b'0');
                    if let Some(screen) = ScreenId::from_number(n) {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                (KeyModifiers::NONE, KeyCode::Tab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
                }
                (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }
                (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Reload)),
                (KeyModifiers::NONE, KeyCode::Char('x')) => return Ok(Some(Action::Export)),
                (KeyModifiers::NONE, KeyCode::Char('i')) => {
                    self.import_prompt = Some(String::new());
                    return Ok(None);
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Process a single action: update app state, call the controller,
    /// propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                self.focus(*target);
                self.controller.navigate(target.section());
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Data from the controller ─────────────────────────────
            Action::RoomsUpdated(rooms) => {
                self.counts.0 = rooms.len();
                self.broadcast(action)?;
            }
            Action::BookingsUpdated(bookings) => {
                self.counts.1 = bookings.len();
                self.broadcast(action)?;
            }
            Action::ViewChanged(view) => {
                self.loading = view.loading;
                self.focus(ScreenId::from(view.section));
                self.broadcast(action)?;
            }
            Action::Notify(notice) => {
                self.notification = Some(Toast::new(notice.clone(), Instant::now()));
            }

            // ── Rooms ────────────────────────────────────────────────
            Action::NewRoom => self.controller.begin_create_room(),
            Action::EditRoom(room) => self.controller.begin_edit_room(room),
            Action::CloseRoomForm => self.controller.close_room_form(),
            Action::SubmitRoom(payload) => {
                let payload = payload.clone();
                self.spawn_call("save room", move |c| async move {
                    c.submit_room_form(&payload).await
                });
            }

            // ── Bookings ─────────────────────────────────────────────
            Action::NewBooking => self.controller.begin_create_booking(),
            Action::EditBooking(booking) => self.controller.begin_edit_booking(booking),
            Action::CloseBookingForm => self.controller.close_booking_form(),
            Action::ToggleBookingView => {
                let next = self.controller.view().booking_view.toggled();
                self.controller.set_booking_view(next);
            }
            Action::SubmitBooking(payload) => {
                let payload = payload.clone();
                self.spawn_call("save booking", move |c| async move {
                    c.submit_booking_form(&payload).await
                });
            }

            // ── Confirmation ─────────────────────────────────────────
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            // ── Data transfer ────────────────────────────────────────
            Action::Reload => self.execute_command(Command::Reload),
            Action::Export => self.spawn_call("export", |c| async move { c.export().await }),
            Action::Import(path) => {
                let path = path.clone();
                self.spawn_call("import", move |c| async move {
                    c.import_file(&path).await
                });
            }
        }

        Ok(())
    }

    fn focus(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Data updates go to every screen so inactive ones stay current.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Run a controller call off the render loop. The controller publishes
    /// its own notices, so failures are only logged here.
    fn spawn_call<F, Fut, T>(&self, what: &'static str, call: F)
    where
        F: FnOnce(Controller) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
        T: Send + 'static,
    {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            if let Err(e) = call(controller).await {
                warn!(error = %e, "{what} failed");
            }
        });
    }

    fn execute_command(&self, command: Command) {
        self.spawn_call("command", move |c| async move { c.execute(command).await });
    }

    fn execute_confirm(&self, confirm: ConfirmAction) {
        let command = match confirm {
            ConfirmAction::DeleteRoom { id, .. } => Command::DeleteRoom { id },
            ConfirmAction::CancelBooking { id, .. } => Command::CancelBooking { id },
            ConfirmAction::DeleteBooking { id, .. } => Command::DeleteBooking { id },
        };
        self.execute_command(command);
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some(path) = &self.import_prompt {
            Self::render_import_prompt(frame, area, path);
        }
        if let Some(confirm) = &self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Status bar: load state and counts on the left, then either the
    /// current notice or key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = if self.loading {
            Span::styled("◐ loading", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else {
            Span::styled(
                format!("● {} rooms · {} bookings", self.counts.0, self.counts.1),
                Style::default().fg(theme::SUCCESS_GREEN),
            )
        };

        let tail = match &self.notification {
            Some(Toast { notice, .. }) => {
                let color = theme::notice_color(notice.level);
                let icon = if notice.is_error() { "✗" } else { "✓" };
                vec![
                    Span::styled(" │ ", theme::key_hint()),
                    Span::styled(format!("{icon} {}", notice.message), Style::default().fg(color)),
                ]
            }
            None => vec![Span::styled(
                format!(" │ {}  ? help  q quit", self.controller.config().api_url),
                theme::key_hint(),
            )],
        };

        let mut spans = vec![Span::raw(" "), indicator];
        spans.extend(tail);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn overlay(frame: &mut Frame, area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let rect = Rect::new(area.x + x, area.y + y, width, height);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            rect,
        );
        rect
    }

    fn render_import_prompt(frame: &mut Frame, area: Rect, path: &str) {
        let prompt_area = Self::overlay(frame, area, 64, 5);
        let block = Block::default()
            .title(" Import JSON ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(prompt_area);
        frame.render_widget(block, prompt_area);

        let text = vec![
            Line::from(vec![
                Span::styled("  Path ", theme::form_label()),
                Span::styled(format!(" {path}▏"), theme::form_input_focused()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Enter ", theme::key_hint_key()),
                Span::styled("import    ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog_area = Self::overlay(frame, area, 56, 5);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = Self::overlay(frame, area, 56, 22);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };
        let heading = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };

        let help_text = vec![
            Line::from(""),
            heading("Navigation"),
            entry("1-3", "Jump to screen"),
            entry("Tab", "Next screen / next field"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("Esc", "Close form or dialog"),
            Line::from(""),
            heading("Rooms & bookings"),
            entry("n", "New"),
            entry("e Enter", "Edit selected"),
            entry("d", "Delete selected"),
            entry("c", "Cancel booking"),
            entry("v", "Table / schedule"),
            entry("Enter", "Save form"),
            Line::from(""),
            heading("Data"),
            entry("r", "Reload from server"),
            entry("x", "Export JSON"),
            entry("i", "Import JSON"),
            entry("q", "Quit"),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_stays_up_for_its_ttl() {
        let shown = Instant::now();
        let toast = Toast::new(Notice::success("Room 101 created"), shown);

        assert!(!toast.expired(shown));
        assert!(!toast.expired(shown + NOTICE_TTL));
        assert!(toast.expired(shown + NOTICE_TTL + Duration::from_millis(1)));
    }

    #[test]
    fn toast_ignores_clock_before_it_was_shown() {
        let earlier = Instant::now();
        let toast = Toast::new(Notice::error("boom"), earlier + Duration::from_secs(1));

        assert!(!toast.expired(earlier));
    }
}
