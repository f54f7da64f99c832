//! Keyboard-driven form: a column of labelled text and choice fields.
//!
//! Text editing is append/backspace only, the same hand-rolled input the
//! setup wizard uses. Choice fields cycle with ←/→ or Space.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme;

const LABEL_WIDTH: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldKind {
    Text,
    Choice { options: Vec<String>, selected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    label: &'static str,
    kind: FieldKind,
    value: String,
}

/// Result of feeding a key to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Close,
    Edited,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    title: String,
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            focus: 0,
        }
    }

    #[must_use]
    pub fn text(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            label,
            kind: FieldKind::Text,
            value: value.into(),
        });
        self
    }

    /// Add a choice field. `current` is preselected, falling back to the
    /// first option when it is not among `options`.
    #[must_use]
    pub fn choice(mut self, label: &'static str, options: Vec<String>, current: &str) -> Self {
        let selected = options.iter().position(|o| o == current).unwrap_or(0);
        let value = options.get(selected).cloned().unwrap_or_default();
        self.fields.push(Field {
            label,
            kind: FieldKind::Choice { options, selected },
            value,
        });
        self
    }

    /// Current value of the field with `label`, trimmed. Empty when absent.
    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map_or("", |f| f.value.trim())
    }

    pub fn focused_label(&self) -> Option<&'static str> {
        self.fields.get(self.focus).map(|f| f.label)
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        match key.code {
            KeyCode::Esc => return FormEvent::Close,
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return FormEvent::Ignored;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return FormEvent::Ignored;
            }
            _ => {}
        }

        let Some(field) = self.fields.get_mut(self.focus) else {
            return FormEvent::Ignored;
        };

        match &mut field.kind {
            FieldKind::Text => match key.code {
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    field.value.clear();
                    FormEvent::Edited
                }
                KeyCode::Char(c) => {
                    field.value.push(c);
                    FormEvent::Edited
                }
                KeyCode::Backspace => {
                    field.value.pop();
                    FormEvent::Edited
                }
                _ => FormEvent::Ignored,
            },
            FieldKind::Choice { options, selected } => {
                if options.is_empty() {
                    return FormEvent::Ignored;
                }
                let len = options.len();
                match key.code {
                    KeyCode::Right | KeyCode::Char(' ') => *selected = (*selected + 1) % len,
                    KeyCode::Left => *selected = (*selected + len - 1) % len,
                    _ => return FormEvent::Ignored,
                }
                field.value.clone_from(&options[*selected]);
                FormEvent::Edited
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let mut lines = vec![Line::from("")];
        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let marker = if focused { "▸ " } else { "  " };
            let value = match field.kind {
                FieldKind::Text if focused => format!("{}▏", field.value),
                FieldKind::Text => field.value.clone(),
                FieldKind::Choice { .. } => format!("◂ {} ▸", field.value),
            };
            lines.push(Line::from(vec![
                Span::styled(marker, theme::key_hint_key()),
                Span::styled(
                    format!("{:<LABEL_WIDTH$}", field.label),
                    theme::form_label(),
                ),
                Span::styled(
                    format!(" {value} "),
                    if focused {
                        theme::form_input_focused()
                    } else {
                        theme::form_input()
                    },
                ),
            ]));
            lines.push(Line::from(""));
        }
        frame.render_widget(Paragraph::new(lines), layout[0]);

        let hints = Line::from(vec![
            Span::styled("  Tab ", theme::key_hint_key()),
            Span::styled("next field  ", theme::key_hint()),
            Span::styled("←/→ ", theme::key_hint_key()),
            Span::styled("choose  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("save  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}
