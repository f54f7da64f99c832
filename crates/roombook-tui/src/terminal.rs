//! Terminal session: raw mode and alternate screen for as long as the
//! session lives, plus the key/resize input the app loop selects on.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tracing::warn;

/// Input the app reacts to. Everything else crossterm reports is dropped.
#[derive(Debug)]
pub enum Input {
    Key(KeyEvent),
    Resize,
}

pub struct Session {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input: EventStream,
}

impl Session {
    /// Take over the terminal. On failure it is handed back untouched.
    pub fn start() -> Result<Self> {
        Self::open().inspect_err(|_| restore())
    }

    fn open() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            input: EventStream::new(),
        })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn size(&self) -> Option<(u16, u16)> {
        self.terminal.size().ok().map(|s| (s.width, s.height))
    }

    /// Next key press or resize. `None` once stdin is gone.
    ///
    /// Cancel safe: an event is only taken off the stream when it is returned.
    pub async fn input(&mut self) -> Option<Input> {
        loop {
            match self.input.next().await? {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    return Some(Input::Key(key));
                }
                Ok(Event::Resize(..)) => return Some(Input::Resize),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    return None;
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        restore();
    }
}

/// Ignores errors so it can run from `Drop` and the panic hook.
fn restore() {
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// color-eyre reporting, with the terminal restored before a panic prints.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}
