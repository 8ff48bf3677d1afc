use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use thiserror::Error;

use crate::graphics::{CellCanvas, StrokeStyle};
use crate::session::Action;

/// Rows kept below the drawing area for the status panel
pub const STATUS_ROWS: u16 = 9;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("terminal too small: {cols}x{rows}")]
    TooSmall { cols: u16, rows: u16 },
}

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Control(Action),
    SelectNext,
    SelectPrev,
    Adjust(i32),
    Toggle(usize),
    Quit,
}

/// Terminal events the application reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
}

pub fn input_for(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) => Some(Input::Key(key)),
        Event::Resize(cols, rows) => Some(Input::Resize { cols, rows }),
        _ => None,
    }
}

/// Maps a key press to a command
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    let coarse = if key.modifiers.contains(KeyModifiers::SHIFT) {
        10
    } else {
        1
    };
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Control(Action::Start)),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
            Some(Command::Control(Action::PauseResume))
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Control(Action::Reset)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Up => Some(Command::SelectPrev),
        KeyCode::Down => Some(Command::SelectNext),
        KeyCode::Left => Some(Command::Adjust(-coarse)),
        KeyCode::Right => Some(Command::Adjust(coarse)),
        KeyCode::Char(c @ '1'..='6') => Some(Command::Toggle(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Terminal dimensions as (cols, rows)
pub fn terminal_size() -> Result<(u16, u16), TerminalError> {
    if let Some(size) = termsize::get() {
        return Ok((size.cols, size.rows));
    }
    Ok(terminal::size()?)
}

/// Raw-mode alternate screen; restored on drop
pub struct Terminal {
    out: io::Stdout,
}

impl Terminal {
    pub fn enter() -> Result<Self, TerminalError> {
        let (cols, rows) = terminal_size()?;
        if cols < 20 || rows < STATUS_ROWS + 5 {
            return Err(TerminalError::TooSmall { cols, rows });
        }
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Terminal { out })
    }

    /// Waits up to `timeout` for a key press or a resize
    pub fn next_input(&self, timeout: Duration) -> Result<Option<Input>, TerminalError> {
        if event::poll(timeout)? {
            return Ok(input_for(event::read()?));
        }
        Ok(None)
    }

    /// Blanks the whole screen, dropping whatever a larger frame left behind
    pub fn clear(&mut self) -> Result<(), TerminalError> {
        execute!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    /// Writes the canvas followed by the status lines
    pub fn present(&mut self, canvas: &CellCanvas, status: &[String]) -> Result<(), TerminalError> {
        for (row, cells) in canvas.lines().enumerate() {
            queue!(self.out, MoveTo(0, row as u16))?;
            let mut current = None;
            for cell in cells {
                let color = match cell.style {
                    StrokeStyle::Solid => Color::White,
                    StrokeStyle::Light => Color::DarkGrey,
                };
                if current != Some(color) {
                    queue!(self.out, SetForegroundColor(color))?;
                    current = Some(color);
                }
                queue!(self.out, Print(cell.glyph))?;
            }
        }
        queue!(self.out, ResetColor)?;
        let top = canvas.rows() as u16;
        for (i, line) in status.iter().enumerate() {
            queue!(
                self.out,
                MoveTo(0, top + i as u16),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
