//! Interactive prompts used by the setup flow.
//!
//! The decision core only sees the [`Prompter`] trait. [`TerminalPrompter`]
//! implements it with a crossterm dropdown for picking a profile and a raw-mode
//! line editor for hours. Esc skips a prompt (`Ok(None)`). Ctrl+C, or a
//! shutdown requested while a prompt is open, interrupts the whole setup.

use anyhow::{Context, Result};
use crossterm::{
    QueueableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::Print,
    terminal::{self, ClearType},
};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Rows of a dropdown shown at once; longer lists scroll.
const MENU_HEIGHT: usize = 10;

/// How often an open prompt checks for a pending shutdown.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Source of user answers during setup.
pub trait Prompter {
    /// Let the user choose one of `options`. `None` means cancelled.
    fn pick_one(&mut self, options: &[String], prompt: &str) -> Result<Option<String>>;

    /// Ask for an integer in `min..=max`. Invalid input is re-prompted;
    /// `None` means cancelled.
    fn prompt_integer(&mut self, prompt: &str, min: i64, max: i64) -> Result<Option<i64>>;

    /// True once the user asked to stop; no further prompts should be shown.
    fn interrupted(&self) -> bool {
        false
    }
}

/// Strictly parse `input` as an integer in `min..=max`.
///
/// Surrounding whitespace is ignored; anything else that is not a plain
/// integer (`"9am"`, `"9.5"`, `""`) is rejected with a user-facing message.
pub fn parse_bounded_integer(input: &str, min: i64, max: i64) -> Result<i64, String> {
    let message = || format!("Please enter a number between {min} and {max}");
    let value = input.trim().parse::<i64>().map_err(|_| message())?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(message())
    }
}

/// What a key press did to a dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Redraw,
    Select(usize),
    Cancel,
    Interrupt,
    Ignore,
}

/// Selection and scroll position of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MenuState {
    len: usize,
    height: usize,
    selected: usize,
    offset: usize,
}

impl MenuState {
    fn new(len: usize, height: usize) -> Self {
        Self {
            len,
            height: height.min(len).max(1),
            selected: 0,
            offset: 0,
        }
    }

    fn visible(&self) -> std::ops::Range<usize> {
        self.offset..(self.offset + self.height).min(self.len)
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.height {
            self.offset = self.selected + 1 - self.height;
        }
    }

    fn handle(&mut self, key: KeyEvent) -> MenuAction {
        if key.kind != KeyEventKind::Press {
            return MenuAction::Ignore;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let index = if self.selected == 0 {
                    self.len - 1
                } else {
                    self.selected - 1
                };
                self.select(index);
                MenuAction::Redraw
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select((self.selected + 1) % self.len);
                MenuAction::Redraw
            }
            KeyCode::PageUp => {
                self.select(self.selected.saturating_sub(self.height));
                MenuAction::Redraw
            }
            KeyCode::PageDown => {
                self.select((self.selected + self.height).min(self.len - 1));
                MenuAction::Redraw
            }
            KeyCode::Home => {
                self.select(0);
                MenuAction::Redraw
            }
            KeyCode::End => {
                self.select(self.len - 1);
                MenuAction::Redraw
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                MenuAction::Interrupt
            }
            KeyCode::Enter => MenuAction::Select(self.selected),
            KeyCode::Esc | KeyCode::Char('q') => MenuAction::Cancel,
            _ => MenuAction::Ignore,
        }
    }
}

/// What a key press did to an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineAction {
    Redraw,
    Submit(String),
    Cancel,
    Interrupt,
    Ignore,
}

/// A single editable input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LineInput {
    buffer: String,
}

impl LineInput {
    fn handle(&mut self, key: KeyEvent) -> LineAction {
        if key.kind != KeyEventKind::Press {
            return LineAction::Ignore;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => LineAction::Interrupt,
                KeyCode::Char('u') => {
                    self.buffer.clear();
                    LineAction::Redraw
                }
                _ => LineAction::Ignore,
            };
        }
        match key.code {
            KeyCode::Enter => LineAction::Submit(std::mem::take(&mut self.buffer)),
            KeyCode::Esc => LineAction::Cancel,
            KeyCode::Backspace => {
                self.buffer.pop();
                LineAction::Redraw
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.buffer.push(c);
                LineAction::Redraw
            }
            _ => LineAction::Ignore,
        }
    }
}

/// Outcome of one interactive read.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Response<T> {
    Answer(T),
    Skip,
    /// Ctrl+C pressed (`by_key`) or a shutdown became pending.
    Interrupt { by_key: bool },
}

/// Restores the terminal when a prompt ends, even on error.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.queue(cursor::Show);
        let _ = stdout.flush();
        let _ = terminal::disable_raw_mode();
    }
}

fn draw_menu(out: &mut impl Write, options: &[String], state: &MenuState) -> io::Result<()> {
    for index in state.visible() {
        out.queue(terminal::Clear(ClearType::CurrentLine))?;
        let marker = if index == state.selected { "▸" } else { " " };
        out.queue(Print(format!("┃ {marker} {}\r\n", options[index])))?;
    }
    let hidden = state.len - state.visible().len();
    out.queue(terminal::Clear(ClearType::CurrentLine))?;
    if hidden > 0 {
        out.queue(Print(format!(
            "┃   ({} of {}, ↑/↓ to scroll)\r\n",
            state.selected + 1,
            state.len
        )))?;
    } else {
        out.queue(Print("┃\r\n"))?;
    }
    out.flush()
}

/// Wait for the next key press. `None` means a shutdown is pending.
fn next_key(shutdown: Option<&AtomicBool>) -> Result<Option<KeyEvent>> {
    loop {
        if shutdown.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            return Ok(None);
        }
        if !event::poll(SHUTDOWN_POLL).context("Failed to poll for key press")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("Failed to read key press")? {
            return Ok(Some(key));
        }
    }
}

/// Show an arrow-key dropdown and return the chosen index.
fn show_dropdown_menu(options: &[String], shutdown: Option<&AtomicBool>) -> Result<Response<usize>> {
    if options.is_empty() {
        return Ok(Response::Skip);
    }

    let mut state = MenuState::new(options.len(), MENU_HEIGHT);
    let rows = state.height as u16 + 1;
    let mut stdout = io::stdout();

    let _guard = RawModeGuard::enable()?;
    stdout.queue(cursor::Hide)?;
    draw_menu(&mut stdout, options, &state)?;

    loop {
        let Some(key) = next_key(shutdown)? else {
            return Ok(Response::Interrupt { by_key: false });
        };
        match state.handle(key) {
            MenuAction::Redraw => {
                stdout.queue(cursor::MoveUp(rows))?;
                draw_menu(&mut stdout, options, &state)?;
            }
            MenuAction::Select(index) => return Ok(Response::Answer(index)),
            MenuAction::Cancel => return Ok(Response::Skip),
            MenuAction::Interrupt => return Ok(Response::Interrupt { by_key: true }),
            MenuAction::Ignore => {}
        }
    }
}

/// Read one line in raw mode, echoing it after `label`.
fn read_input_line(label: &str, shutdown: Option<&AtomicBool>) -> Result<Response<String>> {
    let mut input = LineInput::default();
    let mut stdout = io::stdout();

    let _guard = RawModeGuard::enable()?;
    let redraw = |out: &mut io::Stdout, input: &LineInput| -> io::Result<()> {
        out.queue(Print("\r"))?;
        out.queue(terminal::Clear(ClearType::CurrentLine))?;
        out.queue(Print(format!("{label}{}", input.buffer)))?;
        out.flush()
    };
    redraw(&mut stdout, &input)?;

    let response = loop {
        let Some(key) = next_key(shutdown)? else {
            break Response::Interrupt { by_key: false };
        };
        match input.handle(key) {
            LineAction::Redraw => redraw(&mut stdout, &input)?,
            LineAction::Submit(line) => break Response::Answer(line),
            LineAction::Cancel => break Response::Skip,
            LineAction::Interrupt => break Response::Interrupt { by_key: true },
            LineAction::Ignore => {}
        }
    };
    stdout.queue(Print("\r\n"))?;
    stdout.flush()?;
    Ok(response)
}

/// Terminal-backed prompter.
///
/// Without a terminal on stdin every prompt is treated as cancelled, which
/// leaves the schedule unconfigured until `themeshift configure` is run.
pub struct TerminalPrompter {
    interactive: bool,
    hinted: bool,
    shutdown: Option<Arc<AtomicBool>>,
    interrupted: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
            hinted: false,
            shutdown: None,
            interrupted: false,
        }
    }

    /// Close open prompts once `shutdown` is set.
    pub fn with_shutdown_flag(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn hint_non_interactive(&mut self) {
        if !self.hinted {
            log_pipe!();
            log_warning!("Cannot prompt for settings without a terminal");
            log_indented!("Run 'themeshift configure' in a terminal to finish setup");
            self.hinted = true;
        }
    }

    /// Record an interruption. Raw mode swallows Ctrl+C, so it is re-raised
    /// as SIGINT once the terminal is restored.
    fn interrupt(&mut self, by_key: bool) -> Result<()> {
        self.interrupted = true;
        log_decorated!("Setup interrupted");
        if by_key {
            nix::sys::signal::raise(nix::sys::signal::Signal::SIGINT)
                .context("Failed to raise SIGINT")?;
        }
        Ok(())
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn pick_one(&mut self, options: &[String], prompt: &str) -> Result<Option<String>> {
        if !self.interactive {
            self.hint_non_interactive();
            return Ok(None);
        }

        log_block_start!("{prompt}");
        log_indented!("↑/↓ or j/k to move, Enter to select, Esc to skip");
        match show_dropdown_menu(options, self.shutdown.as_deref())? {
            Response::Answer(index) => {
                let option = options[index].clone();
                log_decorated!("Selected: {option}");
                Ok(Some(option))
            }
            Response::Skip => {
                log_decorated!("Skipped");
                Ok(None)
            }
            Response::Interrupt { by_key } => {
                self.interrupt(by_key)?;
                Ok(None)
            }
        }
    }

    fn prompt_integer(&mut self, prompt: &str, min: i64, max: i64) -> Result<Option<i64>> {
        if !self.interactive {
            self.hint_non_interactive();
            return Ok(None);
        }

        log_pipe!();
        let label = format!("┣ {prompt} ({min}-{max}, empty or Esc to skip): ");
        loop {
            let line = match read_input_line(&label, self.shutdown.as_deref())? {
                Response::Answer(line) => line,
                Response::Skip => {
                    log_decorated!("Skipped");
                    return Ok(None);
                }
                Response::Interrupt { by_key } => {
                    self.interrupt(by_key)?;
                    return Ok(None);
                }
            };
            if line.trim().is_empty() {
                log_decorated!("Skipped");
                return Ok(None);
            }

            match parse_bounded_integer(&line, min, max) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => log_warning!("{message}"),
            }
        }
    }

    fn interrupted(&self) -> bool {
        self.interrupted
            || self
                .shutdown
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_parse_bounded_integer_accepts_range() {
        assert_eq!(parse_bounded_integer("0", 0, 23), Ok(0));
        assert_eq!(parse_bounded_integer(" 23\n", 0, 23), Ok(23));
    }

    #[test]
    fn test_parse_bounded_integer_rejects_invalid() {
        for input in ["", "24", "-1", "9am", "9.5", "nine"] {
            assert!(parse_bounded_integer(input, 0, 23).is_err(), "{input:?}");
        }
        assert_eq!(
            parse_bounded_integer("42", 0, 23),
            Err("Please enter a number between 0 and 23".to_string())
        );
    }

    #[test]
    fn test_menu_wraps_around() {
        let mut state = MenuState::new(3, MENU_HEIGHT);
        assert_eq!(state.handle(press(KeyCode::Up)), MenuAction::Redraw);
        assert_eq!(state.selected, 2);
        state.handle(press(KeyCode::Char('j')));
        assert_eq!(state.selected, 0);
        assert_eq!(state.handle(press(KeyCode::Enter)), MenuAction::Select(0));
    }

    #[test]
    fn test_menu_scrolls_long_lists() {
        let mut state = MenuState::new(25, 10);
        for _ in 0..12 {
            state.handle(press(KeyCode::Down));
        }
        assert_eq!(state.selected, 12);
        assert_eq!(state.visible(), 3..13);

        state.handle(press(KeyCode::Home));
        assert_eq!(state.visible(), 0..10);
        state.handle(press(KeyCode::End));
        assert_eq!(state.visible(), 15..25);
    }

    #[test]
    fn test_menu_cancel_keys() {
        let mut state = MenuState::new(2, MENU_HEIGHT);
        assert_eq!(state.handle(press(KeyCode::Esc)), MenuAction::Cancel);
        assert_eq!(state.handle(press(KeyCode::Char('q'))), MenuAction::Cancel);
        assert_eq!(state.handle(press(KeyCode::Char('c'))), MenuAction::Ignore);
    }

    #[test]
    fn test_ctrl_c_interrupts_menu_and_line() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut state = MenuState::new(2, MENU_HEIGHT);
        assert_eq!(state.handle(ctrl_c), MenuAction::Interrupt);

        let mut input = LineInput::default();
        input.handle(press(KeyCode::Char('1')));
        assert_eq!(input.handle(ctrl_c), LineAction::Interrupt);
    }

    #[test]
    fn test_line_input_editing() {
        let mut input = LineInput::default();
        for c in ['1', '9', 'x'] {
            assert_eq!(input.handle(press(KeyCode::Char(c))), LineAction::Redraw);
        }
        assert_eq!(input.handle(press(KeyCode::Backspace)), LineAction::Redraw);
        assert_eq!(
            input.handle(press(KeyCode::Enter)),
            LineAction::Submit("19".to_string())
        );
        assert_eq!(input.buffer, "");

        input.handle(press(KeyCode::Char('7')));
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(input.handle(ctrl_u), LineAction::Redraw);
        assert_eq!(input.buffer, "");
        assert_eq!(input.handle(press(KeyCode::Esc)), LineAction::Cancel);
    }

    #[test]
    fn test_pending_shutdown_closes_prompt_without_reading() {
        let shutdown = AtomicBool::new(true);
        assert_eq!(next_key(Some(&shutdown)).unwrap(), None);
    }

    #[test]
    fn test_shutdown_flag_marks_prompter_interrupted() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let prompter = TerminalPrompter::new().with_shutdown_flag(shutdown.clone());
        assert!(!prompter.interrupted());
        shutdown.store(true, Ordering::SeqCst);
        assert!(prompter.interrupted());
    }
}
