use std::fs::{self, OpenOptions};
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use skytrail_background::BackgroundState;
use skytrail_config::Settings;
use skytrail_core::EffectSelection;

mod pacer;

use pacer::FramePacer;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let settings = Settings::load().unwrap_or_else(|err| {
        log::warn!("failed to load config: {err}. Using defaults.");
        Settings::default()
    });

    let terminal = ratatui::init();
    let result = with_session(
        || execute!(io::stdout(), EnableMouseCapture, EnableFocusChange),
        || App::new(settings).run(terminal),
        || execute!(io::stdout(), DisableFocusChange, DisableMouseCapture),
    );
    ratatui::restore();
    result
}

/// Run `body` between `enter` and `leave`. `leave` runs even when `enter`
/// or `body` failed, and the first error is the one returned.
fn with_session<T>(
    enter: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> color_eyre::Result<T>,
    leave: impl FnOnce() -> io::Result<()>,
) -> color_eyre::Result<T> {
    let result = enter().map_err(color_eyre::Report::from).and_then(|()| body());
    let left = leave();
    let value = result?;
    left?;
    Ok(value)
}

/// Route `log` output to a file when `RUST_LOG` is set; the terminal is
/// occupied by the animation.
fn init_logging() -> color_eyre::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let Some(path) = Settings::log_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("logging to {}", path.display());
    Ok(())
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Which surfaces are shown.
    effects: EffectSelection,
    /// Both animations and the sprite they draw.
    background: BackgroundState,
    /// Time the animation started.
    started: Instant,
    /// Target time between frames.
    frame_interval: Duration,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(settings: Settings) -> Self {
        Self {
            running: false,
            effects: settings.display.effects,
            frame_interval: Duration::from_millis(settings.display.frame_interval_ms.max(1)),
            background: BackgroundState::new(settings),
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let mut pacer = FramePacer::new(self.frame_interval, Instant::now());
        while self.running {
            if pacer.is_due(Instant::now()) {
                terminal.draw(|frame| self.render(frame))?;
                pacer.advance(Instant::now());
            }
            self.handle_crossterm_events(pacer.timeout(Instant::now()))?;
        }
        Ok(())
    }

    /// Renders the background and the help line.
    fn render(&mut self, frame: &mut Frame) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.background.render(frame, elapsed_ms, self.effects);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Animation
            Constraint::Length(1), // Help text
        ])
        .split(frame.area());

        let help = Line::from(vec![
            "q".bold().fg(Color::Gray),
            " quit  ".dark_gray(),
            "e".bold().fg(Color::Gray),
            format!(" effects: {}", self.effects.name()).dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Waits up to `timeout` for input, then drains every event already
    /// queued. Drawing is left to the frame pacer.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if !event::poll(timeout)? {
            return Ok(());
        }
        loop {
            self.on_event(event::read()?);
            if !self.running || !event::poll(Duration::ZERO)? {
                return Ok(());
            }
        }
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            Event::FocusLost => self.background.pointer_left(),
            // Size changes are picked up on the next render.
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('e')) => self.cycle_effects(),
            _ => {}
        }
    }

    /// Feed pointer movement to the network's repulsion.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            self.background.pointer_moved(mouse.column, mouse.row);
        }
    }

    /// Cycle through the surface selections.
    fn cycle_effects(&mut self) {
        self.effects = self.effects.next();
        log::debug!("showing {}", self.effects.name());
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_session_leaves_after_failed_enter() {
        let ran = Cell::new(false);
        let left = Cell::new(false);
        let result = with_session(
            || Err(io::Error::other("no mouse capture")),
            || {
                ran.set(true);
                Ok(())
            },
            || {
                left.set(true);
                Ok(())
            },
        );
        assert!(result.is_err());
        assert!(!ran.get());
        assert!(left.get());
    }

    #[test]
    fn test_session_keeps_body_error_over_leave_error() {
        let result: color_eyre::Result<()> = with_session(
            || Ok(()),
            || Err(color_eyre::eyre::eyre!("draw failed")),
            || Err(io::Error::other("leave failed")),
        );
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "draw failed");
    }

    #[test]
    fn test_session_reports_leave_error() {
        let result = with_session(|| Ok(()), || Ok(7), || Err(io::Error::other("leave failed")));
        assert!(result.is_err());
    }

    #[test]
    fn test_session_returns_body_value() {
        let result = with_session(|| Ok(()), || Ok(7), || Ok(()));
        assert_eq!(result.unwrap(), 7);
    }
}
