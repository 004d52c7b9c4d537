use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use backdrop_config::Config;
use backdrop_core::{EffectKind, InputEvent, Key, Surface};
use backdrop_effects::{Backdrop, TickOutcome};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};

mod canvas;
mod input;
mod logging;

use canvas::Raster;
use input::InputMapper;

/// Pointer-reactive animated backgrounds in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Effect to start with (see --list).
    #[arg(short, long)]
    effect: Option<EffectKind>,
    /// Random seed; a fixed seed replays the same animation.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Config file instead of the default location.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log level for the log file (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Print the available effects and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if cli.list {
        for kind in EffectKind::ALL {
            println!("{:<16}{}", kind.name(), kind.description());
        }
        return Ok(());
    }

    let log = logging::init(cli.log_level.as_deref().unwrap_or(logging::DEFAULT_LEVEL))?;
    let config = Config::load(cli.config.as_deref())?;
    if let (Some(log), None) = (&log, &cli.log_level) {
        log.set_level(&config.log_level)?;
    }

    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    let kind = cli.effect.unwrap_or(config.effect);
    tracing::info!(effect = %kind, seed, "starting");

    let (guard, terminal) = TerminalGuard::init()?;
    let result = App::new(kind, &config, seed).run(terminal);
    drop(guard);
    result
}

/// Restores the terminal and releases the mouse on every exit path.
struct TerminalGuard;

impl TerminalGuard {
    fn init() -> color_eyre::Result<(Self, DefaultTerminal)> {
        let terminal = ratatui::init();
        let guard = Self;
        execute!(io::stdout(), EnableMouseCapture)?;
        Ok((guard, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableMouseCapture);
        ratatui::restore();
    }
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    /// Effect session.
    backdrop: Backdrop,
    /// Surface the effect paints onto.
    raster: Raster,
    /// Mouse and attract-mode translation.
    mapper: InputMapper,
    /// Target time between frames.
    frame_interval: Duration,
    /// Show the key help line.
    show_help: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(kind: EffectKind, config: &Config, seed: u64) -> Self {
        let terminal = &config.terminal;
        Self {
            running: false,
            backdrop: Backdrop::new(kind, config.effects.clone(), seed),
            raster: Raster::new(terminal.cell_width, terminal.cell_height),
            mapper: InputMapper::new(terminal.cell_width, terminal.cell_height),
            frame_interval: config.frame_interval(),
            show_help: true,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.raster.resize(size.width, size.height);
        self.backdrop.attach(self.raster.width(), self.raster.height());

        self.running = true;
        while self.running {
            let frame_start = Instant::now();
            if self.backdrop.tick(Some(&mut self.raster)) == TickOutcome::Rendered {
                terminal.draw(|frame| self.render(frame))?;
            }
            self.handle_crossterm_events(frame_start + self.frame_interval)?;
        }
        self.backdrop.detach();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(&self.raster, area);

        if self.show_help {
            let [_, help_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            let help = Line::from(vec![
                self.backdrop.kind().name().bold(),
                "  q".bold(),
                " quit  ".dark_gray(),
                "n/p".bold(),
                " effect  ".dark_gray(),
                "a".bold(),
                " attract  ".dark_gray(),
                "h".bold(),
                " hide help".dark_gray(),
            ])
            .centered();
            frame.render_widget(help, help_area);
        }
    }

    /// Reads crossterm events until the frame deadline passes.
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        while self.running {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                break;
            };
            if !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => {
                    for event in self.mapper.map_mouse(mouse) {
                        self.backdrop.dispatch(&event);
                    }
                }
                Event::Resize(cols, rows) => {
                    self.raster.resize(cols, rows);
                    tracing::debug!(cells = ?self.raster.cells(), "terminal resized");
                    self.backdrop.dispatch(&InputEvent::Resize {
                        width: self.raster.width(),
                        height: self.raster.height(),
                    });
                }
                Event::FocusLost => self.backdrop.dispatch(&InputEvent::Leave),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('n')) => self.switch_effect(self.backdrop.kind().next()),
            (_, KeyCode::Char('p')) => self.switch_effect(self.backdrop.kind().prev()),
            (_, KeyCode::Char('a')) => {
                if let Some(event) = self.mapper.toggle_attract() {
                    self.backdrop.dispatch(&event);
                }
            }
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Swap effects, carrying a held attract mode over to the new one.
    fn switch_effect(&mut self, kind: EffectKind) {
        self.backdrop.switch(kind);
        if self.mapper.is_attracting() {
            self.backdrop.dispatch(&InputEvent::KeyDown(Key::Shift));
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
