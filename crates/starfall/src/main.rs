mod cli;
mod logging;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use log::{info, warn};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::{Line, Span},
};
use starfall_background::{BackgroundOptions, BackgroundState};
use starfall_config::Config;

use cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init()?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let saved = Config::load_from(&config_path)?;

    let terminal = ratatui::init();
    session(
        || execute!(std::io::stdout(), EnableMouseCapture).map(|_| ()),
        || App::new(saved, &cli, config_path).run(terminal),
        || execute!(std::io::stdout(), DisableMouseCapture).map(|_| ()),
        ratatui::restore,
    )
}

/// Run `body` between `start` and `finish`. `restore` always runs last, so
/// the terminal is handed back even when setup fails.
fn session(
    start: impl FnOnce() -> std::io::Result<()>,
    body: impl FnOnce() -> color_eyre::Result<()>,
    finish: impl FnOnce() -> std::io::Result<()>,
    restore: impl FnOnce(),
) -> color_eyre::Result<()> {
    let result = match start() {
        Ok(()) => body(),
        Err(e) => Err(e.into()),
    };
    let released = finish();
    restore();
    result?;
    released?;
    Ok(())
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Config as read from disk, without command line overrides.
    saved: Config,
    /// Effective config for this run.
    config: Config,
    /// Where the config is written back on exit.
    config_path: PathBuf,
    /// Whether a key changed a persisted setting.
    dirty: bool,
    /// Layer animators.
    background: BackgroundState,
    /// Origin of frame timestamps.
    started: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(saved: Config, cli: &Cli, config_path: PathBuf) -> Self {
        let mut config = saved.clone();
        cli.apply(&mut config);

        let mut background = BackgroundState::new(BackgroundOptions {
            cell_width: config.display.cell_width,
            cell_height: config.display.cell_height,
            seed: config.display.seed,
            starfield: config.starfield,
            nebula: config.nebula,
            tech_lines: config.tech_lines,
        });
        background.set_layers(config.display.layers);
        background.set_motion(config.display.motion);

        Self {
            running: false,
            saved,
            config,
            config_path,
            dirty: false,
            background,
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        info!("running at {} fps", self.config.display.fps);
        while self.running {
            let deadline =
                Instant::now() + Duration::from_millis(self.config.display.frame_interval_ms());
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(deadline)?;
        }
        self.background.unmount();
        self.persist();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        self.background.render(frame, self.started.elapsed());

        if !self.config.display.show_help {
            return;
        }

        let chunks =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(frame.area());
        let accent = Color::Rgb(34, 211, 238);
        let state = |on: bool, label: &'static str| -> Span<'static> {
            if on {
                label.fg(accent)
            } else {
                label.dark_gray()
            }
        };

        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "m".bold().fg(accent),
            " motion ".dark_gray(),
            state(!self.background.motion().is_reduced(), "full"),
            "  l".bold().fg(accent),
            format!(" layers {}  ", self.background.layers()).dark_gray(),
            "p".bold().fg(accent),
            format!(" preset {}  ", self.config.display.preset).dark_gray(),
            "space".bold().fg(accent),
            " ".into(),
            state(self.background.is_paused(), "paused"),
        ])
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`] until the
    /// next frame is due.
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                // The next draw picks up the new frame area.
                Event::Resize(_, _) => {}
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
            (_, KeyCode::Char('m')) => self.toggle_motion(),
            (_, KeyCode::Char('l')) => self.cycle_layers(),
            (_, KeyCode::Char('p')) => self.cycle_preset(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('?')) => self.toggle_help(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            self.background.set_pointer(mouse.column, mouse.row);
        }
    }

    /// Toggle between full and reduced motion.
    fn toggle_motion(&mut self) {
        self.config.display.motion = self.config.display.motion.toggle();
        self.background.set_motion(self.config.display.motion);
        self.dirty = true;
    }

    /// Cycle through the layer selections.
    fn cycle_layers(&mut self) {
        self.config.display.layers = self.config.display.layers.next();
        self.background.set_layers(self.config.display.layers);
        self.dirty = true;
    }

    /// Cycle through the parameter presets.
    fn cycle_preset(&mut self) {
        let preset = self.config.display.preset.next();
        self.config.apply_preset(preset);
        self.background.apply_preset(preset);
        self.dirty = true;
    }

    fn toggle_pause(&mut self) {
        if self.background.is_paused() {
            self.background.resume();
        } else {
            self.background.pause();
        }
    }

    fn toggle_help(&mut self) {
        self.config.display.show_help = !self.config.display.show_help;
        self.dirty = true;
    }

    /// Write settings changed with keys back to the config file. Command
    /// line overrides are not persisted.
    fn persist(&self) {
        if !self.dirty {
            return;
        }
        let mut out = self.saved.clone();
        let display = self.config.display;
        if display.preset != out.display.preset {
            out.apply_preset(display.preset);
        }
        out.display.motion = display.motion;
        out.display.layers = display.layers;
        out.display.show_help = display.show_help;

        match out.save_to(&self.config_path) {
            Ok(()) => info!("saved settings to {}", self.config_path.display()),
            Err(e) => warn!("could not save settings: {e}"),
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
