//! Terminal Tetris driver
//!
//! Owns the frame loop: polls keys, feeds commands and the frame clock to
//! the engine, and draws the result.

mod input;
mod settings;
mod ui;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::{Input, InputHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tetris_engine::{timing::gravity_interval, Command, FrameClock, Game};
use tracing_subscriber::EnvFilter;
use ui::Hud;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Keys are ignored this long after game over so a held key doesn't restart
const GAME_OVER_INPUT_DELAY: Duration = Duration::from_secs(1);

/// Below this gravity interval, soft drop no longer suspends gravity
const SOFT_DROP_GRAVITY_FLOOR: Duration = Duration::from_millis(100);

/// Log directory under the system temp dir, created if needed
fn log_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("tetris-engine");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    let dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tetris_engine=debug,tetris=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "starting up, session={:08x}, log={}",
        session_id,
        dir.join(&log_file).display()
    );

    let settings = Settings::load();
    // First run: write the defaults out so there is a file to edit
    if Settings::settings_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = settings.save() {
            tracing::warn!("could not save settings: {}", e);
        }
    }

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal, &settings);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Ok(game) = &result {
        tracing::info!(
            score = game.points(),
            lines = game.lines_cleared(),
            "quit"
        );
        println!("Final Score: {}", game.points());
        println!("Level: {} | Lines: {}", game.level(), game.lines_cleared());
    }

    result.map(|_| ())
}

/// Everything the frame loop carries between frames
struct Session {
    game: Game,
    input: InputHandler,
    hud: Hud,
    clock: FrameClock,
    game_over_at: Option<Instant>,
}

impl Session {
    fn new(settings: &Settings, now: Instant) -> Self {
        Self {
            game: Game::new(),
            input: InputHandler::from_settings(settings),
            hud: Hud::new(settings.visual.clone()),
            clock: FrameClock::new(now),
            game_over_at: None,
        }
    }

    /// Handle a key press. Returns false when the player quits.
    fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let Some(pressed) = self.input.key_down(key, now) else {
            return true;
        };
        let cooling_down = self
            .game_over_at
            .is_some_and(|at| now.saturating_duration_since(at) < GAME_OVER_INPUT_DELAY);

        let command = match pressed {
            Input::Quit => return false,
            _ if cooling_down => None,
            Input::ToggleGhost if !self.game.is_game_over() => {
                self.hud.toggle_ghost();
                None
            }
            // Any key restarts after game over
            Input::ToggleGhost => Some(Command::Reset),
            Input::Game(command) => Some(command),
        };

        if let Some(command) = command {
            let was_over = self.game.is_game_over();
            self.game.apply(command, now);
            if was_over || command == Command::Reset {
                self.clock.restart(now);
                self.hud.clear_banner();
                self.input.clear();
                self.game_over_at = None;
            }
        }
        true
    }

    /// Auto-repeat, gravity and lock delay for one frame
    fn tick(&mut self, now: Instant) {
        if self.game.is_game_over() {
            // Swallow auto-repeats so a held key can't restart the game
            self.input.update(now);
            self.game_over_at.get_or_insert(now);
        } else {
            for command in self.input.update(now) {
                if self.game.is_game_over() {
                    break;
                }
                self.game.apply(command, now);
            }

            if self.input.is_soft_dropping()
                && gravity_interval(self.game.level()) >= SOFT_DROP_GRAVITY_FLOOR
            {
                self.clock.restart(now);
            }
            self.game.update(&mut self.clock, now);
        }

        self.hud.observe(&self.game, now);
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Game> {
    let mut session = Session::new(settings, Instant::now());

    loop {
        let now = Instant::now();
        terminal.draw(|frame| ui::render_game(frame, &session.game, &session.hud, now))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    session.input.key_up(key);
                } else if !session.on_key(key, Instant::now()) {
                    return Ok(session.game);
                }
            }
        }

        session.tick(Instant::now());
    }
}
