//! BLOCKFALL - a falling-block puzzle game for the terminal
//!
//! The engine in `game` is a pure function from (model, event) to
//! (model, command). This file is the scheduler around it: it measures time,
//! reads keys, fulfils piece requests and draws each snapshot.

mod board;
mod game;
mod input;
mod piece;
mod rng;
mod score;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, Event as TermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Command, Event, Model};
use input::{Input, InputHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use rng::PieceSource;
use settings::Settings;
use std::{
    collections::VecDeque,
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Holds the engine model and everything waiting to be fed to it
struct Scheduler {
    model: Model,
    pending: VecDeque<Event>,
    source: PieceSource,
}

impl Scheduler {
    fn new(source: PieceSource) -> Self {
        let (model, command) = Model::start();
        let mut scheduler = Self {
            model,
            pending: VecDeque::new(),
            source,
        };
        scheduler.execute(command);
        scheduler
    }

    /// Queue the side effect an update asked for. Piece ids are delivered as
    /// a separate event on a later pass, never inside the update that asked.
    fn execute(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::RequestPiece => {
                let id = self.source.next_id();
                tracing::debug!(id, "queued piece");
                self.pending.push_back(Event::PieceReady(id));
            }
        }
    }

    fn dispatch(&mut self, event: Event) {
        let model = std::mem::take(&mut self.model);
        let (model, command) = game::update(model, event);
        self.model = model;
        self.execute(command);
    }

    /// Deliver events queued before this pass
    fn drain_pending(&mut self) {
        for _ in 0..self.pending.len() {
            if let Some(event) = self.pending.pop_front() {
                self.dispatch(event);
            }
        }
    }
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    // Log to a file; the terminal belongs to the game
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockfall=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &settings);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Ok(model) = &result {
        println!("\nThanks for playing BLOCKFALL!");
        println!("Final Score: {}", model.score);
        println!("Level: {} | Lines: {} | Pieces: {}", model.level(), model.lines, model.pieces);
        tracing::info!(score = model.score, "shutting down");
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Model> {
    let frame_duration = Duration::from_micros(1_000_000 / settings.display.frame_rate() as u64);
    let input = InputHandler::from_settings(&settings.keys);
    let mut scheduler = Scheduler::new(PieceSource::from_seed(settings.game.seed));
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::render_game(frame, &scheduler.model, settings))?;

        scheduler.drain_pending();

        if event::poll(frame_duration)? {
            if let TermEvent::Key(key) = event::read()? {
                match input.translate(key) {
                    Some(Input::Quit) => return Ok(scheduler.model),
                    Some(Input::Game(event)) => scheduler.dispatch(event),
                    None => {}
                }
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last_tick).as_secs_f64() * 1000.0;
        last_tick = now;
        scheduler.dispatch(Event::Tick(delta));
    }
}
