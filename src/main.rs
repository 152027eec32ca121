//! BLOCKTRIS - a falling-block puzzle for the terminal

mod coord;
mod error;
mod field;
mod figure;
mod game;
mod input;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::Error;
use field::GameField;
use game::{Game, GameState};
use input::InputHandler;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    thread,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Input delay after game over to prevent accidental exit
const GAME_OVER_INPUT_DELAY: Duration = Duration::from_secs(1);

/// Get the blocktris temp directory, creating it if needed
fn log_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blocktris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> Result<(), Error> {
    let session_id: u32 = rand::random();
    let dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file: the terminal belongs to the game
    let file_appender = tracing_appender::rolling::never(&dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blocktris=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKTRIS starting up, session={:08x}, log={}",
        session_id,
        dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let seed = settings.gameplay.seed.unwrap_or_else(rand::random);
    tracing::info!("Seed {}", seed);

    let mut game = Game::new(GameField::new(seed), settings.loop_state()?);
    let mut input = InputHandler::from_settings(&settings);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &mut input, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        tracing::error!("Run loop failed: {}", e);
    }

    tracing::info!(
        "Shutting down: {:?}, {} pieces, {} rows",
        game.state,
        game.pieces_locked,
        game.rows_cleared
    );
    println!("\nThanks for playing BLOCKTRIS!");
    println!("Pieces: {} | Rows: {}", game.pieces_locked, game.rows_cleared);

    result
}

/// Poll input, tick, draw and sync to the frame rate until the game stops
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    input: &mut InputHandler,
    settings: &Settings,
) -> Result<(), Error> {
    let frame_duration = Duration::from_micros(1_000_000 / u64::from(settings.gameplay.fps));

    loop {
        let frame_start = Instant::now();

        // Drain pending events without blocking
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Release => input.key_up(key),
                    _ => input.key_down(key),
                }
            }
        }

        let state = game.tick(&input.take_intent());

        let snapshot = game.snapshot();
        let hud = ui::Hud {
            pieces_locked: game.pieces_locked,
            rows_cleared: game.rows_cleared,
            state,
        };
        terminal.draw(|frame| ui::render_game(frame, &snapshot, &hud, settings))?;

        match state {
            GameState::Running => {}
            GameState::Quit => return Ok(()),
            GameState::GameOver => return wait_for_key(),
        }

        if let Some(rest) = frame_duration.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

/// Block until a key is pressed after the game-over delay
fn wait_for_key() -> Result<(), Error> {
    let shown = Instant::now();
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && shown.elapsed() >= GAME_OVER_INPUT_DELAY {
                return Ok(());
            }
        }
    }
}
