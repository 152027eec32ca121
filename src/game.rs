//! Per-tick game logic: intents in, field mutations out

use crate::error::Error;
use crate::field::{FallOutcome, GameField, Snapshot};
use crate::figure::ShiftDirection;
use tracing::{debug, info};

/// What the player asked for during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    pub shift: Option<ShiftDirection>,
    pub rotate: bool,
    pub boost: bool,
    pub quit: bool,
}

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Quit,
    GameOver,
}

/// Gravity cadence.
/// The figure falls when `loop_number % (ticks_per_fall / m) == 0`, where m
/// is the boost multiplier while boosting and 1 otherwise.
#[derive(Debug, Clone)]
pub struct LoopState {
    loop_number: u32,
    ticks_per_fall: u32,
    boost_multiplier: u32,
}

impl LoopState {
    pub fn new(ticks_per_fall: u32, boost_multiplier: u32) -> Result<Self, Error> {
        if ticks_per_fall == 0 {
            return Err(Error::InvalidArgument(
                "ticks_per_fall must be at least 1".to_string(),
            ));
        }
        if boost_multiplier == 0 || boost_multiplier > ticks_per_fall {
            return Err(Error::InvalidArgument(format!(
                "boost_multiplier must be in 1..={}, got {}",
                ticks_per_fall, boost_multiplier
            )));
        }
        Ok(Self {
            loop_number: 0,
            ticks_per_fall,
            boost_multiplier,
        })
    }

    /// Whether gravity applies this tick, then advance the counter
    fn advance(&mut self, boost: bool) -> bool {
        let multiplier = if boost { self.boost_multiplier } else { 1 };
        let due = self.loop_number % (self.ticks_per_fall / multiplier) == 0;
        self.loop_number = (self.loop_number + 1) % self.ticks_per_fall;
        due
    }
}

/// The main game struct
pub struct Game {
    pub field: GameField,
    loop_state: LoopState,
    pub state: GameState,
    /// Figures locked so far
    pub pieces_locked: u32,
    /// Rows cleared so far
    pub rows_cleared: u32,
}

impl Game {
    pub fn new(field: GameField, loop_state: LoopState) -> Self {
        Self {
            field,
            loop_state,
            state: GameState::Running,
            pieces_locked: 0,
            rows_cleared: 0,
        }
    }

    /// Run one tick: at most one shift, at most one rotation, then gravity
    /// on cadence. Ticks after the game has ended are ignored
    pub fn tick(&mut self, intent: &Intent) -> GameState {
        if self.state != GameState::Running {
            return self.state;
        }

        if let Some(direction) = intent.shift {
            self.field.try_shift_figure(direction);
        }

        if intent.rotate {
            self.field.try_rotate_figure();
        }

        if self.loop_state.advance(intent.boost) {
            if let FallOutcome::Locked { rows_cleared } = self.field.let_fall_down() {
                self.pieces_locked += 1;
                self.rows_cleared += rows_cleared as u32;
                debug!("Next figure {:?}", self.field.figure().form());
            }
        }

        if intent.quit {
            info!("Quit requested");
            self.state = GameState::Quit;
        } else if self.field.is_overfilled() {
            info!(
                "Game over after {} pieces, {} rows",
                self.pieces_locked, self.rows_cleared
            );
            self.state = GameState::GameOver;
        }

        if self.state != GameState::Running {
            debug!("Loop stopped at tick {}", self.loop_state.loop_number);
        }
        self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.field.snapshot()
    }
}
