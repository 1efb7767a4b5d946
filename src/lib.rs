// Library interface for hangman
// This allows integration tests to access internal modules

pub mod cli;
pub mod game_state;
pub mod logging;
pub mod session;
pub mod stats;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use game_state::{Game, GameInterface, RoundSettings, Snapshot, UserAction, game_loop};
pub use session::{GameError, GameSession, GuessOutcome, RoundStatus};
pub use stats::{MemoryStats, Statistics, StatsFile, StatsStore};
