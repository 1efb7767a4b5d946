use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

const STATS_DIR: &str = "hangman";
const STATS_FILE: &str = "leaderboard.json";

/// Cumulative results across every round ever played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub games_won: u64,
    pub games_lost: u64,
    pub total_games: u64,
}

impl Statistics {
    /// Count one more round. Leaves the record untouched if a counter would
    /// overflow.
    pub fn record(&mut self, won: bool) -> Result<(), StatsError> {
        let mut next = *self;
        let counter = if won {
            &mut next.games_won
        } else {
            &mut next.games_lost
        };
        *counter = counter.checked_add(1).ok_or(StatsError::Overflow)?;
        next.total_games = next
            .total_games
            .checked_add(1)
            .ok_or(StatsError::Overflow)?;
        *self = next;
        Ok(())
    }

    /// Percentage of rounds won, 0.0 when nothing has been played yet.
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        self.games_won as f64 / self.total_games.max(1) as f64 * 100.0
    }

    fn is_consistent(&self) -> bool {
        self.games_won.checked_add(self.games_lost) == Some(self.total_games)
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("statistics I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("statistics file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not replace statistics file: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error(
        "statistics file is inconsistent: {games_won} won + {games_lost} lost != {total_games} total"
    )]
    Inconsistent {
        games_won: u64,
        games_lost: u64,
        total_games: u64,
    },
    #[error("statistics counters are full")]
    Overflow,
}

/// Where round results go once a round concludes.
///
/// `record_result` must not return until the update is durable.
pub trait StatsStore {
    fn statistics(&self) -> Statistics;
    fn record_result(&mut self, won: bool) -> Result<Statistics, StatsError>;
}

/// Statistics kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStats {
    stats: Statistics,
}

impl StatsStore for MemoryStats {
    fn statistics(&self) -> Statistics {
        self.stats
    }

    fn record_result(&mut self, won: bool) -> Result<Statistics, StatsError> {
        self.stats.record(won)?;
        Ok(self.stats)
    }
}

/// JSON-file backed statistics. Every write replaces the file atomically.
#[derive(Debug)]
pub struct StatsFile {
    path: PathBuf,
    stats: Statistics,
}

impl StatsFile {
    /// Load the record at `path`, creating a zeroed one if none exists.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StatsError> {
        let path = path.into();
        let stats = match read_statistics(&path) {
            Ok(stats) => stats,
            Err(StatsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No statistics at {}, starting fresh", path.display());
                let stats = Statistics::default();
                write_statistics(&path, &stats)?;
                stats
            }
            Err(e) => return Err(e),
        };
        log::debug!("Loaded statistics from {}: {:?}", path.display(), stats);
        Ok(Self { path, stats })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for StatsFile {
    fn statistics(&self) -> Statistics {
        self.stats
    }

    fn record_result(&mut self, won: bool) -> Result<Statistics, StatsError> {
        let mut updated = self.stats;
        updated.record(won)?;
        write_statistics(&self.path, &updated)?;
        self.stats = updated;
        log::info!(
            "Recorded {} ({} won / {} lost / {} total)",
            if won { "win" } else { "loss" },
            updated.games_won,
            updated.games_lost,
            updated.total_games
        );
        Ok(updated)
    }
}

/// Default statistics location under the platform data directory, or the
/// working directory if the platform has none.
pub fn default_stats_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(STATS_FILE),
        |dir| dir.join(STATS_DIR).join(STATS_FILE),
    )
}

pub fn read_statistics(path: &Path) -> Result<Statistics, StatsError> {
    let file = File::open(path)?;
    let stats: Statistics = serde_json::from_reader(BufReader::new(file))?;
    if !stats.is_consistent() {
        return Err(StatsError::Inconsistent {
            games_won: stats.games_won,
            games_lost: stats.games_lost,
            total_games: stats.total_games,
        });
    }
    Ok(stats)
}

pub fn write_statistics(path: &Path, stats: &Statistics) -> Result<(), StatsError> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, stats)?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(())
}
