// Snapshot model: catalogue, fixtures and rosters as handed to the engine,
// plus the async loader that reads them from disk.

pub mod catalogue;
pub mod loader;

use std::path::PathBuf;

pub use catalogue::{
    Catalogue, Fixture, Gameweek, Player, PlayerStatus, Position, Roster, RosterPick,
    StandingEntry, Team,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        source: serde_json::Error,
    },

    #[error("invalid snapshot data: {0}")]
    Invalid(String),
}
