// Async snapshot loading.
//
// The engine itself never performs I/O. This module reads the bootstrap,
// fixture and roster payloads from disk and fans out rival roster fetches
// through the `RosterSource` seam, so a networked source can slot in without
// touching the engine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::catalogue::{self, Catalogue, Fixture, Roster, StandingEntry};
use super::SnapshotError;

// ---------------------------------------------------------------------------
// Roster source seam
// ---------------------------------------------------------------------------

/// Anything that can produce a manager's roster for a gameweek.
///
/// Retry and timeout policy belongs to the implementation; the fan-out in
/// [`fetch_rivals`] calls each source exactly once per rival.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_roster(&self, manager_id: u64, gameweek: u32) -> Result<Roster, SnapshotError>;
}

/// Reads `<dir>/<manager_id>.json` picks payloads.
#[derive(Debug, Clone)]
pub struct FileRosterSource {
    dir: PathBuf,
}

impl FileRosterSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileRosterSource { dir: dir.into() }
    }

    fn path_for(&self, manager_id: u64) -> PathBuf {
        self.dir.join(format!("{manager_id}.json"))
    }
}

#[async_trait]
impl RosterSource for FileRosterSource {
    async fn fetch_roster(&self, manager_id: u64, gameweek: u32) -> Result<Roster, SnapshotError> {
        let path = self.path_for(manager_id);
        debug!("loading roster for manager {manager_id} (gw {gameweek}) from {}", path.display());
        load_roster(&path, manager_id).await
    }
}

// ---------------------------------------------------------------------------
// File loaders
// ---------------------------------------------------------------------------

async fn read_file(path: &Path) -> Result<String, SnapshotError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

pub async fn load_catalogue(path: &Path) -> Result<Catalogue, SnapshotError> {
    let text = read_file(path).await?;
    let cat = catalogue::parse_catalogue(&text)?;
    info!(
        "Loaded catalogue: {} players, {} teams, {} gameweeks",
        cat.players.len(),
        cat.teams.len(),
        cat.gameweeks.len()
    );
    Ok(cat)
}

/// Load fixtures, keeping only `gameweek` when one is given.
pub async fn load_fixtures(
    path: &Path,
    gameweek: Option<u32>,
) -> Result<Vec<Fixture>, SnapshotError> {
    let text = read_file(path).await?;
    let all = catalogue::parse_fixtures(&text)?;
    let fixtures = match gameweek {
        Some(gw) => catalogue::fixtures_for_gameweek(&all, gw),
        None => all,
    };
    info!("Loaded {} fixtures", fixtures.len());
    Ok(fixtures)
}

pub async fn load_roster(path: &Path, manager_id: u64) -> Result<Roster, SnapshotError> {
    let text = read_file(path).await?;
    catalogue::parse_roster(manager_id, &text)
}

pub async fn load_standings(path: &Path) -> Result<Vec<StandingEntry>, SnapshotError> {
    let text = read_file(path).await?;
    catalogue::parse_standings(&text)
}

// ---------------------------------------------------------------------------
// Rival fan-out
// ---------------------------------------------------------------------------

/// Fetch every rival's roster concurrently.
///
/// The returned rosters follow the order of `rival_ids`. A rival whose fetch
/// fails is logged and dropped rather than failing the whole batch.
pub async fn fetch_rivals<S>(source: &S, rival_ids: &[u64], gameweek: u32) -> Vec<Roster>
where
    S: RosterSource + ?Sized,
{
    let fetches = rival_ids
        .iter()
        .map(|&id| async move { (id, source.fetch_roster(id, gameweek).await) });

    let mut rosters = Vec::with_capacity(rival_ids.len());
    for (id, result) in join_all(fetches).await {
        match result {
            Ok(roster) => rosters.push(roster),
            Err(e) => warn!("dropping rival {id}: {e}"),
        }
    }
    info!("Fetched {}/{} rival rosters", rosters.len(), rival_ids.len());
    rosters
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
