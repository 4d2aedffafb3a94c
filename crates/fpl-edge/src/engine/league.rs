// Mini-league comparison: differentials, blocks and captaincy risk against a
// set of rival rosters.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::engine::scoring::{ScoredPlayer, ScoredPool};
use crate::snapshot::{Roster, StandingEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueError {
    #[error("no rivals found in this league to compare against")]
    NoRivalsFound,
}

/// The rival captain most likely to swing rank against the user.
#[derive(Debug, Clone, Serialize)]
pub struct CaptaincyRisk {
    pub captain_id: u32,
    /// Catalogue entry for the captain, when the catalogue knows the id.
    pub player: Option<ScoredPlayer>,
    /// How many rivals share this captain.
    pub rival_count: usize,
    /// True when the user's captain is someone else (or nobody).
    pub is_different: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueAnalysis {
    pub rivals_compared: usize,
    /// User-owned players no rival owns, in roster order.
    pub differentials: Vec<ScoredPlayer>,
    /// Players every rival owns and the user does not, in order of first
    /// appearance across the rivals.
    pub blocks: Vec<ScoredPlayer>,
    pub captaincy_risk: Option<CaptaincyRisk>,
}

/// Compare the user's roster against every rival.
///
/// Runs in time linear in the total number of picks, and is deterministic for
/// a fixed rival order.
pub fn analyze_league(
    user: &Roster,
    rivals: &[Roster],
    pool: &ScoredPool,
) -> Result<LeagueAnalysis, LeagueError> {
    if rivals.is_empty() {
        return Err(LeagueError::NoRivalsFound);
    }

    // Occurrences across rivals (each rival counted once per player), plus
    // first-appearance order for stable output.
    let mut counts: HashMap<u32, usize> = HashMap::new();
    let mut seen_order: Vec<u32> = Vec::new();
    for rival in rivals {
        let mut in_this_roster = HashSet::new();
        for id in rival.player_ids() {
            if !in_this_roster.insert(id) {
                continue;
            }
            let count = counts.entry(id).or_insert(0);
            if *count == 0 {
                seen_order.push(id);
            }
            *count += 1;
        }
    }

    let user_ids = user.owned_ids();

    let mut differentials = Vec::new();
    let mut emitted = HashSet::new();
    for id in user.player_ids() {
        if counts.get(&id).copied().unwrap_or(0) == 0 && emitted.insert(id) {
            if let Some(p) = pool.get(id) {
                differentials.push(p.clone());
            }
        }
    }

    let blocks = seen_order
        .iter()
        .filter(|id| counts[*id] == rivals.len() && !user_ids.contains(*id))
        .filter_map(|id| pool.get(*id).cloned())
        .collect();

    Ok(LeagueAnalysis {
        rivals_compared: rivals.len(),
        differentials,
        blocks,
        captaincy_risk: captaincy_risk(user, rivals, pool),
    })
}

/// Most common rival captain; ties go to the one seen first in rival order.
fn captaincy_risk(user: &Roster, rivals: &[Roster], pool: &ScoredPool) -> Option<CaptaincyRisk> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    let mut order: Vec<u32> = Vec::new();
    for captain in rivals.iter().filter_map(Roster::captain) {
        let count = counts.entry(captain).or_insert(0);
        if *count == 0 {
            order.push(captain);
        }
        *count += 1;
    }

    let mut top: Option<(u32, usize)> = None;
    for id in order {
        let count = counts[&id];
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((id, count));
        }
    }

    let (captain_id, rival_count) = top?;
    Some(CaptaincyRisk {
        captain_id,
        player: pool.get(captain_id).cloned(),
        rival_count,
        is_different: user.captain() != Some(captain_id),
    })
}

/// Pick up to `limit` rivals from rank-ordered standings, skipping the user's
/// own entry.
pub fn select_rivals(
    standings: &[StandingEntry],
    my_entry: u64,
    limit: usize,
) -> Vec<StandingEntry> {
    standings
        .iter()
        .filter(|s| s.entry != my_entry)
        .take(limit)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
