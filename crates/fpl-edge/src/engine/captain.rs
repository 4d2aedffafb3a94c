// Captain selection.

use serde::Serialize;

use crate::engine::scoring::{ScoredPlayer, ScoredPool};
use crate::engine::{by_score_desc, StrategyMode};
use crate::snapshot::PlayerStatus;

/// Minutes above which a moderately doubtful player still counts as a
/// proven regular in CHASE mode.
pub const PROVEN_MINUTES: u32 = 500;

#[derive(Debug, Clone, Serialize)]
pub struct CaptainPick {
    pub player: ScoredPlayer,
    pub why: Vec<String>,
}

/// Whether a player may wear the armband under the given mode.
pub fn is_eligible(p: &ScoredPlayer, mode: StrategyMode) -> bool {
    if !p.player.position.is_attacking() || p.player.status == PlayerStatus::Injured {
        return false;
    }
    match mode {
        StrategyMode::Defend => p.chance >= 50,
        StrategyMode::Chase => {
            p.chance >= 75 || (p.player.minutes > PROVEN_MINUTES && p.chance >= 50)
        }
    }
}

/// Best eligible midfielder or forward by the mode's score. Ties go to the
/// earlier catalogue entry; `None` when nobody qualifies.
pub fn select_captain(pool: &ScoredPool, mode: StrategyMode) -> Option<CaptainPick> {
    let mut candidates: Vec<&ScoredPlayer> = pool.iter().filter(|p| is_eligible(p, mode)).collect();
    candidates.sort_by(by_score_desc(mode));
    let best = candidates.first()?;

    Some(CaptainPick {
        player: (*best).clone(),
        why: captain_reasons(best, mode),
    })
}

fn captain_reasons(p: &ScoredPlayer, mode: StrategyMode) -> Vec<String> {
    let own = p.player.ownership;
    match mode {
        StrategyMode::Defend => vec![
            format!("{own:.1}% ownership: protects your rank if they deliver."),
            format!("Fixture ease {}/5 against {}.", p.ease, p.opponent_short),
            format!(
                "Reliable: {:.1} points per game and a {}% chance of starting.",
                p.player.points_per_game, p.chance
            ),
        ],
        StrategyMode::Chase => vec![
            format!("{own:.1}% ownership: a haul means a big rank jump."),
            format!("Fixture upside: ease {}/5 against {}.", p.ease, p.opponent_short),
            format!("Form {:.1}: the upside worth chasing.", p.player.form),
        ],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
