// Strategy recommendation engine: fixture ease, player scoring, and the
// captain / transfer / swing / mini-league selectors built on top of it.
//
// Everything in here is a pure function of the snapshot passed in. No I/O,
// no caching across calls.

pub mod captain;
pub mod fixtures;
pub mod gameweek;
pub mod league;
pub mod scoring;
pub mod swing;
pub mod transfer;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::scoring::ScoredPlayer;

// ---------------------------------------------------------------------------
// Strategy mode
// ---------------------------------------------------------------------------

/// Which objective the recommendations optimize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyMode {
    /// Protect current rank: back the popular, reliable picks.
    #[serde(rename = "DEFEND", alias = "defend")]
    Defend,
    /// Chase rank gains: back scarce, high-upside picks.
    #[serde(rename = "CHASE", alias = "chase")]
    Chase,
}

impl StrategyMode {
    pub fn label(&self) -> &'static str {
        match self {
            StrategyMode::Defend => "DEFEND",
            StrategyMode::Chase => "CHASE",
        }
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Shared ordering helpers
// ---------------------------------------------------------------------------

/// Order two players by the active mode's score, highest first.
///
/// Used with the stable `sort_by`, so equal scores keep input order.
pub(crate) fn by_score_desc(
    mode: StrategyMode,
) -> impl Fn(&&ScoredPlayer, &&ScoredPlayer) -> Ordering {
    move |a: &&ScoredPlayer, b: &&ScoredPlayer| {
        b.score(mode)
            .partial_cmp(&a.score(mode))
            .unwrap_or(Ordering::Equal)
    }
}

/// Lowest active-mode score first.
pub(crate) fn by_score_asc(
    mode: StrategyMode,
) -> impl Fn(&&ScoredPlayer, &&ScoredPlayer) -> Ordering {
    move |a: &&ScoredPlayer, b: &&ScoredPlayer| {
        a.score(mode)
            .partial_cmp(&b.score(mode))
            .unwrap_or(Ordering::Equal)
    }
}
