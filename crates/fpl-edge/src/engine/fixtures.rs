// Fixture ease lookup: turns one gameweek's fixture list into a per-team
// favorability score (1 = hardest, 5 = easiest).

use std::collections::HashMap;

use serde::Serialize;

use crate::snapshot::Fixture;

/// Ease assumed for a team with no fixture this gameweek (blank).
pub const NEUTRAL_EASE: u8 = 3;

/// A team's single fixture for the gameweek, seen from that team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamFixture {
    pub opponent: u32,
    pub difficulty: u8,
    pub is_home: bool,
}

/// Invert a 1-5 difficulty rating into a 1-5 ease rating.
pub fn ease_from_difficulty(difficulty: u8) -> u8 {
    (6 - i16::from(difficulty)).clamp(1, 5) as u8
}

/// Ease on the doubled 2-10 scale the scoring formulas use.
pub fn scaled_ease(ease: u8) -> u8 {
    ease * 2
}

/// Team id → fixture for one gameweek.
#[derive(Debug, Clone, Default)]
pub struct EaseMap {
    by_team: HashMap<u32, TeamFixture>,
}

impl EaseMap {
    /// Build the lookup. When a team plays twice, the later fixture in list
    /// order wins.
    pub fn from_fixtures(fixtures: &[Fixture]) -> Self {
        let mut by_team = HashMap::with_capacity(fixtures.len() * 2);
        for f in fixtures {
            by_team.insert(
                f.home_team,
                TeamFixture {
                    opponent: f.away_team,
                    difficulty: f.home_difficulty,
                    is_home: true,
                },
            );
            by_team.insert(
                f.away_team,
                TeamFixture {
                    opponent: f.home_team,
                    difficulty: f.away_difficulty,
                    is_home: false,
                },
            );
        }
        EaseMap { by_team }
    }

    pub fn fixture(&self, team: u32) -> Option<&TeamFixture> {
        self.by_team.get(&team)
    }

    pub fn ease(&self, team: u32) -> u8 {
        self.fixture(team)
            .map(|f| ease_from_difficulty(f.difficulty))
            .unwrap_or(NEUTRAL_EASE)
    }

    pub fn opponent(&self, team: u32) -> Option<u32> {
        self.fixture(team).map(|f| f.opponent)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
