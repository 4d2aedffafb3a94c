// Player scoring: projects every catalogue entry into a safety score
// (DEFEND), a swing score (CHASE) and a risk label.
//
// A `ScoredPool` is built once per request from the snapshot and handed to
// every selector, so all of them rank players with the same numbers. It is
// never cached: the same player scores differently as fixtures and form move.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::ScoringWeights;
use crate::engine::fixtures::{scaled_ease, EaseMap};
use crate::engine::StrategyMode;
use crate::snapshot::{Catalogue, Fixture, Player, PlayerStatus, Roster, Team};

// ---------------------------------------------------------------------------
// Risk label
// ---------------------------------------------------------------------------

/// Rotation / injury risk, derived purely from the resolved chance of playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// `< 50` HIGH, `50..75` MEDIUM, `>= 75` LOW.
    pub fn from_chance(chance: u8) -> Self {
        match chance {
            0..=49 => RiskLabel::High,
            50..=74 => RiskLabel::Medium,
            _ => RiskLabel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLabel::Low => "LOW",
            RiskLabel::Medium => "MEDIUM",
            RiskLabel::High => "HIGH",
        }
    }
}

/// Chance of playing: the published value when there is one, otherwise 100
/// for available players and 50 for everyone else.
pub fn resolve_chance(player: &Player) -> u8 {
    match player.chance_of_playing {
        Some(c) => c.min(100),
        None if player.status == PlayerStatus::Available => 100,
        None => 50,
    }
}

// ---------------------------------------------------------------------------
// Scored player
// ---------------------------------------------------------------------------

/// A catalogue player plus everything the selectors rank on.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub team_name: String,
    pub team_short: String,
    pub opponent_short: String,
    /// 1-5, higher is easier.
    pub ease: u8,
    /// `ease * 2`, 2-10.
    pub ease_scaled: u8,
    pub chance: u8,
    pub risk: RiskLabel,
    pub safety_score: f64,
    pub swing_score: f64,
}

impl ScoredPlayer {
    pub fn id(&self) -> u32 {
        self.player.id
    }

    pub fn name(&self) -> &str {
        &self.player.web_name
    }

    /// The score the given mode ranks on.
    pub fn score(&self, mode: StrategyMode) -> f64 {
        match mode {
            StrategyMode::Defend => self.safety_score,
            StrategyMode::Chase => self.swing_score,
        }
    }
}

/// Clamp to [0, 100] and round to a whole point.
fn finish_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0).round()
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Scores players against one gameweek's fixtures.
pub struct PlayerScorer<'a> {
    weights: &'a ScoringWeights,
    ease: &'a EaseMap,
    teams: HashMap<u32, &'a Team>,
}

impl<'a> PlayerScorer<'a> {
    pub fn new(weights: &'a ScoringWeights, ease: &'a EaseMap, teams: &'a [Team]) -> Self {
        PlayerScorer {
            weights,
            ease,
            teams: teams.iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn safety_score(&self, player: &Player, ease_scaled: u8, chance: u8) -> f64 {
        let w = &self.weights.safety;
        let raw = w.ownership * player.ownership
            + w.ppg * (player.points_per_game * 10.0)
            + w.form * (player.form * 10.0)
            + w.ease * f64::from(ease_scaled)
            + w.chance * f64::from(chance);
        finish_score(raw)
    }

    pub fn swing_score(&self, player: &Player, ease_scaled: u8, risk: RiskLabel) -> f64 {
        let w = &self.weights.swing;
        let penalty = match risk {
            RiskLabel::Low => 0.0,
            RiskLabel::Medium => w.medium_risk_penalty,
            RiskLabel::High => w.high_risk_penalty,
        };
        let raw = w.scarcity * (100.0 - player.ownership)
            + w.ppg * (player.points_per_game * 10.0)
            + w.form * (player.form * 10.0)
            + w.ease * f64::from(ease_scaled)
            - penalty;
        finish_score(raw)
    }

    pub fn score(&self, player: &Player) -> ScoredPlayer {
        let ease = self.ease.ease(player.team);
        let ease_scaled = scaled_ease(ease);
        let chance = resolve_chance(player);
        let risk = RiskLabel::from_chance(chance);

        let team = self.teams.get(&player.team);
        let opponent = self
            .ease
            .opponent(player.team)
            .and_then(|id| self.teams.get(&id));

        ScoredPlayer {
            player: player.clone(),
            team_name: team.map_or_else(|| "Unknown".to_string(), |t| t.name.clone()),
            team_short: team.map_or_else(|| "UNK".to_string(), |t| t.short_name.clone()),
            opponent_short: opponent.map_or_else(|| "TBC".to_string(), |t| t.short_name.clone()),
            ease,
            ease_scaled,
            chance,
            risk,
            safety_score: self.safety_score(player, ease_scaled, chance),
            swing_score: self.swing_score(player, ease_scaled, risk),
        }
    }
}

// ---------------------------------------------------------------------------
// Scored pool
// ---------------------------------------------------------------------------

/// Every catalogue player, scored, in catalogue order, with an id index.
#[derive(Debug, Clone, Default)]
pub struct ScoredPool {
    players: Vec<ScoredPlayer>,
    index: HashMap<u32, usize>,
}

impl ScoredPool {
    pub fn build(players: &[Player], scorer: &PlayerScorer<'_>) -> Self {
        let players: Vec<ScoredPlayer> = players.iter().map(|p| scorer.score(p)).collect();
        let index = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id(), i))
            .collect();
        debug!("scored {} players", players.len());
        ScoredPool { players, index }
    }

    /// Score a whole catalogue against a gameweek's fixtures.
    pub fn from_snapshot(
        catalogue: &Catalogue,
        fixtures: &[Fixture],
        weights: &ScoringWeights,
    ) -> Self {
        let ease = EaseMap::from_fixtures(fixtures);
        let scorer = PlayerScorer::new(weights, &ease, &catalogue.teams);
        Self::build(&catalogue.players, &scorer)
    }

    pub fn get(&self, id: u32) -> Option<&ScoredPlayer> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredPlayer> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// A roster's players in pick order. Ids missing from the catalogue are
    /// skipped.
    pub fn squad(&self, roster: &Roster) -> Vec<&ScoredPlayer> {
        roster.player_ids().filter_map(|id| self.get(id)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::snapshot::Position;

    pub(crate) fn player(id: u32, position: Position, team: u32) -> Player {
        Player {
            id,
            web_name: format!("P{id}"),
            position,
            team,
            cost: 60,
            ownership: 10.0,
            form: 4.0,
            points_per_game: 4.0,
            chance_of_playing: None,
            status: PlayerStatus::Available,
            minutes: 900,
            expected_points: None,
        }
    }

    fn teams() -> Vec<Team> {
        vec![
            Team {
                id: 1,
                short_name: "ARS".into(),
                name: "Arsenal".into(),
            },
            Team {
                id: 2,
                short_name: "CHE".into(),
                name: "Chelsea".into(),
            },
        ]
    }

    fn fixtures() -> Vec<Fixture> {
        vec![Fixture {
            gameweek: Some(1),
            home_team: 1,
            away_team: 2,
            home_difficulty: 2,
            away_difficulty: 4,
        }]
    }

    fn score_one(p: &Player) -> ScoredPlayer {
        let weights = ScoringWeights::default();
        let ease = EaseMap::from_fixtures(&fixtures());
        let teams = teams();
        PlayerScorer::new(&weights, &ease, &teams).score(p)
    }

    #[test]
    fn risk_label_boundaries() {
        assert_eq!(RiskLabel::from_chance(0), RiskLabel::High);
        assert_eq!(RiskLabel::from_chance(49), RiskLabel::High);
        assert_eq!(RiskLabel::from_chance(50), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_chance(74), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_chance(75), RiskLabel::Low);
        assert_eq!(RiskLabel::from_chance(100), RiskLabel::Low);
    }

    #[test]
    fn resolved_chance_defaults() {
        let mut p = player(1, Position::Midfielder, 1);
        assert_eq!(resolve_chance(&p), 100);
        p.status = PlayerStatus::Doubtful;
        assert_eq!(resolve_chance(&p), 50);
        p.chance_of_playing = Some(25);
        assert_eq!(resolve_chance(&p), 25);
        p.status = PlayerStatus::Available;
        p.chance_of_playing = Some(0);
        assert_eq!(resolve_chance(&p), 0);
    }

    #[test]
    fn safety_and_swing_formulas() {
        // Home side of a difficulty-2 fixture: ease 4, scaled 8.
        let mut p = player(1, Position::Forward, 1);
        p.ownership = 40.0;
        p.points_per_game = 6.0;
        p.form = 7.0;
        let s = score_one(&p);
        assert_eq!(s.ease, 4);
        assert_eq!(s.ease_scaled, 8);
        assert_eq!(s.chance, 100);
        assert_eq!(s.risk, RiskLabel::Low);
        // 18 + 12 + 10.5 + 0.8 + 10 = 51.3
        assert_eq!(s.safety_score, 51.0);
        // 27 + 12 + 10.5 + 1.2 - 0 = 50.7
        assert_eq!(s.swing_score, 51.0);
    }

    #[test]
    fn risk_penalty_applied_to_swing() {
        let mut p = player(1, Position::Forward, 2);
        p.ownership = 20.0;
        p.points_per_game = 5.0;
        p.form = 5.0;
        p.chance_of_playing = Some(50);
        let s = score_one(&p);
        // away side of difficulty 4: ease 2, scaled 4
        assert_eq!(s.risk, RiskLabel::Medium);
        // 36 + 10 + 7.5 + 0.6 - 8 = 46.1
        assert_eq!(s.swing_score, 46.0);

        p.chance_of_playing = Some(25);
        let s = score_one(&p);
        assert_eq!(s.risk, RiskLabel::High);
        // 36 + 10 + 7.5 + 0.6 - 18 = 36.1
        assert_eq!(s.swing_score, 36.0);
    }

    #[test]
    fn scores_clamped_at_extremes() {
        let extremes = [
            (0.0, 0.0, 0.0, Some(0)),
            (100.0, 0.0, 0.0, Some(0)),
            (0.0, 20.0, 20.0, Some(100)),
            (100.0, 20.0, 20.0, Some(100)),
            (100.0, -5.0, -5.0, Some(100)),
        ];
        for (own, ppg, form, chance) in extremes {
            let mut p = player(1, Position::Midfielder, 1);
            p.ownership = own;
            p.points_per_game = ppg;
            p.form = form;
            p.chance_of_playing = chance;
            let s = score_one(&p);
            assert!((0.0..=100.0).contains(&s.safety_score), "safety {}", s.safety_score);
            assert!((0.0..=100.0).contains(&s.swing_score), "swing {}", s.swing_score);
        }
    }

    #[test]
    fn high_penalty_on_zero_upside_floors_at_zero() {
        let mut p = player(1, Position::Midfielder, 2);
        p.ownership = 100.0;
        p.points_per_game = 0.0;
        p.form = 0.0;
        p.chance_of_playing = Some(0);
        let s = score_one(&p);
        assert_eq!(s.swing_score, 0.0);
    }

    #[test]
    fn team_and_opponent_names() {
        let s = score_one(&player(1, Position::Defender, 1));
        assert_eq!(s.team_short, "ARS");
        assert_eq!(s.team_name, "Arsenal");
        assert_eq!(s.opponent_short, "CHE");

        let blank = score_one(&player(2, Position::Defender, 9));
        assert_eq!(blank.team_short, "UNK");
        assert_eq!(blank.team_name, "Unknown");
        assert_eq!(blank.opponent_short, "TBC");
        assert_eq!(blank.ease, 3);
    }

    #[test]
    fn pool_indexes_and_resolves_squad() {
        let catalogue = Catalogue {
            players: vec![
                player(1, Position::Goalkeeper, 1),
                player(2, Position::Defender, 2),
                player(3, Position::Forward, 1),
            ],
            teams: teams(),
            gameweeks: vec![],
        };
        let pool = ScoredPool::from_snapshot(&catalogue, &fixtures(), &ScoringWeights::default());
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(2).map(|p| p.id()), Some(2));
        assert!(pool.get(99).is_none());

        let roster = Roster::new(
            5,
            vec![
                crate::snapshot::RosterPick {
                    player_id: 3,
                    is_captain: true,
                },
                crate::snapshot::RosterPick {
                    player_id: 99,
                    is_captain: false,
                },
                crate::snapshot::RosterPick {
                    player_id: 1,
                    is_captain: false,
                },
            ],
        )
        .unwrap();
        let squad: Vec<u32> = pool.squad(&roster).iter().map(|p| p.id()).collect();
        assert_eq!(squad, vec![3, 1]);
    }
}
