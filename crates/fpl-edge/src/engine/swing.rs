// Alternative "swing" picks: the best players the user does not own.

use serde::Serialize;

use crate::engine::scoring::{ScoredPlayer, ScoredPool};
use crate::engine::{by_score_desc, StrategyMode};
use crate::snapshot::{PlayerStatus, Roster};

pub const SWING_PICK_COUNT: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct SwingPick {
    pub player: ScoredPlayer,
    pub why: Vec<String>,
}

fn is_eligible(p: &ScoredPlayer, mode: StrategyMode) -> bool {
    match mode {
        StrategyMode::Defend => p.player.status == PlayerStatus::Available,
        StrategyMode::Chase => p.chance >= 50,
    }
}

/// Top unowned picks for the mode, best first.
pub fn select_swing_picks(
    pool: &ScoredPool,
    roster: &Roster,
    mode: StrategyMode,
) -> Vec<SwingPick> {
    let owned = roster.owned_ids();
    let mut candidates: Vec<&ScoredPlayer> = pool
        .iter()
        .filter(|p| !owned.contains(&p.id()) && is_eligible(p, mode))
        .collect();
    candidates.sort_by(by_score_desc(mode));

    candidates
        .into_iter()
        .take(SWING_PICK_COUNT)
        .map(|p| SwingPick {
            player: p.clone(),
            why: vec![
                match mode {
                    StrategyMode::Defend => {
                        format!("{:.1}% ownership: a stable, consensus choice.", p.player.ownership)
                    }
                    StrategyMode::Chase => format!(
                        "Only {:.1}% ownership: a genuine differential.",
                        p.player.ownership
                    ),
                },
                format!(
                    "Fixture ease {}/5 with recent form {:.1}.",
                    p.ease, p.player.form
                ),
            ],
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringWeights;
    use crate::engine::scoring::tests::player;
    use crate::snapshot::{Catalogue, Player, Position, RosterPick};

    fn pool(players: Vec<Player>) -> ScoredPool {
        let catalogue = Catalogue {
            players,
            teams: vec![],
            gameweeks: vec![],
        };
        ScoredPool::from_snapshot(&catalogue, &[], &ScoringWeights::default())
    }

    fn roster(ids: &[u32]) -> Roster {
        Roster::new(
            1,
            ids.iter()
                .map(|&player_id| RosterPick {
                    player_id,
                    is_captain: false,
                })
                .collect(),
        )
        .unwrap()
    }

    fn owned_by(id: u32, ownership: f64) -> Player {
        let mut p = player(id, Position::Defender, 1);
        p.ownership = ownership;
        p
    }

    #[test]
    fn defend_top_three_by_safety_excluding_owned() {
        let players = (1..=6).map(|i| owned_by(i, f64::from(i) * 10.0)).collect();
        let picks = select_swing_picks(&pool(players), &roster(&[6]), StrategyMode::Defend);
        let ids: Vec<u32> = picks.iter().map(|p| p.player.id()).collect();
        assert_eq!(ids, vec![5, 4, 3]);
        assert!(picks.iter().all(|p| p.why.len() == 2));
    }

    #[test]
    fn defend_requires_available_status() {
        let mut doubtful = owned_by(1, 90.0);
        doubtful.status = PlayerStatus::Doubtful;
        doubtful.chance_of_playing = Some(100);
        let picks = select_swing_picks(
            &pool(vec![doubtful, owned_by(2, 10.0)]),
            &roster(&[]),
            StrategyMode::Defend,
        );
        let ids: Vec<u32> = picks.iter().map(|p| p.player.id()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn chase_ranks_by_swing_and_requires_chance() {
        let mut doubtful = owned_by(1, 1.0);
        doubtful.status = PlayerStatus::Doubtful;
        doubtful.chance_of_playing = Some(50);
        let mut injured = owned_by(2, 0.5);
        injured.chance_of_playing = Some(25);
        let template = owned_by(3, 80.0);

        let picks = select_swing_picks(
            &pool(vec![doubtful, injured, template]),
            &roster(&[]),
            StrategyMode::Chase,
        );
        let ids: Vec<u32> = picks.iter().map(|p| p.player.id()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(picks[0].why[0].starts_with("Only 1.0% ownership"));
    }

    #[test]
    fn empty_when_everything_owned() {
        let players = vec![owned_by(1, 10.0), owned_by(2, 20.0)];
        let picks = select_swing_picks(&pool(players), &roster(&[1, 2]), StrategyMode::Chase);
        assert!(picks.is_empty());
    }
}
