// Single-swap transfer search.
//
// The strategy-aware optimizer finds the weakest squad member for the active
// mode, then the best affordable same-position replacement. There is no bank
// balance in the snapshot, so affordability is a fixed buffer over the sell
// price. A form-only variant covers callers without a strategy mode.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::engine::scoring::{RiskLabel, ScoredPlayer, ScoredPool};
use crate::engine::{by_score_asc, by_score_desc, StrategyMode};
use crate::snapshot::{PlayerStatus, Roster};

/// Default spend over the sell price, in tenths (1.0 currency unit).
pub const DEFAULT_BUDGET_BUFFER: u32 = 10;

const DEFEND_SELL_BELOW: f64 = 40.0;
const CHASE_SELL_BELOW: f64 = 30.0;
const DEFEND_SELL_MAX_EASE: u8 = 2;
const CHASE_SELL_FORM_BELOW: f64 = 2.0;

#[derive(Debug, Clone, Serialize)]
pub struct TransferSuggestion {
    pub sell: ScoredPlayer,
    pub buy: ScoredPlayer,
    /// Gain in the active mode's score (`buy - sell`).
    pub impact: f64,
    pub risk: RiskLabel,
    pub why: Vec<String>,
}

// ---------------------------------------------------------------------------
// Strategy-aware optimizer
// ---------------------------------------------------------------------------

/// Whether a squad player is flagged for sale under the given mode.
pub fn is_sell_candidate(p: &ScoredPlayer, mode: StrategyMode) -> bool {
    match mode {
        StrategyMode::Defend => {
            p.safety_score < DEFEND_SELL_BELOW
                || p.risk == RiskLabel::High
                || p.ease <= DEFEND_SELL_MAX_EASE
        }
        StrategyMode::Chase => {
            p.swing_score < CHASE_SELL_BELOW
                || p.risk == RiskLabel::High
                || p.player.form < CHASE_SELL_FORM_BELOW
        }
    }
}

/// The squad player to sell: worst flagged player, else worst overall.
/// `None` only when the squad is empty.
pub fn select_sell<'a>(squad: &[&'a ScoredPlayer], mode: StrategyMode) -> Option<&'a ScoredPlayer> {
    let mut ranked: Vec<&ScoredPlayer> = squad.to_vec();
    ranked.sort_by(by_score_asc(mode));
    ranked
        .iter()
        .find(|p| is_sell_candidate(p, mode))
        .or_else(|| ranked.first())
        .copied()
}

/// Best available, unowned, same-position replacement costing at most
/// `sell.cost + budget_buffer`.
pub fn select_buy<'a>(
    pool: &'a ScoredPool,
    sell: &ScoredPlayer,
    owned: &HashSet<u32>,
    mode: StrategyMode,
    budget_buffer: u32,
) -> Option<&'a ScoredPlayer> {
    let max_cost = sell.player.cost.saturating_add(budget_buffer);
    let mut candidates: Vec<&ScoredPlayer> = pool
        .iter()
        .filter(|p| {
            p.player.position == sell.player.position
                && !owned.contains(&p.id())
                && p.player.status == PlayerStatus::Available
                && p.player.cost <= max_cost
        })
        .collect();
    candidates.sort_by(by_score_desc(mode));
    candidates.first().copied()
}

/// The single best swap for the roster, or `None` when the squad is empty or
/// no affordable replacement exists.
pub fn best_transfer(
    pool: &ScoredPool,
    roster: &Roster,
    mode: StrategyMode,
    budget_buffer: u32,
) -> Option<TransferSuggestion> {
    let squad = pool.squad(roster);
    let sell = select_sell(&squad, mode)?;
    let owned = roster.owned_ids();
    let Some(buy) = select_buy(pool, sell, &owned, mode, budget_buffer) else {
        debug!("no affordable replacement for {} ({})", sell.name(), sell.id());
        return None;
    };

    let impact = buy.score(mode) - sell.score(mode);
    let why = vec![
        match mode {
            StrategyMode::Defend => {
                format!("Selling {} due to low safety or a poor fixture.", sell.name())
            }
            StrategyMode::Chase => format!("Selling {} to find higher upside.", sell.name()),
        },
        format!("Buying {} changes your {mode} score by {impact:+.0} points.", buy.name()),
        if buy.chance < 75 {
            format!("Warning: {} carries moderate rotation risk.", buy.name())
        } else {
            format!("{} is a nailed-on starter.", buy.name())
        },
    ];

    Some(TransferSuggestion {
        sell: sell.clone(),
        buy: buy.clone(),
        impact,
        risk: buy.risk,
        why,
    })
}

// ---------------------------------------------------------------------------
// Form-based variant
// ---------------------------------------------------------------------------

const FORM_SELL_BELOW: f64 = 3.0;
const FORM_BUY_ABOVE: f64 = 5.0;

#[derive(Debug, Clone, Serialize)]
pub struct FormTransfer {
    pub sell: ScoredPlayer,
    pub buy: ScoredPlayer,
    /// `buy.form - sell.form`.
    pub projected_gain: f64,
}

fn by_form(a: &&ScoredPlayer, b: &&ScoredPlayer) -> Ordering {
    a.player.form.partial_cmp(&b.player.form).unwrap_or(Ordering::Equal)
}

/// Mode-independent swap on form alone, with no position or budget limits.
///
/// Sell the lowest-form squad player under 3.0 (else the first squad player);
/// buy the highest-form available outsider over 5.0 (else the outsider with
/// the most expected points next round).
pub fn form_transfer(pool: &ScoredPool, roster: &Roster) -> Option<FormTransfer> {
    let squad = pool.squad(roster);
    let owned = roster.owned_ids();

    let sell = squad
        .iter()
        .filter(|p| p.player.form < FORM_SELL_BELOW)
        .min_by(|a, b| by_form(a, b))
        .or_else(|| squad.first())
        .copied()?;

    // `max_by` keeps the last of equal maxima, so reverse the scan to keep
    // ties on the earliest catalogue entry.
    let outsiders: Vec<&ScoredPlayer> = pool.iter().filter(|p| !owned.contains(&p.id())).collect();
    let buy = outsiders
        .iter()
        .rev()
        .filter(|p| p.player.status == PlayerStatus::Available && p.player.form > FORM_BUY_ABOVE)
        .max_by(|a, b| by_form(a, b))
        .or_else(|| {
            outsiders.iter().rev().max_by(|a, b| {
                let ea = a.player.expected_points.unwrap_or(0.0);
                let eb = b.player.expected_points.unwrap_or(0.0);
                ea.partial_cmp(&eb).unwrap_or(Ordering::Equal)
            })
        })
        .copied()?;

    Some(FormTransfer {
        sell: sell.clone(),
        buy: buy.clone(),
        projected_gain: buy.player.form - sell.player.form,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
