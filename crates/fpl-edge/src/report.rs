// Strategy report: runs every engine component over one snapshot and renders
// the result as plain text or JSON.

use serde::Serialize;
use tracing::info;

use crate::config::{Config, ScoringWeights};
use crate::engine::captain::{select_captain, CaptainPick};
use crate::engine::gameweek::{GameweekInfo, DEFAULT_REMINDER_LEAD_HOURS};
use crate::engine::league::{analyze_league, LeagueAnalysis};
use crate::engine::scoring::{ScoredPlayer, ScoredPool};
use crate::engine::swing::{select_swing_picks, SwingPick};
use crate::engine::transfer::{
    best_transfer, form_transfer, FormTransfer, TransferSuggestion, DEFAULT_BUDGET_BUFFER,
};
use crate::engine::StrategyMode;
use crate::snapshot::{Catalogue, Fixture, Roster};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The knobs the engine reads, lifted out of [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub mode: StrategyMode,
    pub weights: ScoringWeights,
    pub budget_buffer: u32,
    pub reminder_lead_hours: i64,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        EngineSettings {
            mode: config.strategy.mode,
            weights: config.strategy.weights.clone(),
            budget_buffer: config.strategy.budget_buffer,
            reminder_lead_hours: config.strategy.reminder_lead_hours,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            mode: StrategyMode::Defend,
            weights: ScoringWeights::default(),
            budget_buffer: DEFAULT_BUDGET_BUFFER,
            reminder_lead_hours: DEFAULT_REMINDER_LEAD_HOURS,
        }
    }
}

/// One request's worth of snapshot data.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub catalogue: &'a Catalogue,
    /// Fixtures already scoped to the target gameweek.
    pub fixtures: &'a [Fixture],
    pub roster: &'a Roster,
    /// `None` when no league is configured; `Some(&[])` when one is
    /// configured but no rival roster could be loaded.
    pub rivals: Option<&'a [Roster]>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LeagueSection {
    Analysis(LeagueAnalysis),
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub mode: StrategyMode,
    pub gameweek: Option<GameweekInfo>,
    pub reminder_due: bool,
    pub captain: Option<CaptainPick>,
    pub transfer: Option<TransferSuggestion>,
    pub form_transfer: Option<FormTransfer>,
    pub swing_picks: Vec<SwingPick>,
    pub league: Option<LeagueSection>,
}

/// Score the catalogue once and run every selector against the shared pool.
///
/// Returns `None` when the catalogue has no players: there is nothing to
/// recommend and a half-filled report would be misleading.
pub fn build_report(
    inputs: ReportInputs<'_>,
    gameweek: Option<GameweekInfo>,
    settings: &EngineSettings,
) -> Option<StrategyReport> {
    if inputs.catalogue.is_empty() {
        return None;
    }
    let mode = settings.mode;
    let pool = ScoredPool::from_snapshot(inputs.catalogue, inputs.fixtures, &settings.weights);

    let league = inputs.rivals.map(|rivals| match analyze_league(inputs.roster, rivals, &pool) {
        Ok(analysis) => LeagueSection::Analysis(analysis),
        Err(e) => LeagueSection::Unavailable {
            reason: e.to_string(),
        },
    });

    let report = StrategyReport {
        mode,
        reminder_due: gameweek
            .as_ref()
            .is_some_and(|gw| gw.reminder_due(settings.reminder_lead_hours)),
        gameweek,
        captain: select_captain(&pool, mode),
        transfer: best_transfer(&pool, inputs.roster, mode, settings.budget_buffer),
        form_transfer: form_transfer(&pool, inputs.roster),
        swing_picks: select_swing_picks(&pool, inputs.roster, mode),
        league,
    };

    info!(
        "Built {} report over {} players: captain={}, transfer={}, {} swing picks",
        mode,
        pool.len(),
        report.captain.as_ref().map_or("none", |c| c.player.name()),
        report.transfer.is_some(),
        report.swing_picks.len()
    );
    Some(report)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn to_json(report: &StrategyReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

fn player_line(p: &ScoredPlayer, mode: StrategyMode) -> String {
    format!(
        "{} ({} {}, {:.1}m) vs {}, score {:.0}, risk {}",
        p.name(),
        p.team_short,
        p.player.position.display_str(),
        f64::from(p.player.cost) / 10.0,
        p.opponent_short,
        p.score(mode),
        p.risk.label(),
    )
}

fn push_reasons(out: &mut String, why: &[String]) {
    for line in why {
        out.push_str(&format!("    - {line}\n"));
    }
}

fn name_list(players: &[ScoredPlayer]) -> String {
    if players.is_empty() {
        return "none".to_string();
    }
    players.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ")
}

/// Human-readable report for the terminal.
pub fn render_text(report: &StrategyReport) -> String {
    let mode = report.mode;
    let mut out = String::with_capacity(1024);

    out.push_str(&format!("== Strategy report [{mode}] ==\n"));
    match &report.gameweek {
        Some(gw) => {
            out.push_str(&format!(
                "{}: deadline {} ({})",
                gw.name,
                gw.deadline.format("%a %d %b %H:%M UTC"),
                gw.time_left
            ));
            if gw.is_urgent {
                out.push_str(" URGENT");
            }
            out.push('\n');
        }
        None => out.push_str("No upcoming gameweek found.\n"),
    }
    if report.reminder_due {
        out.push_str("Reminder: the deadline is approaching, lock in your changes.\n");
    }
    out.push('\n');

    out.push_str("## CAPTAIN\n");
    match &report.captain {
        Some(pick) => {
            out.push_str(&format!("  {}\n", player_line(&pick.player, mode)));
            push_reasons(&mut out, &pick.why);
        }
        None => out.push_str("  No eligible captain.\n"),
    }
    out.push('\n');

    out.push_str("## TRANSFER\n");
    match &report.transfer {
        Some(t) => {
            out.push_str(&format!("  OUT {}\n", player_line(&t.sell, mode)));
            out.push_str(&format!("  IN  {}\n", player_line(&t.buy, mode)));
            out.push_str(&format!("  Impact {:+.0}, risk {}\n", t.impact, t.risk.label()));
            push_reasons(&mut out, &t.why);
        }
        None => out.push_str("  No affordable upgrade found.\n"),
    }
    if let Some(f) = &report.form_transfer {
        out.push_str(&format!(
            "  Form swap: {} ({:.1}) -> {} ({:.1}), gain {:+.1}\n",
            f.sell.name(),
            f.sell.player.form,
            f.buy.name(),
            f.buy.player.form,
            f.projected_gain
        ));
    }
    out.push('\n');

    out.push_str("## SWING PICKS\n");
    if report.swing_picks.is_empty() {
        out.push_str("  No eligible players outside your squad.\n");
    }
    for (i, pick) in report.swing_picks.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, player_line(&pick.player, mode)));
        push_reasons(&mut out, &pick.why);
    }

    if let Some(league) = &report.league {
        out.push('\n');
        out.push_str("## MINI-LEAGUE\n");
        match league {
            LeagueSection::Analysis(a) => {
                out.push_str(&format!("  Rivals compared: {}\n", a.rivals_compared));
                out.push_str(&format!("  Differentials: {}\n", name_list(&a.differentials)));
                out.push_str(&format!("  Blocks needed: {}\n", name_list(&a.blocks)));
                if let Some(risk) = &a.captaincy_risk {
                    let name = risk.player.as_ref().map_or_else(
                        || format!("player {}", risk.captain_id),
                        |p| p.name().to_string(),
                    );
                    out.push_str(&format!(
                        "  Rival captain: {} ({} of {} rivals){}\n",
                        name,
                        risk.rival_count,
                        a.rivals_compared,
                        if risk.is_different { ", differs from yours" } else { "" }
                    ));
                }
            }
            LeagueSection::Unavailable { reason } => {
                out.push_str(&format!("  Unavailable: {reason}\n"));
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gameweek::resolve_gameweek;
    use crate::engine::scoring::tests::player;
    use crate::snapshot::{Gameweek, Player, Position, RosterPick, Team};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn with(id: u32, position: Position, team: u32, ownership: f64, form: f64) -> Player {
        let mut p = player(id, position, team);
        p.ownership = ownership;
        p.form = form;
        p
    }

    fn catalogue(deadline_in: Duration) -> Catalogue {
        Catalogue {
            players: vec![
                with(1, Position::Forward, 1, 55.0, 6.0),
                with(2, Position::Midfielder, 2, 30.0, 1.5),
                with(3, Position::Midfielder, 1, 4.0, 7.5),
                with(4, Position::Defender, 2, 20.0, 3.0),
                with(5, Position::Midfielder, 2, 45.0, 5.5),
            ],
            teams: vec![
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
            ],
            gameweeks: vec![Gameweek {
                id: 8,
                name: "Gameweek 8".into(),
                deadline: now() + deadline_in,
                is_current: false,
                is_next: true,
                finished: false,
            }],
        }
    }

    fn fixtures() -> Vec<Fixture> {
        vec![Fixture {
            gameweek: Some(8),
            home_team: 1,
            away_team: 2,
            home_difficulty: 2,
            away_difficulty: 4,
        }]
    }

    fn roster(manager_id: u64, ids: &[u32], captain: u32) -> Roster {
        Roster::new(
            manager_id,
            ids.iter()
                .map(|&player_id| RosterPick {
                    player_id,
                    is_captain: player_id == captain,
                })
                .collect(),
        )
        .unwrap()
    }

    fn build(
        cat: &Catalogue,
        rivals: Option<&[Roster]>,
        settings: &EngineSettings,
    ) -> StrategyReport {
        let fixtures = fixtures();
        let mine = roster(1001, &[1, 2], 1);
        let gameweek = resolve_gameweek(&cat.gameweeks, now());
        build_report(
            ReportInputs {
                catalogue: cat,
                fixtures: &fixtures,
                roster: &mine,
                rivals,
            },
            gameweek,
            settings,
        )
        .unwrap()
    }

    #[test]
    fn empty_catalogue_gives_no_report() {
        let cat = Catalogue::default();
        let mine = roster(1, &[], 0);
        let report = build_report(
            ReportInputs {
                catalogue: &cat,
                fixtures: &[],
                roster: &mine,
                rivals: None,
            },
            None,
            &EngineSettings::default(),
        );
        assert!(report.is_none());
    }

    #[test]
    fn defend_report_fills_every_section() {
        let cat = catalogue(Duration::days(2));
        let report = build(&cat, None, &EngineSettings::default());

        assert_eq!(report.mode, StrategyMode::Defend);
        assert_eq!(report.gameweek.as_ref().map(|g| g.id), Some(8));
        assert!(!report.reminder_due);
        assert_eq!(report.captain.as_ref().map(|c| c.player.id()), Some(1));
        assert!(report.transfer.is_some());
        assert_eq!(report.swing_picks.len(), 3);
        assert!(report.swing_picks.iter().all(|p| ![1, 2].contains(&p.player.id())));
        assert!(report.league.is_none());

        // Player 2 is the only squad member under 3.0 form.
        let form = report.form_transfer.as_ref().unwrap();
        assert_eq!(form.sell.id(), 2);
        assert_eq!(form.buy.id(), 3);
    }

    #[test]
    fn reminder_due_at_configured_lead() {
        let cat = catalogue(Duration::hours(3) + Duration::minutes(10));
        let report = build(&cat, None, &EngineSettings::default());
        assert!(report.reminder_due);
        assert!(report.gameweek.as_ref().unwrap().is_urgent);
        assert!(render_text(&report).contains("URGENT"));
    }

    #[test]
    fn configured_league_without_rivals_is_unavailable() {
        let cat = catalogue(Duration::days(2));
        let report = build(&cat, Some(&[]), &EngineSettings::default());
        match report.league {
            Some(LeagueSection::Unavailable { reason }) => assert!(reason.contains("no rivals")),
            other => panic!("expected unavailable league section, got {other:?}"),
        }
    }

    #[test]
    fn league_analysis_included_with_rivals() {
        let cat = catalogue(Duration::days(2));
        let rivals = vec![roster(7, &[1, 5], 5), roster(9, &[5, 4], 5)];
        let report = build(&cat, Some(&rivals), &EngineSettings::default());
        let Some(LeagueSection::Analysis(analysis)) = &report.league else {
            panic!("expected league analysis");
        };
        assert_eq!(analysis.rivals_compared, 2);
        assert_eq!(analysis.differentials.iter().map(|p| p.id()).collect::<Vec<_>>(), vec![2]);
        assert_eq!(analysis.blocks.iter().map(|p| p.id()).collect::<Vec<_>>(), vec![5]);
        let risk = analysis.captaincy_risk.as_ref().unwrap();
        assert_eq!(risk.captain_id, 5);
        assert!(risk.is_different);

        let text = render_text(&report);
        assert!(text.contains("## MINI-LEAGUE"));
        assert!(text.contains("Blocks needed: P5"));
        assert!(text.contains("differs from yours"));
    }

    #[test]
    fn chase_mode_flows_through() {
        let cat = catalogue(Duration::days(2));
        let settings = EngineSettings {
            mode: StrategyMode::Chase,
            ..EngineSettings::default()
        };
        let report = build(&cat, None, &settings);
        assert_eq!(report.mode, StrategyMode::Chase);
        // Lowest ownership with the best form is the standout differential.
        assert_eq!(report.swing_picks[0].player.id(), 3);
        assert!(render_text(&report).starts_with("== Strategy report [CHASE] =="));
    }

    #[test]
    fn json_output_is_tagged() {
        let cat = catalogue(Duration::days(2));
        let rivals = vec![roster(7, &[1], 1)];
        let report = build(&cat, Some(&rivals), &EngineSettings::default());
        let json = to_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "DEFEND");
        assert_eq!(value["gameweek"]["id"], 8);
        assert_eq!(value["league"]["status"], "analysis");
        assert_eq!(value["captain"]["player"]["web_name"], "P1");
        assert_eq!(value["captain"]["player"]["team_short"], "ARS");
        assert_eq!(value["captain"]["player"]["risk"], "LOW");
    }
}
