// Catalogue, fixture and roster types, parsed from the provider's JSON shapes.
//
// The upstream bootstrap payload encodes several numeric stats as strings
// ("5.2"), and chance-of-playing as a nullable integer. Parsing normalizes
// both into plain Rust types so the engine never sees raw JSON.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::SnapshotError;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Squad position, keyed by the provider's `element_type` (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    /// Midfielders and forwards: the positions eligible for the armband.
    pub fn is_attacking(&self) -> bool {
        matches!(self, Position::Midfielder | Position::Forward)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Player status
// ---------------------------------------------------------------------------

/// Availability status as reported by the provider.
///
/// `Injured`, `Suspended` and `NotInSquad` are finer-grained forms of
/// unavailability; only `Available` counts as fit for buy/swing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Available,
    Doubtful,
    Injured,
    Suspended,
    Unavailable,
    NotInSquad,
}

impl PlayerStatus {
    /// Parse a provider status code (`a`, `d`, `i`, `s`, `u`, `n`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "a" => Some(PlayerStatus::Available),
            "d" => Some(PlayerStatus::Doubtful),
            "i" => Some(PlayerStatus::Injured),
            "s" => Some(PlayerStatus::Suspended),
            "u" => Some(PlayerStatus::Unavailable),
            "n" => Some(PlayerStatus::NotInSquad),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public snapshot types
// ---------------------------------------------------------------------------

/// A single catalogue entry. Immutable for the lifetime of a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: u32,
    pub web_name: String,
    pub position: Position,
    pub team: u32,
    /// Price in tenths of a currency unit (e.g. 75 = 7.5).
    pub cost: u32,
    /// Percent of managers selecting this player, 0-100.
    pub ownership: f64,
    pub form: f64,
    pub points_per_game: f64,
    /// Explicit chance of playing next round, when the provider publishes one.
    pub chance_of_playing: Option<u8>,
    pub status: PlayerStatus,
    pub minutes: u32,
    /// Provider's expected points for next round. Only the form-based
    /// transfer fallback reads this.
    pub expected_points: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub short_name: String,
    pub name: String,
}

/// One scheduled round, bounded by its roster-lock deadline.
#[derive(Debug, Clone, Serialize)]
pub struct Gameweek {
    pub id: u32,
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub is_current: bool,
    pub is_next: bool,
    pub finished: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fixture {
    /// Gameweek this fixture belongs to; `None` for unscheduled fixtures.
    pub gameweek: Option<u32>,
    pub home_team: u32,
    pub away_team: u32,
    pub home_difficulty: u8,
    pub away_difficulty: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterPick {
    pub player_id: u32,
    pub is_captain: bool,
}

/// One manager's squad for a gameweek, in pick order.
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    pub manager_id: u64,
    pub picks: Vec<RosterPick>,
}

impl Roster {
    /// Build a roster, rejecting more than one captain.
    pub fn new(manager_id: u64, picks: Vec<RosterPick>) -> Result<Self, SnapshotError> {
        let captains = picks.iter().filter(|p| p.is_captain).count();
        if captains > 1 {
            return Err(SnapshotError::Invalid(format!(
                "roster for manager {manager_id} has {captains} captains"
            )));
        }
        Ok(Roster { manager_id, picks })
    }

    pub fn player_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.picks.iter().map(|p| p.player_id)
    }

    pub fn owned_ids(&self) -> HashSet<u32> {
        self.player_ids().collect()
    }

    pub fn captain(&self) -> Option<u32> {
        self.picks.iter().find(|p| p.is_captain).map(|p| p.player_id)
    }
}

/// A row from a classic league's standings table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingEntry {
    pub entry: u64,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub entry_name: String,
    #[serde(default)]
    pub rank: u32,
}

/// Players, teams and gameweeks from one bootstrap snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub gameweeks: Vec<Gameweek>,
}

impl Catalogue {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Raw serde structs (private), provider format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawBootstrap {
    elements: Vec<RawElement>,
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    id: u32,
    web_name: String,
    element_type: u8,
    team: u32,
    now_cost: u32,
    #[serde(deserialize_with = "lenient_f64")]
    selected_by_percent: f64,
    #[serde(deserialize_with = "lenient_f64")]
    form: f64,
    #[serde(deserialize_with = "lenient_f64")]
    points_per_game: f64,
    #[serde(default)]
    chance_of_playing_next_round: Option<u8>,
    status: String,
    #[serde(default)]
    minutes: u32,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    ep_next: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: u32,
    #[serde(default)]
    name: String,
    deadline_time: DateTime<Utc>,
    #[serde(default)]
    is_current: bool,
    #[serde(default)]
    is_next: bool,
    #[serde(default)]
    finished: bool,
}

#[derive(Debug, Deserialize)]
struct RawFixture {
    #[serde(default)]
    event: Option<u32>,
    team_h: u32,
    team_a: u32,
    team_h_difficulty: u8,
    team_a_difficulty: u8,
}

#[derive(Debug, Deserialize)]
struct RawPicks {
    picks: Vec<RawPick>,
}

#[derive(Debug, Deserialize)]
struct RawPick {
    element: u32,
    #[serde(default)]
    is_captain: bool,
}

#[derive(Debug, Deserialize)]
struct RawLeague {
    standings: RawStandings,
}

#[derive(Debug, Deserialize)]
struct RawStandings {
    results: Vec<StandingEntry>,
}

/// The provider sends some stats as numbers and others as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
}

impl NumOrStr {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumOrStr::Num(n) => Ok(n),
            NumOrStr::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| E::custom(format!("invalid number {s:?}: {e}"))),
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumOrStr::deserialize(deserializer)?.into_f64()
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<NumOrStr>::deserialize(deserializer)? {
        Some(v) => v.into_f64().map(Some),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a bootstrap payload into a [`Catalogue`].
///
/// Elements with an unknown position are skipped with a warning; an unknown
/// status code degrades to [`PlayerStatus::Unavailable`].
pub fn parse_catalogue(text: &str) -> Result<Catalogue, SnapshotError> {
    let raw: RawBootstrap = serde_json::from_str(text).map_err(|e| SnapshotError::Parse {
        what: "bootstrap".into(),
        source: e,
    })?;

    let mut players = Vec::with_capacity(raw.elements.len());
    for el in raw.elements {
        let Some(position) = Position::from_element_type(el.element_type) else {
            warn!(
                "skipping player {} ({}): unknown element_type {}",
                el.id, el.web_name, el.element_type
            );
            continue;
        };
        let status = PlayerStatus::from_code(&el.status).unwrap_or_else(|| {
            warn!(
                "player {} ({}) has unknown status {:?}; treating as unavailable",
                el.id, el.web_name, el.status
            );
            PlayerStatus::Unavailable
        });
        players.push(Player {
            id: el.id,
            web_name: el.web_name,
            position,
            team: el.team,
            cost: el.now_cost,
            ownership: el.selected_by_percent,
            form: el.form,
            points_per_game: el.points_per_game,
            chance_of_playing: el.chance_of_playing_next_round.map(|c| c.min(100)),
            status,
            minutes: el.minutes,
            expected_points: el.ep_next,
        });
    }

    let gameweeks = raw
        .events
        .into_iter()
        .map(|ev| Gameweek {
            id: ev.id,
            name: ev.name,
            deadline: ev.deadline_time,
            is_current: ev.is_current,
            is_next: ev.is_next,
            finished: ev.finished,
        })
        .collect();

    Ok(Catalogue {
        players,
        teams: raw.teams,
        gameweeks,
    })
}

/// Parse a season's fixture list.
///
/// A difficulty outside 1-5 is kept and logged; ease mapping clamps it.
pub fn parse_fixtures(text: &str) -> Result<Vec<Fixture>, SnapshotError> {
    let raw: Vec<RawFixture> = serde_json::from_str(text).map_err(|e| SnapshotError::Parse {
        what: "fixtures".into(),
        source: e,
    })?;

    let fixtures = raw
        .into_iter()
        .map(|f| {
            for d in [f.team_h_difficulty, f.team_a_difficulty] {
                if !(1..=5).contains(&d) {
                    warn!(
                        "fixture {} v {} (gw {:?}) has difficulty {d}, expected 1-5",
                        f.team_h, f.team_a, f.event
                    );
                }
            }
            Fixture {
                gameweek: f.event,
                home_team: f.team_h,
                away_team: f.team_a,
                home_difficulty: f.team_h_difficulty,
                away_difficulty: f.team_a_difficulty,
            }
        })
        .collect();
    Ok(fixtures)
}

/// Keep only the fixtures scheduled in `gameweek`.
pub fn fixtures_for_gameweek(fixtures: &[Fixture], gameweek: u32) -> Vec<Fixture> {
    fixtures
        .iter()
        .filter(|f| f.gameweek == Some(gameweek))
        .cloned()
        .collect()
}

/// Parse a picks payload (`{"picks": [{"element": .., "is_captain": ..}]}`)
/// into a roster owned by `manager_id`.
pub fn parse_roster(manager_id: u64, text: &str) -> Result<Roster, SnapshotError> {
    let raw: RawPicks = serde_json::from_str(text).map_err(|e| SnapshotError::Parse {
        what: format!("picks for manager {manager_id}"),
        source: e,
    })?;
    let picks = raw
        .picks
        .into_iter()
        .map(|p| RosterPick {
            player_id: p.element,
            is_captain: p.is_captain,
        })
        .collect();
    Roster::new(manager_id, picks)
}

/// Parse a classic league standings payload, preserving rank order.
pub fn parse_standings(text: &str) -> Result<Vec<StandingEntry>, SnapshotError> {
    let raw: RawLeague = serde_json::from_str(text).map_err(|e| SnapshotError::Parse {
        what: "league standings".into(),
        source: e,
    })?;
    Ok(raw.standings.results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
