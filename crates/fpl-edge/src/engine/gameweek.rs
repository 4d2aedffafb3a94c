// Target gameweek resolution and deadline urgency.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::snapshot::Gameweek;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_MINUTE: i64 = 60 * 1000;

/// Deadlines closer than this are flagged urgent.
pub const URGENT_WINDOW_HOURS: i64 = 6;

/// Hours before the deadline at which a reminder falls due, unless configured.
pub const DEFAULT_REMINDER_LEAD_HOURS: i64 = 3;

/// Display and urgency metadata for the gameweek being planned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameweekInfo {
    pub id: u32,
    pub name: String,
    pub deadline: DateTime<Utc>,
    /// `"{h}h {m}m"` while the deadline is ahead, `"Expired"` once it passes.
    pub time_left: String,
    /// Whole hours left (floored); 0 once the deadline has passed.
    pub hours_remaining: i64,
    /// Milliseconds until the deadline; negative once it has passed.
    pub remaining_ms: i64,
    pub is_urgent: bool,
}

impl GameweekInfo {
    pub fn is_expired(&self) -> bool {
        self.remaining_ms <= 0
    }

    /// Whether a reminder sent `lead_hours` before the deadline is due now.
    pub fn reminder_due(&self, lead_hours: i64) -> bool {
        !self.is_expired() && self.hours_remaining == lead_hours
    }
}

/// Pick the gameweek to plan for: the one flagged next, else the current one.
///
/// Returns `None` when neither flag is set anywhere; callers treat that as
/// "nothing to plan", not as a failure.
pub fn resolve_gameweek(gameweeks: &[Gameweek], now: DateTime<Utc>) -> Option<GameweekInfo> {
    let target = gameweeks
        .iter()
        .find(|gw| gw.is_next)
        .or_else(|| gameweeks.iter().find(|gw| gw.is_current))?;

    let remaining_ms = (target.deadline - now).num_milliseconds();

    let (time_left, hours_remaining) = if remaining_ms > 0 {
        let hours = remaining_ms / MS_PER_HOUR;
        let mins = (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE;
        (format!("{hours}h {mins}m"), hours)
    } else {
        ("Expired".to_string(), 0)
    };

    Some(GameweekInfo {
        id: target.id,
        name: target.name.clone(),
        deadline: target.deadline,
        time_left,
        hours_remaining,
        remaining_ms,
        is_urgent: remaining_ms > 0 && remaining_ms < URGENT_WINDOW_HOURS * MS_PER_HOUR,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn gw(id: u32, deadline: DateTime<Utc>, is_current: bool, is_next: bool) -> Gameweek {
        Gameweek {
            id,
            name: format!("Gameweek {id}"),
            deadline,
            is_current,
            is_next,
            finished: false,
        }
    }

    fn resolve_at(offset: Duration) -> GameweekInfo {
        let gws = vec![gw(8, now() + offset, false, true)];
        resolve_gameweek(&gws, now()).unwrap()
    }

    #[test]
    fn prefers_next_over_current() {
        let gws = vec![
            gw(7, now() - Duration::days(3), true, false),
            gw(8, now() + Duration::days(4), false, true),
        ];
        let info = resolve_gameweek(&gws, now()).unwrap();
        assert_eq!(info.id, 8);
    }

    #[test]
    fn falls_back_to_current() {
        let gws = vec![
            gw(37, now() - Duration::days(10), false, false),
            gw(38, now() - Duration::days(2), true, false),
        ];
        let info = resolve_gameweek(&gws, now()).unwrap();
        assert_eq!(info.id, 38);
        assert_eq!(info.time_left, "Expired");
        assert!(!info.is_urgent);
    }

    #[test]
    fn none_without_next_or_current() {
        let gws = vec![gw(1, now(), false, false)];
        assert!(resolve_gameweek(&gws, now()).is_none());
        assert!(resolve_gameweek(&[], now()).is_none());
    }

    #[test]
    fn deadline_exactly_now_is_expired_and_not_urgent() {
        let info = resolve_at(Duration::zero());
        assert_eq!(info.remaining_ms, 0);
        assert_eq!(info.time_left, "Expired");
        assert_eq!(info.hours_remaining, 0);
        assert!(!info.is_urgent);
    }

    #[test]
    fn just_inside_urgent_window() {
        let info = resolve_at(Duration::hours(5) + Duration::minutes(59));
        assert!(info.is_urgent);
        assert_eq!(info.time_left, "5h 59m");
        assert_eq!(info.hours_remaining, 5);
    }

    #[test]
    fn just_outside_urgent_window() {
        let info = resolve_at(Duration::hours(6) + Duration::minutes(1));
        assert!(!info.is_urgent);
        assert_eq!(info.time_left, "6h 1m");
    }

    #[test]
    fn exactly_six_hours_is_not_urgent() {
        let info = resolve_at(Duration::hours(6));
        assert!(!info.is_urgent);
    }

    #[test]
    fn long_horizon_formats_total_hours() {
        let info = resolve_at(Duration::days(2) + Duration::minutes(30));
        assert_eq!(info.time_left, "48h 30m");
        assert_eq!(info.hours_remaining, 48);
    }

    #[test]
    fn past_deadline_clamps_hours() {
        let info = resolve_at(-Duration::hours(3));
        assert!(info.is_expired());
        assert_eq!(info.hours_remaining, 0);
        assert!(info.remaining_ms < 0);
    }

    #[test]
    fn reminder_due_at_lead_hour() {
        let info = resolve_at(Duration::hours(3) + Duration::minutes(20));
        assert!(info.reminder_due(3));
        assert!(!info.reminder_due(2));

        let expired = resolve_at(-Duration::minutes(1));
        assert!(!expired.reminder_due(0));
    }

    #[test]
    fn deterministic_for_fixed_now() {
        let offset = Duration::hours(30) + Duration::minutes(7);
        assert_eq!(resolve_at(offset), resolve_at(offset));
    }
}
