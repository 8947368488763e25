use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of recent results kept per team.
pub const MAX_FORM_LEN: usize = 5;

/// Outcome of a single match as shown in the form column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

impl FormResult {
    /// Classify a class/title token from the upstream markup.
    /// "form-icon--win" → W, "draw" → D, "is-loss" → L.
    pub fn from_token(token: &str) -> Option<Self> {
        let t = token.to_lowercase();
        if t.contains("win") {
            Some(FormResult::W)
        } else if t.contains("draw") {
            Some(FormResult::D)
        } else if t.contains("loss") {
            Some(FormResult::L)
        } else {
            None
        }
    }

    /// Classify a `title`/`alt` text. Only a bare result word counts, since
    /// titles often hold free text such as "Loss 0-2 v Darwin Town".
    pub fn from_title(title: &str) -> Option<Self> {
        match title.trim().to_lowercase().as_str() {
            "w" | "win" | "won" => Some(FormResult::W),
            "d" | "draw" | "drawn" => Some(FormResult::D),
            "l" | "loss" | "lost" => Some(FormResult::L),
            _ => None,
        }
    }
}

/// One team's line in the league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub position: u32,
    /// Display name exactly as published upstream
    pub team: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
    /// At most [`MAX_FORM_LEN`] entries, in page order
    pub form: Vec<FormResult>,
}

/// A complete table plus the time it was scraped. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsSnapshot {
    pub rows: Vec<StandingsRow>,
    pub fetched_at: DateTime<Utc>,
}

impl StandingsSnapshot {
    pub fn new(rows: Vec<StandingsRow>, fetched_at: DateTime<Utc>) -> Self {
        StandingsSnapshot { rows, fetched_at }
    }

    /// Seconds elapsed since the snapshot was taken, relative to `now`.
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.fetched_at).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_form_from_token() {
        assert_eq!(FormResult::from_token("icon-win"), Some(FormResult::W));
        assert_eq!(FormResult::from_token("DRAW"), Some(FormResult::D));
        assert_eq!(FormResult::from_token("result--loss"), Some(FormResult::L));
        assert_eq!(FormResult::from_token("icon"), None);
    }

    #[test]
    fn test_form_from_title_needs_whole_word() {
        assert_eq!(FormResult::from_title(" Won "), Some(FormResult::W));
        assert_eq!(FormResult::from_title("D"), Some(FormResult::D));
        assert_eq!(FormResult::from_title("lost"), Some(FormResult::L));
        assert_eq!(FormResult::from_title("Loss 0-2 v Darwin Town"), None);
        assert_eq!(FormResult::from_title("Winner"), None);
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let row = StandingsRow {
            position: 1,
            team: "SV Musterstadt".into(),
            played: 10,
            won: 7,
            drawn: 2,
            lost: 1,
            goals_for: 25,
            goals_against: 9,
            goal_difference: 16,
            points: 23,
            form: vec![FormResult::W, FormResult::D],
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["goalsFor"], 25);
        assert_eq!(json["goalDifference"], 16);
        assert_eq!(json["form"], serde_json::json!(["W", "D"]));
    }

    #[test]
    fn test_snapshot_age_never_negative() {
        let now = Utc::now();
        let snap = StandingsSnapshot::new(vec![], now - Duration::hours(5));
        assert_eq!(snap.age_secs(now), 5 * 3600);

        let future = StandingsSnapshot::new(vec![], now + Duration::seconds(30));
        assert_eq!(future.age_secs(now), 0);
    }
}
