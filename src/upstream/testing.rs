//! Test doubles shared by the orchestrator, service and API tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::provider::StandingsSource;
use crate::standings::error::FetchError;

/// Build a standings page in the default upstream layout.
/// `teams` is `(name, points)` in table order.
pub fn table_html(teams: &[(&str, i32)]) -> String {
    let rows: String = teams
        .iter()
        .enumerate()
        .map(|(i, (name, points))| {
            format!(
                r#"<tr><td>{}.</td><td><span class="team-name-full">{}</span></td><td>10</td><td>5</td>
                   <td>3</td><td>2</td><td>18:11</td><td>+7</td><td>{}</td>
                   <td><span class="form-win"></span><span class="form-draw"></span></td></tr>"#,
                i + 1,
                name,
                points
            )
        })
        .collect();
    format!(
        r#"<html><body><table class="league-table"><tr><th>#</th><th>Team</th></tr>{}</table></body></html>"#,
        rows
    )
}

/// Eleven-team league used by the end-to-end scenarios.
pub fn eleven_teams() -> Vec<(&'static str, i32)> {
    vec![
        ("SV Nord", 30),
        ("FC Süd", 28),
        ("TuS Ost", 25),
        ("VfB West", 22),
        ("SG Mitte", 20),
        ("SC Hafen", 18),
        ("TSV Berg", 15),
        ("FSV Tal", 12),
        ("SpVgg Feld", 10),
        ("DJK Wald", 7),
        ("BSC Au", 3),
    ]
}

/// Source that replays scripted responses and counts calls.
/// Once the script runs dry the last response is repeated.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<String, FetchError>>>,
    last: Mutex<Option<Result<String, FetchError>>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<String, FetchError>>) -> Self {
        ScriptedSource {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(response: Result<String, FetchError>) -> Self {
        ScriptedSource::new(vec![response])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Result<String, FetchError> {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = script.pop_front() {
            *last = Some(next);
        }
        last.clone()
            .unwrap_or_else(|| Err(FetchError::Network("empty script".into())))
    }
}

#[async_trait]
impl StandingsSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_html(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.next_response()
    }
}
