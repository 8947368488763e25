use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use crate::upstream::DEFAULT_USER_AGENT;

/// League table scraper and standings API
#[derive(Parser, Debug, Clone)]
#[command(name = "league-table", version, about)]
pub struct Config {
    /// Upstream page holding the league table
    #[arg(
        long,
        env = "STANDINGS_URL",
        default_value = "https://www.fussball.de/spieltagsuebersicht/tabelle"
    )]
    pub standings_url: String,

    /// API listen address
    #[arg(long, env = "API_ADDR", default_value = "0.0.0.0:8080")]
    pub api_addr: String,

    /// User-Agent sent to the upstream site
    #[arg(long, env = "SCRAPER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout_secs: u64,

    /// Seconds between scheduled refreshes (default: 6 hours)
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "21600")]
    pub refresh_interval_secs: u64,

    /// Shared secret required in the X-Api-Secret header (unset = open)
    #[arg(long, env = "API_SECRET")]
    pub api_secret: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.standings_url)
            .map_err(|e| anyhow::anyhow!("standings_url is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("standings_url must use http or https");
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be positive");
        }
        if self.refresh_interval_secs < 60 {
            anyhow::bail!("refresh_interval_secs must be at least 60");
        }
        if self.api_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("api_addr must be a socket address like 0.0.0.0:8080");
        }
        if matches!(self.api_secret.as_deref(), Some("")) {
            anyhow::bail!("API_SECRET must not be empty; unset it to disable the check");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
