pub mod extract;
pub mod fetcher;
pub mod provider;

#[cfg(test)]
pub mod testing;

pub use extract::{extract_with, TableLayout};
pub use fetcher::{HttpFetcher, DEFAULT_USER_AGENT};
pub use provider::StandingsSource;
