pub mod acquisition;
pub mod cache;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod service;

pub use acquisition::Acquisition;
pub use cache::StandingsCache;
pub use scheduler::start_refresh_scheduler;
pub use service::QueryService;
