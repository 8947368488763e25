//! Error taxonomy for the acquisition pipeline.
//!
//! Each layer wraps the one below it so callers can tell "upstream is down"
//! from "upstream changed its markup" from "we have never had any data".

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("upstream request timed out after {0}s")]
    Timeout(u64),
    #[error("upstream request failed: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("standings table not found in page")]
    TableNotFound,
    #[error("standings table contained no valid rows")]
    NoValidRows,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] FetchError),
    #[error("parse failed: {0}")]
    ParseFailed(#[from] ExtractError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("standings data temporarily unavailable")]
    NoDataAvailable,
}
