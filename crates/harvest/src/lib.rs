//! Rate-limited client for the Greenhouse Harvest API.
//!
//! [`HarvestClient`] owns the base URL and credential, reserves a slot in a
//! shared rolling request window before every send, and retries throttled or
//! failing requests with exponential backoff. Entity payloads (jobs,
//! candidates, applications, and so on) are opaque JSON documents defined by
//! the remote API and are passed through unmodified.

#![deny(missing_docs)]

mod client;
mod error;
mod types;

pub use client::HarvestClient;
pub use error::HarvestError;
pub use types::{
    ApplicationFilters, CandidateFilters, CandidateUpdate, JobFilters, JobStageFilters,
    NewCandidate, NoteVisibility, Pagination, UserFilters,
};

/// Convenient result alias for Harvest operations.
pub type Result<T, E = HarvestError> = std::result::Result<T, E>;
