//! Core data model definitions shared across docmatch crates.
#![allow(missing_docs)]

pub mod analytics;
pub mod credits;
pub mod error;
pub mod ids;
pub mod matches;
pub mod scan;
pub mod session;

// Intentionally curated re-exports for downstream consumers.
pub use analytics::{
    AnalyticsReport, CreditStats, ScanActivity, TopUser, TopicCount,
};
pub use credits::{Acknowledgement, CreditRequest, PendingCreditRequest};
pub use error::{ModelError, Result as ModelResult};
pub use ids::DocumentId;
pub use matches::{MatchEntry, MatchList};
pub use scan::{NO_MATCH_SENTINEL, ScanReport, ScanResults};
pub use session::{AuthOutcome, Role, UserProfile};
