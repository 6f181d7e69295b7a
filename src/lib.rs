//! PropMate - property-to-client matching for a real-estate CRM
//!
//! The heart of the crate is a deterministic scorer that rates how well a
//! listing fits a client's requirements, and a matcher that ranks a whole
//! inventory against one client. Around it sit the collaborators of the HTTP
//! service: a per-tenant record store, a ranking memo, report aggregates and
//! an optional generative pitch writer.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{calculate_match_score, Matcher, Ranking};
pub use models::{Client, MatchResult, Property, ScoreBreakdown, ScoringWeights};
