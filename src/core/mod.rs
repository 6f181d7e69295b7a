// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod reports;
pub mod scoring;

pub use filters::{apply_filters, matches_filters, quick_search};
pub use matcher::{Matcher, Ranking};
pub use reports::{dashboard, report, DashboardSummary, ReportSummary};
pub use scoring::calculate_match_score;
