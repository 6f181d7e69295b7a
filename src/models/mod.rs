// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Client, Facing, FurnishingStatus, LeadStage, ListingSource, Location, MaritalStatus,
    MatchResult, PropertyStatus, PropertyType, Property, RankedProperty, Reminder,
    ReminderStatus, ReminderType, ScoreBreakdown, ScoringWeights, TenantId, TransactionType,
    WeightsError,
};
pub use requests::{
    CompleteReminderRequest, RankQuery, RescheduleReminderRequest, ScorePairRequest,
    SearchFilters, SearchQuery,
};
pub use responses::{ErrorResponse, HealthResponse, PitchResponse, RankingResponse, SearchResults};
