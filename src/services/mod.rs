// Service exports
pub mod cache;
pub mod pitch;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheStats, RankingCache};
pub use pitch::{PitchError, PitchGenerator};
pub use store::{Collection, StoreError, StoreKey, TenantStore};
