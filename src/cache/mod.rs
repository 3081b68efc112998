// Cache module for proxied GitHub responses.
// Two tiers (process-local map, optional external key-value store) behind one tier list.

pub mod clock;
pub mod entry;
pub mod remote;
pub mod store;
pub mod tier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, CachedData};
pub use remote::{RedisTier, TierHealth};
pub use store::{CacheHit, TierStatus, TieredCache};
pub use tier::{CacheTier, MemoryTier};
