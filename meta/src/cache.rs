//! LRU cache for assembled pool metadata
//!
//! Replaces an unbounded process-wide memo: capacity is fixed at
//! construction and the least recently used view is evicted first. The
//! cache is advisory; concurrent refreshes of the same key may race and
//! the last write wins.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::assembler::PoolMeta;

/// Sentinel user segment for anonymous lookups.
pub const NO_USER: &str = "_";

/// Cache key: pool token, reserve asset, and requesting user (or the
/// anonymous sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetaKey {
    pub asset0: String,
    pub reserve_asset: String,
    pub user: String,
}

impl MetaKey {
    pub fn new(asset0: &str, reserve_asset: &str, user: Option<&str>) -> Self {
        Self {
            asset0: asset0.to_string(),
            reserve_asset: reserve_asset.to_string(),
            user: user.unwrap_or(NO_USER).to_string(),
        }
    }
}

pub struct MetaCache {
    entries: Mutex<LruCache<MetaKey, Arc<PoolMeta>>>,
}

impl MetaCache {
    /// A cache holding at most `capacity` views; a zero capacity is
    /// bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &MetaKey) -> Option<Arc<PoolMeta>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn put(&self, key: MetaKey, meta: Arc<PoolMeta>) {
        self.entries.lock().put(key, meta);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::PoolMeta;
    use crate::providers::AssetMetadata;
    use perp_governance::OracleProposals;

    fn meta(tag: &str) -> Arc<PoolMeta> {
        Arc::new(PoolMeta {
            asset0: AssetMetadata {
                symbol: tag.to_string(),
                decimals: 9,
            },
            reserve_asset: AssetMetadata {
                symbol: "GBYTE".to_string(),
                decimals: 9,
            },
            proposals: OracleProposals::default(),
            vp: 0.0,
            allowed_control: false,
            stake_balance: 0.0,
            reserve_price_aa: "RP".to_string(),
            reserve_price_value: 0.0,
            reserve: 0.0,
            reserve_in_usd: 0.0,
            total_stake_balance: 0.0,
            stake_in_usd: 0.0,
        })
    }

    #[test]
    fn test_anonymous_key_uses_sentinel() {
        let key = MetaKey::new("A0", "RES", None);
        assert_eq!(key.user, NO_USER);
        assert_ne!(key, MetaKey::new("A0", "RES", Some("ALICE")));
    }

    #[test]
    fn test_put_get_roundtrip() {
        let cache = MetaCache::new(4);
        let key = MetaKey::new("A0", "RES", Some("ALICE"));

        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), meta("P1"));
        assert_eq!(cache.get(&key).unwrap().asset0.symbol, "P1");
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache = MetaCache::new(2);
        let first = MetaKey::new("A", "RES", None);
        let second = MetaKey::new("B", "RES", None);
        let third = MetaKey::new("C", "RES", None);

        cache.put(first.clone(), meta("P1"));
        cache.put(second.clone(), meta("P2"));

        // Touch the first entry so the second becomes the eviction victim.
        cache.get(&first);
        cache.put(third.clone(), meta("P3"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&first).is_some());
        assert!(cache.get(&second).is_none());
        assert!(cache.get(&third).is_some());
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let cache = MetaCache::new(0);
        let key = MetaKey::new("A", "RES", None);
        cache.put(key.clone(), meta("P1"));
        assert_eq!(cache.len(), 1);
    }
}
