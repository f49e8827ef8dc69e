use std::hash::Hash;
use crate::config::{Capacity, PolicyKind};
use crate::error::Result;
use crate::replacement_policies::{Access, Belady, CachePolicy, LeastRecentlyUsed};

/// Enum over the provided policies
///
/// Using trait objects would reduce boilerplate, but dispatch happens once per access, so it is
/// worth letting the compiler see the concrete types and inline through the match instead
#[derive(Debug)]
pub enum GenericCache<K> {
    LeastRecentlyUsed(LeastRecentlyUsed<K>),
    Belady(Belady<K>),
}

impl<K: Hash + Eq + Clone> GenericCache<K> {
    /// Builds a fresh cache for a policy. Belady needs the trace up front; LRU ignores it.
    pub fn new(policy: PolicyKind, capacity: Capacity, trace: &[K]) -> Self {
        match policy {
            PolicyKind::LeastRecentlyUsed => GenericCache::from(LeastRecentlyUsed::new(capacity)),
            PolicyKind::Belady => GenericCache::from(Belady::new(capacity, trace)),
        }
    }

    pub fn policy(&self) -> PolicyKind {
        match self {
            GenericCache::LeastRecentlyUsed(_) => PolicyKind::LeastRecentlyUsed,
            GenericCache::Belady(_) => PolicyKind::Belady,
        }
    }
}

impl<K> From<LeastRecentlyUsed<K>> for GenericCache<K> {
    fn from(value: LeastRecentlyUsed<K>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl<K> From<Belady<K>> for GenericCache<K> {
    fn from(value: Belady<K>) -> Self {
        Self::Belady(value)
    }
}

impl<K: Hash + Eq + Clone> CachePolicy<K> for GenericCache<K> {
    fn access(&mut self, position: usize, key: &K) -> Access<K> {
        match self {
            GenericCache::LeastRecentlyUsed(c) => c.access(position, key),
            GenericCache::Belady(c) => c.access(position, key),
        }
    }

    fn len(&self) -> usize {
        match self {
            GenericCache::LeastRecentlyUsed(c) => c.len(),
            GenericCache::Belady(c) => c.len(),
        }
    }

    fn capacity(&self) -> Capacity {
        match self {
            GenericCache::LeastRecentlyUsed(c) => c.capacity(),
            GenericCache::Belady(c) => c.capacity(),
        }
    }
}

/// Hit, miss and eviction totals for one run of a policy over a trace
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Counts {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Feeds a whole trace through a policy, in order
pub fn replay<K, C: CachePolicy<K>>(cache: &mut C, trace: &[K]) -> Counts {
    let mut counts = Counts::default();
    for (position, key) in trace.iter().enumerate() {
        match cache.access(position, key) {
            Access::Hit => counts.hits += 1,
            Access::Miss { evicted } => {
                counts.misses += 1;
                if evicted.is_some() {
                    counts.evictions += 1;
                }
            }
        }
    }
    counts
}

/// Runs `policy` over `trace` with a fresh cache and returns the full counts.
///
/// The capacity is validated before the trace is looked at.
pub fn run<K: Hash + Eq + Clone>(policy: PolicyKind, capacity: usize, trace: &[K]) -> Result<Counts> {
    let capacity = Capacity::new(capacity)?;
    let mut cache = GenericCache::new(policy, capacity, trace);
    Ok(replay(&mut cache, trace))
}

/// Number of hits for `policy` over `trace` with a cache of `capacity` keys
///
/// # Examples
///
/// ```
/// use evictlib::cache::hits;
/// use evictlib::config::PolicyKind;
/// assert_eq!(hits(PolicyKind::Belady, 2, &[1, 2, 3, 1, 2]).unwrap(), 1);
/// assert!(hits(PolicyKind::Belady, 0, &[1]).is_err());
/// ```
pub fn hits<K: Hash + Eq + Clone>(policy: PolicyKind, capacity: usize, trace: &[K]) -> Result<u64> {
    run(policy, capacity, trace).map(|counts| counts.hits)
}

/// Number of hits for an LRU cache of `capacity` keys over `trace`
///
/// # Examples
///
/// ```
/// use evictlib::cache::lru_hits;
/// assert_eq!(lru_hits(1, &[5, 5, 5]).unwrap(), 2);
/// assert_eq!(lru_hits(2, &[1, 2, 3, 1, 2]).unwrap(), 0);
/// ```
pub fn lru_hits<K: Hash + Eq + Clone>(capacity: usize, trace: &[K]) -> Result<u64> {
    hits(PolicyKind::LeastRecentlyUsed, capacity, trace)
}

/// Number of hits for a Belady-optimal cache of `capacity` keys over `trace`
pub fn belady_hits<K: Hash + Eq + Clone>(capacity: usize, trace: &[K]) -> Result<u64> {
    hits(PolicyKind::Belady, capacity, trace)
}
