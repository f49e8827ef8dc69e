//! Naive reference engines.
//!
//! These follow the textbook description of each policy as literally as possible: a plain vector
//! for the resident set, and for Belady a fresh scan of the remaining trace on every eviction.
//! They are far too slow for large traces but share no code with the indexed policies, which
//! makes them useful for producing answer files and for cross-checking.

use crate::config::Capacity;

/// LRU hits using a vector kept in recency order, most recent first
pub fn lru_hits<K: PartialEq + Clone>(capacity: Capacity, trace: &[K]) -> u64 {
    let mut cache: Vec<K> = Vec::with_capacity(capacity.get().min(trace.len()));
    let mut hits = 0;
    for key in trace {
        if let Some(index) = cache.iter().position(|k| k == key) {
            hits += 1;
            if index != 0 {
                let k = cache.remove(index);
                cache.insert(0, k);
            }
        } else {
            if cache.len() == capacity.get() {
                cache.pop();
            }
            cache.insert(0, key.clone());
        }
    }
    hits
}

/// Belady hits using a vector kept in insertion order, scanning the rest of the trace for every
/// resident key whenever something has to be evicted
pub fn belady_hits<K: PartialEq + Clone>(capacity: Capacity, trace: &[K]) -> u64 {
    let mut cache: Vec<K> = Vec::with_capacity(capacity.get().min(trace.len()));
    let mut hits = 0;
    for (i, key) in trace.iter().enumerate() {
        if cache.contains(key) {
            hits += 1;
            continue;
        }
        if cache.len() == capacity.get() {
            let suffix = &trace[i + 1..];
            let mut victim = 0;
            let mut furthest = None;
            for (index, resident) in cache.iter().enumerate() {
                match suffix.iter().position(|k| k == resident) {
                    // Never used again, nothing can beat it
                    None => {
                        victim = index;
                        break;
                    }
                    Some(distance) => {
                        if furthest.map_or(true, |f| distance > f) {
                            furthest = Some(distance);
                            victim = index;
                        }
                    }
                }
            }
            cache.remove(victim);
        }
        cache.push(key.clone());
    }
    hits
}
