use std::collections::{BTreeMap, HashMap};
use std::cmp::Reverse;
use std::hash::Hash;
use crate::config::Capacity;

/// The outcome of a single access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<K> {
    Hit,
    /// The key was inserted, displacing `evicted` if the cache was already full
    Miss { evicted: Option<K> },
}

/// A generic trait for eviction policies, driven one trace position at a time.
///
/// Callers must present the trace in order, starting at position 0. Online policies may ignore
/// the position; offline policies use it to look up the future of the trace they were built with.
pub trait CachePolicy<K> {
    /// Processes the access to `key` at trace position `position`, updating the resident set
    ///
    /// # Arguments
    ///
    /// * `position`: Index of this access within the trace
    /// * `key`: The accessed key
    ///
    /// returns: Access<K>
    fn access(&mut self, position: usize, key: &K) -> Access<K>;

    /// Number of resident keys
    fn len(&self) -> usize;

    fn capacity(&self) -> Capacity;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Null link in the recency list
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: usize,
    next: usize,
}

/// Least Recently Used policy.
///
/// Resident keys live in a fixed-size arena of nodes, linked into a doubly-linked recency list
/// by slot index (head is most recently used, tail is least recently used). A hash index maps
/// each key to its slot, so hits, misses and evictions are all O(1) amortized.
///
/// The arena never shrinks; once the cache is full, an eviction frees exactly the slot the
/// incoming key then takes.
#[derive(Debug)]
pub struct LeastRecentlyUsed<K> {
    capacity: Capacity,
    index: HashMap<K, usize>,
    nodes: Vec<Node<K>>,
    head: usize,
    tail: usize,
}

impl<K: Hash + Eq + Clone> LeastRecentlyUsed<K> {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            index: HashMap::new(),
            nodes: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    /// Resident keys from most to least recently used
    pub fn recency_order(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut slot = self.head;
        while slot != NIL {
            out.push(self.nodes[slot].key.clone());
            slot = self.nodes[slot].next;
        }
        out
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
    }

    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }
}

impl<K: Hash + Eq + Clone> CachePolicy<K> for LeastRecentlyUsed<K> {
    fn access(&mut self, _position: usize, key: &K) -> Access<K> {
        if let Some(&slot) = self.index.get(key) {
            if slot != self.head {
                self.unlink(slot);
                self.push_front(slot);
            }
            return Access::Hit;
        }
        if self.nodes.len() < self.capacity.get() {
            self.nodes.push(Node { key: key.clone(), prev: NIL, next: NIL });
            let slot = self.nodes.len() - 1;
            self.index.insert(key.clone(), slot);
            self.push_front(slot);
            return Access::Miss { evicted: None };
        }
        // Full: recycle the tail slot for the incoming key
        let slot = self.tail;
        self.unlink(slot);
        let evicted = std::mem::replace(&mut self.nodes[slot].key, key.clone());
        self.index.remove(&evicted);
        self.index.insert(key.clone(), slot);
        self.push_front(slot);
        Access::Miss { evicted: Some(evicted) }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> Capacity {
        self.capacity
    }
}

/// Computes, for every position of a trace, the position of the next access to the same key.
///
/// One reverse pass with a map from key to the most recently seen (i.e. next) position.
///
/// # Examples
///
/// ```
/// use evictlib::replacement_policies::next_uses;
/// assert_eq!(next_uses(&[1, 2, 1, 3, 2]), vec![Some(2), Some(4), None, None, None]);
/// ```
pub fn next_uses<K: Hash + Eq>(trace: &[K]) -> Vec<Option<usize>> {
    let mut next = vec![None; trace.len()];
    let mut seen: HashMap<&K, usize> = HashMap::new();
    for (position, key) in trace.iter().enumerate().rev() {
        next[position] = seen.insert(key, position);
    }
    next
}

/// Eviction priority of a resident key. The greatest priority is evicted first: furthest next use,
/// with "never again" beyond every real position, and among equals the earliest inserted key.
type Priority = (usize, Reverse<u64>);

const NEVER: usize = usize::MAX;

/// Belady's optimal (MIN) policy, which knows the whole trace in advance.
///
/// Next uses are precomputed once, so picking a victim is a lookup of the greatest entry in an
/// ordered map instead of a scan of the remaining trace. Two resident keys can only share a next
/// use when neither is accessed again, and those ties go to the key that has been resident the
/// longest. Hits do not change insertion order.
#[derive(Debug)]
pub struct Belady<K> {
    capacity: Capacity,
    next_use: Vec<Option<usize>>,
    resident: HashMap<K, Priority>,
    // Insertion sequences are unique, so every priority identifies exactly one resident key
    by_priority: BTreeMap<Priority, K>,
    sequence: u64,
}

impl<K: Hash + Eq + Clone> Belady<K> {
    /// Creates the policy for a specific trace. Accesses must then be presented in that trace's
    /// order.
    pub fn new(capacity: Capacity, trace: &[K]) -> Self {
        Self {
            capacity,
            next_use: next_uses(trace),
            // Never more resident keys than accesses, whatever the capacity
            resident: HashMap::with_capacity(capacity.get().min(trace.len())),
            by_priority: BTreeMap::new(),
            sequence: 0,
        }
    }

    /// The key that would be evicted by the next miss, if the cache is full
    pub fn victim(&self) -> Option<&K> {
        if self.resident.len() < self.capacity.get() {
            return None;
        }
        self.by_priority.last_key_value().map(|(_, key)| key)
    }

    fn next_use_after(&self, position: usize) -> usize {
        self.next_use.get(position).copied().flatten().unwrap_or(NEVER)
    }
}

impl<K: Hash + Eq + Clone> CachePolicy<K> for Belady<K> {
    fn access(&mut self, position: usize, key: &K) -> Access<K> {
        let next_use = self.next_use_after(position);
        if let Some(priority) = self.resident.get_mut(key) {
            if let Some(k) = self.by_priority.remove(&*priority) {
                priority.0 = next_use;
                self.by_priority.insert(*priority, k);
            }
            return Access::Hit;
        }
        let mut evicted = None;
        if self.resident.len() >= self.capacity.get() {
            if let Some((_, victim)) = self.by_priority.pop_last() {
                self.resident.remove(&victim);
                evicted = Some(victim);
            }
        }
        let priority = (next_use, Reverse(self.sequence));
        self.sequence += 1;
        self.resident.insert(key.clone(), priority);
        self.by_priority.insert(priority, key.clone());
        Access::Miss { evicted }
    }

    fn len(&self) -> usize {
        self.resident.len()
    }

    fn capacity(&self) -> Capacity {
        self.capacity
    }
}
