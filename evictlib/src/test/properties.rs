use proptest::prelude::*;
use crate::cache::{hits, run};
use crate::config::{Capacity, PolicyKind};
use crate::reference;

// Small key ranges so traces actually repeat keys and caches fill up
fn trace() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..12, 0..200)
}

proptest! {
    #[test]
    fn hits_bounded_by_trace_length(capacity in 1usize..10, trace in trace()) {
        for policy in PolicyKind::ALL {
            let counts = run(policy, capacity, &trace).unwrap();
            prop_assert!(counts.hits <= trace.len() as u64);
            prop_assert_eq!(counts.hits + counts.misses, trace.len() as u64);
            prop_assert_eq!(counts.evictions, counts.misses.saturating_sub(capacity as u64));
        }
    }

    #[test]
    fn belady_never_worse_than_lru(capacity in 1usize..10, trace in trace()) {
        let lru = hits(PolicyKind::LeastRecentlyUsed, capacity, &trace).unwrap();
        let belady = hits(PolicyKind::Belady, capacity, &trace).unwrap();
        prop_assert!(belady >= lru, "belady {} < lru {}", belady, lru);
    }

    #[test]
    fn more_capacity_never_hurts(capacity in 1usize..10, extra in 0usize..5, trace in trace()) {
        for policy in PolicyKind::ALL {
            let small = hits(policy, capacity, &trace).unwrap();
            let large = hits(policy, capacity + extra, &trace).unwrap();
            prop_assert!(small <= large, "{}: {} slots gave {}, {} slots gave {}", policy, capacity, small, capacity + extra, large);
        }
    }

    #[test]
    fn indexed_lru_matches_reference(capacity in 1usize..10, trace in trace()) {
        let expected = reference::lru_hits(Capacity::new(capacity).unwrap(), &trace);
        prop_assert_eq!(hits(PolicyKind::LeastRecentlyUsed, capacity, &trace).unwrap(), expected);
    }

    #[test]
    fn indexed_belady_matches_reference(capacity in 1usize..10, trace in trace()) {
        let expected = reference::belady_hits(Capacity::new(capacity).unwrap(), &trace);
        prop_assert_eq!(hits(PolicyKind::Belady, capacity, &trace).unwrap(), expected);
    }

    #[test]
    fn reference_engines_accept_huge_capacities(trace in trace()) {
        let huge = Capacity::new(usize::MAX).unwrap();
        let mut distinct = trace.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let expected = (trace.len() - distinct.len()) as u64;
        prop_assert_eq!(reference::lru_hits(huge, &trace), expected);
        prop_assert_eq!(reference::belady_hits(huge, &trace), expected);
    }

    #[test]
    fn all_distinct_never_hits(capacity in 1usize..10, len in 0i64..100) {
        let trace: Vec<i64> = (0..len).collect();
        for policy in PolicyKind::ALL {
            prop_assert_eq!(hits(policy, capacity, &trace).unwrap(), 0);
        }
    }

    #[test]
    fn cache_holding_every_key_only_misses_once_per_key(trace in trace()) {
        let mut distinct = trace.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let capacity = distinct.len().max(1);
        for policy in PolicyKind::ALL {
            prop_assert_eq!(
                hits(policy, capacity, &trace).unwrap(),
                (trace.len() - distinct.len()) as u64
            );
        }
    }
}
