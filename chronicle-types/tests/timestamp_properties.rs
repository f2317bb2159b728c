//! Property-based tests for Hybrid Logical Clock correctness.
//!
//! Verifies the two invariants everything else leans on:
//! - `tick` always produces a strictly greater timestamp
//! - `receive` always produces a timestamp strictly greater than both inputs

use chronicle_types::HybridTimestamp;
use proptest::prelude::*;

fn timestamp_strategy() -> impl Strategy<Value = HybridTimestamp> {
    (1u64..u64::MAX / 2, 0u32..100_000)
        .prop_map(|(wall, logical)| HybridTimestamp::new(wall, logical))
}

proptest! {
    #[test]
    fn tick_strictly_increases(ts in timestamp_strategy()) {
        prop_assert!(ts.tick() > ts);
    }

    #[test]
    fn receive_exceeds_both(a in timestamp_strategy(), b in timestamp_strategy()) {
        let merged = a.receive(&b);
        prop_assert!(merged > a);
        prop_assert!(merged > b);
    }

    #[test]
    fn ordering_is_total(a in timestamp_strategy(), b in timestamp_strategy()) {
        let forward = a.cmp(&b);
        let backward = b.cmp(&a);
        prop_assert_eq!(forward, backward.reverse());
    }
}
