//! Fuzzer for table construction and lookup
//!
//! Builds a table from an arbitrary pair list and compares every
//! observable (population, lookups, layout diagnostics, and error cases)
//! with `std::collections::HashMap` under the same last-write-wins rule.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sherwood::{DuplicatePolicy, Error, StaticMapBuilder};
use std::collections::{HashMap, HashSet};

/// One fuzzed build plus a list of probe keys
#[derive(Clone, Debug, Arbitrary)]
struct Op {
    /// Pair list the table is built from; u16 keys keep collisions common
    pairs: Vec<(u16, u8)>,
    /// Keys queried after construction
    queries: Vec<u16>,
    /// Build with `DuplicatePolicy::Reject` instead of the default
    strict: bool,
}

fuzz_target!(|op: Op| {
    let policy = if op.strict {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::LastWins
    };
    let outcome = StaticMapBuilder::new()
        .duplicate_policy(policy)
        .build(op.pairs.clone());

    // Model the same input: first duplicate position and final content
    let mut seen = HashSet::new();
    let first_duplicate = op.pairs.iter().position(|(key, _)| !seen.insert(*key));
    let model: HashMap<u16, u8> = op.pairs.iter().copied().collect();

    let table = match outcome {
        Err(Error::Empty) => {
            assert!(op.pairs.is_empty());
            return;
        }
        Err(Error::Duplicate { index }) => {
            assert!(op.strict);
            assert_eq!(Some(index), first_duplicate);
            return;
        }
        Err(_) => unreachable!(),
        Ok(table) => table,
    };
    if op.strict {
        assert_eq!(first_duplicate, None);
    }

    // Layout invariants
    assert!(table.capacity().is_power_of_two());
    assert!(table.capacity() * 3 >= op.pairs.len() * 5);
    assert_eq!(table.len(), model.len());
    let histogram = table.probe_histogram();
    assert_eq!(histogram.len(), table.max_probe_distance() as usize + 1);
    assert_eq!(histogram.iter().sum::<usize>(), table.len());

    // Content agrees with the model, for stored and fuzzed keys alike
    for (key, value) in &model {
        assert_eq!(table.get(key), Some(value));
    }
    for key in &op.queries {
        assert_eq!(table.get(key), model.get(key));
    }
});
