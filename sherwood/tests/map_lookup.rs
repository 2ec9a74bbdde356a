//! Read-path behavior: lookup scenarios over different key and context
//! types, the probe budget, idempotence, and shared use across threads.

use sherwood::{AutoContext, BytesContext, HashContext, StaticMap};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::LazyLock;
use std::thread;

#[test]
fn string_key_scenario() {
    let table = StaticMap::build([("foo", 1), ("bar", 2), ("baz", 3), ("quux", 4)]).unwrap();
    assert!(table.contains_key("foo"));
    assert!(!table.contains_key("zig"));
    assert_eq!(table.get("baz"), Some(&3));
    assert_eq!(table.get("nah"), None);
}

#[test]
fn integer_key_scenario() {
    let table = StaticMap::build([(1, "foo"), (2, "bar"), (3, "baz"), (45, "quux")]).unwrap();
    assert!(table.contains_key(&1));
    assert!(!table.contains_key(&4));
    assert_eq!(table.get(&2), Some(&"bar"));
    assert_eq!(table.get(&4_000_000), None);
}

#[test]
fn lookups_are_idempotent() {
    let table = StaticMap::build([("alpha", 10_u32), ("beta", 20)]).unwrap();
    for _ in 0..3 {
        assert_eq!(table.get("alpha"), Some(&10));
        assert_eq!(table.get("beta"), Some(&20));
        assert_eq!(table.get("gamma"), None);
        assert!(table.contains_key("alpha"));
        assert!(!table.contains_key("gamma"));
    }
}

#[test]
fn borrowed_query_forms() {
    let table = StaticMap::build([
        (String::from("north"), 1_u8),
        (String::from("south"), 2),
    ])
    .unwrap();

    // Owned String keys, queried with plain &str
    assert_eq!(table.get("north"), Some(&1));
    let runtime_key = String::from("south");
    assert_eq!(table.get(runtime_key.as_str()), Some(&2));
    assert_eq!(table.get("east"), None);
}

#[test]
fn bytes_context_tables() {
    let table = StaticMap::build_with_context(
        [(String::from("latency"), 9_u32), (String::from("budget"), 42)],
        BytesContext,
    )
    .unwrap();
    assert_eq!(table.get("latency"), Some(&9));
    assert_eq!(table.get("budget"), Some(&42));
    assert_eq!(table.get("missing"), None);
}

/// Context wrapper that counts every hash and equality call the table
/// makes, shared with the test through `Rc`
#[derive(Clone)]
struct CountingContext {
    hashes: Rc<Cell<usize>>,
    equality_checks: Rc<Cell<usize>>,
}

impl CountingContext {
    fn new() -> Self {
        Self {
            hashes: Rc::new(Cell::new(0)),
            equality_checks: Rc::new(Cell::new(0)),
        }
    }
}

impl HashContext<u64> for CountingContext {
    fn hash(&self, key: &u64) -> u64 {
        self.hashes.set(self.hashes.get() + 1);
        AutoContext.hash(key)
    }

    fn eql(&self, a: &u64, b: &u64) -> bool {
        self.equality_checks.set(self.equality_checks.get() + 1);
        a == b
    }
}

#[test]
fn probe_work_stays_within_budget() {
    let counters = CountingContext::new();
    let handle = counters.clone();

    let pairs: Vec<(u64, u64)> = (0..300).map(|k| (k * 3 + 1, k)).collect();
    let table = StaticMap::build_with_context(pairs, counters).unwrap();

    // Construction hashes each key exactly once
    assert_eq!(handle.hashes.get(), 300);

    let budget = table.max_probe_distance() as usize + 1;
    let hashes_before_queries = handle.hashes.get();
    for probe in 0..600_u64 {
        let before = handle.equality_checks.get();
        let expected = if probe % 3 == 1 { Some(probe / 3) } else { None };
        assert_eq!(table.get(&probe).copied(), expected);
        let inspected = handle.equality_checks.get() - before;
        assert!(
            inspected <= budget,
            "key {} took {} comparisons, budget {}",
            probe,
            inspected,
            budget
        );
    }
    // One hash per lookup, no rehashing of stored keys
    assert_eq!(handle.hashes.get() - hashes_before_queries, 600);
}

#[test]
fn concurrent_shared_reads() {
    let pairs: Vec<(u32, u32)> = (0..64).map(|k| (k, k * k)).collect();
    let table = StaticMap::build(pairs).unwrap();

    thread::scope(|scope| {
        for worker in 0..4_u32 {
            let table = &table;
            scope.spawn(move || {
                for round in 0..100_u32 {
                    let key = (worker * 31 + round) % 96;
                    match table.get(&key) {
                        Some(value) => assert_eq!(*value, key * key),
                        None => assert!(key >= 64),
                    }
                }
            });
        }
    });
}

/// Keyword table shared by every thread, laid out on first use
static KEYWORDS: LazyLock<StaticMap<&'static str, u32, BytesContext>> = LazyLock::new(|| {
    StaticMap::build_with_context(
        [("fn", 1_u32), ("let", 2), ("match", 3), ("impl", 4), ("mod", 5)],
        BytesContext,
    )
    .expect("keyword list is not empty")
});

#[test]
fn lazy_singleton_serves_all_threads() {
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(KEYWORDS.get("match"), Some(&3));
                assert!(KEYWORDS.contains_key("fn"));
                assert!(!KEYWORDS.contains_key("return"));
            });
        }
    });
    assert_eq!(KEYWORDS.len(), 5);
    assert!(KEYWORDS.capacity().is_power_of_two());
}
