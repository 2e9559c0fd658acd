//! Property-based tests for the skip list's structural guarantees.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use proptest::prelude::*;
use rungs::Key;
use rungs::SkipList;
use rungs::skip_list::levels;

// =============================================================================
// Test helpers
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Insert { key: i32, toplevel: usize },
    Delete { pick: usize },
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-500..500i32, 0..3usize).prop_map(|(key, toplevel)| Op::Insert { key, toplevel }),
        1 => any::<usize>().prop_map(|pick| Op::Delete { pick }),
    ]
}

fn keys_on(list: &SkipList<i32, i32>, level: usize) -> Vec<Key<i32>> {
    return list.chain(level).map(|(_, node)| *node.key()).collect();
}

/// Every level runs head to tail in increasing order, holds only nodes tall
/// enough for it, and is a subsequence of level 0.
fn assert_shape(list: &SkipList<i32, i32>) -> Result<(), TestCaseError> {
    let ground = keys_on(list, 0);
    prop_assert_eq!(ground.len(), list.len() + 2);
    for level in 0..=list.max_level() {
        let keys = keys_on(list, level);
        prop_assert_eq!(keys.first(), Some(&Key::NegInf));
        prop_assert_eq!(keys.last(), Some(&Key::PosInf));
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]), "level {} unordered", level);

        for (_, node) in list.chain(level) {
            if !node.key().is_sentinel() {
                prop_assert!(node.top_level() >= level);
            }
        }

        let mut rest = ground.iter();
        for key in &keys {
            prop_assert!(rest.any(|k| k == key), "level {} not a subsequence", level);
        }
    }
    return Ok(());
}

// =============================================================================
// Insert / delete sequences
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The list behaves like an ordered map under any mix of inserts and
    /// deletes, and keeps its shape throughout.
    #[test]
    fn matches_ordered_map(
        max_level in 0..4usize,
        ops in prop::collection::vec(arbitrary_op(), 1..120),
    ) {
        let mut list = SkipList::new(max_level);
        let mut model = BTreeMap::new();

        for op in &ops {
            match *op {
                Op::Insert { key, toplevel } => {
                    if model.contains_key(&key) || toplevel > list.max_level() {
                        continue;
                    }
                    list.insert(key, key * 2, toplevel);
                    model.insert(key, key * 2);
                    prop_assert!(list.max_level() >= levels::expected_top_level(list.len()));
                    prop_assert!(!levels::needs_rebuild(list.len(), list.max_level()));
                }
                Op::Delete { pick } => {
                    if model.is_empty() {
                        continue;
                    }
                    let key = *model.keys().nth(pick % model.len()).unwrap();
                    let before = list.len();
                    list.delete(&key);
                    model.remove(&key);
                    prop_assert_eq!(list.len(), before - 1);
                    prop_assert!(!list.search(&key).is_found());
                }
            }
            assert_shape(&list)?;
        }

        let entries: Vec<_> = list.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    /// After a rebuild level L holds exactly floor(n / 2^L) nodes.
    #[test]
    fn rebuild_halves_each_level(
        keys in prop::collection::btree_set(-10_000..10_000i32, 0..300),
        max_level in 1..6usize,
    ) {
        let mut list = SkipList::new(max_level);
        for &key in &keys {
            list.insert(key, key, 0);
        }
        let before = list.max_level();
        list.rebuild();
        prop_assert_eq!(list.max_level(), before * 2);

        let n = keys.len();
        for level in 0..=list.max_level() {
            let count = keys_on(&list, level).len() - 2;
            let expected = if level >= usize::BITS as usize { 0 } else { n >> level };
            prop_assert_eq!(count, expected, "level {}", level);
        }
        assert_shape(&list)?;
    }

    /// Search finds every present key with a trace that starts at the head,
    /// climbs in key order, and ends at the key then its value.
    #[test]
    fn search_traces_are_ordered_paths(
        keys in prop::collection::btree_set(0..1_000i32, 1..100),
        probe in 0..1_000i32,
    ) {
        let mut list = SkipList::new(2);
        for &key in &keys {
            list.insert(key, -key, 0);
        }

        let trace = list.search(&probe);
        if !keys.contains(&probe) {
            prop_assert!(!trace.is_found());
            prop_assert_eq!(trace.to_json().unwrap(), "[]");
            return Ok(());
        }

        prop_assert_eq!(trace.value(), Some(&-probe));
        let visited: Vec<_> = trace.keys().copied().collect();
        prop_assert_eq!(visited.first(), Some(&Key::NegInf));
        prop_assert_eq!(visited.last(), Some(&Key::Finite(probe)));
        prop_assert!(visited.windows(2).all(|w| w[0] < w[1]));
        let present: BTreeSet<_> = keys.iter().map(|&k| Key::Finite(k)).collect();
        prop_assert!(visited[1..].iter().all(|k| present.contains(k)));
    }
}

// =============================================================================
// Fixed scenarios
// =============================================================================

#[test]
fn small_inserts_sort_on_level_zero() {
    let mut list = SkipList::new(2);
    list.insert(1, 10, 0);
    list.insert(5, 50, 0);
    list.insert(9, 90, 1);
    list.insert(2, 20, 0);

    let keys: Vec<_> = keys_on(&list, 0).iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["-inf", "1", "2", "5", "9", "inf"]);
}

#[test]
fn delete_then_search_misses() {
    let mut list = SkipList::new(4);
    for key in [3, 1, 4, 15, 9, 2, 6] {
        list.insert(key, key, 0);
    }
    let before = keys_on(&list, 0).len();

    list.delete(&4);
    assert!(!list.search(&4).is_found());
    assert_eq!(keys_on(&list, 0).len(), before - 1);
}

#[test]
#[should_panic(expected = "insert precondition violated")]
fn inserting_a_present_key_fails_fast() {
    let mut list = SkipList::new(4);
    list.insert(7, 1, 0);
    list.insert(7, 2, 0);
}
