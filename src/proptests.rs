use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Operations against a tree with a deliberately small key space so that
/// duplicate inserts and hits on removal are common.
#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(#[proptest(strategy = "0u16..512")] u16, u64),
    Remove(#[proptest(strategy = "0u16..512")] u16),
    Get(#[proptest(strategy = "0u16..512")] u16),
    PopFirst,
    PopLast,
}

fn apply(t: &mut RbTree<u16, u64>, m: &mut BTreeMap<u16, u64>, op: Op) -> std::result::Result<(), TestCaseError> {
    match op {
        Op::Insert(key, value) => {
            let inserted = t.insert(key, value);
            let absent = !m.contains_key(&key);
            if absent {
                m.insert(key, value);
            }
            prop_assert_eq!(inserted, absent);
        }
        Op::Remove(key) => {
            prop_assert_eq!(t.remove(&key), m.remove(&key));
        }
        Op::Get(key) => {
            prop_assert_eq!(t.get(&key), m.get(&key));
        }
        Op::PopFirst => {
            prop_assert_eq!(t.pop_first(), m.pop_first());
        }
        Op::PopLast => {
            prop_assert_eq!(t.pop_last(), m.pop_last());
        }
    }
    prop_assert_eq!(t.len(), m.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=1500)) {
        let mut t: RbTree<u16, u64> = RbTree::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            apply(&mut t, &mut m, op)?;
        }

        prop_assert!(t.check_invariants().is_ok(), "{:?}", t.check_invariants());
        let got: Vec<(u16, u64)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u64)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_invariants_after_every_op(ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        let mut t: RbTree<u16, u64> = RbTree::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            apply(&mut t, &mut m, op)?;
            prop_assert!(t.check_invariants().is_ok(), "{:?}", t.check_invariants());
        }
    }

    #[test]
    fn prop_size_conservation(
        keys in prop::collection::btree_set(any::<u32>(), 0..400),
        remove_every in 1usize..6,
    ) {
        let mut t: RbTree<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
        prop_assert_eq!(t.len(), keys.len());

        let doomed: Vec<u32> = keys.iter().copied().step_by(remove_every).collect();
        for k in &doomed {
            prop_assert!(t.remove(k).is_some());
        }
        prop_assert_eq!(t.len(), keys.len() - doomed.len());
        for k in &keys {
            prop_assert_eq!(t.contains_key(k), !doomed.contains(k));
        }
        prop_assert!(t.check_invariants().is_ok());
    }

    #[test]
    fn prop_merge_matches_union(
        a in prop::collection::btree_set(0u32..2000, 0..200),
        b in prop::collection::btree_set(0u32..2000, 0..200),
        split in 0u32..2000,
    ) {
        // Half the cases have disjoint ranges (join path), the rest overlap.
        let low: RbTree<u32, u32> = a.iter().filter(|&&k| k < split).map(|&k| (k, 0)).collect();
        let high: RbTree<u32, u32> = b.iter().map(|&k| (k, 1)).filter(|&(k, _)| k >= split || a.len() % 2 == 0).collect();

        let mut expected: BTreeMap<u32, u32> = high.iter().map(|(k, v)| (*k, *v)).collect();
        for (k, v) in low.iter() {
            expected.insert(*k, *v);
        }

        let mut merged = low;
        merged.merge(high);
        prop_assert!(merged.check_invariants().is_ok(), "{:?}", merged.check_invariants());
        let got: Vec<(u32, u32)> = merged.iter().map(|(k, v)| (*k, *v)).collect();
        let want: Vec<(u32, u32)> = expected.into_iter().collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_traversals_visit_every_entry(keys in prop::collection::vec(any::<i16>(), 0..300)) {
        let t: RbTree<i16, ()> = keys.iter().map(|&k| (k, ())).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();

        let in_order: Vec<i16> = t.in_order().map(|(k, _)| *k).collect();
        prop_assert_eq!(&in_order, &sorted);

        let mut pre: Vec<i16> = t.pre_order().map(|(k, _)| *k).collect();
        pre.sort_unstable();
        prop_assert_eq!(&pre, &sorted);

        let mut level: Vec<i16> = t.level_order().map(|(k, _)| *k).collect();
        if let Some(first) = level.first() {
            prop_assert_eq!(Some(first), t.pre_order().next().map(|(k, _)| k));
        }
        level.sort_unstable();
        prop_assert_eq!(&level, &sorted);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<u8> = (1..=7).collect();

    for_each_permutation(&keys, |perm| {
        let mut t: RbTree<u8, usize> = RbTree::new();
        for (i, k) in perm.into_iter().enumerate() {
            assert!(t.insert(k, i));
            t.check_invariants().unwrap();
        }
        let got: Vec<u8> = t.keys().copied().collect();
        assert_eq!(got, keys);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<u8> = (1..=7).collect();

    // Insert in a few fixed orders, then remove in all permutations.
    for base_order in [keys.clone(), keys.iter().rev().copied().collect(), vec![4, 2, 6, 1, 3, 5, 7]] {
        let base: RbTree<u8, ()> = base_order.iter().map(|&k| (k, ())).collect();

        for_each_permutation(&keys, |perm| {
            let mut t = base.clone();
            let mut m: BTreeMap<u8, ()> = keys.iter().map(|&k| (k, ())).collect();

            for k in perm {
                assert_eq!(t.remove(&k), m.remove(&k));
                assert_eq!(t.len(), m.len());
                t.check_invariants().unwrap();
            }
            assert_eq!(t.len(), 0);
            assert!(t.root.is_none());
        });
    }
}
