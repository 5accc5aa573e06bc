#![cfg(test)]

// Property tests for HashList kept inside the crate so they can check the
// private structure (chains, ring, pool) after every operation.

use crate::hash_list::HashList;
use crate::hasher::FnvBuildHasher;
use crate::policy::DefaultPolicy;
use crate::tuning::Tuning;
use proptest::prelude::*;
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Add(usize, i32),
    Delete(usize),
    DeleteAt(usize),
    Find(usize),
    GetOrInsert(usize),
    Mutate(usize, i32),
    IndexOf(usize),
    EntryAt(usize),
    Resize(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Add(i, v)),
            2 => idx.clone().prop_map(Op::Delete),
            1 => (0usize..16).prop_map(Op::DeleteAt),
            2 => idx.clone().prop_map(Op::Find),
            1 => idx.clone().prop_map(Op::GetOrInsert),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => idx.clone().prop_map(Op::IndexOf),
            2 => (0usize..16).prop_map(Op::EntryAt),
            1 => (0usize..3000).prop_map(Op::Resize),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Ordered model: position in the Vec is the active-list index.
fn model_pos(model: &[(String, i32)], key: &str) -> Option<usize> {
    model.iter().position(|(k, _)| k == key)
}

fn run<S: BuildHasher>(
    mut sut: HashList<i32, DefaultPolicy, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(String, i32)> = Vec::new();
    for op in ops {
        match op {
            Op::Add(i, v) => {
                let k = &pool[i];
                let added = sut.add(k, v);
                let present = model_pos(&model, k).is_some();
                prop_assert_eq!(added, !present);
                if added {
                    model.push((k.clone(), v));
                }
            }
            Op::Delete(i) => {
                let k = &pool[i];
                let deleted = sut.delete(k);
                match model_pos(&model, k) {
                    Some(p) => {
                        prop_assert!(deleted);
                        model.remove(p);
                    }
                    None => prop_assert!(!deleted),
                }
            }
            Op::DeleteAt(idx) => {
                let res = sut.delete_at(idx);
                if idx < model.len() {
                    prop_assert_eq!(res, Ok(true));
                    model.remove(idx);
                } else {
                    prop_assert!(res.is_err());
                }
            }
            Op::Find(i) => {
                let k = &pool[i];
                let expected = model_pos(&model, k).map(|p| model[p].1);
                prop_assert_eq!(sut.get(k).copied(), expected);
            }
            Op::GetOrInsert(i) => {
                let k = &pool[i];
                let got = *sut.get_or_insert_empty(k);
                match model_pos(&model, k) {
                    Some(p) => prop_assert_eq!(got, model[p].1),
                    None => {
                        prop_assert_eq!(got, 0);
                        model.push((k.clone(), 0));
                    }
                }
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.wrapping_add(d);
                }
                if let Some(p) = model_pos(&model, k) {
                    model[p].1 = model[p].1.wrapping_add(d);
                }
            }
            Op::IndexOf(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.index_of(k), Ok(model_pos(&model, k)));
            }
            Op::EntryAt(idx) => match model.get(idx) {
                Some((k, v)) => prop_assert_eq!(sut.entry_at(idx), Ok((k.as_str(), v))),
                None => prop_assert!(sut.entry_at(idx).is_err()),
            },
            Op::Resize(n) => {
                let before = sut.hash_size();
                let changed = sut.resize(n);
                prop_assert_eq!(changed, crate::prime::to_prime(n) != before);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        sut.check_invariants();
        prop_assert_eq!(sut.len(), model.len());
        let order: Vec<(&str, i32)> = sut.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(&str, i32)> = model.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        prop_assert_eq!(order, expected);
    }
    Ok(())
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: state-machine equivalence against an ordered Vec model.
// Invariants exercised across random operation sequences:
// - Duplicate adds are rejected and keep the first value.
// - Deletes by key and by index remove exactly the model's entry.
// - Indexed access and `index_of` agree with model order.
// - Slot chains and the active ring describe the same live set, every entry
//   sits in `hash % size`, and the free pool stays within its cap.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), mtf in any::<bool>()) {
        let mut sut: HashList<i32> = HashList::new();
        sut.set_move_to_front(mtf);
        run(sut, pool, ops)?;
    }
}

// Property: same invariants while the table is forced to grow often
// (tiny load factor, plus the deep-miss trigger).
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_eager_growth((pool, ops) in arb_scenario()) {
        let mut sut: HashList<i32, DefaultPolicy, FnvBuildHasher> =
            HashList::with_parts(0, 0, DefaultPolicy, FnvBuildHasher);
        sut.set_tuning(
            Tuning::default()
                .with_max_load_factor(0.02)
                .with_max_depth(2)
                .with_move_to_front(true),
        );
        run(sut, pool, ops)?;
    }
}

// Property: worst-case collisions (constant hasher) with move-to-front on,
// so chain splicing and promotion are exercised on a single long chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: HashList<i32, DefaultPolicy, ConstBuildHasher> =
            HashList::with_parts(0, 0, DefaultPolicy, ConstBuildHasher);
        sut.set_move_to_front(true);
        run(sut, pool, ops)?;
    }
}

// Property: with a limit, `len` never exceeds it, the newest key always
// survives its own insert, and structure stays consistent under eviction.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_bounded_inserts_evict(
        limit in 1usize..6,
        ops in proptest::collection::vec((0u8..3, 0usize..20), 1..120),
    ) {
        let mut sut: HashList<usize> = HashList::with_capacity(0, limit);
        for (op, n) in ops {
            let key = format!("k{n}");
            match op {
                0 => {
                    let added = sut.add(&key, n);
                    if added {
                        prop_assert_eq!(sut.get(&key), Some(&n));
                    }
                }
                1 => { sut.find(&key); }
                _ => { sut.delete(&key); }
            }
            prop_assert!(sut.len() <= limit);
            sut.check_invariants();
        }
    }
}
