#![cfg(test)]

// Property tests for ProbeMap kept inside the crate so they can assert the
// structural invariants (capacity, load-factor bound) alongside model parity.

use crate::map::ProbeMap;
use proptest::prelude::*;
use std::collections::HashMap;

const KEY_SIZE: usize = 8;
const VALUE_SIZE: usize = 8;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, the pool shrinks in length, and op lists shrink in length. A small
// pool keeps overwrite/remove collisions frequent.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, u64),
    Remove(usize),
    Get(usize),
    Contains(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u64>, Vec<Op>)> {
    proptest::collection::vec(any::<u64>(), 1..=16).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<u64>()).prop_map(|(i, v)| Op::Insert(i, v)),
            idx.clone().prop_map(Op::Remove),
            idx.clone().prop_map(Op::Get),
            idx.prop_map(Op::Contains),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert-or-update semantics match the model (no duplicate-key failures).
// - `remove` reports presence exactly as the model does and is a no-op on
//   absent keys.
// - `get`/`contains_key` parity with the model after every operation.
// - `len` parity; capacity stays a power of two; the live count stays below
//   the load-factor threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut = ProbeMap::new(KEY_SIZE, VALUE_SIZE).unwrap();
        let mut model: HashMap<u64, u64> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    sut.insert(&pool[i].to_le_bytes(), &v.to_le_bytes()).unwrap();
                    model.insert(pool[i], v);
                }
                Op::Remove(i) => {
                    let removed = sut.remove(&pool[i].to_le_bytes()).unwrap();
                    prop_assert_eq!(removed, model.remove(&pool[i]).is_some());
                }
                Op::Get(i) => {
                    let got = sut
                        .get(&pool[i].to_le_bytes())
                        .unwrap()
                        .map(|v| u64::from_le_bytes(v.try_into().unwrap()));
                    prop_assert_eq!(got, model.get(&pool[i]).copied());
                }
                Op::Contains(i) => {
                    prop_assert_eq!(
                        sut.contains_key(&pool[i].to_le_bytes()).unwrap(),
                        model.contains_key(&pool[i])
                    );
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert!(sut.capacity().is_power_of_two());
            prop_assert!((sut.len() as f64) < sut.load_factor() * sut.capacity() as f64);
        }

        // Final sweep: every model entry is retrievable with its exact value.
        for (k, v) in &model {
            prop_assert_eq!(
                sut.get(&k.to_le_bytes()).unwrap(),
                Some(&v.to_le_bytes()[..])
            );
        }
    }

    // Property: rehash preserves content. Enough distinct keys to force one
    // or more doublings, then every original value reads back unchanged and
    // the live count matches the number of distinct keys.
    #[test]
    fn prop_rehash_preserves_content(seed in any::<u64>(), count in 800usize..1600) {
        let mut sut = ProbeMap::new(KEY_SIZE, VALUE_SIZE).unwrap();
        let mut model: HashMap<u64, u64> = HashMap::new();

        let mut state = seed;
        for _ in 0..count {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let key = state;
            let value = state.rotate_left(17);
            sut.insert(&key.to_le_bytes(), &value.to_le_bytes()).unwrap();
            model.insert(key, value);
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.capacity().is_power_of_two());
        for (k, v) in &model {
            prop_assert_eq!(
                sut.get(&k.to_le_bytes()).unwrap(),
                Some(&v.to_le_bytes()[..])
            );
        }
    }
}
