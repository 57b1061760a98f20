use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::{Rng, SeedableRng, XorShiftRng};
use treap_index::treap::{Treap, TreapSet};
use treap_index::TreapError;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn int_test_treap() {
    init_logger();
    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
    let mut treap = Treap::new();
    let mut expected = Vec::new();
    for _ in 0..10_000 {
        let key = rng.gen_range(0, 2_000);
        let priority = rng.next_u32();

        treap.insert(key, priority);
        expected.push((key, priority));
    }

    assert_eq!(treap.check_invariants(), Ok(()));
    assert_eq!(treap.len(), expected.len());

    expected.sort();
    assert_eq!(treap.min(), Ok(&expected[0].0));
    assert_eq!(treap.max(), Ok(&expected[expected.len() - 1].0));

    let highest = expected.iter().map(|entry| entry.1).max();
    assert_eq!(treap.root().map(|node| *node.priority()), highest);

    for entry in &expected {
        assert!(treap.contains(&entry.0));
        assert_eq!(treap.search(&entry.0).map(|node| *node.key()), Some(entry.0));
    }

    let mut expected_len = expected.len();
    for (index, entry) in expected.iter().enumerate() {
        assert!(treap.remove(&entry.0));
        expected_len -= 1;
        assert_eq!(treap.len(), expected_len);
        if index % 500 == 0 {
            assert_eq!(treap.check_invariants(), Ok(()));
        }
    }

    assert!(treap.is_empty());
    assert_eq!(treap.peek(), Err(TreapError::EmptyCollection));
    assert!(!treap.remove(&0));
}

#[test]
fn int_test_treap_set() {
    init_logger();
    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = TreapSet::from_seed([2, 2, 2, 2]);
    let mut expected = Vec::new();
    for _ in 0..10_000 {
        let key = rng.next_u32();
        if set.insert(key) {
            expected.push(key);
        }
    }

    expected.sort();
    assert_eq!(set.len(), expected.len());
    assert_eq!(set.min(), expected.first());
    assert_eq!(set.max(), expected.last());
    assert_eq!(set.treap().check_invariants(), Ok(()));

    for key in &expected {
        assert!(set.remove(key));
    }
    assert!(set.is_empty());
}

#[test]
fn int_test_update_priority() {
    init_logger();
    let mut rng: XorShiftRng = SeedableRng::from_seed([3, 1, 4, 1]);
    let mut treap = Treap::new();
    for key in 0..1_000u32 {
        treap.insert(key, rng.next_u32());
    }
    for _ in 0..1_000 {
        let key = rng.gen_range(0, 1_000);
        let priority = rng.next_u32();
        assert!(treap.update_priority(&key, priority));
        assert_eq!(treap.search(&key).map(|node| *node.priority()), Some(priority));
    }
    assert_eq!(treap.check_invariants(), Ok(()));
    assert_eq!(treap.len(), 1_000);

    let mut last = None;
    while let Ok((_, priority)) = treap.pop() {
        if let Some(last) = last {
            assert!(priority <= last);
        }
        last = Some(priority);
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, u16),
    Remove(u8),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Op::Insert(u8::arbitrary(g) % 32, u16::arbitrary(g))
        } else {
            Op::Remove(u8::arbitrary(g) % 32)
        }
    }
}

// Replays the operations against both a treap and a plain list of entries.
fn replay(ops: &[Op]) -> (Treap<u8, u16>, Vec<(u8, u16)>, bool) {
    let mut treap = Treap::new();
    let mut model: Vec<(u8, u16)> = Vec::new();
    let mut consistent = true;
    for op in ops {
        match *op {
            Op::Insert(key, priority) => {
                treap.insert(key, priority);
                model.push((key, priority));
            }
            Op::Remove(key) => {
                let before = treap.to_string();
                // Among duplicates, the node nearest the root is the one removed.
                let target = treap.search(&key).map(|node| (*node.key(), *node.priority()));
                let removed = treap.remove(&key);
                match target.and_then(|target| model.iter().position(|entry| *entry == target)) {
                    Some(index) => {
                        consistent &= removed;
                        model.remove(index);
                    }
                    None => {
                        consistent &= target.is_none() && !model.iter().any(|entry| entry.0 == key);
                        consistent &= !removed && treap.to_string() == before;
                    }
                }
            }
        }
        consistent &= treap.check_invariants().is_ok();
        consistent &= treap.len() == model.len();
    }
    (treap, model, consistent)
}

#[quickcheck]
fn prop_invariants_and_size(ops: Vec<Op>) -> bool {
    let (_, _, consistent) = replay(&ops);
    consistent
}

#[quickcheck]
fn prop_ordering_and_dominance(ops: Vec<Op>) -> bool {
    let (treap, model, _) = replay(&ops);
    if model.is_empty() {
        return treap.peek() == Err(TreapError::EmptyCollection)
            && treap.min() == Err(TreapError::EmptyCollection)
            && treap.max() == Err(TreapError::EmptyCollection);
    }
    let min = model.iter().map(|entry| entry.0).min();
    let max = model.iter().map(|entry| entry.0).max();
    let highest = model.iter().map(|entry| entry.1).max();
    treap.min().ok().cloned() == min
        && treap.max().ok().cloned() == max
        && treap.root().map(|node| *node.priority()) == highest
}

#[quickcheck]
fn prop_insert_then_remove(entries: Vec<(u8, u16)>, key: u8, priority: u16) -> bool {
    let mut treap = Treap::new();
    for (k, p) in entries {
        if k != key {
            treap.insert(k, p);
        }
    }
    let len = treap.len();
    treap.insert(key, priority);
    let found = treap.search(&key).map(|node| *node.key()) == Some(key);
    let removed = treap.remove(&key);
    found && removed && treap.search(&key).is_none() && treap.len() == len
}
