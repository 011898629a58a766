// ProbeMap integration test suite.
//
// Each test documents what behavior is being verified and which invariants
// are assumed or asserted. The core invariants exercised:
// - Round-trip: search returns the inserted value until removed/overwritten.
// - Overwrite: updating a present key never changes the live count.
// - Tombstones: removal keeps other keys' probe chains intact.
// - Growth: capacity stays a power of two and only doubles; rehash preserves
//   every live entry and carries no tombstones across.
use probemap::{MapError, ProbeMap};

fn key8(n: u64) -> [u8; 8] {
    n.to_le_bytes()
}

fn value8(n: u64) -> [u8; 8] {
    (n.wrapping_mul(0x9e37_79b9_7f4a_7c15)).to_le_bytes()
}

// Test: a concrete end-to-end scenario exercising every operation.
// 8-byte keys and values; insert keys 0..1024 (forcing at least one
// doubling), verify all, remove the evens, verify only odds remain, then
// overwrite key 5 and verify the update did not create a duplicate.
#[test]
fn end_to_end_scenario() {
    let mut map = ProbeMap::new(8, 8).expect("valid sizes");

    for i in 0u64..1024 {
        map.insert(&key8(i), &value8(i)).expect("insert ok");
    }
    assert_eq!(map.len(), 1024);
    for i in 0u64..1024 {
        assert_eq!(map.get(&key8(i)).unwrap(), Some(&value8(i)[..]));
    }

    for i in (0u64..1024).step_by(2) {
        assert!(map.remove(&key8(i)).unwrap(), "even key {i} present");
    }
    assert_eq!(map.len(), 512);
    for i in 0u64..1024 {
        let value = value8(i);
        let expected = if i % 2 == 1 { Some(&value[..]) } else { None };
        assert_eq!(map.get(&key8(i)).unwrap(), expected, "key {i}");
    }

    let updated = key8(0xfeed);
    map.insert(&key8(5), &updated).expect("overwrite ok");
    assert_eq!(map.len(), 512, "overwrite must not add an entry");
    assert_eq!(map.get(&key8(5)).unwrap(), Some(&updated[..]));
}

// Test: content survives multiple capacity doublings.
// Assumes: initial capacity 1024 and default load factor 0.7, so 5000
// distinct keys force several rehashes.
// Verifies: every value unchanged, len exact, capacity a power of two.
#[test]
fn content_survives_multiple_rehashes() {
    let mut map = ProbeMap::new(8, 8).unwrap();
    let initial = map.capacity();
    let mut doublings = 0;
    let mut capacity = map.capacity();

    for i in 0u64..5000 {
        map.insert(&key8(i), &value8(i)).unwrap();
        if map.capacity() != capacity {
            doublings += 1;
            assert_eq!(map.capacity(), capacity * 2, "capacity only doubles");
            capacity = map.capacity();
        }
    }

    assert!(doublings >= 2, "5000 keys from {initial} slots must double twice");
    assert_eq!(map.len(), 5000);
    assert!(map.capacity().is_power_of_two());
    for i in 0u64..5000 {
        assert_eq!(map.get(&key8(i)).unwrap(), Some(&value8(i)[..]));
    }
}

// Test: interleaved removes and inserts across a rehash boundary.
// Verifies: removed keys stay absent after growth (tombstones are not
// resurrected by the rehash) and surviving keys keep their values.
#[test]
fn removals_respected_across_rehash() {
    let mut map = ProbeMap::new(8, 8).unwrap();
    for i in 0u64..600 {
        map.insert(&key8(i), &value8(i)).unwrap();
    }
    for i in (0u64..600).step_by(3) {
        assert!(map.remove(&key8(i)).unwrap());
    }

    // Push well past the threshold so a doubling happens.
    for i in 600u64..2000 {
        map.insert(&key8(i), &value8(i)).unwrap();
    }
    assert!(map.capacity() > 1024);

    for i in 0u64..600 {
        let value = value8(i);
        let expected = if i % 3 == 0 { None } else { Some(&value[..]) };
        assert_eq!(map.get(&key8(i)).unwrap(), expected, "key {i}");
    }
    for i in 600u64..2000 {
        assert_eq!(map.get(&key8(i)).unwrap(), Some(&value8(i)[..]));
    }
}

// Test: the copy-out search form.
// Verifies: get_into copies the exact value on a hit, leaves the buffer
// untouched on a miss, and rejects an output buffer of the wrong length.
#[test]
fn get_into_copies_value() {
    let mut map = ProbeMap::new(8, 8).unwrap();
    map.insert(&key8(1), &value8(1)).unwrap();

    let mut out = [0u8; 8];
    assert!(map.get_into(&key8(1), &mut out).unwrap());
    assert_eq!(out, value8(1));

    let sentinel = [0xaau8; 8];
    let mut untouched = sentinel;
    assert!(!map.get_into(&key8(2), &mut untouched).unwrap());
    assert_eq!(untouched, sentinel, "miss must not write the output");

    let mut short = [0u8; 4];
    assert_eq!(
        map.get_into(&key8(1), &mut short).unwrap_err(),
        MapError::ValueLength {
            expected: 8,
            actual: 4
        }
    );
}

// Test: contains_key is the existence-check mode of search.
#[test]
fn contains_key_parity() {
    let mut map = ProbeMap::new(8, 8).unwrap();
    map.insert(&key8(3), &value8(3)).unwrap();
    assert!(map.contains_key(&key8(3)).unwrap());
    assert!(!map.contains_key(&key8(4)).unwrap());
    map.remove(&key8(3)).unwrap();
    assert!(!map.contains_key(&key8(3)).unwrap());
}

// Test: record sizes are independent and need not be word-aligned.
// Verifies: a 3-byte key / 13-byte value map round-trips, exercising the
// hash tail path and unaligned buffer copies.
#[test]
fn unaligned_record_sizes() {
    let mut map = ProbeMap::new(3, 13).unwrap();
    assert_eq!(map.key_size(), 3);
    assert_eq!(map.value_size(), 13);

    for i in 0u32..500 {
        let key = [(i & 0xff) as u8, ((i >> 8) & 0xff) as u8, 0x7e];
        let mut value = [0u8; 13];
        value[..4].copy_from_slice(&i.to_le_bytes());
        value[12] = 0xc3;
        map.insert(&key, &value).unwrap();
    }
    assert_eq!(map.len(), 500);

    for i in 0u32..500 {
        let key = [(i & 0xff) as u8, ((i >> 8) & 0xff) as u8, 0x7e];
        let mut expected = [0u8; 13];
        expected[..4].copy_from_slice(&i.to_le_bytes());
        expected[12] = 0xc3;
        assert_eq!(map.get(&key).unwrap(), Some(&expected[..]));
    }
}

// Test: an empty map answers queries without ever having materialized a
// store page.
#[test]
fn empty_map_queries() {
    let mut map = ProbeMap::new(8, 8).unwrap();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.get(&key8(0)).unwrap(), None);
    assert!(!map.contains_key(&key8(0)).unwrap());
    assert!(!map.remove(&key8(0)).unwrap());
    assert_eq!(map.capacity(), 1024);
}
