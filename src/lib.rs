//! probemap: a fixed-record hash map built from scratch over a growable
//! chunked slot array, using open addressing with linear probing and
//! tombstone deletion.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build ProbeMap in small, verifiable layers so each piece can be
//!   reasoned about independently.
//! - Layers:
//!   - LifoStack<T>: write-append, read-by-draining occupancy tracker; lets
//!     teardown and rehash walk O(live) entries instead of O(capacity).
//!   - ChunkedStore<T>: growable array of fixed-size records with lazily
//!     materialized pages; reads distinguish "never materialized" from a
//!     stored default, which the probe protocol depends on.
//!   - ProbeMap: the map core; owns the store and the tracker and implements
//!     the probe protocol, insert/get/remove, and growth with full rehash.
//!
//! Constraints
//! - Keys and values are opaque byte records of fixed sizes chosen at
//!   construction (> 0 bytes each); the map owns every buffer it stores.
//! - Single-threaded: no locking, no suspension points; callers wanting
//!   shared access wrap the map externally.
//! - Capacity is always a power of two (probe wrap is a mask, never a
//!   modulo), starts at 1024, and only ever doubles.
//! - Hashing is MurmurHash3-32 with a fixed seed, so a key's probe origin is
//!   stable across rehash and across process runs.
//!
//! Probe protocol
//! - All three operations walk the same linear chain from the key's hash
//!   origin. Occupied-with-other-key and tombstoned slots continue the walk;
//!   a never-used (or never-materialized) slot ends it; a byte-equal key is
//!   a match. The first tombstone seen on the walk is the insertion target
//!   when no match exists, so deleted slots are reclaimed without ever
//!   splitting another key's chain.
//!
//! Growth and rehash
//! - Insert doubles the table before probing once the live count reaches the
//!   load-factor threshold (a construction-time parameter). Rehash is one
//!   logical transaction: drain the tracker, move every live pair's buffers
//!   out of their slots, double the index space, and reinsert each pair
//!   reusing its buffers, with no reallocation or copying per surviving entry.
//!   Any failure restores the map to its pre-rehash state and aborts the
//!   triggering insert.
//!
//! Why this split?
//! - Localize invariants: the store knows nothing about probing, the tracker
//!   nothing about slots, and only the map core ties buffer ownership to
//!   slot state.
//! - The tagged slot state (never-used / occupied / tombstoned, with buffers
//!   owned by the variant) makes the transfer-during-rehash and
//!   release-on-teardown paths compiler-checked.
//!
//! Notes and non-goals
//! - The table never shrinks; removals tombstone in place.
//! - No wire format, persistence, or CLI surface; this is an in-memory
//!   library primitive only.
//! - Teardown is `Drop`; with owned buffers there is no inconsistent state
//!   left to report.

mod hash;
mod map;
mod map_proptest;
pub mod store;
pub mod tracker;

// Public surface
pub use map::{MapError, ProbeMap, DEFAULT_LOAD_FACTOR};
