//! ProbeMap: the map core over the chunked store and the occupancy tracker.

use crate::hash::murmur3_32;
use crate::store::ChunkedStore;
use crate::tracker::LifoStack;
use core::mem;

/// Growth threshold used by [`ProbeMap::new`]. The table doubles before the
/// live-entry count can reach this fraction of capacity.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

/// Starting slot count. Power of two so probe wrapping is a mask.
const INITIAL_CAPACITY: usize = 1 << 10;

/// One slot in the table. `Tombstoned` keeps its buffers: a later insert that
/// lands on the slot overwrites them in place instead of reallocating, and
/// teardown or rehash drops them. This keeps "logically empty but previously
/// written" structurally distinct from "never written", which the probe
/// protocol depends on.
#[derive(Clone, Debug)]
enum Slot {
    NeverUsed,
    Occupied { key: Box<[u8]>, value: Box<[u8]> },
    Tombstoned { key: Box<[u8]>, value: Box<[u8]> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// `key_size` or `value_size` of zero at construction.
    ZeroRecordSize,
    /// Load factor outside the open interval (0.0, 1.0).
    LoadFactorRange,
    /// Key slice length does not equal the map's `key_size`.
    KeyLength { expected: usize, actual: usize },
    /// Value slice length does not equal the map's `value_size`.
    ValueLength { expected: usize, actual: usize },
    /// A probe cycled through every slot without resolving; only reachable
    /// if the growth trigger is misconfigured.
    TableFull,
    /// The occupancy tracker referenced a slot the store never materialized.
    TrackerOutOfSync,
}

/// Where a probe walk ended. Shared by insert, get, and remove.
enum ProbeOutcome {
    /// Occupied slot whose key is byte-equal to the query.
    Match(usize),
    /// Insertion target: the first tombstone seen on the walk, or the
    /// never-used / never-materialized slot that terminated it.
    Vacant(usize),
    /// Every slot visited, no match and no tombstone to reuse.
    Full,
}

/// A hash map of fixed-size byte keys to fixed-size byte values.
///
/// Open addressing with linear probing over a [`ChunkedStore`] of slots;
/// removal tombstones the slot so other keys' probe chains stay intact; a
/// [`LifoStack`] of live indices lets teardown and rehash walk O(live)
/// entries. Capacity starts at 1024, is always a power of two, and doubles
/// (with a full rehash) whenever an insert would push the live count to the
/// load-factor threshold. It never shrinks.
///
/// Single-threaded by design: no operation suspends, and callers needing
/// shared access wrap the map externally.
#[derive(Debug)]
pub struct ProbeMap {
    slots: ChunkedStore<Slot>,
    live: LifoStack<usize>,
    key_size: usize,
    value_size: usize,
    capacity: usize,
    load_factor: f64,
}

impl ProbeMap {
    /// Create a map with the default load factor. Both sizes are in bytes,
    /// fixed for the map's lifetime, and must be non-zero.
    pub fn new(key_size: usize, value_size: usize) -> Result<Self, MapError> {
        Self::with_load_factor(key_size, value_size, DEFAULT_LOAD_FACTOR)
    }

    /// Create a map with an explicit growth threshold in (0.0, 1.0).
    /// Lower thresholds trade memory for shorter probe chains.
    pub fn with_load_factor(
        key_size: usize,
        value_size: usize,
        load_factor: f64,
    ) -> Result<Self, MapError> {
        if key_size == 0 || value_size == 0 {
            return Err(MapError::ZeroRecordSize);
        }
        if !(load_factor > 0.0 && load_factor < 1.0) {
            return Err(MapError::LoadFactorRange);
        }
        Ok(Self {
            slots: ChunkedStore::new(INITIAL_CAPACITY, Slot::NeverUsed),
            live: LifoStack::new(),
            key_size,
            value_size,
            capacity: INITIAL_CAPACITY,
            load_factor,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Current slot count. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn value_size(&self) -> usize {
        self.value_size
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Insert `value` under `key`, or update the stored value in place if the
    /// key is already present. May double the table and rehash first; a
    /// rehash error aborts the insert with the map unchanged.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), MapError> {
        self.check_key(key)?;
        self.check_value(value)?;

        // Grow before this insert could reach the threshold, so the live
        // count stays strictly below it after every operation. An update of
        // an existing key may grow one insert early; harmless.
        if (self.live.len() + 1) as f64 > self.load_factor * self.capacity as f64 {
            self.grow_and_rehash()?;
        }

        match self.probe(key) {
            ProbeOutcome::Match(index) => {
                if let Some(Slot::Occupied { value: stored, .. }) = self.slots.get_mut(index) {
                    stored.copy_from_slice(value);
                }
                // Index already tracked; no re-push.
                Ok(())
            }
            ProbeOutcome::Vacant(index) => {
                self.fill_slot(index, key, value);
                self.live.push(index);
                Ok(())
            }
            ProbeOutcome::Full => Err(MapError::TableFull),
        }
    }

    /// Borrow the value stored under `key`, or `None` if absent.
    pub fn get(&self, key: &[u8]) -> Result<Option<&[u8]>, MapError> {
        self.check_key(key)?;
        if let ProbeOutcome::Match(index) = self.probe(key) {
            if let Some(Slot::Occupied { value, .. }) = self.slots.get(index) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Copy the value stored under `key` into `out`, which must be exactly
    /// `value_size` bytes. Returns whether the key was present.
    pub fn get_into(&self, key: &[u8], out: &mut [u8]) -> Result<bool, MapError> {
        if out.len() != self.value_size {
            return Err(MapError::ValueLength {
                expected: self.value_size,
                actual: out.len(),
            });
        }
        match self.get(key)? {
            Some(value) => {
                out.copy_from_slice(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> Result<bool, MapError> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove `key` if present. The slot is tombstoned (its buffers held for
    /// reuse) and the tracker is rebuilt without that index; the tracker has
    /// no delete-by-value, so exclusion is a full drain-and-refill. Returns
    /// whether a key was found and erased; removing an absent key is a no-op.
    pub fn remove(&mut self, key: &[u8]) -> Result<bool, MapError> {
        self.check_key(key)?;
        let index = match self.probe(key) {
            ProbeOutcome::Match(index) => index,
            _ => return Ok(false),
        };

        if let Some(slot) = self.slots.get_mut(index) {
            if let Slot::Occupied { key, value } = mem::replace(slot, Slot::NeverUsed) {
                *slot = Slot::Tombstoned { key, value };
            }
        }

        let mut rebuilt = LifoStack::with_capacity(self.live.len().saturating_sub(1));
        while let Some(tracked) = self.live.pop() {
            if tracked != index {
                rebuilt.push(tracked);
            }
        }
        self.live = rebuilt;
        Ok(true)
    }

    fn check_key(&self, key: &[u8]) -> Result<(), MapError> {
        if key.len() != self.key_size {
            return Err(MapError::KeyLength {
                expected: self.key_size,
                actual: key.len(),
            });
        }
        Ok(())
    }

    fn check_value(&self, value: &[u8]) -> Result<(), MapError> {
        if value.len() != self.value_size {
            return Err(MapError::ValueLength {
                expected: self.value_size,
                actual: value.len(),
            });
        }
        Ok(())
    }

    /// Walk the probe chain for `key` from its hash origin.
    ///
    /// Tombstones do not terminate the walk: the key may live past them in
    /// its original chain, and stopping early would both miss it on lookup
    /// and duplicate it on insert. The first tombstone seen is remembered as
    /// the insertion target instead. A never-used slot, or one in a store
    /// page that was never materialized (which reads the same here), marks
    /// the definitive end of the chain.
    fn probe(&self, key: &[u8]) -> ProbeOutcome {
        let mask = self.capacity - 1;
        let origin = murmur3_32(key) as usize & mask;
        let mut index = origin;
        let mut reusable: Option<usize> = None;

        loop {
            match self.slots.get(index) {
                None | Some(Slot::NeverUsed) => {
                    return ProbeOutcome::Vacant(reusable.unwrap_or(index));
                }
                Some(Slot::Tombstoned { .. }) => {
                    if reusable.is_none() {
                        reusable = Some(index);
                    }
                }
                Some(Slot::Occupied { key: stored, .. }) => {
                    if stored.as_ref() == key {
                        return ProbeOutcome::Match(index);
                    }
                }
            }

            index = (index + 1) & mask;
            if index == origin {
                return match reusable {
                    Some(index) => ProbeOutcome::Vacant(index),
                    None => ProbeOutcome::Full,
                };
            }
        }
    }

    /// Place the caller's bytes at `index`. A tombstone's buffers are reused
    /// in place; otherwise fresh buffers are allocated by copying.
    fn fill_slot(&mut self, index: usize, key: &[u8], value: &[u8]) {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = match mem::replace(slot, Slot::NeverUsed) {
                    Slot::Tombstoned {
                        key: mut key_buf,
                        value: mut value_buf,
                    } => {
                        key_buf.copy_from_slice(key);
                        value_buf.copy_from_slice(value);
                        Slot::Occupied {
                            key: key_buf,
                            value: value_buf,
                        }
                    }
                    _ => Slot::Occupied {
                        key: key.into(),
                        value: value.into(),
                    },
                };
            }
            None => self.slots.set(
                index,
                Slot::Occupied {
                    key: key.into(),
                    value: value.into(),
                },
            ),
        }
    }

    /// Double the capacity and reinsert every live entry; one logical
    /// transaction. On any error the map is back in its pre-call state.
    fn grow_and_rehash(&mut self) -> Result<(), MapError> {
        let old_capacity = self.capacity;

        // Drain the tracker, taking ownership of each pair still genuinely
        // occupied and leaving its slot never-used. Stale tombstone indices
        // are skipped at the slot level. An index the store never
        // materialized means tracker and store have diverged: the drain is
        // undone before reporting.
        let mut pairs: Vec<(Box<[u8]>, Box<[u8]>)> = Vec::with_capacity(self.live.len());
        let mut sources: Vec<usize> = Vec::with_capacity(self.live.len());
        while let Some(index) = self.live.pop() {
            if !self.slots.is_allocated(index) {
                self.undo_drain(pairs, sources);
                return Err(MapError::TrackerOutOfSync);
            }
            if let Some(slot) = self.slots.get_mut(index) {
                match mem::replace(slot, Slot::NeverUsed) {
                    Slot::Occupied { key, value } => {
                        pairs.push((key, value));
                        sources.push(index);
                    }
                    other => *slot = other,
                }
            }
        }

        // Double the index space; the new range materializes lazily.
        self.capacity = old_capacity << 1;
        self.slots.grow(self.capacity);
        self.live = LifoStack::with_capacity(pairs.len());

        // Reinsert each pair reusing its buffers. The drained table has an
        // empty slot on every chain and the pair count is below half the new
        // capacity, so the probe cannot cycle; on the (unreachable) failure
        // the remaining pairs drop, capacity reverts, and the error
        // propagates so the triggering insert aborts.
        for (key, value) in pairs {
            if let Err(err) = self.reinsert_owned(key, value) {
                self.capacity = old_capacity;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Put drained pairs back into their source slots and re-track them.
    fn undo_drain(&mut self, pairs: Vec<(Box<[u8]>, Box<[u8]>)>, sources: Vec<usize>) {
        for ((key, value), index) in pairs.into_iter().zip(sources) {
            self.slots.set(index, Slot::Occupied { key, value });
            self.live.push(index);
        }
    }

    /// Rehash-path insert: the buffers already belong to this map, so the
    /// target slot takes them as-is: no allocation, no copy. Any spare
    /// tombstone buffers at the target are dropped by the overwrite.
    fn reinsert_owned(&mut self, key: Box<[u8]>, value: Box<[u8]>) -> Result<(), MapError> {
        match self.probe(&key) {
            ProbeOutcome::Vacant(index) => {
                self.slots.set(index, Slot::Occupied { key, value });
                self.live.push(index);
                Ok(())
            }
            ProbeOutcome::Match(index) => {
                // Drained pairs hold unique keys; tolerate a duplicate by
                // replacing without re-tracking.
                self.slots.set(index, Slot::Occupied { key, value });
                Ok(())
            }
            ProbeOutcome::Full => Err(MapError::TableFull),
        }
    }
}
