//! Open-addressing hash table with double hashing and tombstone deletion.
//!
//! Every index in the movie stores is one of these tables.
//!
//! ## Probing
//! - `h1(k) = hash(k) mod C` picks the home slot
//! - `h2(k) = 1 + (hash(k) mod (C - 2))` is the probe step, never zero
//! - slot `i` of the probe sequence is `(h1 + i * h2) mod C`
//!
//! `C` is always prime, so every step is coprime to the capacity and a probe
//! sequence visits each slot exactly once before repeating. Probing is
//! therefore bounded by `C` even when the table is full of tombstones.
//!
//! ## Deletion
//! Removed slots become tombstones instead of being cleared, so probe chains
//! that ran through them stay intact. An insert reuses the first tombstone on
//! its chain, but only after walking the rest of the chain to make sure the
//! key is not stored further along.
//!
//! ## Growth
//! Before a new key would push `live / C` above [`MAX_LOAD_FACTOR`], the
//! table grows to the next prime at least twice as large and every live
//! entry is reinserted through [`HashTable::put`]. Tombstones are dropped by
//! a rehash.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem;
use tracing::trace;

/// Capacity used by [`HashTable::new`]
pub const DEFAULT_CAPACITY: usize = 17;

/// Live entries per slot allowed before the table grows
pub const MAX_LOAD_FACTOR: f64 = 0.7;

/// Smallest capacity for which the step function is defined
const MIN_CAPACITY: usize = 3;

/// One slot of the backing array
#[derive(Debug, Clone)]
enum Slot<K, V> {
    /// Never written; terminates every probe chain
    Vacant,
    /// Held an entry that was removed; probing continues past it
    Tombstone,
    Occupied { key: K, value: V },
}

/// Outcome of walking a key's probe chain
enum Probe {
    /// The key lives in this slot
    Found(usize),
    /// The key is absent; this is where it would be inserted
    Insert(usize),
    /// The key is absent and the chain has no free slot
    Full,
}

/// Generic open-addressing associative container.
///
/// Keys only need `Hash + Eq`; values are opaque to the table. Hashing uses
/// `DefaultHasher::new()`, which is unkeyed, so probe sequences depend only
/// on the key and the current capacity.
#[derive(Debug, Clone)]
pub struct HashTable<K, V> {
    slots: Vec<Slot<K, V>>,
    len: usize,
}

impl<K: Hash + Eq, V> HashTable<K, V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` slots.
    ///
    /// The capacity is rounded up to the next prime (minimum 3).
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "HashTable capacity must be greater than zero");
        let capacity = next_prime(capacity.max(MIN_CAPACITY));

        Self {
            slots: vacant_slots(capacity),
            len: 0,
        }
    }

    /// Number of live (non-removed) entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Shorthand for `self.len() == 0`
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing array
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts `value` under `key`, overwriting any live value for that key.
    ///
    /// Returns the previous value if one was overwritten.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(index) => match &mut self.slots[index] {
                Slot::Occupied { value: current, .. } => Some(mem::replace(current, value)),
                _ => None,
            },
            Probe::Insert(_) | Probe::Full if self.needs_growth() => {
                self.rehash();
                self.put(key, value)
            }
            Probe::Insert(index) => {
                self.slots[index] = Slot::Occupied { key, value };
                self.len += 1;
                None
            }
            Probe::Full => {
                self.rehash();
                self.put(key, value)
            }
        }
    }

    /// Inserts only if `key` is absent.
    ///
    /// Returns `true` if the entry was inserted, `false` if the key was
    /// already present (the stored value is left untouched).
    pub fn put_if_absent(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.put(key, value);
        true
    }

    /// Returns a reference to the value stored under `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.probe(key) {
            Probe::Found(index) => match &self.slots[index] {
                Slot::Occupied { value, .. } => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to the value stored under `key`
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Found(index) => match &mut self.slots[index] {
                Slot::Occupied { value, .. } => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    /// Tombstones the entry for `key`.
    ///
    /// Returns `true` if a live entry was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.probe(key) {
            Probe::Found(index) => {
                self.slots[index] = Slot::Tombstone;
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Iterates over live entries in slot order.
    ///
    /// The order is stable between mutations but otherwise arbitrary.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        })
    }

    /// Iterates over live keys in slot order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over live values in slot order
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    fn hash_of(key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Home slot and step size for `key` at the current capacity
    fn probe_start(&self, key: &K) -> (usize, usize) {
        let capacity = self.slots.len() as u64;
        let hash = Self::hash_of(key);
        let home = hash % capacity;
        let step = 1 + hash % (capacity - 2);
        (home as usize, step as usize)
    }

    /// Walks the probe chain for `key`, remembering the first tombstone.
    fn probe(&self, key: &K) -> Probe {
        let capacity = self.slots.len();
        let (mut index, step) = self.probe_start(key);
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Vacant => return Probe::Insert(first_tombstone.unwrap_or(index)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
                Slot::Occupied { key: existing, .. } if existing == key => {
                    return Probe::Found(index);
                }
                Slot::Occupied { .. } => {}
            }
            index = (index + step) % capacity;
        }

        first_tombstone.map_or(Probe::Full, Probe::Insert)
    }

    /// True if one more live entry would exceed the load factor
    fn needs_growth(&self) -> bool {
        (self.len + 1) as f64 / self.slots.len() as f64 > MAX_LOAD_FACTOR
    }

    /// Grows the table and reinserts every live entry through `put`
    fn rehash(&mut self) {
        let new_capacity = next_prime(self.slots.len() * 2);
        trace!(
            old_capacity = self.slots.len(),
            new_capacity,
            live = self.len,
            "rehashing hash table"
        );

        let old_slots = mem::replace(&mut self.slots, vacant_slots(new_capacity));
        self.len = 0;

        for slot in old_slots {
            if let Slot::Occupied { key, value } = slot {
                self.put(key, value);
            }
        }
    }
}

impl<K: Hash + Eq, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn vacant_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    (0..capacity).map(|_| Slot::Vacant).collect()
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Smallest prime `>= n`
fn next_prime(n: usize) -> usize {
    let mut candidate = n;
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut table = HashTable::new();

        assert_eq!(table.put(1, "one"), None);
        assert_eq!(table.put(2, "two"), None);

        assert_eq!(table.get(&1), Some(&"one"));
        assert_eq!(table.get(&2), Some(&"two"));
        assert_eq!(table.get(&3), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_put_overwrites_last_value() {
        let mut table = HashTable::new();

        table.put("key", 1);
        assert_eq!(table.put("key", 2), Some(1));
        assert_eq!(table.put("key", 3), Some(2));

        assert_eq!(table.get(&"key"), Some(&3));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_put_if_absent() {
        let mut table = HashTable::new();

        assert!(table.put_if_absent(7, 'a'));
        assert!(!table.put_if_absent(7, 'b'));

        // First writer wins
        assert_eq!(table.get(&7), Some(&'a'));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_reports_absence_afterwards() {
        let mut table = HashTable::new();
        table.put(10, 100);

        assert!(table.remove(&10));
        assert!(!table.remove(&10));
        assert_eq!(table.get(&10), None);
        assert!(!table.contains_key(&10));
        assert!(table.is_empty());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut table = HashTable::new();
        table.put(1, vec![1, 2]);

        table.get_mut(&1).unwrap().push(3);

        assert_eq!(table.get(&1), Some(&vec![1, 2, 3]));
        assert!(table.get_mut(&2).is_none());
    }

    #[test]
    fn test_lookups_cross_tombstones() {
        // A tiny table forces long shared probe chains
        let mut table = HashTable::with_capacity(3);
        for key in 0..50 {
            table.put(key, key * 10);
        }
        for key in (0..50).step_by(2) {
            assert!(table.remove(&key));
        }

        for key in 0..50 {
            if key % 2 == 0 {
                assert_eq!(table.get(&key), None);
            } else {
                assert_eq!(table.get(&key), Some(&(key * 10)));
            }
        }
        assert_eq!(table.len(), 25);
    }

    #[test]
    fn test_size_counts_live_entries_only() {
        let mut table = HashTable::with_capacity(11);

        // Churn creates and reuses tombstones
        for round in 0..20 {
            for key in 0..5 {
                table.put(key, round);
            }
            for key in 0..5 {
                table.remove(&key);
            }
        }
        for key in 0..5 {
            table.put(key, -1);
        }

        assert_eq!(table.len(), 5);
        for key in 0..5 {
            assert_eq!(table.get(&key), Some(&-1));
        }
    }

    #[test]
    fn test_churn_does_not_grow_table() {
        let mut table = HashTable::with_capacity(11);

        for key in 0..1_000 {
            table.put(key, ());
            table.remove(&key);
        }

        assert_eq!(table.capacity(), 11);
        assert!(table.is_empty());
    }

    #[test]
    fn test_rehash_preserves_entries() {
        let mut table = HashTable::with_capacity(5);
        let initial_capacity = table.capacity();

        for key in 0..1_000u32 {
            table.put(key, key.to_string());
        }

        assert!(table.capacity() > initial_capacity);
        assert_eq!(table.len(), 1_000);
        for key in 0..1_000u32 {
            assert_eq!(table.get(&key), Some(&key.to_string()));
        }
    }

    #[test]
    fn test_load_factor_bound_holds_after_every_insert() {
        let mut table = HashTable::with_capacity(3);

        for key in 0..500 {
            table.put(key, ());
            let load = table.len() as f64 / table.capacity() as f64;
            assert!(load <= MAX_LOAD_FACTOR, "load {load} after inserting {key}");
        }
    }

    #[test]
    fn test_capacity_is_prime() {
        assert_eq!(HashTable::<u8, u8>::with_capacity(1).capacity(), 3);
        assert_eq!(HashTable::<u8, u8>::with_capacity(16).capacity(), 17);
        assert_eq!(HashTable::<u8, u8>::with_capacity(100).capacity(), 101);
        assert_eq!(HashTable::<u8, u8>::new().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn test_zero_capacity_is_fatal() {
        let _table: HashTable<i32, i32> = HashTable::with_capacity(0);
    }

    #[test]
    fn test_iter_visits_live_entries() {
        let mut table = HashTable::new();
        for key in 0..10 {
            table.put(key, key);
        }
        table.remove(&3);
        table.remove(&7);

        let mut keys: Vec<i32> = table.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, vec![0, 1, 2, 4, 5, 6, 8, 9]);

        let total: i32 = table.values().sum();
        assert_eq!(total, 45 - 3 - 7);
        assert_eq!(table.iter().count(), table.len());
    }

    #[test]
    fn test_put_overwrites_key_stored_past_tombstone() {
        // A tiny table forces long, shared probe chains
        let mut table = HashTable::with_capacity(3);
        for key in 0..40 {
            table.put(key, key * 10);
        }
        for key in (0..40).step_by(3) {
            assert!(table.remove(&key));
        }
        let live = table.len();
        assert_eq!(live, 26);

        // Survivors must be overwritten in place, never duplicated into an
        // earlier tombstone
        for key in (0..40).filter(|key| key % 3 != 0) {
            assert_eq!(table.put(key, key * 100), Some(key * 10));
        }

        assert_eq!(table.len(), live);
        assert_eq!(table.iter().count(), table.len());
        for key in (0..40).filter(|key| key % 3 != 0) {
            assert_eq!(table.get(&key), Some(&(key * 100)));
        }
        for key in (0..40).step_by(3) {
            assert!(!table.contains_key(&key));
        }
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(3), 3);
        assert_eq!(next_prime(4), 5);
        assert_eq!(next_prime(34), 37);
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(!is_prime(9));
    }
}
