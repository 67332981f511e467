//! Append-only sequence with amortized doubling growth.
//!
//! Used wherever a list of values is built one item at a time: collection
//! members, production companies, and the reverse indices of the rating and
//! credit stores.

use crate::error::{Result, StructureError};

/// Slots reserved by [`GrowableSequence::new`]
pub const DEFAULT_SEQUENCE_CAPACITY: usize = 10;

/// An indexable sequence that doubles its reserved capacity when full.
#[derive(Debug, Clone)]
pub struct GrowableSequence<T> {
    /// Raw storage; the growth policy lives in `capacity`
    items: Vec<T>,
    capacity: usize,
}

impl<T> GrowableSequence<T> {
    /// Creates an empty sequence with [`DEFAULT_SEQUENCE_CAPACITY`] slots
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SEQUENCE_CAPACITY)
    }

    /// Creates an empty sequence with room for `capacity` items.
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "GrowableSequence capacity must be greater than zero"
        );
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `item`, doubling the reserved capacity first if full
    pub fn append(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.grow();
        }
        self.items.push(item);
    }

    /// Returns the item at `index`, or `IndexOutOfBounds` if `index >= len`
    pub fn get(&self, index: usize) -> Result<&T> {
        self.items.get(index).ok_or(StructureError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        })
    }

    /// Removes the item at `index`, moving the last item into its place.
    ///
    /// Order is not preserved. Reserved capacity never shrinks.
    pub fn swap_remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(StructureError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.swap_remove(index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserved slots before the next doubling
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Borrowed view of the first `len()` items
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        self.items.reserve_exact(new_capacity - self.items.len());
        self.capacity = new_capacity;
    }
}

impl<T: Clone> GrowableSequence<T> {
    /// Copies the items out into an owned, exactly sized `Vec`
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T: PartialEq> GrowableSequence<T> {
    /// Linear scan for `item`
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Index of the first item equal to `item`
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|existing| existing == item)
    }
}

// Equality ignores reserved capacity
impl<T: PartialEq> PartialEq for GrowableSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T> Default for GrowableSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a GrowableSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for GrowableSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Self::new();
        for item in iter {
            sequence.append(item);
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_get() {
        let mut sequence = GrowableSequence::new();
        sequence.append("a");
        sequence.append("b");

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.get(0), Ok(&"a"));
        assert_eq!(sequence.get(1), Ok(&"b"));
    }

    #[test]
    fn test_get_out_of_range() {
        let mut sequence = GrowableSequence::new();
        sequence.append(1);

        assert_eq!(
            sequence.get(1),
            Err(StructureError::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert!(GrowableSequence::<i32>::new().get(0).is_err());
    }

    #[test]
    fn test_capacity_doubles_on_overflow() {
        let mut sequence = GrowableSequence::with_capacity(2);
        sequence.append(1);
        sequence.append(2);
        assert_eq!(sequence.capacity(), 2);

        sequence.append(3);
        assert_eq!(sequence.capacity(), 4);

        for i in 4..=9 {
            sequence.append(i);
        }
        assert_eq!(sequence.capacity(), 16);
        assert_eq!(sequence.to_vec(), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_swap_remove() {
        let mut sequence: GrowableSequence<i32> = (1..=4).collect();

        assert_eq!(sequence.swap_remove(0), Ok(1));
        assert_eq!(sequence.as_slice(), &[4, 2, 3]);
        assert!(sequence.swap_remove(3).is_err());
    }

    #[test]
    fn test_contains_and_position() {
        let sequence: GrowableSequence<i32> = vec![5, 6, 7].into_iter().collect();

        assert!(sequence.contains(&6));
        assert!(!sequence.contains(&8));
        assert_eq!(sequence.position(&7), Some(2));
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn test_zero_capacity_is_fatal() {
        let _sequence: GrowableSequence<u8> = GrowableSequence::with_capacity(0);
    }
}
