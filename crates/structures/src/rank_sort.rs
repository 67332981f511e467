//! In-place comparator-driven quicksort used to produce ranked results.
//!
//! ## Algorithm
//! Lomuto partition with the last element of the range as pivot. Elements
//! comparing `Less` or `Equal` to the pivot move to its left. The smaller
//! partition is sorted recursively and the larger one iteratively, which
//! keeps stack depth logarithmic.
//!
//! ## Guarantees
//! - Average O(n log n), worst case O(n²) (already-sorted input hits it)
//! - Not stable: elements that compare `Equal` may be reordered. Callers that
//!   need a deterministic order must break ties inside `compare`.

use std::cmp::Ordering;

/// Sorts `items` in place so that `compare(a, b) != Greater` for every
/// adjacent pair `a, b`.
///
/// Rust concept: the comparator is any `FnMut` closure, so callers express
/// "descending by count, then ascending by id" inline instead of defining a
/// comparator type.
pub fn rank_sort<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_range(items, &mut compare);
}

fn sort_range<T, F>(mut items: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while items.len() > 1 {
        let pivot = partition(items, compare);
        let (left, right) = std::mem::take(&mut items).split_at_mut(pivot);
        let right = &mut right[1..];

        if left.len() < right.len() {
            sort_range(left, compare);
            items = right;
        } else {
            sort_range(right, compare);
            items = left;
        }
    }
}

/// Partitions around the last element and returns its final index
fn partition<T, F>(items: &mut [T], compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let last = items.len() - 1;
    let mut boundary = 0;

    for j in 0..last {
        if compare(&items[j], &items[last]) != Ordering::Greater {
            items.swap(boundary, j);
            boundary += 1;
        }
    }

    items.swap(boundary, last);
    boundary
}
