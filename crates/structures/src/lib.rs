//! # Structures Crate
//!
//! Hand-built containers that every movie store index is made from.
//!
//! ## Components
//!
//! - **hash_table**: open-addressing `HashTable<K, V>` with double hashing,
//!   tombstone deletion and load-factor driven growth
//! - **sequence**: `GrowableSequence<T>`, an append-only list with
//!   amortized doubling
//! - **rank_sort**: comparator-driven in-place quicksort for ranked results
//! - **error**: error type for out-of-range sequence access
//!
//! ## Example Usage
//!
//! ```
//! use structures::{rank_sort, GrowableSequence, HashTable};
//!
//! let mut counts: HashTable<i32, usize> = HashTable::new();
//! counts.put(862, 9);
//! counts.put(8844, 5);
//!
//! let mut ranked: Vec<(i32, usize)> = counts.iter().map(|(k, v)| (*k, *v)).collect();
//! rank_sort(&mut ranked, |a, b| b.1.cmp(&a.1));
//! assert_eq!(ranked[0].0, 862);
//!
//! let mut members = GrowableSequence::new();
//! members.append(862);
//! assert_eq!(members.get(0), Ok(&862));
//! ```

pub mod error;
pub mod hash_table;
pub mod rank_sort;
pub mod sequence;

pub use error::{Result, StructureError};
pub use hash_table::HashTable;
pub use rank_sort::rank_sort;
pub use sequence::GrowableSequence;
