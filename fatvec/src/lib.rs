#![cfg_attr(not(test), no_std)]

//! `fatvec`: a type-agnostic growable vector with its header stored in front of the items.
//!
//! A vector is one allocation laid out as `[header][item 0][item 1]...`. The
//! header holds the capacity, the length and the size of one item; the vector
//! itself only keeps a pointer to item 0, the same way a raw array would.
//!
//! ```text
//! +--------+--------------------------------+
//! | header | item 0 | item 1 | item 2 | ... |
//! +--------+--------------------------------+
//!          ^
//!          `-- handle kept by the vector
//! ```
//!
//! This crate is `no_std` compatible; it needs the `alloc` crate.
//!
//! # Two faces, one implementation
//!
//! - [`ErasedVec`] knows nothing about its items but their size in bytes.
//! - [`FatVec<T>`] fixes the item size to a plain-old-data type `T` and gives
//!   back slices of `T`. It is a thin wrapper over `ErasedVec`, so every item
//!   type shares the same code.
//!
//! ```
//! # use fatvec::ErasedVec;
//! let mut vec = ErasedVec::with_capacity(4, 2);
//!
//! vec.push(&10u32.to_le_bytes());
//! vec.push(&20u32.to_le_bytes());
//! vec.push(&30u32.to_le_bytes()); // full: capacity doubles from 2 to 4
//!
//! assert_eq!(vec.len(), 3);
//! assert_eq!(vec.capacity(), 4);
//! assert_eq!(vec.get(2), Some(&30u32.to_le_bytes()[..]));
//!
//! vec.remove(1);
//! assert_eq!(vec.len(), 2);
//! assert_eq!(vec.capacity(), 4);
//! ```
//!
//! ```
//! # use fatvec::FatVec;
//! let mut vec: FatVec<u32> = FatVec::with_capacity(2);
//! vec.extend([10, 20, 30]);
//! vec.insert(0, 5);
//!
//! assert_eq!(vec[0], 5);
//! assert_eq!(vec, [5, 10, 20, 30]);
//! assert_eq!(vec.pop(), Some(30));
//! ```
//!
//! # Relocation
//!
//! `push`, `insert`, `reserve` and `shrink_to_fit` may reallocate, which can
//! move the whole buffer. They take `&mut self`, so the vector re-adopts the
//! new location itself and no slice borrowed before the call can be used
//! after it. `remove`, `pop`, `clear`, `swap` and the accessors never move
//! the buffer.
//!
//! # Growth
//!
//! A full vector doubles its capacity while the capacity is at most
//! [`GrowthPolicy::max_prealloc`] items (1_048_576 by default) and grows by
//! one item at a time beyond that. `reserve` and `shrink_to_fit` resize to
//! an exact capacity instead.
//!
//! ```
//! # use fatvec::{FatVec, GrowthPolicy};
//! let mut vec: FatVec<u8> = FatVec::with_policy(1, GrowthPolicy::new(4));
//! let mut capacities = Vec::new();
//! for i in 0..7 {
//!     vec.push(i);
//!     capacities.push(vec.capacity());
//! }
//! assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8]);
//! vec.push(7);
//! vec.push(8);
//! assert_eq!(vec.capacity(), 9);
//! ```
//!
//! # Errors
//!
//! Two kinds of failure are kept apart:
//!
//! - Allocation failure is fatal. The plain methods hand it to
//!   `handle_alloc_error`; every growing method has a `try_*` twin returning
//!   [`FatVecError`] for callers that propagate it themselves. Either way a
//!   failed call leaves the vector unchanged.
//! - A bad index is not. `insert` and `remove` return `false`, `pop` returns
//!   `None`, and the vector is left as it was.
//!
//! # Allocation hooks
//!
//! Vectors allocate through a [`RawAlloc`] implementation: `allocate`,
//! `reallocate` and `release`. [`Global`] forwards to the global heap.

extern crate alloc;

mod erased;
mod error;
mod growth;
mod header;
mod raw_alloc;
mod typed;

// Re-export public types and traits
pub use erased::ErasedVec;
pub use error::FatVecError;
pub use growth::GrowthPolicy;
pub use header::{ELEMENT_ALIGN, HEADER_SIZE};
pub use raw_alloc::{Global, RawAlloc};
pub use typed::FatVec;
