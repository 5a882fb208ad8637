use core::fmt;
use core::mem;
use core::ptr::{self, NonNull};
use core::slice;

use crate::error::FatVecError;
use crate::growth::{self, GrowthPolicy};
use crate::header::{self, Header};
use crate::raw_alloc::{self, unwrap_or_fail, Global, RawAlloc};

/// A growable vector of fixed-size items whose element type is only known by its size.
///
/// Items are byte slices of exactly [`item_size`](Self::item_size) bytes. Capacity,
/// length and item size live in a header in front of the item storage, inside
/// the same allocation.
///
/// Operations that may grow the storage (`push`, `insert`, `reserve`,
/// `shrink_to_fit`) take `&mut self` and may move the whole allocation; any
/// slice previously borrowed from the vector cannot outlive such a call.
pub struct ErasedVec<A: RawAlloc = Global> {
    handle: NonNull<u8>,
    policy: GrowthPolicy,
    hooks: A,
}

// SAFETY: the vector exclusively owns its allocation.
unsafe impl<A: RawAlloc + Send> Send for ErasedVec<A> {}
unsafe impl<A: RawAlloc + Sync> Sync for ErasedVec<A> {}

impl ErasedVec<Global> {
    /// Creates a vector with room for a single item.
    #[must_use]
    pub fn new(item_size: usize) -> Self {
        Self::with_capacity(item_size, 1)
    }

    /// Creates a vector with room for `capacity` items, all zero-filled.
    ///
    /// # Panics
    ///
    /// Panics if the byte size of `capacity` items overflows. Aborts through
    /// `handle_alloc_error` if the allocation fails.
    #[must_use]
    pub fn with_capacity(item_size: usize, capacity: usize) -> Self {
        Self::with_policy(item_size, capacity, GrowthPolicy::default())
    }

    /// Creates a vector with a custom growth policy.
    ///
    /// # Panics
    ///
    /// Same as [`with_capacity`](Self::with_capacity).
    #[must_use]
    pub fn with_policy(item_size: usize, capacity: usize, policy: GrowthPolicy) -> Self {
        Self::with_capacity_in(item_size, capacity, policy, Global)
    }

    /// Fallible version of [`with_capacity`](Self::with_capacity).
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::CapacityOverflow` or `FatVecError::AllocationFailed`.
    pub fn try_with_capacity(item_size: usize, capacity: usize) -> Result<Self, FatVecError> {
        Self::try_with_capacity_in(item_size, capacity, GrowthPolicy::default(), Global)
    }
}

impl<A: RawAlloc> ErasedVec<A> {
    /// Creates a vector that allocates through `hooks`.
    ///
    /// # Panics
    ///
    /// Same as [`ErasedVec::with_capacity`].
    #[must_use]
    pub fn with_capacity_in(
        item_size: usize,
        capacity: usize,
        policy: GrowthPolicy,
        hooks: A,
    ) -> Self {
        unwrap_or_fail(Self::try_with_capacity_in(item_size, capacity, policy, hooks))
    }

    /// Fallible version of [`with_capacity_in`](Self::with_capacity_in).
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::CapacityOverflow` or `FatVecError::AllocationFailed`.
    pub fn try_with_capacity_in(
        item_size: usize,
        capacity: usize,
        policy: GrowthPolicy,
        hooks: A,
    ) -> Result<Self, FatVecError> {
        let handle = raw_alloc::create(item_size, capacity, &hooks)?;
        Ok(Self {
            handle,
            policy,
            hooks,
        })
    }

    fn header(&self) -> Header {
        // SAFETY: `handle` is live for as long as `self` is.
        unsafe { header::read(self.handle) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.header().length
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.header().capacity
    }

    /// Size of one item in bytes, fixed at construction.
    #[must_use]
    pub fn item_size(&self) -> usize {
        self.header().item_size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.hooks
    }

    /// Pointer to the first item. Invalidated by any operation that may grow.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.handle.as_ptr()
    }

    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.handle.as_ptr()
    }

    /// The live items as one contiguous byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let Header {
            length, item_size, ..
        } = self.header();
        // SAFETY: the whole capacity region is initialized (zero-filled on allocation).
        unsafe { slice::from_raw_parts(self.handle.as_ptr(), length * item_size) }
    }

    #[must_use]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let Header {
            length, item_size, ..
        } = self.header();
        // SAFETY: as in `as_bytes`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.handle.as_ptr(), length * item_size) }
    }

    /// Gets the item at `index`.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let item_size = self.item_size();
        if index >= self.len() {
            return None;
        }
        self.as_bytes()
            .get(index * item_size..(index + 1) * item_size)
    }

    /// Gets the item at `index` for writing.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let item_size = self.item_size();
        if index >= self.len() {
            return None;
        }
        self.as_bytes_mut()
            .get_mut(index * item_size..(index + 1) * item_size)
    }

    fn check_item(&self, item: &[u8]) -> Result<(), FatVecError> {
        let expected = self.item_size();
        if item.len() == expected {
            Ok(())
        } else {
            Err(FatVecError::ItemSizeMismatch {
                expected,
                actual: item.len(),
            })
        }
    }

    /// Makes room for one more item, growing by the policy if full.
    fn ensure_spare(&mut self) -> Result<(), FatVecError> {
        let Header {
            capacity, length, ..
        } = self.header();
        if length == capacity {
            // SAFETY: `handle` is live and was allocated through `hooks`.
            self.handle = unsafe { growth::grow(self.handle, &self.policy, &self.hooks)? };
        }
        Ok(())
    }

    /// Appends an item.
    ///
    /// # Panics
    ///
    /// Panics if `item.len()` differs from the item size. Aborts through
    /// `handle_alloc_error` if growing fails.
    #[track_caller]
    pub fn push(&mut self, item: &[u8]) {
        unwrap_or_fail(self.try_push(item));
    }

    /// Fallible version of [`push`](Self::push). The vector is unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::ItemSizeMismatch`, `FatVecError::CapacityOverflow`
    /// or `FatVecError::AllocationFailed`.
    pub fn try_push(&mut self, item: &[u8]) -> Result<(), FatVecError> {
        self.check_item(item)?;
        self.ensure_spare()?;

        let Header {
            length, item_size, ..
        } = self.header();
        // SAFETY: `length < capacity` after `ensure_spare`.
        unsafe {
            ptr::copy_nonoverlapping(
                item.as_ptr(),
                self.handle.as_ptr().add(length * item_size),
                item_size,
            );
            header::set_length(self.handle, length + 1);
        }
        Ok(())
    }

    /// Inserts an item at `index`, shifting later items right.
    ///
    /// Returns `false` and leaves the vector untouched if `index > len()`.
    ///
    /// # Panics
    ///
    /// Same as [`push`](Self::push).
    #[track_caller]
    pub fn insert(&mut self, index: usize, item: &[u8]) -> bool {
        match self.try_insert(index, item) {
            Ok(()) => true,
            Err(FatVecError::IndexOutOfBounds { .. }) => false,
            Err(err) => raw_alloc::fail(err),
        }
    }

    /// Fallible version of [`insert`](Self::insert). The vector is unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::IndexOutOfBounds` if `index > len()`, otherwise the
    /// same errors as [`try_push`](Self::try_push).
    pub fn try_insert(&mut self, index: usize, item: &[u8]) -> Result<(), FatVecError> {
        let length = self.len();
        if index > length {
            return Err(FatVecError::IndexOutOfBounds { index, length });
        }
        self.check_item(item)?;
        self.ensure_spare()?;

        let item_size = self.item_size();
        // SAFETY: `length < capacity`, so shifting `[index, length)` by one item stays in bounds.
        unsafe {
            let slot = self.handle.as_ptr().add(index * item_size);
            ptr::copy(slot, slot.add(item_size), (length - index) * item_size);
            ptr::copy_nonoverlapping(item.as_ptr(), slot, item_size);
            header::set_length(self.handle, length + 1);
        }
        Ok(())
    }

    /// Removes the item at `index`, shifting later items left.
    ///
    /// Returns `false` and leaves the vector untouched if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> bool {
        let Header {
            length, item_size, ..
        } = self.header();
        if index >= length {
            return false;
        }

        // SAFETY: `index < length`, both ranges lie within the live items.
        unsafe {
            let slot = self.handle.as_ptr().add(index * item_size);
            ptr::copy(slot.add(item_size), slot, (length - index - 1) * item_size);
            header::set_length(self.handle, length - 1);
        }
        true
    }

    /// Removes the last item and returns its bytes.
    ///
    /// The storage is left as is; the returned slice stays valid until the
    /// vector is next mutated. Returns `None` if the vector is empty.
    pub fn pop(&mut self) -> Option<&[u8]> {
        let Header {
            length, item_size, ..
        } = self.header();
        if length == 0 {
            return None;
        }

        // SAFETY: the popped item lies within the initialized capacity region.
        unsafe {
            header::set_length(self.handle, length - 1);
            Some(slice::from_raw_parts(
                self.handle.as_ptr().add((length - 1) * item_size),
                item_size,
            ))
        }
    }

    /// Sets the length to 0. Capacity and storage are untouched.
    pub fn clear(&mut self) {
        // SAFETY: 0 is always a valid length.
        unsafe { header::set_length(self.handle, 0) }
    }

    /// Grows the capacity to exactly `capacity` items if it is currently smaller.
    ///
    /// Unlike `Vec::reserve`, the argument is the total capacity, not the
    /// additional one, and the growth policy is bypassed.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow. Aborts through `handle_alloc_error` if
    /// the reallocation fails.
    #[track_caller]
    pub fn reserve(&mut self, capacity: usize) {
        unwrap_or_fail(self.try_reserve(capacity));
    }

    /// Fallible version of [`reserve`](Self::reserve). The vector is unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::CapacityOverflow` or `FatVecError::AllocationFailed`.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), FatVecError> {
        if capacity > self.capacity() {
            // SAFETY: `handle` is live and `capacity > length`.
            self.handle = unsafe { growth::resize_exact(self.handle, capacity, &self.hooks)? };
        }
        Ok(())
    }

    /// Shrinks the capacity to `max(len(), 1)`.
    ///
    /// # Panics
    ///
    /// Aborts through `handle_alloc_error` if the reallocation fails.
    #[track_caller]
    pub fn shrink_to_fit(&mut self) {
        unwrap_or_fail(self.try_shrink_to_fit());
    }

    /// Fallible version of [`shrink_to_fit`](Self::shrink_to_fit).
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::AllocationFailed` if the hooks refuse the reallocation.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), FatVecError> {
        let Header {
            capacity, length, ..
        } = self.header();
        let target = length.max(1);
        if capacity != length && capacity != target {
            // SAFETY: `handle` is live and `target >= length`.
            self.handle = unsafe { growth::resize_exact(self.handle, target, &self.hooks)? };
        }
        Ok(())
    }

    /// Deep copy: header, live items and the unused part of the storage.
    ///
    /// # Panics
    ///
    /// Aborts through `handle_alloc_error` if the allocation fails.
    #[must_use]
    pub fn duplicate(&self) -> Self
    where
        A: Clone,
    {
        unwrap_or_fail(self.try_duplicate())
    }

    /// Fallible version of [`duplicate`](Self::duplicate).
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::AllocationFailed`.
    pub fn try_duplicate(&self) -> Result<Self, FatVecError>
    where
        A: Clone,
    {
        let hooks = self.hooks.clone();
        // SAFETY: `handle` is live; the copy is owned by the new vector.
        let handle = unsafe { raw_alloc::duplicate(self.handle, &hooks)? };
        Ok(Self {
            handle,
            policy: self.policy,
            hooks,
        })
    }

    /// Exchanges the storage of two vectors without allocating.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &[u8] {
        let Header {
            capacity,
            item_size,
            ..
        } = self.header();
        unsafe { slice::from_raw_parts(self.handle.as_ptr(), capacity * item_size) }
    }
}

impl<A: RawAlloc> Drop for ErasedVec<A> {
    fn drop(&mut self) {
        // SAFETY: `handle` is live and dropped exactly once.
        unsafe { raw_alloc::destroy(self.handle, &self.hooks) }
    }
}

impl<A: RawAlloc + Clone> Clone for ErasedVec<A> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl<A: RawAlloc> PartialEq for ErasedVec<A> {
    fn eq(&self, other: &Self) -> bool {
        self.item_size() == other.item_size() && self.as_bytes() == other.as_bytes()
    }
}

impl<A: RawAlloc> Eq for ErasedVec<A> {}

impl<A: RawAlloc> fmt::Debug for ErasedVec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        f.debug_struct("ErasedVec")
            .field("len", &header.length)
            .field("capacity", &header.capacity)
            .field("item_size", &header.item_size)
            .finish_non_exhaustive()
    }
}
