use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::slice;

use bytemuck::Pod;

use crate::erased::ErasedVec;
use crate::error::FatVecError;
use crate::growth::GrowthPolicy;
use crate::header::ELEMENT_ALIGN;
use crate::raw_alloc::{Global, RawAlloc};

/// A typed view over [`ErasedVec`] for plain-old-data items.
///
/// All item types share the single untyped implementation; `FatVec<T>` only
/// fixes the item size to `size_of::<T>()` and converts items to and from
/// bytes. Indexing and slice methods come from `Deref<Target = [T]>`.
///
/// # Panics
///
/// Construction panics if `T` needs a larger alignment than [`ELEMENT_ALIGN`].
pub struct FatVec<T: Pod, A: RawAlloc = Global> {
    raw: ErasedVec<A>,
    _marker: PhantomData<T>,
}

impl<T: Pod> FatVec<T> {
    /// Creates a vector with room for a single item.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_policy(capacity, GrowthPolicy::default())
    }

    #[must_use]
    pub fn with_policy(capacity: usize, policy: GrowthPolicy) -> Self {
        Self::with_capacity_in(capacity, policy, Global)
    }
}

impl<T: Pod, A: RawAlloc> FatVec<T, A> {
    #[track_caller]
    fn assert_alignment() {
        assert!(
            mem::align_of::<T>() <= ELEMENT_ALIGN,
            "Item alignment {} exceeds storage alignment {}",
            mem::align_of::<T>(),
            ELEMENT_ALIGN
        );
    }

    #[must_use]
    #[track_caller]
    pub fn with_capacity_in(capacity: usize, policy: GrowthPolicy, hooks: A) -> Self {
        Self::assert_alignment();
        Self {
            raw: ErasedVec::with_capacity_in(mem::size_of::<T>(), capacity, policy, hooks),
            _marker: PhantomData,
        }
    }

    /// Fallible version of [`with_capacity_in`](Self::with_capacity_in).
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::CapacityOverflow` or `FatVecError::AllocationFailed`.
    #[track_caller]
    pub fn try_with_capacity_in(
        capacity: usize,
        policy: GrowthPolicy,
        hooks: A,
    ) -> Result<Self, FatVecError> {
        Self::assert_alignment();
        Ok(Self {
            raw: ErasedVec::try_with_capacity_in(mem::size_of::<T>(), capacity, policy, hooks)?,
            _marker: PhantomData,
        })
    }

    /// Reinterprets an untyped vector whose item size matches `T`.
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::ItemSizeMismatch` if the item sizes differ.
    #[track_caller]
    pub fn try_from_erased(raw: ErasedVec<A>) -> Result<Self, FatVecError> {
        Self::assert_alignment();
        if raw.item_size() != mem::size_of::<T>() {
            return Err(FatVecError::ItemSizeMismatch {
                expected: mem::size_of::<T>(),
                actual: raw.item_size(),
            });
        }
        Ok(Self {
            raw,
            _marker: PhantomData,
        })
    }

    #[must_use]
    pub fn as_erased(&self) -> &ErasedVec<A> {
        &self.raw
    }

    #[must_use]
    pub fn into_erased(self) -> ErasedVec<A> {
        self.raw
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[must_use]
    pub fn item_size(&self) -> usize {
        self.raw.item_size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[must_use]
    pub fn policy(&self) -> GrowthPolicy {
        self.raw.policy()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: storage is aligned for `T` (checked at construction), holds
        // `len` initialized items, and any bit pattern is a valid `T: Pod`.
        unsafe { slice::from_raw_parts(self.raw.as_ptr().cast::<T>(), self.raw.len()) }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.raw.len();
        // SAFETY: as in `as_slice`, with exclusive access through `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.raw.as_mut_ptr().cast::<T>(), len) }
    }

    /// Appends an item.
    ///
    /// # Panics
    ///
    /// Aborts through `handle_alloc_error` if growing fails.
    pub fn push(&mut self, value: T) {
        self.raw.push(bytemuck::bytes_of(&value));
    }

    /// Fallible version of [`push`](Self::push).
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::CapacityOverflow` or `FatVecError::AllocationFailed`.
    pub fn try_push(&mut self, value: T) -> Result<(), FatVecError> {
        self.raw.try_push(bytemuck::bytes_of(&value))
    }

    /// Inserts an item at `index`. Returns `false` and does nothing if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> bool {
        self.raw.insert(index, bytemuck::bytes_of(&value))
    }

    /// Fallible version of [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns `FatVecError::IndexOutOfBounds` if `index > len()`, or an
    /// allocation error from growing.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), FatVecError> {
        self.raw.try_insert(index, bytemuck::bytes_of(&value))
    }

    /// Removes and returns the item at `index`, or `None` if out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = *self.as_slice().get(index)?;
        self.raw.remove(index);
        Some(value)
    }

    /// Removes and returns the last item, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        self.raw.pop().map(bytemuck::pod_read_unaligned)
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Grows the capacity to exactly `capacity` items if it is currently smaller.
    pub fn reserve(&mut self, capacity: usize) {
        self.raw.reserve(capacity);
    }

    /// # Errors
    ///
    /// Returns `FatVecError::CapacityOverflow` or `FatVecError::AllocationFailed`.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), FatVecError> {
        self.raw.try_reserve(capacity)
    }

    /// Shrinks the capacity to `max(len(), 1)`.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }

    /// # Errors
    ///
    /// Returns `FatVecError::AllocationFailed`.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), FatVecError> {
        self.raw.try_shrink_to_fit()
    }

    #[must_use]
    pub fn duplicate(&self) -> Self
    where
        A: Clone,
    {
        Self {
            raw: self.raw.duplicate(),
            _marker: PhantomData,
        }
    }

    /// # Errors
    ///
    /// Returns `FatVecError::AllocationFailed`.
    pub fn try_duplicate(&self) -> Result<Self, FatVecError>
    where
        A: Clone,
    {
        Ok(Self {
            raw: self.raw.try_duplicate()?,
            _marker: PhantomData,
        })
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.raw.swap(&mut other.raw);
    }
}

impl<T: Pod> Default for FatVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod, A: RawAlloc> Deref for FatVec<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod, A: RawAlloc> DerefMut for FatVec<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Pod, A: RawAlloc + Clone> Clone for FatVec<T, A> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl<T: Pod + PartialEq, A: RawAlloc> PartialEq for FatVec<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod + PartialEq, A: RawAlloc> PartialEq<[T]> for FatVec<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Pod + PartialEq, A: RawAlloc, const N: usize> PartialEq<[T; N]> for FatVec<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Pod + fmt::Debug, A: RawAlloc> fmt::Debug for FatVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Pod, A: RawAlloc> Extend<T> for FatVec<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Pod> FromIterator<T> for FatVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<'a, T: Pod, A: RawAlloc> IntoIterator for &'a FatVec<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: Pod, A: RawAlloc> IntoIterator for &'a mut FatVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
