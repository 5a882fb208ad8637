//! Allocation hooks and the primitives built on them: create, duplicate, destroy.

use alloc::alloc::{handle_alloc_error, Layout};
use core::ptr::{self, NonNull};

use crate::error::FatVecError;
use crate::header::{self, Header, HEADER_SIZE};

/// The three hooks a vector allocates through.
///
/// Every layout passed in has a non-zero size (the header is always part of
/// the allocation) and an alignment of [`ELEMENT_ALIGN`](crate::ELEMENT_ALIGN).
/// Returning `None` reports an allocation failure.
///
/// # Safety
///
/// Implementations must behave like the global allocator: `allocate` and
/// `reallocate` return blocks of at least the requested size and alignment,
/// `reallocate` preserves the contents up to the smaller of the two sizes and
/// leaves the old block untouched when it fails, and `release` accepts every
/// block handed out by the other two hooks.
pub unsafe trait RawAlloc {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// # Safety
    ///
    /// `ptr` must be a live block from this allocator, allocated with `old_layout`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// # Safety
    ///
    /// `ptr` must be a live block from this allocator, allocated with `layout`.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Hooks backed by the global heap allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl RawAlloc for Global {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        // SAFETY: layout size is never zero.
        NonNull::new(unsafe { alloc::alloc::alloc(layout) })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        NonNull::new(alloc::alloc::realloc(ptr.as_ptr(), old_layout, new_size))
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        alloc::alloc::dealloc(ptr.as_ptr(), layout);
    }
}

unsafe impl<A: RawAlloc + ?Sized> RawAlloc for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        (**self).reallocate(ptr, old_layout, new_size)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).release(ptr, layout);
    }
}

pub(crate) fn allocation_failed(layout: Layout) -> FatVecError {
    FatVecError::AllocationFailed {
        size: layout.size(),
        align: layout.align(),
    }
}

/// Allocates a vector with room for `capacity` items, zero-filled, length 0.
pub(crate) fn create<A: RawAlloc>(
    item_size: usize,
    capacity: usize,
    hooks: &A,
) -> Result<NonNull<u8>, FatVecError> {
    let layout = header::buffer_layout(item_size, capacity)?;
    let base = hooks
        .allocate(layout)
        .ok_or_else(|| allocation_failed(layout))?;

    // SAFETY: `base` is a fresh block of `layout.size()` bytes aligned for `Header`.
    unsafe {
        base.cast::<Header>().as_ptr().write(Header {
            capacity,
            length: 0,
            item_size,
        });
        let handle = header::handle_of(base);
        ptr::write_bytes(handle.as_ptr(), 0, layout.size() - HEADER_SIZE);
        Ok(handle)
    }
}

/// Copies header and the whole item storage (capacity, not length) into a new block.
///
/// # Safety
///
/// `handle` must be live.
pub(crate) unsafe fn duplicate<A: RawAlloc>(
    handle: NonNull<u8>,
    hooks: &A,
) -> Result<NonNull<u8>, FatVecError> {
    let layout = header::layout_of(handle);
    let base = hooks
        .allocate(layout)
        .ok_or_else(|| allocation_failed(layout))?;

    ptr::copy_nonoverlapping(header::base_of(handle).as_ptr(), base.as_ptr(), layout.size());
    Ok(header::handle_of(base))
}

/// Releases the allocation behind `handle`.
///
/// # Safety
///
/// `handle` must be live and is dangling afterwards.
pub(crate) unsafe fn destroy<A: RawAlloc>(handle: NonNull<u8>, hooks: &A) {
    let layout = header::layout_of(handle);
    hooks.release(header::base_of(handle), layout);
}

/// Fatal path for the infallible API: allocation failures go to
/// `handle_alloc_error`, anything else panics with the error message.
#[cold]
#[track_caller]
pub(crate) fn fail(err: FatVecError) -> ! {
    if let FatVecError::AllocationFailed { size, align } = err {
        if let Ok(layout) = Layout::from_size_align(size, align) {
            handle_alloc_error(layout);
        }
    }
    panic!("{err}");
}

#[track_caller]
pub(crate) fn unwrap_or_fail<T>(result: Result<T, FatVecError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fail(err),
    }
}
