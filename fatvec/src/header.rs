//! Header codec.
//!
//! Every vector is a single allocation laid out as `[Header][item 0][item 1]...`.
//! The vector keeps a pointer to item 0 (the handle); the header sits exactly
//! `HEADER_SIZE` bytes before it.

use core::alloc::Layout;
use core::mem;
use core::ptr::NonNull;

use crate::error::FatVecError;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) capacity: usize,
    pub(crate) length: usize,
    pub(crate) item_size: usize,
}

/// Number of bytes between the start of an allocation and its first item.
pub const HEADER_SIZE: usize = mem::size_of::<Header>();

/// Alignment of every allocation, and therefore of the item storage.
pub const ELEMENT_ALIGN: usize = mem::align_of::<Header>();

/// Layout of an allocation holding `capacity` items of `item_size` bytes.
pub(crate) fn buffer_layout(item_size: usize, capacity: usize) -> Result<Layout, FatVecError> {
    let overflow = || FatVecError::CapacityOverflow {
        capacity,
        item_size,
    };

    let size = item_size
        .checked_mul(capacity)
        .and_then(|data| data.checked_add(HEADER_SIZE))
        .ok_or_else(overflow)?;

    Layout::from_size_align(size, ELEMENT_ALIGN).map_err(|_| overflow())
}

// SAFETY (all functions below): `handle` must come from `handle_of` on a live
// allocation made by `raw_alloc`.

pub(crate) unsafe fn handle_of(base: NonNull<u8>) -> NonNull<u8> {
    NonNull::new_unchecked(base.as_ptr().add(HEADER_SIZE))
}

pub(crate) unsafe fn base_of(handle: NonNull<u8>) -> NonNull<u8> {
    NonNull::new_unchecked(handle.as_ptr().sub(HEADER_SIZE))
}

pub(crate) unsafe fn header_of(handle: NonNull<u8>) -> NonNull<Header> {
    base_of(handle).cast()
}

pub(crate) unsafe fn read(handle: NonNull<u8>) -> Header {
    header_of(handle).as_ptr().read()
}

pub(crate) unsafe fn set_capacity(handle: NonNull<u8>, capacity: usize) {
    (*header_of(handle).as_ptr()).capacity = capacity;
}

pub(crate) unsafe fn set_length(handle: NonNull<u8>, length: usize) {
    (*header_of(handle).as_ptr()).length = length;
}

/// Layout the allocation behind `handle` was made with.
pub(crate) unsafe fn layout_of(handle: NonNull<u8>) -> Layout {
    let header = read(handle);
    // Validated by `buffer_layout` when the allocation was made or resized.
    Layout::from_size_align_unchecked(
        HEADER_SIZE + header.capacity * header.item_size,
        ELEMENT_ALIGN,
    )
}
