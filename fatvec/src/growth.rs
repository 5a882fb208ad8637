//! Growth policy and capacity manager.

use core::ptr::{self, NonNull};

use crate::error::FatVecError;
use crate::header;
use crate::raw_alloc::{allocation_failed, RawAlloc};

/// Decides how much a full vector grows by.
///
/// While the capacity is at most `max_prealloc` items it doubles; past that it
/// grows one item at a time, so very large vectors never carry more than
/// `max_prealloc` items of unused space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Largest capacity, in items, that is still doubled on growth.
    ///
    /// Default: 1_048_576.
    pub max_prealloc: usize,
}

impl GrowthPolicy {
    /// Default doubling threshold, in items.
    pub const DEFAULT_MAX_PREALLOC: usize = 1024 * 1024;

    #[must_use]
    pub const fn new(max_prealloc: usize) -> Self {
        Self { max_prealloc }
    }

    /// Capacity after one growth step from `current`.
    ///
    /// Returns `None` on arithmetic overflow. A capacity of 0 grows to 1.
    #[must_use]
    pub fn next_capacity(&self, current: usize) -> Option<usize> {
        if current == 0 {
            Some(1)
        } else if current <= self.max_prealloc {
            current.checked_mul(2)
        } else {
            current.checked_add(1)
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PREALLOC)
    }
}

/// Grows a full vector by one policy step and returns the new handle.
///
/// # Safety
///
/// `handle` must be live and allocated through `hooks`. On success the old
/// handle is dangling; on failure it is unchanged and still live.
pub(crate) unsafe fn grow<A: RawAlloc>(
    handle: NonNull<u8>,
    policy: &GrowthPolicy,
    hooks: &A,
) -> Result<NonNull<u8>, FatVecError> {
    let current = header::read(handle);
    let new_capacity =
        policy
            .next_capacity(current.capacity)
            .ok_or(FatVecError::CapacityOverflow {
                capacity: current.capacity,
                item_size: current.item_size,
            })?;

    if current.capacity <= policy.max_prealloc && new_capacity > policy.max_prealloc {
        log::debug!(
            "capacity {} passed the {} item preallocation limit, further growth is linear",
            new_capacity,
            policy.max_prealloc
        );
    }

    resize_exact(handle, new_capacity, hooks)
}

/// Reallocates to exactly `new_capacity` items and returns the new handle.
///
/// Bytes past the old end of the allocation are zero-filled. The caller
/// keeps `length <= new_capacity`.
///
/// # Safety
///
/// Same contract as [`grow`].
pub(crate) unsafe fn resize_exact<A: RawAlloc>(
    handle: NonNull<u8>,
    new_capacity: usize,
    hooks: &A,
) -> Result<NonNull<u8>, FatVecError> {
    let current = header::read(handle);
    let old_layout = header::layout_of(handle);
    let new_layout = header::buffer_layout(current.item_size, new_capacity)?;

    let old_base = header::base_of(handle);
    let new_base = hooks
        .reallocate(old_base, old_layout, new_layout.size())
        .ok_or_else(|| allocation_failed(new_layout))?;

    if new_layout.size() > old_layout.size() {
        ptr::write_bytes(
            new_base.as_ptr().add(old_layout.size()),
            0,
            new_layout.size() - old_layout.size(),
        );
    }

    let new_handle = header::handle_of(new_base);
    header::set_capacity(new_handle, new_capacity);

    log::trace!(
        "resized vector of {}-byte items from {} to {} items{}",
        current.item_size,
        current.capacity,
        new_capacity,
        if new_base == old_base { "" } else { ", storage moved" }
    );

    Ok(new_handle)
}
