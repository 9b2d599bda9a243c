use std::alloc::{Layout, alloc, dealloc};

use core::ptr::NonNull;

use crate::{
    errors::CapacityError,
    Result,
};

/// Thin layer over the global allocator shaping requests for `count` elements of `T`.
///
/// Zero sized requests never reach the allocator: they produce a dangling pointer and
/// freeing them is a no-op.
pub(crate) struct GlobalAlloc;

pub(crate) static GLOBAL_ALLOC: GlobalAlloc = GlobalAlloc;

impl GlobalAlloc {

    #[inline(always)]
    pub const fn max_capacity<T>() -> usize {
        if size_of::<T>() == 0 {
            usize::MAX
        }
        else {
            isize::MAX as usize / size_of::<T>()
        }
    }

    pub fn allocate_uninit<T>(&self, count: usize) -> Result<NonNull<T>> {
        let layout = Layout::array::<T>(count)
            .map_err(|_| CapacityError::MaxCapacityExceeded {
                max_capacity: Self::max_capacity::<T>(),
            })?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling())
        }
        // SAFETY: layout has a non-zero size.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr.cast::<T>())
            .ok_or(CapacityError::AllocFailed { new_capacity: count })
    }

    /// # Safety
    /// `ptr` must come from [`GlobalAlloc::allocate_uninit`] with the same `T` and `count`.
    pub unsafe fn free_uninit<T>(&self, ptr: NonNull<T>, count: usize) {
        let layout = match Layout::array::<T>(count) {
            Ok(l) => l,
            Err(_) => return,
        };
        if layout.size() == 0 {
            return
        }
        unsafe { dealloc(ptr.as_ptr().cast::<u8>(), layout) }
    }
}
