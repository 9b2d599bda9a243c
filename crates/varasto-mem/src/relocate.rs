//! Element level primitives used by [`DynamicArray`](crate::DynamicArray).
//!
//! Moves in Rust are bitwise and can't fail, so relocating live elements into a new
//! buffer is always a plain copy of bytes followed by forgetting the source slots.
//! The only user code that may fail while the array is being mutated is element
//! construction, which goes through [`InitGuard`].

use core::{
    mem,
    ptr::{self, NonNull},
};

/// Relocates `len` live elements from `src` into uninitialized `dst`.
///
/// # Safety
/// Both ranges must be valid for `len` elements and must not overlap. The source
/// slots are logically uninitialized afterwards.
#[inline(always)]
pub unsafe fn move_elements<T>(src: NonNull<T>, dst: NonNull<T>, len: usize) {
    unsafe {
        src.copy_to_nonoverlapping(dst, len);
    }
}

/// Shifts `[index, len)` one slot to the right, leaving slot `index` logically
/// uninitialized and slot `len` holding the former last element.
///
/// # Safety
/// `index <= len` and slot `len` must be inside the allocation.
#[inline(always)]
pub unsafe fn shift_right<T>(base: NonNull<T>, index: usize, len: usize) {
    debug_assert!(index <= len);
    unsafe {
        let at = base.add(index);
        at.copy_to(at.add(1), len - index);
    }
}

/// Shifts `[index + 1, len)` one slot to the left over the uninitialized slot `index`.
///
/// # Safety
/// `index < len` and slot `index` must not hold a live value.
#[inline(always)]
pub unsafe fn shift_left<T>(base: NonNull<T>, index: usize, len: usize) {
    debug_assert!(index < len);
    unsafe {
        let at = base.add(index);
        at.add(1).copy_to(at, len - index - 1);
    }
}

/// Drops `len` live elements starting at `ptr`.
///
/// # Safety
/// Every slot in the range holds a live value that isn't used afterwards.
#[inline(always)]
pub unsafe fn drop_in_place<T>(ptr: NonNull<T>, len: usize) {
    if mem::needs_drop::<T>() && len != 0 {
        unsafe {
            ptr::drop_in_place(NonNull::slice_from_raw_parts(ptr, len).as_ptr());
        }
    }
}

/// Tracks elements constructed into uninitialized slots so that a failing or
/// panicking constructor drops exactly what was built before it.
pub struct InitGuard<T> {
    base: NonNull<T>,
    start: usize,
    initialized: usize,
}

impl<T> InitGuard<T> {

    /// # Safety
    /// Slots from `start` onward must be uninitialized and writable for every
    /// element subsequently passed to [`InitGuard::write`].
    #[inline(always)]
    pub unsafe fn new(base: NonNull<T>, start: usize) -> Self {
        Self {
            base,
            start,
            initialized: 0,
        }
    }

    /// # Safety
    /// The next slot must be inside the allocation.
    #[inline(always)]
    pub unsafe fn write(&mut self, value: T) {
        unsafe {
            self.base.add(self.start + self.initialized).write(value);
        }
        self.initialized += 1;
    }

    /// Commits the constructed elements, returning how many there are.
    #[inline(always)]
    pub fn finish(self) -> usize {
        let initialized = self.initialized;
        mem::forget(self);
        initialized
    }
}

impl<T> Drop for InitGuard<T> {

    fn drop(&mut self) {
        unsafe {
            drop_in_place(self.base.add(self.start), self.initialized);
        }
    }
}
