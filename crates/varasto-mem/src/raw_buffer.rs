//! Owned, uninitialized storage for a fixed number of `T` slots.
//!
//! [`RawBuffer`] only owns bytes. It never constructs or drops a `T`; the owner is
//! responsible for every live slot before the buffer is dropped.

use core::{
    marker::PhantomData,
    mem,
    ptr::NonNull,
};

use crate::{
    global_alloc::GLOBAL_ALLOC,
    Result,
    const_assert,
    size_of,
};

pub struct RawBuffer<T> {
    base: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

const_assert!(size_of!(RawBuffer<u32>) == size_of!(Option<RawBuffer<u32>>));

// SAFETY: RawBuffer owns its block exclusively, same as Box<[MaybeUninit<T>]>.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {

    /// Creates an empty buffer without allocating.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            base: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates storage for exactly `capacity` elements.
    ///
    /// A capacity of zero, or a zero sized `T`, doesn't allocate. On error no buffer
    /// exists and nothing needs releasing.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Ok(Self::new())
        }
        let base = GLOBAL_ALLOC.allocate_uninit(capacity)?;
        Ok(Self {
            base,
            capacity,
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.base.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.base.as_ptr()
    }

    /// Address of slot `offset`. The one-past-the-end address is allowed.
    ///
    /// # Safety
    /// `offset <= self.capacity()`.
    #[inline(always)]
    pub unsafe fn slot(&self, offset: usize) -> NonNull<T> {
        debug_assert!(
            offset <= self.capacity,
            "slot {} out of bounds of capacity {}", offset, self.capacity,
        );
        unsafe { self.base.add(offset) }
    }

    /// # Safety
    /// `index < self.capacity()` and the slot holds a constructed `T`.
    #[inline(always)]
    pub unsafe fn get(&self, index: usize) -> &T {
        debug_assert!(
            index < self.capacity,
            "index {} out of bounds of capacity {}", index, self.capacity,
        );
        unsafe { self.base.add(index).as_ref() }
    }

    /// # Safety
    /// `index < self.capacity()` and the slot holds a constructed `T`.
    #[inline(always)]
    pub unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(
            index < self.capacity,
            "index {} out of bounds of capacity {}", index, self.capacity,
        );
        unsafe { self.base.add(index).as_mut() }
    }

    /// Exchanges the blocks owned by `self` and `other`.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.base, &mut other.base);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Moves the block out, leaving `self` empty.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

impl<T> Default for RawBuffer<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {

    fn drop(&mut self) {
        if self.capacity == 0 {
            return
        }
        unsafe {
            GLOBAL_ALLOC.free_uninit(self.base, self.capacity);
        }
    }
}

impl<T> core::fmt::Debug for RawBuffer<T> {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawBuffer")
            .field("base", &self.base)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::CapacityError;

    #[test]
    fn zero_capacity_does_not_allocate() {
        let buf = RawBuffer::<u64>::with_capacity(0).unwrap();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.as_ptr(), NonNull::<u64>::dangling().as_ptr().cast_const());
    }

    #[test]
    fn slots_are_writable_up_to_capacity() {
        let mut buf = RawBuffer::<u32>::with_capacity(4).unwrap();
        assert_eq!(buf.capacity(), 4);
        unsafe {
            for i in 0..4 {
                buf.slot(i).write(i as u32 * 10);
            }
            assert_eq!(*buf.get(2), 20);
            *buf.get_mut(3) += 1;
            assert_eq!(*buf.get(3), 31);
            let end = buf.slot(4);
            assert_eq!(end.as_ptr(), buf.as_mut_ptr().add(4));
        }
    }

    #[test]
    fn swap_exchanges_ownership() {
        let mut a = RawBuffer::<u8>::with_capacity(3).unwrap();
        let mut b = RawBuffer::<u8>::new();
        let a_ptr = a.as_ptr();
        a.swap(&mut b);
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 3);
        assert_eq!(b.as_ptr(), a_ptr);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut a = RawBuffer::<String>::with_capacity(2).unwrap();
        let b = a.take();
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 2);
    }

    #[test]
    fn oversized_request_fails_without_allocating() {
        let err = RawBuffer::<u64>::with_capacity(usize::MAX).unwrap_err();
        assert!(matches!(err, CapacityError::MaxCapacityExceeded { .. }));
    }

    #[test]
    fn zero_sized_elements_keep_requested_capacity() {
        let buf = RawBuffer::<()>::with_capacity(1024).unwrap();
        assert_eq!(buf.capacity(), 1024);
    }
}
