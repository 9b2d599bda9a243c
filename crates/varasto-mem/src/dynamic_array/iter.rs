use core::{
    fmt::{self, Debug, Formatter},
    iter::FusedIterator,
    slice,
};

use crate::{
    raw_buffer::RawBuffer,
    relocate,
};

/// Owning iterator over the elements of a [`DynamicArray`](super::DynamicArray).
///
/// Live elements occupy `[start, end)` of the buffer. Whatever hasn't been yielded is
/// dropped together with the buffer.
pub struct IntoIter<T> {
    storage: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {

    /// # Safety
    /// Slots `[0, len)` of `storage` must hold live values owned by the iterator.
    #[inline(always)]
    pub(super) unsafe fn new(storage: RawBuffer<T>, len: usize) -> Self {
        Self {
            storage,
            start: 0,
            end: len,
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe {
            slice::from_raw_parts(self.storage.slot(self.start).as_ptr(), self.end - self.start)
        }
    }
}

impl<T> Iterator for IntoIter<T> {

    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        }
        else {
            let item = unsafe { self.storage.slot(self.start).read() };
            self.start += 1;
            Some(item)
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {

    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        }
        else {
            self.end -= 1;
            Some(unsafe { self.storage.slot(self.end).read() })
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {

    fn drop(&mut self) {
        unsafe {
            relocate::drop_in_place(self.storage.slot(self.start), self.end - self.start);
        }
    }
}

impl<T: Debug> Debug for IntoIter<T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
