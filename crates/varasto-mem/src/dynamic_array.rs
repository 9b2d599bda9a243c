//! A growable contiguous array layered on a single [`RawBuffer`].
//!
//! Slots `[0, len)` of the buffer hold live values, the rest is uninitialized. Whenever
//! an operation needs more room than the buffer has, a complete replacement buffer is
//! built first and only swapped in once nothing can fail anymore, so growth either
//! succeeds or leaves the array untouched.

mod iter;

use core::{
    convert::Infallible,
    fmt::{self, Debug, Formatter},
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr::NonNull,
    slice,
};

use crate::{
    errors::{CapacityError, ElementError},
    growth,
    raw_buffer::RawBuffer,
    relocate::{self, InitGuard},
    Result,
    const_assert,
    size_of,
};

pub use iter::IntoIter;

pub struct DynamicArray<T> {
    storage: RawBuffer<T>,
    len: usize,
}

const_assert!(size_of!(DynamicArray<u32>) == size_of!(Option<DynamicArray<u32>>));

#[inline(always)]
fn infallible(err: ElementError<Infallible>) -> CapacityError {
    match err {
        ElementError::Capacity(err) => err,
        ElementError::Element(never) => match never {},
    }
}

impl<T> DynamicArray<T> {

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            storage: RawBuffer::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            storage: RawBuffer::with_capacity(capacity)?,
            len: 0,
        })
    }

    /// Creates an array of `len` default values with capacity exactly `len`.
    pub fn with_len(len: usize) -> Result<Self>
        where
            T: Default,
    {
        Self::with_len_with(len, T::default)
    }

    pub fn with_len_with<F>(len: usize, f: F) -> Result<Self>
        where
            F: FnMut() -> T,
    {
        let mut array = Self::with_capacity(len)?;
        array.resize_with(len, f)?;
        Ok(array)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    #[inline(always)]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Grows the capacity to exactly `capacity` if it's currently smaller.
    ///
    /// Never changes `len` or any element. On error the array is unchanged.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(())
        }
        let mut new_storage = RawBuffer::with_capacity(capacity)?;
        unsafe {
            relocate::move_elements(self.storage.slot(0), new_storage.slot(0), self.len);
        }
        self.storage.swap(&mut new_storage);
        Ok(())
    }

    /// Resizes to `len`, filling new slots with `T::default()`.
    ///
    /// Growing reserves exactly `len` when needed. If a constructor panics, the values
    /// built so far are dropped and `len` is unchanged.
    pub fn resize(&mut self, len: usize) -> Result<()>
        where
            T: Default,
    {
        self.resize_with(len, T::default)
    }

    pub fn resize_with<F>(&mut self, len: usize, mut f: F) -> Result<()>
        where
            F: FnMut() -> T,
    {
        self.try_resize_with(len, || Ok(f()))
            .map_err(infallible)
    }

    /// Fallible form of [`DynamicArray::resize_with`].
    ///
    /// The first `Err` from `f` drops every value constructed by this call and is
    /// returned with `len` unchanged.
    pub fn try_resize_with<E, F>(&mut self, len: usize, mut f: F) -> Result<(), ElementError<E>>
        where
            F: FnMut() -> Result<T, E>,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(())
        }
        self.reserve(len)?;
        let mut guard = unsafe { InitGuard::new(self.storage.slot(0), self.len) };
        for _ in self.len..len {
            let value = f().map_err(ElementError::Element)?;
            unsafe { guard.write(value) }
        }
        self.len += guard.finish();
        Ok(())
    }

    /// Appends `value`, doubling the capacity when full.
    ///
    /// If the grown buffer can't be allocated, `value` is dropped and the array is left
    /// as it was.
    #[inline(always)]
    pub fn push(&mut self, value: T) -> Result<&mut T> {
        self.emplace_impl(self.len, |_| Ok(value))
            .map_err(infallible)
    }

    /// Appends the value returned by `f`. Storage is secured before `f` is called.
    #[inline(always)]
    pub fn emplace_back<F>(&mut self, f: F) -> Result<&mut T>
        where
            F: FnOnce() -> T,
    {
        self.emplace_impl(self.len, |_| Ok(f()))
            .map_err(infallible)
    }

    #[inline(always)]
    pub fn try_emplace_back<E, F>(&mut self, f: F) -> Result<&mut T, ElementError<E>>
        where
            F: FnOnce() -> Result<T, E>,
    {
        self.emplace_impl(self.len, |_| f())
    }

    /// Appends a clone of the element at `index`.
    ///
    /// The clone is taken from the current buffer before any element is relocated, so
    /// a panicking `clone` leaves the array unchanged even when it had to grow.
    ///
    /// # Panics
    /// If `index >= len`.
    pub fn push_within(&mut self, index: usize) -> Result<&mut T>
        where
            T: Clone,
    {
        assert!(index < self.len, "index {} out of bounds for length {}", index, self.len);
        self.emplace_impl(self.len, |items| Ok(items[index].clone()))
            .map_err(infallible)
    }

    /// Inserts `value` at `index`, shifting `[index, len)` one slot to the right.
    ///
    /// # Panics
    /// If `index > len`.
    #[inline(always)]
    pub fn insert(&mut self, index: usize, value: T) -> Result<&mut T> {
        self.emplace_impl(index, |_| Ok(value))
            .map_err(infallible)
    }

    /// # Panics
    /// If `index > len`.
    #[inline(always)]
    pub fn emplace<F>(&mut self, index: usize, f: F) -> Result<&mut T>
        where
            F: FnOnce() -> T,
    {
        self.emplace_impl(index, |_| Ok(f()))
            .map_err(infallible)
    }

    /// # Panics
    /// If `index > len`.
    #[inline(always)]
    pub fn try_emplace<E, F>(&mut self, index: usize, f: F) -> Result<&mut T, ElementError<E>>
        where
            F: FnOnce() -> Result<T, E>,
    {
        self.emplace_impl(index, |_| f())
    }

    fn emplace_impl<E, F>(&mut self, index: usize, construct: F) -> Result<&mut T, ElementError<E>>
        where
            F: FnOnce(&[T]) -> Result<T, E>,
    {
        assert!(
            index <= self.len,
            "insertion index {} out of bounds for length {}", index, self.len,
        );
        let mut slot =
            if self.len == self.capacity() {
                self.grow_and_emplace(index, construct)?
            }
            else {
                let value = construct(self.as_slice())
                    .map_err(ElementError::Element)?;
                unsafe {
                    let base = self.storage.slot(0);
                    relocate::shift_right(base, index, self.len);
                    base.add(index).write(value);
                }
                self.len += 1;
                unsafe { self.storage.slot(index) }
            };
        Ok(unsafe { slot.as_mut() })
    }

    fn grow_and_emplace<E, F>(&mut self, index: usize, construct: F) -> Result<NonNull<T>, ElementError<E>>
        where
            F: FnOnce(&[T]) -> Result<T, E>,
    {
        let new_capacity = growth::next_capacity::<T>(self.capacity())?;
        let mut new_storage = RawBuffer::with_capacity(new_capacity)?;
        let value = construct(self.as_slice())
            .map_err(ElementError::Element)?;
        unsafe {
            let src = self.storage.slot(0);
            let dst = new_storage.slot(0);
            dst.add(index).write(value);
            relocate::move_elements(src, dst, index);
            relocate::move_elements(src.add(index), dst.add(index + 1), self.len - index);
        }
        self.storage.swap(&mut new_storage);
        self.len += 1;
        Ok(unsafe { self.storage.slot(index) })
    }

    /// Removes and returns the last element.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None
        }
        self.len -= 1;
        Some(unsafe { self.storage.slot(self.len).read() })
    }

    /// Drops the last element.
    ///
    /// # Panics
    /// If the array is empty.
    #[inline(always)]
    pub fn pop_back(&mut self) {
        assert!(self.len != 0, "pop_back on an empty DynamicArray");
        self.truncate(self.len - 1);
    }

    /// Removes the element at `index`, shifting the tail one slot to the left.
    ///
    /// # Panics
    /// If `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index {} out of bounds for length {}", index, self.len,
        );
        unsafe {
            let base = self.storage.slot(0);
            let removed = base.add(index).read();
            relocate::shift_left(base, index, self.len);
            self.len -= 1;
            removed
        }
    }

    /// Drops the element at `index`. The array is consistent again before the
    /// element's destructor runs.
    ///
    /// # Panics
    /// If `index >= len`.
    #[inline(always)]
    pub fn erase(&mut self, index: usize) {
        drop(self.remove(index));
    }

    /// Drops `[len, self.len())`, keeping the capacity.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return
        }
        let tail = self.len - len;
        self.len = len;
        unsafe {
            relocate::drop_in_place(self.storage.slot(len), tail);
        }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges contents and storage with `other`.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves the contents out, leaving `self` empty without allocating.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Deep copy into storage of capacity exactly `self.len()`.
    pub fn try_clone(&self) -> Result<Self>
        where
            T: Clone,
    {
        let storage = RawBuffer::with_capacity(self.len)?;
        let mut guard = unsafe { InitGuard::new(storage.slot(0), 0) };
        for item in self.iter() {
            unsafe { guard.write(item.clone()) }
        }
        let len = guard.finish();
        Ok(Self {
            storage,
            len,
        })
    }

    /// Makes `self` a copy of `other`.
    ///
    /// When `other` doesn't fit in the current capacity a full copy is built first and
    /// swapped in, so a failure leaves `self` unchanged. Otherwise elements are assigned
    /// in place and a panicking `clone` may leave a partially assigned, but valid,
    /// array.
    pub fn assign_from(&mut self, other: &Self) -> Result<()>
        where
            T: Clone,
    {
        if other.len > self.capacity() {
            let mut copy = other.try_clone()?;
            self.swap(&mut copy);
            return Ok(())
        }
        let common = self.len.min(other.len);
        for (dst, src) in self.as_mut_slice()[..common].iter_mut().zip(&other.as_slice()[..common]) {
            dst.clone_from(src);
        }
        if other.len < self.len {
            self.truncate(other.len);
        }
        else {
            for item in &other.as_slice()[self.len..] {
                unsafe { self.storage.slot(self.len).write(item.clone()) }
                self.len += 1;
            }
        }
        Ok(())
    }
}

impl<T> Drop for DynamicArray<T> {

    fn drop(&mut self) {
        unsafe {
            relocate::drop_in_place(self.storage.slot(0), self.len);
        }
    }
}

impl<T> Default for DynamicArray<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {

    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("failed to clone DynamicArray: {}", err),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign_from(source) {
            panic!("failed to clone DynamicArray: {}", err)
        }
    }
}

impl<T> Index<usize> for DynamicArray<T> {

    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        if index >= self.len {
            panic!("index {} out of bounds for length {}", index, self.len)
        }
        unsafe { self.storage.get(index) }
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {

    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= self.len {
            panic!("index {} out of bounds for length {}", index, self.len)
        }
        unsafe { self.storage.get_mut(index) }
    }
}

impl<T> Deref for DynamicArray<T> {

    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {

    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {

    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {

    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Debug> Debug for DynamicArray<T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {

    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialEq> PartialEq<[T]> for DynamicArray<T> {

    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for DynamicArray<T> {

    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {

    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {

    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(err) = self.push(value) {
                panic!("failed to extend DynamicArray: {}", err)
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {

    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {

    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for DynamicArray<T> {

    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let mut this = ManuallyDrop::new(self);
        let len = this.len;
        this.len = 0;
        unsafe { IntoIter::new(this.storage.take(), len) }
    }
}
