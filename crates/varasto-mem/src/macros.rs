#[macro_export]
macro_rules! const_assert {
    ($check:expr $(,$msg:tt)*) => {
        const _: () = assert!($check $(,$msg)*);
    };
}

#[macro_export]
macro_rules! size_of {
    ($t:ty) => {
        size_of::<$t>()
    };
}

/// Builds a [`DynamicArray`](crate::DynamicArray) from a list of elements.
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynamicArray::new()
    };
    [$($elem:expr),+ $(,)?] => {
        <$crate::DynamicArray<_> as core::iter::FromIterator<_>>::from_iter([$($elem),+])
    };
}
