//! Panics and errors from element code must never leak, double drop, or disturb an
//! array whose operation promised to leave it unchanged.

use std::{
    cell::Cell,
    panic::{self, AssertUnwindSafe},
};

use varasto_mem::{CapacityError, DynamicArray, ElementError, dyn_array};

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
    static CLONES: Cell<usize> = const { Cell::new(0) };
    static PANIC_AT: Cell<usize> = const { Cell::new(0) };
}

fn live() -> isize {
    LIVE.with(Cell::get)
}

/// Arms the `n`th clone from now to panic. `0` disarms.
fn panic_on_clone(n: usize) {
    CLONES.with(|c| c.set(0));
    PANIC_AT.with(|p| p.set(n));
}

#[derive(Debug, PartialEq)]
struct Fragile {
    value: u32,
}

impl Fragile {

    fn new(value: u32) -> Self {
        LIVE.with(|l| l.set(l.get() + 1));
        Self { value }
    }
}

impl Clone for Fragile {

    fn clone(&self) -> Self {
        let n = CLONES.with(|c| {
            c.set(c.get() + 1);
            c.get()
        });
        if n == PANIC_AT.with(Cell::get) {
            panic!("clone #{} failed", n)
        }
        Self::new(self.value)
    }
}

impl Drop for Fragile {

    fn drop(&mut self) {
        LIVE.with(|l| l.set(l.get() - 1));
    }
}

fn values(array: &DynamicArray<Fragile>) -> Vec<u32> {
    array.iter().map(|f| f.value).collect()
}

fn filled(n: u32) -> DynamicArray<Fragile> {
    let mut array = DynamicArray::with_capacity(n as usize).unwrap();
    for value in 0..n {
        array.push(Fragile::new(value)).unwrap();
    }
    array
}

#[test]
fn growth_with_panicking_clone_leaves_array_unchanged() {
    let mut array = filled(4);
    assert_eq!(array.capacity(), 4);
    let ptr = array.as_ptr();
    panic_on_clone(1);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = array.push_within(2);
    }));
    assert!(result.is_err());
    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(values(&array), [0, 1, 2, 3]);
    assert_eq!(live(), 4);

    panic_on_clone(0);
    array.push_within(2).unwrap();
    assert_eq!(values(&array), [0, 1, 2, 3, 2]);
    assert_eq!(array.capacity(), 8);
    drop(array);
    assert_eq!(live(), 0);
}

#[test]
fn try_clone_with_panicking_clone_drops_partial_copy() {
    let array = filled(6);
    panic_on_clone(4);
    let result = panic::catch_unwind(AssertUnwindSafe(|| array.try_clone()));
    assert!(result.is_err());
    assert_eq!(live(), 6);
    assert_eq!(values(&array), [0, 1, 2, 3, 4, 5]);
    drop(array);
    assert_eq!(live(), 0);
}

#[test]
fn copy_and_swap_assignment_is_atomic() {
    let mut dst = filled(2);
    let ptr = dst.as_ptr();
    let src = filled(5);
    panic_on_clone(3);
    let result = panic::catch_unwind(AssertUnwindSafe(|| dst.assign_from(&src)));
    assert!(result.is_err());
    assert_eq!(values(&dst), [0, 1]);
    assert_eq!(dst.capacity(), 2);
    assert_eq!(dst.as_ptr(), ptr);
    assert_eq!(live(), 7);

    panic_on_clone(0);
    dst.assign_from(&src).unwrap();
    assert_eq!(values(&dst), [0, 1, 2, 3, 4]);
    drop((dst, src));
    assert_eq!(live(), 0);
}

#[test]
fn in_place_assignment_stays_valid_after_panic() {
    let mut dst = DynamicArray::with_capacity(8).unwrap();
    for value in 10..13 {
        dst.push(Fragile::new(value)).unwrap();
    }
    let src = filled(6);
    panic_on_clone(5);
    let result = panic::catch_unwind(AssertUnwindSafe(|| dst.assign_from(&src)));
    assert!(result.is_err());
    assert_eq!(dst.len(), 4);
    assert_eq!(values(&dst), [0, 1, 2, 3]);
    assert_eq!(live(), 10);
    drop((dst, src));
    assert_eq!(live(), 0);
}

#[test]
fn panicking_constructor_at_capacity_changes_nothing() {
    let mut array = filled(2);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = array.emplace_back(|| panic!("constructor failed"));
    }));
    assert!(result.is_err());
    assert_eq!(values(&array), [0, 1]);
    assert_eq!(array.capacity(), 2);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = array.emplace(0, || panic!("constructor failed"));
    }));
    assert!(result.is_err());
    assert_eq!(values(&array), [0, 1]);
    assert_eq!(live(), 2);
}

#[test]
fn failed_insert_in_place_changes_nothing() {
    let mut array = DynamicArray::with_capacity(4).unwrap();
    array.push(Fragile::new(1)).unwrap();
    array.push(Fragile::new(2)).unwrap();
    let err = array.try_emplace(1, || Err::<Fragile, _>("rejected")).unwrap_err();
    assert_eq!(err, ElementError::Element("rejected"));
    assert_eq!(values(&array), [1, 2]);
    assert_eq!(array.capacity(), 4);
    assert_eq!(live(), 2);
}

#[test]
fn panicking_resize_drops_only_new_elements() {
    let mut array = filled(2);
    let mut made = 0;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = array.resize_with(6, || {
            made += 1;
            if made == 3 {
                panic!("default construction failed")
            }
            Fragile::new(100 + made)
        });
    }));
    assert!(result.is_err());
    assert_eq!(array.len(), 2);
    assert_eq!(array.capacity(), 6);
    assert_eq!(live(), 2);
    array.truncate(0);
    assert_eq!(live(), 0);
}

#[test]
fn oversized_requests_leave_array_unchanged() {
    let mut array = filled(3);
    let ptr = array.as_ptr();
    let check = |array: &DynamicArray<Fragile>| {
        assert_eq!(array.len(), 3);
        assert_eq!(array.capacity(), 3);
        assert_eq!(array.as_ptr(), ptr);
        assert_eq!(values(array), [0, 1, 2]);
        assert_eq!(live(), 3);
    };

    let err = array.reserve(usize::MAX).unwrap_err();
    assert!(matches!(err, CapacityError::MaxCapacityExceeded { .. }));
    check(&array);

    let mut made = 0;
    let err = array.resize_with(usize::MAX, || {
        made += 1;
        Fragile::new(made)
    }).unwrap_err();
    assert!(matches!(err, CapacityError::MaxCapacityExceeded { .. }));
    assert_eq!(made, 0);
    check(&array);

    let err = array
        .try_resize_with(usize::MAX, || Err::<Fragile, _>("never called"))
        .unwrap_err();
    assert!(matches!(err, ElementError::Capacity(CapacityError::MaxCapacityExceeded { .. })));
    check(&array);

    drop(array);
    assert_eq!(live(), 0);
}

#[test]
fn erase_restores_consistency_before_drop_runs() {
    struct Bomb(bool);

    impl Drop for Bomb {

        fn drop(&mut self) {
            if self.0 {
                panic!("bomb dropped")
            }
        }
    }

    let mut array = dyn_array![Bomb(false), Bomb(true), Bomb(false)];
    let result = panic::catch_unwind(AssertUnwindSafe(|| array.erase(1)));
    assert!(result.is_err());
    assert_eq!(array.len(), 2);
    assert!(array.iter().all(|b| !b.0));
}

#[test]
fn moved_from_array_is_empty_and_reusable() {
    let mut source = filled(3);
    let dest = source.take();
    assert_eq!(source.len(), 0);
    assert_eq!(values(&dest), [0, 1, 2]);
    source.push(Fragile::new(9)).unwrap();
    assert_eq!(source.capacity(), 1);
    drop((source, dest));
    assert_eq!(live(), 0);
}
