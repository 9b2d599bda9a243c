//! The single capacity growth rule shared by every appending operation.

use crate::{
    errors::CapacityError,
    global_alloc::GlobalAlloc,
    Result,
};

/// Capacity to grow to when `current` slots are all occupied: `max(1, 2 * current)`.
#[inline(always)]
pub fn next_capacity<T>(current: usize) -> Result<usize> {
    if current == 0 {
        return Ok(1)
    }
    current
        .checked_mul(2)
        .filter(|&grown| grown <= GlobalAlloc::max_capacity::<T>())
        .ok_or(CapacityError::MaxCapacityExceeded {
            max_capacity: GlobalAlloc::max_capacity::<T>(),
        })
}
