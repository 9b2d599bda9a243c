//! Growable contiguous storage split into two layers: [`RawBuffer`] owns uninitialized
//! slots, [`DynamicArray`] owns the live prefix of exactly one such buffer.

mod macros;
mod errors;
mod global_alloc;
mod relocate;

pub mod growth;
pub mod raw_buffer;
pub mod dynamic_array;

pub use errors::{CapacityError, ElementError};
pub use raw_buffer::RawBuffer;
pub use dynamic_array::{DynamicArray, IntoIter};

pub type Result<T, E = CapacityError> = core::result::Result<T, E>;
