mod log;

pub use log::*;

pub type Result<T> = core::result::Result<T, LogError>;
