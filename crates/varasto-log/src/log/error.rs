use varasto_mem::CapacityError;

#[derive(Debug)]
pub enum LogError {
    NotInitialized,
    UnknownFormat { index: usize },
    CapacityError(CapacityError),
    IoError(std::io::Error),
}

impl core::fmt::Display for LogError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "logger not initialized"),
            Self::UnknownFormat { index } => write!(f, "no custom format with index {}", index),
            Self::CapacityError(_) => write!(f, "failed to grow format storage"),
            Self::IoError(_) => write!(f, "IO error"),
        }
    }
}

impl core::error::Error for LogError {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::CapacityError(err) => Some(err),
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CapacityError> for LogError {

    fn from(value: CapacityError) -> Self {
        Self::CapacityError(value)
    }
}

impl From<std::io::Error> for LogError {

    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}
