use core::fmt::{self, Display, Formatter};

/// Raised when raw storage for a requested capacity can't be obtained.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CapacityError {
    AllocFailed {
        new_capacity: usize,
    },
    MaxCapacityExceeded {
        max_capacity: usize,
    },
}

impl Display for CapacityError {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocFailed { new_capacity } => {
                write!(f, "allocation failed with new capacity {}", new_capacity)
            },
            Self::MaxCapacityExceeded { max_capacity } => {
                write!(f, "exceeded maximum capacity of {}", max_capacity)
            },
        }
    }
}

impl core::error::Error for CapacityError {}

/// Error of the `try_*` constructing operations.
///
/// `Element` carries whatever the user supplied constructor returned, `Capacity` means
/// the storage for the new element couldn't be allocated. In both cases the array is
/// left exactly as it was before the call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ElementError<E> {
    Capacity(CapacityError),
    Element(E),
}

impl<E> ElementError<E> {

    #[inline(always)]
    pub fn into_element(self) -> Option<E> {
        match self {
            Self::Element(err) => Some(err),
            Self::Capacity(_) => None,
        }
    }
}

impl<E> From<CapacityError> for ElementError<E> {

    fn from(value: CapacityError) -> Self {
        Self::Capacity(value)
    }
}

impl<E: Display> Display for ElementError<E> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity(err) => write!(f, "{}", err),
            Self::Element(err) => write!(f, "element construction failed: {}", err),
        }
    }
}

impl<E> core::error::Error for ElementError<E>
    where
        E: core::error::Error + 'static,
{

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Capacity(err) => Some(err),
            Self::Element(err) => Some(err),
        }
    }
}
