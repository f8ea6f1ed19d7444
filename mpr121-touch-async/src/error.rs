//! Error types for the MPR121 driver.

use core::fmt::{self, Debug};

/// The main error type for the MPR121 driver.
pub enum Error<E> {
    /// A register write or status read failed on the bus.
    Transport(E),
    /// The handler table has no free slot left.
    HandlerCapacity,
}

impl<E: Debug> Debug for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "Transport({err:?})"),
            Self::HandlerCapacity => write!(f, "HandlerCapacity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_names_the_variant() {
        let err: Error<u8> = Error::Transport(3);
        assert_eq!(std::format!("{err:?}"), "Transport(3)");
        assert_eq!(std::format!("{:?}", Error::<u8>::HandlerCapacity), "HandlerCapacity");
    }
}
