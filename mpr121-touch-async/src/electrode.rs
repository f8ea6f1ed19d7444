//! Electrode numbering and the 12-bit touch status mask.
//!
//! The public API numbers the sensing pads `5..=16` (`T5`..`T16`). The chip
//! reports them in a 12-bit status word where the highest id sits on the
//! lowest bit: `T16` is bit 0 and `T5` is bit 11.

use core::fmt;

/// Number of electrodes sampled by the driver.
pub const ELECTRODE_COUNT: u8 = 12;

/// Raw id reserved for "no electrode".
pub const NO_ELECTRODE: u8 = 0;

const FIRST_ID: u8 = 5;
const LAST_ID: u8 = FIRST_ID + ELECTRODE_COUNT - 1;

/// A touch electrode, identified by its public id in `5..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Electrode(u8);

impl Electrode {
    pub const T5: Self = Self(5);
    pub const T6: Self = Self(6);
    pub const T7: Self = Self(7);
    pub const T8: Self = Self(8);
    pub const T9: Self = Self(9);
    pub const T10: Self = Self(10);
    pub const T11: Self = Self(11);
    pub const T12: Self = Self(12);
    pub const T13: Self = Self(13);
    pub const T14: Self = Self(14);
    pub const T15: Self = Self(15);
    pub const T16: Self = Self(16);

    /// Returns the electrode with the given public id, or `None` outside `5..=16`.
    pub const fn new(id: u8) -> Option<Self> {
        if id >= FIRST_ID && id <= LAST_ID {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Returns the electrode reported on status bit `bit`, or `None` for bits 12 and up.
    pub const fn from_bit(bit: u8) -> Option<Self> {
        if bit < ELECTRODE_COUNT {
            Some(Self(LAST_ID - bit))
        } else {
            None
        }
    }

    /// Public id, `5..=16`.
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Position of this electrode in the touch status word.
    pub const fn bit(self) -> u8 {
        LAST_ID - self.0
    }

    pub const fn mask(self) -> u16 {
        1 << self.bit()
    }

    /// All electrodes, in ascending id order.
    pub fn all() -> impl Iterator<Item = Electrode> {
        (FIRST_ID..=LAST_ID).map(Self)
    }
}

impl fmt::Display for Electrode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Maps a status bit to its raw electrode id, `0` when the bit is out of range.
pub const fn electrode_of(bit: u8) -> u8 {
    match Electrode::from_bit(bit) {
        Some(electrode) => electrode.id(),
        None => NO_ELECTRODE,
    }
}

/// Maps a raw electrode id to its status bit, `None` when the id is out of range.
pub const fn bit_of(id: u8) -> Option<u8> {
    match Electrode::new(id) {
        Some(electrode) => Some(electrode.bit()),
        None => None,
    }
}

/// One sample of the touch status register, restricted to the 12 electrode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchMask(u16);

impl TouchMask {
    /// No electrode touched.
    pub const EMPTY: Self = Self(0);

    const ELECTRODE_BITS: u16 = (1 << ELECTRODE_COUNT) - 1;

    /// Builds a mask from a raw status word. The proximity and over-current
    /// flags above bit 11 are dropped.
    pub const fn from_bits(raw: u16) -> Self {
        Self(raw & Self::ELECTRODE_BITS)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `electrode` is set in this sample.
    pub const fn is_touched(self, electrode: Electrode) -> bool {
        self.0 & electrode.mask() != 0
    }

    /// Touched electrodes in ascending bit order.
    pub fn touched(self) -> impl Iterator<Item = Electrode> {
        (0..ELECTRODE_COUNT)
            .filter(move |bit| self.0 & (1 << bit) != 0)
            .filter_map(Electrode::from_bit)
    }
}

impl From<u16> for TouchMask {
    fn from(raw: u16) -> Self {
        Self::from_bits(raw)
    }
}
