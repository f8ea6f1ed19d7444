//! Edge detection between consecutive touch status samples.

use crate::electrode::{Electrode, TouchMask, ELECTRODE_COUNT};

/// Represents a touch transition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// An electrode went from untouched to touched.
    Touched,
    /// An electrode went from touched to untouched.
    Released,
}

/// A transition of one electrode between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: EventKind,
    pub electrode: Electrode,
}

impl TouchEvent {
    pub const fn touched(electrode: Electrode) -> Self {
        Self {
            kind: EventKind::Touched,
            electrode,
        }
    }

    pub const fn released(electrode: Electrode) -> Self {
        Self {
            kind: EventKind::Released,
            electrode,
        }
    }
}

/// Compares `current` against `previous` and yields one event per changed bit.
///
/// Events come out in ascending bit order, so within a cycle `T16` is reported
/// before `T5`. Unchanged bits never produce an event. When `previous` is the
/// empty mask, every electrode set in `current` is reported as `Touched`; this
/// is how electrodes already held at startup get announced.
pub fn detect(previous: TouchMask, current: TouchMask) -> Edges {
    Edges {
        rising: current.bits() & !previous.bits(),
        falling: previous.bits() & !current.bits(),
        bit: 0,
    }
}

/// Iterator returned by [`detect`].
#[derive(Debug, Clone)]
pub struct Edges {
    rising: u16,
    falling: u16,
    bit: u8,
}

impl Iterator for Edges {
    type Item = TouchEvent;

    fn next(&mut self) -> Option<TouchEvent> {
        while self.bit < ELECTRODE_COUNT {
            let bit = self.bit;
            self.bit += 1;

            let electrode = match Electrode::from_bit(bit) {
                Some(electrode) => electrode,
                None => continue,
            };
            if self.rising & (1 << bit) != 0 {
                return Some(TouchEvent::touched(electrode));
            }
            if self.falling & (1 << bit) != 0 {
                return Some(TouchEvent::released(electrode));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn events(previous: u16, current: u16) -> Vec<TouchEvent> {
        detect(TouchMask::from_bits(previous), TouchMask::from_bits(current)).collect()
    }

    #[test]
    fn scripted_press_and_release() {
        let script = [0x000, 0x001, 0x001, 0x000];

        assert_eq!(events(script[0], script[1]), [TouchEvent::touched(Electrode::T16)]);
        assert!(events(script[1], script[2]).is_empty());
        assert_eq!(events(script[2], script[3]), [TouchEvent::released(Electrode::T16)]);
    }

    #[test]
    fn touched_and_released_sets_follow_the_masks() {
        let pairs = [
            (0x000, 0xFFF),
            (0xFFF, 0x000),
            (0b1010_1010_1010, 0b0101_0101_0101),
            (0x0F0, 0x0FF),
            (0x803, 0x801),
        ];
        for (previous, current) in pairs {
            let all = events(previous, current);
            let touched: u16 = all
                .iter()
                .filter(|e| e.kind == EventKind::Touched)
                .fold(0, |acc, e| acc | e.electrode.mask());
            let released: u16 = all
                .iter()
                .filter(|e| e.kind == EventKind::Released)
                .fold(0, |acc, e| acc | e.electrode.mask());

            assert_eq!(touched, current & !previous);
            assert_eq!(released, previous & !current);
            assert_eq!(touched & released, 0);
            assert_eq!(all.len() as u32, (touched | released).count_ones());
        }
    }

    #[test]
    fn events_come_out_in_ascending_bit_order() {
        let ids: Vec<u8> = events(0x000, 0b1000_0000_0101)
            .iter()
            .map(|e| e.electrode.id())
            .collect();
        assert_eq!(ids, [16, 14, 5]);
    }

    #[test]
    fn first_cycle_reports_held_electrodes_as_touched() {
        // The sampler starts from an empty mask, so a pad pressed at boot
        // shows up as a fresh touch.
        assert_eq!(
            events(0x000, Electrode::T7.mask()),
            [TouchEvent::touched(Electrode::T7)]
        );
    }

    #[test]
    fn unchanged_mask_is_silent() {
        assert!(events(0x5A5, 0x5A5).is_empty());
        assert!(events(0, 0).is_empty());
    }
}
