//! MPR121 register map and the electrode configuration register encoding.
//!
//! Addresses follow the NXP MPR121 datasheet.

/// Default 7-bit I2C address (ADDR pin tied to GND).
pub const DEFAULT_ADDRESS: u8 = 0x5A;

// --- Status ---
pub const TOUCH_STATUS: u8 = 0x00;

// --- Baseline filter, rising ---
pub const MHDR: u8 = 0x2B;
pub const NHDR: u8 = 0x2C;
pub const NCLR: u8 = 0x2D;
pub const FDLR: u8 = 0x2E;

// --- Baseline filter, falling ---
pub const MHDF: u8 = 0x2F;
pub const NHDF: u8 = 0x30;
pub const NCLF: u8 = 0x31;
pub const FDLF: u8 = 0x32;

// --- Baseline filter, touched ---
pub const NHDT: u8 = 0x33;
pub const NCLT: u8 = 0x34;
pub const FDLT: u8 = 0x35;

// --- Proximity filter ---
pub const MHDPROXR: u8 = 0x36;
pub const NHDPROXR: u8 = 0x37;
pub const NCLPROXR: u8 = 0x38;
pub const FDLPROXR: u8 = 0x39;
pub const MHDPROXF: u8 = 0x3A;
pub const NHDPROXF: u8 = 0x3B;
pub const NCLPROXF: u8 = 0x3C;
pub const FDLPROXF: u8 = 0x3D;
pub const NHDPROXT: u8 = 0x3E;
pub const NCLPROXT: u8 = 0x3F;
pub const FDLPROXT: u8 = 0x40;

// --- Thresholds (touch/release pairs for ELE0..ELE12) ---
pub const E0TTH: u8 = 0x41;
pub const E0RTH: u8 = 0x42;

// --- Global configuration ---
pub const DTR: u8 = 0x5B;
pub const AFE1: u8 = 0x5C;
pub const AFE2: u8 = 0x5D;
pub const ECR: u8 = 0x5E;

// --- Auto-configuration ---
pub const AUTO_CONFIG_0: u8 = 0x7B;
pub const AUTO_CONFIG_1: u8 = 0x7C;
pub const AUTO_CONFIG_USL: u8 = 0x7D;
pub const AUTO_CONFIG_LSL: u8 = 0x7E;
pub const AUTO_CONFIG_TL: u8 = 0x7F;

// --- Soft reset ---
pub const SOFT_RESET: u8 = 0x80;
pub const SOFT_RESET_VALUE: u8 = 0x63;

/// Time the chip needs to come back after a soft reset.
pub const RESET_SETTLE_MS: u32 = 30;

/// Touch threshold register of electrode `index` (chip numbering, 0..=11).
pub const fn touch_threshold(index: u8) -> u8 {
    E0TTH + index * 2
}

/// Release threshold register of electrode `index` (chip numbering, 0..=11).
pub const fn release_threshold(index: u8) -> u8 {
    E0RTH + index * 2
}

/// Filter, debounce, AFE and auto-configuration values written while the
/// chip is stopped, in write order.
pub const FILTER_SETTINGS: [(u8, u8); 30] = [
    // rising
    (MHDR, 0x01),
    (NHDR, 0x01),
    (NCLR, 0x10),
    (FDLR, 0x20),
    // falling
    (MHDF, 0x01),
    (NHDF, 0x01),
    (NCLF, 0x10),
    (FDLF, 0x20),
    // touched
    (NHDT, 0x01),
    (NCLT, 0x10),
    (FDLT, 0xFF),
    // proximity, unused
    (MHDPROXR, 0x0F),
    (NHDPROXR, 0x0F),
    (NCLPROXR, 0x00),
    (FDLPROXR, 0x00),
    (MHDPROXF, 0x01),
    (NHDPROXF, 0x01),
    (NCLPROXF, 0xFF),
    (FDLPROXF, 0xFF),
    (NHDPROXT, 0x00),
    (NCLPROXT, 0x00),
    (FDLPROXT, 0x00),
    // debounce, only relevant with the IRQ line
    (DTR, 0x11),
    // electrode charge current and sample period
    (AFE1, 0xFF),
    (AFE2, 0x30),
    // auto-configuration off
    (AUTO_CONFIG_0, 0x00),
    (AUTO_CONFIG_1, 0x00),
    (AUTO_CONFIG_USL, 0x00),
    (AUTO_CONFIG_LSL, 0x00),
    (AUTO_CONFIG_TL, 0x00),
];

/// Baseline tracking behaviour selected by the `CL` bits of ECR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CalibrationLock {
    BaselineTrackingOn = 0b00,
    BaselineTrackingOff = 0b01,
    BaselineTrackingAndInitializeFirst5Msb = 0b10,
    BaselineTrackingAndInitialize = 0b11,
}

/// Proximity detection electrodes selected by the `ELEPROX_EN` bits of ECR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Proximity {
    Disabled = 0b00,
    Ele0To1 = 0b01,
    Ele0To3 = 0b10,
    Ele0To11 = 0b11,
}

/// Number of electrodes put in run mode, the `ELE_EN` bits of ECR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElectrodeEnable {
    Disabled = 0b0000,
    Ele0 = 0b0001,
    Ele0To1 = 0b0010,
    Ele0To2 = 0b0011,
    Ele0To3 = 0b0100,
    Ele0To4 = 0b0101,
    Ele0To5 = 0b0110,
    Ele0To6 = 0b0111,
    Ele0To7 = 0b1000,
    Ele0To8 = 0b1001,
    Ele0To9 = 0b1010,
    Ele0To10 = 0b1011,
    Ele0To11 = 0b1100,
}

/// Electrode configuration register value that starts sampling.
pub const fn ecr_value(
    lock: CalibrationLock,
    proximity: Proximity,
    electrodes: ElectrodeEnable,
) -> u8 {
    ((lock as u8) << 6) | ((proximity as u8) << 4) | electrodes as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_registers_interleave() {
        assert_eq!(touch_threshold(0), 0x41);
        assert_eq!(release_threshold(0), 0x42);
        assert_eq!(touch_threshold(11), 0x57);
        assert_eq!(release_threshold(11), 0x58);
    }

    #[test]
    fn ecr_packs_all_three_fields() {
        assert_eq!(
            ecr_value(
                CalibrationLock::BaselineTrackingAndInitialize,
                Proximity::Disabled,
                ElectrodeEnable::Ele0To11
            ),
            0xCC
        );
        assert_eq!(
            ecr_value(
                CalibrationLock::BaselineTrackingOff,
                Proximity::Ele0To3,
                ElectrodeEnable::Ele0
            ),
            0b01_10_0001
        );
    }

    #[test]
    fn filter_table_skips_thresholds_and_ecr() {
        // Thresholds and ECR are written separately, never from this table.
        for (register, _) in FILTER_SETTINGS {
            assert!(register != ECR);
            assert!(!(E0TTH..=release_threshold(11)).contains(&register));
        }
    }
}
