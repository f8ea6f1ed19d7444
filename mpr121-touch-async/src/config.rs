//! Driver configuration.

use embassy_time::Duration;

use crate::registers::{CalibrationLock, ElectrodeEnable, Proximity, DEFAULT_ADDRESS};

/// Pause between two touch status reads.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Default touch threshold programmed for every electrode.
pub const DEFAULT_TOUCH_THRESHOLD: u8 = 60;

/// Default release threshold programmed for every electrode.
pub const DEFAULT_RELEASE_THRESHOLD: u8 = 20;

/// Settings applied by the one-shot configuration and used by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub address: u8,
    pub sample_interval: Duration,
    pub touch_threshold: u8,
    pub release_threshold: u8,
    pub calibration_lock: CalibrationLock,
    pub proximity: Proximity,
    pub electrodes: ElectrodeEnable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            touch_threshold: DEFAULT_TOUCH_THRESHOLD,
            release_threshold: DEFAULT_RELEASE_THRESHOLD,
            calibration_lock: CalibrationLock::BaselineTrackingAndInitialize,
            proximity: Proximity::Disabled,
            electrodes: ElectrodeEnable::Ele0To11,
        }
    }
}

impl Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Sets the touch and release thresholds shared by all electrodes.
    ///
    /// The release threshold should stay below the touch threshold to keep
    /// some hysteresis.
    pub fn with_thresholds(mut self, touch: u8, release: u8) -> Self {
        self.touch_threshold = touch;
        self.release_threshold = release;
        self
    }

    pub fn with_calibration_lock(mut self, lock: CalibrationLock) -> Self {
        self.calibration_lock = lock;
        self
    }

    pub fn with_proximity(mut self, proximity: Proximity) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn with_electrodes(mut self, electrodes: ElectrodeEnable) -> Self {
        self.electrodes = electrodes;
        self
    }

    /// Sample interval in milliseconds, saturated to what a delay call accepts.
    pub(crate) fn sample_interval_ms(&self) -> u32 {
        u32::try_from(self.sample_interval.as_millis()).unwrap_or(u32::MAX)
    }
}
