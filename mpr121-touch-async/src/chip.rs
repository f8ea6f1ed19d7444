//! Register-level access to the MPR121 and its one-shot configuration.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::config::Config;
use crate::electrode::{TouchMask, ELECTRODE_COUNT};
use crate::registers::{
    ecr_value, release_threshold, touch_threshold, CalibrationLock, ElectrodeEnable, Proximity,
    ECR, FILTER_SETTINGS, RESET_SETTLE_MS, SOFT_RESET, SOFT_RESET_VALUE, TOUCH_STATUS,
};

/// Operations the touch controller needs from the chip.
///
/// [`Mpr121`] implements this over an I2C bus. Any other implementation only
/// has to honour the register semantics of the MPR121.
#[allow(async_fn_in_trait)]
pub trait TouchChip {
    type Error: core::fmt::Debug;

    /// Soft-resets the chip and waits until it accepts writes again.
    async fn reset(&mut self) -> Result<(), Self::Error>;

    /// Puts every electrode in stop mode. Configuration registers are only
    /// writable in this state.
    async fn stop(&mut self) -> Result<(), Self::Error>;

    /// Writes the electrode configuration register, leaving stop mode.
    async fn start(
        &mut self,
        lock: CalibrationLock,
        proximity: Proximity,
        electrodes: ElectrodeEnable,
    ) -> Result<(), Self::Error>;

    /// Writes a single register.
    async fn configure(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Programs the same touch and release threshold on all 12 electrodes.
    async fn configure_thresholds(&mut self, touch: u8, release: u8) -> Result<(), Self::Error> {
        for index in 0..ELECTRODE_COUNT {
            self.configure(touch_threshold(index), touch).await?;
            self.configure(release_threshold(index), release).await?;
        }
        Ok(())
    }

    /// Reads the 12-bit touch status.
    async fn read_status(&mut self) -> Result<TouchMask, Self::Error>;
}

/// Brings the chip from any state into sampling mode.
///
/// Reset, stop, filter table, thresholds, then start with the configured
/// electrode set. Stops at the first failed write.
pub async fn configure_device<C: TouchChip>(chip: &mut C, config: &Config) -> Result<(), C::Error> {
    chip.reset().await?;
    chip.stop().await?;

    for (register, value) in FILTER_SETTINGS {
        chip.configure(register, value).await?;
    }

    chip.configure_thresholds(config.touch_threshold, config.release_threshold).await?;

    chip.start(config.calibration_lock, config.proximity, config.electrodes).await
}

/// MPR121 on an I2C bus.
pub struct Mpr121<I2cType, DelayType> {
    i2c: I2cType,
    delay: DelayType,
    address: SevenBitAddress,
}

impl<I2cType, ErrorType, DelayType> Mpr121<I2cType, DelayType>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    DelayType: DelayNs,
{
    /// Creates a new `Mpr121`.
    ///
    /// # Arguments
    ///
    /// * `i2c` - An I2C peripheral that implements `embedded-hal-async::i2c::I2c`.
    /// * `delay` - Used for the settle time after a soft reset.
    /// * `address` - 7-bit address, see [`crate::registers::DEFAULT_ADDRESS`].
    pub fn new(i2c: I2cType, delay: DelayType, address: SevenBitAddress) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Gives back the bus and the delay.
    pub fn release(self) -> (I2cType, DelayType) {
        (self.i2c, self.delay)
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), ErrorType> {
        self.i2c.write(self.address, &[register, value]).await
    }
}

impl<I2cType, ErrorType, DelayType> TouchChip for Mpr121<I2cType, DelayType>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    DelayType: DelayNs,
{
    type Error = ErrorType;

    async fn reset(&mut self) -> Result<(), ErrorType> {
        self.write_register(SOFT_RESET, SOFT_RESET_VALUE).await?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ErrorType> {
        self.write_register(ECR, 0x00).await
    }

    async fn start(
        &mut self,
        lock: CalibrationLock,
        proximity: Proximity,
        electrodes: ElectrodeEnable,
    ) -> Result<(), ErrorType> {
        self.write_register(ECR, ecr_value(lock, proximity, electrodes)).await
    }

    async fn configure(&mut self, register: u8, value: u8) -> Result<(), ErrorType> {
        self.write_register(register, value).await
    }

    async fn read_status(&mut self) -> Result<TouchMask, ErrorType> {
        // Command write and data read are separate transfers; the chip keeps
        // the register pointer across the stop condition.
        self.i2c.write(self.address, &[TOUCH_STATUS]).await?;
        let mut buf = [0u8; 2];
        self.i2c.read(self.address, &mut buf).await?;
        Ok(TouchMask::from_bits(u16::from_le_bytes(buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorType, Operation};
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[derive(Default)]
    struct FakeBus {
        writes: Vec<(u8, Vec<u8>)>,
        reads: VecDeque<[u8; 2]>,
    }

    impl ErrorType for FakeBus {
        type Error = Infallible;
    }

    impl I2c<SevenBitAddress> for FakeBus {
        async fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Infallible> {
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buf) => {
                        let data = self.reads.pop_front().unwrap_or_default();
                        buf.copy_from_slice(&data[..buf.len()]);
                    }
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        ms: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        async fn delay_ns(&mut self, _ns: u32) {}

        async fn delay_ms(&mut self, ms: u32) {
            self.ms.push(ms);
        }
    }

    fn chip() -> Mpr121<FakeBus, RecordingDelay> {
        Mpr121::new(FakeBus::default(), RecordingDelay::default(), 0x5A)
    }

    #[test]
    fn register_write_is_two_bytes() {
        let mut chip = chip();
        block_on(chip.configure(0x2B, 0x01)).unwrap();
        let (bus, _) = chip.release();
        assert_eq!(bus.writes, [(0x5A, std::vec![0x2B, 0x01])]);
    }

    #[test]
    fn status_is_little_endian_and_masked() {
        let mut chip = chip();
        chip.i2c.reads.push_back([0x05, 0x80]);
        let mask = block_on(chip.read_status()).unwrap();
        assert_eq!(mask.bits(), 0x005);
        assert_eq!(chip.i2c.writes, [(0x5A, std::vec![TOUCH_STATUS])]);
    }

    #[test]
    fn reset_waits_for_the_chip() {
        let mut chip = chip();
        block_on(chip.reset()).unwrap();
        let (bus, delay) = chip.release();
        assert_eq!(bus.writes, [(0x5A, std::vec![0x80, 0x63])]);
        assert_eq!(delay.ms, [30]);
    }

    #[test]
    fn configure_device_runs_the_full_sequence() {
        let mut chip = chip();
        block_on(configure_device(&mut chip, &Config::default())).unwrap();
        let (bus, _) = chip.release();
        let writes: Vec<Vec<u8>> = bus.writes.into_iter().map(|(_, bytes)| bytes).collect();

        // reset + stop + filters + 12 touch/release pairs + start
        assert_eq!(writes.len(), 1 + 1 + FILTER_SETTINGS.len() + 24 + 1);
        assert_eq!(writes[0], [SOFT_RESET, SOFT_RESET_VALUE]);
        assert_eq!(writes[1], [ECR, 0x00]);
        assert_eq!(writes[2], [0x2B, 0x01]);

        let thresholds = &writes[2 + FILTER_SETTINGS.len()..writes.len() - 1];
        assert_eq!(thresholds[0], [0x41, 60]);
        assert_eq!(thresholds[1], [0x42, 20]);
        assert_eq!(thresholds[23], [0x58, 20]);

        assert_eq!(writes.last().unwrap(), &[ECR, 0xCC]);
    }

    #[test]
    fn custom_thresholds_reach_every_electrode() {
        let mut chip = chip();
        block_on(chip.configure_thresholds(12, 6)).unwrap();
        let (bus, _) = chip.release();
        assert_eq!(bus.writes.len(), 24);
        for (index, (_, bytes)) in bus.writes.iter().enumerate() {
            let expected = if index % 2 == 0 { 12 } else { 6 };
            assert_eq!(bytes[1], expected);
        }
    }
}
