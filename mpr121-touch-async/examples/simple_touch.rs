//! Drives the touch sampler on the host against a simulated MPR121 that
//! replays a short press on T5 and a two-finger touch on T16/T14.

use core::convert::Infallible;
use std::collections::VecDeque;
use std::time::Duration as StdDuration;

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use log::{info, warn};
use mpr121_touch_async::{
    Config, Electrode, EventKind, Mpr121, Sensor, TouchContext, TouchController,
};

/// Answers status reads from a fixed script and asks the sampler to stop once
/// the script runs out. Register writes are accepted and ignored.
struct SimulatedBus<'s> {
    samples: VecDeque<u16>,
    stop: &'s Signal<NoopRawMutex, ()>,
}

impl ErrorType for SimulatedBus<'_> {
    type Error = Infallible;
}

impl I2c<SevenBitAddress> for SimulatedBus<'_> {
    async fn transaction(
        &mut self,
        _address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Infallible> {
        for op in operations.iter_mut() {
            if let Operation::Read(buf) = op {
                let sample = self.samples.pop_front().unwrap_or_default();
                if self.samples.is_empty() {
                    self.stop.signal(());
                }
                let bytes = sample.to_le_bytes();
                buf.copy_from_slice(&bytes[..buf.len()]);
            }
        }
        Ok(())
    }
}

/// Blocking host delay.
struct HostDelay;

impl DelayNs for HostDelay {
    async fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(StdDuration::from_nanos(ns.into()));
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let stop: Signal<NoopRawMutex, ()> = Signal::new();
    let bus = SimulatedBus {
        samples: [0x000, 0x800, 0x800, 0x000, 0x005, 0x001, 0x000]
            .into_iter()
            .collect(),
        stop: &stop,
    };

    let log_touch = |ctx: &TouchContext| {
        let held = ctx.mask().touched().count();
        info!("{} touched ({held} held)", ctx.last_touched_electrode());
    };
    let log_release = |ctx: &TouchContext| match ctx.kind() {
        EventKind::Released => info!("{} released", ctx.last_touched_electrode()),
        EventKind::Touched => warn!("Unexpected event {:?}", ctx.event()),
    };
    let t5_release = |_: &TouchContext| info!("T5 button released");

    let config = Config::default().with_sample_interval(Duration::from_millis(20));
    let chip = Mpr121::new(bus, HostDelay, config.address);
    let controller: TouchController<NoopRawMutex, _> = TouchController::new(chip, config);

    block_on(async {
        let registered = async {
            controller.on_touched(Sensor::Any, &log_touch).await?;
            controller.on_released(Sensor::Any, &log_release).await?;
            controller.on_released(Electrode::T5, &t5_release).await
        };
        if let Err(err) = registered.await {
            warn!("Error registering touch handlers: {err:?}");
            return;
        }

        match controller.run(HostDelay, &stop).await {
            Ok(()) => info!("Sampler finished"),
            Err(err) => warn!("Error running touch sampler: {err:?}"),
        }
    });
}
