//! Controller state, lazy initialization and the sampling loop.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};

use crate::chip::{configure_device, TouchChip};
use crate::config::Config;
use crate::dispatch::{Dispatcher, Handler, Sensor, TouchContext};
use crate::edge::{detect, EventKind};
use crate::electrode::{Electrode, TouchMask};
use crate::error::Error;

/// Handler slots available when the capacity parameter is left out.
pub const DEFAULT_HANDLER_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, Copy)]
struct ControllerState {
    phase: Phase,
    sampling: bool,
    last_mask: TouchMask,
    last_event: Option<Electrode>,
}

impl ControllerState {
    const fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            sampling: false,
            last_mask: TouchMask::EMPTY,
            last_event: None,
        }
    }
}

/// Event-driven front end for an MPR121.
///
/// Owns the chip, the last observed touch mask and the handler table. The
/// chip is configured on first use by any public operation; [`Self::run`] is
/// the sampling loop and is meant to be driven by a dedicated task.
///
/// `M` picks the mutex flavour (`NoopRawMutex` when everything runs on one
/// executor), `N` bounds the number of registered handlers.
pub struct TouchController<'a, M: RawMutex, C, const N: usize = DEFAULT_HANDLER_CAPACITY> {
    chip: Mutex<M, C>,
    state: BlockingMutex<M, Cell<ControllerState>>,
    dispatcher: Dispatcher<'a, M, N>,
    config: Config,
}

impl<'a, M, C, const N: usize> TouchController<'a, M, C, N>
where
    M: RawMutex,
    C: TouchChip,
{
    /// Creates a new `TouchController`. Nothing is sent to the chip yet.
    pub fn new(chip: C, config: Config) -> Self {
        Self {
            chip: Mutex::new(chip),
            state: BlockingMutex::new(Cell::new(ControllerState::new())),
            dispatcher: Dispatcher::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` once the configuration sequence went through.
    pub fn is_initialized(&self) -> bool {
        self.snapshot().phase == Phase::Ready
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.dispatcher.handler_count()
    }

    /// Configures the chip if that has not happened yet.
    ///
    /// The first successful call runs the full configuration sequence; later
    /// calls return immediately. When configuration fails the controller stays
    /// uninitialized and the next call tries again.
    pub async fn initialize(&self) -> Result<(), Error<C::Error>> {
        let mut chip = self.chip.lock().await;
        if self.is_initialized() {
            return Ok(());
        }

        info!("Configuring MPR121 at {:#04x}", self.config.address);
        configure_device(&mut *chip, &self.config).await.map_err(|err| {
            warn!("Error configuring MPR121: {err:?}");
            Error::Transport(err)
        })?;

        self.update(|state| {
            state.phase = Phase::Ready;
            state.last_mask = TouchMask::EMPTY;
            state.last_event = None;
        });
        Ok(())
    }

    /// Runs `handler` whenever `sensor` starts being touched.
    pub async fn on_touched(
        &self,
        sensor: impl Into<Sensor>,
        handler: Handler<'a>,
    ) -> Result<(), Error<C::Error>> {
        self.register(EventKind::Touched, sensor.into(), handler).await
    }

    /// Runs `handler` whenever `sensor` stops being touched.
    pub async fn on_released(
        &self,
        sensor: impl Into<Sensor>,
        handler: Handler<'a>,
    ) -> Result<(), Error<C::Error>> {
        self.register(EventKind::Released, sensor.into(), handler).await
    }

    /// Whether `electrode` was touched in the most recent sample.
    ///
    /// May lag the pad by up to one sample interval.
    pub async fn currently_touched(&self, electrode: Electrode) -> Result<bool, Error<C::Error>> {
        self.initialize().await?;
        Ok(self.snapshot().last_mask.is_touched(electrode))
    }

    /// Electrode of the most recently raised event, `None` before the first one.
    ///
    /// Takes the chip lock, so it cannot be awaited from inside a handler.
    /// Handlers get the same electrode from
    /// [`TouchContext::last_touched_electrode`].
    pub async fn last_touched_electrode(&self) -> Result<Option<Electrode>, Error<C::Error>> {
        self.initialize().await?;
        Ok(self.snapshot().last_event)
    }

    /// Samples the touch status until `stop` is signaled.
    ///
    /// Each iteration reads the status, raises one event per changed
    /// electrode, runs the matching handlers, then sleeps for the configured
    /// interval. `stop` is checked before every read. A failed read is logged
    /// and treated as "nothing changed". Calling this while another sampler
    /// is active returns right away.
    ///
    /// A stop left over from an earlier run is cleared on entry, so the same
    /// `stop` can be reused to restart the sampler. Dropping the returned
    /// future also ends sampling and allows a later restart.
    pub async fn run<D: DelayNs>(
        &self,
        mut delay: D,
        stop: &Signal<M, ()>,
    ) -> Result<(), Error<C::Error>> {
        self.initialize().await?;

        let already_sampling = self.state.lock(|cell| {
            let mut state = cell.get();
            let was = state.sampling;
            state.sampling = true;
            cell.set(state);
            was
        });
        if already_sampling {
            warn!("Touch sampler already running");
            return Ok(());
        }
        let _sampling = SamplingGuard { state: &self.state };
        stop.reset();

        let interval_ms = self.config.sample_interval_ms();
        info!("Sampling touch status every {interval_ms} ms");

        let mut previous = TouchMask::EMPTY;
        while !stop.signaled() {
            previous = self.cycle(previous).await;
            delay.delay_ms(interval_ms).await;
        }

        info!("Touch sampler stopped");
        Ok(())
    }

    /// One read, edge detection and dispatch pass. Returns the mask to compare
    /// the next sample against.
    async fn cycle(&self, previous: TouchMask) -> TouchMask {
        let status = {
            let mut chip = self.chip.lock().await;
            chip.read_status().await
        };
        let current = match status {
            Ok(mask) => mask,
            Err(err) => {
                warn!("Error reading touch status: {err:?}");
                previous
            }
        };
        self.update(|state| state.last_mask = current);

        for event in detect(previous, current) {
            debug!("{:?} {}", event.kind, event.electrode);
            self.update(|state| state.last_event = Some(event.electrode));
            self.dispatcher.dispatch(&TouchContext::new(event, current));
        }
        current
    }

    async fn register(
        &self,
        kind: EventKind,
        sensor: Sensor,
        handler: Handler<'a>,
    ) -> Result<(), Error<C::Error>> {
        self.initialize().await?;
        self.dispatcher.register(kind, sensor, handler).map_err(|_| {
            warn!("Handler table full, dropping {kind:?} handler for {sensor:?}");
            Error::HandlerCapacity
        })
    }

    fn snapshot(&self) -> ControllerState {
        self.state.lock(|cell| cell.get())
    }

    fn update(&self, f: impl FnOnce(&mut ControllerState)) {
        self.state.lock(|cell| {
            let mut state = cell.get();
            f(&mut state);
            cell.set(state);
        });
    }
}

/// Clears the sampling flag when the sampler returns or its future is dropped.
struct SamplingGuard<'s, M: RawMutex> {
    state: &'s BlockingMutex<M, Cell<ControllerState>>,
}

impl<M: RawMutex> Drop for SamplingGuard<'_, M> {
    fn drop(&mut self) {
        self.state.lock(|cell| {
            let mut state = cell.get();
            state.sampling = false;
            cell.set(state);
        });
    }
}
