//! An asynchronous, `no_std`, event-driven driver for the MPR121 capacitive
//! touch controller.
//!
//! The driver polls the 12-bit touch status of the MPR121, compares each
//! sample with the previous one and raises a `Touched` or `Released` event
//! for every electrode that changed. Events are delivered synchronously to
//! handlers registered for one electrode or for any of them.
//!
//! Electrodes are numbered `T5`..`T16`; `T16` is the chip's ELE0 and `T5`
//! its ELE11.
//!
//! # Usage
//!
//! To use this driver, you need an I2C peripheral implementation that satisfies the
//! `embedded-hal-async::i2c::I2c` trait and a delay implementing
//! `embedded-hal-async::delay::DelayNs`.
//!
//! ```no_run
//! # use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! # use embassy_sync::signal::Signal;
//! # use embassy_time::Delay;
//! use mpr121_touch_async::{Config, Electrode, Mpr121, Sensor, TouchContext, TouchController};
//!
//! async fn touch_task<I: embedded_hal_async::i2c::I2c>(i2c: I) {
//!     let on_any = |ctx: &TouchContext| {
//!         log::info!("{} touched", ctx.last_touched_electrode());
//!     };
//!     let on_t5_release = |_: &TouchContext| log::info!("T5 released");
//!     let stop: Signal<NoopRawMutex, ()> = Signal::new();
//!
//!     let config = Config::default();
//!     let chip = Mpr121::new(i2c, Delay, config.address);
//!     let controller: TouchController<NoopRawMutex, _> = TouchController::new(chip, config);
//!
//!     controller.on_touched(Sensor::Any, &on_any).await.unwrap();
//!     controller.on_released(Electrode::T5, &on_t5_release).await.unwrap();
//!
//!     // Runs until `stop` is signaled.
//!     controller.run(Delay, &stop).await.unwrap();
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod chip;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod edge;
pub mod electrode;
pub mod error;
pub mod registers;

pub use chip::{configure_device, Mpr121, TouchChip};
pub use config::Config;
pub use controller::TouchController;
pub use dispatch::{Handler, Sensor, TouchContext};
pub use edge::{detect, EventKind, TouchEvent};
pub use electrode::{bit_of, electrode_of, Electrode, TouchMask, NO_ELECTRODE};
pub use error::Error;
