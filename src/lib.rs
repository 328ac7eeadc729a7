//! Driver for the `MCP23008` 8-bit I2C port-expander.
//!
//! The driver is built on [`embedded-hal`](https://docs.rs/embedded-hal) 1.0 and can be used in
//! two ways:
//!
//! - Directly through the device handle, mirroring the chip's registers: configure the whole port
//!   or single pins, read and write pins, and (with the `interrupts` feature) set up
//!   interrupt-on-change.
//! - Through typed pins obtained from [`Mcp23008::split()`], which implement the `embedded-hal`
//!   digital traits and can be passed to other drivers.
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use embedded_hal::digital::PinState;
//! use mcp23008::{Mcp23008, PinMode};
//!
//! let mut mcp = Mcp23008::new(i2c, false, false, false);
//! mcp.init().unwrap();
//! mcp.set_pin_mode(0, PinMode::Output, false).unwrap();
//! mcp.write_pin(0, PinState::High).unwrap();
//!
//! let pins = mcp.split();
//! let mut led = pins.gp1.into_output().unwrap();
//! led.set_high().unwrap();
//! let button = pins.gp7;
//! let pressed = button.is_low().unwrap();
//! ```
//!
//! The driver never caches register contents, every operation talks to the chip.  All operations
//! on one device run under its [`PortMutex`], so read-modify-write sequences issued through the
//! device handle and its pins can not interleave.  Other devices sharing the bus are not covered
//! by this and need to be serialized by the caller.
//!
//! Each driver owns its transport, so several expanders on one bus need a bus-sharing wrapper
//! such as the ones from [`embedded-hal-bus`](https://docs.rs/embedded-hal-bus):
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use core::cell::RefCell;
//! use embedded_hal::digital::PinState;
//! use embedded_hal_bus::i2c::RefCellDevice;
//! use mcp23008::{Mcp23008, PinMode};
//!
//! let bus = RefCell::new(i2c);
//! let leds = Mcp23008::new(RefCellDevice::new(&bus), false, false, false);
//! let keys = Mcp23008::new(RefCellDevice::new(&bus), true, false, false);
//!
//! leds.set_pin_mode(0, PinMode::Output, false).unwrap();
//! keys.set_pin_mode(0, PinMode::InputPullUp, false).unwrap();
//! let pressed = keys.read_pin(0).unwrap() == PinState::Low;
//! leds.write_pin(0, PinState::from(pressed)).unwrap();
//! ```
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

mod bus;
mod common;
pub mod dev;
mod error;
mod mutex;
mod pin;
#[cfg(test)]
mod sim;

pub use bus::I2cBus;
pub use common::mode;
pub use common::Direction;
pub use common::InterruptMirroring;
pub use common::InterruptTrigger;
pub use common::PinMode;
pub use common::{PortDriver, PortDriverPolarity, PortDriverPullUp, PortDriverTotemPole};
pub use error::Error;
pub use mutex::PortMutex;
pub use pin::Pin;

#[cfg(feature = "interrupts")]
pub use common::PortDriverInterrupts;

pub(crate) use bus::I2cExt;

pub use dev::mcp23008::Mcp23008;
pub use dev::mcp23008::Register;
