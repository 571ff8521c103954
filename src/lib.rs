//! Blocking driver for the Analog Devices ADT7320 SPI temperature sensor.
//!
//! The driver frames register reads and writes into the byte sequences the sensor expects
//! and converts the raw temperature code (1/128 °C per LSB) into degrees Celsius. It talks to
//! the hardware only through the [`Transport`] trait, so the bus, the chip-select line and the
//! peripheral setup stay with the host application.
//!
//! The host must configure its SPI peripheral with [`MODE`] (CPOL = 1, CPHA = 1) before use.
//!
//! ```ignore
//! let bus = SpiTransport::new(spi, cs);
//! let mut sensor = Adt7320::new(bus);
//!
//! sensor.init()?;
//! sensor.set_config(Config::new().with_resolution(Resolution::Bits16))?;
//! sensor.set_low_limit(Temperature::from_num(-20))?;
//! sensor.set_high_limit(Temperature::from_num(70))?;
//!
//! let celsius = sensor.read_temperature()?;
//! ```
//!
//! # Features
//!
//! - **`defmt`**: trace every bus transaction and derive [`defmt::Format`] on public types.
//! - **`fake`**: expose [`fake::FakeBus`], an in-memory sensor for host-side tests.

#![no_std]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod log;

mod adt7320;
pub mod alarm;
pub mod bus;
pub mod config;
pub mod registers;
pub mod thermometer;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use self::{
    adt7320::Adt7320,
    alarm::Alarms,
    bus::{BusError, Error, Result, SpiTransport, Status, Transport, MODE},
    config::{Config, FaultQueue, InterruptMode, OperationMode, Polarity, Resolution},
    registers::{Register, Width},
    thermometer::{Temperature, Thermometer},
};
