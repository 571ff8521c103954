//! Bus access for the sensor.
//!
//! The driver needs very little from the bus: a chip-select line it can assert and release,
//! a full-duplex exchange and a write-only exchange. [`Transport`] captures exactly that, and
//! [`SpiTransport`] provides it on top of the `embedded-hal` SPI and GPIO traits.

mod error;
mod spi;

use embedded_hal::spi::{Mode, MODE_3};

pub use self::{error::*, spi::*};

/// SPI mode required by the sensor: clock idles high, data captured on the trailing edge.
pub const MODE: Mode = MODE_3;

pub trait Transport {
    type Error;

    /// Assert chip-select
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release chip-select
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Clock `words` out while clocking the response into the same buffer
    fn transfer(&mut self, words: &mut [u8]) -> Result<(), Self::Error>;

    /// Clock `words` out, discarding whatever comes back
    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error>;

    /// Runs `f` with chip-select asserted.
    ///
    /// Chip-select is released on every exit path, including when the select itself or `f`
    /// fails, so the line never stays asserted after a failed exchange. An error from `f` is
    /// reported in preference to an error releasing the line.
    fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, Self::Error>,
    ) -> Result<R, Self::Error> {
        let result = match self.select() {
            Ok(()) => f(self),
            Err(e) => Err(e),
        };
        let released = self.deselect();

        let value = result?;
        released?;
        Ok(value)
    }
}

impl<T: Transport> Transport for &mut T {
    type Error = T::Error;

    fn select(&mut self) -> Result<(), Self::Error> {
        T::select(self)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        T::deselect(self)
    }

    fn transfer(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        T::transfer(self, words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        T::write(self, words)
    }
}
