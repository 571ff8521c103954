use embedded_hal::{
    blocking::spi::{Transfer, Write},
    digital::v2::OutputPin,
};

use super::{Result, Transport};

/// Failure raised by either half of an [`SpiTransport`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<S, P> {
    /// SPI peripheral error
    Spi(S),
    /// Chip-select pin error
    Pin(P),
}

/// [`Transport`] over a blocking SPI bus and an active-low chip-select pin.
///
/// The bus must already be configured with [`MODE`](super::MODE) and the pin driven high
/// before the first transaction.
pub struct SpiTransport<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiTransport<SPI, CS> {
    #[inline]
    pub const fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Gives back the bus and the chip-select pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Transport for SpiTransport<SPI, CS>
where
    SPI: Transfer<u8> + Write<u8, Error = <SPI as Transfer<u8>>::Error>,
    CS: OutputPin,
{
    type Error = BusError<<SPI as Transfer<u8>>::Error, CS::Error>;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(BusError::Pin)?;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(BusError::Pin)?;
        Ok(())
    }

    fn transfer(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.transfer(words).map_err(BusError::Spi)?;
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(words).map_err(BusError::Spi)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::{
        pin::{Mock as PinMock, State, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
        MockError,
    };
    use std::io::ErrorKind;

    use super::*;
    use crate::bus::Error;

    #[test]
    fn transfer_is_framed_by_chip_select() {
        let spi = SpiMock::new(&[SpiTransaction::transfer(
            vec![0x50, 0x00, 0x00],
            vec![0xFF, 0x23, 0x00],
        )]);
        let cs = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut bus = SpiTransport::new(spi, cs);

        let mut buf = [0x50, 0x00, 0x00];
        bus.transaction(|bus| bus.transfer(&mut buf)).unwrap();
        assert_eq!(buf, [0xFF, 0x23, 0x00]);

        let (mut spi, mut cs) = bus.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn write_is_framed_by_chip_select() {
        let spi = SpiMock::new(&[SpiTransaction::write(vec![0x08, 0x80])]);
        let cs = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut bus = SpiTransport::new(spi, cs);

        bus.transaction(|bus| bus.write(&[0x08, 0x80])).unwrap();

        let (mut spi, mut cs) = bus.release();
        spi.done();
        cs.done();
    }

    /// SPI bus whose every exchange fails
    struct BrokenSpi;

    impl Transfer<u8> for BrokenSpi {
        type Error = MockError;

        fn transfer<'w>(
            &mut self,
            _words: &'w mut [u8],
        ) -> core::result::Result<&'w [u8], Self::Error> {
            Err(MockError::Io(ErrorKind::BrokenPipe))
        }
    }

    impl Write<u8> for BrokenSpi {
        type Error = MockError;

        fn write(&mut self, _words: &[u8]) -> core::result::Result<(), Self::Error> {
            Err(MockError::Io(ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn failed_exchange_still_releases() {
        let cs = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut bus = SpiTransport::new(BrokenSpi, cs);

        let err = bus
            .transaction(|bus| bus.transfer(&mut [0x50, 0x00, 0x00]))
            .unwrap_err();
        assert!(matches!(err, Error::Bus(BusError::Spi(_))));

        let err = bus
            .transaction(|bus| bus.write(&[0xFF; 4]))
            .unwrap_err();
        assert!(matches!(err, Error::Bus(BusError::Spi(_))));

        let (_, mut cs) = bus.release();
        cs.done();
    }

    #[test]
    fn failed_select_still_releases() {
        let spi = SpiMock::new(&[]);
        let cs = PinMock::new(&[
            PinTransaction::set(State::Low).with_error(MockError::Io(ErrorKind::NotConnected)),
            PinTransaction::set(State::High),
        ]);
        let mut bus = SpiTransport::new(spi, cs);

        let err = bus
            .transaction(|bus| bus.write(&[0xFF; 4]))
            .unwrap_err();
        assert!(matches!(err, Error::Bus(BusError::Pin(_))));

        let (mut spi, mut cs) = bus.release();
        spi.done();
        cs.done();
    }
}
