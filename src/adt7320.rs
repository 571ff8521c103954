//! Implementation for the ADT7320 temperature sensor.

use crate::{
    alarm::Alarms,
    bus::{Error, Result, Transport},
    config::{Config, OperationMode},
    registers::{command, Direction, Register, Width, DEVICE_ID, DUMMY, RESET_SEQUENCE},
    thermometer::{self, Temperature, Thermometer},
};

const THYST_MASK: u8 = 0x0F;

/// Longest frame: command byte plus a two byte payload
const FRAME_LEN: usize = 3;

/// An ADT7320 on its own chip-select line.
///
/// The driver keeps no state besides the transport: sequencing (reset before reads, limits
/// before relying on the alarm outputs) is up to the caller.
#[derive(Debug)]
pub struct Adt7320<T> {
    bus: T,
}

impl<T: Transport> Adt7320<T> {
    #[inline]
    pub const fn new(bus: T) -> Self {
        Self { bus }
    }

    /// Gives back the transport
    pub fn release(self) -> T {
        self.bus
    }

    /// Resets the serial interface and all registers to their power-on values.
    ///
    /// Clocks out 32 ones with chip-select held. No command byte is sent and nothing is read
    /// back; the caller decides whether to retry on failure.
    pub fn init(&mut self) -> Result<(), T::Error> {
        trace!("adt7320: reset");
        self.bus.transaction(|bus| bus.write(&RESET_SEQUENCE))
    }

    /// Reads `size` (1 or 2) bytes from `reg`.
    ///
    /// Any other size fails with [`Error::InvalidSize`] before the bus is touched.
    pub fn read_register(&mut self, reg: Register, size: u8) -> Result<u16, T::Error> {
        let width = Width::from_size::<T::Error>(size)?;
        self.read_raw(reg, width)
    }

    /// Writes the low `size` (1 or 2) bytes of `value` to `reg`.
    ///
    /// Any other size fails with [`Error::InvalidSize`] before the bus is touched.
    pub fn write_register(&mut self, reg: Register, size: u8, value: u16) -> Result<(), T::Error> {
        let width = Width::from_size::<T::Error>(size)?;
        self.write_raw(reg, width, value)
    }

    /// Reads the temperature in degrees Celsius
    pub fn read_temperature(&mut self) -> Result<f32, T::Error> {
        let raw = self.read_raw(Register::Temperature, Register::Temperature.width())?;
        Ok(thermometer::raw_to_celsius(raw))
    }

    /// Reads the temperature without leaving fixed point
    pub fn read_temperature_fixed(&mut self) -> Result<Temperature, T::Error> {
        let raw = self.read_raw(Register::Temperature, Register::Temperature.width())?;
        Ok(thermometer::from_raw(raw))
    }

    pub fn device_id(&mut self) -> Result<u8, T::Error> {
        self.read_u8(Register::Id)
    }

    /// Checks that an ADT7320 answers on this chip-select
    pub fn verify_id(&mut self) -> Result<(), T::Error> {
        match self.device_id()? {
            DEVICE_ID => Ok(()),
            id => {
                debug!("adt7320: unexpected id {=u8:#X}", id);
                Err(Error::UnexpectedId(id))
            }
        }
    }

    pub fn config(&mut self) -> Result<Config, T::Error> {
        self.read_u8(Register::Config).map(Config::from_register)
    }

    pub fn set_config(&mut self, config: Config) -> Result<(), T::Error> {
        self.write_raw(Register::Config, Register::Config.width(), u16::from(config.to_register()))
    }

    /// Starts a single conversion.
    ///
    /// The result is available after [`CONVERSION_TIME_MS`](crate::config::CONVERSION_TIME_MS),
    /// after which the sensor shuts down again.
    pub fn one_shot(&mut self) -> Result<(), T::Error> {
        let config = self.config()?;
        self.set_config(config.with_operation_mode(OperationMode::OneShot))
    }

    /// Reads the status register.
    ///
    /// In interrupt mode this also clears the latched limit flags.
    pub fn alarms(&mut self) -> Result<Alarms, T::Error> {
        self.read_u8(Register::Status).map(Alarms::from_register)
    }

    pub fn critical_limit(&mut self) -> Result<Temperature, T::Error> {
        self.read_limit(Register::TCrit)
    }

    pub fn set_critical_limit(&mut self, limit: Temperature) -> Result<(), T::Error> {
        self.write_limit(Register::TCrit, limit)
    }

    pub fn high_limit(&mut self) -> Result<Temperature, T::Error> {
        self.read_limit(Register::THigh)
    }

    pub fn set_high_limit(&mut self, limit: Temperature) -> Result<(), T::Error> {
        self.write_limit(Register::THigh, limit)
    }

    pub fn low_limit(&mut self) -> Result<Temperature, T::Error> {
        self.read_limit(Register::TLow)
    }

    pub fn set_low_limit(&mut self, limit: Temperature) -> Result<(), T::Error> {
        self.write_limit(Register::TLow, limit)
    }

    /// Hysteresis applied to all three limits, in whole degrees Celsius
    pub fn hysteresis(&mut self) -> Result<u8, T::Error> {
        Ok(self.read_u8(Register::THyst)? & THYST_MASK)
    }

    /// Sets the hysteresis (0 to 15 °C)
    pub fn set_hysteresis(&mut self, degrees: u8) -> Result<(), T::Error> {
        if degrees > THYST_MASK {
            return Err(Error::OutOfRange);
        }
        self.write_raw(Register::THyst, Register::THyst.width(), u16::from(degrees))
    }

    fn read_u8(&mut self, reg: Register) -> Result<u8, T::Error> {
        let [_, lo] = self.read_raw(reg, reg.width())?.to_be_bytes();
        Ok(lo)
    }

    fn read_limit(&mut self, reg: Register) -> Result<Temperature, T::Error> {
        self.read_raw(reg, reg.width()).map(thermometer::from_raw)
    }

    fn write_limit(&mut self, reg: Register, limit: Temperature) -> Result<(), T::Error> {
        self.write_raw(reg, reg.width(), thermometer::to_raw(limit))
    }

    /// Command byte and `width` dummy bytes out, register contents back MSB first
    fn read_raw(&mut self, reg: Register, width: Width) -> Result<u16, T::Error> {
        let mut buf = [DUMMY; FRAME_LEN];
        buf[0] = command(Direction::Read, reg.addr());

        let len = width.bytes() + 1;
        self.bus.transaction(|bus| bus.transfer(&mut buf[..len]))?;

        let value = buf[1..len]
            .iter()
            .fold(0u16, |acc, &b| (acc << 8) | u16::from(b));
        trace!("adt7320: read {} = {=u16:#X}", reg, value);
        Ok(value)
    }

    /// Command byte then the low `width` bytes of `value`, MSB first
    fn write_raw(&mut self, reg: Register, width: Width, value: u16) -> Result<(), T::Error> {
        let n = width.bytes();
        let payload = value.to_be_bytes();

        let mut buf = [DUMMY; FRAME_LEN];
        buf[0] = command(Direction::Write, reg.addr());
        buf[1..=n].copy_from_slice(&payload[payload.len() - n..]);

        trace!("adt7320: write {} = {=u16:#X}", reg, value);
        self.bus.transaction(|bus| bus.write(&buf[..=n]))
    }
}

impl<T: Transport> Thermometer for Adt7320<T> {
    type Error = Error<T::Error>;

    fn read(&mut self) -> core::result::Result<Temperature, Self::Error> {
        self.read_temperature_fixed()
    }
}
