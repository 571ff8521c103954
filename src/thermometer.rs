//! Temperature representation and conversion

use fixed::types::I9F7;

/// I9F7 is a fixed point number with 7 fractional bits and 9 integer bits, the exact layout
/// of the sensor's temperature code.
/// This gives us a precision of 0.0078125 degrees Celsius & a range of [-256, 256).
pub type Temperature = I9F7;

static_assertions::assert_eq_size!(Temperature, u16);

/// Counts per degree Celsius
pub const SCALE: f32 = 128.0;

const SIGN_BIT: u16 = 0x8000;

/// Converts a raw temperature code to degrees Celsius.
///
/// Codes with bit 15 set are negative two's-complement values; all others are read as plain
/// unsigned counts. Either way the result is the code divided by 128.
pub fn raw_to_celsius(raw: u16) -> f32 {
    if raw & SIGN_BIT != 0 {
        f32::from(i16::from_be_bytes(raw.to_be_bytes())) / SCALE
    } else {
        f32::from(raw) / SCALE
    }
}

/// Reinterprets a raw register code as a [`Temperature`]
#[inline]
pub const fn from_raw(raw: u16) -> Temperature {
    Temperature::from_bits(i16::from_be_bytes(raw.to_be_bytes()))
}

/// Encodes a [`Temperature`] as a raw register code, as used by the limit registers
#[inline]
pub const fn to_raw(temp: Temperature) -> u16 {
    u16::from_be_bytes(temp.to_bits().to_be_bytes())
}

pub trait Thermometer {
    type Error;

    /// Read the temperature in degrees Celsius
    ///
    /// Blocks until the bus exchange completes.
    fn read(&mut self) -> Result<Temperature, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_code() {
        assert_eq!(raw_to_celsius(0x2300), 70.0);
        assert_eq!(raw_to_celsius(0x0001), 0.007_812_5);
    }

    #[test]
    fn negative_code() {
        assert_eq!(raw_to_celsius(0xF600), -20.0);
        assert_eq!(raw_to_celsius(0xFFFF), -0.007_812_5);
        assert_eq!(raw_to_celsius(0x8000), -256.0);
    }

    #[test]
    fn fixed_point_agrees_with_float() {
        for raw in 0..=u16::MAX {
            assert_eq!(from_raw(raw).to_num::<f32>(), raw_to_celsius(raw));
        }
    }

    #[test]
    fn limit_codes() {
        assert_eq!(to_raw(Temperature::from_num(70)), 0x2300);
        assert_eq!(to_raw(Temperature::from_num(-20)), 0xF600);
        assert_eq!(to_raw(Temperature::from_num(147)), 0x4980);
        assert_eq!(from_raw(0x0500), Temperature::from_num(10));
    }
}
