//! Status register flags.

const RDY: u8 = 0b1000_0000;
const T_CRIT: u8 = 0b0100_0000;
const T_HIGH: u8 = 0b0010_0000;
const T_LOW: u8 = 0b0001_0000;

/// Decoded [`Register::Status`](crate::Register::Status).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct Alarms {
    /// A new conversion result is in the temperature register
    pub ready: bool,
    /// Temperature is at or above the critical limit
    pub critical: bool,
    /// Temperature is at or above the high limit
    pub high: bool,
    /// Temperature is at or below the low limit
    pub low: bool,
}

impl Alarms {
    pub const fn from_register(reg: u8) -> Self {
        Self {
            // RDY is active low
            ready: reg & RDY == 0,
            critical: reg & T_CRIT != 0,
            high: reg & T_HIGH != 0,
            low: reg & T_LOW != 0,
        }
    }

    /// Any of the limit flags is set
    pub const fn any(&self) -> bool {
        self.critical || self.high || self.low
    }
}
