//! Typed view of the configuration register.

/// Worst-case time in milliseconds for a conversion to complete after a one-shot request or
/// after leaving shutdown.
pub const CONVERSION_TIME_MS: u32 = 240;

const FAULT_QUEUE_MASK: u8 = 0b0000_0011;
const CT_POLARITY: u8 = 0b0000_0100;
const INT_POLARITY: u8 = 0b0000_1000;
const INT_CT_MODE: u8 = 0b0001_0000;
const OPERATION_MODE_MASK: u8 = 0b0110_0000;
const OPERATION_MODE_SHIFT: u8 = 5;
const RESOLUTION: u8 = 0b1000_0000;

/// Contents of [`Register::Config`](crate::Register::Config).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub fault_queue: FaultQueue,
    pub ct_polarity: Polarity,
    pub int_polarity: Polarity,
    pub interrupt_mode: InterruptMode,
    pub operation_mode: OperationMode,
    pub resolution: Resolution,
}

impl Config {
    /// Power-on configuration
    #[inline]
    pub const fn new() -> Self {
        Self {
            fault_queue: FaultQueue::One,
            ct_polarity: Polarity::ActiveLow,
            int_polarity: Polarity::ActiveLow,
            interrupt_mode: InterruptMode::Interrupt,
            operation_mode: OperationMode::Continuous,
            resolution: Resolution::Bits13,
        }
    }

    pub const fn from_register(reg: u8) -> Self {
        Self {
            fault_queue: FaultQueue::from_bits(reg & FAULT_QUEUE_MASK),
            ct_polarity: Polarity::from_bit(reg & CT_POLARITY != 0),
            int_polarity: Polarity::from_bit(reg & INT_POLARITY != 0),
            interrupt_mode: if reg & INT_CT_MODE == 0 {
                InterruptMode::Interrupt
            } else {
                InterruptMode::Comparator
            },
            operation_mode: OperationMode::from_bits(
                (reg & OPERATION_MODE_MASK) >> OPERATION_MODE_SHIFT,
            ),
            resolution: if reg & RESOLUTION == 0 {
                Resolution::Bits13
            } else {
                Resolution::Bits16
            },
        }
    }

    pub const fn to_register(self) -> u8 {
        let mut reg = self.fault_queue as u8;
        if let Polarity::ActiveHigh = self.ct_polarity {
            reg |= CT_POLARITY;
        }
        if let Polarity::ActiveHigh = self.int_polarity {
            reg |= INT_POLARITY;
        }
        if let InterruptMode::Comparator = self.interrupt_mode {
            reg |= INT_CT_MODE;
        }
        reg |= (self.operation_mode as u8) << OPERATION_MODE_SHIFT;
        if let Resolution::Bits16 = self.resolution {
            reg |= RESOLUTION;
        }
        reg
    }

    #[must_use]
    pub const fn with_fault_queue(mut self, fault_queue: FaultQueue) -> Self {
        self.fault_queue = fault_queue;
        self
    }

    #[must_use]
    pub const fn with_ct_polarity(mut self, polarity: Polarity) -> Self {
        self.ct_polarity = polarity;
        self
    }

    #[must_use]
    pub const fn with_int_polarity(mut self, polarity: Polarity) -> Self {
        self.int_polarity = polarity;
        self
    }

    #[must_use]
    pub const fn with_interrupt_mode(mut self, mode: InterruptMode) -> Self {
        self.interrupt_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_operation_mode(mut self, mode: OperationMode) -> Self {
        self.operation_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Number of consecutive out-of-limit conversions before INT or CT trips
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FaultQueue {
    #[default]
    One = 0b00,
    Two = 0b01,
    Three = 0b10,
    Four = 0b11,
}

impl FaultQueue {
    const fn from_bits(bits: u8) -> Self {
        match bits {
            0b00 => Self::One,
            0b01 => Self::Two,
            0b10 => Self::Three,
            _ => Self::Four,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    const fn from_bit(set: bool) -> Self {
        if set {
            Self::ActiveHigh
        } else {
            Self::ActiveLow
        }
    }
}

/// Behaviour of the INT and CT outputs
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
    /// INT latches until the status register is read
    #[default]
    Interrupt,
    /// INT follows the temperature against the limits and hysteresis
    Comparator,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperationMode {
    /// Back-to-back conversions
    #[default]
    Continuous = 0b00,
    /// Single conversion, then shutdown
    OneShot = 0b01,
    /// One conversion per second
    Sps1 = 0b10,
    Shutdown = 0b11,
}

impl OperationMode {
    const fn from_bits(bits: u8) -> Self {
        match bits {
            0b00 => Self::Continuous,
            0b01 => Self::OneShot,
            0b10 => Self::Sps1,
            _ => Self::Shutdown,
        }
    }
}

/// Width of the temperature code.
///
/// Both resolutions are reported on the same 1/128 °C scale; in 13-bit mode the three low
/// bits of the code are not significant.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 0.0625 °C steps
    #[default]
    Bits13,
    /// 0.0078125 °C steps
    Bits16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_default_is_zero() {
        assert_eq!(Config::new().to_register(), 0x00);
        assert_eq!(Config::from_register(0x00), Config::default());
    }

    #[test]
    fn sixteen_bit_resolution() {
        let config = Config::new().with_resolution(Resolution::Bits16);
        assert_eq!(config.to_register(), 0x80);
        assert_eq!(Config::from_register(0x80).resolution, Resolution::Bits16);
    }

    #[test]
    fn field_positions() {
        assert_eq!(Config::new().with_fault_queue(FaultQueue::Four).to_register(), 0x03);
        assert_eq!(Config::new().with_ct_polarity(Polarity::ActiveHigh).to_register(), 0x04);
        assert_eq!(Config::new().with_int_polarity(Polarity::ActiveHigh).to_register(), 0x08);
        assert_eq!(
            Config::new().with_interrupt_mode(InterruptMode::Comparator).to_register(),
            0x10
        );
        assert_eq!(
            Config::new().with_operation_mode(OperationMode::OneShot).to_register(),
            0x20
        );
        assert_eq!(
            Config::new().with_operation_mode(OperationMode::Shutdown).to_register(),
            0x60
        );
    }

    #[test]
    fn every_register_value_decodes_losslessly() {
        for reg in 0..=u8::MAX {
            assert_eq!(Config::from_register(reg).to_register(), reg);
        }
    }
}
