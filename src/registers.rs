//! Register map and command framing.
//!
//! Every register transaction starts with a command byte: bit 6 selects the direction and
//! bits 7:3 carry the register address. The payload follows big-endian in the same
//! chip-select window.

use crate::bus::{Error, Result};

/// Bytes clocked out with chip-select held to reset the serial interface.
pub const RESET_SEQUENCE: [u8; 4] = [0xFF; 4];

/// Filler clocked out while a register read shifts its contents back.
pub const DUMMY: u8 = 0x00;

/// Contents of [`Register::Id`]: manufacturer ID `0b11000`, silicon revision `0b011`.
pub const DEVICE_ID: u8 = 0xC3;

/// Power-on value of [`Register::TCrit`] (147 °C)
pub const DEFAULT_TCRIT: u16 = 0x4980;
/// Power-on value of [`Register::THyst`] (5 °C)
pub const DEFAULT_THYST: u8 = 0x05;
/// Power-on value of [`Register::THigh`] (64 °C)
pub const DEFAULT_THIGH: u16 = 0x2000;
/// Power-on value of [`Register::TLow`] (10 °C)
pub const DEFAULT_TLOW: u16 = 0x0500;

const ADDRESS_MASK: u8 = 0x1F;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Status = 0x00,
    Config = 0x01,
    Temperature = 0x02,
    Id = 0x03,
    TCrit = 0x04,
    THyst = 0x05,
    THigh = 0x06,
    TLow = 0x07,
}

impl Register {
    pub const ALL: [Self; 8] = [
        Self::Status,
        Self::Config,
        Self::Temperature,
        Self::Id,
        Self::TCrit,
        Self::THyst,
        Self::THigh,
        Self::TLow,
    ];

    #[inline]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Natural payload width of the register
    pub const fn width(self) -> Width {
        match self {
            Self::Status | Self::Config | Self::Id | Self::THyst => Width::One,
            Self::Temperature | Self::TCrit | Self::THigh | Self::TLow => Width::Two,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Read = 0x40,
    Write = 0x00,
}

/// Builds the command byte opening a transaction on register `addr`.
///
/// Only the low five bits of `addr` are used.
#[inline]
pub const fn command(direction: Direction, addr: u8) -> u8 {
    direction as u8 | ((addr & ADDRESS_MASK) << 3)
}

/// Width of a register payload on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Width {
    One,
    Two,
}

impl Width {
    /// Accepts a payload size of one or two bytes.
    pub const fn from_size<E>(size: u8) -> Result<Self, E> {
        match size {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(Error::InvalidSize(size)),
        }
    }

    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}
