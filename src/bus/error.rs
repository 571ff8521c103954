use core::fmt;

pub type Result<T, E> = core::result::Result<T, Error<E>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Register payloads are one or two bytes wide; the requested width was neither.
    InvalidSize(u8),

    /// A value does not fit the register it was meant for.
    OutOfRange,

    /// The ID register did not hold the ADT7320 identifier.
    UnexpectedId(u8),

    /// The bus is held by another transfer.
    Busy,

    /// The bus did not finish the exchange in time.
    Timeout,

    /// Bus or chip-select error
    Bus(E),
}

impl<E> Error<E> {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::InvalidSize(_) => "Invalid register size",
            Error::OutOfRange => "Value out of range",
            Error::UnexpectedId(_) => "Unexpected device ID",
            Error::Busy => "Busy",
            Error::Timeout => "Timeout",
            Error::Bus(_) => "Bus error",
        }
    }

    /// Collapses the error into its host-facing result code.
    ///
    /// Argument errors and bus faults are not distinguished: both are [`Status::Error`].
    pub const fn status(&self) -> Status {
        match self {
            Error::Busy => Status::Busy,
            Error::Timeout => Status::Timeout,
            Error::InvalidSize(_) | Error::OutOfRange | Error::UnexpectedId(_) | Error::Bus(_) => {
                Status::Error
            }
        }
    }
}

impl<E> From<E> for Error<E> {
    fn from(value: E) -> Self {
        Self::Bus(value)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSize(size) => write!(f, "{} ({size})", self.as_str()),
            Error::UnexpectedId(id) => write!(f, "{} ({id:#04X})", self.as_str()),
            Error::Bus(e) => write!(f, "{}: {e:?}", self.as_str()),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Outcome of a driver operation, as a small closed set of codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    Error = 1,
    Busy = 2,
    Timeout = 3,
}

impl Status {
    /// Returns the result code of `result`.
    pub const fn of<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => e.status(),
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

static_assertions::assert_eq_size!(Status, u8);
