//! Logging shims.
//!
//! Forward to `defmt` when the `defmt` feature is enabled and expand to nothing otherwise, so
//! the driver can be built for targets without a global logger.

#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
    };
}
