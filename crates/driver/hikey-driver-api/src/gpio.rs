//! GPIO capability interface.

use bitflags::bitflags;

use crate::error::DriverError;

bitflags! {
    /// Line configuration flags for [`GpioProtocol::config`].
    ///
    /// The empty set is an edge-triggered input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GpioFlags: u32 {
        /// Drive the line as an output.
        const OUTPUT  = 1 << 0;
        /// Level-triggered interrupt (edge-triggered when clear).
        const LEVEL   = 1 << 1;
        /// Trigger on the rising edge.
        const RISING  = 1 << 2;
        /// Trigger on the falling edge.
        const FALLING = 1 << 3;

        /// Level trigger on high.
        const HIGH = Self::RISING.bits();
        /// Level trigger on low.
        const LOW  = Self::FALLING.bits();
    }
}

impl core::fmt::Display for GpioFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// GPIO operations over a flat, board-wide logical line index.
pub trait GpioProtocol: Send + Sync {
    /// Configures the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidArgument`] if no controller owns `index`.
    fn config(&self, index: u32, flags: GpioFlags) -> Result<(), DriverError>;

    /// Reads the line at `index`, returning 0 or 1.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidArgument`] if no controller owns `index`.
    fn read(&self, index: u32) -> Result<u8, DriverError>;

    /// Drives the line at `index` low (`0`) or high (any other value).
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidArgument`] if no controller owns `index`.
    fn write(&self, index: u32, value: u8) -> Result<(), DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_aliases() {
        assert_eq!(GpioFlags::HIGH, GpioFlags::RISING);
        assert_eq!(GpioFlags::LOW, GpioFlags::FALLING);
    }

    #[test]
    fn empty_is_input() {
        assert!(!GpioFlags::empty().contains(GpioFlags::OUTPUT));
    }

    #[test]
    fn display_flags() {
        let flags = GpioFlags::OUTPUT | GpioFlags::LEVEL;
        assert_eq!(format!("{flags}"), "OUTPUT | LEVEL");
    }
}
