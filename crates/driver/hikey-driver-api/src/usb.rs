//! USB role-switch capability interface.

use core::fmt;

use crate::error::DriverError;

/// USB port role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UsbMode {
    /// Port disconnected from both host and peripheral controllers.
    None = 0,
    /// Host role.
    Host = 1,
    /// Peripheral (device) role.
    Peripheral = 2,
    /// Dual-role (on-the-go).
    Otg = 3,
}

impl fmt::Display for UsbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Host => f.write_str("host"),
            Self::Peripheral => f.write_str("peripheral"),
            Self::Otg => f.write_str("otg"),
        }
    }
}

/// USB mode-switch operations.
pub trait UsbModeSwitchProtocol: Send + Sync {
    /// Returns the role the port should start in.
    fn initial_mode(&self) -> UsbMode;

    /// Switches the port to `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Unsupported`] for modes the board cannot
    /// enter, or the hardware error if the switch fails.
    fn set_mode(&self, mode: UsbMode) -> Result<(), DriverError>;
}
