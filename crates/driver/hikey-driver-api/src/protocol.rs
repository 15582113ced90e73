//! Capability identifiers and the tagged capability handed to consumers.
//!
//! A parent bus asks a board for a capability by numeric id; the board
//! answers with a [`Capability`] borrowing its own implementation of the
//! matching interface trait.

use core::fmt;

use crate::error::DriverError;
use crate::gpio::GpioProtocol;
use crate::usb::UsbModeSwitchProtocol;

/// Numeric protocol identifiers (four-character codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ProtocolId {
    /// Platform bus (`pPBU`), provided by the parent to board drivers.
    PlatformBus = 0x7050_4255,
    /// GPIO (`pGPO`).
    Gpio = 0x7047_504F,
    /// USB mode switch (`pUMS`).
    UsbModeSwitch = 0x7055_4D53,
}

impl ProtocolId {
    /// Returns the raw numeric id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Parses a raw numeric id, returning `None` for unknown ids.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0x7050_4255 => Some(Self::PlatformBus),
            0x7047_504F => Some(Self::Gpio),
            0x7055_4D53 => Some(Self::UsbModeSwitch),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.raw().to_be_bytes() {
            write!(f, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

/// A capability returned by value from [`ProtocolProvider::get_protocol`].
///
/// Borrows the provider's implementation; it is a back-reference, not an
/// ownership edge.
#[derive(Clone, Copy)]
pub enum Capability<'a> {
    /// GPIO operations.
    Gpio(&'a dyn GpioProtocol),
    /// USB mode-switch operations.
    UsbModeSwitch(&'a dyn UsbModeSwitchProtocol),
}

impl<'a> Capability<'a> {
    /// Returns the protocol id of this capability.
    #[must_use]
    pub fn id(&self) -> ProtocolId {
        match self {
            Self::Gpio(_) => ProtocolId::Gpio,
            Self::UsbModeSwitch(_) => ProtocolId::UsbModeSwitch,
        }
    }

    /// Returns the GPIO interface, if this is a GPIO capability.
    #[must_use]
    pub fn gpio(self) -> Option<&'a dyn GpioProtocol> {
        match self {
            Self::Gpio(gpio) => Some(gpio),
            Self::UsbModeSwitch(_) => None,
        }
    }

    /// Returns the USB mode-switch interface, if this is one.
    #[must_use]
    pub fn usb_mode_switch(self) -> Option<&'a dyn UsbModeSwitchProtocol> {
        match self {
            Self::UsbModeSwitch(usb) => Some(usb),
            Self::Gpio(_) => None,
        }
    }
}

impl fmt::Debug for Capability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capability").field(&self.id()).finish()
    }
}

/// Answers capability queries routed to a device by its parent.
pub trait ProtocolProvider: Send + Sync {
    /// Returns the capability registered under the raw protocol id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Unsupported`] for ids this provider does not
    /// implement.
    fn get_protocol(&self, id: u32) -> Result<Capability<'_>, DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_ids_roundtrip() {
        for id in [
            ProtocolId::PlatformBus,
            ProtocolId::Gpio,
            ProtocolId::UsbModeSwitch,
        ] {
            assert_eq!(ProtocolId::from_raw(id.raw()), Some(id));
        }
    }

    #[test]
    fn unknown_raw_id() {
        assert_eq!(ProtocolId::from_raw(0), None);
        assert_eq!(ProtocolId::from_raw(0x7055_4D54), None);
    }

    #[test]
    fn display_fourcc() {
        assert_eq!(format!("{}", ProtocolId::Gpio), "pGPO");
        assert_eq!(format!("{}", ProtocolId::UsbModeSwitch), "pUMS");
        assert_eq!(format!("{}", ProtocolId::PlatformBus), "pPBU");
    }
}
