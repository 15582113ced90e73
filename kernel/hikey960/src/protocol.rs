//! Capabilities the board exposes to its children.

use hikey_driver_api::{
    Capability, DriverError, GpioFlags, GpioProtocol, ProtocolId, UsbModeSwitchProtocol,
};
use spin::Once;

use crate::registry::{ControllerRegistry, GpioBank};

// ---------------------------------------------------------------------------
// GPIO
// ---------------------------------------------------------------------------

/// Board-wide GPIO capability routing logical indices to PL061 banks.
///
/// The registry is published once during bind and read-only afterwards, so
/// lookups take no lock.
#[derive(Debug)]
pub struct GpioRouter {
    registry: Once<ControllerRegistry>,
}

impl GpioRouter {
    /// Creates a router with no banks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registry: Once::new(),
        }
    }

    /// Publishes the bank set. Only the first call has any effect.
    pub fn publish(&self, registry: ControllerRegistry) {
        self.registry.call_once(|| registry);
    }

    /// Returns the published registry, if any.
    #[must_use]
    pub fn registry(&self) -> Option<&ControllerRegistry> {
        self.registry.get()
    }

    /// Mutable access for teardown.
    pub fn registry_mut(&mut self) -> Option<&mut ControllerRegistry> {
        self.registry.get_mut()
    }

    fn route(&self, index: u32) -> Result<&GpioBank, DriverError> {
        self.registry
            .get()
            .and_then(|r| r.lookup(index))
            .ok_or(DriverError::InvalidArgument)
    }
}

impl Default for GpioRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioProtocol for GpioRouter {
    fn config(&self, index: u32, flags: GpioFlags) -> Result<(), DriverError> {
        let bank = self.route(index)?;
        bank.controller.config(bank.line(index), flags)
    }

    fn read(&self, index: u32) -> Result<u8, DriverError> {
        let bank = self.route(index)?;
        bank.controller.read(bank.line(index))
    }

    fn write(&self, index: u32, value: u8) -> Result<(), DriverError> {
        let bank = self.route(index)?;
        bank.controller.write(bank.line(index), value)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Maps numeric protocol ids to the board's capability implementations.
#[derive(Clone, Copy)]
pub struct ProtocolDispatcher<'a> {
    gpio: &'a dyn GpioProtocol,
    usb: &'a dyn UsbModeSwitchProtocol,
}

impl<'a> ProtocolDispatcher<'a> {
    /// Creates a dispatcher over the given implementations.
    #[must_use]
    pub fn new(gpio: &'a dyn GpioProtocol, usb: &'a dyn UsbModeSwitchProtocol) -> Self {
        Self { gpio, usb }
    }

    /// Returns the capability for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Unsupported`] for any id other than GPIO and
    /// USB mode switch, including ids this board consumes but does not
    /// provide.
    pub fn get_protocol(&self, id: u32) -> Result<Capability<'a>, DriverError> {
        match ProtocolId::from_raw(id) {
            Some(ProtocolId::Gpio) => Ok(Capability::Gpio(self.gpio)),
            Some(ProtocolId::UsbModeSwitch) => Ok(Capability::UsbModeSwitch(self.usb)),
            Some(ProtocolId::PlatformBus) | None => {
                log::trace!("hikey960: protocol {id:#010x} not provided");
                Err(DriverError::Unsupported)
            }
        }
    }
}
