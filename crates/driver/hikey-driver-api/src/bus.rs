//! Parent-facing traits: how a board driver is bound, published, and how it
//! publishes its own child devices.
//!
//! The parent bus manager hands a board driver a [`ParentDevice`] at bind
//! time. The board fetches the [`PlatformBus`] from it, adds itself as a
//! device (the parent takes ownership through [`DeviceOps`]), and installs a
//! [`ProtocolProvider`] back-reference so later capability queries route to
//! the board.

use alloc::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::error::DriverError;
use crate::protocol::ProtocolProvider;
use crate::resource::RegionSpec;
use crate::services::MmioMapper;

bitflags! {
    /// Flags for [`ParentDevice::add_device`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeviceAddFlags: u32 {
        /// No driver may bind to this device; it only hosts capabilities.
        const NON_BINDABLE = 1 << 0;
        /// The device is hidden from enumeration until made visible.
        const INVISIBLE    = 1 << 1;
    }
}

/// Lifecycle hooks the parent calls on a device it owns.
pub trait DeviceOps: Send + Sync {
    /// Called once when the parent removes the device; consumes the
    /// parent's handle.
    fn release(self: Arc<Self>);
}

/// Arguments for [`ParentDevice::add_device`].
pub struct DeviceAddArgs {
    /// Device name.
    pub name: &'static str,
    /// Binding and visibility flags.
    pub flags: DeviceAddFlags,
    /// The device; the parent keeps this handle until it releases it.
    pub ops: Arc<dyn DeviceOps>,
}

/// The device a board driver is bound to.
pub trait ParentDevice {
    /// Returns the platform-bus capability of this parent.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Unsupported`] if the parent is not a platform bus.
    fn platform_bus(&self) -> Result<Arc<dyn PlatformBus>, DriverError>;

    /// Publishes a device under this parent.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the device could not be added; the parent
    /// then holds no handle to it.
    fn add_device(&self, args: DeviceAddArgs) -> Result<(), DriverError>;
}

/// A platform device a board publishes on its bus.
#[derive(Debug, Clone, Copy)]
pub struct PlatformDeviceDesc {
    /// Device name.
    pub name: &'static str,
    /// Vendor id used for driver matching.
    pub vid: u32,
    /// Product id used for driver matching.
    pub pid: u32,
    /// Device id used for driver matching.
    pub did: u32,
    /// Register windows the device's driver may map.
    pub mmios: &'static [RegionSpec],
    /// Interrupt lines routed to the device.
    pub irqs: &'static [u32],
}

/// The platform bus a board driver registers with.
pub trait PlatformBus: Send + Sync {
    /// Returns the physical-memory mapping facility.
    fn mmio(&self) -> &dyn MmioMapper;

    /// Installs the board's capability provider.
    ///
    /// The bus keeps only a weak reference; the board's lifetime is owned
    /// by the parent device.
    fn set_interface(&self, provider: Weak<dyn ProtocolProvider>);

    /// Returns the installed capability provider, if it is still alive.
    fn interface(&self) -> Option<Arc<dyn ProtocolProvider>>;

    /// Publishes a child platform device.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the device could not be added.
    fn device_add(&self, device: &PlatformDeviceDesc) -> Result<(), DriverError>;
}
