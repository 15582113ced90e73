//! The HiKey960 board driver.
//!
//! Binding maps the board-level register windows, registers the board with
//! its parent as a non-bindable aggregate, publishes the board's
//! capabilities on the platform bus, discovers the GPIO banks, adds the
//! child devices and brings up USB. Everything acquired is owned by the
//! [`BoardDriver`] and released when the last handle to it is dropped.

use alloc::sync::{Arc, Weak};

use hikey_driver_api::{
    Capability, DeviceAddArgs, DeviceAddFlags, DeviceOps, DriverError, ParentDevice, PlatformBus,
    ProtocolProvider, UsbMode, UsbModeSwitchProtocol,
};

use crate::config::BoardConfig;
use crate::devices;
use crate::pl061::Pl061;
use crate::protocol::{GpioRouter, ProtocolDispatcher};
use crate::registry::{ControllerRegistry, GpioBank};
use crate::resource::{RegionSet, ResourceManager};
use crate::usb::Hikey960Usb;

/// A bound board.
pub struct BoardDriver {
    config: &'static BoardConfig,
    bus: Arc<dyn PlatformBus>,
    /// Board-level windows, indexed by [`BoardRegion`](crate::config::BoardRegion).
    regions: RegionSet,
    gpio: GpioRouter,
    usb: Hikey960Usb,
}

impl BoardDriver {
    /// Binds the board described by `config` under `parent`.
    ///
    /// Only a missing platform bus, a window mapping failure and rejection
    /// by the parent fail the bind; everything acquired up to that point is
    /// released first. Failures in GPIO discovery, child device creation
    /// and USB bring-up are logged and leave the board bound.
    ///
    /// # Errors
    ///
    /// - [`DriverError::Unsupported`] if the parent has no platform bus.
    /// - [`DriverError::ResourceMappingFailed`] if a board window fails to map.
    /// - The parent's error if it refuses the device.
    pub fn bind(
        parent: &dyn ParentDevice,
        config: &'static BoardConfig,
    ) -> Result<Arc<Self>, DriverError> {
        let bus = parent.platform_bus().map_err(|e| {
            log::error!("{}: parent has no platform bus: {e}", config.name);
            DriverError::Unsupported
        })?;

        let regions = ResourceManager::new(bus.mmio()).acquire_all(config.board_regions)?;

        let board = Arc::new(Self {
            config,
            bus: bus.clone(),
            regions,
            gpio: GpioRouter::new(),
            usb: Hikey960Usb::new(bus, config.usb_lines),
        });

        // Dropping `board` on failure releases the windows.
        parent
            .add_device(DeviceAddArgs {
                name: config.name,
                flags: DeviceAddFlags::NON_BINDABLE,
                ops: board.clone(),
            })
            .inspect_err(|e| log::error!("{}: add_device failed: {e}", config.name))?;

        let provider: Weak<Self> = Arc::downgrade(&board);
        board.bus.set_interface(provider);

        board.gpio.publish(board.discover_gpio_banks());

        if let Err(e) = devices::add_devices(&*board.bus, config.devices) {
            log::error!("{}: child device setup incomplete: {e}", config.name);
        }

        if let Err(e) = board.usb.init(board.regions.as_slice()) {
            log::error!("{}: USB init failed: {e}", config.name);
        }
        if let Err(e) = board.usb.set_mode(UsbMode::None) {
            log::error!("{}: could not park USB lines: {e}", config.name);
        }

        log::info!(
            "{}: bound ({} GPIO banks)",
            config.name,
            board.gpio.registry().map_or(0, ControllerRegistry::len)
        );
        Ok(board)
    }

    /// Maps each configured GPIO bank. A bank that cannot be mapped is
    /// left out.
    fn discover_gpio_banks(&self) -> ControllerRegistry {
        let rm = ResourceManager::new(self.bus.mmio());
        let mut registry = ControllerRegistry::new();

        for spec in self.config.gpio_banks {
            if !Pl061::window_fits(spec.count, spec.region.size) {
                log::error!(
                    "{}: {} too small for {} lines, skipped",
                    self.config.name,
                    spec.region,
                    spec.count
                );
                continue;
            }
            match rm.acquire(&spec.region) {
                Ok(region) => registry.register(GpioBank {
                    start: spec.start,
                    count: spec.count,
                    controller: Pl061::new(region, spec.count),
                }),
                Err(e) => log::error!("{}: GPIO bank {} skipped: {e}", self.config.name, spec.region),
            }
        }
        registry
    }

    /// Returns the board configuration.
    #[must_use]
    pub fn config(&self) -> &'static BoardConfig {
        self.config
    }

    /// Returns the board's GPIO capability.
    #[must_use]
    pub fn gpio(&self) -> &GpioRouter {
        &self.gpio
    }

    /// Returns the current USB role.
    #[must_use]
    pub fn usb_mode(&self) -> UsbMode {
        self.usb.mode()
    }
}

impl ProtocolProvider for BoardDriver {
    fn get_protocol(&self, id: u32) -> Result<Capability<'_>, DriverError> {
        ProtocolDispatcher::new(&self.gpio, &self.usb).get_protocol(id)
    }
}

impl DeviceOps for BoardDriver {
    fn release(self: Arc<Self>) {
        log::debug!("{}: released by parent", self.config.name);
    }
}

impl Drop for BoardDriver {
    fn drop(&mut self) {
        let rm = ResourceManager::new(self.bus.mmio());
        if let Some(registry) = self.gpio.registry_mut() {
            for bank in registry.drain() {
                rm.release(bank.into_region());
            }
        }
        rm.release_all(&mut self.regions);
        log::debug!("{}: resources released", self.config.name);
    }
}
