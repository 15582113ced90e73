//! Child platform devices published on the bus.

use hikey_driver_api::{DriverError, PlatformBus, PlatformDeviceDesc};

/// Adds every device in `devices` to `bus`.
///
/// A failing device does not stop the rest from being added.
///
/// # Errors
///
/// Returns the first failure after all devices have been attempted.
pub fn add_devices(bus: &dyn PlatformBus, devices: &[PlatformDeviceDesc]) -> Result<(), DriverError> {
    let mut first_err = None;
    for dev in devices {
        match bus.device_add(dev) {
            Ok(()) => log::debug!("hikey960: added {} (did {})", dev.name, dev.did),
            Err(e) => {
                log::error!("hikey960: could not add {}: {e}", dev.name);
                first_err.get_or_insert(e);
            }
        }
    }
    first_err.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HIKEY960;
    use crate::testing::FakeBus;

    #[test]
    fn adds_all_devices() {
        let bus = FakeBus::new();
        add_devices(&*bus, HIKEY960.devices).unwrap();
        assert_eq!(bus.devices(), ["dwc3", "ufs"]);
    }

    #[test]
    fn failure_does_not_stop_later_devices() {
        let bus = FakeBus::new();
        bus.fail_device("dwc3");
        assert_eq!(
            add_devices(&*bus, HIKEY960.devices),
            Err(DriverError::NotFound)
        );
        assert_eq!(bus.devices(), ["ufs"]);
    }
}
