//! Host-side fakes for the parent bus manager.
//!
//! [`FakeMapper`] backs every mapping with a zeroed heap allocation so that
//! controller code can read and write real memory. [`FakeBus`] and
//! [`FakeParent`] record everything the board driver publishes.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

use hikey_driver_api::{
    CachePolicy, DeviceAddArgs, DriverError, MmioMapper, MmioRegion, ParentDevice,
    PlatformBus, PlatformDeviceDesc, ProtocolProvider, RegionSpec,
};

/// One call observed by a [`FakeMapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    Map(u64),
    Unmap(u64),
}

#[derive(Default)]
struct MapperState {
    events: Vec<MapEvent>,
    fail_on: Vec<u64>,
    backing: BTreeMap<u64, Box<[u32]>>,
}

/// Heap-backed [`MmioMapper`].
#[derive(Default)]
pub struct FakeMapper {
    state: Mutex<MapperState>,
}

impl FakeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later mapping of `phys` fail.
    pub fn fail_on(&self, phys: u64) {
        self.state.lock().unwrap().fail_on.push(phys);
    }

    pub fn events(&self) -> Vec<MapEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn unmap_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, MapEvent::Unmap(_)))
            .count()
    }

    /// Number of windows currently mapped.
    pub fn live(&self) -> usize {
        self.state.lock().unwrap().backing.len()
    }

    /// Reads the 32-bit word at `offset` of the live window at `phys`.
    pub fn peek(&self, phys: u64, offset: u64) -> u32 {
        let state = self.state.lock().unwrap();
        state.backing[&phys][(offset / 4) as usize]
    }
}

impl MmioMapper for FakeMapper {
    fn map_mmio(&self, spec: &RegionSpec) -> Result<MmioRegion, DriverError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_on.contains(&spec.phys_base) {
            return Err(DriverError::NoMemory);
        }
        assert!(
            !state.backing.contains_key(&spec.phys_base),
            "{spec} mapped twice"
        );
        state.events.push(MapEvent::Map(spec.phys_base));

        let mut words = vec![0u32; (spec.size / 4) as usize].into_boxed_slice();
        let virt = words.as_mut_ptr() as usize;
        state.backing.insert(spec.phys_base, words);
        // SAFETY: `virt` points to `spec.size` bytes owned by `backing` until
        // the region is unmapped.
        Ok(unsafe { MmioRegion::new(spec.phys_base, virt, spec.size, spec.cache) })
    }

    fn unmap_mmio(&self, region: MmioRegion) {
        let mut state = self.state.lock().unwrap();
        let phys = region.phys_base();
        assert!(
            state.backing.remove(&phys).is_some(),
            "unmap of {phys:#x} which is not mapped"
        );
        state.events.push(MapEvent::Unmap(phys));
    }
}

/// Maps a zeroed heap window of `size` bytes that is never unmapped.
///
/// For controller unit tests that do not go through a mapper.
pub fn leaked_region(phys: u64, size: u64) -> MmioRegion {
    let words: &'static mut [u32] = Vec::leak(vec![0u32; (size / 4) as usize]);
    // SAFETY: the allocation is leaked and lives for the rest of the test.
    unsafe { MmioRegion::new(phys, words.as_mut_ptr() as usize, size, CachePolicy::UncachedDevice) }
}

// ---------------------------------------------------------------------------
// Bus and parent
// ---------------------------------------------------------------------------

/// [`PlatformBus`] that records published devices and the registered
/// interface.
#[derive(Default)]
pub struct FakeBus {
    pub mapper: FakeMapper,
    interface: Mutex<Option<Weak<dyn ProtocolProvider>>>,
    devices: Mutex<Vec<&'static str>>,
    fail_device: Mutex<Option<&'static str>>,
}

impl FakeBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes [`PlatformBus::device_add`] fail for the named device.
    pub fn fail_device(&self, name: &'static str) {
        *self.fail_device.lock().unwrap() = Some(name);
    }

    pub fn devices(&self) -> Vec<&'static str> {
        self.devices.lock().unwrap().clone()
    }

    pub fn has_interface(&self) -> bool {
        self.interface.lock().unwrap().is_some()
    }
}

impl PlatformBus for FakeBus {
    fn mmio(&self) -> &dyn MmioMapper {
        &self.mapper
    }

    fn set_interface(&self, provider: Weak<dyn ProtocolProvider>) {
        *self.interface.lock().unwrap() = Some(provider);
    }

    fn interface(&self) -> Option<Arc<dyn ProtocolProvider>> {
        self.interface.lock().unwrap().as_ref()?.upgrade()
    }

    fn device_add(&self, device: &PlatformDeviceDesc) -> Result<(), DriverError> {
        if *self.fail_device.lock().unwrap() == Some(device.name) {
            return Err(DriverError::NotFound);
        }
        self.devices.lock().unwrap().push(device.name);
        Ok(())
    }
}

/// [`ParentDevice`] that hands out a [`FakeBus`] and keeps added children.
pub struct FakeParent {
    pub bus: Option<Arc<FakeBus>>,
    pub reject_add: bool,
    children: Mutex<Vec<DeviceAddArgs>>,
}

impl FakeParent {
    pub fn new() -> Self {
        Self {
            bus: Some(FakeBus::new()),
            reject_add: false,
            children: Mutex::new(Vec::new()),
        }
    }

    /// A parent that refuses every device.
    pub fn rejecting() -> Self {
        Self {
            reject_add: true,
            ..Self::new()
        }
    }

    /// A parent that offers no platform bus.
    pub fn without_bus() -> Self {
        Self {
            bus: None,
            ..Self::new()
        }
    }

    pub fn bus(&self) -> &Arc<FakeBus> {
        self.bus.as_ref().unwrap()
    }

    pub fn child_names(&self) -> Vec<&'static str> {
        self.children.lock().unwrap().iter().map(|c| c.name).collect()
    }

    /// Removes every child and invokes its release hook.
    pub fn remove_all(&self) {
        let children: Vec<_> = self.children.lock().unwrap().drain(..).collect();
        for child in children {
            child.ops.release();
        }
    }
}

impl ParentDevice for FakeParent {
    fn platform_bus(&self) -> Result<Arc<dyn PlatformBus>, DriverError> {
        match &self.bus {
            Some(bus) => Ok(Arc::clone(bus) as Arc<dyn PlatformBus>),
            None => Err(DriverError::NotFound),
        }
    }

    fn add_device(&self, args: DeviceAddArgs) -> Result<(), DriverError> {
        if self.reject_add {
            return Err(DriverError::NoMemory);
        }
        self.children.lock().unwrap().push(args);
        Ok(())
    }
}
