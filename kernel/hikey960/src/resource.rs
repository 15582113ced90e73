//! All-or-nothing acquisition of register windows.
//!
//! [`ResourceManager`] maps a fixed list of [`RegionSpec`]s through the
//! platform's [`MmioMapper`]. Acquisition is scoped: every window mapped so
//! far is held by an [`Acquisition`] guard, and any early exit unmaps
//! exactly those windows before the error reaches the caller.

use hikey_driver_api::{DriverError, MmioMapper, MmioRegion, RegionSpec};
use planck_noalloc::vec::ArrayVec;

/// Maximum number of board-level windows acquired as one set.
pub const MAX_BOARD_REGIONS: usize = 4;

/// A set of windows acquired together.
pub type RegionSet = ArrayVec<MmioRegion, MAX_BOARD_REGIONS>;

/// Maps and unmaps register windows through the platform mapper.
#[derive(Clone, Copy)]
pub struct ResourceManager<'a> {
    mapper: &'a dyn MmioMapper,
}

impl<'a> ResourceManager<'a> {
    /// Creates a resource manager over the given mapping facility.
    #[must_use]
    pub fn new(mapper: &'a dyn MmioMapper) -> Self {
        Self { mapper }
    }

    /// Maps every descriptor in `specs`, in order.
    ///
    /// Either all windows are returned live, or none remain mapped.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidArgument`] if `specs` exceeds
    /// [`MAX_BOARD_REGIONS`] (nothing is mapped), or
    /// [`DriverError::ResourceMappingFailed`] if any window fails to map.
    pub fn acquire_all(&self, specs: &[RegionSpec]) -> Result<RegionSet, DriverError> {
        if specs.len() > MAX_BOARD_REGIONS {
            log::error!(
                "resource: {} regions requested, capacity is {}",
                specs.len(),
                MAX_BOARD_REGIONS
            );
            return Err(DriverError::InvalidArgument);
        }

        let mut acquisition = Acquisition::new(self.mapper);
        for spec in specs {
            acquisition.push(self.acquire(spec)?);
        }
        Ok(acquisition.commit())
    }

    /// Maps a single window.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::ResourceMappingFailed`] if the mapper fails.
    pub fn acquire(&self, spec: &RegionSpec) -> Result<MmioRegion, DriverError> {
        let region = self.mapper.map_mmio(spec).map_err(|e| {
            log::error!("resource: failed to map {spec}: {e}");
            DriverError::ResourceMappingFailed
        })?;
        log::debug!("resource: mapped {spec} at {:#x}", region.virt_base());
        Ok(region)
    }

    /// Unmaps a single window.
    pub fn release(&self, region: MmioRegion) {
        log::debug!("resource: unmapping {:#x}", region.phys_base());
        self.mapper.unmap_mmio(region);
    }

    /// Unmaps every window in `regions`, most recently acquired first, and
    /// leaves the set empty. A second call is a no-op.
    pub fn release_all(&self, regions: &mut RegionSet) {
        while let Some(region) = regions.pop() {
            self.release(region);
        }
    }
}

/// Windows mapped so far by an in-progress [`ResourceManager::acquire_all`].
///
/// Dropping the guard without [`commit`](Self::commit) unmaps them.
struct Acquisition<'a> {
    mapper: &'a dyn MmioMapper,
    regions: RegionSet,
}

impl<'a> Acquisition<'a> {
    fn new(mapper: &'a dyn MmioMapper) -> Self {
        Self {
            mapper,
            regions: RegionSet::new(),
        }
    }

    fn push(&mut self, region: MmioRegion) {
        // Capacity was checked against the descriptor count up front.
        self.regions.push(region);
    }

    fn commit(mut self) -> RegionSet {
        core::mem::take(&mut self.regions)
    }
}

impl Drop for Acquisition<'_> {
    fn drop(&mut self) {
        if !self.regions.is_empty() {
            log::warn!(
                "resource: rolling back {} partially acquired regions",
                self.regions.len()
            );
        }
        ResourceManager::new(self.mapper).release_all(&mut self.regions);
    }
}
