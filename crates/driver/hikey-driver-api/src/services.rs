//! Kernel service contracts for drivers.
//!
//! Board drivers use [`MmioMapper`] to turn board-fixed [`RegionSpec`]s into
//! live [`MmioRegion`]s without depending on the kernel's VMM directly.

use crate::error::DriverError;
use crate::resource::{MmioRegion, RegionSpec};

/// The platform's physical-memory mapping facility.
///
/// Implemented by the kernel (backed by the root resource) and handed to
/// board drivers through their [`PlatformBus`](crate::bus::PlatformBus).
pub trait MmioMapper: Send + Sync {
    /// Maps the physical window described by `spec` into kernel virtual
    /// address space with the requested cache policy.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] if the window cannot be mapped.
    fn map_mmio(&self, spec: &RegionSpec) -> Result<MmioRegion, DriverError>;

    /// Unmaps a region previously returned by [`map_mmio`](Self::map_mmio).
    ///
    /// Consumes the region, so each mapping is released at most once.
    fn unmap_mmio(&self, region: MmioRegion);
}
