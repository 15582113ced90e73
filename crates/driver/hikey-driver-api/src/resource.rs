//! Hardware resource types: memory-mapped register windows and the
//! descriptors they are mapped from.

use core::fmt;

/// Cache policy applied to a physical mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Normal cached memory.
    Cached,
    /// Uncached memory.
    Uncached,
    /// Uncached device memory (strongly ordered, no gathering). Register
    /// windows use this.
    UncachedDevice,
    /// Write-combining memory.
    WriteCombining,
}

/// A board-fixed descriptor for a physical register window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpec {
    /// Short name of the window (for logging).
    pub name: &'static str,
    /// Physical base address.
    pub phys_base: u64,
    /// Length of the window in bytes.
    pub size: u64,
    /// Cache policy of the mapping.
    pub cache: CachePolicy,
}

impl RegionSpec {
    /// Creates a descriptor for an uncached device register window.
    #[must_use]
    pub const fn device(name: &'static str, phys_base: u64, size: u64) -> Self {
        Self {
            name,
            phys_base,
            size,
            cache: CachePolicy::UncachedDevice,
        }
    }

    /// Returns the first physical address past the end of the window.
    #[must_use]
    pub const fn phys_end(&self) -> u64 {
        self.phys_base + self.size
    }
}

impl fmt::Display for RegionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:#x}..{:#x})",
            self.name,
            self.phys_base,
            self.phys_end()
        )
    }
}

/// An exclusive claim on a mapped memory-mapped I/O region.
///
/// Deliberately neither `Clone` nor `Copy`: unmapping consumes the region,
/// so a window cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
pub struct MmioRegion {
    phys_base: u64,
    virt_base: usize,
    size: u64,
    cache: CachePolicy,
}

impl MmioRegion {
    /// Creates a new MMIO region descriptor.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    /// - `virt_base` maps `[phys_base, phys_base + size)` with the given cache policy.
    /// - The region is not claimed by another driver.
    /// - The virtual mapping stays valid until the region is handed back to
    ///   the mapper that created it.
    #[must_use]
    pub const unsafe fn new(phys_base: u64, virt_base: usize, size: u64, cache: CachePolicy) -> Self {
        Self {
            phys_base,
            virt_base,
            size,
            cache,
        }
    }

    /// Returns the physical base address.
    #[must_use]
    pub const fn phys_base(&self) -> u64 {
        self.phys_base
    }

    /// Returns the virtual base address.
    #[must_use]
    pub const fn virt_base(&self) -> usize {
        self.virt_base
    }

    /// Returns the size of the region in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the cache policy of the mapping.
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache
    }

    /// Returns a pointer to the given byte offset within the region.
    ///
    /// Returns `None` if the offset is out of bounds.
    #[must_use]
    pub const fn ptr_at(&self, offset: u64) -> Option<*mut u8> {
        if offset < self.size {
            Some((self.virt_base + offset as usize) as *mut u8)
        } else {
            None
        }
    }

    /// Reads the 32-bit register at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is misaligned or the register lies outside the region.
    #[must_use]
    pub fn read32(&self, offset: u64) -> u32 {
        let ptr = self.reg32(offset);
        // SAFETY: `reg32` checked alignment and bounds; the mapping is valid
        // for the lifetime of `self` per the constructor contract.
        unsafe { core::ptr::read_volatile(ptr) }
    }

    /// Writes the 32-bit register at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is misaligned or the register lies outside the region.
    pub fn write32(&self, offset: u64, value: u32) {
        let ptr = self.reg32(offset);
        // SAFETY: `reg32` checked alignment and bounds; the mapping is valid
        // for the lifetime of `self` per the constructor contract.
        unsafe { core::ptr::write_volatile(ptr, value) }
    }

    /// Read-modify-write: clears `clear`, then sets `set`.
    ///
    /// Not atomic with respect to other writers; callers serialize.
    pub fn modify32(&self, offset: u64, clear: u32, set: u32) {
        let value = (self.read32(offset) & !clear) | set;
        self.write32(offset, value);
    }

    fn reg32(&self, offset: u64) -> *mut u32 {
        assert!(offset % 4 == 0, "misaligned MMIO register offset {offset:#x}");
        assert!(
            offset + 4 <= self.size,
            "MMIO register offset {offset:#x} outside region of {:#x} bytes",
            self.size
        );
        (self.virt_base + offset as usize) as *mut u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_spec_device_policy() {
        let spec = RegionSpec::device("pctrl", 0xE8A0_9000, 0x1000);
        assert_eq!(spec.cache, CachePolicy::UncachedDevice);
        assert_eq!(spec.phys_end(), 0xE8A0_A000);
    }

    #[test]
    fn region_spec_display() {
        let spec = RegionSpec::device("pctrl", 0xE8A0_9000, 0x1000);
        assert_eq!(format!("{spec}"), "pctrl [0xe8a09000..0xe8a0a000)");
    }

    #[test]
    fn mmio_region_basics() {
        // SAFETY: test-only, never dereferenced.
        let region = unsafe { MmioRegion::new(0x1000, 0x1000, 4096, CachePolicy::Uncached) };
        assert_eq!(region.phys_base(), 0x1000);
        assert_eq!(region.virt_base(), 0x1000);
        assert_eq!(region.size(), 4096);
        assert_eq!(region.cache_policy(), CachePolicy::Uncached);
    }

    #[test]
    fn mmio_region_ptr_at() {
        // SAFETY: test-only, never dereferenced.
        let region = unsafe { MmioRegion::new(0x1000, 0x1000, 4096, CachePolicy::Uncached) };
        assert!(region.ptr_at(0).is_some());
        assert!(region.ptr_at(4095).is_some());
        assert!(region.ptr_at(4096).is_none());
    }

    #[test]
    fn mmio_region_register_access() {
        let mut backing = [0u32; 4];
        let virt = backing.as_mut_ptr() as usize;
        // SAFETY: `backing` outlives `region` and is 16 bytes long.
        let region = unsafe { MmioRegion::new(0, virt, 16, CachePolicy::UncachedDevice) };

        region.write32(4, 0xDEAD_BEEF);
        assert_eq!(region.read32(4), 0xDEAD_BEEF);

        region.modify32(4, 0xFFFF_0000, 0x0001_0000);
        assert_eq!(region.read32(4), 0x0001_BEEF);
        assert_eq!(region.read32(0), 0);
    }

    #[test]
    #[should_panic(expected = "outside region")]
    fn mmio_region_out_of_bounds_panics() {
        let mut backing = [0u32; 1];
        let virt = backing.as_mut_ptr() as usize;
        // SAFETY: `backing` outlives `region` and is 4 bytes long.
        let region = unsafe { MmioRegion::new(0, virt, 4, CachePolicy::UncachedDevice) };
        let _ = region.read32(4);
    }
}
