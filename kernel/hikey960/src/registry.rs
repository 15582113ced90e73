//! Routing of logical GPIO indices to the controller that owns them.
//!
//! The board exposes one flat GPIO index space. Each registered
//! [`GpioBank`] claims a contiguous range `[start, start + count)` of it;
//! ranges never overlap, so every index resolves to at most one bank.

use alloc::vec::Vec;

use hikey_driver_api::MmioRegion;

use crate::pl061::Pl061;

/// A controller and the logical range it serves.
#[derive(Debug)]
pub struct GpioBank {
    /// First logical index.
    pub start: u32,
    /// Number of lines.
    pub count: u32,
    /// The controller driving the lines.
    pub controller: Pl061,
}

impl GpioBank {
    /// Returns `true` if `index` falls inside this bank.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index - self.start < self.count
    }

    /// Returns `true` if this bank shares any index with `[start, start + count)`.
    #[must_use]
    pub fn overlaps(&self, start: u32, count: u32) -> bool {
        let end = u64::from(self.start) + u64::from(self.count);
        let other_end = u64::from(start) + u64::from(count);
        u64::from(self.start) < other_end && u64::from(start) < end
    }

    /// Returns the bank-relative line for logical `index`.
    #[must_use]
    pub fn line(&self, index: u32) -> u32 {
        index - self.start
    }

    /// Consumes the bank and returns its register window.
    #[must_use]
    pub fn into_region(self) -> MmioRegion {
        self.controller.into_region()
    }
}

/// Ordered set of GPIO banks.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    banks: Vec<GpioBank>,
}

impl ControllerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { banks: Vec::new() }
    }

    /// Adds a bank.
    ///
    /// The caller guarantees the bank's range is disjoint from every
    /// registered one.
    pub fn register(&mut self, bank: GpioBank) {
        debug_assert!(
            !self.banks.iter().any(|b| b.overlaps(bank.start, bank.count)),
            "GPIO bank [{}, {}) overlaps a registered bank",
            bank.start,
            u64::from(bank.start) + u64::from(bank.count)
        );
        log::trace!(
            "gpio: bank [{}, {}) registered",
            bank.start,
            u64::from(bank.start) + u64::from(bank.count)
        );
        self.banks.push(bank);
    }

    /// Returns the bank containing `index`, if any.
    #[must_use]
    pub fn lookup(&self, index: u32) -> Option<&GpioBank> {
        self.banks.iter().find(|b| b.contains(index))
    }

    /// Returns the number of registered banks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.banks.len()
    }

    /// Returns `true` if no bank is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Iterates banks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &GpioBank> {
        self.banks.iter()
    }

    /// Removes every bank, yielding them in registration order.
    pub fn drain(&mut self) -> impl Iterator<Item = GpioBank> + '_ {
        self.banks.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::leaked_region;

    fn bank(start: u32, count: u32) -> GpioBank {
        GpioBank {
            start,
            count,
            controller: Pl061::new(leaked_region(u64::from(start) << 12, 0x1000), count),
        }
    }

    #[test]
    fn lookup_routes_to_owning_bank() {
        let mut reg = ControllerRegistry::new();
        reg.register(bank(0, 8));
        reg.register(bank(8, 8));

        assert_eq!(reg.lookup(3).map(|b| b.start), Some(0));
        assert_eq!(reg.lookup(7).map(|b| b.start), Some(0));
        assert_eq!(reg.lookup(8).map(|b| b.start), Some(8));
        assert_eq!(reg.lookup(9).map(|b| b.line(9)), Some(1));
        assert!(reg.lookup(16).is_none());
        assert!(reg.lookup(u32::MAX).is_none());
    }

    #[test]
    fn lookup_ignores_gaps() {
        let mut reg = ControllerRegistry::new();
        reg.register(bank(0, 8));
        reg.register(bank(32, 8));
        assert!(reg.lookup(16).is_none());
        assert_eq!(reg.lookup(39).map(|b| b.start), Some(32));
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let reg = ControllerRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.lookup(0).is_none());
    }

    #[test]
    fn overlap_detection() {
        let b = bank(8, 8);
        assert!(b.overlaps(0, 9));
        assert!(b.overlaps(15, 1));
        assert!(!b.overlaps(0, 8));
        assert!(!b.overlaps(16, 8));
        assert!(!b.overlaps(8, 0));
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn overlapping_registration_panics_in_debug() {
        let mut reg = ControllerRegistry::new();
        reg.register(bank(0, 8));
        reg.register(bank(4, 8));
    }

    #[test]
    fn drain_preserves_registration_order() {
        let mut reg = ControllerRegistry::new();
        reg.register(bank(16, 8));
        reg.register(bank(0, 8));
        let starts: Vec<u32> = reg.drain().map(|b| b.start).collect();
        assert_eq!(starts, [16, 0]);
        assert!(reg.is_empty());
    }
}
