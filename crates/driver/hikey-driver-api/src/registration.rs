//! Linker-section-based driver registration types and macros.
//!
//! Board driver crates use [`board_driver_entry!`] to place a static entry
//! into a dedicated linker section. The bus manager iterates that section
//! to match the platform's vendor/product ids to a board driver and call
//! its bind function; no runtime registry needed.

use crate::bus::ParentDevice;
use crate::error::DriverError;

/// Board driver entry placed in the `.hikey_board_drivers` linker section.
///
/// Board drivers are matched by platform vendor and product id.
#[repr(C)]
pub struct BoardDriverEntry {
    /// Driver name (for logging).
    pub name: &'static str,
    /// Platform vendor id this driver binds to.
    pub vid: u32,
    /// Platform product id this driver binds to.
    pub pid: u32,
    /// Called when the platform matches.
    pub bind: fn(&dyn ParentDevice) -> Result<(), DriverError>,
}

impl BoardDriverEntry {
    /// Returns `true` if this entry binds to the given platform ids.
    #[must_use]
    pub const fn matches(&self, vid: u32, pid: u32) -> bool {
        self.vid == vid && self.pid == pid
    }
}

// SAFETY: A repr(C) struct containing only references to 'static data,
// integers and a function pointer, all of which are safe to share across threads.
unsafe impl Sync for BoardDriverEntry {}

/// Register a board driver entry in the `.hikey_board_drivers` linker section.
///
/// # Example
///
/// ```ignore
/// hikey_driver_api::board_driver_entry!(MY_BOARD, BoardDriverEntry {
///     name: "my_board",
///     vid: 0x0A,
///     pid: 0x01,
///     bind: my_bind_fn,
/// });
/// ```
#[macro_export]
macro_rules! board_driver_entry {
    ($name:ident, $entry:expr) => {
        #[used]
        #[unsafe(link_section = ".hikey_board_drivers")]
        static $name: $crate::registration::BoardDriverEntry = $entry;
    };
}
