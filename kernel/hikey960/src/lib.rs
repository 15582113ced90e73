//! HiKey960 board driver.
//!
//! Aggregates the Hi3660's PL061 GPIO blocks behind one logical GPIO index
//! space, switches the USB port between the on-board hub and the Type-C
//! connector, and publishes the board's child platform devices.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// ── Board description ───────────────────────────────────────────────────

pub mod config;
pub mod hi3660;

// ── Driver ──────────────────────────────────────────────────────────────

pub mod board;
pub mod devices;
pub mod pl061;
pub mod protocol;
pub mod registry;
pub mod resource;
pub mod usb;

#[cfg(test)]
mod testing;

pub use board::BoardDriver;
pub use config::{BoardConfig, HIKEY960};

#[cfg(target_os = "none")]
fn bind_hikey960(
    parent: &dyn hikey_driver_api::ParentDevice,
) -> Result<(), hikey_driver_api::DriverError> {
    BoardDriver::bind(parent, &HIKEY960).map(|_| ())
}

#[cfg(target_os = "none")]
hikey_driver_api::board_driver_entry!(
    HIKEY960_BOARD_DRIVER,
    hikey_driver_api::BoardDriverEntry {
        name: "hikey960",
        vid: config::PDEV_VID_96BOARDS,
        pid: config::PDEV_PID_HIKEY960,
        bind: bind_hikey960,
    }
);

/// Anchor symbol referenced by the linker script's `EXTERN()` directive
/// to force inclusion of this crate's board driver entry.
#[cfg(target_os = "none")]
#[used]
#[unsafe(no_mangle)]
pub static __HIKEY960_BOARD_ANCHOR: u8 = 0;
