//! Driver API types and traits for HiKey960 board support.
//!
//! This crate defines the contract between a board driver, the parent bus
//! manager that binds it, and the consumers of the capabilities it exposes:
//!
//! - **Layer 0** -- Resource types ([`RegionSpec`], [`MmioRegion`]) and the
//!   [`MmioMapper`] facility that turns one into the other.
//! - **Layer 1** -- Parent-facing traits ([`ParentDevice`], [`PlatformBus`],
//!   [`DeviceOps`]) and linker-section registration ([`BoardDriverEntry`]).
//! - **Layer 2** -- Capability traits ([`GpioProtocol`],
//!   [`UsbModeSwitchProtocol`]) queried by numeric [`ProtocolId`] through a
//!   [`ProtocolProvider`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod bus;
pub mod error;
pub mod gpio;
pub mod protocol;
pub mod registration;
pub mod resource;
pub mod services;
pub mod usb;

// Re-export all public types at the crate root for ergonomic imports.
pub use bus::{DeviceAddArgs, DeviceAddFlags, DeviceOps, ParentDevice, PlatformBus, PlatformDeviceDesc};
pub use error::DriverError;
pub use gpio::{GpioFlags, GpioProtocol};
pub use protocol::{Capability, ProtocolId, ProtocolProvider};
pub use registration::BoardDriverEntry;
pub use resource::{CachePolicy, MmioRegion, RegionSpec};
pub use services::MmioMapper;
pub use usb::{UsbMode, UsbModeSwitchProtocol};
