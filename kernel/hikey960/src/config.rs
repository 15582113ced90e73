//! Board configuration.
//!
//! Everything the board driver knows about its hardware is a compile-time
//! constant gathered into a [`BoardConfig`]. [`HIKEY960`] is the production
//! layout; tests build their own statics.

use hikey_driver_api::{PlatformDeviceDesc, RegionSpec};

use crate::hi3660::{self, GPIO_BLOCK_SIZE, GPIOS_PER_BLOCK};

/// Platform vendor id of 96Boards boards.
pub const PDEV_VID_96BOARDS: u32 = 3;
/// Platform product id of the HiKey960.
pub const PDEV_PID_HIKEY960: u32 = 2;

/// Vendor id for devices matched by class rather than vendor.
pub const PDEV_VID_GENERIC: u32 = 0;
/// Product id for devices matched by class rather than vendor.
pub const PDEV_PID_GENERIC: u32 = 0;
/// Device id of a Synopsys DWC3 USB controller.
pub const PDEV_DID_USB_DWC3: u32 = 1;
/// Device id of a UFS host controller.
pub const PDEV_DID_UFS: u32 = 9;

/// Index of each board-level register window in
/// [`BoardConfig::board_regions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum BoardRegion {
    /// USB3 OTG bus-controller glue.
    Usb3OtgBc = 0,
    /// Peripheral clock and reset generator.
    PeriCrg = 1,
    /// Peripheral control.
    Pctrl = 2,
}

/// A GPIO bank: a contiguous run of logical indices served by one
/// controller through one register window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioBankSpec {
    /// First logical index.
    pub start: u32,
    /// Number of lines.
    pub count: u32,
    /// The controller's register window.
    pub region: RegionSpec,
}

impl GpioBankSpec {
    /// Describes `blocks` consecutive PL061 blocks starting at block
    /// `first_block`, mapped at `phys_base`.
    #[must_use]
    pub const fn pl061(name: &'static str, first_block: u32, blocks: u32, phys_base: u64) -> Self {
        Self {
            start: first_block * GPIOS_PER_BLOCK,
            count: blocks * GPIOS_PER_BLOCK,
            region: RegionSpec::device(name, phys_base, blocks as u64 * GPIO_BLOCK_SIZE),
        }
    }
}

/// GPIO lines that route the USB port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbGpioLines {
    /// Hub 3.3V supply enable.
    pub hub_vdd33_en: u32,
    /// Type-C VBUS enable.
    pub vbus_typec: u32,
    /// Hub/Type-C data switch select.
    pub usbsw_sel: u32,
}

impl UsbGpioLines {
    /// Returns all lines in the order they are driven.
    #[must_use]
    pub const fn all(&self) -> [u32; 3] {
        [self.hub_vdd33_en, self.vbus_typec, self.usbsw_sel]
    }
}

/// Board-fixed hardware layout.
#[derive(Debug)]
pub struct BoardConfig {
    /// Device name published to the parent.
    pub name: &'static str,
    /// Platform vendor id.
    pub vid: u32,
    /// Platform product id.
    pub pid: u32,
    /// Board-level register windows, indexed by [`BoardRegion`].
    pub board_regions: &'static [RegionSpec],
    /// GPIO banks in registration order.
    pub gpio_banks: &'static [GpioBankSpec],
    /// Child platform devices.
    pub devices: &'static [PlatformDeviceDesc],
    /// USB routing lines.
    pub usb_lines: UsbGpioLines,
}

const HIKEY960_REGIONS: [RegionSpec; 3] = [
    RegionSpec::device(
        "usb3otg-bc",
        hi3660::MMIO_USB3OTG_BC_BASE,
        hi3660::MMIO_USB3OTG_BC_LENGTH,
    ),
    RegionSpec::device(
        "peri-crg",
        hi3660::MMIO_PERI_CRG_BASE,
        hi3660::MMIO_PERI_CRG_LENGTH,
    ),
    RegionSpec::device("pctrl", hi3660::MMIO_PCTRL_BASE, hi3660::MMIO_PCTRL_LENGTH),
];

const HIKEY960_GPIO_BANKS: [GpioBankSpec; 5] = [
    GpioBankSpec::pl061("gpio0", 0, 18, hi3660::MMIO_GPIO0_BASE),
    GpioBankSpec::pl061("gpio18", 18, 2, hi3660::MMIO_GPIO18_BASE),
    GpioBankSpec::pl061("gpio20", 20, 2, hi3660::MMIO_GPIO20_BASE),
    GpioBankSpec::pl061("gpio22", 22, 6, hi3660::MMIO_GPIO22_BASE),
    GpioBankSpec::pl061("gpio28", 28, 1, hi3660::MMIO_GPIO28_BASE),
];

const DWC3_MMIOS: [RegionSpec; 1] = [RegionSpec::device(
    "usb3otg",
    hi3660::MMIO_USB3OTG_BASE,
    hi3660::MMIO_USB3OTG_LENGTH,
)];

const UFS_MMIOS: [RegionSpec; 1] = [RegionSpec::device(
    "ufs",
    hi3660::MMIO_UFS_BASE,
    hi3660::MMIO_UFS_LENGTH,
)];

const HIKEY960_DEVICES: [PlatformDeviceDesc; 2] = [
    PlatformDeviceDesc {
        name: "dwc3",
        vid: PDEV_VID_GENERIC,
        pid: PDEV_PID_GENERIC,
        did: PDEV_DID_USB_DWC3,
        mmios: &DWC3_MMIOS,
        irqs: &[hi3660::IRQ_USB3],
    },
    PlatformDeviceDesc {
        name: "ufs",
        vid: PDEV_VID_GENERIC,
        pid: PDEV_PID_GENERIC,
        did: PDEV_DID_UFS,
        mmios: &UFS_MMIOS,
        irqs: &[hi3660::IRQ_UFS],
    },
];

/// The HiKey960 layout.
pub static HIKEY960: BoardConfig = BoardConfig {
    name: "hikey960",
    vid: PDEV_VID_96BOARDS,
    pid: PDEV_PID_HIKEY960,
    board_regions: &HIKEY960_REGIONS,
    gpio_banks: &HIKEY960_GPIO_BANKS,
    devices: &HIKEY960_DEVICES,
    usb_lines: UsbGpioLines {
        hub_vdd33_en: hi3660::GPIO_HUB_VDD33_EN,
        vbus_typec: hi3660::GPIO_VBUS_TYPEC,
        usbsw_sel: hi3660::GPIO_USBSW_SW_SEL,
    },
};
