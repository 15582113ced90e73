//! HiSilicon Hi3660 SoC constants.
//!
//! Physical register windows, GPIO block layout, interrupt numbers and the
//! USB bring-up register map used by the HiKey960 board driver.

// ---------------------------------------------------------------------------
// Register windows
// ---------------------------------------------------------------------------

/// USB3 OTG controller (DWC3).
pub const MMIO_USB3OTG_BASE: u64 = 0xFF10_0000;
/// USB3 OTG controller window length.
pub const MMIO_USB3OTG_LENGTH: u64 = 0x10_0000;

/// USB3 OTG bus-controller glue registers.
pub const MMIO_USB3OTG_BC_BASE: u64 = 0xFF20_0000;
/// USB3 OTG bus-controller window length.
pub const MMIO_USB3OTG_BC_LENGTH: u64 = 0x1000;

/// Peripheral clock and reset generator.
pub const MMIO_PERI_CRG_BASE: u64 = 0xFFF3_5000;
/// Peripheral CRG window length.
pub const MMIO_PERI_CRG_LENGTH: u64 = 0x1000;

/// Peripheral control registers.
pub const MMIO_PCTRL_BASE: u64 = 0xE8A0_9000;
/// PCTRL window length.
pub const MMIO_PCTRL_LENGTH: u64 = 0x1000;

/// UFS host controller.
pub const MMIO_UFS_BASE: u64 = 0xFF3B_0000;
/// UFS host controller window length.
pub const MMIO_UFS_LENGTH: u64 = 0x1000;

// ---------------------------------------------------------------------------
// GPIO
// ---------------------------------------------------------------------------

/// Lines per PL061 block; each block occupies one register page.
pub const GPIOS_PER_BLOCK: u32 = 8;
/// Size of one PL061 register page.
pub const GPIO_BLOCK_SIZE: u64 = 0x1000;

/// GPIO blocks 0-17.
pub const MMIO_GPIO0_BASE: u64 = 0xE8A0_B000;
/// GPIO blocks 18-19.
pub const MMIO_GPIO18_BASE: u64 = 0xFF3B_4000;
/// GPIO blocks 20-21.
pub const MMIO_GPIO20_BASE: u64 = 0xE8A1_F000;
/// GPIO blocks 22-27 (always-on domain).
pub const MMIO_GPIO22_BASE: u64 = 0xFFF0_B000;
/// GPIO block 28 (always-on domain).
pub const MMIO_GPIO28_BASE: u64 = 0xFFF1_D000;

/// Returns the logical index of `pin` in PL061 block `block`.
#[must_use]
pub const fn gpio(block: u32, pin: u32) -> u32 {
    block * GPIOS_PER_BLOCK + pin
}

/// USB hub 3.3V supply enable.
pub const GPIO_HUB_VDD33_EN: u32 = gpio(25, 2);
/// Type-C port VBUS enable.
pub const GPIO_VBUS_TYPEC: u32 = gpio(5, 6);
/// USB data switch: hub (high) or Type-C port (low).
pub const GPIO_USBSW_SW_SEL: u32 = gpio(25, 6);

// ---------------------------------------------------------------------------
// Interrupts
// ---------------------------------------------------------------------------

/// USB3 OTG controller interrupt.
pub const IRQ_USB3: u32 = 191;
/// UFS host controller interrupt.
pub const IRQ_UFS: u32 = 310;

// ---------------------------------------------------------------------------
// USB bring-up registers
// ---------------------------------------------------------------------------

/// Peripheral CRG register offsets and bits.
pub mod peri_crg {
    /// Clock enable register 4.
    pub const CLK_EN4: u64 = 0x040;
    /// Reset enable register 4.
    pub const RSTEN4: u64 = 0x090;
    /// Reset disable register 4.
    pub const RSTDIS4: u64 = 0x094;
    /// Isolation disable register.
    pub const ISODIS: u64 = 0x148;

    /// USB3 OTG reference clock gate.
    pub const GT_CLK_USB3OTG_REF: u32 = 1 << 0;
    /// USB3 OTG AXI clock gate.
    pub const GT_ACLK_USB3OTG: u32 = 1 << 1;

    /// USB3 OTG PHY power-on reset.
    pub const IP_RST_USB3OTGPHY_POR: u32 = 1 << 3;
    /// USB3 OTG controller reset.
    pub const IP_RST_USB3OTG: u32 = 1 << 5;
    /// USB3 OTG 32 kHz domain reset.
    pub const IP_RST_USB3OTG_32K: u32 = 1 << 6;
    /// USB3 OTG AHB interface reset.
    pub const IP_RST_USB3OTG_AHBIF: u32 = 1 << 17;
    /// USB3 OTG mux reset.
    pub const IP_RST_USB3OTG_MUX: u32 = 1 << 18;

    /// Reference clock isolation enable.
    pub const ISODIS_REFCLK_ISO_EN: u32 = 1 << 25;
}

/// Peripheral control register offsets and bits.
pub mod pctrl {
    /// Control register 3.
    pub const CTRL3: u64 = 0x010;
    /// Control register 24.
    pub const CTRL24: u64 = 0x064;

    /// USB TCXO clock enable.
    pub const CTRL3_USB_TCXO_EN: u32 = 1 << 1;
    /// Write-enable mask bits start here.
    pub const CTRL3_MSK_START: u32 = 16;
    /// USB3 PHY 3-to-1 clock mux select.
    pub const CTRL24_SC_CLK_USB3PHY_3MUX1_SEL: u32 = 1 << 25;
}

/// USB3 OTG bus-controller register offsets and bits.
pub mod usb3otg_bc {
    /// Control register 0.
    pub const CTRL0: u64 = 0x000;
    /// Control register 2.
    pub const CTRL2: u64 = 0x008;
    /// Control register 4.
    pub const CTRL4: u64 = 0x010;
    /// Control register 7.
    pub const CTRL7: u64 = 0x01C;

    /// ABB (analog) glue enable.
    pub const CTRL0_ABB_GT_EN: u32 = 1 << 15;
    /// Power-down of the high-speed PHY.
    pub const CTRL2_POWERDOWN_HSP: u32 = 1 << 0;
    /// Power-down of the super-speed PHY.
    pub const CTRL2_POWERDOWN_SSP: u32 = 1 << 1;
    /// Override VBUS valid to the controller.
    pub const CTRL4_VBUSVLDEXT: u32 = 1 << 15;
    /// VBUS valid override enable.
    pub const CTRL4_VBUSVLDEXTSEL: u32 = 1 << 16;
    /// Reference clock select.
    pub const CTRL7_REF_SSP_EN: u32 = 1 << 16;
}
