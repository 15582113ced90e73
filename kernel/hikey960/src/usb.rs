//! USB role switching.
//!
//! The HiKey960 has a single DWC3 controller whose data lines are routed
//! either to the on-board hub (host) or to the Type-C port (peripheral) by
//! three GPIO lines. [`UsbModeController`] holds the current role;
//! [`Hikey960Usb`] does the register bring-up and line switching.

use alloc::sync::Arc;

use hikey_driver_api::{
    DriverError, GpioFlags, GpioProtocol, MmioRegion, PlatformBus, ProtocolId, UsbMode,
    UsbModeSwitchProtocol,
};
use spin::Mutex;

use crate::config::{BoardRegion, UsbGpioLines};
use crate::hi3660::{pctrl, peri_crg, usb3otg_bc};

/// Current USB role and the rules for changing it.
#[derive(Debug)]
pub struct UsbModeController {
    mode: Mutex<UsbMode>,
}

impl UsbModeController {
    /// Creates a controller in [`UsbMode::None`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mutex::new(UsbMode::None),
        }
    }

    /// Returns the role the board starts in once bound.
    #[must_use]
    pub const fn initial_mode(&self) -> UsbMode {
        UsbMode::Host
    }

    /// Returns the current role.
    #[must_use]
    pub fn mode(&self) -> UsbMode {
        *self.mode.lock()
    }

    /// Moves to `requested`, running `switch` to reconfigure the hardware.
    ///
    /// `switch` runs even if `requested` is the current role. The role is
    /// only updated when it succeeds.
    ///
    /// The role lock is held while `switch` runs, so `switch` must not call
    /// back into `set_mode` or [`mode`](Self::mode) on this controller. For
    /// [`Hikey960Usb`] this means the platform bus and the GPIO capability it
    /// routes to must never re-enter the USB mode-switch capability.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Unsupported`] for [`UsbMode::Otg`] without
    /// calling `switch`, or the error `switch` returns.
    pub fn set_mode<F>(&self, requested: UsbMode, switch: F) -> Result<(), DriverError>
    where
        F: FnOnce(UsbMode) -> Result<(), DriverError>,
    {
        if requested == UsbMode::Otg {
            return Err(DriverError::Unsupported);
        }

        let mut mode = self.mode.lock();
        switch(requested)?;
        log::debug!("hikey960-usb: {} -> {requested}", *mode);
        *mode = requested;
        Ok(())
    }
}

impl Default for UsbModeController {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// HiKey960 hardware
// ---------------------------------------------------------------------------

/// The board's USB mode-switch capability.
///
/// Switching queries the platform bus for the board's GPIO capability while
/// the role lock is held; the bus must not re-enter
/// [`UsbModeSwitchProtocol::set_mode`] from that query.
pub struct Hikey960Usb {
    controller: UsbModeController,
    bus: Arc<dyn PlatformBus>,
    lines: UsbGpioLines,
}

impl Hikey960Usb {
    /// Creates the capability. Lines are driven through the GPIO
    /// capability the bus routes back to the board.
    #[must_use]
    pub fn new(bus: Arc<dyn PlatformBus>, lines: UsbGpioLines) -> Self {
        Self {
            controller: UsbModeController::new(),
            bus,
            lines,
        }
    }

    /// Returns the current role.
    #[must_use]
    pub fn mode(&self) -> UsbMode {
        self.controller.mode()
    }

    /// Brings up the USB3 OTG block and claims the routing lines as outputs.
    ///
    /// `regions` are the board-level windows indexed by [`BoardRegion`].
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InitFailed`] if a window or the GPIO
    /// capability is missing, or the error from configuring a line.
    pub fn init(&self, regions: &[MmioRegion]) -> Result<(), DriverError> {
        let window = |which: BoardRegion| {
            regions.get(which as usize).ok_or_else(|| {
                log::error!("hikey960-usb: {which:?} window not mapped");
                DriverError::InitFailed
            })
        };
        let bc = window(BoardRegion::Usb3OtgBc)?;
        let crg = window(BoardRegion::PeriCrg)?;
        let ctrl = window(BoardRegion::Pctrl)?;

        bring_up(crg, ctrl, bc);

        self.with_gpio(|gpio| {
            for line in self.lines.all() {
                gpio.config(line, GpioFlags::OUTPUT)?;
            }
            Ok(())
        })
    }

    /// Drives the routing lines for `mode`: high for host, low otherwise.
    fn switch(&self, mode: UsbMode) -> Result<(), DriverError> {
        let level = u8::from(mode == UsbMode::Host);
        self.with_gpio(|gpio| {
            // Every line must be routed before any of them is driven.
            for line in self.lines.all() {
                gpio.read(line)?;
            }
            for line in self.lines.all() {
                gpio.write(line, level)?;
            }
            Ok(())
        })
    }

    fn with_gpio<R>(
        &self,
        f: impl FnOnce(&dyn GpioProtocol) -> Result<R, DriverError>,
    ) -> Result<R, DriverError> {
        let provider = self.bus.interface().ok_or_else(|| {
            log::error!("hikey960-usb: no protocol provider on the bus");
            DriverError::InitFailed
        })?;
        let gpio = provider
            .get_protocol(ProtocolId::Gpio.raw())
            .ok()
            .and_then(|cap| cap.gpio())
            .ok_or_else(|| {
                log::error!("hikey960-usb: GPIO capability unavailable");
                DriverError::InitFailed
            })?;
        f(gpio)
    }
}

impl UsbModeSwitchProtocol for Hikey960Usb {
    fn initial_mode(&self) -> UsbMode {
        self.controller.initial_mode()
    }

    fn set_mode(&self, mode: UsbMode) -> Result<(), DriverError> {
        self.controller.set_mode(mode, |m| self.switch(m))
    }
}

/// Hi3660 USB3 OTG clock, reset and PHY bring-up.
fn bring_up(crg: &MmioRegion, ctrl: &MmioRegion, bc: &MmioRegion) {
    // Reference clock isolation off, TCXO on, PHY clock from the 3:1 mux.
    crg.write32(peri_crg::ISODIS, peri_crg::ISODIS_REFCLK_ISO_EN);
    ctrl.write32(
        pctrl::CTRL3,
        (pctrl::CTRL3_USB_TCXO_EN << pctrl::CTRL3_MSK_START) | pctrl::CTRL3_USB_TCXO_EN,
    );
    ctrl.modify32(pctrl::CTRL24, pctrl::CTRL24_SC_CLK_USB3PHY_3MUX1_SEL, 0);

    crg.write32(
        peri_crg::CLK_EN4,
        peri_crg::GT_CLK_USB3OTG_REF | peri_crg::GT_ACLK_USB3OTG,
    );

    let resets = peri_crg::IP_RST_USB3OTG_32K
        | peri_crg::IP_RST_USB3OTG_AHBIF
        | peri_crg::IP_RST_USB3OTG_MUX
        | peri_crg::IP_RST_USB3OTGPHY_POR
        | peri_crg::IP_RST_USB3OTG;
    crg.write32(peri_crg::RSTEN4, resets);
    crg.write32(
        peri_crg::RSTDIS4,
        peri_crg::IP_RST_USB3OTG_32K | peri_crg::IP_RST_USB3OTG_AHBIF | peri_crg::IP_RST_USB3OTG_MUX,
    );

    bc.modify32(usb3otg_bc::CTRL0, 0, usb3otg_bc::CTRL0_ABB_GT_EN);
    bc.modify32(usb3otg_bc::CTRL7, 0, usb3otg_bc::CTRL7_REF_SSP_EN);
    bc.modify32(
        usb3otg_bc::CTRL2,
        usb3otg_bc::CTRL2_POWERDOWN_HSP | usb3otg_bc::CTRL2_POWERDOWN_SSP,
        0,
    );
    bc.modify32(
        usb3otg_bc::CTRL4,
        0,
        usb3otg_bc::CTRL4_VBUSVLDEXT | usb3otg_bc::CTRL4_VBUSVLDEXTSEL,
    );

    // PHY and controller out of reset last.
    crg.write32(
        peri_crg::RSTDIS4,
        peri_crg::IP_RST_USB3OTGPHY_POR | peri_crg::IP_RST_USB3OTG,
    );
}
