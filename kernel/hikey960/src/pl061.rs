//! ARM PrimeCell PL061 GPIO controller.
//!
//! Each PL061 block drives 8 lines through one 4 KiB register page. A bank
//! is a run of consecutive pages; line `n` of a bank lives in page `n / 8`
//! at bit `n % 8`. The data register is address-masked: only the bits
//! selected by address lines `[9:2]` are read or written, so a single line
//! is accessed at offset `bit << 2` without touching its neighbours.

use hikey_driver_api::{DriverError, GpioFlags, MmioRegion};
use spin::Mutex;

use crate::hi3660::{GPIO_BLOCK_SIZE, GPIOS_PER_BLOCK};

// ---------------------------------------------------------------------------
// Register offsets (within a page)
// ---------------------------------------------------------------------------

/// Direction: 1 = output.
const GPIODIR: u64 = 0x400;
/// Interrupt sense: 1 = level.
const GPIOIS: u64 = 0x404;
/// Interrupt both edges.
const GPIOIBE: u64 = 0x408;
/// Interrupt event: 1 = rising edge or high level.
const GPIOIEV: u64 = 0x40C;

/// A PL061 bank and its register window.
#[derive(Debug)]
pub struct Pl061 {
    regs: MmioRegion,
    lines: u32,
    /// Serializes read-modify-write sequences on the shared registers.
    lock: Mutex<()>,
}

impl Pl061 {
    /// Returns `true` if a window of `size` bytes holds `lines` lines.
    #[must_use]
    pub const fn window_fits(lines: u32, size: u64) -> bool {
        (lines.div_ceil(GPIOS_PER_BLOCK) as u64) * GPIO_BLOCK_SIZE <= size
    }

    /// Wraps the mapped register window of a bank of `lines` lines.
    ///
    /// The window must satisfy [`window_fits`](Self::window_fits).
    #[must_use]
    pub fn new(regs: MmioRegion, lines: u32) -> Self {
        debug_assert!(Self::window_fits(lines, regs.size()));
        Self {
            regs,
            lines,
            lock: Mutex::new(()),
        }
    }

    /// Returns the number of lines in the bank.
    #[must_use]
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Gives the register window back, for unmapping.
    #[must_use]
    pub fn into_region(self) -> MmioRegion {
        self.regs
    }

    /// Returns the page offset and bit mask of bank-relative line `line`.
    fn locate(&self, line: u32) -> Result<(u64, u32), DriverError> {
        if line >= self.lines {
            return Err(DriverError::InvalidArgument);
        }
        let page = u64::from(line / GPIOS_PER_BLOCK) * GPIO_BLOCK_SIZE;
        let bit = 1u32 << (line % GPIOS_PER_BLOCK);
        Ok((page, bit))
    }

    /// Configures direction and interrupt sensing of `line`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidArgument`] if `line` is outside the bank.
    pub fn config(&self, line: u32, flags: GpioFlags) -> Result<(), DriverError> {
        let (page, bit) = self.locate(line)?;
        let level = flags.contains(GpioFlags::LEVEL);
        let rising = flags.contains(GpioFlags::RISING);
        let falling = flags.contains(GpioFlags::FALLING);

        let _guard = self.lock.lock();
        self.update(page + GPIODIR, bit, flags.contains(GpioFlags::OUTPUT));
        self.update(page + GPIOIS, bit, level);
        self.update(page + GPIOIBE, bit, !level && rising && falling);
        self.update(
            page + GPIOIEV,
            bit,
            if level { rising } else { rising && !falling },
        );
        Ok(())
    }

    /// Reads the level of `line` as 0 or 1.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidArgument`] if `line` is outside the bank.
    pub fn read(&self, line: u32) -> Result<u8, DriverError> {
        let (page, bit) = self.locate(line)?;
        let value = self.regs.read32(page + (u64::from(bit) << 2));
        Ok(u8::from(value & bit != 0))
    }

    /// Drives `line` high for any non-zero `value`, low otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidArgument`] if `line` is outside the bank.
    pub fn write(&self, line: u32, value: u8) -> Result<(), DriverError> {
        let (page, bit) = self.locate(line)?;
        let data = if value != 0 { bit } else { 0 };
        self.regs.write32(page + (u64::from(bit) << 2), data);
        Ok(())
    }

    fn update(&self, offset: u64, bit: u32, set: bool) {
        if set {
            self.regs.modify32(offset, 0, bit);
        } else {
            self.regs.modify32(offset, bit, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::leaked_region;

    fn bank(pages: u64) -> Pl061 {
        let lines = u32::try_from(pages).unwrap() * GPIOS_PER_BLOCK;
        Pl061::new(leaked_region(0xE8A0_B000, pages * GPIO_BLOCK_SIZE), lines)
    }

    fn reg(pl: &Pl061, offset: u64) -> u32 {
        pl.regs.read32(offset)
    }

    #[test]
    fn output_sets_direction_bit() {
        let pl = bank(2);
        pl.config(10, GpioFlags::OUTPUT).unwrap();
        assert_eq!(reg(&pl, 0x1000 + GPIODIR), 1 << 2);
        assert_eq!(reg(&pl, GPIODIR), 0);

        pl.config(10, GpioFlags::empty()).unwrap();
        assert_eq!(reg(&pl, 0x1000 + GPIODIR), 0);
    }

    #[test]
    fn interrupt_sense_encoding() {
        let pl = bank(1);

        pl.config(0, GpioFlags::LEVEL | GpioFlags::HIGH).unwrap();
        assert_eq!(reg(&pl, GPIOIS) & 1, 1);
        assert_eq!(reg(&pl, GPIOIBE) & 1, 0);
        assert_eq!(reg(&pl, GPIOIEV) & 1, 1);

        pl.config(1, GpioFlags::LEVEL | GpioFlags::LOW).unwrap();
        assert_eq!(reg(&pl, GPIOIS) & 2, 2);
        assert_eq!(reg(&pl, GPIOIEV) & 2, 0);

        pl.config(2, GpioFlags::RISING | GpioFlags::FALLING).unwrap();
        assert_eq!(reg(&pl, GPIOIS) & 4, 0);
        assert_eq!(reg(&pl, GPIOIBE) & 4, 4);
        assert_eq!(reg(&pl, GPIOIEV) & 4, 0);

        pl.config(3, GpioFlags::RISING).unwrap();
        assert_eq!(reg(&pl, GPIOIEV) & 8, 8);

        pl.config(4, GpioFlags::FALLING).unwrap();
        assert_eq!(reg(&pl, GPIOIEV) & 16, 0);
        assert_eq!(reg(&pl, GPIOIBE) & 16, 0);
    }

    #[test]
    fn reconfigure_clears_stale_bits() {
        let pl = bank(1);
        pl.config(5, GpioFlags::LEVEL | GpioFlags::HIGH).unwrap();
        pl.config(5, GpioFlags::OUTPUT).unwrap();
        assert_eq!(reg(&pl, GPIOIS), 0);
        assert_eq!(reg(&pl, GPIOIEV), 0);
        assert_eq!(reg(&pl, GPIODIR), 1 << 5);
    }

    #[test]
    fn write_uses_masked_data_address() {
        let pl = bank(2);
        pl.write(11, 1).unwrap();
        // Line 11: page 1, bit 3, data at 0x1000 + (0x8 << 2).
        assert_eq!(reg(&pl, 0x1000 + 0x20), 0x8);
        assert_eq!(pl.read(11).unwrap(), 1);

        pl.write(11, 0).unwrap();
        assert_eq!(reg(&pl, 0x1000 + 0x20), 0);
        assert_eq!(pl.read(11).unwrap(), 0);
    }

    #[test]
    fn nonzero_write_drives_high() {
        let pl = bank(1);
        pl.write(0, 0x80).unwrap();
        assert_eq!(pl.read(0).unwrap(), 1);
    }

    #[test]
    fn out_of_bank_line_rejected() {
        let pl = bank(1);
        assert_eq!(pl.read(8), Err(DriverError::InvalidArgument));
        assert_eq!(pl.write(8, 1), Err(DriverError::InvalidArgument));
        assert_eq!(
            pl.config(100, GpioFlags::OUTPUT),
            Err(DriverError::InvalidArgument)
        );
    }

    #[test]
    fn window_fits_whole_pages() {
        assert!(Pl061::window_fits(8, GPIO_BLOCK_SIZE));
        assert!(Pl061::window_fits(144, 18 * GPIO_BLOCK_SIZE));
        assert!(!Pl061::window_fits(9, GPIO_BLOCK_SIZE));
        assert!(Pl061::window_fits(0, 0));
    }
}
