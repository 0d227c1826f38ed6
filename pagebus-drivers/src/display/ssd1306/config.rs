//! Register configuration applied by `initialize`

use super::command::{cmd, CommandArgs};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of command writes in the init sequence
pub const INIT_STEPS: usize = 18;

/// One command write of the init sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitStep {
    /// Command byte
    pub command: u8,
    /// Trailing arguments
    pub args: CommandArgs,
}

impl InitStep {
    const fn new(command: u8, args: CommandArgs) -> Self {
        Self { command, args }
    }
}

/// SSD1306 register values written during initialization
///
/// The default matches a 128x64 panel with the internal charge pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ssd1306Config {
    /// Clock divide ratio (low nibble) and oscillator frequency (high nibble)
    pub clock_divide: u8,
    /// Multiplex ratio, number of rows - 1
    pub multiplex_ratio: u8,
    /// Vertical shift by COM (0-63)
    pub display_offset: u8,
    /// RAM row shown on the first line (0-63)
    pub start_line: u8,
    /// 0x14 enables the internal charge pump, 0x10 disables it
    pub charge_pump: u8,
    /// 0x00 horizontal, 0x01 vertical, 0x02 page addressing
    pub memory_mode: u8,
    /// COM pins hardware configuration
    pub com_pins: u8,
    /// Contrast (0-255)
    pub contrast: u8,
    /// Pre-charge period, phase 2 (high nibble) and phase 1 (low nibble)
    pub precharge: u8,
    /// VCOMH deselect level
    pub vcom_deselect: u8,
    /// First and last column of the write window
    pub columns: (u8, u8),
    /// First and last page of the write window
    pub pages: (u8, u8),
}

impl Default for Ssd1306Config {
    fn default() -> Self {
        Self::INTERNAL_VCC
    }
}

impl Ssd1306Config {
    /// 128x64 panel powered from the internal charge pump
    pub const INTERNAL_VCC: Self = Self {
        clock_divide: 0x80,
        multiplex_ratio: 0x3F,
        display_offset: 0x00,
        start_line: 0x00,
        charge_pump: 0x14,
        memory_mode: 0x00,
        com_pins: 0x12,
        contrast: 0xCE,
        precharge: 0xF1,
        vcom_deselect: 0x40,
        columns: (0, 127),
        pages: (0, 7),
    };

    /// 128x64 panel with an external VCC supply
    pub const EXTERNAL_VCC: Self = Self {
        charge_pump: 0x10,
        contrast: 0x9F,
        precharge: 0x22,
        ..Self::INTERNAL_VCC
    };

    /// Ordered command writes that bring the panel up
    ///
    /// Display off, timing and geometry, addressing window, then display on.
    pub fn init_sequence(&self) -> [InitStep; INIT_STEPS] {
        use CommandArgs::{None, One, Two};

        [
            InitStep::new(cmd::DISPLAY_OFF, None),
            InitStep::new(cmd::SET_CLOCK_DIV, One(self.clock_divide)),
            InitStep::new(cmd::SET_MUX_RATIO, One(self.multiplex_ratio)),
            InitStep::new(cmd::SET_DISPLAY_OFFSET, One(self.display_offset)),
            InitStep::new(cmd::SET_START_LINE | (self.start_line & 0x3F), None),
            InitStep::new(cmd::SET_CHARGE_PUMP, One(self.charge_pump)),
            InitStep::new(cmd::SET_MEMORY_MODE, One(self.memory_mode)),
            InitStep::new(cmd::SET_SEG_REMAP_127, None),
            InitStep::new(cmd::SET_COM_SCAN_DEC, None),
            InitStep::new(cmd::SET_COM_PINS, One(self.com_pins)),
            InitStep::new(cmd::SET_CONTRAST, One(self.contrast)),
            InitStep::new(cmd::SET_PRECHARGE, One(self.precharge)),
            InitStep::new(cmd::SET_VCOM_DESELECT, One(self.vcom_deselect)),
            InitStep::new(cmd::ENTIRE_DISPLAY_RESUME, None),
            InitStep::new(cmd::SET_NORMAL, None),
            InitStep::new(cmd::SET_COLUMN_ADDRESS, Two([self.columns.0, self.columns.1])),
            InitStep::new(cmd::SET_PAGE_ADDRESS, Two([self.pages.0, self.pages.1])),
            InitStep::new(cmd::DISPLAY_ON, None),
        ]
    }
}
