//! SSD1306 command set and command arguments

/// SSD1306 commands
pub mod cmd {
    // Fundamental
    pub const SET_CONTRAST: u8 = 0x81;
    pub const ENTIRE_DISPLAY_RESUME: u8 = 0xA4;
    pub const ENTIRE_DISPLAY_ON: u8 = 0xA5;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;

    // Scrolling
    pub const RIGHT_HORIZONTAL_SCROLL: u8 = 0x26;
    pub const LEFT_HORIZONTAL_SCROLL: u8 = 0x27;
    pub const VERTICAL_RIGHT_SCROLL: u8 = 0x29;
    pub const VERTICAL_LEFT_SCROLL: u8 = 0x2A;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const ACTIVATE_SCROLL: u8 = 0x2F;
    pub const SET_VERTICAL_SCROLL_AREA: u8 = 0xA3;

    // Addressing
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDRESS: u8 = 0x21;
    pub const SET_PAGE_ADDRESS: u8 = 0x22;
    pub const SET_PAGE_START: u8 = 0xB0;

    // Hardware configuration
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP_0: u8 = 0xA0;
    pub const SET_SEG_REMAP_127: u8 = 0xA1;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_COM_SCAN_INC: u8 = 0xC0;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;

    // Timing and driving
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DESELECT: u8 = 0xDB;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const NOP: u8 = 0xE3;
}

/// Data bytes trailing a command byte
///
/// The controller's commands take 0, 1, 2, 5 or 6 argument bytes; the
/// variant decides both the length and the control byte placed before each
/// argument (see [`CommandBuffer`](super::CommandBuffer)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandArgs {
    /// Command byte only
    #[default]
    None,
    /// One argument (contrast, multiplex ratio, ...)
    One(u8),
    /// Two arguments (column or page window)
    Two([u8; 2]),
    /// Five arguments (vertical + horizontal scroll setup)
    Five([u8; 5]),
    /// Six arguments (horizontal scroll setup)
    Six([u8; 6]),
}

impl CommandArgs {
    /// Argument bytes in wire order
    pub fn data(&self) -> &[u8] {
        match self {
            CommandArgs::None => &[],
            CommandArgs::One(byte) => core::slice::from_ref(byte),
            CommandArgs::Two(bytes) => bytes,
            CommandArgs::Five(bytes) => bytes,
            CommandArgs::Six(bytes) => bytes,
        }
    }

    /// Number of argument bytes
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Check if the command has no arguments
    pub fn is_empty(&self) -> bool {
        matches!(self, CommandArgs::None)
    }
}

impl From<()> for CommandArgs {
    fn from(_: ()) -> Self {
        CommandArgs::None
    }
}

impl From<u8> for CommandArgs {
    fn from(data: u8) -> Self {
        CommandArgs::One(data)
    }
}

impl From<(u8, u8)> for CommandArgs {
    fn from((first, second): (u8, u8)) -> Self {
        CommandArgs::Two([first, second])
    }
}

impl From<[u8; 2]> for CommandArgs {
    fn from(data: [u8; 2]) -> Self {
        CommandArgs::Two(data)
    }
}

impl From<[u8; 5]> for CommandArgs {
    fn from(data: [u8; 5]) -> Self {
        CommandArgs::Five(data)
    }
}

impl From<[u8; 6]> for CommandArgs {
    fn from(data: [u8; 6]) -> Self {
        CommandArgs::Six(data)
    }
}
