//! SSD1306 128x64 OLED controller over I2C
//!
//! # Transfers
//!
//! | Operation       | Adapter | Bytes                                  |
//! |-----------------|---------|----------------------------------------|
//! | `ping`          | command | none (address probe)                   |
//! | `write_command` | command | interleaved control/command/data, 2-14 |
//! | `write_display` | data    | the 1024-byte frame as is              |
//!
//! Only one operation owns the bus state at a time. Operations started
//! while another is in flight wait at their start gate until it completes.
//!
//! # Example
//!
//! ```ignore
//! let mut oled = Ssd1306::blocking(i2c, Address::SSD1306_PRIMARY);
//! let mut init = oled.initialize();
//! let verdict = Watchdog::default().run(&mut init, |_| {});
//! ```

mod buffer;
pub mod command;
pub mod config;
mod driver;
pub mod frame;
pub mod ops;

#[cfg(test)]
pub(crate) mod mock;

pub use buffer::{CommandBuffer, COMMAND_BUFFER_CAPACITY, CONTROL_CONTINUE, CONTROL_LAST};
pub use command::{cmd, CommandArgs};
pub use config::{InitStep, Ssd1306Config, INIT_STEPS};
pub use driver::{Operation, Ssd1306, Ticket, RESULT_HISTORY};
pub use frame::{blank_frame, FrameBuffer, FRAME_LEN, HEIGHT, PAGES, WIDTH};
pub use ops::{Initialize, Ping, StartWriteDisplay, WriteCommand, WriteDisplay};
