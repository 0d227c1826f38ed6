//! Command buffer encoding
//!
//! Every command write goes out as one I2C transfer of interleaved control
//! and payload bytes:
//!
//! ```text
//! ┌──────┬─────────┬─────┬────────┬─────┬────────┐
//! │ 0x80 │ COMMAND │ CTL │ DATA 1 │ ... │ DATA k │
//! └──────┴─────────┴─────┴────────┴─────┴────────┘
//! ```
//!
//! `CTL` is [`CONTROL_CONTINUE`] for every argument count except five, which
//! uses [`CONTROL_LAST`]. The datasheet reads `0x00` as "last control byte,
//! the rest of the transfer is a data stream", which makes the five-argument
//! form the odd one out. It is kept as is until checked against hardware.

use heapless::Vec;

use super::command::CommandArgs;

/// Control byte: Co = 1, another control byte follows the next byte
pub const CONTROL_CONTINUE: u8 = 0x80;

/// Control byte: Co = 0, no further control bytes in this transfer
pub const CONTROL_LAST: u8 = 0x00;

/// Largest command write: control + command + 6 x (control + data)
pub const COMMAND_BUFFER_CAPACITY: usize = 14;

/// Scratch buffer for one command write, rebuilt on every write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBuffer {
    bytes: Vec<u8, COMMAND_BUFFER_CAPACITY>,
}

impl CommandBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Control byte placed before each argument byte
    pub fn argument_control(args: &CommandArgs) -> u8 {
        match args {
            CommandArgs::Five(_) => CONTROL_LAST,
            _ => CONTROL_CONTINUE,
        }
    }

    /// Replace the contents with the wire form of `command` and `args`
    ///
    /// Returns the encoded length, always `2 + 2 * args.len()`.
    pub fn encode(&mut self, command: u8, args: &CommandArgs) -> usize {
        let control = Self::argument_control(args);

        self.bytes.clear();
        // Capacity covers the six-argument form, so these cannot fail
        let _ = self.bytes.push(CONTROL_CONTINUE);
        let _ = self.bytes.push(command);
        for &data in args.data() {
            let _ = self.bytes.push(control);
            let _ = self.bytes.push(data);
        }

        self.bytes.len()
    }

    /// Encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded length
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if nothing has been encoded yet
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Command byte of the last encoded write
    pub fn command(&self) -> Option<u8> {
        self.bytes.get(1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::ssd1306::command::cmd;

    fn encoded(command: u8, args: impl Into<CommandArgs>) -> CommandBuffer {
        let mut buffer = CommandBuffer::new();
        buffer.encode(command, &args.into());
        buffer
    }

    #[test]
    fn test_command_only() {
        let buffer = encoded(cmd::DISPLAY_OFF, ());
        assert_eq!(buffer.as_bytes(), &[0x80, 0xAE]);
        assert_eq!(buffer.command(), Some(cmd::DISPLAY_OFF));
    }

    #[test]
    fn test_clock_divide_example() {
        let buffer = encoded(cmd::SET_CLOCK_DIV, 0x80);
        assert_eq!(buffer.as_bytes(), &[0x80, 0xD5, 0x80, 0x80]);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_two_arguments() {
        let buffer = encoded(cmd::SET_COLUMN_ADDRESS, (0, 127));
        assert_eq!(buffer.as_bytes(), &[0x80, 0x21, 0x80, 0x00, 0x80, 0x7F]);
    }

    #[test]
    fn test_five_arguments_use_last_control() {
        let buffer = encoded(cmd::VERTICAL_RIGHT_SCROLL, [0x00, 0x00, 0x07, 0x07, 0x01]);
        assert_eq!(
            buffer.as_bytes(),
            &[0x80, 0x29, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x07, 0x00, 0x01]
        );
    }

    #[test]
    fn test_six_arguments_use_continue_control() {
        let buffer = encoded(cmd::RIGHT_HORIZONTAL_SCROLL, [0x00, 0x00, 0x00, 0x07, 0x00, 0xFF]);
        assert_eq!(buffer.len(), COMMAND_BUFFER_CAPACITY);
        assert_eq!(
            buffer.as_bytes(),
            &[0x80, 0x26, 0x80, 0x00, 0x80, 0x00, 0x80, 0x00, 0x80, 0x07, 0x80, 0x00, 0x80, 0xFF]
        );
    }

    #[test]
    fn test_encode_replaces_previous_contents() {
        let mut buffer = CommandBuffer::new();
        buffer.encode(cmd::RIGHT_HORIZONTAL_SCROLL, &CommandArgs::Six([1; 6]));
        buffer.encode(cmd::DISPLAY_ON, &CommandArgs::None);
        assert_eq!(buffer.as_bytes(), &[0x80, 0xAF]);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn args() -> impl Strategy<Value = CommandArgs> {
            prop_oneof![
                Just(CommandArgs::None),
                any::<u8>().prop_map(CommandArgs::One),
                any::<[u8; 2]>().prop_map(CommandArgs::Two),
                any::<[u8; 5]>().prop_map(CommandArgs::Five),
                any::<[u8; 6]>().prop_map(CommandArgs::Six),
            ]
        }

        proptest! {
            #[test]
            fn layout_interleaves_control_and_payload(command in any::<u8>(), args in args()) {
                let mut buffer = CommandBuffer::new();
                let len = buffer.encode(command, &args);
                let bytes = buffer.as_bytes();

                prop_assert_eq!(len, 2 + 2 * args.len());
                prop_assert_eq!(bytes[0], CONTROL_CONTINUE);
                prop_assert_eq!(bytes[1], command);

                let control = CommandBuffer::argument_control(&args);
                for (pair, &data) in bytes[2..].chunks(2).zip(args.data()) {
                    prop_assert_eq!(pair[0], control);
                    prop_assert_eq!(pair[1], data);
                }
            }
        }
    }
}
