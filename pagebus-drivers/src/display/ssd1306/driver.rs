//! SSD1306 driver state
//!
//! [`Ssd1306`] owns the bus master, both transaction adapters and the
//! command buffer. Its operations are resumable tasks bound to the driver
//! through a [`TaskHandle`]; the run loop resumes a handle once per tick
//! until it reports a terminal [`Outcome`].
//!
//! # Bus state
//!
//! One [`OperationId`] per driver names the operation that owns the bus
//! state. It only moves `Idle → X → Idle`: a start gate refuses to leave
//! `Idle` while another operation is in flight, and only a completion from
//! the bus master brings it back. The command and data adapters address
//! separate transfers but share this identity, so they are never driven
//! at the same time.
//!
//! Every accepted transfer gets a ticket. Completions are recorded against
//! their ticket in a short history, and an operation reads back the result
//! of its own ticket only. Starting a transfer never erases a result that
//! an earlier operation has yet to read.

use embedded_hal::i2c::I2c;
use heapless::Deque;
use pagebus_core::task::{Outcome, TaskHandle};
use pagebus_hal::{Address, BlockingBus, BusMaster, Completion, OperationId, TransactionAdapter};

use super::buffer::CommandBuffer;
use super::command::{cmd, CommandArgs};
use super::config::Ssd1306Config;
use super::frame::{FrameBuffer, FRAME_LEN};
use super::ops::{Initialize, Ping, StartWriteDisplay, WriteCommand, WriteDisplay};

/// Completions kept for operations that have not read their result yet
pub const RESULT_HISTORY: usize = 4;

/// Sequence number of an accepted transfer
pub type Ticket = u16;

/// Handle for a resumable driver operation
pub type Operation<'d, B, T> = TaskHandle<'d, Ssd1306<B>, T>;

/// Non-blocking SSD1306 driver over a [`BusMaster`]
///
/// # Example
///
/// ```ignore
/// let mut oled = Ssd1306::new(bus, Address::SSD1306_PRIMARY);
///
/// let mut init = oled.initialize();
/// loop {
///     match init.resume() {
///         Outcome::Running => { /* other work */ }
///         outcome => break outcome.is_success(),
///     }
/// }
/// ```
pub struct Ssd1306<B> {
    bus: B,
    config: Ssd1306Config,
    /// Operation that owns the bus state
    task: OperationId,
    /// Ticket of the live transfer, or of the last one once idle
    ticket: Ticket,
    /// Recent completions, oldest first
    results: Deque<(Ticket, Completion), RESULT_HISTORY>,
    /// Result of the last frame transfer, `None` while one is outstanding
    frame: Option<bool>,
    /// Short command writes
    command: TransactionAdapter,
    /// Full frame transfers
    data: TransactionAdapter,
    buffer: CommandBuffer,
}

impl<I2C> Ssd1306<BlockingBus<I2C>>
where
    I2C: I2c,
{
    /// Create a driver on a blocking `embedded-hal` I2C peripheral
    pub fn blocking(i2c: I2C, address: Address) -> Self {
        Self::new(BlockingBus::new(i2c), address)
    }
}

impl<B> Ssd1306<B>
where
    B: BusMaster,
{
    /// Create a driver with the default register configuration
    ///
    /// No bus traffic is generated.
    pub fn new(bus: B, address: Address) -> Self {
        Self::with_config(bus, address, Ssd1306Config::default())
    }

    /// Create a driver with a custom register configuration
    pub fn with_config(bus: B, address: Address, config: Ssd1306Config) -> Self {
        Self {
            bus,
            config,
            task: OperationId::Idle,
            ticket: 0,
            results: Deque::new(),
            frame: None,
            command: TransactionAdapter::new(address),
            data: TransactionAdapter::new(address),
            buffer: CommandBuffer::new(),
        }
    }

    /// Device address
    pub fn address(&self) -> Address {
        self.command.address()
    }

    /// Register configuration used by `initialize`
    pub fn config(&self) -> &Ssd1306Config {
        &self.config
    }

    /// Borrow the bus master
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the bus master
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the bus master
    pub fn release(self) -> B {
        self.bus
    }

    /// Operation currently owning the bus state
    pub fn operation(&self) -> OperationId {
        self.task
    }

    /// Tag of the most recent completion if it was acknowledged, `Idle`
    /// otherwise
    pub fn last_completion(&self) -> OperationId {
        match self.results.back() {
            Some((_, done)) if done.acknowledged => done.tag,
            _ => OperationId::Idle,
        }
    }

    /// Check if no operation is in flight
    pub fn is_idle(&self) -> bool {
        self.task.is_idle()
    }

    /// Last encoded command write
    pub fn command_buffer(&self) -> &CommandBuffer {
        &self.buffer
    }

    /// Adapter used for command writes and pings
    pub fn command_adapter(&self) -> &TransactionAdapter {
        &self.command
    }

    /// Adapter used for frame transfers
    pub fn data_adapter(&self) -> &TransactionAdapter {
        &self.data
    }

    /// Collect completion reports from the bus master
    ///
    /// Operations call this on every resume. A completion for the live
    /// transfer frees its adapter, records the result under the live ticket
    /// and returns the identity to `Idle`. Any other completion is dropped.
    pub fn service(&mut self) {
        while let Some(done) = self.bus.poll_completion() {
            if self.task.is_idle() || done.tag != self.task {
                #[cfg(feature = "defmt")]
                defmt::warn!("Dropped completion for {} while {} in flight", done.tag, self.task);
                continue;
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("{} finished, ack={}", done.tag, done.acknowledged);

            match done.tag {
                OperationId::WriteDisplay => {
                    self.data.complete();
                    self.frame = Some(done.acknowledged);
                }
                _ => self.command.complete(),
            }

            if self.results.is_full() {
                self.results.pop_front();
            }
            let _ = self.results.push_back((self.ticket, done));
            self.task = OperationId::Idle;
        }
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Probe the device address
    pub fn ping(&mut self) -> Operation<'_, B, Ping> {
        TaskHandle::new(self, Ping::new())
    }

    /// Run the full register initialization sequence
    pub fn initialize(&mut self) -> Operation<'_, B, Initialize> {
        let task = Initialize::new(&self.config);
        TaskHandle::new(self, task)
    }

    /// Write a command byte with 0, 1, 2, 5 or 6 trailing arguments
    pub fn write_command(
        &mut self,
        command: u8,
        args: impl Into<CommandArgs>,
    ) -> Operation<'_, B, WriteCommand> {
        TaskHandle::new(self, WriteCommand::new(command, args.into()))
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Operation<'_, B, WriteCommand> {
        self.write_command(cmd::SET_CONTRAST, contrast)
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) -> Operation<'_, B, WriteCommand> {
        let command = if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF };
        self.write_command(command, ())
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Operation<'_, B, WriteCommand> {
        let command = if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        };
        self.write_command(command, ())
    }

    /// Transfer a full frame and wait for its completion
    ///
    /// The frame stays borrowed while the handle lives.
    pub fn write_display<'d, 'f>(
        &'d mut self,
        frame: &'f FrameBuffer,
    ) -> Operation<'d, B, WriteDisplay<'f>> {
        TaskHandle::new(self, WriteDisplay::new(frame))
    }

    /// Start a full frame transfer without waiting for it
    ///
    /// Succeeds as soon as the bus master accepts the transfer; follow up
    /// with [`poll_write_display`](Self::poll_write_display).
    pub fn start_write_display<'d, 'f>(
        &'d mut self,
        frame: &'f FrameBuffer,
    ) -> Operation<'d, B, StartWriteDisplay<'f>> {
        TaskHandle::new(self, StartWriteDisplay::new(frame))
    }

    /// Check on a frame transfer issued with `start_write_display`
    ///
    /// Reports the last frame transfer even when other operations ran after
    /// it; `Stopped` if no frame was ever sent.
    pub fn poll_write_display(&mut self) -> Outcome {
        self.service();
        if self.task == OperationId::WriteDisplay {
            return Outcome::Running;
        }
        Outcome::finished(self.frame == Some(true))
    }

    // ── Start gates ──────────────────────────────────────────────────────

    /// Result of the transfer issued under `ticket`
    ///
    /// `None` while it is still in flight. A ticket that already fell out of
    /// the history reads as not acknowledged.
    pub(crate) fn result(&self, ticket: Ticket) -> Option<bool> {
        if !self.is_idle() && self.ticket == ticket {
            return None;
        }

        let found = self.results.iter().rev().find(|(t, _)| *t == ticket);
        if found.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Result of transfer {} no longer recorded", ticket);
        }
        Some(found.is_some_and(|(_, done)| done.acknowledged))
    }

    /// Claim the bus state for `id` once its transfer has been accepted
    fn claim(&mut self, id: OperationId) -> Ticket {
        self.ticket = self.ticket.wrapping_add(1);
        self.task = id;
        if id == OperationId::WriteDisplay {
            self.frame = None;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("{} started as transfer {}", id, self.ticket);

        self.ticket
    }

    /// Start an address probe if the bus state is free
    pub(crate) fn try_start_ping(&mut self) -> Option<Ticket> {
        self.service();
        if !self.is_idle() || !self.command.configure_ping() {
            return None;
        }
        if !self.command.start(&mut self.bus, &[], OperationId::Ping) {
            return None;
        }
        Some(self.claim(OperationId::Ping))
    }

    /// Encode and start a command write if the bus state is free
    pub(crate) fn try_start_command(&mut self, command: u8, args: &CommandArgs) -> Option<Ticket> {
        self.service();
        if !self.is_idle() || self.command.is_busy() {
            return None;
        }

        let length = self.buffer.encode(command, args);
        let id = OperationId::Command(command);
        if !self.command.configure_write(length)
            || !self.command.start(&mut self.bus, self.buffer.as_bytes(), id)
        {
            return None;
        }
        Some(self.claim(id))
    }

    /// Start a frame transfer if the bus state is free
    pub(crate) fn try_start_frame(&mut self, frame: &FrameBuffer) -> Option<Ticket> {
        self.service();
        if !self.is_idle() || !self.data.configure_write(FRAME_LEN) {
            return None;
        }
        if !self.data.start(&mut self.bus, frame, OperationId::WriteDisplay) {
            return None;
        }
        Some(self.claim(OperationId::WriteDisplay))
    }
}
