//! Resumable SSD1306 operations
//!
//! Each operation drives one transaction adapter through
//! configure → start → wait for completion. The start is a gate that only
//! passes once the bus state is free and the bus master accepted the
//! transfer, handing back the transfer's ticket; the wait then reads the
//! result recorded under that ticket, so a completion can only ever be
//! reported to the operation that issued the transfer.
//!
//! A transfer that was not acknowledged ends the operation with
//! [`Outcome::Stopped`]. Nothing is retried.
//!
//! Operations are only handed out bound to their driver, through the
//! driver's methods.

use pagebus_core::task::{Outcome, Task};
use pagebus_core::{spawn, wait_for, wait_until};
use pagebus_hal::BusMaster;

use super::command::CommandArgs;
use super::config::{InitStep, Ssd1306Config, INIT_STEPS};
use super::driver::{Ssd1306, Ticket};
use super::frame::FrameBuffer;

/// Continuation of a single-transfer operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    /// Waiting at the start gate
    #[default]
    Start,
    /// Transfer issued, waiting for its completion
    Await(Ticket),
}

/// Wait out the transfer issued under `ticket` and report whether it was
/// acknowledged
fn await_completion<B: BusMaster>(
    phase: &mut Phase,
    dev: &mut Ssd1306<B>,
    ticket: Ticket,
) -> Outcome {
    *phase = Phase::Await(ticket);
    dev.service();
    let acked = wait_for!(dev.result(ticket));

    *phase = Phase::Start;
    Outcome::finished(acked)
}

// ── Ping ─────────────────────────────────────────────────────────────────

/// Zero-length probe of the device address
#[derive(Debug)]
pub struct Ping {
    phase: Phase,
}

impl Ping {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Start,
        }
    }
}

impl<B: BusMaster> Task<Ssd1306<B>> for Ping {
    fn resume(&mut self, dev: &mut Ssd1306<B>) -> Outcome {
        let ticket = match self.phase {
            Phase::Await(ticket) => ticket,
            Phase::Start => wait_for!(dev.try_start_ping()),
        };
        await_completion(&mut self.phase, dev, ticket)
    }
}

// ── Command write ────────────────────────────────────────────────────────

/// One command byte plus its arguments, sent as a single transfer
#[derive(Debug)]
pub struct WriteCommand {
    command: u8,
    args: CommandArgs,
    phase: Phase,
}

impl WriteCommand {
    pub(crate) fn new(command: u8, args: CommandArgs) -> Self {
        Self {
            command,
            args,
            phase: Phase::Start,
        }
    }

    /// Command byte
    pub fn command(&self) -> u8 {
        self.command
    }
}

impl<B: BusMaster> Task<Ssd1306<B>> for WriteCommand {
    fn resume(&mut self, dev: &mut Ssd1306<B>) -> Outcome {
        let ticket = match self.phase {
            Phase::Await(ticket) => ticket,
            Phase::Start => wait_for!(dev.try_start_command(self.command, &self.args)),
        };
        await_completion(&mut self.phase, dev, ticket)
    }
}

// ── Initialize ───────────────────────────────────────────────────────────

/// Full register initialization
///
/// Every step is attempted in order, even after one fails; the result is
/// the AND of all steps. Already applied steps are not rolled back.
#[derive(Debug)]
pub struct Initialize {
    steps: [InitStep; INIT_STEPS],
    /// Next step to spawn
    index: usize,
    /// All steps so far were acknowledged
    ok: bool,
    current: Option<WriteCommand>,
}

impl Initialize {
    pub(crate) fn new(config: &Ssd1306Config) -> Self {
        Self {
            steps: config.init_sequence(),
            index: 0,
            ok: true,
            current: None,
        }
    }

    /// Index of the step being written
    pub fn step(&self) -> usize {
        self.index
    }
}

impl<B: BusMaster> Task<Ssd1306<B>> for Initialize {
    fn resume(&mut self, dev: &mut Ssd1306<B>) -> Outcome {
        while let Some(&step) = self.steps.get(self.index) {
            let acked = spawn!(&mut self.current, dev, || {
                WriteCommand::new(step.command, step.args)
            });

            #[cfg(feature = "defmt")]
            if !acked {
                defmt::warn!(
                    "Init step {} ({=u8:#x}) not acknowledged",
                    self.index,
                    step.command
                );
            }

            self.ok &= acked;
            self.index += 1;
        }

        let ok = self.ok;
        self.index = 0;
        self.ok = true;

        #[cfg(feature = "defmt")]
        defmt::debug!("Display init finished, ok={}", ok);

        Outcome::finished(ok)
    }
}

// ── Frame transfer ───────────────────────────────────────────────────────

/// Issue a full frame transfer without waiting for it
#[derive(Debug)]
pub struct StartWriteDisplay<'f> {
    frame: &'f FrameBuffer,
}

impl<'f> StartWriteDisplay<'f> {
    pub(crate) fn new(frame: &'f FrameBuffer) -> Self {
        Self { frame }
    }
}

impl<'f, B: BusMaster> Task<Ssd1306<B>> for StartWriteDisplay<'f> {
    fn resume(&mut self, dev: &mut Ssd1306<B>) -> Outcome {
        wait_until!(dev.try_start_frame(self.frame).is_some());
        Outcome::Success
    }
}

/// Full frame transfer, waiting for its completion
#[derive(Debug)]
pub struct WriteDisplay<'f> {
    frame: &'f FrameBuffer,
    phase: Phase,
}

impl<'f> WriteDisplay<'f> {
    pub(crate) fn new(frame: &'f FrameBuffer) -> Self {
        Self {
            frame,
            phase: Phase::Start,
        }
    }
}

impl<'f, B: BusMaster> Task<Ssd1306<B>> for WriteDisplay<'f> {
    fn resume(&mut self, dev: &mut Ssd1306<B>) -> Outcome {
        let ticket = match self.phase {
            Phase::Await(ticket) => ticket,
            Phase::Start => wait_for!(dev.try_start_frame(self.frame)),
        };
        await_completion(&mut self.phase, dev, ticket)
    }
}
