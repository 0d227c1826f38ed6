//! Tick-budget watchdog
//!
//! Tasks never time out on their own: a stalled bus leaves an operation
//! suspended forever. The watchdog is the external supervisor that decides
//! when to give up on one.

use crate::task::{Outcome, Task, TaskHandle};

/// Default budget: 2 s of ticks at 1 kHz
pub const DEFAULT_BUDGET_TICKS: u32 = 2000;

/// Supervisor verdict after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Still running within budget
    Pending,
    /// Reached a terminal outcome; `true` on success
    Finished(bool),
    /// Budget exhausted before a terminal outcome
    Expired,
}

/// Counts resumes of one operation and expires it after a fixed budget
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Watchdog {
    /// Maximum number of resumes allowed
    budget: u32,
    /// Resumes so far
    ticks: u32,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_TICKS)
    }
}

impl Watchdog {
    /// Create a watchdog allowing `budget` resumes
    pub const fn new(budget: u32) -> Self {
        Self { budget, ticks: 0 }
    }

    /// Resumes spent so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Check if the budget is used up
    pub fn is_expired(&self) -> bool {
        self.ticks >= self.budget
    }

    /// Start counting from zero again
    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Resume the operation once and judge it
    ///
    /// An expired watchdog does not resume the operation again.
    pub fn drive<C, T>(&mut self, handle: &mut TaskHandle<'_, C, T>) -> Verdict
    where
        C: ?Sized,
        T: Task<C>,
    {
        if self.is_expired() {
            return Verdict::Expired;
        }

        self.ticks += 1;
        match handle.resume().result() {
            Some(success) => Verdict::Finished(success),
            None if self.is_expired() => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Operation abandoned after {} ticks", self.ticks);
                Verdict::Expired
            }
            None => Verdict::Pending,
        }
    }

    /// Drive the operation until it finishes or the budget runs out
    ///
    /// `between` runs after every tick that left the operation pending and
    /// stands in for the rest of the run loop. It only sees the context.
    pub fn run<C, T, F>(&mut self, handle: &mut TaskHandle<'_, C, T>, mut between: F) -> Verdict
    where
        C: ?Sized,
        T: Task<C>,
        F: FnMut(&C),
    {
        loop {
            match self.drive(handle) {
                Verdict::Pending => between(handle.context()),
                verdict => return verdict,
            }
        }
    }
}

/// Resume a bare task until it reaches a terminal outcome, with no budget
///
/// Only for contexts that are known to make progress (host tests, a bus
/// that always completes).
pub fn block_on<C, T, F>(task: &mut T, cx: &mut C, mut between: F) -> bool
where
    C: ?Sized,
    T: Task<C>,
    F: FnMut(&C),
{
    loop {
        match task.resume(cx) {
            Outcome::Running => between(&*cx),
            outcome => return outcome.is_success(),
        }
    }
}
