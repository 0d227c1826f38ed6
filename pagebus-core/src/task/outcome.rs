//! Result of resuming a task once

/// Where a task stands after one resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Suspended; resume again on a later tick
    Running,
    /// Ran to the end of its sequence without reaching the success exit
    ///
    /// Carries no cause. A bus nack ends an operation here; a stalled bus
    /// keeps it `Running` forever.
    Stopped,
    /// Reached its success exit
    Success,
}

impl Outcome {
    /// Check if the task has finished, one way or the other
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Running)
    }

    /// Check if the task finished successfully
    pub const fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Terminal outcome for a finished sequence
    pub const fn finished(success: bool) -> Self {
        if success {
            Outcome::Success
        } else {
            Outcome::Stopped
        }
    }

    /// `None` while running, otherwise whether it succeeded
    pub const fn result(self) -> Option<bool> {
        match self {
            Outcome::Running => None,
            Outcome::Stopped => Some(false),
            Outcome::Success => Some(true),
        }
    }
}
