//! Cooperative resumable tasks
//!
//! A task is a multi-step procedure that the host's run loop resumes once
//! per tick. Each resume runs until the next suspension point and returns
//! an [`Outcome`]; nothing ever blocks the calling thread.
//!
//! Tasks keep their continuation in their own state (typically a small
//! step enum) and borrow everything else from a context `C` for the
//! duration of a single resume. Suspension points are written with
//! [`wait_until!`], [`wait_while!`], [`wait_for!`] and [`spawn!`]:
//!
//! ```ignore
//! fn resume(&mut self, dev: &mut Device) -> Outcome {
//!     if self.step == Step::Start {
//!         wait_until!(dev.try_start());
//!         self.step = Step::Wait;
//!     }
//!     wait_while!(dev.in_flight());
//!     self.step = Step::Start;
//!     Outcome::finished(dev.acknowledged())
//! }
//! ```
//!
//! [`wait_until!`]: crate::wait_until
//! [`wait_while!`]: crate::wait_while
//! [`wait_for!`]: crate::wait_for
//! [`spawn!`]: crate::spawn

pub mod outcome;

pub use outcome::Outcome;

/// A resumable procedure over a context `C`
///
/// Resuming a suspended task with unchanged external state must not move it
/// past its suspension point. Resuming a task that already returned a
/// terminal outcome starts it over.
pub trait Task<C: ?Sized> {
    /// Run until the next suspension point or the end of the sequence
    fn resume(&mut self, cx: &mut C) -> Outcome;
}

impl<C: ?Sized, T: Task<C> + ?Sized> Task<C> for &mut T {
    fn resume(&mut self, cx: &mut C) -> Outcome {
        (**self).resume(cx)
    }
}

/// Suspend the enclosing resume until `cond` holds
///
/// `cond` is evaluated on every resume; its side effects only count once
/// it evaluates to `true`.
#[macro_export]
macro_rules! wait_until {
    ($cond:expr) => {
        if !($cond) {
            return $crate::task::Outcome::Running;
        }
    };
}

/// Suspend the enclosing resume while `cond` holds
#[macro_export]
macro_rules! wait_while {
    ($cond:expr) => {
        if $cond {
            return $crate::task::Outcome::Running;
        }
    };
}

/// Suspend the enclosing resume until `opt` yields a value, then evaluate
/// to that value
#[macro_export]
macro_rules! wait_for {
    ($opt:expr) => {
        match $opt {
            ::core::option::Option::Some(value) => value,
            ::core::option::Option::None => return $crate::task::Outcome::Running,
        }
    };
}

/// Drive a nested task held in `$slot` to its terminal outcome
///
/// Suspends the enclosing resume while the subtask runs and evaluates to
/// `true` if it succeeded. `$make` builds the subtask when the slot is empty.
#[macro_export]
macro_rules! spawn {
    ($slot:expr, $cx:expr, $make:expr) => {
        match $crate::task::spawn($slot, $cx, $make) {
            ::core::option::Option::Some(success) => success,
            ::core::option::Option::None => return $crate::task::Outcome::Running,
        }
    };
}

/// Resume the subtask in `slot` once
///
/// Returns `None` while it is running. Once it reaches a terminal outcome the
/// slot is cleared and the result is returned, so the next call spawns a
/// fresh subtask.
pub fn spawn<C, T, F>(slot: &mut Option<T>, cx: &mut C, make: F) -> Option<bool>
where
    C: ?Sized,
    T: Task<C>,
    F: FnOnce() -> T,
{
    let outcome = slot.get_or_insert_with(make).resume(cx);
    let result = outcome.result();
    if result.is_some() {
        *slot = None;
    }
    result
}

/// A task bound to the context it operates on
///
/// Holding the exclusive borrow means no other handle can be created on the
/// same context while this one is alive. Between resumes the context is
/// only reachable through a shared reference, so nothing else can be
/// resumed on it either:
///
/// ```compile_fail
/// use pagebus_core::task::{Outcome, Task, TaskHandle};
///
/// struct Nop;
/// impl Task<u8> for Nop {
///     fn resume(&mut self, _: &mut u8) -> Outcome {
///         Outcome::Success
///     }
/// }
///
/// let mut cx = 0u8;
/// let handle = TaskHandle::new(&mut cx, Nop);
/// Nop.resume(handle.context());
/// ```
pub struct TaskHandle<'c, C: ?Sized, T> {
    cx: &'c mut C,
    task: T,
    last: Outcome,
}

impl<'c, C, T> TaskHandle<'c, C, T>
where
    C: ?Sized,
    T: Task<C>,
{
    /// Bind a task to its context
    pub fn new(cx: &'c mut C, task: T) -> Self {
        Self {
            cx,
            task,
            last: Outcome::Running,
        }
    }

    /// Resume the task once (one scheduler tick)
    pub fn resume(&mut self) -> Outcome {
        self.last = self.task.resume(self.cx);
        self.last
    }

    /// Outcome of the most recent resume
    pub fn last(&self) -> Outcome {
        self.last
    }

    /// Shared access to the context between ticks
    pub fn context(&self) -> &C {
        self.cx
    }

    /// The task state
    pub fn task(&self) -> &T {
        &self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Context: a flag cleared from "outside" and a progress log
    #[derive(Default)]
    struct Bench {
        ready: bool,
        busy: Cell<bool>,
        started: u8,
    }

    #[derive(Default)]
    enum Step {
        #[default]
        Start,
        Wait,
    }

    /// Start when ready, then wait for busy to clear
    #[derive(Default)]
    struct Job {
        step: Step,
    }

    impl Task<Bench> for Job {
        fn resume(&mut self, cx: &mut Bench) -> Outcome {
            if let Step::Start = self.step {
                wait_until!(cx.ready && {
                    cx.started += 1;
                    cx.busy.set(true);
                    true
                });
                self.step = Step::Wait;
            }
            wait_while!(cx.busy.get());
            self.step = Step::Start;
            Outcome::Success
        }
    }

    /// Spawns two jobs back to back
    #[derive(Default)]
    struct Pair {
        done: u8,
        sub: Option<Job>,
    }

    impl Task<Bench> for Pair {
        fn resume(&mut self, cx: &mut Bench) -> Outcome {
            while self.done < 2 {
                let ok = spawn!(&mut self.sub, cx, Job::default);
                assert!(ok);
                self.done += 1;
                cx.ready = true;
            }
            self.done = 0;
            Outcome::Success
        }
    }

    #[test]
    fn test_wait_until_does_not_advance() {
        let mut bench = Bench::default();
        let mut job = Job::default();

        for _ in 0..5 {
            assert_eq!(job.resume(&mut bench), Outcome::Running);
        }
        assert_eq!(bench.started, 0);

        bench.ready = true;
        assert_eq!(job.resume(&mut bench), Outcome::Running);
        assert_eq!(job.resume(&mut bench), Outcome::Running);
        assert_eq!(bench.started, 1);

        bench.busy.set(false);
        assert_eq!(job.resume(&mut bench), Outcome::Success);
    }

    #[test]
    fn test_terminal_task_restarts() {
        let mut bench = Bench {
            ready: true,
            ..Default::default()
        };
        let mut job = Job::default();

        assert_eq!(job.resume(&mut bench), Outcome::Running);
        bench.busy.set(false);
        assert_eq!(job.resume(&mut bench), Outcome::Success);

        assert_eq!(job.resume(&mut bench), Outcome::Running);
        assert_eq!(bench.started, 2);
    }

    #[test]
    fn test_spawn_runs_subtasks_in_order() {
        let mut bench = Bench {
            ready: true,
            ..Default::default()
        };
        let mut handle = TaskHandle::new(&mut bench, Pair::default());

        assert_eq!(handle.resume(), Outcome::Running);
        assert_eq!(handle.context().started, 1);

        // First job still waiting: no second start
        assert_eq!(handle.resume(), Outcome::Running);
        assert_eq!(handle.context().started, 1);

        handle.context().busy.set(false);
        assert_eq!(handle.resume(), Outcome::Running);
        assert_eq!(handle.context().started, 2);

        handle.context().busy.set(false);
        assert_eq!(handle.resume(), Outcome::Success);
        assert_eq!(handle.last(), Outcome::Success);
        assert!(handle.task().sub.is_none());
    }

    #[test]
    fn test_wait_for_yields_value() {
        fn take(slot: &mut Option<u8>, out: &mut u8) -> Outcome {
            *out = wait_for!(slot.take());
            Outcome::Success
        }

        let mut slot = None;
        let mut out = 0;
        assert_eq!(take(&mut slot, &mut out), Outcome::Running);
        assert_eq!(out, 0);

        slot = Some(7);
        assert_eq!(take(&mut slot, &mut out), Outcome::Success);
        assert_eq!(out, 7);
    }

    #[test]
    fn test_spawn_reports_and_clears() {
        struct Never;
        impl Task<()> for Never {
            fn resume(&mut self, _: &mut ()) -> Outcome {
                Outcome::Stopped
            }
        }

        let mut slot = None;
        assert_eq!(spawn(&mut slot, &mut (), || Never), Some(false));
        assert!(slot.is_none());
    }
}
