//! Cooperative task engine for non-blocking device drivers
//!
//! This crate contains the board-agnostic machinery that drivers build
//! their operations on:
//!
//! - Resumable tasks and their outcomes
//! - Suspension primitives (`wait_until!`, `wait_while!`, `wait_for!`, `spawn!`)
//! - Operation handles that bind a task to its driver
//! - Watchdog supervision for operations that stall

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod safety;
pub mod task;

pub use safety::{Verdict, Watchdog};
pub use task::{Outcome, Task, TaskHandle};
