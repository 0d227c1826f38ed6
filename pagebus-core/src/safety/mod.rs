//! Operation supervision
//!
//! Timeouts are an external responsibility: this module holds the
//! supervisor that abandons operations which stop making progress.

pub mod watchdog;

pub use watchdog::{block_on, Verdict, Watchdog, DEFAULT_BUDGET_TICKS};
