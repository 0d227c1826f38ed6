//! Pagebus Hardware Abstraction Layer
//!
//! This crate defines the boundary between a display driver and the bus
//! master that physically moves its bytes. Drivers never talk to the bus
//! directly: they hand a [`Transfer`] to a [`BusMaster`] and later receive a
//! [`Completion`] tagged with the [`OperationId`] that issued it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Driver (pagebus-drivers)               │
//! └─────────────────────────────────────────┘
//!                     │ TransactionAdapter
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pagebus-hal (this crate - BusMaster)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  BlockingBus  │       │ DMA / IRQ bus │
//! │ (embedded-hal)│       │ (board crate) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Types
//!
//! - [`i2c::BusMaster`] - Non-blocking transaction collaborator
//! - [`adapter::TransactionAdapter`] - One outstanding transfer per buffer
//! - [`blocking::BlockingBus`] - Reference bus master over `embedded-hal`

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod blocking;
pub mod i2c;

// Re-export key types at crate root for convenience
pub use adapter::TransactionAdapter;
pub use blocking::BlockingBus;
pub use i2c::{Address, AddressError, BusFault, BusMaster, Completion, OperationId, Transfer};
