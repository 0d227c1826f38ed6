//! Display controller drivers
//!
//! This crate provides concrete drivers built on the resumable task engine
//! in pagebus-core and the bus boundary in pagebus-hal:
//!
//! - SSD1306 128x64 monochrome OLED controller over I2C

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
