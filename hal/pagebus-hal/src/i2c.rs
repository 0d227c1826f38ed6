//! I2C bus abstractions
//!
//! Provides the non-blocking transaction contract between a display driver
//! and the bus master that executes its writes.

use core::fmt;

/// 7-bit I2C device address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Default SSD1306 address (SA0 pulled low)
    pub const SSD1306_PRIMARY: Self = Self(0x3C);

    /// Alternate SSD1306 address (SA0 pulled high)
    pub const SSD1306_SECONDARY: Self = Self(0x3D);

    /// Create an address, rejecting anything outside the 7-bit range
    pub const fn new(raw: u8) -> Result<Self, AddressError> {
        if raw > 0x7F {
            Err(AddressError::OutOfRange(raw))
        } else {
            Ok(Self(raw))
        }
    }

    /// Raw 7-bit value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Address {
    type Error = AddressError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// Invalid device address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Value does not fit in 7 bits
    OutOfRange(u8),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::OutOfRange(raw) => write!(f, "address {:#04x} exceeds 7 bits", raw),
        }
    }
}

/// Identity of the operation that owns the bus state of one driver
///
/// Command writes carry their command byte in a dedicated variant, so no
/// command value can ever collide with `Idle`, `Ping` or `WriteDisplay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationId {
    /// No transaction in flight
    #[default]
    Idle,
    /// Address probe
    Ping,
    /// Full frame transfer
    WriteDisplay,
    /// Command write, tagged with the command byte
    Command(u8),
}

impl OperationId {
    /// Check if no operation owns the bus state
    pub const fn is_idle(self) -> bool {
        matches!(self, OperationId::Idle)
    }
}

/// A write request handed to the bus master
///
/// `bytes` is only borrowed for the duration of
/// [`BusMaster::start_transaction`]. The caller is free to change them as
/// soon as that call returns, even while the transfer is still on the wire.
#[derive(Debug, Clone, Copy)]
pub struct Transfer<'a> {
    /// Target device
    pub address: Address,
    /// Bytes to put on the wire, in order
    pub bytes: &'a [u8],
    /// Operation that issued the transfer, echoed back on completion
    pub tag: OperationId,
}

/// Completion report for a finished transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Completion {
    /// Tag of the transfer that finished
    pub tag: OperationId,
    /// Every byte was acknowledged by the device
    pub acknowledged: bool,
}

impl Completion {
    /// Transfer finished and was acknowledged
    pub const fn acked(tag: OperationId) -> Self {
        Self {
            tag,
            acknowledged: true,
        }
    }

    /// Transfer finished without acknowledgment (nack, arbitration loss, ...)
    pub const fn nacked(tag: OperationId) -> Self {
        Self {
            tag,
            acknowledged: false,
        }
    }
}

/// Non-blocking I2C bus master
///
/// The driver starts a transfer and keeps resuming its operation; the bus
/// master reports the result later through [`poll_completion`]. Neither
/// method may wait for bus traffic.
///
/// # Buffer ownership
///
/// The transfer bytes are not borrowed past [`start_transaction`]. An
/// implementation that finishes the transfer later (interrupt or DMA
/// driven) must copy them into storage it owns before returning `true`;
/// for a frame write that is the full 1024 bytes. Implementations that
/// cannot hold a copy should finish synchronously, as
/// [`BlockingBus`](crate::BlockingBus) does, or refuse the request.
///
/// [`poll_completion`]: BusMaster::poll_completion
/// [`start_transaction`]: BusMaster::start_transaction
pub trait BusMaster {
    /// Request a transfer
    ///
    /// Returns `false` if the request was not accepted (bus occupied,
    /// queue full). The caller retries on a later tick.
    fn start_transaction(&mut self, transfer: Transfer<'_>) -> bool;

    /// Take the next completion report, if one is ready
    fn poll_completion(&mut self) -> Option<Completion>;
}

impl<T: BusMaster + ?Sized> BusMaster for &mut T {
    fn start_transaction(&mut self, transfer: Transfer<'_>) -> bool {
        (**self).start_transaction(transfer)
    }

    fn poll_completion(&mut self) -> Option<Completion> {
        (**self).poll_completion()
    }
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// Bus error (misplaced start/stop)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl From<embedded_hal::i2c::ErrorKind> for BusFault {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;

        match kind {
            ErrorKind::Bus => BusFault::Bus,
            ErrorKind::ArbitrationLoss => BusFault::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => BusFault::Nack,
            ErrorKind::Overrun => BusFault::Overrun,
            _ => BusFault::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    #[test]
    fn test_address_range() {
        assert_eq!(Address::new(0x3C), Ok(Address::SSD1306_PRIMARY));
        assert_eq!(Address::new(0x7F).map(Address::get), Ok(0x7F));
        assert_eq!(Address::new(0x80), Err(AddressError::OutOfRange(0x80)));
        assert!(Address::try_from(0xFF).is_err());
    }

    #[test]
    fn test_command_tag_never_aliases_sentinels() {
        // 0x00 and 0xAE are both real command bytes
        assert_ne!(OperationId::Command(0x00), OperationId::Idle);
        assert_ne!(OperationId::Command(0xAE), OperationId::Ping);
        assert!(!OperationId::Command(0x00).is_idle());
        assert!(OperationId::default().is_idle());
    }

    #[test]
    fn test_fault_mapping() {
        assert_eq!(
            BusFault::from(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            BusFault::Nack
        );
        assert_eq!(BusFault::from(ErrorKind::ArbitrationLoss), BusFault::ArbitrationLost);
        assert_eq!(BusFault::from(ErrorKind::Other), BusFault::Other);
    }
}
