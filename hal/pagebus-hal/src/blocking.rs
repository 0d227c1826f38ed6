//! Reference bus master over a blocking `embedded-hal` I2C peripheral
//!
//! The write runs to completion inside `start_transaction`; its result is
//! reported on the next `poll_completion`. This keeps drivers portable to
//! boards without an interrupt-driven I2C, at the cost of the bus time
//! being spent inside the start call.

use embedded_hal::i2c::{Error as _, I2c};

use crate::i2c::{BusFault, BusMaster, Completion, Transfer};

/// Bus master that executes each transfer synchronously
pub struct BlockingBus<I2C> {
    i2c: I2C,
    /// Result of the last transfer, not yet collected by the driver
    completed: Option<Completion>,
    last_fault: Option<BusFault>,
}

impl<I2C> BlockingBus<I2C>
where
    I2C: I2c,
{
    /// Wrap an I2C peripheral
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            completed: None,
            last_fault: None,
        }
    }

    /// Fault reported by the most recent failed transfer
    pub fn last_fault(&self) -> Option<BusFault> {
        self.last_fault
    }

    /// Borrow the underlying peripheral
    pub fn inner(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Release the underlying peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> BusMaster for BlockingBus<I2C>
where
    I2C: I2c,
{
    fn start_transaction(&mut self, transfer: Transfer<'_>) -> bool {
        // One outstanding transfer: refuse until the driver has collected
        // the previous result
        if self.completed.is_some() {
            return false;
        }

        let completion = match self.i2c.write(transfer.address.get(), transfer.bytes) {
            Ok(()) => Completion::acked(transfer.tag),
            Err(e) => {
                let fault = BusFault::from(e.kind());
                #[cfg(feature = "defmt")]
                defmt::warn!("I2C write to {} failed: {}", transfer.address, fault);
                self.last_fault = Some(fault);
                Completion::nacked(transfer.tag)
            }
        };

        self.completed = Some(completion);
        true
    }

    fn poll_completion(&mut self) -> Option<Completion> {
        self.completed.take()
    }
}
