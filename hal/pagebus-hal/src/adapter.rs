//! Transaction adapter
//!
//! Pairs a target address with one buffer and tracks whether a transfer
//! through it is still outstanding. A driver keeps one adapter per buffer
//! it writes from.

use crate::i2c::{Address, BusMaster, OperationId, Transfer};

/// One outstanding bus transfer at a time
///
/// Lifecycle: `configure_*` → [`start`](Self::start) → busy until
/// [`complete`](Self::complete) is called for the matching completion.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionAdapter {
    address: Address,
    /// Length bound by the last successful configure call
    pending: Option<usize>,
    busy: bool,
}

impl TransactionAdapter {
    /// Create an idle adapter for a device
    pub const fn new(address: Address) -> Self {
        Self {
            address,
            pending: None,
            busy: false,
        }
    }

    /// Target address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Bind a write of `length` bytes
    ///
    /// Fails while a transfer is outstanding; the caller simply tries again
    /// on its next tick.
    pub fn configure_write(&mut self, length: usize) -> bool {
        if self.busy {
            return false;
        }
        self.pending = Some(length);
        true
    }

    /// Bind a zero-length address probe
    pub fn configure_ping(&mut self) -> bool {
        self.configure_write(0)
    }

    /// Check if a transfer is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Length bound by the last configure call, if not yet started
    pub fn pending_len(&self) -> Option<usize> {
        self.pending
    }

    /// Hand the configured transfer to the bus master
    ///
    /// `buffer` must hold at least the configured length. Returns `false`
    /// without side effects if nothing is configured, the buffer is too
    /// short, or the bus master refuses the request.
    pub fn start<B>(&mut self, bus: &mut B, buffer: &[u8], tag: OperationId) -> bool
    where
        B: BusMaster + ?Sized,
    {
        if self.busy {
            return false;
        }
        let Some(length) = self.pending else {
            return false;
        };
        let Some(bytes) = buffer.get(..length) else {
            return false;
        };

        let transfer = Transfer {
            address: self.address,
            bytes,
            tag,
        };
        if !bus.start_transaction(transfer) {
            return false;
        }

        self.pending = None;
        self.busy = true;
        true
    }

    /// Mark the outstanding transfer as finished
    pub fn complete(&mut self) {
        self.busy = false;
    }
}
