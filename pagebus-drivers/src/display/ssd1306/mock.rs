//! Deterministic bus master for host tests
//!
//! Completes one transfer at a time after a fixed number of polls, can nack
//! a chosen transfer, refuse start requests, or stall forever. Every
//! accepted transfer is logged in order.

use heapless::{Deque, Vec};
use pagebus_hal::{BusMaster, Completion, OperationId, Transfer};

/// Leading bytes kept per logged transfer
pub const HEAD_LEN: usize = 14;

/// One accepted transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tag: OperationId,
    pub address: u8,
    pub len: usize,
    pub head: Vec<u8, HEAD_LEN>,
}

impl Record {
    /// Command byte of a command write
    pub fn command(&self) -> Option<u8> {
        match self.tag {
            OperationId::Command(_) => self.head.get(1).copied(),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockBus {
    /// Accepted transfers, in order
    pub log: Vec<Record, 64>,
    /// Polls before the in-flight transfer completes
    pub latency: u8,
    /// Log index of the transfer to nack
    pub nack_at: Option<usize>,
    /// Upcoming start requests to refuse
    pub refuse: u8,
    /// Never complete anything
    pub stalled: bool,
    /// Set if a start arrived while a transfer was in flight
    pub overlap: bool,
    in_flight: Option<OperationId>,
    countdown: u8,
    injected: Deque<Completion, 4>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: u8) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Queue a completion that was never requested
    pub fn inject(&mut self, completion: Completion) {
        let _ = self.injected.push_back(completion);
    }

    /// Command bytes of all logged command writes, in order
    pub fn commands(&self) -> Vec<u8, 64> {
        self.log.iter().filter_map(Record::command).collect()
    }
}

impl BusMaster for MockBus {
    fn start_transaction(&mut self, transfer: Transfer<'_>) -> bool {
        if self.refuse > 0 {
            self.refuse -= 1;
            return false;
        }
        if self.in_flight.is_some() {
            self.overlap = true;
            return false;
        }

        let mut head = Vec::new();
        let keep = transfer.bytes.len().min(HEAD_LEN);
        let _ = head.extend_from_slice(&transfer.bytes[..keep]);
        let record = Record {
            tag: transfer.tag,
            address: transfer.address.get(),
            len: transfer.bytes.len(),
            head,
        };
        if self.log.push(record).is_err() {
            return false;
        }

        self.in_flight = Some(transfer.tag);
        self.countdown = self.latency;
        true
    }

    fn poll_completion(&mut self) -> Option<Completion> {
        if let Some(completion) = self.injected.pop_front() {
            return Some(completion);
        }
        if self.stalled {
            return None;
        }

        let tag = self.in_flight?;
        if self.countdown > 0 {
            self.countdown -= 1;
            return None;
        }

        self.in_flight = None;
        let index = self.log.len() - 1;
        if self.nack_at == Some(index) {
            Some(Completion::nacked(tag))
        } else {
            Some(Completion::acked(tag))
        }
    }
}
