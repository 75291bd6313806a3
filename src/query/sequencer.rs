use std::collections::BTreeSet;

use super::RequestDescriptor;
use crate::state::QueryState;

/// Sequence bookkeeping of the query synchronizer.
///
/// Last-sequence-wins: a response may only be applied when its sequence
/// number is the highest issued. Outstanding calls are never cancelled;
/// their effect is discarded.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: u64,
    in_flight: BTreeSet<u64>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number and freeze `state` into a descriptor.
    pub fn issue(&mut self, state: &QueryState) -> RequestDescriptor {
        self.issued += 1;
        self.in_flight.insert(self.issued);
        RequestDescriptor::new(self.issued, state.clone())
    }

    /// Record that the call for `seq` resolved. Returns whether it is still current.
    pub fn complete(&mut self, seq: u64) -> bool {
        self.in_flight.remove(&seq);
        self.is_current(seq)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.issued
    }

    /// Make every outstanding descriptor stale without issuing a new one.
    pub fn retire(&mut self) {
        self.issued += 1;
        self.in_flight.clear();
    }

    /// True while the current descriptor's call is unresolved.
    pub fn is_loading(&self) -> bool {
        self.in_flight.contains(&self.issued)
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
