use std::collections::VecDeque;

use outbreak_shared::{sequence_greater_than, MoveInput, SequenceNum, Vec2};

/// One locally-simulated step: the input applied and the position it
/// produced. The position is what an authoritative ack is compared against
/// during reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct InputRecord {
    pub seq: SequenceNum,
    pub input: MoveInput,
    pub position: Vec2,
}

/// Bounded replay log keyed by sequence number. Oldest entries are evicted
/// when full; staleness beyond buffer depth is accepted precision loss, not
/// an error.
pub struct InputBuffer {
    records: VecDeque<InputRecord>,
    capacity: usize,
}

impl InputBuffer {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a step. Sequence numbers must arrive in increasing order;
    /// the caller owns the counter.
    pub fn push(&mut self, record: InputRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn contains(&self, seq: SequenceNum) -> bool {
        self.records.iter().any(|r| r.seq == seq)
    }

    /// Drops every record at or before `seq` (wrapping compare). After an
    /// acknowledgment the entries that remain are exactly the inputs still
    /// unconfirmed by the server.
    pub fn drop_through(&mut self, seq: SequenceNum) {
        while let Some(front) = self.records.front() {
            if sequence_greater_than(front.seq, seq) {
                break;
            }
            self.records.pop_front();
        }
    }

    /// Unacknowledged records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &InputRecord> {
        self.records.iter()
    }
}
