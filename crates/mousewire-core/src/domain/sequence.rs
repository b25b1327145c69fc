//! Per-sender sequence tracking.
//!
//! # Why track sequence numbers? (for beginners)
//!
//! Datagrams may arrive out of order, duplicated, or not at all. Each report
//! carries a per-sender counter so the bridge can tell a fresh update from a
//! stale one. The policy favors availability over completeness:
//!
//! - **Stale or duplicate** reports are dropped, because applying them would
//!   walk the pointer back to a position the sender has already moved past.
//! - **Gaps** are logged and the newest report is applied anyway; missed
//!   reports are never retried or requested again.
//! - The maximum counter value is an explicit **wrap marker**: the report is
//!   applied and tracking restarts at zero, letting long-lived senders roll
//!   their counter over cleanly.
//!
//! Tracking starts at zero, so the first report a fresh sender can get
//! applied is sequence number 1; a report numbered 0 is indistinguishable
//! from a duplicate of the implicit baseline and is dropped.

use crate::protocol::messages::SEQ_WRAP_MARKER;

/// Classification of one inbound report against the tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceVerdict {
    /// Exactly the next expected number; apply the movement.
    InOrder,
    /// Stale or duplicate; drop the report without applying it.
    OutOfOrder {
        /// The last accepted sequence number, unchanged.
        last: u16,
    },
    /// Jumped past one or more missing reports; apply the movement, the
    /// missing reports are not replayed.
    Gap {
        /// The last accepted sequence number before the jump.
        last: u16,
        /// How far the counter jumped.
        size: u16,
    },
    /// The explicit wrap marker; apply the movement and restart tracking
    /// at zero.
    WrapReset,
}

/// Sequence tracking state machine for one sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceGuard {
    last: u16,
}

impl SequenceGuard {
    /// Creates a guard at the implicit baseline of zero.
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Returns the last accepted sequence number.
    pub fn last_seq(&self) -> u16 {
        self.last
    }

    /// Classifies `seq` and advances the tracking state in the same step.
    ///
    /// Stale reports are rejected before any other classification, and the
    /// wrap marker takes precedence over gap detection: a marker arriving
    /// after a loss burst still resets tracking rather than being recorded
    /// as a plain gap.
    pub fn observe(&mut self, seq: u16) -> SequenceVerdict {
        let delta = i32::from(seq) - i32::from(self.last);

        if delta < 1 {
            return SequenceVerdict::OutOfOrder { last: self.last };
        }
        if seq == SEQ_WRAP_MARKER {
            self.last = 0;
            return SequenceVerdict::WrapReset;
        }
        if delta > 1 {
            let verdict = SequenceVerdict::Gap {
                last: self.last,
                size: delta as u16,
            };
            self.last = seq;
            return verdict;
        }
        self.last = seq;
        SequenceVerdict::InOrder
    }
}

impl Default for SequenceGuard {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
