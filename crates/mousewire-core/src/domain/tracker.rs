//! Position tracking: turning absolute targets into device record plans.
//!
//! The tracker owns the last known pointer position for one sender and the
//! screen bounds, and converts an absolute target coordinate into a
//! [`MovePlan`]: the ordered device records that walk the pointer there,
//! plus the position the tracker adopts once every record has been written.
//!
//! Planning and committing are separate steps so that one logical move maps
//! to exactly one position update, taken only after the whole record
//! sequence has reached the device. A failed write mid-sequence therefore
//! never leaves the tracker believing a move it only half-performed.

use tracing::debug;

use crate::domain::motion::decompose;
use crate::protocol::messages::DeviceRecord;
use serde::{Deserialize, Serialize};

/// Inclusive upper bounds of the addressable screen area.
///
/// Fixed for the process lifetime and only meaningful in absolute mode.
/// There is deliberately no lower bound: targets are clamped against
/// `max_x`/`max_y` only, and negative targets pass through unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub max_x: i32,
    pub max_y: i32,
}

/// Last known pointer position for one sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

/// A fully decomposed move: the records to write, in order, and the
/// position the tracker owns once all of them have been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Device records in emission order.
    pub records: Vec<DeviceRecord>,
    /// Position to commit after the final record is written.
    pub end: PointerPosition,
}

/// Per-sender pointer position tracker (absolute mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTracker {
    bounds: ScreenBounds,
    pos: PointerPosition,
    max_step: i32,
}

impl PositionTracker {
    /// Creates a tracker at the origin.
    ///
    /// `max_step` bounds the magnitude of every planned step and must fit a
    /// signed byte (1..=127); the bridge validates this at configuration
    /// time.
    pub fn new(bounds: ScreenBounds, max_step: i32) -> Self {
        debug_assert!(
            (1..=i32::from(i8::MAX)).contains(&max_step),
            "max_step must fit a signed byte"
        );
        Self {
            bounds,
            pos: PointerPosition::default(),
            max_step,
        }
    }

    /// Returns the tracked position.
    pub fn position(&self) -> PointerPosition {
        self.pos
    }

    /// Plans the move from the tracked position to `(target_x, target_y)`.
    ///
    /// Targets are clamped to the screen bounds on the upper side only.
    /// A requested target of exactly `(0, 0)` is the forced return to the
    /// origin used when a session starts: its walk is computed from the
    /// screen bounds rather than from the tracked position, so it reaches
    /// the top-left corner from wherever the physical pointer happens to
    /// be.
    ///
    /// The per-axis step runs are zipped positionally, the shorter axis
    /// padded with zero steps, and `buttons` is carried on every record of
    /// the move.
    ///
    /// Does not mutate the tracker; call [`commit_move`](Self::commit_move)
    /// once the plan's records have all been written.
    pub fn plan_move(&self, target_x: i32, target_y: i32, buttons: i8) -> MovePlan {
        let clamped_x = target_x.min(self.bounds.max_x);
        let clamped_y = target_y.min(self.bounds.max_y);

        let (from_x, from_y) = if target_x == 0 && target_y == 0 {
            debug!(
                from_x = self.bounds.max_x,
                from_y = self.bounds.max_y,
                "planning return to origin from screen bounds"
            );
            (self.bounds.max_x, self.bounds.max_y)
        } else {
            debug!(
                from_x = self.pos.x,
                from_y = self.pos.y,
                to_x = clamped_x,
                to_y = clamped_y,
                "planning move"
            );
            (self.pos.x, self.pos.y)
        };

        let x_steps = decompose(from_x, clamped_x, self.max_step);
        let y_steps = decompose(from_y, clamped_y, self.max_step);

        let longest = x_steps.len().max(y_steps.len());
        let mut records = Vec::with_capacity(longest);
        for i in 0..longest {
            let dx = x_steps.get(i).copied().unwrap_or(0);
            let dy = y_steps.get(i).copied().unwrap_or(0);
            // Steps are bounded by max_step, which new() requires to fit i8.
            records.push(DeviceRecord {
                buttons,
                dx: dx as i8,
                dy: dy as i8,
            });
        }

        MovePlan {
            records,
            end: PointerPosition {
                x: clamped_x,
                y: clamped_y,
            },
        }
    }

    /// Adopts the plan's end position as the tracked position.
    ///
    /// Call exactly once per plan, after every record in it has been
    /// written to the device.
    pub fn commit_move(&mut self, plan: &MovePlan) {
        self.pos = plan.end;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
