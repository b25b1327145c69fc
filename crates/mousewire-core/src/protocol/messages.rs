//! All MouseWire protocol report and record types.
//!
//! Two wire variants exist, selected by configuration: absolute reports carry
//! a target coordinate that the bridge decomposes into unit steps, relative
//! reports carry one pre-quantized step that is written through unchanged.
//! Both are translated into the same 3-byte device record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Size in bytes of an absolute-mode datagram.
pub const ABSOLUTE_REPORT_LEN: usize = 7;

/// Size in bytes of a relative-mode datagram.
pub const RELATIVE_REPORT_LEN: usize = 5;

/// Size in bytes of one record written to the HID device.
pub const DEVICE_RECORD_LEN: usize = 3;

/// Sequence number reserved as the explicit wrap marker: a report carrying
/// this value is applied and then resets sequence tracking to zero.
pub const SEQ_WRAP_MARKER: u16 = u16::MAX;

// ── Protocol variant ──────────────────────────────────────────────────────────

/// The two wire variants, chosen at startup for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolMode {
    /// Clients report an absolute target coordinate plus a button mask.
    Absolute,
    /// Clients report one pre-quantized step plus a button mask.
    Relative,
}

impl fmt::Display for ProtocolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolMode::Absolute => f.write_str("absolute"),
            ProtocolMode::Relative => f.write_str("relative"),
        }
    }
}

/// Error returned when parsing a [`ProtocolMode`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown protocol mode {0:?} (expected \"absolute\" or \"relative\")")]
pub struct ParseModeError(pub String);

impl FromStr for ProtocolMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(ProtocolMode::Absolute),
            "relative" => Ok(ProtocolMode::Relative),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

// ── Inbound reports ───────────────────────────────────────────────────────────

/// Decoded absolute-mode datagram: walk the pointer to `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteReport {
    /// Per-sender sequence number, wrapping at [`SEQ_WRAP_MARKER`].
    pub seq: u16,
    /// Target x coordinate; clamped against the screen bound on apply.
    pub x: i16,
    /// Target y coordinate; clamped against the screen bound on apply.
    pub y: i16,
    /// Button press mask carried on every record of the resulting move.
    pub buttons: i8,
}

/// Decoded relative-mode datagram: one step, already within device bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeReport {
    /// Per-sender sequence number, wrapping at [`SEQ_WRAP_MARKER`].
    pub seq: u16,
    /// Button press mask.
    pub buttons: i8,
    /// Horizontal step.
    pub dx: i8,
    /// Vertical step.
    pub dy: i8,
}

/// A decoded datagram of either variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerReport {
    Absolute(AbsoluteReport),
    Relative(RelativeReport),
}

impl PointerReport {
    /// Returns the report's sequence number regardless of variant.
    pub fn seq(&self) -> u16 {
        match self {
            PointerReport::Absolute(r) => r.seq,
            PointerReport::Relative(r) => r.seq,
        }
    }
}

// ── Device record ─────────────────────────────────────────────────────────────

/// One fixed-size record written to the HID device file.
///
/// The device interprets each 3-byte write as a single discrete pointer
/// event: a button mask and a signed step on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRecord {
    pub buttons: i8,
    pub dx: i8,
    pub dy: i8,
}

impl DeviceRecord {
    /// Serializes the record into its on-device byte layout.
    pub fn to_bytes(self) -> [u8; DEVICE_RECORD_LEN] {
        [self.buttons as u8, self.dx as u8, self.dy as u8]
    }

    /// Reconstructs a record from its on-device byte layout.
    pub fn from_bytes(bytes: [u8; DEVICE_RECORD_LEN]) -> Self {
        Self {
            buttons: bytes[0] as i8,
            dx: bytes[1] as i8,
            dy: bytes[2] as i8,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
