//! # mousewire-core
//!
//! Shared library for MouseWire containing the datagram codec and the
//! pointer-motion domain logic.
//!
//! MouseWire is a network-to-device bridge: remote senders report pointer
//! movement over a compact UDP protocol, and the bridge re-emits it as
//! fixed-size binary records written to a local HID mouse device file.
//! This crate is the pure half of that system. It defines:
//!
//! - **`protocol`** - the wire formats. Absolute reports carry a target
//!   coordinate and button mask; relative reports carry one pre-quantized
//!   step; both decode into typed structs, and every emitted step is
//!   serialized as a 3-byte device record.
//!
//! - **`domain`** - the movement rules. [`domain::motion::decompose`]
//!   splits a coordinate delta into bounded steps, the
//!   [`PositionTracker`] turns targets into ordered record plans against
//!   the screen bounds, and the [`SequenceGuard`] classifies each report
//!   as in-order, stale, gapped, or wrapped.
//!
//! It has zero dependencies on OS APIs, sockets, or the filesystem; the
//! `mousewire-bridge` crate supplies those at its edges.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `mousewire_core::SequenceGuard` instead of the full module path.
pub use domain::sequence::{SequenceGuard, SequenceVerdict};
pub use domain::tracker::{MovePlan, PointerPosition, PositionTracker, ScreenBounds};
pub use domain::SenderId;
pub use protocol::codec::{decode_report, DecodeError};
pub use protocol::messages::{
    AbsoluteReport, DeviceRecord, PointerReport, ProtocolMode, RelativeReport,
};
