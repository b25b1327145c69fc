//! # mousewire-bridge
//!
//! The MouseWire daemon: receives pointer reports over UDP and re-emits
//! them as fixed-size records written to a local HID mouse device file.
//!
//! The crate is split the same way as the rest of the workspace:
//!
//! - **`application`** - the session loop, written against the
//!   [`application::session::DatagramSource`] and
//!   [`application::session::RecordSink`] traits so it can be driven by
//!   test doubles.
//! - **`infrastructure`** - the real collaborators: the UDP socket, the
//!   HID device file, and the TOML configuration loader.

pub mod application;
pub mod infrastructure;
