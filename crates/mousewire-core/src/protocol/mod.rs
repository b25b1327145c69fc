//! Protocol module containing report types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_report, encode_absolute, encode_relative, DecodeError};
pub use messages::*;
