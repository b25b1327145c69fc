//! Infrastructure services: the real datagram source, device sink, and
//! configuration storage behind the application layer's traits.

pub mod device;
pub mod network;
pub mod storage;
