//! Serial link protocol between the interface node and the control node.
//!
//! The link is half-duplex and carries single command bytes optionally
//! followed by fixed five-byte digit payloads. There are no length prefixes
//! and no checksums; the only synchronization is the rendezvous in
//! [`Link::wait_for`], where a node discards bytes until one specific marker
//! arrives.

pub mod codec;
pub mod commands;
pub mod link;
pub mod message;

pub use codec::LinkCodec;
pub use commands::CommandCode;
pub use link::{Link, LinkConfig};
pub use message::Message;
