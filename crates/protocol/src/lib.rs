//! Wire types for the Beam link embed protocol.
//!
//! This crate contains the data shapes exchanged between a host page and the
//! embedded link flow: which remote origin serves the flow, the messages the
//! frame posts back to the host, and the legacy cookie strings the host may
//! write.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No DOM access and no session state
//! * 1:1 with the embed contract: Event names and query parameters match what
//!   the remote page expects
//! * Stable: Changes only when the embed contract changes
//!
//! The session controller that drives these types lives in `beam-link`.

pub mod cookie;
pub mod environment;
pub mod message;

pub use cookie::*;
pub use environment::*;
pub use message::*;
