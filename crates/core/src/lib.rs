//! Embedded Beam link sessions.
//!
//! A host page hands a link token to a [`LinkSession`], which mounts a hidden
//! overlay with the remote flow in an iframe, reveals it on
//! [`LinkSession::open`], and routes the frame's completion messages to the
//! host's `on_success`/`on_exit` callbacks.
//!
//! The browser DOM sits behind the [`Document`] trait. The web extension crate
//! implements it with `web-sys`; [`FakeDocument`] implements it in memory.

pub mod document;
pub mod error;
pub mod fake_document;
pub mod frame;
pub mod modal;
pub mod options;
pub mod session;

pub use beam_link_protocol::{Environment, FrameEvent};
pub use document::{Document, InboundMessage, MessageHandler, ModalElements, Visibility};
pub use error::{Error, Result};
pub use fake_document::{FakeDocument, FakeDocumentBuilder, FakeDocumentController, FakeModal};
pub use frame::FrameSpec;
pub use modal::Modal;
pub use options::{LinkOptions, OriginPolicy};
pub use session::LinkSession;
