//! Seams between the session controller and the host document.
//!
//! A [`Document`] creates the overlay/iframe pair and subscribes to the window
//! message channel. The browser implementation lives in the web extension
//! crate; [`FakeDocument`](crate::fake_document::FakeDocument) backs the tests.

use std::rc::Rc;

use serde_json::Value;

use crate::error::Result;
use crate::frame::FrameSpec;

/// Display state shared by the overlay and the iframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
	#[default]
	Hidden,
	Shown,
}

impl Visibility {
	/// Returns the opposite state.
	pub fn toggled(self) -> Self {
		match self {
			Self::Hidden => Self::Shown,
			Self::Shown => Self::Hidden,
		}
	}

	/// CSS `display` value for this state.
	pub fn display(self) -> &'static str {
		match self {
			Self::Hidden => "none",
			Self::Shown => "block",
		}
	}
}

/// A message delivered over the window message channel.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
	/// Origin of the sending browsing context.
	pub origin: String,
	/// Posted data, converted to JSON.
	pub data: Value,
}

/// Callback registered on the window message channel.
pub type MessageHandler = Rc<dyn Fn(InboundMessage)>;

/// Handles to one mounted overlay/iframe pair.
pub trait ModalElements {
	/// Sets `display` on the overlay and the iframe in one step.
	fn set_visibility(&self, visibility: Visibility);

	/// Detaches both elements from the document.
	fn remove(&self);
}

/// The host document the modal is mounted into.
pub trait Document {
	/// Element handles returned by [`Document::insert_modal`].
	type Elements: ModalElements;
	/// Listener guard; dropping it detaches the handler.
	type Listener;

	/// Creates the overlay and iframe described by `frame`, hidden, and
	/// appends the overlay to the document body.
	fn insert_modal(&self, frame: &FrameSpec) -> Result<Self::Elements>;

	/// Subscribes `handler` to the window message channel.
	fn listen(&self, handler: MessageHandler) -> Result<Self::Listener>;

	/// Writes a `document.cookie` assignment.
	fn set_cookie(&self, cookie: &str);

	/// Current wall-clock time in milliseconds.
	fn now_ms(&self) -> u64;
}
