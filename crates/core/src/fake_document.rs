//! In-memory document for testing the session controller without a browser.
//!
//! # Example
//!
//! ```ignore
//! let (document, controller) = FakeDocumentBuilder::new().build();
//! let session = LinkSession::new(document, options, on_success, on_exit);
//!
//! controller.post_event("https://beam.dev.ansiblelabs.xyz", &FrameEvent::Close);
//! assert_eq!(controller.modals()[0].overlay_display, "none");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use beam_link_protocol::FrameEvent;

use crate::document::{Document, InboundMessage, MessageHandler, ModalElements, Visibility};
use crate::error::{Error, Result};
use crate::frame::{FrameSpec, IFRAME_CLASS, IFRAME_STYLE, OVERLAY_CLASS, OVERLAY_STYLE, style_value};

/// Builder for creating fake document instances.
pub struct FakeDocumentBuilder {
	clock_start_ms: u64,
}

impl FakeDocumentBuilder {
	pub fn new() -> Self {
		Self {
			clock_start_ms: 1_700_000_000_000,
		}
	}

	/// Sets the first value returned by [`Document::now_ms`]; each call advances it by one.
	pub fn clock_start_ms(mut self, ms: u64) -> Self {
		self.clock_start_ms = ms;
		self
	}

	/// Build the fake document and return both it and a controller.
	///
	/// The [`FakeDocument`] is handed to the session; the
	/// [`FakeDocumentController`] stays with the test to post messages and
	/// inspect the document.
	pub fn build(self) -> (FakeDocument, FakeDocumentController) {
		let dom = Rc::new(RefCell::new(FakeDom {
			clock_ms: self.clock_start_ms,
			..Default::default()
		}));
		(FakeDocument { dom: Rc::clone(&dom) }, FakeDocumentController { dom })
	}
}

impl Default for FakeDocumentBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Snapshot of one overlay/iframe pair attached to the fake body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeModal {
	pub id: u64,
	pub src: String,
	pub name: String,
	pub overlay_class: &'static str,
	pub iframe_class: &'static str,
	pub overlay_display: &'static str,
	pub iframe_display: &'static str,
}

#[derive(Default)]
struct FakeDom {
	next_id: u64,
	clock_ms: u64,
	modals: Vec<FakeModal>,
	listeners: Vec<(u64, MessageHandler)>,
	cookies: Vec<String>,
	fail_insert: Option<String>,
	fail_listen: Option<String>,
}

impl FakeDom {
	fn next_id(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id
	}
}

/// Document half of the fake, implementing [`Document`].
pub struct FakeDocument {
	dom: Rc<RefCell<FakeDom>>,
}

impl Document for FakeDocument {
	type Elements = FakeElements;
	type Listener = FakeListener;

	fn insert_modal(&self, frame: &FrameSpec) -> Result<FakeElements> {
		let mut dom = self.dom.borrow_mut();
		if let Some(reason) = dom.fail_insert.take() {
			return Err(Error::Dom(reason));
		}

		let id = dom.next_id();
		dom.modals.push(FakeModal {
			id,
			src: frame.src.clone(),
			name: frame.name.clone(),
			overlay_class: OVERLAY_CLASS,
			iframe_class: IFRAME_CLASS,
			overlay_display: style_value(OVERLAY_STYLE, "display").unwrap_or_default(),
			iframe_display: style_value(IFRAME_STYLE, "display").unwrap_or_default(),
		});
		Ok(FakeElements {
			dom: Rc::clone(&self.dom),
			id,
		})
	}

	fn listen(&self, handler: MessageHandler) -> Result<FakeListener> {
		let mut dom = self.dom.borrow_mut();
		if let Some(reason) = dom.fail_listen.take() {
			return Err(Error::Dom(reason));
		}

		let id = dom.next_id();
		dom.listeners.push((id, handler));
		Ok(FakeListener {
			dom: Rc::clone(&self.dom),
			id,
		})
	}

	fn set_cookie(&self, cookie: &str) {
		self.dom.borrow_mut().cookies.push(cookie.to_string());
	}

	fn now_ms(&self) -> u64 {
		let mut dom = self.dom.borrow_mut();
		let now = dom.clock_ms;
		dom.clock_ms += 1;
		now
	}
}

/// Handles to one fake overlay/iframe pair.
pub struct FakeElements {
	dom: Rc<RefCell<FakeDom>>,
	id: u64,
}

impl ModalElements for FakeElements {
	fn set_visibility(&self, visibility: Visibility) {
		let mut dom = self.dom.borrow_mut();
		if let Some(modal) = dom.modals.iter_mut().find(|modal| modal.id == self.id) {
			modal.overlay_display = visibility.display();
			modal.iframe_display = visibility.display();
		}
	}

	fn remove(&self) {
		self.dom.borrow_mut().modals.retain(|modal| modal.id != self.id);
	}
}

/// Listener guard; dropping it unsubscribes the handler.
pub struct FakeListener {
	dom: Rc<RefCell<FakeDom>>,
	id: u64,
}

impl Drop for FakeListener {
	fn drop(&mut self) {
		if let Ok(mut dom) = self.dom.try_borrow_mut() {
			dom.listeners.retain(|(id, _)| *id != self.id);
		}
	}
}

/// Controller for posting messages and inspecting the fake document.
pub struct FakeDocumentController {
	dom: Rc<RefCell<FakeDom>>,
}

impl FakeDocumentController {
	/// Delivers `data` from `origin` to every attached listener.
	///
	/// Handlers run after the listener list is snapshotted, so they may
	/// attach or detach listeners while the message is dispatched.
	pub fn post_message(&self, origin: &str, data: Value) {
		let handlers: Vec<MessageHandler> = self
			.dom
			.borrow()
			.listeners
			.iter()
			.map(|(_, handler)| Rc::clone(handler))
			.collect();

		for handler in handlers {
			handler(InboundMessage {
				origin: origin.to_string(),
				data: data.clone(),
			});
		}
	}

	/// Posts a recognized frame event in its wire shape.
	pub fn post_event(&self, origin: &str, event: &FrameEvent) {
		self.post_message(origin, event.to_value());
	}

	/// Overlay/iframe pairs currently attached to the body, in insertion order.
	pub fn modals(&self) -> Vec<FakeModal> {
		self.dom.borrow().modals.clone()
	}

	pub fn listener_count(&self) -> usize {
		self.dom.borrow().listeners.len()
	}

	/// Cookie assignments written so far, oldest first.
	pub fn cookies(&self) -> Vec<String> {
		self.dom.borrow().cookies.clone()
	}

	/// Makes the next [`Document::insert_modal`] call fail with `reason`.
	pub fn fail_next_insert(&self, reason: &str) {
		self.dom.borrow_mut().fail_insert = Some(reason.to_string());
	}

	/// Makes the next [`Document::listen`] call fail with `reason`.
	pub fn fail_next_listen(&self, reason: &str) {
		self.dom.borrow_mut().fail_listen = Some(reason.to_string());
	}
}
