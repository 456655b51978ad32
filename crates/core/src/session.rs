//! Link session controller.
//!
//! A [`LinkSession`] owns the overlay/iframe pair for one link token and the
//! message listener that reacts to the embedded flow. It has two states:
//!
//! ```text
//!            set_link_token("abc")
//!   IDLE ───────────────────────────► MOUNTED ──┐
//!    ▲                                  │       │ set_link_token("xyz")
//!    └──────────────────────────────────┘       │ (teardown, then mount)
//!       set_link_token(None | "") / drop  ◄─────┘
//! ```
//!
//! Mounting inserts the hidden modal and attaches the listener; teardown
//! detaches the listener before removing the elements. Element handles come
//! from the mount step and are never looked up again.
//!
//! Everything runs on the host's UI thread: state is shared through
//! `Rc<RefCell<_>>`, and the listener only holds a `Weak` reference so the
//! session can always be dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use beam_link_protocol::{ACCESS_TOKEN_COOKIE, FrameEvent, expired_cookie};
use tracing::{debug, info, trace, warn};

use crate::document::{Document, InboundMessage, MessageHandler, ModalElements};
use crate::error::Result;
use crate::frame::{self, FrameSpec};
use crate::modal::Modal;
use crate::options::{LinkOptions, OriginPolicy};

type SuccessCallback = Rc<dyn Fn(&str)>;
type ExitCallback = Rc<dyn Fn()>;

/// Controller for one embedded link flow.
///
/// # Example
///
/// ```ignore
/// let (document, controller) = FakeDocumentBuilder::new().build();
/// let session = LinkSession::new(
///     document,
///     LinkOptions::new(Environment::Production).with_link_token("link-123"),
///     |public_token| println!("exchange {public_token}"),
///     || println!("user left"),
/// );
///
/// assert!(session.ready());
/// session.open();
/// ```
pub struct LinkSession<D: Document> {
	document: D,
	options: LinkOptions,
	on_success: SuccessCallback,
	on_exit: ExitCallback,
	state: Rc<RefCell<SessionState<D>>>,
}

struct SessionState<D: Document> {
	link_token: Option<String>,
	mounted: Option<Mounted<D>>,
	error: Option<String>,
	/// Bumped on every mount attempt; a router only acts on its own mount.
	generation: u64,
}

struct Mounted<D: Document> {
	generation: u64,
	modal: Modal<D::Elements>,
	listener: D::Listener,
}

impl<D: Document> SessionState<D> {
	fn unmount(&mut self) {
		if let Some(Mounted { modal, listener, .. }) = self.mounted.take() {
			drop(listener);
			modal.remove();
			info!(target = "beam_link", "link session unmounted");
		}
	}

	fn current_mount(&mut self, generation: u64) -> Option<&mut Mounted<D>> {
		self.mounted.as_mut().filter(|mounted| mounted.generation == generation)
	}
}

/// Inbound message routing shared with the listener.
struct Router<D: Document> {
	state: Weak<RefCell<SessionState<D>>>,
	on_success: SuccessCallback,
	on_exit: ExitCallback,
	expected_origin: Option<String>,
	generation: u64,
}

impl<D: Document> Router<D> {
	fn route(&self, message: InboundMessage) {
		if let Some(expected) = &self.expected_origin {
			if message.origin != *expected {
				debug!(target = "beam_link", origin = %message.origin, expected = %expected, "dropped message from foreign origin");
				return;
			}
		}

		let Some(event) = FrameEvent::from_value(&message.data) else {
			trace!(target = "beam_link", origin = %message.origin, "ignored unrecognized message");
			return;
		};

		debug!(target = "beam_link", event = event.event_name(), "frame event");
		// No borrow is held here: callbacks may call back into the session.
		match &event {
			FrameEvent::Close => (self.on_exit)(),
			FrameEvent::CloseOnSuccess { public_token } => (self.on_success)(public_token.as_str()),
		}

		let Some(state) = self.state.upgrade() else {
			return;
		};
		match state.try_borrow_mut() {
			Ok(mut state) => match state.current_mount(self.generation) {
				Some(mounted) => mounted.modal.hide(),
				None => debug!(target = "beam_link", "frame event outlived its mount; nothing to hide"),
			},
			Err(_) => warn!(target = "beam_link", "session busy; modal left as is after frame event"),
		}
	}
}

impl<D: Document + 'static> LinkSession<D> {
	/// Creates a session and mounts the modal if `options.link_token` is set.
	///
	/// `on_success` receives the public token from a completed flow; `on_exit`
	/// runs when the user leaves the flow. The modal is hidden after either.
	///
	/// A failed initial mount does not fail construction: the session stays
	/// idle and the failure is reported by [`LinkSession::error`].
	pub fn new(
		document: D,
		options: LinkOptions,
		on_success: impl Fn(&str) + 'static,
		on_exit: impl Fn() + 'static,
	) -> Self {
		let initial_token = options.link_token.clone();
		let session = Self {
			document,
			options,
			on_success: Rc::new(on_success),
			on_exit: Rc::new(on_exit),
			state: Rc::new(RefCell::new(SessionState {
				link_token: None,
				mounted: None,
				error: None,
				generation: 0,
			})),
		};
		// Already logged and kept in the error slot.
		let _ = session.set_link_token(initial_token.as_deref());
		session
	}

	/// Replaces the link token.
	///
	/// Any mounted modal is torn down first. A non-empty token then mounts a
	/// fresh overlay and iframe; `None` or `""` leaves the session idle.
	/// Setting the token that is already mounted does nothing.
	///
	/// # Errors
	///
	/// Returns the mount error, which is also kept in [`LinkSession::error`].
	/// The session is idle afterwards.
	pub fn set_link_token(&self, link_token: Option<&str>) -> Result<()> {
		let link_token = link_token.filter(|token| !token.is_empty()).map(str::to_owned);
		let mut state = self.state.borrow_mut();

		if state.link_token == link_token && state.mounted.is_some() == link_token.is_some() {
			return Ok(());
		}

		state.unmount();
		state.link_token = link_token;
		state.error = None;

		let Some(token) = state.link_token.clone() else {
			return Ok(());
		};

		state.generation += 1;
		match self.mount(&token, state.generation) {
			Ok(mounted) => {
				state.mounted = Some(mounted);
				Ok(())
			}
			Err(err) => {
				warn!(target = "beam_link", error = %err, "failed to mount link session");
				state.error = Some(err.to_string());
				Err(err)
			}
		}
	}

	fn mount(&self, link_token: &str, generation: u64) -> Result<Mounted<D>> {
		let frame = FrameSpec::new(&self.options.environment, link_token, self.document.now_ms())?;
		let expected_origin = match self.options.origin_policy {
			OriginPolicy::Any => None,
			OriginPolicy::Environment => Some(frame::expected_origin(&self.options.environment)?),
		};

		let elements = self.document.insert_modal(&frame)?;
		let router = Router {
			state: Rc::downgrade(&self.state),
			on_success: Rc::clone(&self.on_success),
			on_exit: Rc::clone(&self.on_exit),
			expected_origin,
			generation,
		};
		let handler: MessageHandler = Rc::new(move |message: InboundMessage| router.route(message));
		let listener = match self.document.listen(handler) {
			Ok(listener) => listener,
			Err(err) => {
				elements.remove();
				return Err(err);
			}
		};

		info!(target = "beam_link", environment = %self.options.environment, frame = %frame.name, src = %frame.src, "link session mounted");
		Ok(Mounted {
			generation,
			modal: Modal::new(elements),
			listener,
		})
	}

	/// Shows the modal, or hides it if it is already shown.
	///
	/// Without a mounted token this only logs a warning.
	pub fn open(&self) {
		if self.options.clear_access_token_cookie {
			self.document.set_cookie(&expired_cookie(ACCESS_TOKEN_COOKIE));
		}

		let mut state = self.state.borrow_mut();
		if state.link_token.is_none() {
			warn!(target = "beam_link", "open() called without a valid link token; supply one before opening the link flow");
			return;
		}
		match state.mounted.as_mut() {
			Some(mounted) => {
				mounted.modal.toggle();
			}
			None => warn!(target = "beam_link", "open() called but the link modal failed to mount"),
		}
	}

	/// Hides the modal. Does nothing while idle.
	pub fn exit(&self) {
		if let Some(mounted) = self.state.borrow_mut().mounted.as_mut() {
			mounted.modal.hide();
		}
	}

	/// Tears the session down: detaches the listener, removes the modal and
	/// forgets the token along with any mount error.
	pub fn dispose(&self) {
		let mut state = self.state.borrow_mut();
		state.unmount();
		state.link_token = None;
		state.error = None;
	}

	/// `true` while the modal exists for the current token.
	pub fn ready(&self) -> bool {
		self.state.borrow().mounted.is_some()
	}

	/// The last mount failure, if any.
	pub fn error(&self) -> Option<String> {
		self.state.borrow().error.clone()
	}

	/// `true` while the modal is shown.
	pub fn visible(&self) -> bool {
		self.state.borrow().mounted.as_ref().is_some_and(|mounted| mounted.modal.is_visible())
	}

	pub fn link_token(&self) -> Option<String> {
		self.state.borrow().link_token.clone()
	}
}

impl<D: Document> Drop for LinkSession<D> {
	fn drop(&mut self) {
		if let Ok(mut state) = self.state.try_borrow_mut() {
			state.unmount();
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use beam_link_protocol::Environment;
	use serde_json::json;

	use super::*;
	use crate::fake_document::{FakeDocumentBuilder, FakeDocumentController};

	const ORIGIN: &str = "https://beam.dev.ansiblelabs.xyz";

	fn session_with(options: LinkOptions) -> (LinkSession<crate::FakeDocument>, FakeDocumentController, Rc<Cell<u32>>) {
		let (document, controller) = FakeDocumentBuilder::new().build();
		let exits = Rc::new(Cell::new(0));
		let exit_count = Rc::clone(&exits);
		let session = LinkSession::new(document, options, |_| {}, move || exit_count.set(exit_count.get() + 1));
		(session, controller, exits)
	}

	#[test]
	fn same_token_does_not_remount() {
		let (session, controller, _) = session_with(LinkOptions::default().with_link_token("abc"));
		let first = controller.modals()[0].id;

		session.set_link_token(Some("abc")).unwrap();

		assert_eq!(controller.modals().len(), 1);
		assert_eq!(controller.modals()[0].id, first);
	}

	#[test]
	fn remount_uses_fresh_frame_name() {
		let (session, controller, _) = session_with(LinkOptions::default().with_link_token("abc"));
		let first = controller.modals()[0].name.clone();

		session.set_link_token(Some("xyz")).unwrap();

		assert_ne!(controller.modals()[0].name, first);
	}

	#[test]
	fn remount_resets_visibility_to_hidden() {
		let (session, controller, _) = session_with(LinkOptions::default().with_link_token("abc"));
		session.open();
		assert!(session.visible());

		session.set_link_token(Some("xyz")).unwrap();

		assert!(!session.visible());
		assert_eq!(controller.modals()[0].overlay_display, "none");
	}

	#[test]
	fn exit_callback_may_clear_token() {
		let (document, controller) = FakeDocumentBuilder::new().build();
		let session = Rc::new(RefCell::new(None::<LinkSession<crate::FakeDocument>>));
		let slot = Rc::clone(&session);
		let created = LinkSession::new(
			document,
			LinkOptions::default().with_link_token("abc"),
			|_| {},
			move || {
				if let Some(session) = slot.borrow().as_ref() {
					session.set_link_token(None).unwrap();
				}
			},
		);
		*session.borrow_mut() = Some(created);

		controller.post_message(ORIGIN, json!({ "eventName": "beamIframeClose" }));

		let session = session.borrow();
		let session = session.as_ref().unwrap();
		assert!(!session.ready());
		assert!(controller.modals().is_empty());
		assert_eq!(controller.listener_count(), 0);
	}

	#[test]
	fn success_callback_may_remount_and_open() {
		let (document, controller) = FakeDocumentBuilder::new().build();
		let session = Rc::new(RefCell::new(None::<LinkSession<crate::FakeDocument>>));
		let slot = Rc::clone(&session);
		let created = LinkSession::new(
			document,
			LinkOptions::default().with_link_token("abc"),
			move |_| {
				if let Some(session) = slot.borrow().as_ref() {
					session.set_link_token(Some("xyz")).unwrap();
					session.open();
				}
			},
			|| {},
		);
		*session.borrow_mut() = Some(created);

		controller.post_message(
			ORIGIN,
			json!({ "eventName": "beamIframeCloseOnSuccess", "publicToken": "tok" }),
		);

		let session = session.borrow();
		let session = session.as_ref().unwrap();
		let modals = controller.modals();
		assert_eq!(modals.len(), 1);
		assert!(modals[0].src.contains("linkToken=xyz"));
		assert_eq!(modals[0].overlay_display, "block");
		assert_eq!(modals[0].iframe_display, "block");
		assert!(session.visible());

		controller.post_event(ORIGIN, &FrameEvent::Close);
		assert!(!session.visible());
	}

	#[test]
	fn environment_policy_uses_environment_origin() {
		let (session, controller, exits) = session_with(
			LinkOptions::new(Environment::Custom("http://localhost:3000/app".to_string()))
				.with_link_token("abc")
				.with_origin_policy(OriginPolicy::Environment),
		);
		session.open();

		controller.post_message("http://localhost:3000", json!({ "eventName": "beamIframeClose" }));

		assert_eq!(exits.get(), 1);
		assert!(!session.visible());
	}

	#[test]
	fn failed_listen_removes_inserted_modal() {
		let (document, controller) = FakeDocumentBuilder::new().build();
		controller.fail_next_listen("listener quota exceeded");

		let session = LinkSession::new(document, LinkOptions::default(), |_| {}, || {});
		let err = session.set_link_token(Some("abc")).unwrap_err();

		assert!(err.to_string().contains("listener quota exceeded"));
		assert!(controller.modals().is_empty());
		assert!(!session.ready());
		assert_eq!(session.error().as_deref(), Some(err.to_string().as_str()));
	}

	#[test]
	fn dispose_clears_mount_error() {
		let (session, controller, _) = session_with(LinkOptions::default());
		controller.fail_next_insert("document has no body");
		assert!(session.set_link_token(Some("abc")).is_err());
		assert!(session.error().is_some());

		session.dispose();

		assert_eq!(session.error(), None);
		assert_eq!(session.link_token(), None);
	}

	#[test]
	fn failed_initial_mount_is_reported_through_error_slot() {
		let (document, controller) = FakeDocumentBuilder::new().build();
		controller.fail_next_insert("document has no body");

		let session = LinkSession::new(document, LinkOptions::default().with_link_token("abc"), |_| {}, || {});

		assert!(!session.ready());
		assert_eq!(session.link_token().as_deref(), Some("abc"));
		assert!(session.error().is_some_and(|error| error.contains("document has no body")));
		assert_eq!(controller.listener_count(), 0);
	}
}
