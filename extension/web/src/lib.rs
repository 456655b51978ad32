//! Browser bindings for Beam link sessions.
//!
//! Exposes [`BeamLink`] to JavaScript:
//!
//! ```js
//! import init, { BeamLink } from "beam-link-web";
//!
//! await init();
//! const link = new BeamLink(
//!   { environment: "production", linkToken },
//!   (publicToken) => exchangePublicToken(publicToken),
//!   () => console.log("link flow closed"),
//! );
//! button.onclick = () => link.open();
//! ```

mod document;

use beam_link::{Error, LinkOptions, LinkSession};
use js_sys::Function;
use tracing::warn;
use wasm_bindgen::prelude::*;

pub use document::{WebDocument, WebListener, WebModal};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
	console_error_panic_hook::set_once();
	tracing_wasm::set_as_global_default();
}

/// A link session mounted into the current page.
#[wasm_bindgen]
pub struct BeamLink {
	session: LinkSession<WebDocument>,
}

#[wasm_bindgen]
impl BeamLink {
	/// Creates the session; mounts the modal right away when
	/// `options.linkToken` is non-empty. A failed mount does not throw: the
	/// handle is returned idle and the `error` getter describes the failure.
	/// Only malformed options or a missing `document` throw.
	///
	/// Exceptions thrown by `on_success`/`on_exit` are logged and swallowed.
	#[wasm_bindgen(constructor)]
	pub fn new(options: JsValue, on_success: Function, on_exit: Function) -> Result<BeamLink, JsValue> {
		let options = options_from_js(options)?;
		let document = WebDocument::from_window().map_err(to_js_error)?;

		let session = LinkSession::new(
			document,
			options,
			move |public_token: &str| {
				if let Err(err) = on_success.call1(&JsValue::NULL, &JsValue::from_str(public_token)) {
					warn!(target = "beam_link", error = ?err, "onSuccess callback threw");
				}
			},
			move || {
				if let Err(err) = on_exit.call0(&JsValue::NULL) {
					warn!(target = "beam_link", error = ?err, "onExit callback threw");
				}
			},
		);

		Ok(Self { session })
	}

	/// Replaces the link token; `null` or `""` tears the modal down.
	#[wasm_bindgen(js_name = setLinkToken)]
	pub fn set_link_token(&self, link_token: Option<String>) -> Result<(), JsValue> {
		self.session.set_link_token(link_token.as_deref()).map_err(to_js_error)
	}

	/// Shows the modal, or hides it if already shown.
	pub fn open(&self) {
		self.session.open();
	}

	/// Hides the modal.
	pub fn exit(&self) {
		self.session.exit();
	}

	/// Removes the modal and detaches the message listener.
	pub fn dispose(&self) {
		self.session.dispose();
	}

	#[wasm_bindgen(getter)]
	pub fn ready(&self) -> bool {
		self.session.ready()
	}

	#[wasm_bindgen(getter)]
	pub fn error(&self) -> Option<String> {
		self.session.error()
	}

	#[wasm_bindgen(getter)]
	pub fn visible(&self) -> bool {
		self.session.visible()
	}
}

fn options_from_js(options: JsValue) -> Result<LinkOptions, JsValue> {
	if options.is_undefined() || options.is_null() {
		return Ok(LinkOptions::default());
	}
	serde_wasm_bindgen::from_value(options)
		.map_err(|err| js_sys::Error::new(&format!("invalid link options: {err}")).into())
}

fn to_js_error(err: Error) -> JsValue {
	js_sys::Error::new(&err.to_string()).into()
}
