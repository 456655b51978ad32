//! `web-sys` implementation of the host document.
//!
//! Elements are created once per mount and addressed through the handles
//! returned here; nothing is looked up by class name afterwards.

use beam_link::frame::{FrameSpec, IFRAME_CLASS, IFRAME_STYLE, OVERLAY_CLASS, OVERLAY_STYLE};
use beam_link::{Document, Error, InboundMessage, MessageHandler, ModalElements, Result, Visibility};
use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CssStyleDeclaration, HtmlDocument, HtmlElement, HtmlIFrameElement, MessageEvent, Window};

const MESSAGE_EVENT: &str = "message";

/// The page's `window` and `document`.
pub struct WebDocument {
	window: Window,
	document: web_sys::Document,
}

impl WebDocument {
	/// Binds to the global window.
	pub fn from_window() -> Result<Self> {
		let window = web_sys::window().ok_or_else(|| Error::Dom("no global window".to_string()))?;
		let document = window
			.document()
			.ok_or_else(|| Error::Dom("window has no document".to_string()))?;
		Ok(Self { window, document })
	}

	fn create<T: JsCast>(&self, tag: &str) -> Result<T> {
		self.document
			.create_element(tag)
			.map_err(js_error)?
			.dyn_into::<T>()
			.map_err(|_| Error::Dom(format!("<{tag}> has an unexpected element type")))
	}
}

impl Document for WebDocument {
	type Elements = WebModal;
	type Listener = WebListener;

	fn insert_modal(&self, frame: &FrameSpec) -> Result<WebModal> {
		let iframe: HtmlIFrameElement = self.create("iframe")?;
		iframe.class_list().add_1(IFRAME_CLASS).map_err(js_error)?;
		iframe.set_src(&frame.src);
		iframe.set_name(&frame.name);
		apply_style(&iframe.style(), IFRAME_STYLE)?;

		let overlay: HtmlElement = self.create("div")?;
		overlay.class_list().add_1(OVERLAY_CLASS).map_err(js_error)?;
		apply_style(&overlay.style(), OVERLAY_STYLE)?;
		overlay.append_child(&iframe).map_err(js_error)?;

		let body = self
			.document
			.body()
			.ok_or_else(|| Error::Dom("document has no body".to_string()))?;
		body.append_child(&overlay).map_err(js_error)?;

		Ok(WebModal { overlay, iframe })
	}

	fn listen(&self, handler: MessageHandler) -> Result<WebListener> {
		let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
			let data = match serde_wasm_bindgen::from_value::<serde_json::Value>(event.data()) {
				Ok(data) => data,
				Err(err) => {
					trace!(target = "beam_link", error = %err, "ignored message with non-JSON data");
					return;
				}
			};
			handler(InboundMessage {
				origin: event.origin(),
				data,
			});
		});

		self.window
			.add_event_listener_with_callback(MESSAGE_EVENT, callback.as_ref().unchecked_ref())
			.map_err(js_error)?;

		Ok(WebListener {
			window: self.window.clone(),
			callback,
		})
	}

	fn set_cookie(&self, cookie: &str) {
		let Some(document) = self.document.dyn_ref::<HtmlDocument>() else {
			warn!(target = "beam_link", "document does not expose cookies");
			return;
		};
		if let Err(err) = document.set_cookie(cookie) {
			warn!(target = "beam_link", error = ?err, "failed to write cookie");
		}
	}

	fn now_ms(&self) -> u64 {
		js_sys::Date::now() as u64
	}
}

/// The mounted overlay `div` and its iframe.
pub struct WebModal {
	overlay: HtmlElement,
	iframe: HtmlIFrameElement,
}

impl ModalElements for WebModal {
	fn set_visibility(&self, visibility: Visibility) {
		for style in [self.overlay.style(), self.iframe.style()] {
			if let Err(err) = style.set_property("display", visibility.display()) {
				warn!(target = "beam_link", error = ?err, "failed to set modal display");
			}
		}
	}

	fn remove(&self) {
		self.iframe.remove();
		self.overlay.remove();
	}
}

/// Registered `message` listener; dropping it removes the listener from the window.
pub struct WebListener {
	window: Window,
	callback: Closure<dyn FnMut(MessageEvent)>,
}

impl Drop for WebListener {
	fn drop(&mut self) {
		if let Err(err) = self
			.window
			.remove_event_listener_with_callback(MESSAGE_EVENT, self.callback.as_ref().unchecked_ref())
		{
			warn!(target = "beam_link", error = ?err, "failed to detach message listener");
		}
	}
}

fn apply_style(style: &CssStyleDeclaration, properties: &[(&str, &str)]) -> Result<()> {
	for (property, value) in properties {
		style.set_property(property, value).map_err(js_error)?;
	}
	Ok(())
}

fn js_error(value: JsValue) -> Error {
	Error::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
