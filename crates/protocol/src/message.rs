//! Messages posted by the embedded frame to the host window.
//!
//! The frame posts plain objects over the window message channel:
//!
//! ```json
//! { "eventName": "beamIframeClose" }
//! { "eventName": "beamIframeCloseOnSuccess", "publicToken": "public-sandbox-123" }
//! ```
//!
//! The host never posts anything back.

use serde_json::{Value, json};

/// Event name posted when the user dismisses the flow.
pub const CLOSE_EVENT: &str = "beamIframeClose";
/// Event name posted when the flow completes and carries a public token.
pub const CLOSE_ON_SUCCESS_EVENT: &str = "beamIframeCloseOnSuccess";

/// A recognized event from the embedded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
	/// The user left the flow without finishing it.
	Close,
	/// The flow finished; `public_token` is forwarded to the host.
	CloseOnSuccess { public_token: String },
}

impl FrameEvent {
	/// Interprets posted message data.
	///
	/// Returns `None` for anything outside the contract: non-objects, a missing
	/// or non-string `eventName`, or an unknown event name. A success event
	/// without a string `publicToken` yields an empty token.
	pub fn from_value(data: &Value) -> Option<Self> {
		let event_name = data.get("eventName")?.as_str()?;
		match event_name {
			CLOSE_EVENT => Some(Self::Close),
			CLOSE_ON_SUCCESS_EVENT => {
				let public_token = data
					.get("publicToken")
					.and_then(Value::as_str)
					.unwrap_or_default()
					.to_string();
				Some(Self::CloseOnSuccess { public_token })
			}
			_ => None,
		}
	}

	/// Returns the wire name of this event.
	pub fn event_name(&self) -> &'static str {
		match self {
			Self::Close => CLOSE_EVENT,
			Self::CloseOnSuccess { .. } => CLOSE_ON_SUCCESS_EVENT,
		}
	}

	/// Returns the payload exactly as the frame posts it.
	pub fn to_value(&self) -> Value {
		match self {
			Self::Close => json!({ "eventName": CLOSE_EVENT }),
			Self::CloseOnSuccess { public_token } => json!({
				"eventName": CLOSE_ON_SUCCESS_EVENT,
				"publicToken": public_token,
			}),
		}
	}
}
