//! Markup for the overlay and the embedded frame.
//!
//! Both elements are created hidden. The overlay dims the whole viewport and
//! holds the iframe as its only child; the iframe is a fixed 400x600 box
//! centered on the viewport and stacked above everything else.

use beam_link_protocol::Environment;
use url::Url;

use crate::error::{Error, Result};

/// Class applied to the overlay element so host stylesheets can target it.
pub const OVERLAY_CLASS: &str = "beam-overlay";
/// Class applied to the iframe element.
pub const IFRAME_CLASS: &str = "beam-iframe";

/// Inline style of the overlay, in application order.
pub const OVERLAY_STYLE: &[(&str, &str)] = &[
	("height", "100%"),
	("left", "0"),
	("opacity", "1"),
	("position", "fixed"),
	("top", "0"),
	("width", "100%"),
	("background-color", "rgba(0, 0, 0, 0.5)"),
	("backdrop-filter", "blur(2px)"),
	("display", "none"),
];

/// Inline style of the iframe, in application order.
pub const IFRAME_STYLE: &[(&str, &str)] = &[
	("display", "none"),
	("position", "fixed"),
	("inset", "0px"),
	("z-index", "2147483647"),
	("border-width", "0px"),
	("overflow", "hidden auto"),
	("background-color", "#fff"),
	("height", "600px"),
	("width", "400px"),
	("left", "calc(50% - 200px)"),
	("top", "calc(50% - 300px)"),
];

/// Attributes of the iframe built for one mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
	/// `<environment>/embedded?linkToken=<token>`
	pub src: String,
	/// Mount timestamp in milliseconds; distinguishes frames across remounts.
	pub name: String,
}

impl FrameSpec {
	/// Builds the frame attributes for `link_token` served by `environment`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidEnvironment`] if the environment is not an
	/// absolute `http`/`https` URL.
	pub fn new(environment: &Environment, link_token: &str, mounted_at_ms: u64) -> Result<Self> {
		let base = Url::parse(environment.base_url()).map_err(|err| invalid_environment(environment, err))?;
		if !matches!(base.scheme(), "http" | "https") {
			return Err(invalid_environment(environment, format!("unsupported scheme `{}`", base.scheme())));
		}
		let url = environment.embed_url(link_token).map_err(|err| invalid_environment(environment, err))?;

		Ok(Self {
			src: url.into(),
			name: mounted_at_ms.to_string(),
		})
	}
}

/// Returns the origin inbound messages must come from under
/// [`OriginPolicy::Environment`](crate::OriginPolicy::Environment).
pub fn expected_origin(environment: &Environment) -> Result<String> {
	environment.origin().map_err(|err| invalid_environment(environment, err))
}

/// Looks up a property in one of the style tables.
pub fn style_value(style: &[(&str, &'static str)], property: &str) -> Option<&'static str> {
	style.iter().find(|(name, _)| *name == property).map(|(_, value)| *value)
}

fn invalid_environment(environment: &Environment, reason: impl ToString) -> Error {
	Error::InvalidEnvironment {
		url: environment.to_string(),
		reason: reason.to_string(),
	}
}
