//! Remote origins that serve the embedded link flow.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Base URL of the development deployment.
pub const DEVELOPMENT_URL: &str = "https://beam.dev.ansiblelabs.xyz";
/// Base URL of the production deployment.
pub const PRODUCTION_URL: &str = "https://app.beam.ansiblelabs.xyz";

/// Path segment, relative to the environment base, that serves the embeddable flow.
pub const EMBED_PATH: &str = "embedded";
/// Query parameter carrying the link token.
pub const LINK_TOKEN_PARAM: &str = "linkToken";

/// Which remote deployment serves the embedded flow.
///
/// Serialized as `"development"`, `"production"`, or the raw base URL for
/// [`Environment::Custom`]. The well-known base URLs deserialize to their
/// named variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
	#[default]
	Development,
	Production,
	/// Host-supplied origin, e.g. a local build of the remote page.
	Custom(String),
}

impl Environment {
	/// Returns the base URL without any normalization.
	pub fn base_url(&self) -> &str {
		match self {
			Self::Development => DEVELOPMENT_URL,
			Self::Production => PRODUCTION_URL,
			Self::Custom(url) => url,
		}
	}

	/// Builds `<base>/embedded?linkToken=<token>`.
	///
	/// `embedded` is appended as a path segment, so a trailing `/` on the base
	/// is ignored and a query on the base is kept ahead of the token. Any
	/// fragment is dropped. The token is encoded as a query value.
	pub fn embed_url(&self, link_token: &str) -> Result<Url, url::ParseError> {
		let mut url = Url::parse(self.base_url())?;
		url.set_fragment(None);
		url.path_segments_mut()
			.map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
			.pop_if_empty()
			.push(EMBED_PATH);
		url.query_pairs_mut().append_pair(LINK_TOKEN_PARAM, link_token);
		Ok(url)
	}

	/// Returns the origin (`scheme://host[:port]`) the embedded page posts from.
	pub fn origin(&self) -> Result<String, url::ParseError> {
		Ok(Url::parse(self.base_url())?.origin().ascii_serialization())
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.base_url())
	}
}

impl From<String> for Environment {
	fn from(value: String) -> Self {
		match value.trim() {
			"development" | DEVELOPMENT_URL => Self::Development,
			"production" | PRODUCTION_URL => Self::Production,
			_ => Self::Custom(value),
		}
	}
}

impl From<&str> for Environment {
	fn from(value: &str) -> Self {
		Self::from(value.to_string())
	}
}

impl From<Environment> for String {
	fn from(value: Environment) -> Self {
		match value {
			Environment::Development => "development".to_string(),
			Environment::Production => "production".to_string(),
			Environment::Custom(url) => url,
		}
	}
}
