//! Session options supplied by the host page.

use beam_link_protocol::Environment;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which senders may drive the session over the message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginPolicy {
	/// Trust every message regardless of sender origin.
	#[default]
	Any,
	/// Only handle messages posted from the environment's origin.
	Environment,
}

/// Options for a [`LinkSession`](crate::LinkSession).
///
/// Decodes from the same camelCase object a host page passes in JavaScript:
///
/// ```json
/// {
///   "environment": "production",
///   "linkToken": "link-sandbox-4f1c",
///   "originPolicy": "environment",
///   "clearAccessTokenCookie": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkOptions {
	/// Remote deployment serving the embedded flow.
	pub environment: Environment,
	/// Initial link token; empty or absent leaves the session idle.
	pub link_token: Option<String>,
	/// Sender check applied to inbound messages.
	pub origin_policy: OriginPolicy,
	/// Deletes the `accessToken` cookie on every `open()` call.
	pub clear_access_token_cookie: bool,
}

impl LinkOptions {
	/// Creates options for `environment` with every other field defaulted.
	pub fn new(environment: impl Into<Environment>) -> Self {
		Self {
			environment: environment.into(),
			..Default::default()
		}
	}

	/// Decodes options from a JSON object.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Sets the initial link token.
	pub fn with_link_token(mut self, link_token: impl Into<String>) -> Self {
		self.link_token = Some(link_token.into());
		self
	}

	/// Sets the inbound message origin policy.
	pub fn with_origin_policy(mut self, policy: OriginPolicy) -> Self {
		self.origin_policy = policy;
		self
	}

	/// Enables or disables the legacy cookie deletion in `open()`.
	pub fn with_clear_access_token_cookie(mut self, clear: bool) -> Self {
		self.clear_access_token_cookie = clear;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_uses_defaults() {
		let options = LinkOptions::from_json("{}").unwrap();
		assert_eq!(options, LinkOptions::default());
		assert_eq!(options.environment, Environment::Development);
		assert_eq!(options.origin_policy, OriginPolicy::Any);
		assert!(!options.clear_access_token_cookie);
	}

	#[test]
	fn decodes_camel_case_fields() {
		let options = LinkOptions::from_json(
			r#"{
				"environment": "http://localhost:3000",
				"linkToken": "abc",
				"originPolicy": "environment",
				"clearAccessTokenCookie": true
			}"#,
		)
		.unwrap();

		assert_eq!(options.environment, Environment::Custom("http://localhost:3000".to_string()));
		assert_eq!(options.link_token.as_deref(), Some("abc"));
		assert_eq!(options.origin_policy, OriginPolicy::Environment);
		assert!(options.clear_access_token_cookie);
	}

	#[test]
	fn null_link_token_decodes_as_absent() {
		let options = LinkOptions::from_json(r#"{ "linkToken": null }"#).unwrap();
		assert_eq!(options.link_token, None);
	}

	#[test]
	fn unknown_origin_policy_is_rejected() {
		let err = LinkOptions::from_json(r#"{ "originPolicy": "sometimes" }"#).unwrap_err();
		assert!(err.to_string().starts_with("invalid link options"));
	}

	#[test]
	fn builder_setters_compose() {
		let options = LinkOptions::new(Environment::Production)
			.with_link_token("tok")
			.with_origin_policy(OriginPolicy::Environment)
			.with_clear_access_token_cookie(true);

		assert_eq!(options.environment, Environment::Production);
		assert_eq!(options.link_token.as_deref(), Some("tok"));
		assert_eq!(options.origin_policy, OriginPolicy::Environment);
		assert!(options.clear_access_token_cookie);
	}
}
