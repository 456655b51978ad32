//! Error types for the link session controller.

use thiserror::Error;

/// Errors raised while configuring or mounting a link session.
#[derive(Debug, Error)]
pub enum Error {
	/// The environment base URL cannot serve an embedded frame.
	#[error("invalid environment `{url}`: {reason}")]
	InvalidEnvironment { url: String, reason: String },

	/// Options could not be decoded.
	#[error("invalid link options: {0}")]
	Options(#[from] serde_json::Error),

	/// The host document rejected an element or listener operation.
	#[error("document operation failed: {0}")]
	Dom(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
