//! Cookie strings written to the host document.

/// Cookie deleted by the legacy `open()` behavior.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Expiry date used to delete a cookie by writing it in the past.
pub const EXPIRED_COOKIE_DATE: &str = "Sat, 20 Jan 1980 12:00:00 UTC";

/// Builds a `document.cookie` assignment that deletes the cookie `name`.
pub fn expired_cookie(name: &str) -> String {
	format!("{name}=; expires={EXPIRED_COOKIE_DATE}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expired_cookie_targets_name_with_past_date() {
		assert_eq!(
			expired_cookie(ACCESS_TOKEN_COOKIE),
			"accessToken=; expires=Sat, 20 Jan 1980 12:00:00 UTC"
		);
	}
}
