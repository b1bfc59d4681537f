//! Bearer request authentication usable by any provider adapter.
//!
//! [`authenticated_request`] turns a method, URL, [`Credential`], and [`RequestOptions`] into an
//! [`HttpRequest`] carrying the `Authorization: Bearer` header. Providers call it instead of
//! mixing bearer behavior into their own types.

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		self, HeaderValue, Request,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{_prelude::*, auth::AccessToken, error::ConfigError};

/// Credential attached to an authenticated request.
#[derive(Clone, Copy, Default)]
pub enum Credential<'a> {
	/// Token issued by a token exchange.
	AccessToken(&'a AccessToken),
	/// Raw bearer token string.
	Bearer(&'a str),
	/// No credential; the request is sent without an `Authorization` header.
	#[default]
	None,
}
impl Credential<'_> {
	/// Returns the bearer value, if any. Callers must avoid logging this string.
	pub fn bearer(&self) -> Option<&str> {
		match self {
			Credential::AccessToken(token) => Some(token.secret()),
			Credential::Bearer(token) => Some(token),
			Credential::None => None,
		}
	}
}
impl<'a> From<&'a AccessToken> for Credential<'a> {
	fn from(token: &'a AccessToken) -> Self {
		Self::AccessToken(token)
	}
}
impl<'a> From<Option<&'a AccessToken>> for Credential<'a> {
	fn from(token: Option<&'a AccessToken>) -> Self {
		token.map_or(Self::None, Self::AccessToken)
	}
}
impl<'a> From<&'a str> for Credential<'a> {
	fn from(token: &'a str) -> Self {
		Self::Bearer(token)
	}
}
impl<'a> From<&'a String> for Credential<'a> {
	fn from(token: &'a String) -> Self {
		Self::Bearer(token)
	}
}
impl Debug for Credential<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Credential::AccessToken(_) => f.write_str("Credential::AccessToken(<redacted>)"),
			Credential::Bearer(_) => f.write_str("Credential::Bearer(<redacted>)"),
			Credential::None => f.write_str("Credential::None"),
		}
	}
}

/// Extra headers and body applied to an authenticated request.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// Headers copied onto the request before authentication.
	pub headers: HeaderMap,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
}
impl RequestOptions {
	/// Serializes `body` as JSON and sets `Content-Type: application/json`.
	pub fn with_json_body(mut self, body: &Value) -> Result<Self, ConfigError> {
		let bytes = serde_json::to_vec(body).map_err(ConfigError::BodySerialize)?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.body = Some(bytes);

		Ok(self)
	}
}

/// Builds a request for `url` and injects the bearer credential, if any.
pub fn authenticated_request(
	method: Method,
	url: &Url,
	credential: Credential<'_>,
	options: RequestOptions,
) -> Result<HttpRequest, ConfigError> {
	let RequestOptions { headers, body } = options;
	let mut request =
		Request::builder().method(method).uri(url.as_str()).body(body.unwrap_or_default())?;

	request.headers_mut().extend(headers);

	if let Some(token) = credential.bearer() {
		let value =
			HeaderValue::from_str(&format!("Bearer {token}")).map_err(http::Error::from)?;

		request.headers_mut().insert(AUTHORIZATION, value);
	}

	Ok(request)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn url() -> Url {
		Url::parse("https://api.lock.me/v2.3/rooms").expect("Fixture URL should parse.")
	}

	#[test]
	fn injects_bearer_header_for_every_credential_shape() {
		let token = AccessToken::new("issued-token");
		let raw = String::from("raw-token");

		for (credential, expected) in [
			(Credential::from(&token), "Bearer issued-token"),
			(Credential::from("raw-token"), "Bearer raw-token"),
			(Credential::from(&raw), "Bearer raw-token"),
		] {
			let request =
				authenticated_request(Method::GET, &url(), credential, RequestOptions::default())
					.expect("Authenticated request should build.");

			assert_eq!(
				request.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
				Some(expected)
			);
		}
	}

	#[test]
	fn anonymous_requests_carry_no_authorization() {
		let request = authenticated_request(
			Method::GET,
			&url(),
			Credential::from(None),
			RequestOptions::default(),
		)
		.expect("Anonymous request should build.");

		assert!(request.headers().get(AUTHORIZATION).is_none());
		assert!(request.body().is_empty());
		assert_eq!(request.uri(), "https://api.lock.me/v2.3/rooms");
	}

	#[test]
	fn json_body_sets_content_type() {
		let options = RequestOptions::default()
			.with_json_body(&json!({ "room": 7 }))
			.expect("JSON body should serialize.");
		let request = authenticated_request(Method::POST, &url(), Credential::None, options)
			.expect("Request with body should build.");

		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
			Some("application/json")
		);
		assert_eq!(request.body(), &br#"{"room":7}"#.to_vec());
		assert_eq!(*request.method(), Method::POST);
	}

	#[test]
	fn credential_debug_redacts() {
		assert_eq!(format!("{:?}", Credential::Bearer("secret")), "Credential::Bearer(<redacted>)");
	}
}
