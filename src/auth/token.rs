//! Access token issued by a provider's token endpoint.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Bearer credential returned by a token exchange.
///
/// The record is immutable once built; request execution only borrows it to derive the
/// `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (normally `bearer`).
	pub token_type: String,
	/// Expiry instant derived from the exchange time plus `expires_in`.
	pub expires_at: Option<OffsetDateTime>,
	/// Scopes reported by the provider, in the order returned.
	pub scopes: Vec<String>,
}
impl AccessToken {
	/// Wraps a raw bearer token without expiry metadata.
	pub fn new(access_token: impl Into<TokenSecret>) -> Self {
		Self {
			access_token: access_token.into(),
			refresh_token: None,
			token_type: "bearer".into(),
			expires_at: None,
			scopes: Vec::new(),
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Sets the expiry relative to `issued_at`.
	pub fn with_expires_in(mut self, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		self.expires_at = Some(issued_at + expires_in);

		self
	}

	/// Records the granted scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Returns the bearer value. Callers must avoid logging this string.
	pub fn secret(&self) -> &str {
		self.access_token.expose()
	}

	/// Returns `true` if the token carries an expiry that has passed at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn has_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
