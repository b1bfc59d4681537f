//! Token endpoint exchanges routed through the provider's response classification.
//!
//! The `oauth2` crate performs the form encoding and response parsing. Whatever it reports back
//! (a parsed OAuth error, an unparsable body, a transport failure) is translated into the crate
//! taxonomy, and every failure that carries a response body is handed to
//! [`Provider::check_response`] together with the real HTTP status captured by the transport.

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, HttpClientError,
	PkceCodeVerifier, RedirectUrl, RefreshToken, RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	client::{OAuthClient, decode_body, map_transport_error, observe},
	error::{DecodeError, ProviderError},
	http::{HttpTransport, ResponseMetadata, ResponseMetadataSlot},
	obs::RequestKind,
	provider::Provider,
};

/// OAuth 2.0 grant types supported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code grant.
	AuthorizationCode,
	/// Refresh Token grant.
	RefreshToken,
	/// Client Credentials grant.
	ClientCredentials,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
			GrantType::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Grant presented to the token endpoint.
#[derive(Clone)]
pub enum TokenGrant {
	/// Exchange an authorization code returned to the redirect URI.
	AuthorizationCode {
		/// Code from the authorization callback.
		code: String,
		/// PKCE verifier issued with the authorization request.
		pkce_verifier: Option<String>,
	},
	/// Trade a refresh token for a new access token.
	RefreshToken {
		/// Refresh token from an earlier exchange.
		refresh_token: String,
	},
	/// App-only token for the client itself.
	ClientCredentials {
		/// Scopes to request; empty sends no `scope` parameter.
		scopes: Vec<String>,
	},
}
impl TokenGrant {
	/// Grant type label.
	pub fn grant_type(&self) -> GrantType {
		match self {
			TokenGrant::AuthorizationCode { .. } => GrantType::AuthorizationCode,
			TokenGrant::RefreshToken { .. } => GrantType::RefreshToken,
			TokenGrant::ClientCredentials { .. } => GrantType::ClientCredentials,
		}
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant").field("grant_type", &self.grant_type()).finish()
	}
}

impl<P, C> OAuthClient<P, C>
where
	P: Provider,
	C: HttpTransport,
{
	/// Exchanges `grant` for an access token.
	///
	/// Client credentials are sent in the request body. Failures with a response are classified
	/// by the provider exactly like API responses.
	pub async fn access_token(&self, grant: TokenGrant) -> Result<AccessToken> {
		observe(RequestKind::AccessToken, "access_token", async move {
			let grant_type = grant.grant_type();
			let params =
				BTreeMap::from([("grant_type".to_owned(), grant_type.as_str().to_owned())]);
			let token_url = TokenUrl::from_url(self.provider().access_token_url(&params));
			let auth_url = AuthUrl::from_url(self.provider().authorization_url());
			let mut oauth_client = BasicClient::new(ClientId::new(self.options().client_id.clone()))
				.set_auth_uri(auth_url)
				.set_token_uri(token_url)
				.set_auth_type(AuthType::RequestBody);

			if let Some(secret) = &self.options().client_secret {
				oauth_client =
					oauth_client.set_client_secret(ClientSecret::new(secret.expose().to_owned()));
			}

			let meta = ResponseMetadataSlot::default();
			let handle = self.http_client().with_metadata(meta.clone());
			let result = match grant {
				TokenGrant::AuthorizationCode { code, pkce_verifier } => {
					let mut request = oauth_client.exchange_code(AuthorizationCode::new(code));

					if let Some(verifier) = pkce_verifier {
						request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier));
					}
					if let Some(redirect_uri) = &self.options().redirect_uri {
						request = request
							.set_redirect_uri(Cow::Owned(RedirectUrl::from_url(redirect_uri.clone())));
					}

					request.request_async(&handle).await
				},
				TokenGrant::RefreshToken { refresh_token } => {
					let refresh_token = RefreshToken::new(refresh_token);

					oauth_client.exchange_refresh_token(&refresh_token).request_async(&handle).await
				},
				TokenGrant::ClientCredentials { scopes } => {
					let mut request = oauth_client.exchange_client_credentials();

					for scope in scopes {
						request = request.add_scope(Scope::new(scope));
					}

					request.request_async(&handle).await
				},
			};

			match result {
				Ok(response) => into_access_token(&response),
				Err(err) => Err(self.map_token_error(err, meta.take())),
			}
		})
		.await
	}

	fn map_token_error<E>(
		&self,
		err: BasicRequestTokenError<HttpClientError<E>>,
		meta: Option<ResponseMetadata>,
	) -> Error
	where
		E: 'static + Send + Sync + StdError,
	{
		let ResponseMetadata { status, body: raw_body } = meta.unwrap_or_default();
		let status = status.and_then(|s| StatusCode::from_u16(s).ok());

		match err {
			RequestTokenError::ServerResponse(response) => {
				let status = status.unwrap_or(StatusCode::BAD_REQUEST);
				let body = match raw_body.as_deref().map(|raw| decode_body(status, raw)) {
					Some(Ok(body)) => body,
					_ => serde_json::to_value(&response).unwrap_or(Value::Null),
				};

				match self.provider().check_response(status, &body) {
					Err(e) => e.into(),
					Ok(()) => ProviderError::oauth(status, body).into(),
				}
			},
			RequestTokenError::Parse(source, raw) => {
				let status = status.unwrap_or(StatusCode::OK);

				match decode_body(status, &raw) {
					Ok(body) => match self.provider().check_response(status, &body) {
						Err(e) => e.into(),
						Ok(()) => DecodeError { source, status: Some(status.as_u16()) }.into(),
					},
					Err(e) => e,
				}
			},
			RequestTokenError::Request(e) => map_transport_error(e),
			RequestTokenError::Other(message) => match status {
				Some(status) => match self.provider().check_response(status, &Value::Null) {
					Err(e) => e.into(),
					Ok(()) => Error::UnexpectedResponse { message },
				},
				None => Error::UnexpectedResponse { message },
			},
		}
	}
}

fn into_access_token(response: &BasicTokenResponse) -> Result<AccessToken> {
	let mut token = AccessToken::new(response.access_token().secret().to_owned());

	token.token_type = response.token_type().as_ref().to_owned();

	if let Some(refresh) = response.refresh_token() {
		token = token.with_refresh_token(refresh.secret().to_owned());
	}
	if let Some(expires_in) = response.expires_in() {
		let expires_in = Duration::try_from(expires_in).map_err(|_| Error::UnexpectedResponse {
			message: "expires_in exceeds the supported range".into(),
		})?;

		token = token.with_expires_in(OffsetDateTime::now_utc(), expires_in);
	}
	if let Some(scopes) = response.scopes() {
		token = token.with_scopes(scopes.iter().map(|scope| scope.as_str()));
	}

	Ok(token)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn grant_labels_match_rfc_6749() {
		assert_eq!(GrantType::AuthorizationCode.to_string(), "authorization_code");
		assert_eq!(
			TokenGrant::RefreshToken { refresh_token: "r".into() }.grant_type(),
			GrantType::RefreshToken
		);
		assert_eq!(
			TokenGrant::ClientCredentials { scopes: Vec::new() }.grant_type().as_str(),
			"client_credentials"
		);
	}

	#[test]
	fn grant_debug_hides_secrets() {
		let grant = TokenGrant::RefreshToken { refresh_token: "refresh-secret".into() };

		assert!(!format!("{grant:?}").contains("refresh-secret"));
	}

	#[test]
	fn token_response_maps_into_access_token() {
		let response: BasicTokenResponse = serde_json::from_str(
			r#"{"access_token":"a","token_type":"bearer","expires_in":60,"refresh_token":"r","scope":"read write"}"#,
		)
		.expect("Token response fixture should parse.");
		let token = into_access_token(&response).expect("Token response should convert.");

		assert_eq!(token.secret(), "a");
		assert_eq!(token.refresh_token.as_ref().map(|s| s.expose()), Some("r"));
		assert_eq!(token.token_type, "bearer");
		assert_eq!(token.scopes, vec!["read".to_owned(), "write".to_owned()]);
		assert!(token.expires_at.is_some());
		assert!(!token.has_expired());
	}
}
