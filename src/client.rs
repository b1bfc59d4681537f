//! Generic OAuth 2.0 client engine driven by a [`Provider`].
//!
//! [`OAuthClient`] owns the transport and client credentials and delegates every
//! provider-specific decision (endpoints, scopes, response classification, resource-owner shape)
//! to its [`Provider`]. Each operation performs a single round trip; nothing is cached or retried.

pub mod authorize;
pub mod token;

pub use authorize::*;
pub use token::*;

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest};
// self
use crate::{
	_prelude::*,
	auth::{self, AccessToken, RequestOptions, TokenSecret},
	error::{ConfigError, DecodeError, TransportError},
	http::{HttpTransport, ResponseMetadataSlot},
	obs::{self, RequestKind, RequestOutcome, RequestSpan},
	provider::Provider,
};

/// Options consumed by the engine itself; provider adapters forward them untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential clients.
	pub client_secret: Option<TokenSecret>,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Option<Url>,
	/// PKCE method applied to authorization requests.
	pub pkce_method: PkceMethod,
}
impl ClientOptions {
	/// Creates options for the given client identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), ..Default::default() }
	}

	/// Sets the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Selects the PKCE method.
	pub fn with_pkce_method(mut self, method: PkceMethod) -> Self {
		self.pkce_method = method;

		self
	}
}

/// OAuth 2.0 client bound to a single provider and transport.
pub struct OAuthClient<P, C>
where
	P: Provider,
	C: HttpTransport,
{
	provider: Arc<P>,
	http_client: Arc<C>,
	options: ClientOptions,
}
impl<P, C> OAuthClient<P, C>
where
	P: Provider,
	C: HttpTransport,
{
	/// Composes a provider, a transport, and client options.
	pub fn new(
		provider: impl Into<Arc<P>>,
		http_client: impl Into<Arc<C>>,
		options: ClientOptions,
	) -> Self {
		Self { provider: provider.into(), http_client: http_client.into(), options }
	}

	/// Provider adapter driving this client.
	pub fn provider(&self) -> &P {
		&self.provider
	}

	/// Transport used for every outbound request.
	pub fn http_client(&self) -> &C {
		&self.http_client
	}

	/// Client options.
	pub fn options(&self) -> &ClientOptions {
		&self.options
	}

	/// Fetches the resource owner the token belongs to.
	pub async fn resource_owner(&self, token: &AccessToken) -> Result<P::ResourceOwner> {
		let url = self.provider.resource_owner_details_url(token);
		let request =
			auth::authenticated_request(Method::GET, &url, token.into(), RequestOptions::default())?;
		let body = self.dispatch(RequestKind::ResourceOwner, "resource_owner", request).await?;

		self.provider.create_resource_owner(body, token)
	}

	/// Dispatches a prepared request, decodes the JSON body, and applies the provider's
	/// classification.
	pub async fn parsed_response(&self, request: HttpRequest) -> Result<Value> {
		self.dispatch(RequestKind::Api, "parsed_response", request).await
	}

	pub(crate) async fn dispatch(
		&self,
		kind: RequestKind,
		stage: &'static str,
		request: HttpRequest,
	) -> Result<Value> {
		observe(kind, stage, async move {
			let handle = self.http_client.with_metadata(ResponseMetadataSlot::default());
			let response = handle.call(request).await.map_err(map_transport_error)?;
			let status = response.status();
			let body = decode_body(status, response.body())?;

			self.provider.check_response(status, &body)?;

			Ok(body)
		})
		.await
	}
}
impl<P, C> Clone for OAuthClient<P, C>
where
	P: Provider,
	C: HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			provider: self.provider.clone(),
			http_client: self.http_client.clone(),
			options: self.options.clone(),
		}
	}
}
impl<P, C> Debug for OAuthClient<P, C>
where
	P: Provider + Debug,
	C: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("provider", &self.provider)
			.field("client_id", &self.options.client_id)
			.field("client_secret_set", &self.options.client_secret.is_some())
			.finish()
	}
}

/// Runs `fut` inside a request span and records its outcome.
async fn observe<T, F>(kind: RequestKind, stage: &'static str, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	let span = RequestSpan::new(kind, stage);

	obs::record_request_outcome(kind, RequestOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_request_outcome(kind, RequestOutcome::Success),
		Err(err) => {
			obs::record_request_outcome(kind, RequestOutcome::Failure);
			obs::trace_rejection(kind, err);
		},
	}

	result
}

/// Decodes a response body as JSON.
///
/// An empty body decodes to `null`. A body that is not JSON is carried as a JSON string when the
/// status already signals failure, so classification still sees it.
fn decode_body(status: StatusCode, bytes: &[u8]) -> Result<Value> {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}

	let mut de = serde_json::Deserializer::from_slice(bytes);

	match serde_path_to_error::deserialize(&mut de) {
		Ok(value) => Ok(value),
		Err(_) if status.as_u16() >= 400 =>
			Ok(Value::String(String::from_utf8_lossy(bytes).into_owned())),
		Err(source) => Err(DecodeError { source, status: Some(status.as_u16()) }.into()),
	}
}

fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unrecognized transport failure".into() }.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn decode_body_handles_empty_and_invalid_payloads() {
		assert_eq!(
			decode_body(StatusCode::OK, b"").expect("Empty bodies should decode."),
			Value::Null
		);
		assert_eq!(
			decode_body(StatusCode::OK, br#"{"id":1}"#).expect("JSON bodies should decode."),
			json!({ "id": 1 })
		);
		assert_eq!(
			decode_body(StatusCode::BAD_GATEWAY, b"<html>oops</html>")
				.expect("Error pages should be carried as strings."),
			json!("<html>oops</html>")
		);

		let err = decode_body(StatusCode::OK, b"<html>").expect_err("Invalid JSON should fail.");

		assert!(matches!(err, Error::Decode(DecodeError { status: Some(200), .. })));
	}

	#[test]
	fn transport_failures_map_into_transport_errors() {
		let err = map_transport_error::<std::io::Error>(HttpClientError::Other("reset".into()));

		assert!(matches!(
			err,
			Error::Transport(TransportError::Other { ref message }) if message == "reset"
		));

		let err = map_transport_error::<std::io::Error>(HttpClientError::Io(std::io::Error::other(
			"broken pipe",
		)));

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));

		let err = map_transport_error(HttpClientError::Reqwest(Box::new(std::io::Error::other(
			"refused",
		))));

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	}

	#[test]
	fn client_options_builders_apply() {
		let redirect =
			Url::parse("https://app.example/callback").expect("Redirect fixture should parse.");
		let options = ClientOptions::new("client")
			.with_client_secret("secret")
			.with_redirect_uri(redirect.clone())
			.with_pkce_method(PkceMethod::S256);

		assert_eq!(options.client_id, "client");
		assert_eq!(options.client_secret.as_ref().map(TokenSecret::expose), Some("secret"));
		assert_eq!(options.redirect_uri, Some(redirect));
		assert_eq!(options.pkce_method, PkceMethod::S256);
	}
}
