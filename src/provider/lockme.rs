//! Lockme provider adapter.
//!
//! [`Lockme`] wires the Lockme API into the generic [`OAuthClient`]: the three OAuth endpoints,
//! the `/{version}/me` resource-owner lookup, the response classification policy, and
//! [`OAuthClient::execute_request`] for arbitrary authenticated calls against
//! `{api_domain}/{api_version}{path}`.

mod options;
mod user;

pub use options::*;
pub use user::*;

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::{self, AccessToken, Credential, RequestOptions},
	client::OAuthClient,
	error::{ConfigError, DecodeError, ProviderError},
	http::HttpTransport,
	obs::RequestKind,
	provider::Provider,
};

#[cfg(feature = "reqwest")]
/// Lockme client backed by the crate's default reqwest transport.
pub type LockmeClient = OAuthClient<Lockme, ReqwestHttpClient>;

/// Lockme OAuth 2.0 provider adapter.
#[derive(Clone, Debug)]
pub struct Lockme {
	config: LockmeConfig,
	authorization_url: Url,
	access_token_url: Url,
	resource_owner_details_url: Url,
}
impl Lockme {
	/// Builds the adapter from a resolved configuration.
	pub fn new(config: LockmeConfig) -> Result<Self, ConfigError> {
		let authorization_url = parse_url(format!("{}/authorize", config.api_domain))?;
		let access_token_url = parse_url(format!("{}/access_token", config.api_domain))?;
		let resource_owner_details_url =
			parse_url(format!("{}/{}/me", config.api_domain, config.api_version))?;

		Ok(Self { config, authorization_url, access_token_url, resource_owner_details_url })
	}

	/// Builds the adapter from caller options.
	pub fn from_options(options: &LockmeOptions) -> Result<Self, ConfigError> {
		Self::new(LockmeConfig::from_options(options)?)
	}

	/// Builds a client with the default reqwest transport.
	///
	/// When `ignore_ssl_errors` is set, the transport skips TLS certificate verification;
	/// otherwise certificates are verified. Client options are forwarded to the engine.
	#[cfg(feature = "reqwest")]
	pub fn client(options: LockmeOptions) -> Result<LockmeClient, ConfigError> {
		let http_client = if options.ignore_ssl_errors {
			ReqwestHttpClient::insecure()?
		} else {
			ReqwestHttpClient::new()?
		};

		Self::with_http_client(options, http_client)
	}

	/// Builds a client around a caller-provided transport.
	pub fn with_http_client<C>(
		options: LockmeOptions,
		http_client: impl Into<Arc<C>>,
	) -> Result<OAuthClient<Self, C>, ConfigError>
	where
		C: HttpTransport,
	{
		let provider = Self::from_options(&options)?;

		Ok(OAuthClient::new(provider, http_client, options.client))
	}

	/// Resolved configuration.
	pub fn config(&self) -> &LockmeConfig {
		&self.config
	}

	/// Base URL without a trailing slash.
	pub fn api_domain(&self) -> &str {
		&self.config.api_domain
	}

	/// API version path segment.
	pub fn api_version(&self) -> &str {
		&self.config.api_version
	}

	/// Resolves `path` against `{api_domain}/{api_version}`; `path` is appended verbatim.
	pub fn api_url(&self, path: &str) -> Result<Url, ConfigError> {
		parse_url(format!("{}/{}{path}", self.config.api_domain, self.config.api_version))
	}
}
impl Provider for Lockme {
	type ResourceOwner = LockmeUser;

	fn authorization_url(&self) -> Url {
		self.authorization_url.clone()
	}

	fn access_token_url(&self, _params: &BTreeMap<String, String>) -> Url {
		self.access_token_url.clone()
	}

	fn resource_owner_details_url(&self, _token: &AccessToken) -> Url {
		self.resource_owner_details_url.clone()
	}

	fn default_scopes(&self) -> &[String] {
		&self.config.default_scopes
	}

	fn scope_separator(&self) -> &str {
		","
	}

	fn check_response(&self, status: StatusCode, body: &Value) -> Result<(), ProviderError> {
		if status.as_u16() >= 400 {
			return Err(ProviderError::client(status, body.clone()));
		}
		if body.get("error").is_some_and(|error| !error.is_null()) {
			return Err(ProviderError::oauth(status, body.clone()));
		}

		Ok(())
	}

	fn create_resource_owner(&self, body: Value, _token: &AccessToken) -> Result<LockmeUser> {
		LockmeUser::try_from(body)
	}
}

impl<C> OAuthClient<Lockme, C>
where
	C: HttpTransport,
{
	/// Sends an authenticated request to `{api_domain}/{api_version}{path}` and returns the
	/// decoded JSON body.
	///
	/// A present, non-empty `body` is serialized as JSON with `Content-Type: application/json`;
	/// `null`, `false`, zero, `""`, `"0"`, `[]`, and `{}` count as empty and send no body. Responses are classified by
	/// [`Lockme::check_response`](Provider::check_response).
	pub async fn execute_request<'a, B>(
		&self,
		method: Method,
		path: &str,
		credential: impl Into<Credential<'a>>,
		body: Option<&B>,
	) -> Result<Value>
	where
		B: ?Sized + Serialize,
	{
		let credential = credential.into();
		let body = body.map(serde_json::to_value).transpose().map_err(ConfigError::BodySerialize)?;
		let options = match body {
			Some(value) if !is_empty_body(&value) =>
				RequestOptions::default().with_json_body(&value)?,
			_ => RequestOptions::default(),
		};
		let url = self.provider().api_url(path)?;
		let request = auth::authenticated_request(method, &url, credential, options)?;

		self.dispatch(RequestKind::Api, "execute_request", request).await
	}

	/// Same as [`execute_request`](Self::execute_request), decoding the body into `T`.
	pub async fn execute_request_as<'a, T, B>(
		&self,
		method: Method,
		path: &str,
		credential: impl Into<Credential<'a>>,
		body: Option<&B>,
	) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let value = self.execute_request(method, path, credential, body).await?;

		serde_path_to_error::deserialize(value)
			.map_err(|source| DecodeError { source, status: None }.into())
	}
}

fn parse_url(raw: String) -> Result<Url, ConfigError> {
	Url::parse(&raw).map_err(|e| ConfigError::invalid_url(raw, e))
}

// Falsy values count as empty: `null`, `false`, zero, `""`, `"0"`, `[]`, and `{}`.
fn is_empty_body(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
		Value::String(text) => text.is_empty() || text == "0",
		Value::Array(items) => items.is_empty(),
		Value::Object(fields) => fields.is_empty(),
	}
}
