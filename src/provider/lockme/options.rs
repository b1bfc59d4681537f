// self
use crate::{
	_prelude::*,
	client::{ClientOptions, PkceMethod},
	error::ConfigError,
};

/// Lockme deployment selected by the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiTarget {
	/// Current production API.
	#[default]
	Production,
	/// Previous `lockme.pl` deployment.
	Legacy,
}
impl ApiTarget {
	/// Base domain of the deployment.
	pub const fn api_domain(self) -> &'static str {
		match self {
			ApiTarget::Production => "https://api.lock.me",
			ApiTarget::Legacy => "https://lockme.pl",
		}
	}

	/// API version path segment of the deployment.
	pub const fn api_version(self) -> &'static str {
		match self {
			ApiTarget::Production => "v2.3",
			ApiTarget::Legacy => "v2.0",
		}
	}
}

/// Options accepted when constructing a Lockme client.
///
/// Everything under [`ClientOptions`] is forwarded to the generic engine untouched. The struct
/// deserializes from flat maps, so `{"client_id": "..", "api_domain": "..", "ignoreSslErrors":
/// true}` is a valid source.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LockmeOptions {
	/// Deployment providing the default domain and version.
	pub target: ApiTarget,
	/// Base URL override.
	pub api_domain: Option<String>,
	/// API version override.
	pub api_version: Option<String>,
	/// Skip TLS certificate verification on the default transport.
	#[serde(alias = "ignoreSslErrors")]
	pub ignore_ssl_errors: bool,
	/// Default scopes requested during authorization.
	pub scopes: Vec<String>,
	/// Options forwarded to the client engine.
	#[serde(flatten)]
	pub client: ClientOptions,
}
impl LockmeOptions {
	/// Creates options for the given OAuth client identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client: ClientOptions::new(client_id), ..Default::default() }
	}

	/// Sets the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client = self.client.with_client_secret(secret);

		self
	}

	/// Sets the redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.client = self.client.with_redirect_uri(redirect_uri);

		self
	}

	/// Selects the PKCE method.
	pub fn with_pkce_method(mut self, method: PkceMethod) -> Self {
		self.client = self.client.with_pkce_method(method);

		self
	}

	/// Selects the deployment.
	pub fn with_target(mut self, target: ApiTarget) -> Self {
		self.target = target;

		self
	}

	/// Overrides the base URL.
	pub fn with_api_domain(mut self, api_domain: impl Into<String>) -> Self {
		self.api_domain = Some(api_domain.into());

		self
	}

	/// Overrides the API version segment.
	pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
		self.api_version = Some(api_version.into());

		self
	}

	/// Toggles TLS certificate verification on the default transport.
	pub fn ignore_ssl_errors(mut self, ignore: bool) -> Self {
		self.ignore_ssl_errors = ignore;

		self
	}

	/// Replaces the default scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}
}

/// Resolved adapter configuration; immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockmeConfig {
	/// Base URL without a trailing slash.
	pub api_domain: String,
	/// API version path segment.
	pub api_version: String,
	/// Whether the default transport skips certificate verification.
	pub ignore_ssl_errors: bool,
	/// Default scopes, in configured order.
	pub default_scopes: Vec<String>,
}
impl LockmeConfig {
	/// Resolves overrides against the selected [`ApiTarget`].
	pub fn from_options(options: &LockmeOptions) -> Result<Self, ConfigError> {
		let api_domain = options
			.api_domain
			.as_deref()
			.unwrap_or(options.target.api_domain())
			.trim_end_matches('/')
			.to_owned();
		let api_version = options
			.api_version
			.as_deref()
			.unwrap_or(options.target.api_version())
			.trim_matches('/')
			.to_owned();

		Url::parse(&api_domain).map_err(|e| ConfigError::invalid_url(api_domain.clone(), e))?;

		Ok(Self {
			api_domain,
			api_version,
			ignore_ssl_errors: options.ignore_ssl_errors,
			default_scopes: options.scopes.clone(),
		})
	}
}
impl Default for LockmeConfig {
	fn default() -> Self {
		let target = ApiTarget::default();

		Self {
			api_domain: target.api_domain().into(),
			api_version: target.api_version().into(),
			ignore_ssl_errors: false,
			default_scopes: Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn overrides_win_over_target_defaults() {
		let config = LockmeConfig::from_options(
			&LockmeOptions::new("client")
				.with_target(ApiTarget::Legacy)
				.with_api_domain("https://example.test/"),
		)
		.expect("Override configuration should resolve.");

		assert_eq!(config.api_domain, "https://example.test");
		assert_eq!(config.api_version, "v2.0");
	}

	#[test]
	fn legacy_target_resolves_its_defaults() {
		let config =
			LockmeConfig::from_options(&LockmeOptions::new("client").with_target(ApiTarget::Legacy))
				.expect("Legacy configuration should resolve.");

		assert_eq!(config.api_domain, "https://lockme.pl");
		assert_eq!(config.api_version, "v2.0");
		assert_eq!(LockmeConfig::default().api_domain, "https://api.lock.me");
	}

	#[test]
	fn rejects_relative_domains() {
		let err =
			LockmeConfig::from_options(&LockmeOptions::new("client").with_api_domain("lock.me"))
				.expect_err("Relative domains must be rejected.");

		assert!(matches!(err, ConfigError::InvalidUrl { .. }));
	}

	#[test]
	fn deserializes_flat_option_maps() {
		let options: LockmeOptions = serde_json::from_str(
			r#"{
				"client_id": "abc",
				"client_secret": "shh",
				"api_domain": "https://example.test",
				"ignoreSslErrors": true,
				"target": "legacy"
			}"#,
		)
		.expect("Flat option maps should deserialize.");

		assert_eq!(options.client.client_id, "abc");
		assert_eq!(options.client.client_secret.as_ref().map(|s| s.expose()), Some("shh"));
		assert_eq!(options.api_domain.as_deref(), Some("https://example.test"));
		assert!(options.ignore_ssl_errors);
		assert_eq!(options.target, ApiTarget::Legacy);
		assert!(options.scopes.is_empty());
	}
}
