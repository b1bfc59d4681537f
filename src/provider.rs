//! Provider capability contract and the Lockme adapter.
//!
//! [`Provider`] is the narrow interface the generic [`OAuthClient`](crate::client::OAuthClient)
//! consumes: endpoint URLs, default scopes, response classification, and resource-owner
//! construction. Adapters are plain structs composed into the client rather than subclasses of it.

pub mod lockme;

pub use lockme::*;

// self
use crate::{_prelude::*, auth::AccessToken, error::ProviderError};

/// Endpoint wiring and response policy supplied by a concrete OAuth 2.0 provider.
pub trait Provider
where
	Self: 'static + Send + Sync,
{
	/// Resource owner produced from the details endpoint.
	type ResourceOwner: ResourceOwner;

	/// Base authorization endpoint (before query parameters are appended).
	fn authorization_url(&self) -> Url;

	/// Token endpoint for the given request parameters.
	fn access_token_url(&self, params: &BTreeMap<String, String>) -> Url;

	/// Endpoint returning the authenticated resource owner.
	fn resource_owner_details_url(&self, token: &AccessToken) -> Url;

	/// Scopes requested when the caller does not supply any.
	fn default_scopes(&self) -> &[String];

	/// Separator used to join scopes into the `scope` parameter.
	fn scope_separator(&self) -> &str {
		" "
	}

	/// Classifies a decoded response; an `Err` aborts the call that produced it.
	fn check_response(&self, status: StatusCode, body: &Value) -> Result<(), ProviderError>;

	/// Builds the resource owner from the decoded details response.
	fn create_resource_owner(
		&self,
		body: Value,
		token: &AccessToken,
	) -> Result<Self::ResourceOwner>;
}

/// Authenticated user or entity returned by a provider.
pub trait ResourceOwner
where
	Self: Send + Sync,
{
	/// Provider-assigned identifier, if present.
	fn id(&self) -> Option<&Value>;

	/// All fields reported by the provider.
	fn to_map(&self) -> &Map<String, Value>;
}
