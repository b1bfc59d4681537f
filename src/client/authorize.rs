//! Authorization URL construction (state + optional PKCE).

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*, auth::TokenSecret, client::OAuthClient, http::HttpTransport, provider::Provider,
};

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// PKCE method applied to authorization requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PkceMethod {
	/// No PKCE parameters are sent.
	#[default]
	#[serde(rename = "none")]
	None,
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}

/// Per-request overrides for [`OAuthClient::authorization_request`].
#[derive(Clone, Debug, Default)]
pub struct AuthorizationParams {
	/// Scopes to request instead of the provider defaults.
	pub scopes: Option<Vec<String>>,
	/// Caller-chosen `state`; a random one is generated when absent.
	pub state: Option<String>,
	/// Redirect URI overriding the client option.
	pub redirect_uri: Option<Url>,
	/// Additional query parameters.
	pub extra: BTreeMap<String, String>,
}

/// Authorization redirect prepared for an end user.
#[derive(Clone)]
pub struct AuthorizationRequest {
	/// Fully-formed authorize URL to send the user to.
	pub url: Url,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	pkce_verifier: Option<TokenSecret>,
}
impl AuthorizationRequest {
	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::InvalidState) }
	}

	/// PKCE verifier to present during the code exchange, when PKCE is enabled.
	pub fn pkce_verifier(&self) -> Option<&str> {
		self.pkce_verifier.as_ref().map(TokenSecret::expose)
	}
}
impl Debug for AuthorizationRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationRequest")
			.field("url", &self.url)
			.field("state", &self.state)
			.field("pkce", &self.pkce_verifier.is_some())
			.finish()
	}
}

impl<P, C> OAuthClient<P, C>
where
	P: Provider,
	C: HttpTransport,
{
	/// Builds the authorization redirect.
	///
	/// Query parameters follow the provider's authorization URL in this order: `state`, `scope`
	/// (omitted when empty), `response_type=code`, `approval_prompt=auto`, `redirect_uri` (when
	/// configured), `client_id`, the PKCE pair (when enabled), then any extra parameters.
	pub fn authorization_request(&self, params: AuthorizationParams) -> AuthorizationRequest {
		let AuthorizationParams { scopes, state, redirect_uri, extra } = params;
		let state = state.unwrap_or_else(|| random_string(STATE_LEN));
		let scopes = scopes.as_deref().unwrap_or(self.provider().default_scopes());
		let redirect_uri = redirect_uri.as_ref().or(self.options().redirect_uri.as_ref());
		let pkce_verifier = match self.options().pkce_method {
			PkceMethod::None => None,
			PkceMethod::S256 => Some(random_string(PKCE_VERIFIER_LEN)),
		};
		let mut url = self.provider().authorization_url();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("state", &state);

		if !scopes.is_empty() {
			pairs.append_pair("scope", &scopes.join(self.provider().scope_separator()));
		}

		pairs.append_pair("response_type", "code");
		pairs.append_pair("approval_prompt", "auto");

		if let Some(redirect_uri) = redirect_uri {
			pairs.append_pair("redirect_uri", redirect_uri.as_str());
		}

		pairs.append_pair("client_id", &self.options().client_id);

		if let Some(verifier) = &pkce_verifier {
			pairs.append_pair("code_challenge", &compute_pkce_challenge(verifier));
			pairs.append_pair("code_challenge_method", "S256");
		}
		for (key, value) in &extra {
			pairs.append_pair(key, value);
		}

		drop(pairs);

		AuthorizationRequest { url, state, pkce_verifier: pkce_verifier.map(TokenSecret::new) }
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(verifier.as_bytes());
	let digest = hasher.finalize();
	URL_SAFE_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn state_validation_errors_on_mismatch() {
		let request = AuthorizationRequest {
			url: Url::parse("https://api.lock.me/authorize?state=expected")
				.expect("Authorization URL fixture should parse successfully."),
			state: "expected".into(),
			pkce_verifier: None,
		};

		assert!(request.validate_state("expected").is_ok());
		assert!(matches!(request.validate_state("other"), Err(Error::InvalidState)));
	}

	#[test]
	fn pkce_challenge_matches_rfc_7636_vector() {
		assert_eq!(
			compute_pkce_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
			"E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
		);
	}

	#[test]
	fn random_strings_are_alphanumeric() {
		let value = random_string(STATE_LEN);

		assert_eq!(value.len(), STATE_LEN);
		assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
	}
}
