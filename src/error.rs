//! Error types shared by the client engine, the transport layer, and provider adapters.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider response classified as a failure.
	#[error(transparent)]
	Provider(#[from] ProviderError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Token endpoint produced an outcome the engine cannot interpret.
	#[error("Provider returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Engine-supplied summary of the response.
		message: String,
	},
	/// Authorization callback carried a `state` that does not match the issued one.
	#[error("Authorization state mismatch.")]
	InvalidState,
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured or derived URL cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body cannot be serialized to JSON.
	#[error("Request body cannot be serialized to JSON.")]
	BodySerialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	pub(crate) fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { url: url.into(), source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured source.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Body decoding failures.
#[derive(Debug, ThisError)]
#[error("Provider returned a body that could not be decoded.")]
pub struct DecodeError {
	/// Structured parsing failure including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code of the response, when the failure happened while reading one.
	pub status: Option<u16>,
}

/// Classification assigned to a provider failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
	/// HTTP-level failure (status >= 400), independent of payload shape.
	Client,
	/// Application-level failure signaled through an `error` field in the body.
	OAuth,
}
impl ProviderErrorKind {
	/// Returns a stable label for the kind.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderErrorKind::Client => "client",
			ProviderErrorKind::OAuth => "oauth",
		}
	}
}
impl Display for ProviderErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Failure classified from a provider response, keeping the status and decoded body.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("Provider rejected the request ({kind}, status {status}): {message}.")]
pub struct ProviderError {
	/// Failure classification.
	pub kind: ProviderErrorKind,
	/// HTTP status code of the response.
	pub status: u16,
	/// Human-readable message extracted from the body or the status reason phrase.
	pub message: String,
	/// Decoded response body.
	pub body: Value,
}
impl ProviderError {
	/// Builds a [`ProviderErrorKind::Client`] failure.
	///
	/// The message prefers the body's `message` field and falls back to the status reason phrase.
	pub fn client(status: StatusCode, body: Value) -> Self {
		let message = body
			.get("message")
			.and_then(Value::as_str)
			.map(str::to_owned)
			.or_else(|| status.canonical_reason().map(str::to_owned))
			.unwrap_or_else(|| status.as_str().to_owned());

		Self { kind: ProviderErrorKind::Client, status: status.as_u16(), message, body }
	}

	/// Builds a [`ProviderErrorKind::OAuth`] failure from the body's `error` field.
	pub fn oauth(status: StatusCode, body: Value) -> Self {
		let error = match body.get("error") {
			Some(Value::String(code)) => code.clone(),
			Some(other) => other.to_string(),
			None => "unknown_error".into(),
		};
		let message = match body.get("error_description").and_then(Value::as_str) {
			Some(description) => format!("{error}: {description}"),
			None => error,
		};

		Self { kind: ProviderErrorKind::OAuth, status: status.as_u16(), message, body }
	}

	/// Returns the body's `error` code when the provider supplied one as a string.
	pub fn error_code(&self) -> Option<&str> {
		self.body.get("error").and_then(Value::as_str)
	}
}
