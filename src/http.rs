//! Transport primitives for provider calls.
//!
//! The module exposes [`HttpTransport`] alongside [`ResponseMetadata`] and
//! [`ResponseMetadataSlot`] so downstream crates can plug in custom HTTP clients. Implementations
//! call [`ResponseMetadataSlot::take`] before dispatching a request and
//! [`ResponseMetadataSlot::store`] once an HTTP status is known, which lets the client engine
//! classify token endpoint failures with the real response status even after the `oauth2` crate
//! has consumed the response.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Abstraction over HTTP transports used for token exchanges and API calls.
///
/// The trait is the engine's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a single transport can back many clients, and the handles they
/// return must own whatever state their request futures need.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records outcomes in `slot`.
	///
	/// # Metadata Contract
	///
	/// - Call [`ResponseMetadataSlot::take`] before submitting the HTTP request.
	/// - Once an HTTP response provides a status, save it with [`ResponseMetadataSlot::store`].
	/// - Store the raw response body as well once it has been read, so token endpoint failures
	///   can be classified against the body the provider actually sent.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Captures metadata from the most recent HTTP response.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the provider, if available.
	pub status: Option<u16>,
	/// Raw response body, once it has been read.
	pub body: Option<Vec<u8>>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Reqwest-backed transport.
///
/// Redirects are never followed: OAuth endpoints answer directly and the engine must see the
/// original status. The wrapper remembers whether certificate verification is enabled so callers
/// can audit the collaborator a provider selected.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHttpClient {
	client: ReqwestClient,
	verify_tls: bool,
}
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a transport that verifies TLS certificates.
	pub fn new() -> Result<Self, ConfigError> {
		Self::build(true)
	}

	/// Builds a transport that accepts any TLS certificate.
	///
	/// Only meant for development servers with self-signed certificates.
	pub fn insecure() -> Result<Self, ConfigError> {
		Self::build(false)
	}

	/// Wraps an existing reqwest [`ReqwestClient`], recording it as verifying certificates.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, verify_tls: true }
	}

	/// Returns `true` when TLS certificates are verified.
	pub fn verifies_tls(&self) -> bool {
		self.verify_tls
	}

	fn build(verify_tls: bool) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.danger_accept_invalid_certs(!verify_tls)
			.build()?;

		Ok(Self { client, verify_tls })
	}

	pub(crate) fn instrumented(&self, slot: ResponseMetadataSlot) -> InstrumentedHandle {
		InstrumentedHandle::new(self.client.clone(), slot)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestHttpClient").field("verify_tls", &self.verify_tls).finish()
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type Handle = InstrumentedHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		self.instrumented(slot)
	}
}

#[cfg(feature = "reqwest")]
struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`HttpTransport`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
#[cfg(feature = "reqwest")]
impl InstrumentedHandle {
	fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self(Arc::new(InstrumentedHttpClient { client, slot }))
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			client.slot.store(ResponseMetadata { status: Some(status.as_u16()), body: None });

			let body = response.bytes().await.map_err(Box::new)?.to_vec();

			client
				.slot
				.store(ResponseMetadata { status: Some(status.as_u16()), body: Some(body.clone()) });

			let mut response_new = HttpResponse::new(body);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[test]
	fn insecure_transport_reports_disabled_verification() {
		let secure = ReqwestHttpClient::new().expect("Verifying transport should build.");
		let insecure = ReqwestHttpClient::insecure().expect("Insecure transport should build.");

		assert!(secure.verifies_tls());
		assert!(!insecure.verifies_tls());
		assert!(ReqwestHttpClient::with_client(ReqwestClient::new()).verifies_tls());
	}

	#[test]
	fn metadata_slot_is_consumed_on_take() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(401), body: Some(b"{}".to_vec()) });

		let meta = slot.take().expect("Stored metadata should be returned.");

		assert_eq!(meta.status, Some(401));
		assert_eq!(meta.body.as_deref(), Some(&b"{}"[..]));
		assert!(slot.take().is_none());
	}
}
