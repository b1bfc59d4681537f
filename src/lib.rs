//! Lockme OAuth 2.0 provider adapter: endpoint wiring, token exchange, resource-owner lookup, and
//! typed error classification on top of a composable OAuth 2.0 client engine.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use oauth2::http::{HeaderMap, Method, StatusCode};
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

#[cfg(feature = "reqwest")]
pub use crate::provider::LockmeClient;
pub use crate::{
	auth::{AccessToken, Credential},
	client::OAuthClient,
	error::{Error, ProviderError, ProviderErrorKind, Result},
	provider::{ApiTarget, Lockme, LockmeOptions, LockmeUser, Provider, ResourceOwner},
};
