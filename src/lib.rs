//! Rate-limited, token-caching client for the ISMP marking API: submit commissioning
//! documents under a request ceiling while one bearer token is shared across calls.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod obs;
pub mod rate_limit;
pub mod signer;
pub mod submission;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for unit and integration tests.

	pub use crate::_prelude::*;
	pub use crate::clock::ManualClock;

	// self
	use crate::{
		clock::Clock,
		config::ClientConfig,
		http::ReqwestHttpClient,
		signer::StaticSigner,
		submission::SubmissionClient,
	};

	/// Submission client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = SubmissionClient<ReqwestHttpClient>;

	/// Builds a config pointing at `base_url` with the provided request ceiling per second.
	pub fn test_config(base_url: &str, request_limit: u32) -> ClientConfig {
		ClientConfig::builder()
			.base_url(Url::parse(base_url).expect("Failed to parse mock API base URL."))
			.request_limit(request_limit)
			.period(Duration::SECOND)
			.build()
			.expect("Failed to build client config for tests.")
	}

	/// Constructs a [`SubmissionClient`] against `base_url` using the real system clock.
	pub fn build_test_client(base_url: &str, request_limit: u32) -> ReqwestTestClient {
		SubmissionClient::new(test_config(base_url, request_limit))
			.expect("Failed to build submission client for tests.")
	}

	/// Constructs a [`SubmissionClient`] against `base_url` driven by the provided clock.
	pub fn build_test_client_with_clock(
		base_url: &str,
		request_limit: u32,
		clock: Arc<dyn Clock>,
	) -> ReqwestTestClient {
		let config = test_config(base_url, request_limit);
		let http_client = ReqwestHttpClient::from_config(&config)
			.expect("Failed to build reqwest client for tests.");

		SubmissionClient::with_http_client(config, http_client, clock)
			.expect("Failed to build submission client for tests.")
	}

	/// Signer returning the fixed sandbox signature.
	pub fn test_signer() -> StaticSigner {
		StaticSigner::default()
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, proptest as _};
