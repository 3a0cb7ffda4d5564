//! Client-level error types shared across the limiter, credential manager, and submissions.

// self
use crate::{_prelude::*, auth::AuthError, document::DocumentType, signer::SignerError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Remote business outcomes (accepted, rejected, transport failures during the submission
/// itself) are returned as [`SubmissionResult`](crate::submission::SubmissionResult) data; only
/// the failures below are raised.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authentication against the API failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// The signing capability failed while building the envelope.
	#[error(transparent)]
	Signer(#[from] SignerError),

	/// Only commissioning documents may be submitted through this client.
	#[error("Document type {document_type} is not supported; expected a commissioning type.")]
	UnsupportedDocumentType {
		/// Rejected document type.
		document_type: DocumentType,
	},
	/// The caller cancelled the operation while it was suspended.
	#[error("Operation was cancelled.")]
	Cancelled,
}
impl From<Cancelled> for Error {
	fn from(_: Cancelled) -> Self {
		Self::Cancelled
	}
}

/// Marker returned when a cancellable wait was interrupted before it completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Wait was cancelled before completion.")]
pub struct Cancelled;

/// Configuration and validation failures raised while constructing clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configuration value is out of range or malformed.
	#[error("Invalid configuration for `{field}`: {reason}.")]
	InvalidConfiguration {
		/// Offending configuration field.
		field: &'static str,
		/// Human-readable explanation.
		reason: String,
	},
	/// An endpoint URL could not be joined onto the base URL.
	#[error("Endpoint `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Relative endpoint path.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Shorthand for [`ConfigError::InvalidConfiguration`].
	pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidConfiguration { field, reason: reason.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, wire encoding).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[source] serde_json::Error),
	/// Response body could not be decoded.
	#[error("API returned a malformed response body.")]
	Decode {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
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
