//! Authentication: the cached credential, its wire exchange, and the refresh coordinator.

pub mod credential;
pub mod manager;
pub mod secret;
pub mod wire;

pub use credential::*;
pub use manager::*;
pub use secret::*;
pub use wire::AuthChallenge;

// self
use crate::{_prelude::*, signer::SignerError};

type SharedError = Arc<dyn StdError + Send + Sync>;

/// Authentication failures.
///
/// Cloneable so a single failed refresh can be reported to every caller that was waiting on it.
#[derive(Clone, Debug, ThisError)]
pub enum AuthError {
	/// The challenge request failed (transport error, non-2xx status, or unreadable body).
	#[error("Authorization challenge failed: {detail}.")]
	Challenge {
		/// HTTP status code, when a response was received.
		status: Option<u16>,
		/// Response body or failure summary.
		detail: String,
		/// Underlying failure, if any.
		#[source]
		source: Option<SharedError>,
	},
	/// The token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {body}.")]
	Token {
		/// HTTP status code.
		status: u16,
		/// Response body.
		body: String,
	},
	/// The token request could not be sent or its response could not be read.
	#[error("Token request failed before a response was received.")]
	TokenTransport {
		/// Underlying transport failure.
		#[source]
		source: SharedError,
	},
	/// The token endpoint answered 2xx with a body that is not a token.
	#[error("Token endpoint returned a malformed body.")]
	MalformedToken {
		/// Decoding failure.
		#[source]
		source: SharedError,
	},
	/// The signer failed to sign the challenge.
	#[error(transparent)]
	Signer(#[from] SignerError),
}
impl AuthError {
	/// Returns the HTTP status tied to the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Challenge { status, .. } => *status,
			Self::Token { status, .. } => Some(*status),
			_ => None,
		}
	}
}
