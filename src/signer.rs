//! Signing capability consumed by the authentication and submission paths.
//!
//! The client never inspects signatures; it only base64-encodes whatever bytes the
//! [`Signer`] returns. Real deployments plug in a qualified electronic signature provider.

// self
use crate::_prelude::*;

/// Signature value accepted by the API sandbox.
pub const TEST_SIGNATURE: &str = "TEST_SIGNATURE";

/// Produces a detached signature over the provided bytes.
pub trait Signer
where
	Self: Send + Sync,
{
	/// Signs `payload` and returns the raw signature bytes.
	fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// Failure reported by a [`Signer`] implementation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Signer failed: {message}.")]
pub struct SignerError {
	/// Human-readable reason.
	pub message: String,
}
impl SignerError {
	/// Creates a new error with the provided reason.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Signer that ignores its input and always returns the same bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticSigner(Vec<u8>);
impl StaticSigner {
	/// Wraps a fixed signature value.
	pub fn new(signature: impl Into<Vec<u8>>) -> Self {
		Self(signature.into())
	}
}
impl Default for StaticSigner {
	fn default() -> Self {
		Self::new(TEST_SIGNATURE)
	}
}
impl Signer for StaticSigner {
	fn sign(&self, _payload: &[u8]) -> Result<Vec<u8>, SignerError> {
		Ok(self.0.clone())
	}
}
impl Debug for StaticSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("StaticSigner").field(&self.0.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn static_signer_defaults_to_sandbox_value() {
		let signature = StaticSigner::default().sign(b"anything").expect("Static signer cannot fail.");

		assert_eq!(signature, TEST_SIGNATURE.as_bytes());
	}
}
