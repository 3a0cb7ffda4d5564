//! Cached credential record and its freshness rules.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// How the cached token came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrigin {
	/// Issued by the token endpoint.
	Issued,
	/// Placeholder synthesized after the sandbox rejected the signature.
	Sandbox,
}

/// Freshness of a [`Credential`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialStatus {
	/// No token has been issued yet (or it was invalidated).
	Missing,
	/// The token may be reused.
	Fresh,
	/// The token outlived its lifetime.
	Stale,
}

/// Cached bearer token plus the instant it was issued.
///
/// Replaced wholesale on every refresh; never mutated in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	/// Bearer token, if one has been issued.
	pub token: Option<TokenSecret>,
	/// Issue instant recorded by the client clock.
	pub issued_at: Option<OffsetDateTime>,
	/// How long the token is reused after `issued_at`.
	pub lifetime: Duration,
	/// Where the token came from.
	pub origin: TokenOrigin,
}
impl Credential {
	/// Creates an empty credential that forces a refresh on first use.
	pub fn empty(lifetime: Duration) -> Self {
		Self { token: None, issued_at: None, lifetime, origin: TokenOrigin::Issued }
	}

	/// Creates a credential for a freshly obtained token.
	pub fn issued(
		token: TokenSecret,
		issued_at: OffsetDateTime,
		lifetime: Duration,
		origin: TokenOrigin,
	) -> Self {
		Self { token: Some(token), issued_at: Some(issued_at), lifetime, origin }
	}

	/// Computes the freshness at `now`.
	///
	/// A token is fresh while `now - issued_at < lifetime`. The comparison uses wall-clock
	/// instants, so an issue time in the future (clock stepped backwards) still counts as fresh.
	pub fn status_at(&self, now: OffsetDateTime) -> CredentialStatus {
		match (&self.token, self.issued_at) {
			(Some(_), Some(issued_at)) if now - issued_at < self.lifetime => CredentialStatus::Fresh,
			(Some(_), Some(_)) => CredentialStatus::Stale,
			_ => CredentialStatus::Missing,
		}
	}

	/// Returns `true` if the token may be reused at `now`.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		matches!(self.status_at(now), CredentialStatus::Fresh)
	}

	/// Returns a clone of the token if it may be reused at `now`.
	pub fn valid_token_at(&self, now: OffsetDateTime) -> Option<TokenSecret> {
		if self.is_valid_at(now) { self.token.clone() } else { None }
	}

	/// Instant at which the token stops being reused, if one was issued.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.issued_at.map(|issued_at| issued_at + self.lifetime)
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token", &self.token.as_ref().map(|_| "<redacted>"))
			.field("issued_at", &self.issued_at)
			.field("lifetime", &self.lifetime)
			.field("origin", &self.origin)
			.finish()
	}
}
