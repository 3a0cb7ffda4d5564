//! JSON bodies exchanged with the `/auth/cert` endpoints.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Random challenge returned by `GET /api/v3/auth/cert/key`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthChallenge {
	/// Identifier the signed answer must echo.
	pub uuid: String,
	/// Random string to sign.
	pub data: String,
}

/// Signed answer posted to `/api/v3/auth/cert/`.
#[derive(Debug, Serialize)]
pub(crate) struct SignedChallenge<'a> {
	pub(crate) uuid: &'a str,
	pub(crate) data: String,
}

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct IssuedToken {
	pub(crate) token: TokenSecret,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signed_challenge_uses_wire_field_names() {
		let body = SignedChallenge { uuid: "c5a4", data: "ZGF0YQ==".into() };

		assert_eq!(
			serde_json::to_value(&body).expect("Signed challenge should serialize."),
			serde_json::json!({ "uuid": "c5a4", "data": "ZGF0YQ==" })
		);
	}

	#[test]
	fn issued_token_ignores_extra_fields() {
		let issued: IssuedToken = serde_json::from_str(r#"{"token":"abc","ttl":36000}"#)
			.expect("Token response should deserialize.");

		assert_eq!(issued.token.expose(), "abc");
	}
}
