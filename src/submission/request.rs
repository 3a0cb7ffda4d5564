//! Sealed submission envelope.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	document::{Document, DocumentFormat, DocumentType, ProductGroup},
	error::TransportError,
	signer::Signer,
};

/// Failure while sealing a [`Document`] into a [`SubmissionRequest`].
#[derive(Debug, ThisError)]
pub enum SealError {
	/// The inner product document could not be serialized.
	#[error(transparent)]
	Encode(#[from] TransportError),
	/// The signer rejected the payload.
	#[error(transparent)]
	Signer(#[from] crate::signer::SignerError),
}

/// Outer JSON body posted to the document creation endpoint.
///
/// The inner product document only ever appears here in its base64 form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
	/// Body encoding.
	pub document_format: DocumentFormat,
	/// Base64 of the inner product document JSON.
	pub product_document: String,
	/// Product group routing the document.
	pub product_group: ProductGroup,
	/// Document type.
	#[serde(rename = "type")]
	pub document_type: DocumentType,
	/// Base64 of the detached signature over the inner JSON.
	pub signature: String,
}
impl SubmissionRequest {
	/// Takes the inner body out of `document`, encodes and signs it, and builds the envelope.
	pub fn seal(mut document: Document, signer: &dyn Signer) -> Result<Self, SealError> {
		let inner = serde_json::to_vec(&document.product_document.take())
			.map_err(TransportError::Serialize)?;
		let signature = signer.sign(&inner)?;

		Ok(Self {
			document_format: document.document_format,
			product_document: STANDARD.encode(&inner),
			product_group: document.product_group,
			document_type: document.document_type,
			signature: STANDARD.encode(signature),
		})
	}

	/// Serializes the envelope into the wire body.
	pub fn to_body(&self) -> Result<Vec<u8>, TransportError> {
		serde_json::to_vec(self).map_err(TransportError::Serialize)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		document::ProductDocument,
		signer::{SignerError, StaticSigner},
	};

	struct FailingSigner;
	impl Signer for FailingSigner {
		fn sign(&self, _payload: &[u8]) -> Result<Vec<u8>, SignerError> {
			Err(SignerError::new("token not inserted"))
		}
	}

	fn document() -> Document {
		Document::builder(ProductGroup::Milk, DocumentType::LkContractCommissioning)
			.product_document(ProductDocument {
				date_from: Some("2023-11-19".into()),
				participant_inn: Some("7700000000".into()),
				..Default::default()
			})
			.build()
	}

	#[test]
	fn inner_payload_appears_only_as_base64() {
		let request =
			SubmissionRequest::seal(document(), &StaticSigner::default()).expect("Seal should work.");
		let body = String::from_utf8(request.to_body().expect("Envelope should serialize."))
			.expect("Envelope should be UTF-8.");
		let inner = STANDARD.decode(&request.product_document).expect("Payload should be base64.");
		let inner: serde_json::Value =
			serde_json::from_slice(&inner).expect("Decoded payload should be JSON.");

		assert_eq!(inner["participantInn"], "7700000000");
		assert!(!body.contains("participantInn"));
		assert!(!body.contains("7700000000"));
		assert_eq!(body.matches(&request.product_document).count(), 1);

		let envelope: serde_json::Value =
			serde_json::from_str(&body).expect("Envelope should be JSON.");

		assert_eq!(
			envelope,
			serde_json::json!({
				"document_format": "MANUAL",
				"product_document": request.product_document,
				"product_group": "milk",
				"type": "LK_CONTRACT_COMMISSIONING",
				"signature": STANDARD.encode("TEST_SIGNATURE"),
			})
		);
	}

	#[test]
	fn missing_inner_payload_encodes_null() {
		let document =
			Document::builder(ProductGroup::Shoes, DocumentType::LkContractCommissioningCsv).build();
		let request =
			SubmissionRequest::seal(document, &StaticSigner::default()).expect("Seal should work.");

		assert_eq!(request.product_document, STANDARD.encode("null"));
	}

	#[test]
	fn signer_failure_is_propagated() {
		let err = SubmissionRequest::seal(document(), &FailingSigner)
			.expect_err("Signer failure must abort sealing.");

		assert!(matches!(err, SealError::Signer(_)));
	}
}
