//! Document model handed to [`SubmissionClient`](crate::submission::SubmissionClient).
//!
//! A [`Document`] is the outer record (type, format, product group); its
//! [`ProductDocument`] is the inner body that travels base64-encoded inside the envelope.

pub mod group;
pub mod kind;

pub use group::*;
pub use kind::*;

// self
use crate::_prelude::*;

/// Inner document body. Absent fields are omitted from the encoded JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
	/// Lower bound of the document date range.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date_from: Option<String>,
	/// Upper bound of the document date range.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date_to: Option<String>,
	/// Document identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub did: Option<String>,
	/// Body encoding.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub document_format: Option<DocumentFormat>,
	/// Processing status filter.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub document_status: Option<DocumentStatus>,
	/// Document type filter.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub document_type: Option<DocumentType>,
	/// Whether the document is inbound for the participant.
	#[serde(default)]
	pub input_format: bool,
	/// Page size.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub limit: Option<u32>,
	/// Document number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub number: Option<String>,
	/// Sort direction.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order: Option<SortOrder>,
	/// Column to sort by.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_column: Option<String>,
	/// Pagination direction.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page_dir: Option<PageDir>,
	/// Taxpayer number of the participant.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub participant_inn: Option<String>,
	/// Product groups the body covers.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub pg: Vec<ProductGroup>,
}

/// Outer document record submitted through the documents API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	/// Body encoding.
	pub document_format: DocumentFormat,
	/// Inner body; taken out and encoded separately on submission.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub product_document: Option<ProductDocument>,
	/// Product group routing the document.
	pub product_group: ProductGroup,
	/// Document type.
	#[serde(rename = "type")]
	pub document_type: DocumentType,
}
impl Document {
	/// Returns a builder for the given group and type.
	pub fn builder(product_group: ProductGroup, document_type: DocumentType) -> DocumentBuilder {
		DocumentBuilder::new(product_group, document_type)
	}
}

/// Builder for [`Document`] values.
#[derive(Debug)]
pub struct DocumentBuilder {
	/// Body encoding (defaults to [`DocumentFormat::Manual`]).
	pub document_format: DocumentFormat,
	/// Optional inner body.
	pub product_document: Option<ProductDocument>,
	/// Product group routing the document.
	pub product_group: ProductGroup,
	/// Document type.
	pub document_type: DocumentType,
}
impl DocumentBuilder {
	/// Creates a new builder seeded with the routing fields.
	pub fn new(product_group: ProductGroup, document_type: DocumentType) -> Self {
		Self {
			document_format: DocumentFormat::default(),
			product_document: None,
			product_group,
			document_type,
		}
	}

	/// Sets the body encoding.
	pub fn document_format(mut self, format: DocumentFormat) -> Self {
		self.document_format = format;

		self
	}

	/// Sets the inner body.
	pub fn product_document(mut self, body: ProductDocument) -> Self {
		self.product_document = Some(body);

		self
	}

	/// Consumes the builder.
	pub fn build(self) -> Document {
		Document {
			document_format: self.document_format,
			product_document: self.product_document,
			product_group: self.product_group,
			document_type: self.document_type,
		}
	}
}
