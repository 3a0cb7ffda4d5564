//! Wire enumerations shared by documents and product-document filters.

// self
use crate::_prelude::*;

macro_rules! def_document_types {
	($($variant:ident => $wire:literal,)+) => {
		/// Document type accepted by the documents API.
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub enum DocumentType {
			$(
				#[doc = concat!("`", $wire, "`.")]
				#[serde(rename = $wire)]
				$variant,
			)+
		}
		impl DocumentType {
			/// Every known document type, in declaration order.
			pub const ALL: &'static [Self] = &[$(Self::$variant),+];

			/// Returns the API identifier for the type.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => $wire,)+
				}
			}
		}
		impl FromStr for DocumentType {
			type Err = UnknownDocumentType;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($wire => Ok(Self::$variant),)+
					other => Err(UnknownDocumentType(other.to_owned())),
				}
			}
		}
	};
}

def_document_types! {
	AggregationDocument => "AGGREGATION_DOCUMENT",
	DisaggregationDocument => "DISAGGREGATION_DOCUMENT",
	ReaggregationDocument => "REAGGREGATION_DOCUMENT",
	LpIntroduceGoods => "LP_INTRODUCE_GOODS",
	LpShipGoods => "LP_SHIP_GOODS",
	LkRemark => "LK_REMARK",
	LkReceipt => "LK_RECEIPT",
	LpGoodsImport => "LP_GOODS_IMPORT",
	LpCancelShipment => "LP_CANCEL_SHIPMENT",
	LkKmCancellation => "LK_KM_CANCELLATION",
	LkContractCommissioning => "LK_CONTRACT_COMMISSIONING",
	LkContractCommissioningCsv => "LK_CONTRACT_COMMISSIONING_CSV",
	LkContractCommissioningXml => "LK_CONTRACT_COMMISSIONING_XML",
	LkIndiCommissioning => "LK_INDI_COMMISSIONING",
	LpReturn => "LP_RETURN",
	Crossborder => "CROSSBORDER",
}

impl DocumentType {
	/// Returns `true` for the contract-commissioning types this client may submit.
	pub const fn is_commissioning(self) -> bool {
		matches!(
			self,
			Self::LkContractCommissioning
				| Self::LkContractCommissioningCsv
				| Self::LkContractCommissioningXml
		)
	}
}
impl Display for DocumentType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unrecognized document type identifier.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown document type `{0}`.")]
pub struct UnknownDocumentType(pub String);

/// Body encoding of a submitted document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentFormat {
	/// JSON body entered by hand or generated programmatically.
	#[default]
	Manual,
	/// XML body.
	Xml,
	/// CSV body.
	Csv,
}

/// Processing status reported for a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
	/// Still being processed.
	InProgress,
	/// Passed validation.
	CheckedOk,
	/// Failed validation.
	CheckedNotOk,
	/// Processing error on the API side.
	ProcessingError,
	/// Cancelled by the participant.
	Cancelled,
	/// Accepted by the counterparty.
	Accepted,
	/// Waiting for the counterparty to accept.
	WaitAcceptance,
	/// Waiting for the counterparty to register.
	WaitParticipantRegistration,
}

/// Sort direction for document listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
	/// Ascending.
	Asc,
	/// Descending.
	Desc,
}

/// Pagination direction for document listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageDir {
	/// Previous page.
	Prev,
	/// Next page.
	Next,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_contract_commissioning_types_are_allowed() {
		let allowed = DocumentType::ALL
			.iter()
			.copied()
			.filter(|kind| kind.is_commissioning())
			.collect::<Vec<_>>();

		assert_eq!(
			allowed,
			[
				DocumentType::LkContractCommissioning,
				DocumentType::LkContractCommissioningCsv,
				DocumentType::LkContractCommissioningXml,
			]
		);
		assert!(!DocumentType::LkIndiCommissioning.is_commissioning());
	}

	#[test]
	fn document_type_wire_names_match_serde() {
		for kind in DocumentType::ALL {
			let json = serde_json::to_string(kind).expect("Document type should serialize.");

			assert_eq!(json, format!("\"{}\"", kind.as_str()));
			assert_eq!(kind.as_str().parse::<DocumentType>(), Ok(*kind));
		}
	}

	#[test]
	fn unknown_document_type_is_reported() {
		let err = "LK_SOMETHING_ELSE".parse::<DocumentType>().expect_err("Unknown type must fail.");

		assert_eq!(err, UnknownDocumentType("LK_SOMETHING_ELSE".into()));
	}

	#[test]
	fn enums_use_screaming_snake_case() {
		assert_eq!(
			serde_json::to_string(&DocumentStatus::WaitParticipantRegistration)
				.expect("Status should serialize."),
			"\"WAIT_PARTICIPANT_REGISTRATION\""
		);
		assert_eq!(
			serde_json::to_string(&DocumentFormat::Manual).expect("Format should serialize."),
			"\"MANUAL\""
		);
	}
}
