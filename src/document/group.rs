//! Product group catalog used to route documents (`pg` query parameter).

// self
use crate::_prelude::*;

/// Commodity group a document belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductGroup {
	/// Light industry goods.
	Clothes,
	/// Footwear.
	Shoes,
	/// Tobacco products.
	Tobacco,
	/// Perfumes and cosmetics.
	Perfumery,
	/// Tires and inner tubes.
	Tires,
	/// Cameras and flash units.
	Electronics,
	/// Pharmaceuticals.
	Pharma,
	/// Dairy products.
	Milk,
	/// Bicycles and frames.
	Bicycle,
	/// Wheelchairs.
	Wheelchairs,
}
impl ProductGroup {
	/// Every known group, ordered by catalog code.
	pub const ALL: [Self; 10] = [
		Self::Clothes,
		Self::Shoes,
		Self::Tobacco,
		Self::Perfumery,
		Self::Tires,
		Self::Electronics,
		Self::Pharma,
		Self::Milk,
		Self::Bicycle,
		Self::Wheelchairs,
	];

	/// Looks a group up by its catalog code (1-based).
	pub fn from_code(code: u8) -> Option<Self> {
		Self::ALL.get(usize::from(code).checked_sub(1)?).copied()
	}

	/// Returns the catalog code (1-based).
	pub fn code(self) -> u8 {
		self as u8 + 1
	}

	/// Returns the API identifier for the group.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Clothes => "clothes",
			Self::Shoes => "shoes",
			Self::Tobacco => "tobacco",
			Self::Perfumery => "perfumery",
			Self::Tires => "tires",
			Self::Electronics => "electronics",
			Self::Pharma => "pharma",
			Self::Milk => "milk",
			Self::Bicycle => "bicycle",
			Self::Wheelchairs => "wheelchairs",
		}
	}
}
impl Display for ProductGroup {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
