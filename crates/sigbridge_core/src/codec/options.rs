use crate::codec::{CodecError, Result};

/// Largest integer that survives a round-trip through an IEEE double.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;
/// Smallest integer that survives a round-trip through an IEEE double.
pub const MIN_SAFE_INTEGER: i64 = -MAX_SAFE_INTEGER;

/// Declared numeric bounds of a 64-bit bus member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerBounds {
	/// Declared minimum.
	pub min: i64,
	/// Declared maximum.
	pub max: u64,
}

impl IntegerBounds {
	/// Whether every value in range is a safe integer.
	pub fn is_safe(&self) -> bool {
		self.min >= MIN_SAFE_INTEGER && self.max <= MAX_SAFE_INTEGER as u64
	}
}

/// Runtime limits and behavior switches for value translation.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
	/// Maximum recursive container nesting.
	pub max_depth: u32,
	/// Maximum element count of a single array.
	pub max_array_elems: usize,
	/// Declared bounds for 64-bit members; unsafe bounds render them as text.
	pub int64_bounds: Option<IntegerBounds>,
}

impl Default for TranslateOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_array_elems: 1 << 20,
			int64_bounds: None,
		}
	}
}

impl TranslateOptions {
	/// Preset matching the bus grammar's own nesting limit.
	pub fn strict() -> Self {
		Self {
			max_depth: 32,
			max_array_elems: 1 << 16,
			int64_bounds: None,
		}
	}

	/// Copy of these options with 64-bit bounds attached.
	pub fn with_int64_bounds(&self, bounds: IntegerBounds) -> Self {
		Self {
			int64_bounds: Some(bounds),
			..self.clone()
		}
	}

	pub(crate) fn check_array_len(&self, count: usize) -> Result<()> {
		if count > self.max_array_elems {
			return Err(CodecError::ArrayTooLarge {
				count,
				max: self.max_array_elems,
			});
		}
		Ok(())
	}

	pub(crate) fn int64_as_text(&self) -> bool {
		self.int64_bounds.is_some_and(|bounds| !bounds.is_safe())
	}
}
