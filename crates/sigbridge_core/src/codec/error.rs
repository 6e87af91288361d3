use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Coarse failure class shared by every [`CodecError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Type is structurally present but excluded from representation.
	UnsupportedType,
	/// Value shape does not match the signature being consumed.
	ShapeMismatch,
	/// Numeric value does not fit the target type.
	RangeViolation,
	/// Extended `[Name]` token has no registry entry.
	UnresolvedName,
	/// Signature text is not well formed.
	MalformedSignature,
	/// Registry input document was rejected.
	Registry,
}

/// Errors produced while parsing signatures and translating values.
#[derive(Debug, Error)]
pub enum CodecError {
	/// Signature text failed to parse.
	#[error("malformed signature {signature:?} at {at}: {reason}")]
	MalformedSignature {
		/// Full signature text being parsed.
		signature: String,
		/// Byte offset of the offending code.
		at: usize,
		/// Short description of the violation.
		reason: &'static str,
	},
	/// Type code that parses but cannot cross the bridge.
	#[error("unsupported type {code:?}")]
	UnsupportedType {
		/// Signature text of the unsupported type.
		code: String,
	},
	/// Runtime value tag disagrees with the signature.
	#[error("shape mismatch: expected {expected}, got {got}")]
	ShapeMismatch {
		/// Expected signature or resource kind.
		expected: String,
		/// Actual signature or resource kind.
		got: String,
	},
	/// Numeric conversion would truncate or overflow.
	#[error("value {value} out of range for {target}")]
	RangeViolation {
		/// Rendered source value.
		value: String,
		/// Target signature code.
		target: String,
	},
	/// Text did not parse as the requested scalar.
	#[error("text {text:?} is not a valid {target}")]
	InvalidText {
		/// Offending text.
		text: String,
		/// Target signature code.
		target: String,
	},
	/// Extended name is not registered.
	#[error("unresolved type name [{name}]")]
	UnresolvedName {
		/// Name inside the brackets.
		name: String,
	},
	/// Object lacks a property required by a struct target.
	#[error("missing field {field} for {type_name}")]
	MissingField {
		/// Struct signature or registered name.
		type_name: String,
		/// Positional index or registered field name.
		field: String,
	},
	/// Sibling sub-arrays disagree on their extent.
	#[error("ragged array at depth {depth}: expected extent {expected}, got {got}")]
	RaggedArray {
		/// Zero-based dimension index.
		depth: usize,
		/// Extent of the first sibling.
		expected: usize,
		/// Extent of the offending sibling.
		got: usize,
	},
	/// Array needs more dimensions than the resource model carries.
	#[error("array depth {depth} exceeds maximum {max}")]
	ArrayTooDeep {
		/// Required dimension count.
		depth: usize,
		/// Supported dimension count.
		max: usize,
	},
	/// Array element count exceeded configured limit.
	#[error("array too large: count={count}, max={max}")]
	ArrayTooLarge {
		/// Element count.
		count: usize,
		/// Configured ceiling.
		max: usize,
	},
	/// Translation recursion exceeded configured limit.
	#[error("translation depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Registered shape repeats a field name.
	#[error("duplicate field {field} in [{type_name}]")]
	DuplicateField {
		/// Registered type name.
		type_name: String,
		/// Repeated field name.
		field: String,
	},
	/// Registry document is structurally invalid.
	#[error("registry: {reason}")]
	Registry {
		/// Human-readable reason.
		reason: String,
	},
	/// Registry document is not valid JSON.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
}

impl CodecError {
	/// Failure class for this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::MalformedSignature { .. } => ErrorKind::MalformedSignature,
			Self::UnsupportedType { .. } | Self::ArrayTooDeep { .. } | Self::ArrayTooLarge { .. } | Self::DepthExceeded { .. } => {
				ErrorKind::UnsupportedType
			}
			Self::ShapeMismatch { .. } | Self::MissingField { .. } | Self::RaggedArray { .. } | Self::InvalidText { .. } => ErrorKind::ShapeMismatch,
			Self::RangeViolation { .. } => ErrorKind::RangeViolation,
			Self::UnresolvedName { .. } => ErrorKind::UnresolvedName,
			Self::DuplicateField { .. } | Self::Registry { .. } | Self::Json(_) => ErrorKind::Registry,
		}
	}

	pub(crate) fn mismatch(expected: impl ToString, got: impl ToString) -> Self {
		Self::ShapeMismatch {
			expected: expected.to_string(),
			got: got.to_string(),
		}
	}

	pub(crate) fn range(value: impl ToString, target: impl ToString) -> Self {
		Self::RangeViolation {
			value: value.to_string(),
			target: target.to_string(),
		}
	}
}
