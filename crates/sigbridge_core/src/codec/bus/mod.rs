use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, Result, TypeToken};

/// Value from the message-bus type system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BusValue {
	/// `b`
	Boolean(bool),
	/// `y`
	Byte(u8),
	/// `n`
	Int16(i16),
	/// `q`
	Uint16(u16),
	/// `i`
	Int32(i32),
	/// `u`
	Uint32(u32),
	/// `x`
	Int64(i64),
	/// `t`
	Uint64(u64),
	/// `d`
	Double(f64),
	/// `s`
	String(String),
	/// `o`
	ObjectPath(String),
	/// `g`
	Signature(String),
	/// `h`, a transport-local descriptor index.
	Handle(u32),
	/// `ay`, kept apart from generic arrays for compactness.
	Bytes(Vec<u8>),
	/// Homogeneous array; `element` survives even when `items` is empty.
	Array {
		/// Declared element type.
		element: TypeToken,
		/// Elements, each matching `element`.
		items: Vec<BusValue>,
	},
	/// Ordered heterogeneous members.
	Struct(Vec<BusValue>),
	/// Key/value pair, only meaningful inside an array.
	DictEntry(Box<BusValue>, Box<BusValue>),
	/// Boxed value carrying its own signature.
	Variant(Box<BusValue>),
}

impl BusValue {
	/// Build an array, checking every element against `element`.
	///
	/// Byte arrays collapse to [`BusValue::Bytes`].
	pub fn array(element: TypeToken, items: Vec<BusValue>) -> Result<Self> {
		if matches!(element, TypeToken::Named(_)) {
			return Err(CodecError::mismatch("native element type", &element));
		}

		for item in &items {
			let got = item.signature();
			if got != element {
				return Err(CodecError::mismatch(&element, got));
			}
		}

		if element == TypeToken::Byte {
			let bytes = items
				.into_iter()
				.filter_map(|item| match item {
					BusValue::Byte(byte) => Some(byte),
					_ => None,
				})
				.collect();
			return Ok(Self::Bytes(bytes));
		}

		Ok(Self::Array { element, items })
	}

	/// Build an `a{KV}` collection from key/value pairs.
	pub fn dict(key: TypeToken, value: TypeToken, entries: Vec<(BusValue, BusValue)>) -> Result<Self> {
		let items = entries.into_iter().map(|(k, v)| Self::DictEntry(Box::new(k), Box::new(v))).collect();
		Self::array(TypeToken::dict_entry(key, value), items)
	}

	/// Box a value into a variant.
	pub fn variant(inner: BusValue) -> Self {
		Self::Variant(Box::new(inner))
	}

	/// Signature describing this value.
	pub fn signature(&self) -> TypeToken {
		match self {
			Self::Boolean(_) => TypeToken::Boolean,
			Self::Byte(_) => TypeToken::Byte,
			Self::Int16(_) => TypeToken::Int16,
			Self::Uint16(_) => TypeToken::Uint16,
			Self::Int32(_) => TypeToken::Int32,
			Self::Uint32(_) => TypeToken::Uint32,
			Self::Int64(_) => TypeToken::Int64,
			Self::Uint64(_) => TypeToken::Uint64,
			Self::Double(_) => TypeToken::Double,
			Self::String(_) => TypeToken::String,
			Self::ObjectPath(_) => TypeToken::ObjectPath,
			Self::Signature(_) => TypeToken::Signature,
			Self::Handle(_) => TypeToken::Handle,
			Self::Bytes(_) => TypeToken::array_of(TypeToken::Byte),
			Self::Array { element, .. } => TypeToken::array_of(element.clone()),
			Self::Struct(members) => TypeToken::Struct(members.iter().map(Self::signature).collect()),
			Self::DictEntry(key, value) => TypeToken::dict_entry(key.signature(), value.signature()),
			Self::Variant(_) => TypeToken::Variant,
		}
	}

	/// Innermost non-variant value, unwrapping any depth of variants.
	pub fn innermost(&self) -> &BusValue {
		let mut current = self;
		while let Self::Variant(inner) = current {
			current = inner;
		}
		current
	}

	/// Element count for array-like values.
	pub fn array_len(&self) -> Option<usize> {
		match self {
			Self::Bytes(bytes) => Some(bytes.len()),
			Self::Array { items, .. } => Some(items.len()),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests;
