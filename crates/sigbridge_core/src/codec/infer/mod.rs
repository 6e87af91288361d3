use tracing::debug;

use crate::codec::{BusValue, ResourceKind, ResourceValue, TypeToken};

/// Derive a bus signature from a resource value's runtime shape.
///
/// Objects infer to the generic `a{sv}` collection since field order is not
/// recoverable without a registry entry. `Null` infers to `av`.
pub fn infer_signature(value: &ResourceValue) -> TypeToken {
	match value {
		ResourceValue::Null => TypeToken::array_of(TypeToken::Variant),
		ResourceValue::Array(array) => {
			let mut token = kind_signature(array.kind());
			for _ in 0..array.depth() {
				token = TypeToken::array_of(token);
			}
			token
		}
		scalar => kind_signature(scalar.kind()),
	}
}

/// Narrowest signature describing an array whose elements are variants.
///
/// Elements sharing one innermost signature `T` yield `aT`; elements that
/// disagree yield a struct of the per-position signatures. Returns `None`
/// for an empty array.
pub fn infer_variant_array_signature(items: &[BusValue]) -> Option<TypeToken> {
	let signatures: Vec<TypeToken> = items.iter().map(|item| item.innermost().signature()).collect();
	let first = signatures.first()?;

	if signatures.iter().all(|sig| sig == first) {
		return Some(TypeToken::array_of(first.clone()));
	}

	let tuple = TypeToken::Struct(signatures);
	debug!(signature = %tuple, "heterogeneous variant array treated as struct");
	Some(tuple)
}

/// Resource tag a value of bus type `token` takes after translation.
///
/// Variants and handles have no fixed tag and report `Null`.
pub fn resource_kind(token: &TypeToken) -> ResourceKind {
	match token {
		TypeToken::Boolean => ResourceKind::Bool,
		TypeToken::Double => ResourceKind::Double,
		TypeToken::String | TypeToken::ObjectPath | TypeToken::Signature => ResourceKind::String,
		TypeToken::Array(elem) => match elem.as_ref() {
			TypeToken::Byte => ResourceKind::ByteString,
			TypeToken::DictEntry(..) => ResourceKind::Object,
			_ => ResourceKind::Array,
		},
		TypeToken::Struct(_) | TypeToken::DictEntry(..) | TypeToken::Named(_) => ResourceKind::Object,
		TypeToken::Variant | TypeToken::Handle => ResourceKind::Null,
		_ => ResourceKind::Int,
	}
}

fn kind_signature(kind: ResourceKind) -> TypeToken {
	match kind {
		ResourceKind::Int => TypeToken::Int64,
		ResourceKind::Double => TypeToken::Double,
		ResourceKind::Bool => TypeToken::Boolean,
		ResourceKind::String => TypeToken::String,
		ResourceKind::ByteString => TypeToken::array_of(TypeToken::Byte),
		ResourceKind::Object => TypeToken::generic_dict(),
		ResourceKind::Null | ResourceKind::Array => TypeToken::array_of(TypeToken::Variant),
	}
}
