//! Resource property to bus value translation.
//!
//! The resource side has one integer tag standing in for every bus integer
//! width, so each scalar conversion is range checked against its target and
//! text is accepted only when the whole string parses.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, trace};

use crate::codec::infer::infer_signature;
use crate::codec::options::MAX_SAFE_INTEGER;
use crate::codec::scalar::{bool_text, integer_value, parse_scalar};
use crate::codec::{
	BusValue, CodecError, NamedShape, Object, ResourceArray, ResourceValue, Result, Signature, TranslateOptions, TypeRegistry, TypeToken,
};

/// Translate a resource value into a bus value of type `signature`.
///
/// `inner_hint` names the content type when `signature` is a variant; with
/// no hint the content type is inferred from the value's shape.
pub fn to_bus_value(
	registry: &TypeRegistry,
	value: &ResourceValue,
	signature: &TypeToken,
	inner_hint: Option<&TypeToken>,
	opt: &TranslateOptions,
) -> Result<BusValue> {
	Reverse { registry, opt }.value(value, signature, inner_hint, 0)
}

/// Build an argument list from named object properties.
///
/// Each complete type in `signature` consumes the property named by the
/// matching entry of `names`.
pub fn object_to_message(registry: &TypeRegistry, object: &Object, signature: &str, names: &[&str], opt: &TranslateOptions) -> Result<Vec<BusValue>> {
	let signature = Signature::parse(signature)?;
	if signature.len() != names.len() {
		return Err(CodecError::mismatch(format!("{} names for {signature}", signature.len()), names.len()));
	}

	let reverse = Reverse { registry, opt };
	signature
		.tokens()
		.iter()
		.zip(names)
		.map(|(token, name)| {
			let value = object.get(name).ok_or_else(|| CodecError::MissingField {
				type_name: signature.to_string(),
				field: (*name).to_owned(),
			})?;
			reverse.value(value, token, None, 0)
		})
		.collect()
}

struct Reverse<'a> {
	registry: &'a TypeRegistry,
	opt: &'a TranslateOptions,
}

impl Reverse<'_> {
	fn value(&self, value: &ResourceValue, sig: &TypeToken, hint: Option<&TypeToken>, depth: u32) -> Result<BusValue> {
		trace!(signature = %sig, kind = %value.kind(), depth, "resource to bus");
		if depth > self.opt.max_depth {
			return Err(CodecError::DepthExceeded { max_depth: self.opt.max_depth });
		}
		if let ResourceValue::Null = value {
			if *sig != TypeToken::Variant {
				return self.null(sig);
			}
		}

		match sig {
			TypeToken::Boolean => boolean(value),
			TypeToken::Double => double(value),
			TypeToken::String | TypeToken::ObjectPath | TypeToken::Signature => text(value, sig),
			TypeToken::Handle => Err(CodecError::UnsupportedType { code: sig.to_string() }),
			TypeToken::Array(elem) => self.array(value, elem, depth),
			TypeToken::Struct(members) => {
				let object = expect_object(value, sig)?;
				let mut items = Vec::with_capacity(members.len());
				for (idx, member) in members.iter().enumerate() {
					if let TypeToken::DictEntry(..) = member {
						return Err(CodecError::mismatch("struct member", member));
					}
					let field = idx.to_string();
					let prop = object.get(&field).ok_or_else(|| CodecError::MissingField {
						type_name: sig.to_string(),
						field,
					})?;
					items.push(self.value(prop, member, None, depth + 1)?);
				}
				Ok(BusValue::Struct(items))
			}
			TypeToken::DictEntry(key_sig, value_sig) => {
				let object = expect_object(value, sig)?;
				let mut props = object.iter();
				match (props.next(), props.next()) {
					(Some(prop), None) => self.entry(&prop.name, &prop.value, key_sig, value_sig, depth),
					_ => Err(CodecError::mismatch("object with one property", format!("{} properties", object.len()))),
				}
			}
			TypeToken::Variant => {
				let inner = match hint {
					Some(hint) => hint.clone(),
					None => {
						let inferred = infer_signature(value);
						debug!(signature = %inferred, "variant content signature inferred");
						inferred
					}
				};
				Ok(BusValue::variant(self.value(value, &inner, None, depth + 1)?))
			}
			TypeToken::Named(name) => self.named(value, name, depth),
			integer => integer_target(value, integer),
		}
	}

	fn null(&self, sig: &TypeToken) -> Result<BusValue> {
		match sig {
			TypeToken::Array(elem) => {
				let element = self.registry.native_signature(elem)?;
				element.check_translatable()?;
				BusValue::array(element, Vec::new())
			}
			TypeToken::Named(name) => match self.registry.resolve(name) {
				Some(NamedShape::Dict(_)) => BusValue::array(TypeToken::dict_entry(TypeToken::String, TypeToken::Variant), Vec::new()),
				Some(NamedShape::Struct(_)) => Err(CodecError::mismatch(sig, "null")),
				None => Err(CodecError::UnresolvedName { name: name.to_string() }),
			},
			_ => Err(CodecError::mismatch(sig, "null")),
		}
	}

	fn array(&self, value: &ResourceValue, elem: &TypeToken, depth: u32) -> Result<BusValue> {
		match (elem, value) {
			(TypeToken::Byte, ResourceValue::ByteString(bytes)) => {
				self.opt.check_array_len(bytes.len())?;
				Ok(BusValue::Bytes(bytes.clone()))
			}
			(TypeToken::Byte, ResourceValue::String(text)) => {
				let bytes = STANDARD.decode(text).map_err(|_| CodecError::InvalidText {
					text: text.clone(),
					target: "ay".to_owned(),
				})?;
				self.opt.check_array_len(bytes.len())?;
				Ok(BusValue::Bytes(bytes))
			}
			(TypeToken::Variant, ResourceValue::ByteString(bytes)) => {
				self.opt.check_array_len(bytes.len())?;
				let items = bytes.iter().map(|byte| BusValue::variant(BusValue::Byte(*byte))).collect();
				Ok(BusValue::Array {
					element: TypeToken::Variant,
					items,
				})
			}
			(TypeToken::Variant, ResourceValue::Object(object)) => {
				self.opt.check_array_len(object.len())?;
				let mut items = Vec::with_capacity(object.len());
				for idx in 0..object.len() {
					let field = idx.to_string();
					let prop = object.get(&field).ok_or_else(|| CodecError::MissingField {
						type_name: "av".to_owned(),
						field,
					})?;
					items.push(self.value(prop, &TypeToken::Variant, None, depth + 1)?);
				}
				Ok(BusValue::Array {
					element: TypeToken::Variant,
					items,
				})
			}
			(TypeToken::DictEntry(key_sig, value_sig), ResourceValue::Object(object)) => {
				let element = self.registry.native_signature(elem)?;
				element.check_translatable()?;
				self.opt.check_array_len(object.len())?;
				let mut items = Vec::with_capacity(object.len());
				for prop in object {
					items.push(self.entry(&prop.name, &prop.value, key_sig, value_sig, depth + 1)?);
				}
				Ok(BusValue::Array { element, items })
			}
			(_, ResourceValue::Array(array)) => self.rows(array, elem, depth),
			(_, other) => Err(CodecError::mismatch(TypeToken::array_of(elem.clone()), other.kind())),
		}
	}

	fn rows(&self, array: &ResourceArray, elem: &TypeToken, depth: u32) -> Result<BusValue> {
		let rows = array.rows();
		self.opt.check_array_len(rows.len())?;

		let mut items = Vec::with_capacity(rows.len());
		for row in &rows {
			items.push(self.value(row, elem, None, depth + 1)?);
		}
		let element = self.registry.native_signature(elem)?;
		BusValue::array(element, items)
	}

	fn entry(&self, name: &str, value: &ResourceValue, key_sig: &TypeToken, value_sig: &TypeToken, depth: u32) -> Result<BusValue> {
		let key = parse_scalar(name, key_sig)?;
		let value = self.value(value, value_sig, None, depth + 1)?;
		Ok(BusValue::DictEntry(Box::new(key), Box::new(value)))
	}

	fn named(&self, value: &ResourceValue, name: &str, depth: u32) -> Result<BusValue> {
		match self.registry.resolve(name) {
			Some(NamedShape::Struct(shape)) => {
				let object = expect_object(value, name)?;
				let mut items = Vec::with_capacity(shape.fields.len());
				for field in &shape.fields {
					let prop = object.get(&field.name).ok_or_else(|| CodecError::MissingField {
						type_name: name.to_owned(),
						field: field.name.to_string(),
					})?;
					items.push(self.value(prop, &field.signature, None, depth + 1)?);
				}
				Ok(BusValue::Struct(items))
			}
			Some(NamedShape::Dict(shape)) => {
				let object = expect_object(value, name)?;
				let mut items = Vec::with_capacity(object.len());
				for prop in object {
					let hint = shape.get(&prop.name).map(|field| &field.signature);
					let boxed = self.value(&prop.value, &TypeToken::Variant, hint, depth + 1)?;
					items.push(BusValue::DictEntry(Box::new(BusValue::String(prop.name.to_string())), Box::new(boxed)));
				}
				Ok(BusValue::Array {
					element: TypeToken::dict_entry(TypeToken::String, TypeToken::Variant),
					items,
				})
			}
			None => {
				debug!(name, "named type not registered");
				Err(CodecError::UnresolvedName { name: name.to_owned() })
			}
		}
	}
}

fn expect_object<'v>(value: &'v ResourceValue, expected: impl ToString) -> Result<&'v Object> {
	value.as_object().ok_or_else(|| CodecError::mismatch(expected, value.kind()))
}

fn boolean(value: &ResourceValue) -> Result<BusValue> {
	match value {
		ResourceValue::Bool(flag) => Ok(BusValue::Boolean(*flag)),
		ResourceValue::Int(0) => Ok(BusValue::Boolean(false)),
		ResourceValue::Int(1) => Ok(BusValue::Boolean(true)),
		ResourceValue::Int(other) => Err(CodecError::range(other, "b")),
		ResourceValue::String(text) => parse_scalar(text, &TypeToken::Boolean),
		other => Err(CodecError::mismatch("b", other.kind())),
	}
}

fn double(value: &ResourceValue) -> Result<BusValue> {
	match value {
		ResourceValue::Double(number) => Ok(BusValue::Double(*number)),
		ResourceValue::Int(number) => {
			if number.unsigned_abs() > MAX_SAFE_INTEGER as u64 {
				return Err(CodecError::range(number, "d"));
			}
			Ok(BusValue::Double(*number as f64))
		}
		ResourceValue::Bool(flag) => Ok(BusValue::Double(if *flag { 1.0 } else { 0.0 })),
		ResourceValue::String(text) => parse_scalar(text, &TypeToken::Double),
		other => Err(CodecError::mismatch("d", other.kind())),
	}
}

fn text(value: &ResourceValue, sig: &TypeToken) -> Result<BusValue> {
	match value {
		ResourceValue::String(text) => parse_scalar(text, sig),
		ResourceValue::Bool(flag) => parse_scalar(bool_text(*flag), sig),
		ResourceValue::Int(number) => parse_scalar(&number.to_string(), sig),
		other => Err(CodecError::mismatch(sig, other.kind())),
	}
}

fn integer_target(value: &ResourceValue, sig: &TypeToken) -> Result<BusValue> {
	match value {
		ResourceValue::Int(number) => integer_value(sig, i128::from(*number)),
		ResourceValue::Double(number) => {
			if !number.is_finite() || number.fract() != 0.0 {
				return Err(CodecError::range(number, sig));
			}
			integer_value(sig, *number as i128)
		}
		ResourceValue::Bool(flag) => integer_value(sig, i128::from(*flag)),
		ResourceValue::String(text) => parse_scalar(text, sig),
		other => Err(CodecError::mismatch(sig, other.kind())),
	}
}
