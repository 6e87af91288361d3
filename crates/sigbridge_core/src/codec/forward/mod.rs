//! Bus value to resource property translation.

use tracing::{debug, trace};

use crate::codec::infer::infer_variant_array_signature;
use crate::codec::scalar::property_name;
use crate::codec::{
	BusValue, CodecError, NamedShape, Object, ResourceArray, ResourceValue, Result, Signature, TranslateOptions, TypeRegistry, TypeToken,
};

/// Translate one bus value described by `signature` into a resource value.
///
/// Zero-length arrays other than `ay` and dictionaries become [`ResourceValue::Null`].
pub fn to_resource_value(registry: &TypeRegistry, value: &BusValue, signature: &TypeToken, opt: &TranslateOptions) -> Result<ResourceValue> {
	Forward { registry, opt }.value(value, signature, 0)
}

/// Translate one bus value and store it into `object`.
///
/// A bare dict-entry signature stores the entry value under its coerced key;
/// any other signature stores the value under `name`, which is then required.
pub fn set_resource_property(
	registry: &TypeRegistry,
	object: &mut Object,
	name: Option<&str>,
	value: &BusValue,
	signature: &TypeToken,
	opt: &TranslateOptions,
) -> Result<()> {
	let forward = Forward { registry, opt };
	if let TypeToken::DictEntry(key_sig, value_sig) = signature {
		let (name, value) = forward.entry(value, key_sig, value_sig, 0)?;
		object.insert(name, value);
		return Ok(());
	}

	let Some(name) = name else {
		return Err(CodecError::mismatch("property name", "none"));
	};
	let value = forward.value(value, signature, 0)?;
	object.insert(name, value);
	Ok(())
}

/// Translate a whole argument list into one object keyed by argument name.
///
/// `signature` must describe exactly as many complete types as there are
/// arguments and names.
pub fn message_to_object(registry: &TypeRegistry, signature: &str, names: &[&str], args: &[BusValue], opt: &TranslateOptions) -> Result<Object> {
	let signature = Signature::parse(signature)?;
	if signature.len() != args.len() || names.len() != args.len() {
		return Err(CodecError::mismatch(
			format!("{} arguments for {signature}", signature.len()),
			format!("{} arguments, {} names", args.len(), names.len()),
		));
	}

	let mut object = Object::new();
	for ((token, name), arg) in signature.tokens().iter().zip(names).zip(args) {
		set_resource_property(registry, &mut object, Some(*name), arg, token, opt)?;
	}
	Ok(object)
}

struct Forward<'a> {
	registry: &'a TypeRegistry,
	opt: &'a TranslateOptions,
}

impl Forward<'_> {
	fn value(&self, value: &BusValue, sig: &TypeToken, depth: u32) -> Result<ResourceValue> {
		trace!(signature = %sig, depth, "bus to resource");
		if depth > self.opt.max_depth {
			return Err(CodecError::DepthExceeded { max_depth: self.opt.max_depth });
		}

		match sig {
			TypeToken::Array(elem) => self.array(value, elem, depth),
			TypeToken::Struct(members) => {
				let items = struct_items(value, sig, members.len())?;
				let mut object = Object::new();
				for (idx, (item, member)) in items.iter().zip(members).enumerate() {
					check_struct_member(member)?;
					object.insert(idx.to_string(), self.value(item, member, depth + 1)?);
				}
				Ok(ResourceValue::Object(object))
			}
			TypeToken::DictEntry(key_sig, value_sig) => {
				let (name, value) = self.entry(value, key_sig, value_sig, depth)?;
				let mut object = Object::new();
				object.insert(name, value);
				Ok(ResourceValue::Object(object))
			}
			TypeToken::Variant => {
				let BusValue::Variant(_) = value else {
					return Err(CodecError::mismatch(sig, value.signature()));
				};
				let inner = value.innermost();
				self.value(inner, &inner.signature(), depth + 1)
			}
			TypeToken::Named(name) => self.named(value, name, depth),
			scalar => self.scalar(value, scalar),
		}
	}

	fn scalar(&self, value: &BusValue, sig: &TypeToken) -> Result<ResourceValue> {
		let out = match (sig, value) {
			(TypeToken::Boolean, BusValue::Boolean(v)) => ResourceValue::Bool(*v),
			(TypeToken::Byte, BusValue::Byte(v)) => ResourceValue::Int(i64::from(*v)),
			(TypeToken::Int16, BusValue::Int16(v)) => ResourceValue::Int(i64::from(*v)),
			(TypeToken::Uint16, BusValue::Uint16(v)) => ResourceValue::Int(i64::from(*v)),
			(TypeToken::Int32, BusValue::Int32(v)) => ResourceValue::Int(i64::from(*v)),
			(TypeToken::Uint32, BusValue::Uint32(v)) => ResourceValue::Int(i64::from(*v)),
			(TypeToken::Int64, BusValue::Int64(v)) => self.wide_integer(i128::from(*v), sig)?,
			(TypeToken::Uint64, BusValue::Uint64(v)) => self.wide_integer(i128::from(*v), sig)?,
			(TypeToken::Double, BusValue::Double(v)) => ResourceValue::Double(*v),
			(TypeToken::String, BusValue::String(text))
			| (TypeToken::ObjectPath, BusValue::ObjectPath(text))
			| (TypeToken::Signature, BusValue::Signature(text)) => ResourceValue::String(text.clone()),
			(TypeToken::Handle, _) => return Err(CodecError::UnsupportedType { code: sig.to_string() }),
			_ => return Err(CodecError::mismatch(sig, value.signature())),
		};
		Ok(out)
	}

	fn wide_integer(&self, value: i128, sig: &TypeToken) -> Result<ResourceValue> {
		if self.opt.int64_as_text() {
			return Ok(ResourceValue::String(value.to_string()));
		}
		i64::try_from(value).map(ResourceValue::Int).map_err(|_| CodecError::range(value, sig))
	}

	fn array(&self, value: &BusValue, elem: &TypeToken, depth: u32) -> Result<ResourceValue> {
		if let TypeToken::Byte = elem {
			return self.byte_string(value);
		}

		let items = self.array_items(value, elem)?;
		self.opt.check_array_len(items.len())?;

		match elem {
			TypeToken::DictEntry(key_sig, value_sig) => {
				let mut object = Object::new();
				for item in items {
					let (name, value) = self.entry(item, key_sig, value_sig, depth + 1)?;
					object.insert(name, value);
				}
				Ok(ResourceValue::Object(object))
			}
			TypeToken::Variant => self.variant_array(items, depth),
			_ => {
				if items.is_empty() {
					return Ok(ResourceValue::Null);
				}
				let rows = items.iter().map(|item| self.value(item, elem, depth + 1)).collect::<Result<Vec<_>>>()?;
				Ok(ResourceValue::Array(ResourceArray::from_rows(rows)?))
			}
		}
	}

	fn variant_array(&self, items: &[BusValue], depth: u32) -> Result<ResourceValue> {
		if let Some(item) = items.iter().find(|item| !matches!(item, BusValue::Variant(_))) {
			return Err(CodecError::mismatch(TypeToken::Variant, item.signature()));
		}
		let Some(shape) = infer_variant_array_signature(items) else {
			return Ok(ResourceValue::Null);
		};

		match shape {
			TypeToken::Struct(members) => {
				let mut object = Object::new();
				for (idx, (item, member)) in items.iter().zip(&members).enumerate() {
					object.insert(idx.to_string(), self.value(item.innermost(), member, depth + 1)?);
				}
				Ok(ResourceValue::Object(object))
			}
			TypeToken::Array(inner) if *inner == TypeToken::Byte => {
				let bytes = items
					.iter()
					.map(|item| match item.innermost() {
						BusValue::Byte(byte) => Ok(*byte),
						other => Err(CodecError::mismatch(TypeToken::Byte, other.signature())),
					})
					.collect::<Result<Vec<u8>>>()?;
				Ok(ResourceValue::ByteString(bytes))
			}
			TypeToken::Array(inner) => {
				let rows = items
					.iter()
					.map(|item| self.value(item.innermost(), &inner, depth + 1))
					.collect::<Result<Vec<_>>>()?;
				Ok(ResourceValue::Array(ResourceArray::from_rows(rows)?))
			}
			other => Err(CodecError::mismatch("array or struct shape", other)),
		}
	}

	fn entry(&self, value: &BusValue, key_sig: &TypeToken, value_sig: &TypeToken, depth: u32) -> Result<(String, ResourceValue)> {
		let BusValue::DictEntry(key, item) = value else {
			return Err(CodecError::mismatch(TypeToken::dict_entry(key_sig.clone(), value_sig.clone()), value.signature()));
		};
		if key.signature() != *key_sig {
			return Err(CodecError::mismatch(key_sig, key.signature()));
		}
		let name = property_name(key)?;
		let value = self.value(item, value_sig, depth + 1)?;
		Ok((name, value))
	}

	fn named(&self, value: &BusValue, name: &str, depth: u32) -> Result<ResourceValue> {
		match self.registry.resolve(name) {
			Some(NamedShape::Struct(shape)) => {
				let items = struct_items(value, &shape.struct_token(), shape.fields.len())?;
				let mut object = Object::new();
				for (item, field) in items.iter().zip(&shape.fields) {
					check_struct_member(&field.signature)?;
					object.insert(field.name.clone(), self.value(item, &field.signature, depth + 1)?);
				}
				Ok(ResourceValue::Object(object))
			}
			Some(NamedShape::Dict(shape)) => {
				let items = self.array_items(value, &TypeToken::dict_entry(TypeToken::String, TypeToken::Variant))?;
				let mut object = Object::new();
				for item in items {
					let BusValue::DictEntry(key, entry) = item else {
						return Err(CodecError::mismatch("{sv}", item.signature()));
					};
					let key = property_name(key)?;
					let inner = entry.innermost();
					let value = match shape.get(&key) {
						Some(field) => self.value(inner, &field.signature, depth + 1)?,
						None => self.value(inner, &inner.signature(), depth + 1)?,
					};
					object.insert(key, value);
				}
				Ok(ResourceValue::Object(object))
			}
			None => {
				debug!(name, "named type not registered");
				Err(CodecError::UnresolvedName { name: name.to_owned() })
			}
		}
	}

	fn byte_string(&self, value: &BusValue) -> Result<ResourceValue> {
		let bytes = match value {
			BusValue::Bytes(bytes) => bytes.clone(),
			BusValue::Array {
				element: TypeToken::Byte,
				items,
			} => items
				.iter()
				.map(|item| match item {
					BusValue::Byte(byte) => Ok(*byte),
					other => Err(CodecError::mismatch(TypeToken::Byte, other.signature())),
				})
				.collect::<Result<Vec<u8>>>()?,
			other => return Err(CodecError::mismatch("ay", other.signature())),
		};
		self.opt.check_array_len(bytes.len())?;
		Ok(ResourceValue::ByteString(bytes))
	}

	/// Items of an array value whose declared element matches `elem`.
	fn array_items<'v>(&self, value: &'v BusValue, elem: &TypeToken) -> Result<&'v [BusValue]> {
		let expected = self.registry.native_signature(elem)?;
		expected.check_translatable()?;
		match value {
			BusValue::Array { element, items } if *element == expected => Ok(items.as_slice()),
			other => Err(CodecError::mismatch(TypeToken::array_of(expected), other.signature())),
		}
	}
}

fn struct_items<'v>(value: &'v BusValue, sig: &TypeToken, arity: usize) -> Result<&'v [BusValue]> {
	match value {
		BusValue::Struct(items) if items.len() == arity => Ok(items.as_slice()),
		other => Err(CodecError::mismatch(sig, other.signature())),
	}
}

fn check_struct_member(member: &TypeToken) -> Result<()> {
	if let TypeToken::DictEntry(..) = member {
		return Err(CodecError::mismatch("struct member", member));
	}
	Ok(())
}
