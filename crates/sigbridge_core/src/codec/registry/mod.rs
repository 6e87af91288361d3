//! Catalog of extended `[Name]` aggregates.
//!
//! Registration needs `&mut TypeRegistry` while translation only borrows it
//! shared, so a registry is filled during introspection ingestion and then
//! frozen behind an `Arc` for concurrent readers.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::codec::infer::resource_kind;
use crate::codec::signature::MAX_STRUCT_DEPTH;
use crate::codec::{CodecError, ResourceKind, Result, TypeToken};

/// One member of a registered struct.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
	/// Member name on the resource side.
	pub name: Box<str>,
	/// Member signature on the bus side.
	pub signature: TypeToken,
}

/// Ordered member list of a registered struct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructShape {
	/// Members in bus order.
	pub fields: Vec<StructField>,
}

impl StructShape {
	/// Bus-side struct token with members still possibly named.
	pub fn struct_token(&self) -> TypeToken {
		TypeToken::Struct(self.fields.iter().map(|field| field.signature.clone()).collect())
	}
}

/// Per-key metadata of a registered dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DictField {
	/// Key name.
	pub key: Box<str>,
	/// Signature of the value boxed under this key.
	pub signature: TypeToken,
	/// Resource tag the value takes after translation.
	pub kind: ResourceKind,
}

/// Keyed field metadata of a registered dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictShape {
	/// Known keys.
	pub fields: Vec<DictField>,
}

impl DictShape {
	/// Metadata for `key`, if declared.
	pub fn get(&self, key: &str) -> Option<&DictField> {
		self.fields.iter().find(|field| field.key.as_ref() == key)
	}
}

/// A registry entry of either flavor.
#[derive(Debug, Clone, Copy)]
pub enum NamedShape<'a> {
	/// Registered struct.
	Struct(&'a StructShape),
	/// Registered dictionary.
	Dict(&'a DictShape),
}

/// Owned store of named aggregates.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
	structs: HashMap<Box<str>, StructShape>,
	dicts: HashMap<Box<str>, DictShape>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryDocument {
	#[serde(default)]
	structs: BTreeMap<String, Vec<(String, TypeToken)>>,
	#[serde(default)]
	dicts: BTreeMap<String, BTreeMap<String, TypeToken>>,
}

impl TypeRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Load registrations from an introspection JSON document.
	///
	/// Shape: `{"structs": {"Name": [["field", "sig"], ...]}, "dicts": {"Name": {"key": "sig"}}}`.
	pub fn from_json(text: &str) -> Result<Self> {
		let doc: RegistryDocument = serde_json::from_str(text)?;
		let mut registry = Self::new();
		for (name, fields) in doc.structs {
			registry.register_struct(&name, fields)?;
		}
		for (name, fields) in doc.dicts {
			registry.register_dict(&name, fields)?;
		}
		Ok(registry)
	}

	/// Register or overwrite a named struct with ordered fields.
	pub fn register_struct<N: Into<Box<str>>>(&mut self, name: &str, fields: impl IntoIterator<Item = (N, TypeToken)>) -> Result<()> {
		check_name(name)?;
		let mut shape = StructShape::default();
		for (field_name, signature) in fields {
			let field_name = field_name.into();
			if shape.fields.iter().any(|field| field.name == field_name) {
				return Err(CodecError::DuplicateField {
					type_name: name.to_owned(),
					field: field_name.into_string(),
				});
			}
			shape.fields.push(StructField {
				name: field_name,
				signature,
			});
		}
		if shape.fields.is_empty() {
			return Err(CodecError::Registry {
				reason: format!("struct [{name}] has no fields"),
			});
		}

		self.dicts.remove(name);
		self.structs.insert(name.into(), shape);
		Ok(())
	}

	/// Register or overwrite a named dictionary with per-key signatures.
	pub fn register_dict<N: Into<Box<str>>>(&mut self, name: &str, fields: impl IntoIterator<Item = (N, TypeToken)>) -> Result<()> {
		check_name(name)?;
		let mut shape = DictShape::default();
		for (key, signature) in fields {
			let key = key.into();
			if shape.get(&key).is_some() {
				return Err(CodecError::DuplicateField {
					type_name: name.to_owned(),
					field: key.into_string(),
				});
			}
			let kind = resource_kind(&signature);
			shape.fields.push(DictField { key, signature, kind });
		}

		self.structs.remove(name);
		self.dicts.insert(name.into(), shape);
		Ok(())
	}

	/// Look up a registered struct.
	pub fn lookup_struct(&self, name: &str) -> Option<&StructShape> {
		self.structs.get(name)
	}

	/// Look up a registered dictionary.
	pub fn lookup_dict(&self, name: &str) -> Option<&DictShape> {
		self.dicts.get(name)
	}

	/// Look up a name of either flavor.
	pub fn resolve(&self, name: &str) -> Option<NamedShape<'_>> {
		if let Some(shape) = self.lookup_struct(name) {
			return Some(NamedShape::Struct(shape));
		}
		self.lookup_dict(name).map(NamedShape::Dict)
	}

	/// Number of registered names.
	pub fn len(&self) -> usize {
		self.structs.len() + self.dicts.len()
	}

	/// Whether nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Rewrite every `[Name]` in `token` to its bus-native form.
	pub fn native_signature(&self, token: &TypeToken) -> Result<TypeToken> {
		self.native_impl(token, 0)
	}

	fn native_impl(&self, token: &TypeToken, depth: u32) -> Result<TypeToken> {
		if depth > MAX_STRUCT_DEPTH {
			return Err(CodecError::DepthExceeded { max_depth: MAX_STRUCT_DEPTH });
		}

		let native = match token {
			TypeToken::Array(elem) => TypeToken::array_of(self.native_impl(elem, depth + 1)?),
			TypeToken::Struct(members) => TypeToken::Struct(
				members
					.iter()
					.map(|member| self.native_impl(member, depth + 1))
					.collect::<Result<Vec<_>>>()?,
			),
			TypeToken::DictEntry(key, value) => TypeToken::dict_entry(self.native_impl(key, depth + 1)?, self.native_impl(value, depth + 1)?),
			TypeToken::Named(name) => match self.resolve(name) {
				Some(NamedShape::Struct(shape)) => self.native_impl(&shape.struct_token(), depth + 1)?,
				Some(NamedShape::Dict(_)) => TypeToken::generic_dict(),
				None => return Err(CodecError::UnresolvedName { name: name.to_string() }),
			},
			scalar => scalar.clone(),
		};
		Ok(native)
	}
}

fn check_name(name: &str) -> Result<()> {
	if name.is_empty() || name.contains(['[', ']']) {
		return Err(CodecError::Registry {
			reason: format!("invalid type name {name:?}"),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests;
