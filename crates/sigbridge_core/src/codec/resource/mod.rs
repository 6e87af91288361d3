use std::fmt;

use crate::codec::{CodecError, Result};

/// Dimension ceiling of resource arrays.
pub const MAX_ARRAY_DIMENSIONS: usize = 3;

/// Tag of a [`ResourceValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
	/// Empty, type-erased array.
	Null,
	/// 64-bit signed integer.
	Int,
	/// IEEE double.
	Double,
	/// Boolean.
	Bool,
	/// UTF-8 text.
	String,
	/// Opaque bytes.
	ByteString,
	/// Nested property bag.
	Object,
	/// Rectangular array.
	Array,
}

impl ResourceKind {
	/// Lowercase label used in diagnostics.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Int => "int",
			Self::Double => "double",
			Self::Bool => "bool",
			Self::String => "string",
			Self::ByteString => "bytestring",
			Self::Object => "object",
			Self::Array => "array",
		}
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Value from the resource property model.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
	/// Empty array whose element type is unknown.
	Null,
	/// Integer.
	Int(i64),
	/// Double.
	Double(f64),
	/// Boolean.
	Bool(bool),
	/// Text.
	String(String),
	/// Bytes.
	ByteString(Vec<u8>),
	/// Property bag.
	Object(Object),
	/// Rectangular array of up to three dimensions.
	Array(ResourceArray),
}

impl ResourceValue {
	/// Tag of this value.
	pub fn kind(&self) -> ResourceKind {
		match self {
			Self::Null => ResourceKind::Null,
			Self::Int(_) => ResourceKind::Int,
			Self::Double(_) => ResourceKind::Double,
			Self::Bool(_) => ResourceKind::Bool,
			Self::String(_) => ResourceKind::String,
			Self::ByteString(_) => ResourceKind::ByteString,
			Self::Object(_) => ResourceKind::Object,
			Self::Array(_) => ResourceKind::Array,
		}
	}

	/// Borrow as object when this is one.
	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(object) => Some(object),
			_ => None,
		}
	}
}

impl From<i64> for ResourceValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for ResourceValue {
	fn from(value: f64) -> Self {
		Self::Double(value)
	}
}

impl From<bool> for ResourceValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<&str> for ResourceValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for ResourceValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Object> for ResourceValue {
	fn from(value: Object) -> Self {
		Self::Object(value)
	}
}

impl From<ResourceArray> for ResourceValue {
	fn from(value: ResourceArray) -> Self {
		Self::Array(value)
	}
}

/// One named entry of an [`Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
	/// Property name, unique within its object.
	pub name: Box<str>,
	/// Property value.
	pub value: ResourceValue,
}

/// Insertion-ordered property bag with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
	properties: Vec<Property>,
}

impl Object {
	/// Create an empty object.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set `name`, replacing an existing property in place.
	pub fn insert(&mut self, name: impl Into<Box<str>>, value: ResourceValue) {
		let name = name.into();
		match self.properties.iter_mut().find(|item| item.name == name) {
			Some(existing) => existing.value = value,
			None => self.properties.push(Property { name, value }),
		}
	}

	/// Look up a property value by name.
	pub fn get(&self, name: &str) -> Option<&ResourceValue> {
		self.properties.iter().find(|item| item.name.as_ref() == name).map(|item| &item.value)
	}

	/// Properties in insertion order.
	pub fn iter(&self) -> std::slice::Iter<'_, Property> {
		self.properties.iter()
	}

	/// Number of properties.
	pub fn len(&self) -> usize {
		self.properties.len()
	}

	/// Whether the object has no properties.
	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}
}

impl<N: Into<Box<str>>> FromIterator<(N, ResourceValue)> for Object {
	fn from_iter<I: IntoIterator<Item = (N, ResourceValue)>>(iter: I) -> Self {
		let mut object = Self::new();
		for (name, value) in iter {
			object.insert(name, value);
		}
		object
	}
}

impl<'a> IntoIterator for &'a Object {
	type Item = &'a Property;
	type IntoIter = std::slice::Iter<'a, Property>;

	fn into_iter(self) -> Self::IntoIter {
		self.properties.iter()
	}
}

/// Flattened, homogeneously typed array storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
	/// Integers.
	Int(Vec<i64>),
	/// Doubles.
	Double(Vec<f64>),
	/// Booleans.
	Bool(Vec<bool>),
	/// Strings.
	String(Vec<String>),
	/// Byte strings.
	ByteString(Vec<Vec<u8>>),
	/// Objects.
	Object(Vec<Object>),
}

impl ArrayData {
	/// Element tag.
	pub fn kind(&self) -> ResourceKind {
		match self {
			Self::Int(_) => ResourceKind::Int,
			Self::Double(_) => ResourceKind::Double,
			Self::Bool(_) => ResourceKind::Bool,
			Self::String(_) => ResourceKind::String,
			Self::ByteString(_) => ResourceKind::ByteString,
			Self::Object(_) => ResourceKind::Object,
		}
	}

	/// Flattened element count.
	pub fn len(&self) -> usize {
		match self {
			Self::Int(items) => items.len(),
			Self::Double(items) => items.len(),
			Self::Bool(items) => items.len(),
			Self::String(items) => items.len(),
			Self::ByteString(items) => items.len(),
			Self::Object(items) => items.len(),
		}
	}

	/// Whether no elements are stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Clone the element at flat index `idx` out as a scalar value.
	pub fn value(&self, idx: usize) -> Option<ResourceValue> {
		let value = match self {
			Self::Int(items) => ResourceValue::Int(*items.get(idx)?),
			Self::Double(items) => ResourceValue::Double(*items.get(idx)?),
			Self::Bool(items) => ResourceValue::Bool(*items.get(idx)?),
			Self::String(items) => ResourceValue::String(items.get(idx)?.clone()),
			Self::ByteString(items) => ResourceValue::ByteString(items.get(idx)?.clone()),
			Self::Object(items) => ResourceValue::Object(items.get(idx)?.clone()),
		};
		Some(value)
	}

	fn slice(&self, start: usize, end: usize) -> Self {
		match self {
			Self::Int(items) => Self::Int(items[start..end].to_vec()),
			Self::Double(items) => Self::Double(items[start..end].to_vec()),
			Self::Bool(items) => Self::Bool(items[start..end].to_vec()),
			Self::String(items) => Self::String(items[start..end].to_vec()),
			Self::ByteString(items) => Self::ByteString(items[start..end].to_vec()),
			Self::Object(items) => Self::Object(items[start..end].to_vec()),
		}
	}

	fn empty_like(kind: ResourceKind) -> Option<Self> {
		let data = match kind {
			ResourceKind::Int => Self::Int(Vec::new()),
			ResourceKind::Double => Self::Double(Vec::new()),
			ResourceKind::Bool => Self::Bool(Vec::new()),
			ResourceKind::String => Self::String(Vec::new()),
			ResourceKind::ByteString => Self::ByteString(Vec::new()),
			ResourceKind::Object => Self::Object(Vec::new()),
			ResourceKind::Null | ResourceKind::Array => return None,
		};
		Some(data)
	}

	fn push(&mut self, value: ResourceValue) -> Result<()> {
		match (self, value) {
			(Self::Int(items), ResourceValue::Int(v)) => items.push(v),
			(Self::Double(items), ResourceValue::Double(v)) => items.push(v),
			(Self::Bool(items), ResourceValue::Bool(v)) => items.push(v),
			(Self::String(items), ResourceValue::String(v)) => items.push(v),
			(Self::ByteString(items), ResourceValue::ByteString(v)) => items.push(v),
			(Self::Object(items), ResourceValue::Object(v)) => items.push(v),
			(data, value) => return Err(CodecError::mismatch(data.kind(), value.kind())),
		}
		Ok(())
	}

	fn append(&mut self, other: Self) -> Result<()> {
		match (self, other) {
			(Self::Int(items), Self::Int(mut more)) => items.append(&mut more),
			(Self::Double(items), Self::Double(mut more)) => items.append(&mut more),
			(Self::Bool(items), Self::Bool(mut more)) => items.append(&mut more),
			(Self::String(items), Self::String(mut more)) => items.append(&mut more),
			(Self::ByteString(items), Self::ByteString(mut more)) => items.append(&mut more),
			(Self::Object(items), Self::Object(mut more)) => items.append(&mut more),
			(data, other) => return Err(CodecError::mismatch(data.kind(), other.kind())),
		}
		Ok(())
	}
}

/// Rectangular array of up to [`MAX_ARRAY_DIMENSIONS`] dimensions.
///
/// The stored element count always equals the product of the populated
/// extents, and every extent is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceArray {
	dims: [usize; MAX_ARRAY_DIMENSIONS],
	data: ArrayData,
}

impl ResourceArray {
	/// Wrap flattened storage with explicit extents.
	pub fn new(dims: &[usize], data: ArrayData) -> Result<Self> {
		if dims.is_empty() || dims.contains(&0) {
			return Err(CodecError::mismatch("non-zero dimensions", format!("{dims:?}")));
		}
		if dims.len() > MAX_ARRAY_DIMENSIONS {
			return Err(CodecError::ArrayTooDeep {
				depth: dims.len(),
				max: MAX_ARRAY_DIMENSIONS,
			});
		}

		let total = dims.iter().try_fold(1_usize, |acc, dim| acc.checked_mul(*dim));
		if total != Some(data.len()) {
			return Err(CodecError::mismatch(format!("{} elements for {dims:?}", total.unwrap_or(usize::MAX)), data.len()));
		}

		let mut stored = [0_usize; MAX_ARRAY_DIMENSIONS];
		stored[..dims.len()].copy_from_slice(dims);
		Ok(Self { dims: stored, data })
	}

	/// One-dimensional array over `data`.
	pub fn flat(data: ArrayData) -> Result<Self> {
		let len = data.len();
		Self::new(&[len], data)
	}

	/// Stack rows into an array one dimension deeper than the rows.
	///
	/// Rows are either all scalars of one kind or all arrays with identical
	/// kind and extents.
	pub fn from_rows(rows: Vec<ResourceValue>) -> Result<Self> {
		let Some(first) = rows.first() else {
			return Err(CodecError::mismatch("at least one row", "empty rows"));
		};

		match first {
			ResourceValue::Null => Err(CodecError::mismatch("non-empty row", ResourceKind::Null)),
			ResourceValue::Array(head) => {
				let sub_dims = head.dimensions().to_vec();
				let depth = sub_dims.len() + 1;
				if depth > MAX_ARRAY_DIMENSIONS {
					return Err(CodecError::ArrayTooDeep {
						depth,
						max: MAX_ARRAY_DIMENSIONS,
					});
				}

				let Some(mut data) = ArrayData::empty_like(head.kind()) else {
					return Err(CodecError::mismatch("array element", head.kind()));
				};
				let count = rows.len();
				for row in rows {
					let sub = match row {
						ResourceValue::Array(sub) => sub,
						ResourceValue::Null => {
							return Err(CodecError::RaggedArray {
								depth: 1,
								expected: sub_dims[0],
								got: 0,
							});
						}
						other => return Err(CodecError::mismatch(ResourceKind::Array, other.kind())),
					};
					check_extents(&sub_dims, sub.dimensions())?;
					data.append(sub.data)?;
				}

				let mut dims = Vec::with_capacity(depth);
				dims.push(count);
				dims.extend_from_slice(&sub_dims);
				Self::new(&dims, data)
			}
			scalar => {
				let Some(mut data) = ArrayData::empty_like(scalar.kind()) else {
					return Err(CodecError::mismatch("array element", scalar.kind()));
				};
				for row in rows {
					data.push(row)?;
				}
				Self::flat(data)
			}
		}
	}

	/// Populated extents, outermost first.
	pub fn dimensions(&self) -> &[usize] {
		let depth = self.dims.iter().take_while(|dim| **dim > 0).count();
		&self.dims[..depth]
	}

	/// Number of populated dimensions.
	pub fn depth(&self) -> usize {
		self.dimensions().len()
	}

	/// Outermost extent.
	pub fn len(&self) -> usize {
		self.dims[0]
	}

	/// Arrays always hold at least one element.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Element tag.
	pub fn kind(&self) -> ResourceKind {
		self.data.kind()
	}

	/// Flattened storage.
	pub fn data(&self) -> &ArrayData {
		&self.data
	}

	/// Split off the outermost dimension.
	///
	/// One-dimensional arrays yield scalars; deeper arrays yield sub-arrays.
	pub fn rows(&self) -> Vec<ResourceValue> {
		let dims = self.dimensions();
		if dims.len() == 1 {
			return (0..self.data.len()).filter_map(|idx| self.data.value(idx)).collect();
		}

		let stride: usize = dims[1..].iter().product();
		let mut sub_dims = [0_usize; MAX_ARRAY_DIMENSIONS];
		sub_dims[..dims.len() - 1].copy_from_slice(&dims[1..]);
		(0..dims[0])
			.map(|row| {
				ResourceValue::Array(Self {
					dims: sub_dims,
					data: self.data.slice(row * stride, (row + 1) * stride),
				})
			})
			.collect()
	}
}

fn check_extents(expected: &[usize], got: &[usize]) -> Result<()> {
	for depth in 0..expected.len().max(got.len()) {
		let want = expected.get(depth).copied().unwrap_or(0);
		let have = got.get(depth).copied().unwrap_or(0);
		if want != have {
			return Err(CodecError::RaggedArray {
				depth: depth + 1,
				expected: want,
				got: have,
			});
		}
	}
	Ok(())
}
