use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::codec::{CodecError, Result};

/// Longest accepted signature text in bytes.
pub const MAX_SIGNATURE_LEN: usize = 255;
/// Maximum nesting of `a` prefixes.
pub const MAX_ARRAY_DEPTH: u32 = 32;
/// Maximum nesting of structs and dict-entries combined.
pub const MAX_STRUCT_DEPTH: u32 = 32;

/// One complete type from a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeToken {
	/// `b`
	Boolean,
	/// `y`
	Byte,
	/// `n`
	Int16,
	/// `q`
	Uint16,
	/// `i`
	Int32,
	/// `u`
	Uint32,
	/// `x`
	Int64,
	/// `t`
	Uint64,
	/// `d`
	Double,
	/// `s`
	String,
	/// `o`
	ObjectPath,
	/// `g`
	Signature,
	/// `h`, parsed but never translated.
	Handle,
	/// `a` followed by one element type.
	Array(Box<TypeToken>),
	/// `(` members `)`.
	Struct(Vec<TypeToken>),
	/// `{` key value `}`, only meaningful as an array element.
	DictEntry(Box<TypeToken>, Box<TypeToken>),
	/// `v`, a self-describing boxed value.
	Variant,
	/// `[Name]`, an aggregate resolved through the type registry.
	Named(Box<str>),
}

impl TypeToken {
	/// Parse text holding exactly one complete type.
	pub fn parse_one(text: &str) -> Result<Self> {
		let (token, used) = parse_complete_type(text)?;
		if used != text.len() {
			return Err(CodecError::MalformedSignature {
				signature: text.to_owned(),
				at: used,
				reason: "expected exactly one complete type",
			});
		}
		Ok(token)
	}

	/// Shorthand for `a<elem>`.
	pub fn array_of(elem: TypeToken) -> Self {
		Self::Array(Box::new(elem))
	}

	/// Shorthand for `{<key><value>}`.
	pub fn dict_entry(key: TypeToken, value: TypeToken) -> Self {
		Self::DictEntry(Box::new(key), Box::new(value))
	}

	/// Generic keyed collection `a{sv}`.
	pub fn generic_dict() -> Self {
		Self::array_of(Self::dict_entry(Self::String, Self::Variant))
	}

	/// Reject types neither translator can carry.
	///
	/// Handles fail anywhere in the tree, as do dict-entries sitting directly
	/// in a struct. Named tokens are not followed.
	pub fn check_translatable(&self) -> Result<()> {
		match self {
			Self::Handle => Err(CodecError::UnsupportedType { code: self.to_string() }),
			Self::Array(elem) => elem.check_translatable(),
			Self::Struct(members) => {
				for member in members {
					if let Self::DictEntry(..) = member {
						return Err(CodecError::ShapeMismatch {
							expected: "struct member".to_owned(),
							got: member.to_string(),
						});
					}
					member.check_translatable()?;
				}
				Ok(())
			}
			Self::DictEntry(key, value) => {
				key.check_translatable()?;
				value.check_translatable()
			}
			_ => Ok(()),
		}
	}

	/// Leading signature character.
	pub fn code(&self) -> char {
		match self {
			Self::Boolean => 'b',
			Self::Byte => 'y',
			Self::Int16 => 'n',
			Self::Uint16 => 'q',
			Self::Int32 => 'i',
			Self::Uint32 => 'u',
			Self::Int64 => 'x',
			Self::Uint64 => 't',
			Self::Double => 'd',
			Self::String => 's',
			Self::ObjectPath => 'o',
			Self::Signature => 'g',
			Self::Handle => 'h',
			Self::Array(_) => 'a',
			Self::Struct(_) => '(',
			Self::DictEntry(..) => '{',
			Self::Variant => 'v',
			Self::Named(_) => '[',
		}
	}

	/// Whether this is a non-container scalar legal as a dict-entry key.
	pub fn is_basic(&self) -> bool {
		!matches!(self, Self::Array(_) | Self::Struct(_) | Self::DictEntry(..) | Self::Variant | Self::Named(_))
	}

	/// Whether this is any integer code.
	pub fn is_integer(&self) -> bool {
		matches!(
			self,
			Self::Byte | Self::Int16 | Self::Uint16 | Self::Int32 | Self::Uint32 | Self::Int64 | Self::Uint64
		)
	}

	/// Inclusive numeric range of an integer code.
	pub fn integer_range(&self) -> Option<(i128, i128)> {
		let range = match self {
			Self::Byte => (0, i128::from(u8::MAX)),
			Self::Int16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
			Self::Uint16 => (0, i128::from(u16::MAX)),
			Self::Int32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
			Self::Uint32 => (0, i128::from(u32::MAX)),
			Self::Int64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
			Self::Uint64 => (0, i128::from(u64::MAX)),
			_ => return None,
		};
		Some(range)
	}

	fn write_to(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Array(elem) => {
				out.write_str("a")?;
				elem.write_to(out)
			}
			Self::Struct(members) => {
				out.write_str("(")?;
				for member in members {
					member.write_to(out)?;
				}
				out.write_str(")")
			}
			Self::DictEntry(key, value) => {
				out.write_str("{")?;
				key.write_to(out)?;
				value.write_to(out)?;
				out.write_str("}")
			}
			Self::Named(name) => write!(out, "[{name}]"),
			scalar => write!(out, "{}", scalar.code()),
		}
	}
}

impl fmt::Display for TypeToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.write_to(f)
	}
}

impl FromStr for TypeToken {
	type Err = CodecError;

	fn from_str(text: &str) -> Result<Self> {
		Self::parse_one(text)
	}
}

impl Serialize for TypeToken {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for TypeToken {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct TokenVisitor;

		impl Visitor<'_> for TokenVisitor {
			type Value = TypeToken;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a single complete type signature")
			}

			fn visit_str<E: de::Error>(self, text: &str) -> std::result::Result<TypeToken, E> {
				TypeToken::parse_one(text).map_err(E::custom)
			}
		}

		deserializer.deserialize_str(TokenVisitor)
	}
}

/// Ordered sequence of complete types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
	tokens: Vec<TypeToken>,
}

impl Signature {
	/// Parse every complete type in `text`.
	pub fn parse(text: &str) -> Result<Self> {
		let mut tokens = Vec::new();
		let mut at = 0_usize;
		check_length(text)?;
		while at < text.len() {
			let mut parser = Parser::new(text, at);
			tokens.push(parser.complete_type()?);
			at = parser.pos;
		}
		Ok(Self { tokens })
	}

	/// Tokens in declaration order.
	pub fn tokens(&self) -> &[TypeToken] {
		&self.tokens
	}

	/// Number of complete types.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Whether the signature describes no values.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

impl From<Vec<TypeToken>> for Signature {
	fn from(tokens: Vec<TypeToken>) -> Self {
		Self { tokens }
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for token in &self.tokens {
			token.write_to(f)?;
		}
		Ok(())
	}
}

impl FromStr for Signature {
	type Err = CodecError;

	fn from_str(text: &str) -> Result<Self> {
		Self::parse(text)
	}
}

/// Parse one complete type from the front of `signature`.
///
/// Returns the token and the number of bytes it occupied. Extended `[Name]`
/// tokens are consumed opaquely; resolving them is left to registry holders.
pub fn parse_complete_type(signature: &str) -> Result<(TypeToken, usize)> {
	check_length(signature)?;
	let mut parser = Parser::new(signature, 0);
	let token = parser.complete_type()?;
	Ok((token, parser.pos))
}

/// Count complete types up to exhaustion or the first malformed one.
pub fn count_complete_types(signature: &str) -> usize {
	if check_length(signature).is_err() {
		return 0;
	}

	let mut count = 0_usize;
	let mut at = 0_usize;
	while at < signature.len() {
		let mut parser = Parser::new(signature, at);
		if parser.complete_type().is_err() {
			break;
		}
		at = parser.pos;
		count += 1;
	}
	count
}

fn check_length(signature: &str) -> Result<()> {
	if signature.len() > MAX_SIGNATURE_LEN {
		return Err(CodecError::MalformedSignature {
			signature: signature.to_owned(),
			at: MAX_SIGNATURE_LEN,
			reason: "signature too long",
		});
	}
	Ok(())
}

struct Parser<'a> {
	text: &'a str,
	pos: usize,
	array_depth: u32,
	struct_depth: u32,
}

impl<'a> Parser<'a> {
	fn new(text: &'a str, pos: usize) -> Self {
		Self {
			text,
			pos,
			array_depth: 0,
			struct_depth: 0,
		}
	}

	fn peek(&self) -> Option<u8> {
		self.text.as_bytes().get(self.pos).copied()
	}

	fn bump(&mut self) -> Option<u8> {
		let byte = self.peek()?;
		self.pos += 1;
		Some(byte)
	}

	fn error(&self, at: usize, reason: &'static str) -> CodecError {
		CodecError::MalformedSignature {
			signature: self.text.to_owned(),
			at,
			reason,
		}
	}

	fn complete_type(&mut self) -> Result<TypeToken> {
		let at = self.pos;
		let Some(code) = self.bump() else {
			return Err(self.error(at, "unexpected end of signature"));
		};

		let token = match code {
			b'b' => TypeToken::Boolean,
			b'y' => TypeToken::Byte,
			b'n' => TypeToken::Int16,
			b'q' => TypeToken::Uint16,
			b'i' => TypeToken::Int32,
			b'u' => TypeToken::Uint32,
			b'x' => TypeToken::Int64,
			b't' => TypeToken::Uint64,
			b'd' => TypeToken::Double,
			b's' => TypeToken::String,
			b'o' => TypeToken::ObjectPath,
			b'g' => TypeToken::Signature,
			b'h' => TypeToken::Handle,
			b'v' => TypeToken::Variant,
			b'a' => self.array()?,
			b'(' => self.structure(at)?,
			b'{' => self.dict_entry()?,
			b'[' => self.named(at)?,
			b')' | b'}' | b']' => return Err(self.error(at, "unexpected close token")),
			_ => return Err(self.error(at, "unknown type code")),
		};
		Ok(token)
	}

	fn array(&mut self) -> Result<TypeToken> {
		self.array_depth += 1;
		if self.array_depth > MAX_ARRAY_DEPTH {
			return Err(self.error(self.pos - 1, "array nesting too deep"));
		}
		let elem = self.complete_type()?;
		self.array_depth -= 1;
		Ok(TypeToken::array_of(elem))
	}

	fn structure(&mut self, open: usize) -> Result<TypeToken> {
		self.enter_struct(open)?;
		let mut members = Vec::new();
		loop {
			match self.peek() {
				None => return Err(self.error(open, "unterminated struct")),
				Some(b')') => {
					self.pos += 1;
					break;
				}
				Some(_) => members.push(self.complete_type()?),
			}
		}
		if members.is_empty() {
			return Err(self.error(open, "empty struct"));
		}
		self.struct_depth -= 1;
		Ok(TypeToken::Struct(members))
	}

	fn dict_entry(&mut self) -> Result<TypeToken> {
		let open = self.pos - 1;
		self.enter_struct(open)?;

		let key_at = self.pos;
		if matches!(self.peek(), None | Some(b'}')) {
			return Err(self.error(key_at, "dict-entry requires a key type"));
		}
		let key = self.complete_type()?;
		if !key.is_basic() {
			return Err(self.error(key_at, "dict-entry key must be a basic type"));
		}

		if matches!(self.peek(), None | Some(b'}')) {
			return Err(self.error(self.pos, "dict-entry requires a value type"));
		}
		let value = self.complete_type()?;

		match self.bump() {
			Some(b'}') => {}
			Some(_) => return Err(self.error(self.pos - 1, "dict-entry holds more than key and value")),
			None => return Err(self.error(open, "unterminated dict-entry")),
		}
		self.struct_depth -= 1;
		Ok(TypeToken::dict_entry(key, value))
	}

	fn named(&mut self, open: usize) -> Result<TypeToken> {
		let start = self.pos;
		let Some(len) = self.text[start..].find(']') else {
			return Err(self.error(open, "unterminated name"));
		};
		let name = &self.text[start..start + len];
		if name.is_empty() {
			return Err(self.error(open, "empty name"));
		}
		if name.contains('[') {
			return Err(self.error(open, "nested name bracket"));
		}
		self.pos = start + len + 1;
		Ok(TypeToken::Named(name.into()))
	}

	fn enter_struct(&mut self, open: usize) -> Result<()> {
		self.struct_depth += 1;
		if self.struct_depth > MAX_STRUCT_DEPTH {
			return Err(self.error(open, "struct nesting too deep"));
		}
		Ok(())
	}
}
