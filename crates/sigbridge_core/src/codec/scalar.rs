use crate::codec::{BusValue, CodecError, Result, Signature, TypeToken};

/// Render a dict-entry key as a resource property name.
pub fn property_name(key: &BusValue) -> Result<String> {
	let name = match key {
		BusValue::String(text) | BusValue::ObjectPath(text) | BusValue::Signature(text) => text.clone(),
		BusValue::Boolean(value) => bool_text(*value).to_owned(),
		BusValue::Byte(value) => value.to_string(),
		BusValue::Int16(value) => value.to_string(),
		BusValue::Uint16(value) => value.to_string(),
		BusValue::Int32(value) => value.to_string(),
		BusValue::Uint32(value) => value.to_string(),
		BusValue::Int64(value) => value.to_string(),
		BusValue::Uint64(value) => value.to_string(),
		BusValue::Double(value) if value.is_finite() => value.to_string(),
		BusValue::Double(value) => return Err(CodecError::range(value, "property name")),
		other => return Err(CodecError::mismatch("basic key type", other.signature())),
	};
	Ok(name)
}

/// Canonical boolean literal.
pub fn bool_text(value: bool) -> &'static str {
	if value { "true" } else { "false" }
}

/// Parse whole-string text as a basic bus value of type `token`.
pub fn parse_scalar(text: &str, token: &TypeToken) -> Result<BusValue> {
	let invalid = || CodecError::InvalidText {
		text: text.to_owned(),
		target: token.to_string(),
	};

	match token {
		TypeToken::Boolean => match text {
			"true" => Ok(BusValue::Boolean(true)),
			"false" => Ok(BusValue::Boolean(false)),
			_ => Err(invalid()),
		},
		TypeToken::Double => match text.parse::<f64>() {
			Ok(value) if value.is_finite() => Ok(BusValue::Double(value)),
			_ => Err(invalid()),
		},
		TypeToken::String => Ok(BusValue::String(text.to_owned())),
		TypeToken::ObjectPath => {
			if is_valid_object_path(text) {
				Ok(BusValue::ObjectPath(text.to_owned()))
			} else {
				Err(invalid())
			}
		}
		TypeToken::Signature => match Signature::parse(text) {
			Ok(_) => Ok(BusValue::Signature(text.to_owned())),
			Err(_) => Err(invalid()),
		},
		integer if integer.is_integer() => {
			let value = text.parse::<i128>().map_err(|_| invalid())?;
			integer_value(integer, value)
		}
		other => Err(CodecError::mismatch(other, "string")),
	}
}

/// Range-checked integer of bus type `token`.
pub fn integer_value(token: &TypeToken, value: i128) -> Result<BusValue> {
	let out_of_range = || CodecError::range(value, token);
	let value = match token {
		TypeToken::Byte => BusValue::Byte(u8::try_from(value).map_err(|_| out_of_range())?),
		TypeToken::Int16 => BusValue::Int16(i16::try_from(value).map_err(|_| out_of_range())?),
		TypeToken::Uint16 => BusValue::Uint16(u16::try_from(value).map_err(|_| out_of_range())?),
		TypeToken::Int32 => BusValue::Int32(i32::try_from(value).map_err(|_| out_of_range())?),
		TypeToken::Uint32 => BusValue::Uint32(u32::try_from(value).map_err(|_| out_of_range())?),
		TypeToken::Int64 => BusValue::Int64(i64::try_from(value).map_err(|_| out_of_range())?),
		TypeToken::Uint64 => BusValue::Uint64(u64::try_from(value).map_err(|_| out_of_range())?),
		other => return Err(CodecError::mismatch(other, "integer")),
	};
	Ok(value)
}

/// Whether `path` is a well-formed bus object path.
pub fn is_valid_object_path(path: &str) -> bool {
	if path == "/" {
		return true;
	}
	let Some(rest) = path.strip_prefix('/') else {
		return false;
	};
	rest.split('/')
		.all(|segment| !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_'))
}

#[cfg(test)]
mod tests {
	use super::{is_valid_object_path, parse_scalar, property_name};
	use crate::codec::{BusValue, ErrorKind, TypeToken};

	#[test]
	fn keys_render_canonically() {
		assert_eq!(property_name(&BusValue::Int32(-4)).expect("int key"), "-4");
		assert_eq!(property_name(&BusValue::Boolean(true)).expect("bool key"), "true");
		assert_eq!(property_name(&BusValue::Double(1.5)).expect("double key"), "1.5");
		assert!(property_name(&BusValue::variant(BusValue::Int32(1))).is_err());
	}

	#[test]
	fn non_finite_double_keys_are_rejected() {
		for key in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
			assert_eq!(property_name(&BusValue::Double(key)).expect_err("non-finite key").kind(), ErrorKind::RangeViolation);
		}
		let name = property_name(&BusValue::Double(-2.25)).expect("finite key");
		assert_eq!(parse_scalar(&name, &TypeToken::Double).expect("key parses back"), BusValue::Double(-2.25));
	}

	#[test]
	fn scalar_text_parsing_is_strict() {
		assert_eq!(parse_scalar("255", &TypeToken::Byte).expect("byte parses"), BusValue::Byte(255));
		assert_eq!(parse_scalar("256", &TypeToken::Byte).expect_err("overflow").kind(), ErrorKind::RangeViolation);
		assert_eq!(parse_scalar("12abc", &TypeToken::Int32).expect_err("partial").kind(), ErrorKind::ShapeMismatch);
		assert_eq!(parse_scalar(" 1", &TypeToken::Int32).expect_err("whitespace").kind(), ErrorKind::ShapeMismatch);
		assert!(parse_scalar("True", &TypeToken::Boolean).is_err());
		assert!(parse_scalar("NaN", &TypeToken::Double).is_err());
		assert_eq!(parse_scalar("2.5", &TypeToken::Double).expect("double parses"), BusValue::Double(2.5));
	}

	#[test]
	fn object_paths_are_validated() {
		assert!(is_valid_object_path("/"));
		assert!(is_valid_object_path("/org/example/Light_1"));
		assert!(!is_valid_object_path("org/example"));
		assert!(!is_valid_object_path("/org//example"));
		assert!(!is_valid_object_path("/org/example/"));
		assert!(!is_valid_object_path("/org/ex-ample"));
	}
}
