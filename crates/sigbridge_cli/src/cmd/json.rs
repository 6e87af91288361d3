//! Resource values as plain JSON.
//!
//! Objects, arrays and scalars map to their JSON counterparts. Byte strings
//! use `{"$bytes": "<base64>"}` so they stay distinct from text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Number, Value};
use sigbridge::codec::{Object, ResourceArray, ResourceValue};

use crate::cmd::{CliError, Result};

const BYTES_KEY: &str = "$bytes";

/// Parse JSON text into a resource value.
pub fn parse_resource(text: &str) -> Result<ResourceValue> {
	let value: Value = serde_json::from_str(text)?;
	resource_from_json(&value)
}

/// Convert a JSON value into a resource value.
pub fn resource_from_json(value: &Value) -> Result<ResourceValue> {
	let out = match value {
		Value::Null => ResourceValue::Null,
		Value::Bool(flag) => ResourceValue::Bool(*flag),
		Value::Number(number) => number_from_json(number)?,
		Value::String(text) => ResourceValue::String(text.clone()),
		Value::Array(items) => {
			if items.is_empty() {
				return Ok(ResourceValue::Null);
			}
			let rows = items.iter().map(resource_from_json).collect::<Result<Vec<_>>>()?;
			ResourceValue::Array(ResourceArray::from_rows(rows)?)
		}
		Value::Object(map) => {
			if let Some(bytes) = byte_string(map)? {
				return Ok(ResourceValue::ByteString(bytes));
			}
			let mut object = Object::new();
			for (name, item) in map {
				object.insert(name.as_str(), resource_from_json(item)?);
			}
			ResourceValue::Object(object)
		}
	};
	Ok(out)
}

/// Convert a resource value into JSON.
pub fn resource_to_json(value: &ResourceValue) -> Value {
	match value {
		ResourceValue::Null => Value::Null,
		ResourceValue::Int(number) => Value::from(*number),
		ResourceValue::Double(number) => Number::from_f64(*number).map(Value::Number).unwrap_or(Value::Null),
		ResourceValue::Bool(flag) => Value::Bool(*flag),
		ResourceValue::String(text) => Value::String(text.clone()),
		ResourceValue::ByteString(bytes) => {
			let mut map = Map::new();
			map.insert(BYTES_KEY.to_owned(), Value::String(STANDARD.encode(bytes)));
			Value::Object(map)
		}
		ResourceValue::Object(object) => Value::Object(
			object
				.iter()
				.map(|prop| (prop.name.to_string(), resource_to_json(&prop.value)))
				.collect(),
		),
		ResourceValue::Array(array) => Value::Array(array.rows().iter().map(resource_to_json).collect()),
	}
}

fn number_from_json(number: &Number) -> Result<ResourceValue> {
	if let Some(value) = number.as_i64() {
		return Ok(ResourceValue::Int(value));
	}
	if number.is_u64() {
		return Err(CliError::Input {
			reason: format!("integer {number} exceeds the signed 64-bit range"),
		});
	}
	match number.as_f64() {
		Some(value) => Ok(ResourceValue::Double(value)),
		None => Err(CliError::Input {
			reason: format!("number {number} is not representable"),
		}),
	}
}

fn byte_string(map: &Map<String, Value>) -> Result<Option<Vec<u8>>> {
	if map.len() != 1 {
		return Ok(None);
	}
	let Some(Value::String(text)) = map.get(BYTES_KEY) else {
		return Ok(None);
	};
	STANDARD.decode(text).map(Some).map_err(|err| CliError::Input {
		reason: format!("invalid {BYTES_KEY} payload: {err}"),
	})
}
