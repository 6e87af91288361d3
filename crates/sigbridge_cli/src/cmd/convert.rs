use sigbridge::codec::{BusValue, TranslateOptions, TypeRegistry, TypeToken, to_bus_value, to_resource_value};
use tracing::debug;

use crate::cmd::Result;
use crate::cmd::json::{parse_resource, resource_to_json};

/// Translate a JSON bus value into a resource value and print it as JSON.
pub fn to_resource(registry: &TypeRegistry, sig: &str, value: &str, opt: &TranslateOptions) -> Result<()> {
	let token = TypeToken::parse_one(sig)?;
	let value: BusValue = serde_json::from_str(value)?;
	debug!(signature = %token, "translating bus value");

	let out = to_resource_value(registry, &value, &token, opt)?;
	println!("{}", serde_json::to_string_pretty(&resource_to_json(&out))?);
	Ok(())
}

/// Translate a JSON resource value into a bus value and print it as JSON.
pub fn to_bus(registry: &TypeRegistry, sig: &str, hint: Option<&str>, value: &str, opt: &TranslateOptions) -> Result<()> {
	let token = TypeToken::parse_one(sig)?;
	let hint = hint.map(TypeToken::parse_one).transpose()?;
	let value = parse_resource(value)?;
	debug!(signature = %token, "translating resource value");

	let out = to_bus_value(registry, &value, &token, hint.as_ref(), opt)?;
	println!("{}", serde_json::to_string_pretty(&out)?);
	Ok(())
}
