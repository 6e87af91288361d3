use sigbridge::codec::infer_signature;

use crate::cmd::Result;
use crate::cmd::json::parse_resource;

/// Print the signature inferred for a JSON resource value.
pub fn run(value: &str) -> Result<()> {
	let value = parse_resource(value)?;
	println!("{}", infer_signature(&value));
	Ok(())
}
