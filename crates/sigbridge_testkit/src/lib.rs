//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

use sigbridge::codec::{Object, ResourceValue, TypeRegistry, TypeToken};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read and parse a JSON fixture.
pub fn fixture_json(name: &str) -> serde_json::Value {
	let text = std::fs::read_to_string(fixture_path(name)).expect("fixture reads");
	serde_json::from_str(&text).expect("fixture is valid json")
}

/// Load the lamp registry fixture: `[Point]`, `[Segment]` and `[LampState]`.
pub fn lamp_registry() -> TypeRegistry {
	let text = std::fs::read_to_string(fixture_path("lamp_registry.json")).expect("registry fixture reads");
	TypeRegistry::from_json(&text).expect("registry fixture loads")
}

/// Parse a single complete type, panicking on malformed test input.
pub fn sig(text: &str) -> TypeToken {
	TypeToken::parse_one(text).unwrap_or_else(|err| panic!("bad test signature {text:?}: {err}"))
}

/// Build an object from name/value pairs in order.
pub fn object<const N: usize>(props: [(&str, ResourceValue); N]) -> Object {
	props.into_iter().collect()
}

/// Build a positional object with properties `"0"`, `"1"`, ...
pub fn positional(values: impl IntoIterator<Item = ResourceValue>) -> Object {
	values.into_iter().enumerate().map(|(idx, value)| (idx.to_string(), value)).collect()
}
