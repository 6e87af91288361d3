use std::path::Path;

use sigbridge::codec::{TranslateOptions, TypeRegistry};
use tracing::debug;

use crate::cmd::{CliError, Result};

/// Load a registry document, or start empty when none is given.
pub(crate) fn load_registry(path: Option<&Path>) -> Result<TypeRegistry> {
	let Some(path) = path else {
		return Ok(TypeRegistry::new());
	};
	let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
		path: path.to_path_buf(),
		source,
	})?;
	let registry = TypeRegistry::from_json(&text)?;
	debug!(path = %path.display(), names = registry.len(), "registry loaded");
	Ok(registry)
}

/// Translation options from `--strict` and `--max-depth`.
pub(crate) fn translate_options(strict: bool, max_depth: Option<u32>) -> TranslateOptions {
	let mut opt = if strict { TranslateOptions::strict() } else { TranslateOptions::default() };
	if let Some(max_depth) = max_depth {
		opt.max_depth = max_depth;
	}
	opt
}
