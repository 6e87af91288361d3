use std::path::PathBuf;

use sigbridge::codec::CodecError;
use thiserror::Error;

/// Forward and reverse translation commands.
pub mod convert;
/// Signature inference command.
pub mod infer;
/// Resource value JSON mapping.
pub mod json;
/// Signature inspection command.
pub mod parse;
/// Shared argument handling.
pub mod util;

/// Command failure.
#[derive(Debug, Error)]
pub enum CliError {
	/// Translation or signature failure from the codec.
	#[error(transparent)]
	Codec(#[from] CodecError),
	/// Input file could not be read.
	#[error("failed to read {}: {source}", .path.display())]
	Read {
		/// Path that failed.
		path: PathBuf,
		/// Underlying I/O error.
		source: std::io::Error,
	},
	/// Command-line value was not valid JSON.
	#[error("invalid json input: {0}")]
	Json(#[from] serde_json::Error),
	/// JSON input had no resource or bus equivalent.
	#[error("unsupported json input: {reason}")]
	Input {
		/// What was wrong.
		reason: String,
	},
}

/// Command result alias.
pub type Result<T> = std::result::Result<T, CliError>;
