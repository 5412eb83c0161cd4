//! Error types for reference resolution, operations and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by host collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A reference target could not be turned into a concrete document or node.
#[derive(Debug, Error)]
pub enum ResolutionError {
	/// The permanent id registry failed to look up the id.
	#[error("permanent id '{id}' could not be retrieved: {source}")]
	PermanentId {
		/// Permanent id that was looked up.
		id: String,
		/// Registry failure.
		source: BoxError,
	},

	/// The resolution callback rejected the target.
	#[error("reference target '{target}' was rejected: {source}")]
	Rejected {
		/// Raw target handed to the callback.
		target: String,
		/// Callback failure.
		source: BoxError,
	},

	/// Required input for resolution was absent.
	#[error("missing input for reference resolution: {0}")]
	MissingInput(String),
}

/// Executing an operation through the host failed.
#[derive(Debug, Error)]
pub enum OperationError {
	/// The operation executor rejected the operation.
	#[error("operation '{operation}' was rejected: {source}")]
	Rejected {
		/// Operation name.
		operation: String,
		/// Executor failure.
		source: BoxError,
	},

	/// The operation payload could not be encoded.
	#[error("failed to encode operation payload: {0}")]
	Payload(#[from] serde_json::Error),
}

/// A structural query could not be evaluated.
#[derive(Debug, Error)]
#[error("query '{query}' failed: {reason}")]
pub struct QueryError {
	/// Query text.
	pub query: String,
	/// Failure description from the query engine.
	pub reason: String,
}

/// Errors that can occur when loading popover configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value is out of range.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
