//! Popover configuration.
//!
//! [`PopoverData`] is the per-reference configuration an element family hands
//! to its popover. [`PopoverConfig`] holds the settings shared by all popovers
//! and is usually loaded once from TOML.

use std::path::Path;

use crossref_primitives::{NodeId, ReferenceTarget};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Per-reference popover configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopoverData {
	/// The reference node the popover was opened for.
	pub context_node_id: Option<NodeId>,
	/// Expression producing the raw target from the context node, often `@href`.
	pub target_query: String,
	/// Whether the raw target is a permanent id.
	pub target_is_permanent_id: bool,
	/// Operation editing the reference; without it no edit action is offered.
	pub edit_operation_name: Option<String>,
	/// Operation removing the reference.
	pub delete_operation_name: Option<String>,
	/// Whether the reference may not be changed from this popover.
	pub is_read_only: bool,
	/// Label for the reference used instead of its markup label.
	pub reference_markup_label: Option<String>,
}

impl PopoverData {
	/// Creates data for a reference node and target query.
	pub fn new(context_node_id: impl Into<NodeId>, target_query: impl Into<String>) -> Self {
		Self {
			context_node_id: Some(context_node_id.into()),
			target_query: target_query.into(),
			..Self::default()
		}
	}

	/// Wraps a raw target with this reference's resolution mode.
	pub fn reference_target(&self, raw: impl Into<String>) -> ReferenceTarget {
		ReferenceTarget {
			raw: raw.into(),
			is_permanent_id: self.target_is_permanent_id,
		}
	}
}

/// Settings shared by every popover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopoverConfig {
	/// Maximum length of the preview text, ellipsis included.
	pub truncate_length: usize,
	/// Operation opening the document preview modal.
	pub preview_operation: String,
	/// Delete operation used when a reference does not name one.
	pub default_delete_operation: String,
	/// Highlight name used for the previewed target node.
	pub highlight_name: String,
	/// Color the target highlight is drawn with.
	pub highlight_color: String,
}

impl Default for PopoverConfig {
	fn default() -> Self {
		Self {
			truncate_length: 140,
			preview_operation: "open-document-preview-modal".to_owned(),
			default_delete_operation: "reference-delete".to_owned(),
			highlight_name: "target-element".to_owned(),
			highlight_color: "#fdd835".to_owned(),
		}
	}
}

impl PopoverConfig {
	/// Parses configuration from a TOML string. Missing keys take defaults.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	fn validate(&self) -> Result<()> {
		if self.truncate_length == 0 {
			return Err(ConfigError::Invalid("truncate_length must be at least 1".into()));
		}
		if self.preview_operation.is_empty() {
			return Err(ConfigError::Invalid("preview_operation must not be empty".into()));
		}
		if self.default_delete_operation.is_empty() {
			return Err(ConfigError::Invalid("default_delete_operation must not be empty".into()));
		}
		Ok(())
	}
}
