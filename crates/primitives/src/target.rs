use serde::{Deserialize, Serialize};

use crate::{DocumentId, NodeId};

/// Raw, unresolved target of a reference.
///
/// The raw string is opaque: it is whatever the reference's target query
/// produced, or a permanent id that still has to go through the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTarget {
	/// Raw target text.
	pub raw: String,
	/// Whether `raw` is a permanent id rather than a direct locator.
	pub is_permanent_id: bool,
}

impl ReferenceTarget {
	/// Creates a direct target.
	pub fn direct(raw: impl Into<String>) -> Self {
		Self {
			raw: raw.into(),
			is_permanent_id: false,
		}
	}

	/// Creates a permanent id target.
	pub fn permanent(raw: impl Into<String>) -> Self {
		Self {
			raw: raw.into(),
			is_permanent_id: true,
		}
	}

	/// Returns true when there is nothing to resolve yet.
	pub fn is_empty(&self) -> bool {
		self.raw.trim().is_empty()
	}
}

/// Metadata carried alongside a target, usually from the permanent id registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMetadata {
	/// Title to display instead of querying the target node.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

impl TargetMetadata {
	/// Returns the title when it is present and non-empty.
	pub fn non_empty_title(&self) -> Option<&str> {
		self.title.as_deref().filter(|title| !title.is_empty())
	}
}

/// Concrete location a reference points to.
///
/// A missing `node_id` means the root of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTarget {
	/// Document containing the target.
	pub document_id: DocumentId,
	/// Target node, or `None` for the document root.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub node_id: Option<NodeId>,
	/// Optional metadata, e.g. a registry-provided title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<TargetMetadata>,
}

impl ResolvedTarget {
	/// Creates a target without metadata.
	pub fn new(document_id: DocumentId, node_id: Option<NodeId>) -> Self {
		Self {
			document_id,
			node_id,
			metadata: None,
		}
	}

	/// Attaches metadata, replacing any present.
	pub fn with_metadata(mut self, metadata: Option<TargetMetadata>) -> Self {
		self.metadata = metadata;
		self
	}

	/// Returns the metadata title when it is present and non-empty.
	pub fn metadata_title(&self) -> Option<&str> {
		self.metadata.as_ref().and_then(TargetMetadata::non_empty_title)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn whitespace_target_is_empty() {
		assert!(ReferenceTarget::direct("  ").is_empty());
		assert!(!ReferenceTarget::permanent("perm-42").is_empty());
	}

	#[test]
	fn empty_metadata_title_is_ignored() {
		let target = ResolvedTarget::new("doc".into(), None).with_metadata(Some(TargetMetadata {
			title: Some(String::new()),
		}));
		assert_eq!(target.metadata_title(), None);
	}

	#[test]
	fn resolved_target_omits_absent_fields() {
		let target = ResolvedTarget::new("doc7".into(), None);
		let json = serde_json::to_value(&target).unwrap();
		assert_eq!(json, serde_json::json!({ "documentId": "doc7" }));
	}
}
