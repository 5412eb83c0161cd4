//! Gating of reference actions and their operation payloads.

use crossref_primitives::{NodeId, ResolvedTarget};
use serde::Serialize;

use crate::config::PopoverData;
use crate::preview::PreviewModalData;

/// Which actions a popover currently offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionAvailability {
	/// Opening the target preview.
	pub can_preview: bool,
	/// Editing the reference.
	pub can_edit: bool,
	/// Removing the reference.
	pub can_delete: bool,
}

/// Payload for operations acting on the reference node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceOperationData {
	/// The reference node.
	pub context_node_id: NodeId,
}

/// Decides which actions are permitted for one reference.
#[derive(Debug, Clone)]
pub struct ReferenceActionGate {
	is_read_only: bool,
	context_node_id: Option<NodeId>,
	edit_operation_name: Option<String>,
	delete_operation_name: String,
}

impl ReferenceActionGate {
	/// Builds a gate from popover data, using `default_delete_operation` when
	/// the data names no delete operation.
	pub fn new(data: &PopoverData, default_delete_operation: &str) -> Self {
		Self {
			is_read_only: data.is_read_only,
			context_node_id: data.context_node_id.clone(),
			edit_operation_name: data.edit_operation_name.clone().filter(|name| !name.is_empty()),
			delete_operation_name: data
				.delete_operation_name
				.clone()
				.filter(|name| !name.is_empty())
				.unwrap_or_else(|| default_delete_operation.to_owned()),
		}
	}

	/// Computes availability; preview needs a resolved target.
	pub fn availability(&self, target_resolved: bool) -> ActionAvailability {
		let writable = !self.is_read_only && self.context_node_id.is_some();
		ActionAvailability {
			can_preview: target_resolved,
			can_edit: writable && self.edit_operation_name.is_some(),
			can_delete: writable,
		}
	}

	/// Edit operation name, when editing is permitted.
	pub fn edit_operation(&self) -> Option<&str> {
		self.availability(false).can_edit.then_some(self.edit_operation_name.as_deref()).flatten()
	}

	/// Delete operation name, when deleting is permitted.
	pub fn delete_operation(&self) -> Option<&str> {
		self.availability(false)
			.can_delete
			.then_some(self.delete_operation_name.as_str())
	}

	/// Payload for edit and delete operations.
	pub fn reference_payload(&self) -> Option<ReferenceOperationData> {
		self.context_node_id.clone().map(|context_node_id| ReferenceOperationData { context_node_id })
	}

	/// Payload for opening the document preview modal.
	///
	/// The edit affordance is only embedded when editing is permitted.
	pub fn preview_payload(&self, target: &ResolvedTarget) -> PreviewModalData {
		let mut data = PreviewModalData::for_target(target);
		if let (Some(operation), Some(node)) = (self.edit_operation(), self.context_node_id.as_ref()) {
			data.edit_reference_operation_name = Some(operation.to_owned());
			data.edit_reference_node_id = Some(node.clone());
		}
		data
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn data(read_only: bool, edit: Option<&str>) -> PopoverData {
		PopoverData {
			is_read_only: read_only,
			edit_operation_name: edit.map(str::to_owned),
			..PopoverData::new("xref", "@href")
		}
	}

	#[test]
	fn read_only_blocks_edit_and_delete() {
		let gate = ReferenceActionGate::new(&data(true, Some("xref-edit")), "reference-delete");
		let availability = gate.availability(true);
		assert!(availability.can_preview);
		assert!(!availability.can_edit);
		assert!(!availability.can_delete);
		assert_eq!(gate.edit_operation(), None);
		assert_eq!(gate.delete_operation(), None);
	}

	#[test]
	fn edit_needs_an_operation_name() {
		let gate = ReferenceActionGate::new(&data(false, None), "reference-delete");
		assert_eq!(
			gate.availability(true),
			ActionAvailability {
				can_preview: true,
				can_edit: false,
				can_delete: true,
			}
		);
		assert_eq!(gate.delete_operation(), Some("reference-delete"));
	}

	#[test]
	fn missing_context_node_blocks_writes() {
		let mut data = data(false, Some("xref-edit"));
		data.context_node_id = None;
		let gate = ReferenceActionGate::new(&data, "reference-delete");
		let availability = gate.availability(false);
		assert!(!availability.can_preview);
		assert!(!availability.can_edit);
		assert!(!availability.can_delete);
		assert_eq!(gate.reference_payload(), None);
	}

	#[test]
	fn explicit_delete_operation_wins() {
		let mut data = data(false, None);
		data.delete_operation_name = Some("xref-remove".into());
		let gate = ReferenceActionGate::new(&data, "reference-delete");
		assert_eq!(gate.delete_operation(), Some("xref-remove"));
	}

	#[test]
	fn preview_payload_embeds_edit_affordance_when_editable() {
		let target = ResolvedTarget::new("doc7".into(), Some("nodeA".into()));

		let editable = ReferenceActionGate::new(&data(false, Some("xref-edit")), "reference-delete");
		assert_eq!(
			serde_json::to_value(editable.preview_payload(&target)).unwrap(),
			serde_json::json!({
				"documentId": "doc7",
				"nodeId": "nodeA",
				"editReferenceOperationName": "xref-edit",
				"editReferenceNodeId": "xref",
			})
		);

		let read_only = ReferenceActionGate::new(&data(true, Some("xref-edit")), "reference-delete");
		assert_eq!(
			serde_json::to_value(read_only.preview_payload(&target)).unwrap(),
			serde_json::json!({ "documentId": "doc7", "nodeId": "nodeA" })
		);
	}

	#[test]
	fn reference_payload_uses_camel_case() {
		let gate = ReferenceActionGate::new(&data(false, Some("xref-edit")), "reference-delete");
		assert_eq!(
			serde_json::to_value(gate.reference_payload().unwrap()).unwrap(),
			serde_json::json!({ "contextNodeId": "xref" })
		);
	}
}
