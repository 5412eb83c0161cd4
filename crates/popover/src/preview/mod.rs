//! Document preview modal.
//!
//! Opened through the preview operation with a [`PreviewModalData`] payload.
//! While open, the target node is highlighted and scrolled into view. The
//! modal may carry an edit affordance for the reference it was opened from.

use std::sync::Arc;

use crossref_primitives::{DocumentId, NodeId, ResolvedTarget};
use serde::{Deserialize, Serialize};

use crate::actions::ReferenceOperationData;
use crate::config::PopoverConfig;
use crate::host::{Host, StructuralQuery};
use crate::messages;

/// Payload of the preview operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewModalData {
	/// Document to preview.
	pub document_id: DocumentId,
	/// Node to highlight, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub node_id: Option<NodeId>,
	/// Operation editing the reference the preview was opened from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub edit_reference_operation_name: Option<String>,
	/// The reference node the preview was opened from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub edit_reference_node_id: Option<NodeId>,
	/// Title overriding the default modal title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub modal_title: Option<String>,
	/// Icon shown next to the title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub modal_icon: Option<String>,
}

impl PreviewModalData {
	/// Payload previewing a resolved target without edit affordance.
	pub fn for_target(target: &ResolvedTarget) -> Self {
		Self {
			document_id: target.document_id.clone(),
			node_id: target.node_id.clone(),
			edit_reference_operation_name: None,
			edit_reference_node_id: None,
			modal_title: None,
			modal_icon: None,
		}
	}
}

/// Keys the modal reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
	/// Escape.
	Escape,
	/// Enter.
	Enter,
	/// Anything else.
	Other,
}

/// Result of [`DocumentPreviewModal::edit_reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditReferenceOutcome {
	/// The modal offers no edit affordance.
	Unavailable,
	/// The edit operation ran.
	Edited,
	/// The edit operation was rejected and the preview was opened again.
	ReopenedPreview,
	/// Both the edit operation and reopening the preview were rejected.
	Failed,
}

/// Controller for one open document preview modal.
pub struct DocumentPreviewModal {
	host: Host,
	config: Arc<PopoverConfig>,
	data: PreviewModalData,
	open: bool,
}

impl DocumentPreviewModal {
	/// Opens the modal, highlighting and revealing the target node.
	pub fn open(host: Host, config: Arc<PopoverConfig>, data: PreviewModalData) -> Self {
		if let Some(node_id) = &data.node_id {
			host.highlights.style_highlight(&config.highlight_name, &config.highlight_color);
			host.highlights.set_highlight(&config.highlight_name, Some(node_id));
			host.highlights.scroll_into_view(node_id);
		}
		tracing::debug!(document = %data.document_id, node = ?data.node_id, "preview.open");
		Self {
			host,
			config,
			data,
			open: true,
		}
	}

	/// Opens the modal from a raw operation payload.
	pub fn from_payload(host: Host, config: Arc<PopoverConfig>, payload: serde_json::Value) -> Result<Self, serde_json::Error> {
		let data = serde_json::from_value(payload)?;
		Ok(Self::open(host, config, data))
	}

	/// Payload the modal was opened with.
	pub fn data(&self) -> &PreviewModalData {
		&self.data
	}

	/// Modal title.
	pub fn title(&self) -> &str {
		self.data
			.modal_title
			.as_deref()
			.filter(|title| !title.is_empty())
			.unwrap_or(messages::PREVIEW_LINK_TITLE)
	}

	/// Modal icon, empty when none was given.
	pub fn icon(&self) -> &str {
		self.data.modal_icon.as_deref().unwrap_or_default()
	}

	/// Label of the edit affordance, when it is shown.
	pub fn edit_reference_label(&self) -> Option<&'static str> {
		self.can_edit_reference().then_some(messages::EDIT_REFERENCE)
	}

	/// Label of the close button.
	pub fn close_label(&self) -> &'static str {
		messages::CLOSE
	}

	/// Returns true until the modal is closed.
	pub fn is_open(&self) -> bool {
		self.open
	}

	/// Whether the "Edit reference" affordance is shown.
	///
	/// Needs both edit fields and a reference node that is not read-only. A
	/// failing read-only check counts as read-only.
	pub fn can_edit_reference(&self) -> bool {
		if !self.open {
			return false;
		}
		let (Some(_), Some(node_id)) = (&self.data.edit_reference_operation_name, &self.data.edit_reference_node_id) else {
			return false;
		};
		if !self.host.documents.contains_node(node_id) {
			return false;
		}
		match self.host.queries.evaluate_boolean(&StructuralQuery::IsNodeReadOnly, node_id) {
			Ok(read_only) => !read_only,
			Err(error) => {
				tracing::debug!(%error, node = %node_id, "preview.read_only_check.failed");
				false
			}
		}
	}

	/// Closes the modal and runs the edit operation for the reference.
	///
	/// When the edit operation is rejected the preview is opened again with
	/// the same payload so the user can retry from there.
	pub async fn edit_reference(&mut self) -> EditReferenceOutcome {
		if !self.can_edit_reference() {
			return EditReferenceOutcome::Unavailable;
		}
		let (Some(operation), Some(node_id)) = (
			self.data.edit_reference_operation_name.clone(),
			self.data.edit_reference_node_id.clone(),
		) else {
			return EditReferenceOutcome::Unavailable;
		};
		self.close();

		let payload = ReferenceOperationData { context_node_id: node_id };
		let Err(error) = self.host.execute(&operation, &payload).await else {
			return EditReferenceOutcome::Edited;
		};
		tracing::info!(%error, "preview.edit_reference.rejected");

		match self.host.execute(&self.config.preview_operation, &self.data).await {
			Ok(()) => EditReferenceOutcome::ReopenedPreview,
			Err(error) => {
				tracing::debug!(%error, "preview.reopen.rejected");
				EditReferenceOutcome::Failed
			}
		}
	}

	/// Handles a key press; Escape and Enter close the modal.
	pub fn handle_key(&mut self, key: ModalKey) -> bool {
		match key {
			ModalKey::Escape | ModalKey::Enter => {
				self.close();
				true
			}
			ModalKey::Other => false,
		}
	}

	/// Closes the modal and clears the target highlight. Closing twice is a no-op.
	pub fn close(&mut self) {
		if !self.open {
			return;
		}
		self.open = false;
		if self.data.node_id.is_some() {
			self.host.highlights.set_highlight(&self.config.highlight_name, None);
		}
		tracing::debug!(document = %self.data.document_id, "preview.close");
	}
}

impl Drop for DocumentPreviewModal {
	fn drop(&mut self) {
		self.close();
	}
}
