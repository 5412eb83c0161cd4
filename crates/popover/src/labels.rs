//! Label and preview text derivation for resolved targets.
//!
//! The preview text comes from the first non-empty source in a fixed chain:
//! registry metadata title, then the target's title content, then its curated
//! text. Later sources are structural scans and are never evaluated once an
//! earlier one produced text.

use crossref_primitives::{NodeId, ResolvedTarget, truncate};

use crate::host::{Host, StructuralQuery};
use crate::messages;

/// Which preview link the popover offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewVerb {
	/// The target has text; the link shows the rest of it.
	ShowMore,
	/// The target has no text; the link previews it.
	ShowPreview,
}

impl PreviewVerb {
	/// Stable identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ShowMore => "show-more",
			Self::ShowPreview => "show-preview",
		}
	}

	/// Link label shown to the user.
	pub const fn label(self) -> &'static str {
		match self {
			Self::ShowMore => messages::SHOW_MORE,
			Self::ShowPreview => messages::SHOW_PREVIEW,
		}
	}
}

/// The reference side of label derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceContext {
	/// The reference node.
	pub context_node_id: Option<NodeId>,
	/// Label used instead of the reference node's markup label.
	pub reference_markup_label: Option<String>,
}

/// Labels and preview text shown in a popover body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedLabels {
	/// Label of the reference element.
	pub reference_markup_label: String,
	/// Label of the target element.
	pub target_markup_label: String,
	/// Preview link kind.
	pub preview_verb: PreviewVerb,
	/// Quoted, truncated title text or the no-content message.
	pub text_representation: String,
}

impl DerivedLabels {
	/// Heading line, e.g. "Cross link to the figure:".
	pub fn heading(&self) -> String {
		messages::heading(&self.reference_markup_label, &self.target_markup_label)
	}
}

/// Lazily evaluated text source.
pub type TextSource<'a> = Box<dyn FnOnce() -> Option<String> + 'a>;

/// Returns the first text a source yields, evaluating sources in order and
/// stopping at the first hit.
///
/// Sources decide for themselves what counts as empty: query sources drop
/// blank results, a metadata title only has to be non-empty.
pub fn first_text<'a>(sources: impl IntoIterator<Item = TextSource<'a>>) -> Option<String> {
	sources.into_iter().find_map(|source| source())
}

/// Derives popover labels through the host's query engine.
pub struct LabelDeriver<'a> {
	host: &'a Host,
	truncate_length: usize,
}

impl<'a> LabelDeriver<'a> {
	/// Creates a deriver truncating preview text to `truncate_length`.
	pub fn new(host: &'a Host, truncate_length: usize) -> Self {
		Self { host, truncate_length }
	}

	/// Returns the node a target points at: its node, or the root element of
	/// its document.
	pub fn target_node(&self, target: &ResolvedTarget) -> Option<NodeId> {
		match &target.node_id {
			Some(node_id) => self.host.documents.contains_node(node_id).then(|| node_id.clone()),
			None => self.host.documents.document_element(&target.document_id),
		}
	}

	/// Derives all labels for `target` seen from `reference`.
	pub fn derive(&self, target: &ResolvedTarget, reference: &ReferenceContext) -> DerivedLabels {
		let target_node = self.target_node(target);

		let reference_markup_label = reference
			.reference_markup_label
			.clone()
			.filter(|label| !label.is_empty())
			.or_else(|| {
				let context = reference.context_node_id.as_ref()?;
				self.host.query_string(&StructuralQuery::MarkupLabel, context)
			})
			.unwrap_or_default();

		let target_markup_label = target_node
			.as_ref()
			.and_then(|node| self.host.query_string(&StructuralQuery::MarkupLabel, node))
			.unwrap_or_default();

		let title = self.title_text(target, target_node.as_ref());
		match title {
			Some(title) => DerivedLabels {
				reference_markup_label,
				target_markup_label,
				preview_verb: PreviewVerb::ShowMore,
				text_representation: messages::quoted(&truncate(&title, self.truncate_length)),
			},
			None => {
				tracing::trace!(document = %target.document_id, "popover.labels.no_text");
				DerivedLabels {
					text_representation: messages::no_textual_content(&target_markup_label),
					reference_markup_label,
					target_markup_label,
					preview_verb: PreviewVerb::ShowPreview,
				}
			}
		}
	}

	fn title_text<'s>(&'s self, target: &'s ResolvedTarget, node: Option<&'s NodeId>) -> Option<String> {
		first_text([
			Box::new(move || target.metadata_title().map(str::to_owned)) as TextSource<'s>,
			self.query_source(StructuralQuery::TitleContent, node),
			self.query_source(StructuralQuery::CuratedText, node),
		])
	}

	fn query_source<'s>(&'s self, query: StructuralQuery, node: Option<&'s NodeId>) -> TextSource<'s> {
		Box::new(move || node.and_then(|node| self.host.query_string(&query, node)))
	}
}

#[cfg(test)]
mod tests;
