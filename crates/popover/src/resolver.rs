//! Reference target resolution.
//!
//! A raw target is first passed through the permanent id registry when the
//! reference uses permanent ids, then handed to the integrator's
//! [`ReferenceResolver`]. Both paths end in the same callback, so scheme
//! knowledge stays with the integrator.

use std::sync::Arc;

use async_trait::async_trait;
use crossref_primitives::{DocumentId, NodeId, ReferenceTarget, ResolvedTarget};

use crate::error::{BoxError, ResolutionError};
use crate::host::{DocumentStore, PermanentIdRegistry, QueryEngine, ReferenceResolver, StructuralQuery};

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// There is no target yet; the popover stays loading.
	Pending,
	/// The target points at a concrete location.
	Resolved(ResolvedTarget),
}

/// Resolves raw reference targets into concrete locations.
#[derive(Clone)]
pub struct TargetResolver {
	registry: Arc<dyn PermanentIdRegistry>,
	resolver: Arc<dyn ReferenceResolver>,
}

impl TargetResolver {
	/// Creates a resolver over a registry and a resolution callback.
	pub fn new(registry: Arc<dyn PermanentIdRegistry>, resolver: Arc<dyn ReferenceResolver>) -> Self {
		Self { registry, resolver }
	}

	/// Resolves `target`.
	///
	/// Permanent ids are always looked up before the callback sees anything.
	/// Failures are not retried.
	pub async fn resolve(&self, target: &ReferenceTarget) -> Result<Resolution, ResolutionError> {
		if target.is_empty() {
			return Ok(Resolution::Pending);
		}

		let (raw, metadata) = if target.is_permanent_id {
			let entry = self
				.registry
				.retrieve_single(&target.raw)
				.await
				.map_err(|source| ResolutionError::PermanentId {
					id: target.raw.clone(),
					source,
				})?;
			if entry.target.trim().is_empty() {
				return Err(ResolutionError::MissingInput(format!(
					"permanent id '{}' has no target",
					target.raw
				)));
			}
			tracing::trace!(id = %target.raw, target = %entry.target, "popover.resolve.permanent_id");
			(entry.target, Some(entry.metadata))
		} else {
			(target.raw.clone(), None)
		};

		let resolved = self
			.resolver
			.resolve_reference(&raw)
			.await
			.map_err(|source| ResolutionError::Rejected {
				target: raw.clone(),
				source,
			})?;
		if resolved.document_id.as_str().is_empty() {
			return Err(ResolutionError::MissingInput(format!("no document id for target '{raw}'")));
		}

		let resolved = match metadata {
			Some(metadata) if resolved.metadata.is_none() => resolved.with_metadata(Some(metadata)),
			_ => resolved,
		};
		Ok(Resolution::Resolved(resolved))
	}
}

/// Evaluates a reference's target query against its context node.
///
/// Returns `None` when there is no context node, the query fails, or it yields
/// nothing.
pub fn query_raw_target(queries: &dyn QueryEngine, target_query: &str, context: Option<&NodeId>) -> Option<String> {
	let context = context?;
	if target_query.trim().is_empty() {
		return None;
	}
	let query = StructuralQuery::Expression(target_query.to_owned());
	match queries.evaluate_string(&query, context) {
		Ok(raw) if !raw.trim().is_empty() => Some(raw),
		Ok(_) => None,
		Err(error) => {
			tracing::debug!(%error, %context, "popover.target_query.failed");
			None
		}
	}
}

/// Resolver for plain `document#node` hrefs.
///
/// - `doc` points at the root of `doc`;
/// - `doc#node` points at `node` in `doc`;
/// - `#node` points at `node` in the document holding the context node.
pub struct HrefResolver {
	documents: Arc<dyn DocumentStore>,
	context_node_id: Option<NodeId>,
}

impl HrefResolver {
	/// Creates a resolver for references inside `context_node_id`'s document.
	pub fn new(documents: Arc<dyn DocumentStore>, context_node_id: Option<NodeId>) -> Self {
		Self {
			documents,
			context_node_id,
		}
	}

	/// Splits an href into its document and node parts.
	pub fn parse(&self, href: &str) -> Result<ResolvedTarget, ResolutionError> {
		let href = href.trim();
		let Some((document, fragment)) = href.split_once('#') else {
			return Ok(ResolvedTarget::new(DocumentId::new(href), None));
		};

		let node_id = (!fragment.is_empty()).then(|| NodeId::new(fragment));
		if !document.is_empty() {
			return Ok(ResolvedTarget::new(DocumentId::new(document), node_id));
		}

		let document_id = self
			.context_node_id
			.as_ref()
			.and_then(|context| self.documents.document_id_of(context))
			.ok_or_else(|| ResolutionError::MissingInput(format!("no context document for relative target '{href}'")))?;
		Ok(ResolvedTarget::new(document_id, node_id))
	}
}

#[async_trait]
impl ReferenceResolver for HrefResolver {
	async fn resolve_reference(&self, target: &str) -> Result<ResolvedTarget, BoxError> {
		Ok(self.parse(target)?)
	}
}
