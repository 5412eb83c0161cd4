//! Collaborator interfaces consumed by the popover core.
//!
//! The document store, structural query engine, permanent id registry,
//! operation executor and highlighter all belong to the embedding editor. They
//! are injected through [`Host`] so the core holds no process-wide state and can
//! be driven by in-memory fakes.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use crossref_primitives::{DocumentId, NodeId, ResolvedTarget, TargetMetadata};

use crate::error::{BoxError, QueryError};

/// Structural query evaluated against a single node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructuralQuery {
	/// Human-readable name of the node's element type.
	MarkupLabel,
	/// Structurally defined title of the node.
	TitleContent,
	/// Best-effort representative text of the node.
	CuratedText,
	/// Whether the node may not be edited.
	IsNodeReadOnly,
	/// Arbitrary configured expression, e.g. `@href`.
	Expression(String),
}

impl StructuralQuery {
	/// Returns the query text handed to the engine.
	pub fn as_str(&self) -> &str {
		match self {
			Self::MarkupLabel => "markup-label(.)",
			Self::TitleContent => "title-content(.)",
			Self::CuratedText => "curated-text-in-node(.)",
			Self::IsNodeReadOnly => "is-node-read-only(.)",
			Self::Expression(expr) => expr,
		}
	}
}

impl fmt::Display for StructuralQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Read access to loaded documents.
pub trait DocumentStore: Send + Sync {
	/// Returns true when the node is loaded.
	fn contains_node(&self, node_id: &NodeId) -> bool;

	/// Returns the root element of a loaded document.
	fn document_element(&self, document_id: &DocumentId) -> Option<NodeId>;

	/// Returns the document a node lives in.
	fn document_id_of(&self, node_id: &NodeId) -> Option<DocumentId>;
}

/// Evaluates structural queries against nodes.
pub trait QueryEngine: Send + Sync {
	/// Evaluates `query` with `node` as context, expecting a string.
	fn evaluate_string(&self, query: &StructuralQuery, node: &NodeId) -> Result<String, QueryError>;

	/// Evaluates `query` with `node` as context, expecting a boolean.
	fn evaluate_boolean(&self, query: &StructuralQuery, node: &NodeId) -> Result<bool, QueryError>;
}

/// Registry entry for a permanent id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermanentIdEntry {
	/// Raw target the permanent id stands for.
	pub target: String,
	/// Metadata stored with the id.
	pub metadata: TargetMetadata,
}

/// Lookup of permanent ids.
#[async_trait]
pub trait PermanentIdRegistry: Send + Sync {
	/// Retrieves the entry for one permanent id.
	async fn retrieve_single(&self, id: &str) -> Result<PermanentIdEntry, BoxError>;
}

/// Runs named editor operations.
#[async_trait]
pub trait OperationExecutor: Send + Sync {
	/// Executes `name` with a JSON payload.
	async fn execute_operation(&self, name: &str, payload: serde_json::Value) -> Result<(), BoxError>;
}

/// Node highlighting in the editor view.
pub trait NodeHighlighter: Send + Sync {
	/// Registers the color the highlight under `name` is drawn with.
	fn style_highlight(&self, name: &str, color: &str);

	/// Sets or clears (`None`) the highlight registered under `name`.
	fn set_highlight(&self, name: &str, node_id: Option<&NodeId>);

	/// Scrolls the node into the center of its view.
	fn scroll_into_view(&self, node_id: &NodeId);
}

/// Integrator-supplied resolution of raw targets.
///
/// This is the only place that knows a target scheme. Implementations return
/// the document and optional node the raw target points at.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
	/// Resolves a raw target string.
	async fn resolve_reference(&self, target: &str) -> Result<ResolvedTarget, BoxError>;
}

/// Bundle of host collaborators.
#[derive(Clone)]
pub struct Host {
	/// Loaded documents.
	pub documents: Arc<dyn DocumentStore>,
	/// Structural query engine.
	pub queries: Arc<dyn QueryEngine>,
	/// Permanent id registry.
	pub registry: Arc<dyn PermanentIdRegistry>,
	/// Operation executor.
	pub operations: Arc<dyn OperationExecutor>,
	/// Node highlighter.
	pub highlights: Arc<dyn NodeHighlighter>,
}

impl fmt::Debug for Host {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Host").finish_non_exhaustive()
	}
}

impl Host {
	/// Evaluates a string query, treating failures as an empty result.
	pub(crate) fn query_string(&self, query: &StructuralQuery, node: &NodeId) -> Option<String> {
		match self.queries.evaluate_string(query, node) {
			Ok(value) if !value.trim().is_empty() => Some(value),
			Ok(_) => None,
			Err(error) => {
				tracing::debug!(%error, %node, "popover.query.failed");
				None
			}
		}
	}

	/// Executes an operation with a serializable payload.
	pub(crate) async fn execute<P>(&self, operation: &str, payload: &P) -> Result<(), crate::error::OperationError>
	where
		P: serde::Serialize + ?Sized,
	{
		let payload = serde_json::to_value(payload)?;
		tracing::debug!(operation, "popover.operation.execute");
		self.operations
			.execute_operation(operation, payload)
			.await
			.map_err(|source| crate::error::OperationError::Rejected {
				operation: operation.to_owned(),
				source,
			})
	}
}
