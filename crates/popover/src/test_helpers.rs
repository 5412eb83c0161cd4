//! In-memory host fakes for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use crossref_primitives::{DocumentId, NodeId, ResolvedTarget, TargetMetadata};
use tokio::sync::oneshot;

use crate::error::{BoxError, QueryError};
use crate::host::{
	DocumentStore, Host, NodeHighlighter, OperationExecutor, PermanentIdEntry, PermanentIdRegistry, QueryEngine,
	ReferenceResolver, StructuralQuery,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A node known to [`FakeEditor`].
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
	/// Document the node lives in.
	pub document_id: Option<DocumentId>,
	/// Result of the markup label query.
	pub markup_label: String,
	/// Result of the title content query.
	pub title: String,
	/// Result of the curated text query.
	pub curated_text: String,
	/// Result of the read-only query.
	pub read_only: bool,
	/// Results of expression queries, keyed by expression.
	pub expressions: HashMap<String, String>,
}

impl FakeNode {
	/// Creates a node with a markup label.
	pub fn labeled(markup_label: &str) -> Self {
		Self {
			markup_label: markup_label.to_owned(),
			..Self::default()
		}
	}

	/// Sets the title content.
	pub fn with_title(mut self, title: &str) -> Self {
		self.title = title.to_owned();
		self
	}

	/// Sets the curated text.
	pub fn with_text(mut self, text: &str) -> Self {
		self.curated_text = text.to_owned();
		self
	}

	/// Sets the value an expression evaluates to.
	pub fn with_expression(mut self, expr: &str, value: &str) -> Self {
		self.expressions.insert(expr.to_owned(), value.to_owned());
		self
	}

	/// Marks the node read-only.
	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}
}

/// Fake editor implementing every host collaborator and recording calls.
#[derive(Default)]
pub struct FakeEditor {
	nodes: Mutex<HashMap<NodeId, FakeNode>>,
	roots: Mutex<HashMap<DocumentId, NodeId>>,
	permanent_ids: Mutex<HashMap<String, PermanentIdEntry>>,
	failing_queries: Mutex<HashSet<StructuralQuery>>,
	failing_operations: Mutex<HashSet<String>>,
	queries: Mutex<Vec<(StructuralQuery, NodeId)>>,
	operations: Mutex<Vec<(String, serde_json::Value)>>,
	highlights: Mutex<Vec<(String, Option<NodeId>)>>,
	highlight_styles: Mutex<HashMap<String, String>>,
	scrolled: Mutex<Vec<NodeId>>,
	registry_lookups: Mutex<Vec<String>>,
}

impl FakeEditor {
	/// Creates an empty fake editor.
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Builds a [`Host`] backed by this fake.
	pub fn host(self: &Arc<Self>) -> Host {
		Host {
			documents: self.clone(),
			queries: self.clone(),
			registry: self.clone(),
			operations: self.clone(),
			highlights: self.clone(),
		}
	}

	/// Adds a node to a document.
	pub fn add_node(&self, document_id: &str, node_id: &str, mut node: FakeNode) {
		node.document_id = Some(DocumentId::new(document_id));
		lock(&self.nodes).insert(NodeId::new(node_id), node);
	}

	/// Adds a node and makes it the root element of its document.
	pub fn add_root(&self, document_id: &str, node_id: &str, node: FakeNode) {
		self.add_node(document_id, node_id, node);
		lock(&self.roots).insert(DocumentId::new(document_id), NodeId::new(node_id));
	}

	/// Registers a permanent id.
	pub fn add_permanent_id(&self, id: &str, target: &str, title: Option<&str>) {
		lock(&self.permanent_ids).insert(
			id.to_owned(),
			PermanentIdEntry {
				target: target.to_owned(),
				metadata: TargetMetadata {
					title: title.map(str::to_owned),
				},
			},
		);
	}

	/// Makes a query fail on every node.
	pub fn fail_query(&self, query: StructuralQuery) {
		lock(&self.failing_queries).insert(query);
	}

	/// Makes an operation reject.
	pub fn fail_operation(&self, name: &str) {
		lock(&self.failing_operations).insert(name.to_owned());
	}

	/// Queries evaluated so far.
	pub fn queries(&self) -> Vec<(StructuralQuery, NodeId)> {
		lock(&self.queries).clone()
	}

	/// Returns true when `query` was evaluated at least once.
	pub fn was_queried(&self, query: &StructuralQuery) -> bool {
		lock(&self.queries).iter().any(|(q, _)| q == query)
	}

	/// Operations executed so far, including rejected ones.
	pub fn operations(&self) -> Vec<(String, serde_json::Value)> {
		lock(&self.operations).clone()
	}

	/// Highlight changes so far.
	pub fn highlights(&self) -> Vec<(String, Option<NodeId>)> {
		lock(&self.highlights).clone()
	}

	/// Color registered for a highlight name.
	pub fn highlight_style(&self, name: &str) -> Option<String> {
		lock(&self.highlight_styles).get(name).cloned()
	}

	/// Nodes scrolled into view so far.
	pub fn scrolled(&self) -> Vec<NodeId> {
		lock(&self.scrolled).clone()
	}

	/// Permanent ids looked up so far.
	pub fn registry_lookups(&self) -> Vec<String> {
		lock(&self.registry_lookups).clone()
	}

	fn check_query(&self, query: &StructuralQuery, node: &NodeId) -> Result<FakeNode, QueryError> {
		lock(&self.queries).push((query.clone(), node.clone()));
		if lock(&self.failing_queries).contains(query) {
			return Err(QueryError {
				query: query.to_string(),
				reason: "query engine failure".into(),
			});
		}
		lock(&self.nodes).get(node).cloned().ok_or_else(|| QueryError {
			query: query.to_string(),
			reason: format!("unknown node '{node}'"),
		})
	}
}

impl DocumentStore for FakeEditor {
	fn contains_node(&self, node_id: &NodeId) -> bool {
		lock(&self.nodes).contains_key(node_id)
	}

	fn document_element(&self, document_id: &DocumentId) -> Option<NodeId> {
		lock(&self.roots).get(document_id).cloned()
	}

	fn document_id_of(&self, node_id: &NodeId) -> Option<DocumentId> {
		lock(&self.nodes).get(node_id).and_then(|node| node.document_id.clone())
	}
}

impl QueryEngine for FakeEditor {
	fn evaluate_string(&self, query: &StructuralQuery, node: &NodeId) -> Result<String, QueryError> {
		let found = self.check_query(query, node)?;
		Ok(match query {
			StructuralQuery::MarkupLabel => found.markup_label,
			StructuralQuery::TitleContent => found.title,
			StructuralQuery::CuratedText => found.curated_text,
			StructuralQuery::IsNodeReadOnly => found.read_only.to_string(),
			StructuralQuery::Expression(expr) => found.expressions.get(expr).cloned().unwrap_or_default(),
		})
	}

	fn evaluate_boolean(&self, query: &StructuralQuery, node: &NodeId) -> Result<bool, QueryError> {
		let found = self.check_query(query, node)?;
		Ok(match query {
			StructuralQuery::IsNodeReadOnly => found.read_only,
			other => !self.evaluate_string(other, node)?.is_empty(),
		})
	}
}

#[async_trait]
impl PermanentIdRegistry for FakeEditor {
	async fn retrieve_single(&self, id: &str) -> Result<PermanentIdEntry, BoxError> {
		lock(&self.registry_lookups).push(id.to_owned());
		lock(&self.permanent_ids)
			.get(id)
			.cloned()
			.ok_or_else(|| format!("unknown permanent id '{id}'").into())
	}
}

#[async_trait]
impl OperationExecutor for FakeEditor {
	async fn execute_operation(&self, name: &str, payload: serde_json::Value) -> Result<(), BoxError> {
		lock(&self.operations).push((name.to_owned(), payload));
		if lock(&self.failing_operations).contains(name) {
			return Err(format!("operation '{name}' rejected").into());
		}
		Ok(())
	}
}

impl NodeHighlighter for FakeEditor {
	fn style_highlight(&self, name: &str, color: &str) {
		lock(&self.highlight_styles).insert(name.to_owned(), color.to_owned());
	}

	fn set_highlight(&self, name: &str, node_id: Option<&NodeId>) {
		lock(&self.highlights).push((name.to_owned(), node_id.cloned()));
	}

	fn scroll_into_view(&self, node_id: &NodeId) {
		lock(&self.scrolled).push(node_id.clone());
	}
}

/// Resolution callback whose answers are scripted per target.
///
/// Targets registered with [`FakeResolver::resolve_to`] answer immediately;
/// targets registered with [`FakeResolver::gate`] wait until the returned
/// sender fires. Anything else is rejected.
#[derive(Default)]
pub struct FakeResolver {
	answers: Mutex<HashMap<String, ResolvedTarget>>,
	gates: Mutex<HashMap<String, oneshot::Receiver<Result<ResolvedTarget, String>>>>,
	calls: Mutex<Vec<String>>,
}

impl FakeResolver {
	/// Creates a resolver with no scripted targets.
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Resolves `target` immediately.
	pub fn resolve_to(&self, target: &str, document_id: &str, node_id: Option<&str>) {
		lock(&self.answers).insert(
			target.to_owned(),
			ResolvedTarget::new(DocumentId::new(document_id), node_id.map(NodeId::new)),
		);
	}

	/// Holds `target` until the returned sender delivers an answer.
	pub fn gate(&self, target: &str) -> oneshot::Sender<Result<ResolvedTarget, String>> {
		let (tx, rx) = oneshot::channel();
		lock(&self.gates).insert(target.to_owned(), rx);
		tx
	}

	/// Targets the callback was invoked with.
	pub fn calls(&self) -> Vec<String> {
		lock(&self.calls).clone()
	}
}

#[async_trait]
impl ReferenceResolver for FakeResolver {
	async fn resolve_reference(&self, target: &str) -> Result<ResolvedTarget, BoxError> {
		lock(&self.calls).push(target.to_owned());
		let gate = lock(&self.gates).remove(target);
		if let Some(gate) = gate {
			return match gate.await {
				Ok(answer) => answer.map_err(BoxError::from),
				Err(_) => Err("gate dropped".into()),
			};
		}
		let answer = lock(&self.answers).get(target).cloned();
		answer.ok_or_else(|| format!("unknown target '{target}'").into())
	}
}
