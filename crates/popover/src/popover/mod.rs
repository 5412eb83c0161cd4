//! Reference popover session.
//!
//! A [`ReferencePopover`] drives one open popover: it resolves the reference
//! target in the background, derives labels once resolved, and runs the gated
//! reference actions.
//!
//! Every resolution attempt is tagged with a generation. Completions arrive as
//! [`ResolutionEvent`]s and are committed only when their generation is still
//! current and the popover has not been closed; anything else is dropped.
//! Requests are cancellable: starting a new attempt or closing the popover
//! cancels the one in flight.

use std::sync::Arc;

use crossref_primitives::{NodeId, ResolvedTarget};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::actions::{ActionAvailability, ReferenceActionGate};
use crate::config::{PopoverConfig, PopoverData};
use crate::error::ResolutionError;
use crate::host::{Host, ReferenceResolver};
use crate::labels::{DerivedLabels, LabelDeriver, ReferenceContext};
use crate::messages;
use crate::resolver::{Resolution, TargetResolver, query_raw_target};

/// Resolution lifecycle of a popover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResolutionState {
	/// No target yet, or a request is in flight.
	#[default]
	Loading,
	/// The target resolved.
	Resolved(ResolvedTarget),
	/// Resolution failed; reopening the popover retries.
	Error,
}

/// Completion of one resolution attempt.
#[derive(Debug)]
pub struct ResolutionEvent {
	/// Generation the attempt was started under.
	pub generation: u64,
	/// Attempt outcome.
	pub outcome: Result<Resolution, ResolutionError>,
}

/// Popover body view-model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopoverBody {
	/// Resolution in progress.
	Loading,
	/// Resolution failed.
	Unavailable {
		/// Warning line.
		message: &'static str,
	},
	/// Resolved reference description.
	Reference {
		/// E.g. "Cross link to the figure:".
		heading: String,
		/// Quoted preview text or the no-content message.
		text: String,
		/// Label of the preview link.
		preview_label: &'static str,
	},
}

/// State machine and actions for one open reference popover.
///
/// Resolution tasks are spawned on the ambient tokio runtime.
pub struct ReferencePopover {
	host: Host,
	config: Arc<PopoverConfig>,
	data: PopoverData,
	resolver: TargetResolver,
	gate: ReferenceActionGate,
	state: ResolutionState,
	labels: Option<DerivedLabels>,
	generation: u64,
	in_flight: Option<CancellationToken>,
	closed: bool,
	events_tx: mpsc::UnboundedSender<ResolutionEvent>,
	events_rx: mpsc::UnboundedReceiver<ResolutionEvent>,
}

impl ReferencePopover {
	/// Creates a popover for one reference. Nothing is resolved until
	/// [`Self::open`] or [`Self::on_target_changed`] is called.
	pub fn new(host: Host, config: Arc<PopoverConfig>, data: PopoverData, resolver: Arc<dyn ReferenceResolver>) -> Self {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		let gate = ReferenceActionGate::new(&data, &config.default_delete_operation);
		Self {
			resolver: TargetResolver::new(host.registry.clone(), resolver),
			host,
			config,
			data,
			gate,
			state: ResolutionState::Loading,
			labels: None,
			generation: 0,
			in_flight: None,
			closed: false,
			events_tx,
			events_rx,
		}
	}

	/// Evaluates the target query against the reference node and starts
	/// resolving the result. Call again when the reference's target changed.
	pub fn open(&mut self) -> u64 {
		let raw = query_raw_target(
			self.host.queries.as_ref(),
			&self.data.target_query,
			self.data.context_node_id.as_ref(),
		);
		self.on_target_changed(raw)
	}

	/// Starts a new resolution attempt for `raw` and returns its generation.
	///
	/// The previous attempt is cancelled and the state resets to
	/// [`ResolutionState::Loading`]. An absent or empty target stays loading.
	pub fn on_target_changed(&mut self, raw: Option<String>) -> u64 {
		if self.closed {
			tracing::trace!(generation = self.generation, "popover.retarget.after_close");
			return self.generation;
		}

		self.cancel_in_flight();
		self.generation = self.generation.wrapping_add(1);
		let generation = self.generation;
		self.state = ResolutionState::Loading;
		self.labels = None;

		let target = self.data.reference_target(raw.unwrap_or_default());
		if target.is_empty() {
			tracing::debug!(generation, "popover.resolve.no_target");
			return generation;
		}

		tracing::debug!(generation, target = %target.raw, permanent = target.is_permanent_id, "popover.resolve.start");
		let cancel = CancellationToken::new();
		self.in_flight = Some(cancel.clone());

		let resolver = self.resolver.clone();
		let events_tx = self.events_tx.clone();
		tokio::spawn(async move {
			let outcome = tokio::select! {
				_ = cancel.cancelled() => return,
				outcome = resolver.resolve(&target) => outcome,
			};

			if cancel.is_cancelled() {
				return;
			}

			let _ = events_tx.send(ResolutionEvent { generation, outcome });
		});

		generation
	}

	/// Applies every completion that already arrived. Returns how many were
	/// committed.
	pub fn drain_events(&mut self) -> usize {
		let mut committed = 0;
		while let Ok(event) = self.events_rx.try_recv() {
			if self.handle_event(event) {
				committed += 1;
			}
		}
		committed
	}

	/// Waits for the next completion and applies it. Returns whether it was
	/// committed; returns `false` immediately when nothing is in flight.
	pub async fn next_event(&mut self) -> bool {
		if self.in_flight.is_none() && self.events_rx.is_empty() {
			return false;
		}
		match self.events_rx.recv().await {
			Some(event) => self.handle_event(event),
			None => false,
		}
	}

	/// Commits `event` if it belongs to the current generation of an open
	/// popover. Returns whether the state changed.
	pub fn handle_event(&mut self, event: ResolutionEvent) -> bool {
		let ResolutionEvent { generation, outcome } = event;
		if self.closed {
			tracing::trace!(generation, "popover.resolve.discard_closed");
			return false;
		}
		if generation != self.generation {
			tracing::trace!(generation, current = self.generation, "popover.resolve.discard_stale");
			return false;
		}

		self.in_flight = None;
		self.labels = None;
		self.state = match outcome {
			Ok(Resolution::Resolved(target)) => {
				tracing::debug!(generation, document = %target.document_id, node = ?target.node_id, "popover.resolve.done");
				ResolutionState::Resolved(target)
			}
			Ok(Resolution::Pending) => ResolutionState::Loading,
			Err(error) => {
				tracing::warn!(generation, %error, "{}", messages::UNABLE_TO_RETRIEVE);
				ResolutionState::Error
			}
		};
		true
	}

	/// Current resolution state.
	pub fn state(&self) -> &ResolutionState {
		&self.state
	}

	/// Generation of the latest attempt.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true once the popover was closed.
	pub fn is_closed(&self) -> bool {
		self.closed
	}

	/// The resolved target, if any.
	pub fn target(&self) -> Option<&ResolvedTarget> {
		match &self.state {
			ResolutionState::Resolved(target) => Some(target),
			_ => None,
		}
	}

	/// Labels for the resolved target, derived on first use.
	pub fn labels(&mut self) -> Option<&DerivedLabels> {
		if self.labels.is_none() {
			let ResolutionState::Resolved(target) = &self.state else {
				return None;
			};
			let reference = ReferenceContext {
				context_node_id: self.data.context_node_id.clone(),
				reference_markup_label: self.data.reference_markup_label.clone(),
			};
			let labels = LabelDeriver::new(&self.host, self.config.truncate_length).derive(target, &reference);
			self.labels = Some(labels);
		}
		self.labels.as_ref()
	}

	/// Body view-model for the current state.
	pub fn body(&mut self) -> PopoverBody {
		match self.state {
			ResolutionState::Loading => PopoverBody::Loading,
			ResolutionState::Error => PopoverBody::Unavailable {
				message: messages::UNABLE_TO_RETRIEVE,
			},
			ResolutionState::Resolved(_) => match self.labels() {
				Some(labels) => PopoverBody::Reference {
					heading: labels.heading(),
					text: labels.text_representation.clone(),
					preview_label: labels.preview_verb.label(),
				},
				None => PopoverBody::Loading,
			},
		}
	}

	/// Actions currently offered.
	pub fn availability(&self) -> ActionAvailability {
		if self.closed {
			return ActionAvailability::default();
		}
		self.gate.availability(self.target().is_some())
	}

	/// Opens the document preview for the resolved target. Rejections are
	/// ignored. Returns whether the operation ran.
	pub async fn open_preview(&self) -> bool {
		if !self.availability().can_preview {
			return false;
		}
		let Some(target) = self.target() else {
			return false;
		};
		let payload = self.gate.preview_payload(target);
		match self.host.execute(&self.config.preview_operation, &payload).await {
			Ok(()) => true,
			Err(error) => {
				tracing::debug!(%error, "popover.preview.rejected");
				false
			}
		}
	}

	/// Runs the edit operation for the reference.
	///
	/// When the edit operation is rejected the preview is opened instead, with
	/// the edit affordance embedded. Returns whether the edit operation ran.
	pub async fn edit(&self) -> bool {
		let (Some(operation), Some(payload)) = (self.gate.edit_operation(), self.gate.reference_payload()) else {
			return false;
		};
		if self.closed {
			return false;
		}
		let Err(error) = self.host.execute(operation, &payload).await else {
			return true;
		};
		tracing::info!(%error, "popover.edit.rejected");
		self.open_preview().await;
		false
	}

	/// Runs the delete operation for the reference. Rejections are ignored.
	/// Returns whether the operation ran.
	pub async fn delete(&self) -> bool {
		let (Some(operation), Some(payload)) = (self.gate.delete_operation(), self.gate.reference_payload()) else {
			return false;
		};
		if self.closed {
			return false;
		}
		match self.host.execute(operation, &payload).await {
			Ok(()) => true,
			Err(error) => {
				tracing::debug!(%error, "popover.delete.rejected");
				false
			}
		}
	}

	/// Reference node this popover was opened for.
	pub fn context_node_id(&self) -> Option<&NodeId> {
		self.data.context_node_id.as_ref()
	}

	/// Tears the popover down. In-flight work is cancelled and late
	/// completions are dropped.
	pub fn close(&mut self) {
		if self.closed {
			return;
		}
		self.closed = true;
		self.cancel_in_flight();
		tracing::debug!(generation = self.generation, "popover.close");
	}

	fn cancel_in_flight(&mut self) {
		if let Some(cancel) = self.in_flight.take() {
			cancel.cancel();
		}
	}
}

impl Drop for ReferencePopover {
	fn drop(&mut self) {
		self.cancel_in_flight();
	}
}
