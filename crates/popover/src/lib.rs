//! Cross reference popovers for structured documents.
//!
//! A reference element points at a target through an opaque string: an href,
//! a permanent id, or whatever its target query yields. This crate turns that
//! string into a concrete document/node location, derives the labels and
//! preview text a popover shows for it, and gates the preview, edit and delete
//! actions on the reference.
//!
//! - [`resolver`]: permanent id indirection and the integrator's resolution callback.
//! - [`labels`]: markup labels and the title text fallback chain.
//! - [`popover`]: the generation-checked resolution state machine.
//! - [`actions`]: action availability and operation payloads.
//! - [`preview`]: the document preview modal opened by the preview action.
//!
//! Everything the editor owns (documents, queries, operations, highlighting) is
//! reached through the collaborator traits in [`host`].

pub mod actions;
pub mod config;
pub mod error;
pub mod host;
pub mod labels;
pub mod messages;
pub mod popover;
pub mod preview;
pub mod resolver;

/// In-memory host fakes for tests.
#[doc(hidden)]
pub mod test_helpers;

pub use actions::{ActionAvailability, ReferenceActionGate, ReferenceOperationData};
pub use config::{PopoverConfig, PopoverData};
pub use error::{BoxError, ConfigError, OperationError, QueryError, ResolutionError};
pub use host::{
	DocumentStore, Host, NodeHighlighter, OperationExecutor, PermanentIdEntry, PermanentIdRegistry, QueryEngine,
	ReferenceResolver, StructuralQuery,
};
pub use labels::{DerivedLabels, LabelDeriver, PreviewVerb, ReferenceContext};
pub use popover::{PopoverBody, ReferencePopover, ResolutionEvent, ResolutionState};
pub use preview::{DocumentPreviewModal, EditReferenceOutcome, ModalKey, PreviewModalData};
pub use resolver::{HrefResolver, Resolution, TargetResolver, query_raw_target};
