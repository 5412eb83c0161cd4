//! Core types for cross references: document/node identifiers, unresolved and
//! resolved reference targets, and text truncation for popover previews.

/// Identifier types for documents and nodes.
pub mod ids;
/// Reference target types, before and after resolution.
pub mod target;
/// Character-count text truncation.
pub mod truncate;

pub use ids::{DocumentId, NodeId};
pub use target::{ReferenceTarget, ResolvedTarget, TargetMetadata};
pub use truncate::{ELLIPSIS, truncate};
