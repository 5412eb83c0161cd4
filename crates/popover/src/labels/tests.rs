use std::cell::Cell;

use crossref_primitives::{ELLIPSIS, TargetMetadata};
use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{FakeEditor, FakeNode};

fn reference() -> ReferenceContext {
	ReferenceContext {
		context_node_id: Some(NodeId::new("xref")),
		reference_markup_label: None,
	}
}

fn editor_with_reference() -> std::sync::Arc<FakeEditor> {
	let editor = FakeEditor::new();
	editor.add_node("doc1", "xref", FakeNode::labeled("cross link"));
	editor
}

fn node_target(document: &str, node: &str) -> ResolvedTarget {
	ResolvedTarget::new(document.into(), Some(node.into()))
}

#[test]
fn first_text_stops_at_first_hit() {
	let evaluated = Cell::new(0);
	let text = first_text([
		Box::new(|| {
			evaluated.set(evaluated.get() + 1);
			None
		}) as TextSource<'_>,
		Box::new(|| {
			evaluated.set(evaluated.get() + 1);
			None
		}),
		Box::new(|| {
			evaluated.set(evaluated.get() + 1);
			Some("found".to_owned())
		}),
		Box::new(|| {
			evaluated.set(evaluated.get() + 1);
			Some("never".to_owned())
		}),
	]);
	assert_eq!(text.as_deref(), Some("found"));
	assert_eq!(evaluated.get(), 3);
}

#[test]
fn node_without_text_offers_preview() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "fig1", FakeNode::labeled("figure"));
	let host = editor.host();

	let labels = LabelDeriver::new(&host, 140).derive(&node_target("doc7", "fig1"), &reference());

	assert_eq!(labels.preview_verb, PreviewVerb::ShowPreview);
	assert_eq!(labels.preview_verb.label(), "Show preview");
	assert_eq!(
		labels.text_representation,
		"This figure does not contain any textual content."
	);
	assert_eq!(labels.heading(), "Cross link to the figure:");
}

#[test]
fn long_metadata_title_is_truncated_and_quoted() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "sec1", FakeNode::labeled("section"));
	let host = editor.host();
	let title = "A very long string of 200 characters".chars().cycle().take(200).collect::<String>();
	let target = node_target("doc7", "sec1").with_metadata(Some(TargetMetadata {
		title: Some(title.clone()),
	}));

	let labels = LabelDeriver::new(&host, 140).derive(&target, &reference());

	let expected = format!("“{}{ELLIPSIS}”", title.chars().take(139).collect::<String>());
	assert_eq!(labels.text_representation, expected);
	assert_eq!(labels.preview_verb, PreviewVerb::ShowMore);
	assert_eq!(labels.preview_verb.label(), "Show more");
}

#[test]
fn metadata_title_skips_structural_queries() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "sec1", FakeNode::labeled("section").with_title("Ignored"));
	let host = editor.host();
	let target = node_target("doc7", "sec1").with_metadata(Some(TargetMetadata { title: Some("X".into()) }));

	let labels = LabelDeriver::new(&host, 140).derive(&target, &reference());

	assert!(labels.text_representation.contains('X'));
	assert!(!editor.was_queried(&StructuralQuery::TitleContent));
	assert!(!editor.was_queried(&StructuralQuery::CuratedText));
}

#[test]
fn blank_metadata_title_still_skips_structural_queries() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "sec1", FakeNode::labeled("section").with_title("Real title"));
	let host = editor.host();
	let target = node_target("doc7", "sec1").with_metadata(Some(TargetMetadata { title: Some("  ".into()) }));

	let labels = LabelDeriver::new(&host, 140).derive(&target, &reference());

	assert_eq!(labels.text_representation, "“  ”");
	assert_eq!(labels.preview_verb, PreviewVerb::ShowMore);
	assert!(!editor.was_queried(&StructuralQuery::TitleContent));
	assert!(!editor.was_queried(&StructuralQuery::CuratedText));
}

#[test]
fn blank_title_content_falls_through_to_curated_text() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "sec1", FakeNode::labeled("section").with_title("   ").with_text("Body"));
	let host = editor.host();

	let labels = LabelDeriver::new(&host, 140).derive(&node_target("doc7", "sec1"), &reference());

	assert_eq!(labels.text_representation, "“Body”");
	assert!(editor.was_queried(&StructuralQuery::CuratedText));
}

#[test]
fn title_content_skips_curated_text() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "sec1", FakeNode::labeled("section").with_title("Results").with_text("Body"));
	let host = editor.host();

	let labels = LabelDeriver::new(&host, 140).derive(&node_target("doc7", "sec1"), &reference());

	assert_eq!(labels.text_representation, "“Results”");
	assert!(!editor.was_queried(&StructuralQuery::CuratedText));
}

#[test]
fn curated_text_is_the_last_resort() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "p1", FakeNode::labeled("paragraph").with_text("Some body text"));
	let host = editor.host();

	let labels = LabelDeriver::new(&host, 140).derive(&node_target("doc7", "p1"), &reference());

	assert_eq!(labels.text_representation, "“Some body text”");
	assert_eq!(labels.preview_verb, PreviewVerb::ShowMore);
}

#[test]
fn failing_queries_degrade_to_no_content_message() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "fig1", FakeNode::labeled("figure").with_title("Hidden"));
	editor.fail_query(StructuralQuery::TitleContent);
	editor.fail_query(StructuralQuery::CuratedText);
	let host = editor.host();

	let labels = LabelDeriver::new(&host, 140).derive(&node_target("doc7", "fig1"), &reference());

	assert_eq!(labels.preview_verb, PreviewVerb::ShowPreview);
	assert_eq!(
		labels.text_representation,
		"This figure does not contain any textual content."
	);
}

#[test]
fn override_label_replaces_reference_markup_label() {
	let editor = editor_with_reference();
	editor.add_node("doc7", "fig1", FakeNode::labeled("figure"));
	let host = editor.host();
	let reference = ReferenceContext {
		reference_markup_label: Some("see also".into()),
		..reference()
	};

	let labels = LabelDeriver::new(&host, 140).derive(&node_target("doc7", "fig1"), &reference);

	assert_eq!(labels.reference_markup_label, "see also");
	assert_eq!(labels.heading(), "See also to the figure:");
	assert!(!editor.queries().iter().any(|(_, node)| node.as_str() == "xref"));
}

#[test]
fn document_target_uses_root_element() {
	let editor = editor_with_reference();
	editor.add_root("doc7", "root", FakeNode::labeled("topic").with_title("Installing"));
	let host = editor.host();
	let target = ResolvedTarget::new("doc7".into(), None);

	let deriver = LabelDeriver::new(&host, 140);
	assert_eq!(deriver.target_node(&target), Some(NodeId::new("root")));
	let labels = deriver.derive(&target, &reference());
	assert_eq!(labels.target_markup_label, "topic");
	assert_eq!(labels.text_representation, "“Installing”");
}

#[test]
fn unknown_target_node_degrades() {
	let editor = editor_with_reference();
	let host = editor.host();

	let labels = LabelDeriver::new(&host, 140).derive(&node_target("doc7", "gone"), &reference());

	assert_eq!(labels.target_markup_label, "");
	assert_eq!(labels.preview_verb, PreviewVerb::ShowPreview);
}
