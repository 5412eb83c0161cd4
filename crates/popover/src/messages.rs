//! User-facing strings.

/// Link label when a text representation was found.
pub const SHOW_MORE: &str = "Show more";
/// Link label when the target has no textual content.
pub const SHOW_PREVIEW: &str = "Show preview";
/// Warning shown in place of the popover body when resolution fails.
pub const UNABLE_TO_RETRIEVE: &str = "Unable to retrieve this reference.";
/// Default title of the document preview modal.
pub const PREVIEW_LINK_TITLE: &str = "Preview link";
/// Label of the edit affordance inside the preview modal.
pub const EDIT_REFERENCE: &str = "Edit reference";
/// Label of the preview modal's close button.
pub const CLOSE: &str = "Close";

/// Wraps a text representation in quotation marks.
pub fn quoted(text: &str) -> String {
	format!("“{text}”")
}

/// Message for a target without any textual content.
pub fn no_textual_content(markup_label: &str) -> String {
	format!("This {markup_label} does not contain any textual content.")
}

/// Popover heading, e.g. "Cross link to the figure:".
pub fn heading(reference_label: &str, target_label: &str) -> String {
	format!("{} to the {target_label}:", upper_case_first_letter(reference_label))
}

fn upper_case_first_letter(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
