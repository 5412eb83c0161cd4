use proptest::prelude::*;

use super::*;

#[test]
fn short_text_is_unchanged() {
	assert_eq!(truncate("figure", 140), "figure");
	assert_eq!(truncate("", 3), "");
	assert_eq!(truncate("abc", 3), "abc");
}

#[test]
fn long_text_keeps_prefix_and_ellipsis() {
	assert_eq!(truncate("abcdef", 4), "abc…");
	assert_eq!(truncate("ab", 1), "…");
}

#[test]
fn cuts_mid_word() {
	assert_eq!(truncate("hello wonderful world", 9), "hello wo…");
}

#[test]
fn counts_characters_not_bytes() {
	assert_eq!(truncate("ééééé", 5), "ééééé");
	assert_eq!(truncate("éééééé", 5), "éééé…");
}

#[test]
fn zero_length_yields_empty() {
	assert_eq!(truncate("abc", 0), "");
}

#[test]
fn two_hundred_chars_at_preview_length() {
	let title = "x".repeat(200);
	let out = truncate(&title, 140);
	assert_eq!(out.chars().count(), 140);
	assert!(out.starts_with(&"x".repeat(139)));
	assert!(out.ends_with(ELLIPSIS));
}

proptest! {
	#[test]
	fn truncation_is_idempotent(text in ".{0,80}", max_len in 1usize..40) {
		let once = truncate(&text, max_len);
		prop_assert_eq!(truncate(&once, max_len), once);
	}

	#[test]
	fn truncation_respects_length_bound(text in ".{0,80}", max_len in 1usize..40) {
		let len = text.chars().count();
		let out = truncate(&text, max_len);
		prop_assert!(out.chars().count() <= max_len);
		if len <= max_len {
			prop_assert_eq!(out, text);
		}
	}
}
