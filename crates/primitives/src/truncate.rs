/// Character appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Truncates `text` to at most `max_len` characters.
///
/// Text that fits is returned unchanged. Longer text keeps its first
/// `max_len - 1` characters followed by [`ELLIPSIS`]. Lengths count Unicode
/// scalar values and cutting happens mid-word: word-boundary truncation is not
/// used for previews.
///
/// A `max_len` of zero yields an empty string.
pub fn truncate(text: &str, max_len: usize) -> String {
	if max_len == 0 {
		return String::new();
	}

	match text.char_indices().nth(max_len) {
		None => text.to_owned(),
		Some(_) => {
			let keep = max_len - 1;
			let cut = text.char_indices().nth(keep).map_or(text.len(), |(idx, _)| idx);
			let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
			out.push_str(&text[..cut]);
			out.push(ELLIPSIS);
			out
		}
	}
}

#[cfg(test)]
mod tests;
