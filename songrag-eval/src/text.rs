//! Text normalization and matching shared by the evaluation stages.

/// Lowercase `text` and fold typographic apostrophes to `'`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Whether `needle` occurs in `haystack` on word boundaries.
///
/// Both arguments are expected to be [`normalize`]d already. An occurrence
/// only counts when the characters around it are not alphanumeric, so
/// `"pop"` does not match inside `"popular"`. An empty needle never matches.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Alphanumeric tokens of already-normalized `text`, in order.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty())
}
