/// Find every occurrence of `needle` in `haystack` as a whole word: not
/// immediately preceded or followed by an alphanumeric character. Used to
/// pull enum/literal variants out of free-form prose without matching a
/// variant name that's merely a substring of some larger word.
#[must_use]
pub fn find_all_whole_words(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = haystack.chars().collect();
    let needle_chars: Vec<char> = needle.chars().collect();
    let mut out = Vec::new();
    if needle_chars.len() > chars.len() {
        return out;
    }
    for start in 0..=(chars.len() - needle_chars.len()) {
        if chars[start..start + needle_chars.len()] != needle_chars[..] {
            continue;
        }
        let before_ok = start
            .checked_sub(1)
            .and_then(|i| chars.get(i))
            .is_none_or(|c| !c.is_alphanumeric() && *c != '_');
        let after_idx = start + needle_chars.len();
        let after_ok = chars
            .get(after_idx)
            .is_none_or(|c| !c.is_alphanumeric() && *c != '_');
        if before_ok && after_ok {
            out.push(start);
        }
    }
    out
}

/// Whether `needle` appears anywhere in `haystack` as a whole word
/// (case-insensitive).
#[must_use]
pub fn contains_whole_word_ci(haystack: &str, needle: &str) -> bool {
    !find_all_whole_words(&haystack.to_lowercase(), &needle.to_lowercase()).is_empty()
}

/// Strip markdown emphasis markers (`**bold**`, `*italic*`, `` `code` ``)
/// from the edges of a token, so a variant written as `**Active**` in a
/// model's prose still matches the bare literal `Active`.
#[must_use]
pub fn strip_markdown_emphasis(s: &str) -> &str {
    let mut out = s.trim();
    loop {
        let stripped = out
            .strip_prefix("**")
            .or_else(|| out.strip_prefix('*'))
            .or_else(|| out.strip_prefix('`'))
            .unwrap_or(out);
        let stripped = stripped
            .strip_suffix("**")
            .or_else(|| stripped.strip_suffix('*'))
            .or_else(|| stripped.strip_suffix('`'))
            .unwrap_or(stripped);
        if stripped == out {
            break;
        }
        out = stripped;
    }
    out.trim()
}
