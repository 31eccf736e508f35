//! Candidate extraction from free-form text.
//!
//! When the whole input isn't a clean bracket expression on its own (the
//! common case for LLM chat completions, which wrap results in prose or
//! fenced code blocks), these functions pull out the substrings that look
//! like they might be JSON and resolve each one independently through the
//! same std-JSON -> fixing-layer -> state-machine ladder. The caller
//! (`jsonish-core`'s dispatcher) decides how to rank and combine whatever
//! comes back.

use jsonish_value::Value;

/// Try every extraction strategy and return every candidate found, in the
/// order strategies run (markdown blocks first, then balanced-bracket scans
/// in document order).
#[must_use]
pub fn extract(text: &str) -> Vec<Value> {
    let mut candidates = extract_markdown_blocks(text);
    candidates.extend(extract_patterns(text));
    candidates
}

/// All top-level balanced `{...}` object spans, in document order,
/// ignoring any interleaved arrays. Used by the coercer when the target
/// schema is an array and more than one object span is present, so the
/// objects can be collected into one array rather than picked between.
#[must_use]
pub fn multi_object_candidates(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' {
            if let Some(end) = matching_close(&chars, i, '{', '}') {
                out.push(resolve_candidate(&chars[i..=end].iter().collect::<String>()));
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Resolve one candidate substring the way the dispatcher expects every
/// extracted span to be resolved: a clean standard-JSON parse first, then
/// the textual fixing layer re-tried through standard JSON, then the
/// tolerant state machine as the step that never fails.
fn resolve_candidate(text: &str) -> Value {
    if let Some(value) = try_standard_json(text) {
        tracing::debug!(target: "jsonish::extract", len = text.len(), "candidate parsed as standard json");
        return value;
    }
    let (fixed, fixes) = jsonish_fix::fix(text);
    if let Some(value) = try_standard_json(&fixed) {
        tracing::debug!(target: "jsonish::extract", len = text.len(), "candidate parsed after textual fixing");
        return if fixes.is_empty() {
            value
        } else {
            Value::FixedJson(Box::new(value), fixes)
        };
    }
    tracing::debug!(target: "jsonish::extract", len = text.len(), "candidate fell back to state-machine parser");
    jsonish_parser::parse(text)
}

fn try_standard_json(text: &str) -> Option<Value> {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .map(Value::from_json)
}

/// Fenced code blocks (`` ``` `` optionally tagged `json`/`javascript`/...):
/// the content is parsed as standard JSON first, falling back to the
/// tolerant state machine, and wrapped in [`Value::Markdown`] either way.
fn extract_markdown_blocks(text: &str) -> Vec<Value> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(rel_start) = text[pos..].find("```") {
        let fence_start = pos + rel_start;
        let after_open = fence_start + 3;
        let remainder = &text[after_open..];
        let line_end = remainder.find('\n').unwrap_or(remainder.len());
        let lang = remainder[..line_end].trim().to_string();
        let content_start = after_open + line_end + usize::from(line_end < remainder.len());
        if content_start > text.len() {
            break;
        }
        let tail = &text[content_start..];
        match tail.find("```") {
            Some(rel_close) => {
                out.push(markdown_value(&lang, &tail[..rel_close]));
                pos = content_start + rel_close + 3;
            }
            None => {
                out.push(markdown_value(&lang, tail));
                pos = text.len();
            }
        }
    }
    out
}

fn markdown_value(lang: &str, content: &str) -> Value {
    let trimmed = content.trim();
    let inner = try_standard_json(trimmed).unwrap_or_else(|| jsonish_parser::parse(trimmed));
    let completion = inner.completion();
    tracing::debug!(target: "jsonish::extract", lang, "extracted fenced code block");
    Value::Markdown(lang.to_string(), Box::new(inner), completion)
}

/// Balanced-bracket scan for `{...}` and `[...]` spans in document order,
/// each resolved independently. An opener with no matching closer at
/// end-of-input is treated as a truncated tail: the remainder of the text
/// becomes one candidate, repaired by the fixing layer and state machine.
fn extract_patterns(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (open, close) = match chars[i] {
            '{' => ('{', '}'),
            '[' => ('[', ']'),
            _ => {
                i += 1;
                continue;
            }
        };
        match matching_close(&chars, i, open, close) {
            Some(end) => {
                out.push(resolve_candidate(&chars[i..=end].iter().collect::<String>()));
                i = end + 1;
            }
            None => {
                tracing::debug!(target: "jsonish::extract", "treating unmatched bracket as truncated tail");
                out.push(resolve_candidate(&chars[i..].iter().collect::<String>()));
                i = chars.len();
            }
        }
    }
    out
}

/// Index of the bracket matching the opener at `open_idx`, skipping quoted
/// regions and nested brackets of the same kind.
fn matching_close(chars: &[char], open_idx: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escape = false;
    let mut i = open_idx;
    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == q {
                quote = None;
            }
        } else if c == '"' || c == '\'' {
            quote = Some(c);
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonish_value::Completion;

    #[test]
    fn extracts_json_from_markdown_fence() {
        let text = "here you go:\n```json\n{\"a\": 1}\n```\nhope that helps";
        let candidates = extract_markdown_blocks(text);
        assert_eq!(candidates.len(), 1);
        match &candidates[0] {
            Value::Markdown(lang, inner, _) => {
                assert_eq!(lang, "json");
                assert_eq!(inner.to_json(), serde_json::json!({"a": 1.0}));
            }
            other => panic!("expected markdown, got {other:?}"),
        }
    }

    #[test]
    fn extracts_balanced_object_embedded_in_prose() {
        let text = "sure, the result is {\"a\": 1, \"b\": [1, 2]} as requested";
        let candidates = extract_patterns(text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].to_json(),
            serde_json::json!({"a": 1.0, "b": [1.0, 2.0]})
        );
    }

    #[test]
    fn extracts_multiple_top_level_spans_in_order() {
        let text = "[1, 2] and then {\"a\": 1}";
        let candidates = extract_patterns(text);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].to_json(), serde_json::json!([1.0, 2.0]));
        assert_eq!(candidates[1].to_json(), serde_json::json!({"a": 1.0}));
    }

    #[test]
    fn unmatched_opening_brace_becomes_incomplete_tail_candidate() {
        let text = r#"{"a": 1, "b": 2"#;
        let candidates = extract_patterns(text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].completion(), Completion::Incomplete);
        assert_eq!(
            candidates[0].to_json(),
            serde_json::json!({"a": 1.0, "b": 2.0})
        );
    }

    #[test]
    fn multi_object_candidates_collects_every_object_span() {
        let text = "{\"a\": 1} some text {\"b\": 2}";
        let candidates = multi_object_candidates(text);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn nested_braces_do_not_produce_extra_top_level_spans() {
        let text = r#"{"a": {"nested": true}}"#;
        let candidates = extract_patterns(text);
        assert_eq!(candidates.len(), 1);
    }
}
