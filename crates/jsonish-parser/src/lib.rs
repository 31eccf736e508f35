//! Hand-written recursive-descent tolerant parser.
//!
//! Turns arbitrary, possibly-malformed bracket-ish text into a
//! [`jsonish_value::Value`], repairing the common ways LLM output deviates
//! from strict JSON (unquoted keys, missing/extra commas, unterminated
//! strings, a stray `null{` glued onto the next token) instead of failing.
//! Every repair is recorded both as a fix descriptor folded into the
//! returned [`Value::FixedJson`] and as a `tracing::debug!` event on the
//! `jsonish::parser` target.

mod context;
mod scanner;

pub use context::Context;

use jsonish_value::{Completion, Object, Value};
use scanner::Scanner;

/// Parse `input` leniently into a [`Value`].
///
/// Never fails: inputs that run out before a construct closes come back as
/// [`Completion::Incomplete`] subtrees rather than an error, and any
/// textual repair applied along the way wraps the result in
/// [`Value::FixedJson`] with a human-readable note per repair.
#[must_use]
pub fn parse(input: &str) -> Value {
    let mut parser = Parser::new(input);
    parser.scanner.skip_whitespace();
    let value = parser.parse_value(Context::Nothing);
    if parser.fixes.is_empty() {
        value
    } else {
        Value::FixedJson(Box::new(value), parser.fixes)
    }
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    fixes: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(input),
            fixes: Vec::new(),
        }
    }

    fn note(&mut self, offset: usize, text: &str) {
        tracing::debug!(target: "jsonish::parser", offset, fix = text, "applied recovery");
        self.fixes.push(format!("{offset}: {text}"));
    }

    fn parse_value(&mut self, ctx: Context) -> Value {
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"' | '\'') => self.parse_string(),
            Some('t') if self.word_matches("true") => {
                self.scanner.advance(4);
                Value::Boolean(true)
            }
            Some('f') if self.word_matches("false") => {
                self.scanner.advance(5);
                Value::Boolean(false)
            }
            Some('n') if self.scanner.starts_with("null") => self.parse_null_like(ctx),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(_) => self.parse_unquoted(ctx),
            None => {
                self.note(self.scanner.pos(), "empty value at end of input");
                Value::String(String::new(), Completion::Incomplete)
            }
        }
    }

    /// `word` matches at the cursor and isn't just a prefix of a longer
    /// identifier (`"truest"` must not be read as `true` + `"est"`).
    fn word_matches(&self, word: &str) -> bool {
        self.scanner.starts_with(word)
            && !self
                .scanner
                .peek_nth(word.chars().count())
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
    }

    fn parse_null_like(&mut self, ctx: Context) -> Value {
        // "null" glued directly onto a '{' with no delimiter is the known
        // corruption pattern, checked ahead of the word-boundary rule since
        // '{' also satisfies word_matches's own boundary check.
        if self.scanner.peek_nth(4) == Some('{') && ctx == Context::ObjectValue {
            return self.parse_null_brace_recovery();
        }
        if !self.word_matches("null") {
            return self.parse_unquoted(ctx);
        }
        self.scanner.advance(4);
        Value::Null
    }

    /// Recovers the `null{"...` corruption pattern: consume up through the
    /// first balanced double-quoted string and fold the whole span into one
    /// string value rather than losing the payload.
    fn parse_null_brace_recovery(&mut self) -> Value {
        let start = self.scanner.pos();
        self.scanner.advance(5); // "null{"
        loop {
            match self.scanner.peek() {
                Some('"') => {
                    self.scanner.advance(1);
                    return self.close_null_brace_string(start);
                }
                Some(c) => self.scanner.advance(c.len_utf8()),
                None => {
                    let text = self.scanner.slice_from(start).to_string();
                    self.note(start, "recovered malformed null{ span, unterminated");
                    return Value::String(text, Completion::Incomplete);
                }
            }
        }
    }

    fn close_null_brace_string(&mut self, start: usize) -> Value {
        loop {
            match self.scanner.consume_char() {
                Some('\\') => {
                    self.scanner.consume_char();
                }
                Some('"') => {
                    let text = self.scanner.slice_from(start).to_string();
                    self.note(start, "recovered malformed null{ span");
                    return Value::String(text, Completion::Complete);
                }
                Some(_) => {}
                None => {
                    let text = self.scanner.slice_from(start).to_string();
                    self.note(start, "recovered malformed null{ span, unterminated");
                    return Value::String(text, Completion::Incomplete);
                }
            }
        }
    }

    fn parse_object(&mut self) -> Value {
        let start = self.scanner.pos();
        self.scanner.advance(1); // '{'
        let mut entries = Object::new();
        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some('}') => {
                    self.scanner.advance(1);
                    return Value::object(entries, Completion::Complete);
                }
                None => return self.unclosed_object(start, entries),
                _ => {}
            }

            let key = self.parse_key();
            self.scanner.skip_whitespace();
            if self.scanner.peek() == Some(':') {
                self.scanner.advance(1);
            } else {
                self.note(self.scanner.pos(), "missing ':' after object key, continuing");
            }
            self.scanner.skip_whitespace();
            let value = self.parse_value(Context::ObjectValue);
            entries.push(key, value);
            self.scanner.skip_whitespace();

            match self.scanner.peek() {
                Some(',') => {
                    self.scanner.advance(1);
                    self.scanner.skip_whitespace();
                    if self.scanner.peek() == Some('}') {
                        self.note(self.scanner.pos(), "dropped trailing ',' before '}'");
                        self.scanner.advance(1);
                        return Value::object(entries, Completion::Complete);
                    }
                }
                Some('}') => {
                    self.scanner.advance(1);
                    return Value::object(entries, Completion::Complete);
                }
                Some(_) => {
                    self.note(self.scanner.pos(), "missing ',' between object entries, continuing");
                }
                None => return self.unclosed_object(start, entries),
            }
        }
    }

    fn unclosed_object(&mut self, start: usize, entries: Object) -> Value {
        self.note(start, "object auto-closed at end of input");
        Value::object(entries, Completion::Incomplete)
    }

    fn parse_key(&mut self) -> String {
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some('"' | '\'') => match self.parse_string() {
                Value::String(s, _) => s,
                other => other.to_string(),
            },
            _ => match self.parse_unquoted(Context::ObjectKey) {
                Value::String(s, _) => s,
                other => other.to_string(),
            },
        }
    }

    fn parse_array(&mut self) -> Value {
        let start = self.scanner.pos();
        self.scanner.advance(1); // '['
        let mut items = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some(']') => {
                    self.scanner.advance(1);
                    return Value::Array(items, Completion::Complete);
                }
                None => return self.unclosed_array(start, items),
                _ => {}
            }

            items.push(self.parse_value(Context::Array));
            self.scanner.skip_whitespace();

            match self.scanner.peek() {
                Some(',') => {
                    self.scanner.advance(1);
                    self.scanner.skip_whitespace();
                    if self.scanner.peek() == Some(']') {
                        self.note(self.scanner.pos(), "dropped trailing ',' before ']'");
                        self.scanner.advance(1);
                        return Value::Array(items, Completion::Complete);
                    }
                }
                Some(']') => {
                    self.scanner.advance(1);
                    return Value::Array(items, Completion::Complete);
                }
                Some(_) => {
                    self.note(self.scanner.pos(), "missing ',' between array elements, continuing");
                }
                None => return self.unclosed_array(start, items),
            }
        }
    }

    fn unclosed_array(&mut self, start: usize, items: Vec<Value>) -> Value {
        self.note(start, "array auto-closed at end of input");
        Value::Array(items, Completion::Incomplete)
    }

    fn parse_string(&mut self) -> Value {
        if self.scanner.starts_with("\"\"\"") {
            return self.parse_triple_quoted();
        }
        let start = self.scanner.pos();
        let quote = self
            .scanner
            .consume_char()
            .expect("caller verified a quote char is present");
        let mut value = String::new();
        loop {
            match self.scanner.consume_char() {
                Some(c) if c == quote => return Value::String(value, Completion::Complete),
                Some('\\') => self.push_escape(&mut value),
                Some(c) => value.push(c),
                None => {
                    self.note(start, "string auto-closed at end of input");
                    return Value::String(value, Completion::Incomplete);
                }
            }
        }
    }

    fn push_escape(&mut self, value: &mut String) {
        match self.scanner.consume_char() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('\\') => value.push('\\'),
            Some('"') => value.push('"'),
            Some('\'') => value.push('\''),
            Some('/') => value.push('/'),
            Some(other) => value.push(other),
            None => {}
        }
    }

    fn parse_triple_quoted(&mut self) -> Value {
        self.scanner.advance(3);
        let start = self.scanner.pos();
        loop {
            if self.scanner.starts_with("\"\"\"") {
                let text = self.scanner.slice_from(start).to_string();
                self.scanner.advance(3);
                return Value::String(text, Completion::Complete);
            }
            if self.scanner.consume_char().is_none() {
                let text = self.scanner.slice_from(start).to_string();
                self.note(start, "triple-quoted string auto-closed at end of input");
                return Value::String(text, Completion::Incomplete);
            }
        }
    }

    fn parse_number(&mut self) -> Value {
        let start = self.scanner.pos();
        if self.scanner.peek() == Some('-') {
            self.scanner.advance(1);
        }
        while self.scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.scanner.advance(1);
        }
        if self.scanner.peek() == Some('.') {
            let dot_pos = self.scanner.pos();
            self.scanner.advance(1);
            if self.scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
                while self.scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scanner.advance(1);
                }
            } else {
                self.scanner.set_pos(dot_pos);
                self.note(dot_pos, "dropped trailing '.' in number");
            }
        }
        let text = self.scanner.slice_from(start);
        let n: f64 = text.parse().unwrap_or(0.0);
        Value::Number(n, Completion::Complete)
    }

    fn parse_unquoted(&mut self, ctx: Context) -> Value {
        let start = self.scanner.pos();
        loop {
            match self.scanner.peek() {
                None => break,
                Some(c) => {
                    let stop = match ctx {
                        Context::ObjectValue => {
                            c == '}' || (c == ',' && self.looks_like_next_field())
                        }
                        Context::ObjectKey => c == ':' || c == '\n',
                        Context::Array | Context::Nothing => matches!(c, ',' | '}' | ']' | '\n'),
                    };
                    if stop {
                        break;
                    }
                    self.scanner.advance(c.len_utf8());
                }
            }
        }
        let text = self.scanner.slice_from(start).trim().to_string();
        let completion = if self.scanner.at_eof() {
            Completion::Incomplete
        } else {
            Completion::Complete
        };
        Value::String(text, completion)
    }

    /// After a comma inside an object value, peek ahead to tell a literal
    /// comma in the value's text apart from the separator before the next
    /// field.
    fn looks_like_next_field(&self) -> bool {
        let chars: Vec<char> = self.scanner.remaining().chars().skip(1).collect();
        let mut idx = 0;
        while idx < chars.len() && chars[idx].is_whitespace() {
            idx += 1;
        }
        let Some(&first) = chars.get(idx) else {
            return false;
        };
        if first == '}' {
            return true;
        }
        if first == '"' || first == '\'' {
            let mut j = idx + 1;
            while j < chars.len() && chars[j] != first {
                j += 1;
            }
            j += 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            return chars.get(j) == Some(&':');
        }
        if first == '_' || first.is_alphabetic() {
            let mut j = idx;
            while j < chars.len() && (chars[j] == '_' || chars[j].is_alphanumeric()) {
                j += 1;
            }
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            return chars.get(j) == Some(&':');
        }
        false
    }
}
