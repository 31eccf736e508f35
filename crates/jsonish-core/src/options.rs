/// Knobs controlling how aggressively [`crate::parse`] tolerates malformed
/// input. Every flag defaults to the permissive setting the dispatcher
/// assumes when unconfigured; `allow_partial` is the one exception, since
/// turning on partial-fill changes what counts as a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    allow_partial: bool,
    allow_malformed: bool,
    allow_markdown_json: bool,
    allow_as_string: bool,
    allow_fixes: bool,
    max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            allow_partial: false,
            allow_malformed: true,
            allow_markdown_json: true,
            allow_as_string: true,
            allow_fixes: true,
            max_depth: 100,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow_partial(mut self, value: bool) -> Self {
        self.allow_partial = value;
        self
    }

    #[must_use]
    pub fn allow_malformed(mut self, value: bool) -> Self {
        self.allow_malformed = value;
        self
    }

    #[must_use]
    pub fn allow_markdown_json(mut self, value: bool) -> Self {
        self.allow_markdown_json = value;
        self
    }

    #[must_use]
    pub fn allow_as_string(mut self, value: bool) -> Self {
        self.allow_as_string = value;
        self
    }

    #[must_use]
    pub fn allow_fixes(mut self, value: bool) -> Self {
        self.allow_fixes = value;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    #[must_use]
    pub fn is_partial_allowed(&self) -> bool {
        self.allow_partial
    }

    #[must_use]
    pub fn is_malformed_allowed(&self) -> bool {
        self.allow_malformed
    }

    #[must_use]
    pub fn is_markdown_json_allowed(&self) -> bool {
        self.allow_markdown_json
    }

    #[must_use]
    pub fn is_as_string_allowed(&self) -> bool {
        self.allow_as_string
    }

    #[must_use]
    pub fn is_fixes_allowed(&self) -> bool {
        self.allow_fixes
    }

    #[must_use]
    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }
}
