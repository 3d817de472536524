use std::rc::Rc;

/// Whether a `StringValue` is a plain string or the `version_compare`
/// subtype. Distilled from a string subclass in the original DSL into an
/// explicit tag, per the REDESIGN FLAG in SPEC_FULL.md §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    Plain,
    Version,
}

/// Both plain and version-tagged DSL strings. Equality, ordering, and every
/// string method ignore the tag; only `evaluate_method_call` on a
/// `Version`-tagged receiver treats a `version_compare()` call specially
/// (see `crate::builtins::strings::version_compare`).
#[derive(Debug, Clone)]
pub struct StringValue {
    pub text: Rc<str>,
    pub kind: StringKind,
}

impl StringValue {
    pub fn plain(text: impl Into<Rc<str>>) -> Self {
        Self {
            text: text.into(),
            kind: StringKind::Plain,
        }
    }

    pub fn version(text: impl Into<Rc<str>>) -> Self {
        Self {
            text: text.into(),
            kind: StringKind::Version,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_version(&self) -> bool {
        matches!(self.kind, StringKind::Version)
    }
}

impl PartialEq for StringValue {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for StringValue {}

impl PartialOrd for StringValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.text.cmp(&other.text))
    }
}

impl Ord for StringValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}
