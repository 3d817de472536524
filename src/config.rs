//! Interpreter-level configuration (§4.10, ambient), loaded the way a host
//! loads its own package/build metadata — `serde` + `toml`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// When true, a `FeatureDeprecated` use raises `InvalidCode` instead of
    /// warning. A host running in CI may want this.
    pub strict_deprecations: bool,
    /// Fallback target version for a subproject that hasn't called
    /// `project()` yet, instead of silently skipping feature checks. Useful
    /// for unit-testing isolated snippets.
    pub default_subproject_version: Option<String>,
    /// Recursion guards; the tree walk is otherwise unbounded and a
    /// pathological program could exhaust the native stack.
    pub max_foreach_depth: usize,
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            strict_deprecations: false,
            default_subproject_version: None,
            max_foreach_depth: 1000,
            max_call_depth: 1000,
        }
    }
}

impl InterpreterConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
