//! Feature-version gating (§4.8).
//!
//! Owned per-`Interpreter` instance rather than as process-wide statics —
//! a REDESIGN FLAG relative to the distilled source's module-level state
//! (see SPEC_FULL.md §9): running two interpreters in one process must not
//! let one's feature-gate bookkeeping leak into the other's.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::WarnSink;
use crate::version::VersionComparer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyClass {
    New,
    Deprecated,
}

impl PolicyClass {
    fn label(self) -> &'static str {
        match self {
            PolicyClass::New => "FeatureNew",
            PolicyClass::Deprecated => "FeatureDeprecated",
        }
    }
}

/// `version → feature names used before that version's gate was satisfied`,
/// per subproject.
type SubprojectUses = HashMap<String, HashMap<String, HashSet<String>>>;

#[derive(Debug, Default)]
pub struct FeaturePolicy {
    new_uses: SubprojectUses,
    deprecated_uses: SubprojectUses,
    seen: HashSet<(PolicyClass, String, String, String)>,
    project_meson_versions: HashMap<String, String>,
}

impl FeaturePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_project_version(&mut self, subproject: impl Into<String>, version: impl Into<String>) {
        self.project_meson_versions.insert(subproject.into(), version.into());
    }

    pub fn project_version(&self, subproject: &str) -> Option<&str> {
        self.project_meson_versions.get(subproject).map(String::as_str)
    }

    /// Registers a single use of `feature_name`, gated at `feature_version`,
    /// for `class`. Emits a deduplicated warning through `sink` if the
    /// target version (read from `project_meson_versions`, or
    /// `fallback_target` when the subproject hasn't called `project()` yet)
    /// fails the gate. Silently does nothing if there's no target at all.
    #[allow(clippy::too_many_arguments)]
    pub fn register_use(
        &mut self,
        class: PolicyClass,
        subproject: &str,
        feature_version: &str,
        feature_name: &str,
        fallback_target: Option<&str>,
        strict: bool,
        comparer: &dyn VersionComparer,
        sink: &dyn WarnSink,
    ) -> crate::error::EvalResult<()> {
        let Some(target) = self
            .project_meson_versions
            .get(subproject)
            .map(String::as_str)
            .or(fallback_target)
        else {
            return Ok(());
        };

        let satisfied = comparer.version_compare_condition_with_min(target, feature_version);
        let gate_violated = match class {
            PolicyClass::New => !satisfied,
            PolicyClass::Deprecated => satisfied,
        };
        if !gate_violated {
            return Ok(());
        }

        let dedup_key = (
            class,
            subproject.to_string(),
            feature_version.to_string(),
            feature_name.to_string(),
        );
        let first_time = self.seen.insert(dedup_key);

        let uses = match class {
            PolicyClass::New => &mut self.new_uses,
            PolicyClass::Deprecated => &mut self.deprecated_uses,
        };
        uses.entry(subproject.to_string())
            .or_default()
            .entry(feature_version.to_string())
            .or_default()
            .insert(feature_name.to_string());

        if first_time {
            let message = format!(
                "{} feature \"{feature_name}\": requires meson version {feature_version}, targeted is {target}.",
                class.label()
            );
            if strict && class == PolicyClass::Deprecated {
                return Err(crate::error::EvalError::invalid_code(message));
            }
            sink.warn(None, &message);
        }
        Ok(())
    }

    /// Single-use form (§4.8): fires once per call site regardless of how
    /// many times that call site is hit — callers pass a stable
    /// `feature_name` (typically including a call-site description) to get
    /// the same dedup behavior as `register_use`.
    pub fn single_use(
        &mut self,
        feature_name: &str,
        feature_version: &str,
        subproject: &str,
        extra_message: Option<&str>,
        sink: &dyn WarnSink,
    ) {
        let dedup_key = (
            PolicyClass::New,
            subproject.to_string(),
            feature_version.to_string(),
            feature_name.to_string(),
        );
        if !self.seen.insert(dedup_key) {
            return;
        }
        let mut message = format!("Feature \"{feature_name}\" used (gate version {feature_version}).");
        if let Some(extra) = extra_message {
            message.push(' ');
            message.push_str(extra);
        }
        sink.warn(None, &message);
    }

    /// End-of-run consolidated report, grouping feature names by version,
    /// for one subproject and policy class.
    pub fn report(&self, class: PolicyClass, subproject: &str) -> Vec<(String, Vec<String>)> {
        let uses = match class {
            PolicyClass::New => &self.new_uses,
            PolicyClass::Deprecated => &self.deprecated_uses,
        };
        let mut report: Vec<(String, Vec<String>)> = uses
            .get(subproject)
            .into_iter()
            .flat_map(|by_version| by_version.iter())
            .map(|(version, names)| {
                let mut names: Vec<String> = names.iter().cloned().collect();
                names.sort();
                (version.clone(), names)
            })
            .collect();
        report.sort_by(|a, b| a.0.cmp(&b.0));
        report
    }
}
