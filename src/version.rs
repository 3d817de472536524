//! Dotted-numeric version comparison (§6 "Version comparison").
//!
//! Ships a default implementation so the evaluator and its tests are
//! self-contained; a host may override it via [`VersionComparer`] with
//! whatever richer semver-style comparator it already uses elsewhere.

use std::cmp::Ordering;

pub fn parse(version: &str) -> Vec<u64> {
    version.split('.').map(|part| part.parse().unwrap_or(0)).collect()
}

pub fn compare(a: &str, b: &str) -> Ordering {
    parse(a).cmp(&parse(b))
}

/// Parses a constraint like `">=1.0.0"` or a bare `"1.0.0"` (implicit `==`)
/// and checks `version` against it.
pub fn satisfies(version: &str, constraint: &str) -> bool {
    let (op, rhs) = split_operator(constraint);
    let ordering = compare(version, rhs);
    match op {
        ">=" => ordering != Ordering::Less,
        "<=" => ordering != Ordering::Greater,
        ">" => ordering == Ordering::Greater,
        "<" => ordering == Ordering::Less,
        "!=" => ordering != Ordering::Equal,
        _ => ordering == Ordering::Equal,
    }
}

fn split_operator(constraint: &str) -> (&str, &str) {
    for op in [">=", "<=", "==", "!=", ">", "<"] {
        if let Some(rest) = constraint.strip_prefix(op) {
            return (op, rest.trim());
        }
    }
    ("==", constraint.trim())
}

/// Host-overridable version comparison surface (§6).
pub trait VersionComparer {
    fn version_compare(&self, version: &str, constraint: &str) -> bool {
        satisfies(version, constraint)
    }

    /// Whether `target` satisfies at least `feature_version` — the check
    /// `FeatureNew`/`FeatureDeprecated` gating runs (§4.8).
    ///
    /// `target` is ordinarily a bare dotted version, but inside an `if`
    /// block whose condition called `version_compare` on a version-tagged
    /// string, `target` is transiently the raw comparison string passed to
    /// that call (e.g. `">=0.54.0"`, see `crate::eval::stmt`). A target
    /// already carrying a comparison operator is treated as satisfying any
    /// feature gate for the duration of that block, matching the source
    /// DSL's behavior.
    fn version_compare_condition_with_min(&self, target: &str, feature_version: &str) -> bool {
        let has_operator_prefix = [">=", "<=", "==", "!=", ">", "<"].iter().any(|op| target.starts_with(op));
        if has_operator_prefix {
            return true;
        }
        compare(target, feature_version) != Ordering::Less
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultVersionComparer;

impl VersionComparer for DefaultVersionComparer {}
