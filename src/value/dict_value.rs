use super::Value;

/// A string-keyed mapping that preserves insertion order for display and
/// `keys()`-less iteration, while `foreach` and `.keys()` both re-sort by
/// key lexicographically at the point of use (see `crate::eval::stmt` and
/// `crate::builtins::dicts`).
///
/// Backed by a flat `Vec` rather than a hash map: dicts in build scripts are
/// small (tens of entries at most), so linear lookup is simpler than keeping
/// a second index structure in sync and is not a measurable cost here.
#[derive(Debug, Clone, Default)]
pub struct DictValue {
    entries: Vec<(String, Value)>,
}

impl DictValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(String, Value)>) -> Self {
        let mut dict = Self::new();
        for (k, v) in entries {
            dict.insert(k, v);
        }
        dict
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert, overwriting an existing key in place so insertion order of
    /// the *first* occurrence is preserved on update.
    pub fn insert(&mut self, key: String, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Insertion-order iteration.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in ascending lexicographic order, matching `foreach` and
    /// `.keys()` semantics.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Right-biased merge: entries from `other` overwrite entries in `self`
    /// with the same key; new keys are appended in `other`'s order.
    pub fn merged_with(&self, other: &DictValue) -> DictValue {
        let mut out = self.clone();
        for (k, v) in other.iter() {
            out.insert(k.to_string(), v.clone());
        }
        out
    }
}

impl PartialEq for DictValue {
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries
            .iter()
            .all(|(k, v)| other.get(k).map(|ov| ov == v).unwrap_or(false))
    }
}
