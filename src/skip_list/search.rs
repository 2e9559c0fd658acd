//! Trace search: which keys a lookup walks past on the way to a match.
//!
//! Levels are tried from the top down, and each level is scanned on its
//! own from the head. The first level that holds the key produces the
//! result: every key visited on that level (the head's `-inf` first, the
//! matched key last) followed by the matched value.
//!
//! This does not descend between levels mid-scan. The trace of a full
//! per-level walk is the observable result, so it is kept as is.

use serde::Serialize;

use super::NULL;
use super::SkipList;
use crate::key::Key;

/// One element of a search trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Step<'a, K, V> {
    Key(&'a Key<K>),
    Value(&'a V),
}

/// Visited keys then the matched value, or empty when the key is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchTrace<'a, K, V> {
    steps: Vec<Step<'a, K, V>>,
}

impl<'a, K, V> SearchTrace<'a, K, V> {
    fn not_found() -> Self {
        return SearchTrace { steps: Vec::new() };
    }

    pub fn is_found(&self) -> bool {
        return !self.steps.is_empty();
    }

    pub fn steps(&self) -> &[Step<'a, K, V>] {
        return &self.steps;
    }

    /// The matched value.
    pub fn value(&self) -> Option<&'a V> {
        return match self.steps.last() {
            Some(Step::Value(value)) => Some(*value),
            _ => None,
        };
    }

    /// Keys visited on the successful level, in order.
    pub fn keys(&self) -> impl Iterator<Item = &'a Key<K>> + '_ {
        return self.steps.iter().filter_map(|step| match step {
            Step::Key(key) => Some(*key),
            Step::Value(_) => None,
        });
    }
}

impl<K: Serialize, V: Serialize> SearchTrace<'_, K, V> {
    /// Pretty JSON with a two-space indent; `[]` when not found.
    pub fn to_json(&self) -> serde_json::Result<String> {
        return serde_json::to_string_pretty(self);
    }
}

impl<K: Ord, V> SkipList<K, V> {
    /// Search for `key`, returning the path walked on the highest level
    /// that holds it. An absent key gives an empty trace.
    pub fn search(&self, key: &K) -> SearchTrace<'_, K, V> {
        for level in (0..=self.max_level).rev() {
            if let Some(steps) = self.scan_level(key, level) {
                return SearchTrace { steps };
            }
        }
        return SearchTrace::not_found();
    }

    /// Walk `level` from the head until `key`. Nothing of a failed walk is
    /// kept.
    fn scan_level(&self, key: &K, level: usize) -> Option<Vec<Step<'_, K, V>>> {
        let mut steps = Vec::new();
        let mut id = self.head;
        while id != NULL {
            let node = self.node(id);
            steps.push(Step::Key(&node.key));
            if node.key.is(key) {
                steps.extend(node.value.as_ref().map(Step::Value));
                return Some(steps);
            }
            id = node.next[level];
        }
        return None;
    }
}
