//! Human-readable views of a list, for debugging.
//!
//! These only read the node chain through the public API.

use std::fmt::Display;

use serde::Serialize;

use crate::key::Key;
use crate::skip_list::SkipList;

#[derive(Serialize)]
struct DumpEntry<'a, K, V> {
    key: &'a Key<K>,
    value: Option<&'a V>,
    /// Successor key per level; `null` past the tail.
    pointers: Vec<Option<&'a Key<K>>>,
}

/// Every node from head to tail as pretty JSON (two-space indent): its key,
/// value, and the key each of its pointers leads to.
pub fn dump<K, V>(list: &SkipList<K, V>) -> serde_json::Result<String>
where
    K: Ord + Serialize,
    V: Serialize,
{
    let entries: Vec<_> = list
        .nodes()
        .map(|(_, node)| DumpEntry {
            key: node.key(),
            value: node.value(),
            pointers: (0..=node.top_level())
                .map(|level| node.next(level).map(|id| list.node(id).key()))
                .collect(),
        })
        .collect();
    return serde_json::to_string_pretty(&entries);
}

/// A vertical rendition: each node's key and value, then one cell per
/// level naming its successor, padded to the widest key.
///
/// ```text
/// Key = -inf, Value = none
/// (1)    (9)    (inf)
///
/// Key = 1, Value = a
/// (9)
///
/// ...
/// Key = inf, Value = none
/// ```
pub fn pretty<K, V>(list: &SkipList<K, V>) -> String
where
    K: Ord + Display,
    V: Display,
{
    let width = list
        .nodes()
        .map(|(_, node)| node.key().to_string().len())
        .max()
        .unwrap_or(0)
        + 2;

    let tail = list.tail();
    let mut out = String::new();
    for (id, node) in list.nodes() {
        let value = match node.value() {
            Some(value) => value.to_string(),
            None => "none".to_string(),
        };
        out.push_str(&format!("Key = {}, Value = {}", node.key(), value));
        if id == tail {
            break;
        }

        let mut cells = String::new();
        for level in 0..=node.top_level() {
            let cell = match node.next(level) {
                Some(next) => format!("({})", list.node(next).key()),
                None => String::new(),
            };
            cells.push_str(&format!("{:<width$}", cell, width = width));
        }
        out.push('\n');
        out.push_str(&cells);
        out.push_str("\n\n");
    }
    return out;
}
