//! Keys bounded by the two sentinel values.

use std::fmt;

use serde::Serialize;
use serde::Serializer;

/// A key as stored in a node: either a user key or one of the two
/// sentinels that bound every level.
///
/// Variant order gives the total order: `NegInf < Finite(_) < PosInf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key<K> {
    /// Carried only by the head sentinel.
    NegInf,
    Finite(K),
    /// Carried only by the tail sentinel.
    PosInf,
}

impl<K> Key<K> {
    /// The user key, if this is not a sentinel.
    pub fn finite(&self) -> Option<&K> {
        return match self {
            Key::Finite(key) => Some(key),
            _ => None,
        };
    }

    pub fn is_sentinel(&self) -> bool {
        return !matches!(self, Key::Finite(_));
    }
}

impl<K: PartialEq> Key<K> {
    /// Compare against a bare user key without building a `Key`.
    pub fn is(&self, key: &K) -> bool {
        return matches!(self, Key::Finite(k) if k == key);
    }
}

impl<K: Ord> Key<K> {
    /// True when this key sorts strictly after the given user key.
    pub fn is_after(&self, key: &K) -> bool {
        return match self {
            Key::NegInf => false,
            Key::Finite(k) => k > key,
            Key::PosInf => true,
        };
    }
}

impl<K> From<K> for Key<K> {
    fn from(key: K) -> Self {
        return Key::Finite(key);
    }
}

impl<K: fmt::Display> fmt::Display for Key<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Key::NegInf => f.write_str("-inf"),
            Key::Finite(key) => key.fmt(f),
            Key::PosInf => f.write_str("inf"),
        };
    }
}

// JSON has no infinities, so sentinels go out as strings.
impl<K: Serialize> Serialize for Key<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return match self {
            Key::NegInf => serializer.serialize_str("-inf"),
            Key::Finite(key) => key.serialize(serializer),
            Key::PosInf => serializer.serialize_str("inf"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_bound_everything() {
        assert!(Key::NegInf < Key::Finite(i64::MIN));
        assert!(Key::Finite(i64::MAX) < Key::PosInf);
        assert!(Key::Finite(1) < Key::Finite(2));
    }

    #[test]
    fn is_after() {
        assert!(Key::Finite(5).is_after(&4));
        assert!(!Key::Finite(5).is_after(&5));
        assert!(Key::<i32>::PosInf.is_after(&i32::MAX));
        assert!(!Key::<i32>::NegInf.is_after(&i32::MIN));
    }

    #[test]
    fn serializes_sentinels_as_strings() {
        let keys = vec![Key::NegInf, Key::Finite(3), Key::PosInf];
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"["-inf",3,"inf"]"#);
    }

    #[test]
    fn display() {
        assert_eq!(Key::<u8>::NegInf.to_string(), "-inf");
        assert_eq!(Key::Finite(42).to_string(), "42");
        assert_eq!(Key::<u8>::PosInf.to_string(), "inf");
    }
}
