//! Addresses into the state tree.

use std::fmt;
use std::sync::Arc;

use crate::value::{Map, Value};

/// Largest array position a write will pad up to. Numeric segments past it
/// are stored as object keys instead.
pub const MAX_ARRAY_INDEX: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySegment {
    Key(String),
    Index(usize),
}

impl KeySegment {
    /// The segment as an array position, if it can be one. Numeric keys count.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            KeySegment::Index(i) => Some(*i),
            KeySegment::Key(k) => k.parse().ok(),
        }
    }

    /// The segment as an object key.
    pub fn to_key(&self) -> String {
        match self {
            KeySegment::Key(k) => k.clone(),
            KeySegment::Index(i) => i.to_string(),
        }
    }

    fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match (self, value) {
            (KeySegment::Key(k), Value::Object(map)) => map.get(k),
            (KeySegment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
            (_, Value::Array(items)) => self.as_index().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            KeySegment::Key(k) => Value::from(k.as_str()),
            KeySegment::Index(i) => Value::from(*i),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(KeySegment::Key(s.to_string())),
            Value::Number(_) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(KeySegment::Index),
            _ => None,
        }
    }
}

impl From<&str> for KeySegment {
    fn from(key: &str) -> Self {
        KeySegment::Key(key.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(key: String) -> Self {
        KeySegment::Key(key)
    }
}

impl From<usize> for KeySegment {
    fn from(index: usize) -> Self {
        KeySegment::Index(index)
    }
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySegment::Key(k) => f.write_str(k),
            KeySegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// An ordered sequence of keys. The empty path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<KeySegment>);

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Split a dotted path. The empty string is the root path.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self(path.split('.').map(KeySegment::from).collect())
    }

    /// Read a path carried inside state or a fragment: either a dotted string
    /// or an array of string/index segments. Anything else is not a path.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::parse(s)),
            Value::Array(items) => items
                .iter()
                .map(KeySegment::from_value)
                .collect::<Option<Vec<_>>>()
                .map(Self),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        self.0.iter().map(KeySegment::to_value).collect()
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walk the path from `root`. Stepping into a missing key or through a
    /// scalar yields `None`.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(root, |node, segment| segment.lookup(node))
    }

    /// Return a new tree with `value` stored at this path.
    ///
    /// Only the containers along the path are rebuilt; siblings stay shared
    /// with `state`. Missing or scalar intermediates become empty objects.
    /// Arrays are written in place of objects when the segment is an index,
    /// padding any gap with nulls. An index above [`MAX_ARRAY_INDEX`] turns
    /// the array into an object keyed by position.
    pub fn assoc(&self, state: Value, value: Value) -> Value {
        assoc(state, &self.0, value)
    }
}

fn assoc(node: Value, segments: &[KeySegment], value: Value) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };

    let index = head.as_index().filter(|index| *index <= MAX_ARRAY_INDEX);
    match (node, index) {
        (Value::Array(mut items), Some(index)) => {
            let items_mut = Arc::make_mut(&mut items);
            if let Some(len) = index.checked_add(1).filter(|len| *len > items_mut.len()) {
                items_mut.resize(len, Value::Null);
            }
            let child = std::mem::take(&mut items_mut[index]);
            items_mut[index] = assoc(child, rest, value);
            Value::Array(items)
        }
        (Value::Array(items), None) if head.as_index().is_some() => {
            let fields: Map = items
                .iter()
                .enumerate()
                .map(|(position, item)| (position.to_string(), item.clone()))
                .collect();
            assoc(Value::from(fields), segments, value)
        }
        (node, _) => {
            let mut map = node.into_object_or_empty();
            let fields: &mut Map = Arc::make_mut(&mut map);
            let key = head.to_key();
            let child = fields.remove(&key).unwrap_or_default();
            fields.insert(key, assoc(child, rest, value));
            Value::Object(map)
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for KeyPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&String> for KeyPath {
    fn from(path: &String) -> Self {
        Self::parse(path)
    }
}

impl From<Vec<KeySegment>> for KeyPath {
    fn from(segments: Vec<KeySegment>) -> Self {
        Self(segments)
    }
}

impl From<Vec<&str>> for KeyPath {
    fn from(keys: Vec<&str>) -> Self {
        Self(keys.into_iter().map(KeySegment::from).collect())
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(keys: Vec<String>) -> Self {
        Self(keys.into_iter().map(KeySegment::from).collect())
    }
}

impl From<&[&str]> for KeyPath {
    fn from(keys: &[&str]) -> Self {
        Self(keys.iter().copied().map(KeySegment::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.into_iter().map(KeySegment::from).collect())
    }
}

impl<const N: usize> From<[KeySegment; N]> for KeyPath {
    fn from(segments: [KeySegment; N]) -> Self {
        Self(segments.into_iter().collect())
    }
}

/// `None` resets to the root path.
impl<P: Into<KeyPath>> From<Option<P>> for KeyPath {
    fn from(path: Option<P>) -> Self {
        path.map_or_else(KeyPath::root, Into::into)
    }
}
