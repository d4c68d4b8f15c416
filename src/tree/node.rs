//! Generic tree node view and the owned `Tag` implementation

use std::collections::BTreeMap;

/// Primitive payload variants of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    ByteArray,
    IntArray,
    LongArray,
}

/// Node kind as seen through the read-only view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Compound,
    List,
    Primitive(PrimitiveKind),
}

/// Read-only handle over an already-decoded tree.
///
/// The extraction core never writes through this view. Accessors return
/// `None` when the node is of the wrong kind instead of failing.
pub trait TreeNode {
    fn kind(&self) -> NodeKind;

    /// Named child of a compound
    fn get_child(&self, key: &str) -> Option<&Self>;

    /// Indexed child of a list
    fn get_indexed(&self, index: usize) -> Option<&Self>;

    /// Number of children (compound entries or list elements); 0 for primitives
    fn len(&self) -> usize;

    /// Child keys of a compound in a stable order
    fn keys(&self) -> Vec<&str>;

    fn as_string(&self) -> Option<&str>;

    /// Integer value of any integer width
    fn as_int(&self) -> Option<i64>;

    fn as_float(&self) -> Option<f64>;

    fn as_bytes(&self) -> Option<&[u8]>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_compound(&self) -> bool {
        self.kind() == NodeKind::Compound
    }

    fn is_list(&self) -> bool {
        self.kind() == NodeKind::List
    }

    /// Iterate list elements in order
    fn elements(&self) -> Vec<&Self> {
        if !self.is_list() {
            return Vec::new();
        }
        (0..self.len()).filter_map(|i| self.get_indexed(i)).collect()
    }

    /// Walk a chain of compound keys
    fn get_path(&self, path: &[&str]) -> Option<&Self> {
        let mut node = self;
        for key in path {
            node = node.get_child(key)?;
        }
        Some(node)
    }
}

/// Owned tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<u8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    List(Vec<Tag>),
    Compound(BTreeMap<String, Tag>),
}

impl Tag {
    /// Build a compound from key/value pairs
    pub fn compound<K, I>(entries: I) -> Tag
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Tag)>,
    {
        Tag::Compound(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn string(value: impl Into<String>) -> Tag {
        Tag::String(value.into())
    }
}

impl TreeNode for Tag {
    fn kind(&self) -> NodeKind {
        match self {
            Tag::Byte(_) => NodeKind::Primitive(PrimitiveKind::Byte),
            Tag::Short(_) => NodeKind::Primitive(PrimitiveKind::Short),
            Tag::Int(_) => NodeKind::Primitive(PrimitiveKind::Int),
            Tag::Long(_) => NodeKind::Primitive(PrimitiveKind::Long),
            Tag::Float(_) => NodeKind::Primitive(PrimitiveKind::Float),
            Tag::Double(_) => NodeKind::Primitive(PrimitiveKind::Double),
            Tag::String(_) => NodeKind::Primitive(PrimitiveKind::String),
            Tag::ByteArray(_) => NodeKind::Primitive(PrimitiveKind::ByteArray),
            Tag::IntArray(_) => NodeKind::Primitive(PrimitiveKind::IntArray),
            Tag::LongArray(_) => NodeKind::Primitive(PrimitiveKind::LongArray),
            Tag::List(_) => NodeKind::List,
            Tag::Compound(_) => NodeKind::Compound,
        }
    }

    fn get_child(&self, key: &str) -> Option<&Self> {
        match self {
            Tag::Compound(map) => map.get(key),
            _ => None,
        }
    }

    fn get_indexed(&self, index: usize) -> Option<&Self> {
        match self {
            Tag::List(items) => items.get(index),
            _ => None,
        }
    }

    fn len(&self) -> usize {
        match self {
            Tag::List(items) => items.len(),
            Tag::Compound(map) => map.len(),
            _ => 0,
        }
    }

    fn keys(&self) -> Vec<&str> {
        match self {
            Tag::Compound(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn as_string(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            Tag::Byte(v) => Some(i64::from(*v)),
            Tag::Short(v) => Some(i64::from(*v)),
            Tag::Int(v) => Some(i64::from(*v)),
            Tag::Long(v) => Some(*v),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Tag::Float(v) => Some(f64::from(*v)),
            Tag::Double(v) => Some(*v),
            other => other.as_int().map(|v| v as f64),
        }
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Tag::ByteArray(bytes) => Some(bytes),
            Tag::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}
