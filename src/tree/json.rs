//! Conversion between JSON documents and tree nodes.
//!
//! Trees arrive already decoded; the CLI accepts them as JSON exports.
//! Structured text stored as a subtree is rendered back to JSON text.

use super::node::{NodeKind, PrimitiveKind, Tag, TreeNode};
use serde_json::{Map, Number, Value};

impl Tag {
    /// Import a JSON value as a tree.
    ///
    /// Integers become `Int` when they fit and `Long` otherwise; booleans
    /// become `Byte` the way the save format stores flags.
    pub fn from_json(value: Value) -> Tag {
        match value {
            Value::Null => Tag::Compound(Default::default()),
            Value::Bool(b) => Tag::Byte(i8::from(b)),
            Value::Number(n) => number_to_tag(&n),
            Value::String(s) => Tag::String(s),
            Value::Array(items) => Tag::List(items.into_iter().map(Tag::from_json).collect()),
            Value::Object(map) => {
                Tag::Compound(map.into_iter().map(|(k, v)| (k, Tag::from_json(v))).collect())
            }
        }
    }
}

fn number_to_tag(n: &Number) -> Tag {
    if let Some(i) = n.as_i64() {
        return match i32::try_from(i) {
            Ok(v) => Tag::Int(v),
            Err(_) => Tag::Long(i),
        };
    }
    Tag::Double(n.as_f64().unwrap_or_default())
}

/// Render any tree node as JSON.
///
/// Bytes 0 and 1 become booleans; structured text uses byte flags for
/// `bold`, `italic` and friends.
pub fn node_to_json<N: TreeNode>(node: &N) -> Value {
    match node.kind() {
        NodeKind::Compound => {
            let mut map = Map::new();
            for key in node.keys() {
                if let Some(child) = node.get_child(key) {
                    map.insert(key.to_string(), node_to_json(child));
                }
            }
            Value::Object(map)
        }
        NodeKind::List => Value::Array(node.elements().into_iter().map(node_to_json).collect()),
        NodeKind::Primitive(PrimitiveKind::Byte) => match node.as_int() {
            Some(0) => Value::Bool(false),
            Some(1) => Value::Bool(true),
            Some(v) => Value::from(v),
            None => Value::Null,
        },
        NodeKind::Primitive(PrimitiveKind::String) => {
            Value::String(node.as_string().unwrap_or_default().to_string())
        }
        NodeKind::Primitive(PrimitiveKind::Float) | NodeKind::Primitive(PrimitiveKind::Double) => {
            node.as_float()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        }
        NodeKind::Primitive(PrimitiveKind::ByteArray) => Value::Array(
            node.as_bytes()
                .unwrap_or_default()
                .iter()
                .map(|b| Value::from(*b))
                .collect(),
        ),
        NodeKind::Primitive(_) => node.as_int().map(Value::from).unwrap_or(Value::Null),
    }
}
