//! Generic Tree View
//!
//! Read-only access to an already-decoded save tree. Decoding the compressed
//! binary format is someone else's job; this module only defines the view the
//! extraction core consumes plus an owned implementation.

pub mod json;
pub mod node;

pub use json::node_to_json;
pub use node::{NodeKind, PrimitiveKind, Tag, TreeNode};
