//! Styled-text values and signage faces.

use crate::tree::{node_to_json, NodeKind, TreeNode};
use crate::types::LINES_PER_FACE;

/// Structured text placeholder for an empty line
pub const EMPTY_TEXT: &str = r#"{"text":""}"#;

/// Read a styled-text value.
///
/// Strings are taken as-is; structured text stored as a subtree is rendered
/// to its JSON form.
pub fn text_value<N: TreeNode>(node: &N) -> Option<String> {
    match node.kind() {
        NodeKind::Compound | NodeKind::List => serde_json::to_string(&node_to_json(node)).ok(),
        _ => node.as_string().map(str::to_string),
    }
}

/// Read a filterable text value: `{raw: <text>, filtered: ..}` or a bare text value
pub fn filterable_text<N: TreeNode>(node: &N) -> Option<String> {
    match node.get_child("raw") {
        Some(raw) => text_value(raw),
        None => text_value(node),
    }
}

/// Whether a sign line renders as nothing
pub fn is_blank_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed == "\"\"" || trimmed == EMPTY_TEXT || trimmed == "null"
}

/// Turn sign faces into artifact pages.
///
/// Each face keeps at most `LINES_PER_FACE` lines and every blank line is
/// stored as `""`, so signs that differ only in how they encode blank lines
/// share a fingerprint. The front face is padded to a full face when a back
/// face follows; a fully blank back face is dropped. Returns `None` when
/// every line is blank.
pub fn faces_to_pages(faces: Vec<Vec<String>>) -> Option<Vec<String>> {
    let mut faces = faces.into_iter().map(normalize_face);
    let mut pages: Vec<String> = faces.next()?;
    for face in faces {
        if face.iter().all(String::is_empty) {
            continue;
        }
        pages.resize(LINES_PER_FACE, String::new());
        pages.extend(face);
    }
    if pages.iter().all(String::is_empty) {
        return None;
    }
    Some(pages)
}

fn normalize_face(face: Vec<String>) -> Vec<String> {
    face.into_iter()
        .take(LINES_PER_FACE)
        .map(|line| if is_blank_line(&line) { String::new() } else { line })
        .collect()
}
