//! Serializer
//!
//! Turns stored records into command text for a chosen game version. Each
//! target fixes a quote style, an outer escape order, and whether identifiers
//! carry the `minecraft:` namespace. Rendering is pure: no I/O happens here.

pub mod escape;
pub mod export;
pub mod layout;

use crate::artifact::ArtifactKind;
use crate::error::ApiError;
use crate::schema::text::EMPTY_TEXT;
use crate::store::StoredRecord;
use crate::types::LINES_PER_FACE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use escape::{embed, escape_outer, plain_string, quote, structural_text, unescape_outer, unwrap_structural};
pub use export::{plan_export, write_export, ExportFile, ExportPlan};
pub use layout::{LayoutAssigner, Placement};

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_AUTHOR: &str = "Unknown";

/// Supported output generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SerializationTarget {
    V1_12,
    V1_13,
    V1_14,
    V1_20_5,
}

impl SerializationTarget {
    pub const ALL: [SerializationTarget; 4] = [
        SerializationTarget::V1_12,
        SerializationTarget::V1_13,
        SerializationTarget::V1_14,
        SerializationTarget::V1_20_5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SerializationTarget::V1_12 => "1.12",
            SerializationTarget::V1_13 => "1.13",
            SerializationTarget::V1_14 => "1.14",
            SerializationTarget::V1_20_5 => "1.20.5",
        }
    }

    /// Version label usable in a file name
    pub fn file_stem(&self) -> String {
        self.as_str().replace('.', "_")
    }

    /// Outer quote character for embedded text
    pub fn quote_char(&self) -> char {
        match self {
            SerializationTarget::V1_12 | SerializationTarget::V1_13 => '"',
            SerializationTarget::V1_14 | SerializationTarget::V1_20_5 => '\'',
        }
    }

    /// Characters escaped by the outer stage, in application order
    pub fn escape_order(&self) -> &'static [char] {
        match self.quote_char() {
            '"' => &['\\', '"'],
            _ => &['\\', '\''],
        }
    }

    pub fn namespaced(&self) -> bool {
        !matches!(self, SerializationTarget::V1_12)
    }

    fn id(&self, name: &str) -> String {
        if self.namespaced() {
            format!("minecraft:{}", name)
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for SerializationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SerializationTarget {
    type Err = ApiError;

    /// Accepts `1.20.5`, `1_20_5` or `v1_20_5`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches(['v', 'V']).replace('_', ".");
        SerializationTarget::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ApiError::InvalidTarget(s.to_string()))
    }
}

/// Render a record with the default placement
pub fn serialize(record: &StoredRecord, target: SerializationTarget) -> String {
    serialize_placed(record, target, (0, 0))
}

/// Render a record; signage is placed at `placement` relative to the caller
pub fn serialize_placed(
    record: &StoredRecord,
    target: SerializationTarget,
    placement: Placement,
) -> String {
    match record.kind {
        ArtifactKind::MultiPageDocument => document_command(record, target),
        ArtifactKind::SignageBoard => sign_command(record, target, placement),
    }
}

fn document_command(record: &StoredRecord, target: SerializationTarget) -> String {
    let pages: Vec<String> = record.pages.iter().map(|p| embed(p, target)).collect();
    let content = format!(
        "{{title:{},author:{},generation:{},pages:[{}]}}",
        plain_string(record.title.as_deref().unwrap_or(DEFAULT_TITLE)),
        plain_string(record.author.as_deref().unwrap_or(DEFAULT_AUTHOR)),
        record.precedence,
        pages.join(",")
    );
    match target {
        SerializationTarget::V1_12 => format!("give @p written_book 1 0 {}", content),
        SerializationTarget::V1_13 | SerializationTarget::V1_14 => {
            format!("give @p {}{}", target.id("written_book"), content)
        }
        SerializationTarget::V1_20_5 => format!(
            "give @p {}[{}={}]",
            target.id("written_book"),
            target.id("written_book_content"),
            content
        ),
    }
}

/// Exactly `LINES_PER_FACE` embedded lines for face `face` of a sign
pub fn face_lines(record: &StoredRecord, face: usize, target: SerializationTarget) -> Vec<String> {
    (0..LINES_PER_FACE)
        .map(|line| {
            let text = record
                .pages
                .get(face * LINES_PER_FACE + line)
                .map(String::as_str)
                .unwrap_or(EMPTY_TEXT);
            embed(text, target)
        })
        .collect()
}

fn sign_command(record: &StoredRecord, target: SerializationTarget, placement: Placement) -> String {
    let (a, b) = placement;
    let position = format!("~{} ~ ~{}", a, b);
    match target {
        SerializationTarget::V1_20_5 => format!(
            "setblock {} {}{{front_text:{{messages:[{}]}},back_text:{{messages:[{}]}}}}",
            position,
            target.id("oak_sign"),
            face_lines(record, 0, target).join(","),
            face_lines(record, 1, target).join(",")
        ),
        _ => {
            let lines: Vec<String> = face_lines(record, 0, target)
                .into_iter()
                .enumerate()
                .map(|(i, line)| format!("Text{}:{}", i + 1, line))
                .collect();
            let block = match target {
                SerializationTarget::V1_12 => "standing_sign 0 replace ".to_string(),
                SerializationTarget::V1_13 => target.id("sign"),
                _ => target.id("oak_sign"),
            };
            format!("setblock {} {}{{{}}}", position, block, lines.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;

    fn record(kind: ArtifactKind, title: Option<&str>, pages: &[&str]) -> StoredRecord {
        let artifact = Artifact::new(
            kind,
            title.map(str::to_string),
            None,
            1,
            pages.iter().map(|p| p.to_string()).collect(),
            "test".to_string(),
        );
        StoredRecord::from_artifact(&artifact, 0)
    }

    #[test]
    fn test_target_from_str() {
        assert_eq!("1.20.5".parse::<SerializationTarget>().unwrap(), SerializationTarget::V1_20_5);
        assert_eq!("v1_13".parse::<SerializationTarget>().unwrap(), SerializationTarget::V1_13);
        assert_eq!("1_14".parse::<SerializationTarget>().unwrap(), SerializationTarget::V1_14);
        assert!("1.16".parse::<SerializationTarget>().is_err());
        assert_eq!(SerializationTarget::V1_20_5.file_stem(), "1_20_5");
    }

    #[test]
    fn test_document_commands_per_target() {
        let book = record(ArtifactKind::MultiPageDocument, Some("Log"), &["hi"]);
        assert_eq!(
            serialize(&book, SerializationTarget::V1_12),
            r#"give @p written_book 1 0 {title:"Log",author:"Unknown",generation:1,pages:["{\"text\":\"hi\"}"]}"#
        );
        assert_eq!(
            serialize(&book, SerializationTarget::V1_14),
            r#"give @p minecraft:written_book{title:"Log",author:"Unknown",generation:1,pages:['{"text":"hi"}']}"#
        );
        assert_eq!(
            serialize(&book, SerializationTarget::V1_20_5),
            r#"give @p minecraft:written_book[minecraft:written_book_content={title:"Log",author:"Unknown",generation:1,pages:['{"text":"hi"}']}]"#
        );
    }

    #[test]
    fn test_missing_title_defaults() {
        let book = record(ArtifactKind::MultiPageDocument, None, &["x"]);
        assert!(serialize(&book, SerializationTarget::V1_13).contains(r#"title:"Untitled""#));
    }

    #[test]
    fn test_sign_faces_always_full() {
        let sign = record(ArtifactKind::SignageBoard, None, &[r#"{"text":"one"}"#]);
        for target in SerializationTarget::ALL {
            for face in 0..2 {
                assert_eq!(face_lines(&sign, face, target).len(), LINES_PER_FACE);
            }
        }
        let legacy = serialize_placed(&sign, SerializationTarget::V1_13, (3, 1));
        assert_eq!(
            legacy,
            r#"setblock ~3 ~ ~1 minecraft:sign{Text1:"{\"text\":\"one\"}",Text2:"{\"text\":\"\"}",Text3:"{\"text\":\"\"}",Text4:"{\"text\":\"\"}"}"#
        );
        let modern = serialize(&sign, SerializationTarget::V1_20_5);
        assert_eq!(modern.matches(r#"'{"text":""}'"#).count(), 7);
    }

    #[test]
    fn test_v1_12_sign_uses_legacy_block() {
        let sign = record(ArtifactKind::SignageBoard, None, &["plain"]);
        assert!(serialize(&sign, SerializationTarget::V1_12)
            .starts_with("setblock ~0 ~ ~0 standing_sign 0 replace {Text1:"));
    }
}
