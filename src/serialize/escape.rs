//! Two-stage text escaping and its inverse.
//!
//! Stage one brings a page into structural-text form; stage two escapes it
//! for the target's outer quote. Stage two must escape backslashes before
//! quotes, otherwise the backslashes it adds for quotes get doubled. Raw line
//! breaks, which verbatim structural text can still carry, become `\n`/`\r`
//! so every command stays on one line.

use super::SerializationTarget;

/// Leading characters of text that is already structural
pub const STRUCTURAL_DELIMITERS: [char; 3] = ['{', '[', '"'];

const WRAP_PREFIX: &str = r#"{"text":""#;
const WRAP_SUFFIX: &str = r#""}"#;

pub fn is_structural(text: &str) -> bool {
    text.starts_with(STRUCTURAL_DELIMITERS)
}

/// Stage one: structural text is kept verbatim, anything else is wrapped
/// into `{"text":"..."}`
pub fn structural_text(text: &str) -> String {
    if is_structural(text) {
        return text.to_string();
    }
    let mut wrapped = String::with_capacity(text.len() + WRAP_PREFIX.len() + WRAP_SUFFIX.len());
    wrapped.push_str(WRAP_PREFIX);
    for c in text.chars() {
        match c {
            '\\' => wrapped.push_str("\\\\"),
            '"' => wrapped.push_str("\\\""),
            '\n' => wrapped.push_str("\\n"),
            '\r' => wrapped.push_str("\\r"),
            other => wrapped.push(other),
        }
    }
    wrapped.push_str(WRAP_SUFFIX);
    wrapped
}

/// Stage two: escape for the target's outer quote, in the target's order
pub fn escape_outer(text: &str, target: SerializationTarget) -> String {
    let escaped = target
        .escape_order()
        .iter()
        .fold(text.to_string(), |acc, c| acc.replace(*c, &format!("\\{}", c)));
    escape_line_breaks(&escaped)
}

/// Must run after backslashes are escaped
fn escape_line_breaks(text: &str) -> String {
    text.replace('\n', "\\n").replace('\r', "\\r")
}

/// Stage three: escape and wrap in the target's quote character
pub fn quote(text: &str, target: SerializationTarget) -> String {
    let q = target.quote_char();
    format!("{}{}{}", q, escape_outer(text, target), q)
}

/// All three stages for one page
pub fn embed(text: &str, target: SerializationTarget) -> String {
    quote(&structural_text(text), target)
}

/// Double-quoted plain string, for titles and authors
pub fn plain_string(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escape_line_breaks(&escaped))
}

/// Inverse of `quote`: strip the outer quotes and undo stage two.
/// `None` when the input is not a quoted string for this target.
pub fn unescape_outer(quoted: &str, target: SerializationTarget) -> Option<String> {
    let q = target.quote_char();
    let inner = quoted.strip_prefix(q)?.strip_suffix(q)?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                other => out.push(other),
            }
        } else if c == q {
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Inverse of `structural_text`: recover the wrapped text, or return
/// verbatim structural text unchanged.
pub fn unwrap_structural(text: &str) -> String {
    let Some(inner) = text
        .strip_prefix(WRAP_PREFIX)
        .and_then(|rest| rest.strip_suffix(WRAP_SUFFIX))
    else {
        return text.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => return text.to_string(),
        }
    }
    // Only a wrap this stage would have produced is unwrapped
    if structural_text(&out) == text {
        out
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_structural_text_kept_verbatim() {
        assert_eq!(structural_text(r#"{"text":"x"}"#), r#"{"text":"x"}"#);
        assert_eq!(structural_text(r#"["a"]"#), r#"["a"]"#);
        assert_eq!(structural_text(r#""quoted""#), r#""quoted""#);
        assert_eq!(structural_text("plain"), r#"{"text":"plain"}"#);
        assert_eq!(structural_text(""), r#"{"text":""}"#);
    }

    #[test]
    fn test_wrap_escapes_backslash_quote_newline() {
        assert_eq!(
            structural_text("a\\b \"c\"\nd"),
            r#"{"text":"a\\b \"c\"\nd"}"#
        );
    }

    #[test]
    fn test_escape_order_matters() {
        let raw = "He said \"hi\"\n";
        let stage_one = structural_text(raw);
        let correct = escape_outer(&stage_one, SerializationTarget::V1_13);
        let wrong = stage_one.replace('"', "\\\"").replace('\\', "\\\\");
        assert_ne!(correct, wrong);
        assert_eq!(correct, r#"{\"text\":\"He said \\\"hi\\\"\\n\"}"#);

        let quoted = quote(&stage_one, SerializationTarget::V1_13);
        let back = unescape_outer(&quoted, SerializationTarget::V1_13).unwrap();
        assert_eq!(unwrap_structural(&back), raw);
    }

    #[test]
    fn test_single_quote_target_leaves_double_quotes() {
        let quoted = embed("it's \"x\"", SerializationTarget::V1_14);
        assert_eq!(quoted, r#"'{"text":"it\'s \\"x\\""}'"#);
    }

    #[test]
    fn test_unescape_rejects_bare_quote() {
        assert!(unescape_outer("\"a\"b\"", SerializationTarget::V1_12).is_none());
        assert!(unescape_outer("'a'", SerializationTarget::V1_12).is_none());
    }

    #[test]
    fn test_line_breaks_in_structural_text_stay_on_one_line() {
        let page = "[TODO]\nbuy milk\r";
        for target in SerializationTarget::ALL {
            let quoted = embed(page, target);
            assert!(!quoted.contains('\n') && !quoted.contains('\r'));
            assert_eq!(unescape_outer(&quoted, target).unwrap(), page);
        }
        assert_eq!(plain_string("two\nlines"), r#""two\nlines""#);
    }

    #[test]
    fn test_unwrap_leaves_rich_text() {
        let rich = r#"{"text":"a","bold":true}"#;
        assert_eq!(unwrap_structural(rich), rich);
    }

    proptest! {
        #[test]
        fn prop_escape_round_trip(text in "[a-z0-9 '\"\\\\\n]{0,40}") {
            prop_assume!(!is_structural(&text));
            for target in SerializationTarget::ALL {
                let quoted = embed(&text, target);
                let outer = unescape_outer(&quoted, target).unwrap();
                prop_assert_eq!(unwrap_structural(&outer), text.clone());
            }
        }

        #[test]
        fn prop_structural_text_survives_outer_escape(body in "[a-z\\\\\"' \n\r]{0,20}") {
            let text = format!("[{}]", body);
            for target in SerializationTarget::ALL {
                let outer = unescape_outer(&embed(&text, target), target).unwrap();
                prop_assert_eq!(outer, text.clone());
            }
        }
    }
}
