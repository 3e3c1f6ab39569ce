//! Loop block scanner.
//!
//! `{{#key}}...{{/key}}` needs the closing key to match the opening one,
//! which a backreference-free regex cannot express, so blocks are found with
//! a small hand-written scan. Simple tokens are matched with [`TOKEN`].

use once_cell::sync::Lazy;
use regex::Regex;

/// `{{key}}`, capturing the key.
pub(crate) static TOKEN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{\{(\w+)\}\}").expect("token pattern is valid")
});

/// A piece of template text at one nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Text with no complete loop block in it
    Text(&'a str),
    /// A complete loop block
    Loop {
        key: &'a str,
        body: &'a str,
        /// The whole block including both tokens
        raw: &'a str,
    },
}

/// Split `template` into text and loop blocks.
///
/// Blocks are matched non-greedily: the first `{{/key}}` after `{{#key}}`
/// closes it. An opening token without a close stays in the surrounding
/// text and scanning resumes right after it.
pub(crate) fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(found) = template[cursor..].find("{{#") {
        let open_start = cursor + found;
        let Some((key, open_end)) = open_token(template, open_start) else {
            cursor = open_start + 3;
            continue;
        };
        let close = format!("{{{{/{key}}}}}");
        let Some(close_at) = template[open_end..].find(&close) else {
            cursor = open_end;
            continue;
        };
        let close_start = open_end + close_at;
        let block_end = close_start + close.len();

        if text_start < open_start {
            out.push(Segment::Text(&template[text_start..open_start]));
        }
        out.push(Segment::Loop {
            key,
            body: &template[open_end..close_start],
            raw: &template[open_start..block_end],
        });
        text_start = block_end;
        cursor = block_end;
    }

    if text_start < template.len() {
        out.push(Segment::Text(&template[text_start..]));
    }
    out
}

/// Parse `{{#key}}` at `start`, returning the key and the offset after `}}`.
fn open_token(template: &str, start: usize) -> Option<(&str, usize)> {
    let rest = &template[start + 3..];
    let key_len = rest
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if key_len == 0 || !rest[key_len..].starts_with("}}") {
        return None;
    }
    Some((&rest[..key_len], start + 3 + key_len + 2))
}
