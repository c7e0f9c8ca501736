//! Documentation tag parsing
//!
//! Comments are first normalized by [`cleanup_comment`], which removes the
//! common ` * ` gutter (or common indentation) from every line. [`parse_tags`]
//! then pulls out the known tags and splits the remaining prose into a
//! description and further comments.
//!
//! Recognized tags:
//! - `@file`, `@brief`, `@defgroup`, `@ingroup`: rest of the line, first one wins
//! - `@param NAME text`: runs to the next tag, first per name wins
//! - `@return text` / `@returns text`: runs to the next tag
//!
//! A tag is an `@word` at the start of the comment or after whitespace, so
//! several tags may share one line. Tag names are case-sensitive. Every tag
//! is optional.

use docgraph_parser_api::FileTags;
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)@(\w+)(?:\[[^\]]*\])?").unwrap());
static RE_GUTTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\s*)(\*+)([ \t]*)").unwrap());

/// Tags and prose extracted from one comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTags {
    pub file_tags: FileTags,
    /// `@param` texts by name, in order of first appearance
    pub params: Vec<(String, String)>,
    pub returns: Option<String>,
    /// First paragraph of the prose
    pub description: String,
    /// Remaining paragraphs
    pub comments: String,
}

impl DocTags {
    /// Text of the `@param` with this exact name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    /// Empty, or nothing but a star gutter
    Blank,
    /// Gutter followed by content; holds the padding after the stars
    Gutter(usize),
    Plain,
}

fn classify_line(line: &str) -> LineClass {
    if line.trim().is_empty() {
        return LineClass::Blank;
    }
    match RE_GUTTER.captures(line) {
        Some(caps) => {
            let matched = caps.get(0).map_or(0, |m| m.end());
            if line[matched..].trim().is_empty() {
                LineClass::Blank
            } else {
                LineClass::Gutter(caps.get(3).map_or(0, |m| m.as_str().len()))
            }
        }
        None => LineClass::Plain,
    }
}

/// Remove the comment gutter or common indentation from every line
///
/// Text that starts on the comment's opening line is treated as if it sat
/// behind the same gutter as the lines that follow it.
pub fn cleanup_comment(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.lines().collect();
    let opener_text = lines.first().is_some_and(|l| !l.trim().is_empty());

    while lines.last().is_some_and(|l| classify_line(l) == LineClass::Blank) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }

    let (first, rest): (Option<String>, &[&str]) = if opener_text {
        (Some(lines[0].trim().to_string()), &lines[1..])
    } else {
        (None, &lines[..])
    };

    let classes: Vec<LineClass> = rest.iter().map(|l| classify_line(l)).collect();
    let has_gutter = classes.iter().any(|c| matches!(c, LineClass::Gutter(_)))
        || rest.iter().any(|l| l.trim_start().starts_with('*'));
    let all_prefixed = classes.iter().all(|c| *c != LineClass::Plain);

    let body: Vec<String> = if has_gutter && all_prefixed {
        let pad = classes
            .iter()
            .filter_map(|c| match c {
                LineClass::Gutter(p) => Some(*p),
                _ => None,
            })
            .min()
            .unwrap_or(0);
        rest.iter()
            .zip(&classes)
            .map(|(line, class)| match class {
                LineClass::Blank => String::new(),
                _ => strip_gutter(line, pad),
            })
            .collect()
    } else {
        let indent = rest
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);
        rest.iter()
            .map(|l| {
                if l.trim().is_empty() {
                    String::new()
                } else {
                    l.get(indent..).unwrap_or(l.trim_start()).trim_end().to_string()
                }
            })
            .collect()
    };

    first
        .into_iter()
        .chain(body)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn strip_gutter(line: &str, pad: usize) -> String {
    let Some(caps) = RE_GUTTER.captures(line) else {
        return line.trim_end().to_string();
    };
    let stars_end = caps.get(2).map_or(0, |m| m.end());
    let after = &line[stars_end..];
    let skip = after
        .char_indices()
        .take(pad)
        .take_while(|(_, c)| *c == ' ' || *c == '\t')
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    after[skip..].trim_end().to_string()
}

/// Extract tags, description and comments from a cleaned comment
pub fn parse_tags(comment: &str) -> DocTags {
    let mut tags = DocTags::default();
    let mut prose = String::new();

    // (offset of '@', tag name, offset where the tag's text starts)
    let marks: Vec<(usize, &str, usize)> = RE_TAG
        .captures_iter(comment)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            Some((name.start() - 1, name.as_str(), caps.get(0)?.end()))
        })
        .collect();

    let first = marks.first().map_or(comment.len(), |(at, _, _)| *at);
    prose.push_str(&comment[..first]);

    for (i, &(at, tag, body_start)) in marks.iter().enumerate() {
        let end = marks.get(i + 1).map_or(comment.len(), |(next, _, _)| *next);
        let body = &comment[body_start..end];
        match tag {
            "param" | "return" | "returns" => add_block(&mut tags, tag, body),
            "file" | "brief" | "defgroup" | "ingroup" => {
                let (value, rest) = match body.split_once('\n') {
                    Some((value, rest)) => (value, Some(rest)),
                    None => (body, None),
                };
                let slot = match tag {
                    "file" => &mut tags.file_tags.file,
                    "brief" => &mut tags.file_tags.brief,
                    "defgroup" => &mut tags.file_tags.defgroup,
                    _ => &mut tags.file_tags.ingroup,
                };
                set_first(slot, value.trim());
                if let Some(rest) = rest {
                    prose.push('\n');
                    prose.push_str(rest);
                }
            }
            _ => prose.push_str(&comment[at..end]),
        }
    }

    let (description, comments) = split_paragraph(prose.trim());
    tags.description = description;
    tags.comments = comments;
    tags
}

fn set_first(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

fn add_block(tags: &mut DocTags, tag: &str, body: &str) {
    let text = normalize_whitespace(body);

    if tag == "param" {
        let (name, rest) = match text.split_once(' ') {
            Some((name, rest)) => (name, rest),
            None => (text.as_str(), ""),
        };
        if name.is_empty() || tags.param(name).is_some() {
            return;
        }
        tags.params.push((name.to_string(), rest.to_string()));
    } else if tags.returns.is_none() {
        tags.returns = Some(text);
    }
}

/// Split prose at its first blank line
fn split_paragraph(prose: &str) -> (String, String) {
    let lines: Vec<&str> = prose.lines().collect();
    match lines.iter().position(|l| l.trim().is_empty()) {
        Some(i) => (
            lines[..i].join("\n").trim().to_string(),
            lines[i..].join("\n").trim().to_string(),
        ),
        None => (prose.trim().to_string(), String::new()),
    }
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
