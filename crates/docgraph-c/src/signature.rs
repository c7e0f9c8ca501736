//! Function signature extraction
//!
//! Turns the text of a function-shaped declaration into a return type, a
//! typed argument list and the canonical signature string. Splitting only
//! happens on top-level commas, so a function pointer argument keeps its
//! own parameter list intact.

use crate::segmenter::InlineComment;
use crate::tags::{normalize_whitespace, DocTags};
use docgraph_parser_api::Argument;
use regex::Regex;
use std::sync::LazyLock;

static RE_FNPTR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\*\s*(\w+)\s*\)\s*\(").unwrap());
static RE_TRAILING_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\b([A-Za-z_]\w*)\s*((?:\[[^\]]*\]\s*)*)$").unwrap());
static RE_MACRO_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\s*\(([^()]+)\)\s*$").unwrap());
static RE_STORAGE_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:extern|static|inline)\b").unwrap());
static RE_IDENTIFIER_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w])([A-Za-z_]\w*)\s*$").unwrap());
static RE_PAREN_PADDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s+|\s+\)").unwrap());

/// A function-shaped declaration split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub name: String,
    pub return_type: String,
    /// Text between the outer argument parentheses, as written
    pub argline: String,
}

/// Find `RET NAME(ARGS)` in a declaration ending in `;` or a `{` body
///
/// The argument list is the paren-balanced group that closes the
/// prototype; `NAME` is the identifier right before it.
pub fn split_prototype(code: &str) -> Option<Prototype> {
    let proto = declaration_head(code)?.trim();
    if !proto.ends_with(')') {
        return None;
    }

    let open = matching_open_paren(proto)?;
    let head = &proto[..open];
    let caps = RE_IDENTIFIER_END.captures(head)?;
    let name_match = caps.get(1)?;
    let name = name_match.as_str().to_string();

    let return_type = clean_return_type(&head[..name_match.start()]);
    if return_type.is_empty() {
        return None;
    }

    let argline = proto[open + 1..proto.len() - 1].trim().to_string();
    Some(Prototype {
        name,
        return_type,
        argline,
    })
}

/// Text before the first top-level `;` or `{`, if the declaration has one
fn declaration_head(code: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (i, c) in code.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' | '{' if depth == 0 => return Some(&code[..i]),
            _ => {}
        }
    }
    None
}

/// Byte offset of the `(` matching the final `)` of `text`
fn matching_open_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strip one level of macro wrapping and storage keywords from a return type
///
/// `GIT_EXTERN(const char *)` becomes `const char *`; `extern int` becomes `int`.
pub fn clean_return_type(raw: &str) -> String {
    let raw = raw.trim();
    let unwrapped = match RE_MACRO_WRAPPER.captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
        None => raw,
    };
    let stripped = RE_STORAGE_KEYWORDS.replace_all(unwrapped, " ");
    normalize_type(&stripped)
}

/// Collapse whitespace and attach trailing pointer stars as ` *`
///
/// `char*`, `char *` and `char  *` all become `char *`.
pub fn normalize_type(ty: &str) -> String {
    let ty = normalize_whitespace(ty);
    let base = ty.trim_end_matches(|c: char| c == '*' || c.is_whitespace());
    let stars = ty[base.len()..].chars().filter(|c| *c == '*').count();
    if stars == 0 || base.is_empty() {
        return ty;
    }
    format!("{} {}", base, "*".repeat(stars))
}

/// Split on commas that are not nested inside parentheses or brackets
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parse one argument declaration
///
/// Returns `None` for an empty piece or a bare `void`.
pub fn parse_argument(piece: &str) -> Option<Argument> {
    let text = normalize_whitespace(piece);
    if text.is_empty() || text == "void" {
        return None;
    }
    if text == "..." {
        return Some(Argument::new("...", "..."));
    }

    if let Some(caps) = RE_FNPTR_NAME.captures(&text) {
        let name = caps.get(1)?.as_str();
        let pattern = format!(r"\(\s*\*\s*{}\s*\)", regex::escape(name));
        let type_name = Regex::new(&pattern)
            .map(|re| re.replace(&text, "(*)").into_owned())
            .unwrap_or_else(|_| text.clone());
        let type_name = RE_PAREN_PADDING.replace_all(&type_name, |caps: &regex::Captures| {
            caps[0].trim().to_string()
        });
        return Some(Argument::new(name, normalize_whitespace(&type_name)));
    }

    if text.ends_with('*') {
        return Some(Argument::new("", normalize_type(&text)));
    }

    match RE_TRAILING_NAME.captures(&text) {
        Some(caps) => {
            let before = caps.get(1).map_or("", |m| m.as_str()).trim();
            let name = caps.get(2).map_or("", |m| m.as_str());
            let dims: String = caps
                .get(3)
                .map_or("", |m| m.as_str())
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if before.is_empty() {
                // unnamed argument such as `int` in a prototype
                Some(Argument::new("", format!("{name}{dims}")))
            } else {
                Some(Argument::new(name, format!("{}{dims}", normalize_type(before))))
            }
        }
        None => Some(Argument::new("", text)),
    }
}

/// Parse a whole argument list; `void` or an empty list yields no arguments
pub fn parse_arguments(argline: &str) -> Vec<Argument> {
    split_top_level(argline)
        .into_iter()
        .filter_map(parse_argument)
        .collect()
}

/// Attach `@param` and inline documentation to arguments by name
///
/// Returns the `@param` names that matched no argument.
pub fn bind_docs(args: &mut [Argument], tags: &DocTags, inlines: &[InlineComment]) -> Vec<String> {
    for arg in args.iter_mut().filter(|a| !a.name.is_empty()) {
        arg.comment = tags
            .param(&arg.name)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        for inline in inlines.iter().filter(|i| ends_with_word(&i.line, &arg.name)) {
            arg.comment = Some(match arg.comment.take() {
                Some(existing) => format!("{existing}\n{}", inline.comment),
                None => inline.comment.clone(),
            });
        }
    }

    tags.params
        .iter()
        .filter(|(name, _)| !args.iter().any(|a| &a.name == name))
        .map(|(name, _)| name.clone())
        .collect()
}

/// `line` ends with `word` preceded by a non-identifier boundary
pub(crate) fn ends_with_word(line: &str, word: &str) -> bool {
    let Some(prefix) = line.strip_suffix(word) else {
        return false;
    };
    !word.is_empty()
        && prefix
            .chars()
            .last()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
}
