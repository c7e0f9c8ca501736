//! Declaration classification
//!
//! Each documented chunk is matched against the declaration shapes in a
//! fixed order, first match wins:
//!
//! 1. `#define` (function-like macro, single constant, or a run of constants)
//! 2. `enum { ... }`, optionally typedef'd
//! 3. `struct { ... }`, optionally typedef'd, or the opaque `typedef struct A B;`
//! 4. `typedef RET (*NAME)(ARGS);` function pointer
//! 5. any other `typedef`
//! 6. function prototype or inline definition
//! 7. file-level documentation (catch-all)

use crate::segmenter::{DeclarationChunk, InlineComment};
use crate::signature::{
    bind_docs, clean_return_type, ends_with_word, normalize_type, parse_argument,
    parse_arguments, split_prototype, split_top_level,
};
use crate::tags::{normalize_whitespace, DocTags};
use docgraph_parser_api::{
    AggregateRecord, Argument, Constant, Declaration, DefineRecord, Field, FileDocRecord,
    FunctionRecord, Location, MacroRecord, ParserConfig, TypedefRecord,
};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static RE_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*define\s+(\w+)\(([^)]*)\)\s*(.*)$").unwrap());
static RE_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*define\s+(\w+)\s*(.*)$").unwrap());
static RE_ENUM_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(typedef\s+)?enum(?:\s+\w+)?$").unwrap());
static RE_STRUCT_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(typedef\s+)?struct(?:\s+(\w+))?$").unwrap());
static RE_OPAQUE_STRUCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^typedef\s+struct\s+\w+\s+(\w+)\s*;").unwrap());
static RE_TYPEDEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^typedef\s+(.+?)\s*;").unwrap());
static RE_FNPTR_TYPEDEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)\(\s*\*\s*(\w+)\s*\)\s*\((.*)\)$").unwrap());
static RE_LAST_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_]\w*)[^\w]*$").unwrap());

/// Type recorded for enumerators
const ENUMERATOR_TYPE: &str = "int";

/// Turn one documented chunk into a declaration record
pub fn classify(
    chunk: &DeclarationChunk,
    tags: &DocTags,
    file: &str,
    config: &ParserConfig,
) -> Declaration {
    let location = Location::new(file, chunk.start_line, chunk.end_line);
    let code = chunk.code.trim();

    let declaration = detect_define(code, tags, &location)
        .or_else(|| detect_enum(code, chunk, tags, &location, config))
        .or_else(|| detect_struct(code, chunk, tags, &location))
        .or_else(|| detect_typedef(code, chunk, tags, &location))
        .or_else(|| detect_function(code, chunk, tags, &location))
        .unwrap_or_else(|| file_doc(tags, location.clone()));

    debug!(
        "{}:{} classified as {} {}",
        file,
        chunk.start_line,
        declaration.kind(),
        declaration.name().unwrap_or("<unnamed>")
    );
    declaration
}

fn file_doc(tags: &DocTags, location: Location) -> Declaration {
    Declaration::File(FileDocRecord {
        location,
        tags: tags.file_tags.clone(),
        description: tags.description.clone(),
        comments: tags.comments.clone(),
    })
}

/// Join continuation lines so every `#define` is on one logical line
fn logical_define_lines(code: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in code.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match lines.last_mut() {
            Some(last) if !line.starts_with('#') => {
                last.push(' ');
                last.push_str(line);
            }
            _ => lines.push(line.to_string()),
        }
    }
    lines
}

fn detect_define(code: &str, tags: &DocTags, location: &Location) -> Option<Declaration> {
    if !code.starts_with('#') {
        return None;
    }
    let lines = logical_define_lines(code);
    let first = lines.first()?;

    if let Some(caps) = RE_MACRO.captures(first) {
        let name = caps.get(1)?.as_str();
        let params = normalize_whitespace(caps.get(2).map_or("", |m| m.as_str()));
        return Some(Declaration::Macro(MacroRecord {
            name: name.to_string(),
            location: location.clone(),
            decl: format!("{name}({params})"),
            value: normalize_whitespace(caps.get(3).map_or("", |m| m.as_str())),
            description: tags.description.clone(),
            comments: tags.comments.clone(),
        }));
    }

    let mut members: Vec<Constant> = Vec::new();
    for line in &lines {
        let Some(caps) = RE_DEFINE.captures(line) else {
            continue;
        };
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if members.iter().any(|c| c.name == name) {
            continue;
        }
        let value = normalize_whitespace(caps.get(2).map_or("", |m| m.as_str()));
        members.push(Constant::new(name, (!value.is_empty()).then_some(value)));
    }
    if members.is_empty() {
        return None;
    }

    let name = match members.as_slice() {
        [single] => Some(single.name.clone()),
        _ => None,
    };
    Some(Declaration::Define(DefineRecord {
        name,
        location: location.clone(),
        members,
        description: tags.description.clone(),
        comments: tags.comments.clone(),
    }))
}

/// A `HEAD { BODY } TAIL` declaration split at its outermost braces
struct Braced<'a> {
    head: String,
    body: &'a str,
    /// Declarator after the closing brace, without the `;`
    tail: String,
}

fn split_braced(code: &str) -> Option<Braced<'_>> {
    let open = code.find('{')?;
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in code[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    let tail = code[close + 1..].split(';').next().unwrap_or("");
    Some(Braced {
        head: normalize_whitespace(&code[..open]),
        body: &code[open + 1..close],
        tail: normalize_whitespace(tail),
    })
}

/// Identifier declared by a trailing declarator such as `git_foo` or `*git_foo_t`
fn declarator_name(tail: &str) -> Option<String> {
    RE_LAST_IDENTIFIER
        .captures(tail)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn inline_for<'a>(inlines: &'a [InlineComment], matches: impl Fn(&str) -> bool) -> Option<String> {
    let texts: Vec<&'a str> = inlines
        .iter()
        .filter(|i| matches(&normalize_whitespace(&i.line)))
        .map(|i| i.comment.as_str())
        .collect();
    (!texts.is_empty()).then(|| texts.join("\n"))
}

fn detect_enum(
    code: &str,
    chunk: &DeclarationChunk,
    tags: &DocTags,
    location: &Location,
    config: &ParserConfig,
) -> Option<Declaration> {
    let braced = split_braced(code)?;
    let caps = RE_ENUM_HEAD.captures(&braced.head)?;
    let is_typedef = caps.get(1).is_some();

    let pieces: Vec<String> = split_top_level(braced.body)
        .into_iter()
        .map(normalize_whitespace)
        .filter(|p| !p.is_empty())
        .collect();

    let fields: Vec<Field> = pieces
        .iter()
        .map(|piece| {
            let (name, value) = match piece.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim())),
                None => (piece.as_str(), None),
            };
            let mut field = Field::new(name, ENUMERATOR_TYPE);
            field.value = value.map(str::to_string);
            field.comment = inline_for(&chunk.inlines, |line| {
                line == piece.as_str() || starts_with_word(line, name)
            });
            field
        })
        .collect();

    let name = declarator_name(&braced.tail).or_else(|| {
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        synthesized_enum_name(&names, config.min_enum_prefix_segments)
    });

    let mut record = AggregateRecord::new(name, location.clone());
    record.block = fields
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    record.fields = fields;
    record.is_typedef = is_typedef;
    record.description = tags.description.clone();
    record.comments = tags.comments.clone();
    Some(Declaration::Enum(record))
}

/// Name an anonymous enum after the prefix its enumerators share
///
/// `GIT_OBJ_ANY, GIT_OBJ_BAD` gives `GIT_OBJ`. A prefix with fewer than
/// `min_segments` underscore-separated parts is too generic to name a type.
pub fn synthesized_enum_name(names: &[&str], min_segments: usize) -> Option<String> {
    let prefix = shortest_common_prefix(names)?;
    let prefix = prefix.trim_end_matches('_');
    let segments = prefix.split('_').filter(|s| !s.is_empty()).count();
    if prefix.is_empty() || segments < min_segments {
        return None;
    }
    Some(prefix.to_string())
}

fn shortest_common_prefix<'a>(names: &[&'a str]) -> Option<&'a str> {
    let (first, rest) = names.split_first()?;
    let mut len = first.len();
    for name in rest {
        len = first
            .char_indices()
            .zip(name.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(len);
    }
    Some(&first[..len])
}

fn starts_with_word(line: &str, word: &str) -> bool {
    line.strip_prefix(word).is_some_and(|rest| {
        !word.is_empty()
            && rest
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}

fn detect_struct(
    code: &str,
    chunk: &DeclarationChunk,
    tags: &DocTags,
    location: &Location,
) -> Option<Declaration> {
    let mut record = match split_braced(code) {
        Some(braced) => {
            let caps = RE_STRUCT_HEAD.captures(&braced.head)?;
            let is_typedef = caps.get(1).is_some();
            let tag = caps.get(2).map(|m| m.as_str().to_string());
            let name = declarator_name(&braced.tail).or(tag);

            let members: Vec<String> = split_members(braced.body)
                .into_iter()
                .map(normalize_whitespace)
                .filter(|m| !m.is_empty())
                .collect();

            let mut record = AggregateRecord::new(name, location.clone());
            record.is_typedef = is_typedef;
            record.fields = members
                .iter()
                .flat_map(|member| struct_fields(member))
                .map(|mut field| {
                    field.comment =
                        inline_for(&chunk.inlines, |line| member_declares(line, &field.name));
                    field
                })
                .collect();
            record.block = members.join("\n");
            record
        }
        None => {
            let caps = RE_OPAQUE_STRUCT.captures(code)?;
            let name = caps.get(1)?.as_str().to_string();
            let mut record = AggregateRecord::new(Some(name), location.clone());
            record.is_typedef = true;
            record
        }
    };

    record.description = tags.description.clone();
    record.comments = tags.comments.clone();
    Some(Declaration::Struct(record))
}

/// Split a struct body on `;` outside nested braces and parentheses
fn split_members(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// A member line such as `int x`, `char id[20]` or `unsigned flag : 1` declares `name`
fn member_declares(line: &str, name: &str) -> bool {
    if line.contains("(*") || line.contains("( *") {
        return parse_argument(line).is_some_and(|arg| arg.name == name);
    }
    let decl = match line.rsplit_once(':') {
        Some((decl, _width)) if !decl.contains('(') => decl,
        _ => line,
    };
    let decl = match decl.find('[') {
        Some(i) => &decl[..i],
        None => decl,
    };
    decl.split(',').any(|d| ends_with_word(d.trim_end(), name))
}

/// Fields declared by one struct member, e.g. `int x, *y` or `unsigned flag : 1`
fn struct_fields(member: &str) -> Vec<Field> {
    let (decl, width) = match member.rsplit_once(':') {
        Some((decl, width)) if !decl.contains('(') => (decl.trim(), Some(width.trim())),
        _ => (member, None),
    };

    let pieces = split_top_level(decl);
    let Some((first, rest)) = pieces.split_first() else {
        return Vec::new();
    };
    let Some(head) = parse_argument(first) else {
        return Vec::new();
    };

    let with_width = |arg: Argument| {
        let type_name = match width {
            Some(w) => format!("{}:{w}", arg.type_name),
            None => arg.type_name,
        };
        Field::new(arg.name, type_name)
    };

    let base = head
        .type_name
        .split('[')
        .next()
        .unwrap_or("")
        .trim_end_matches(|c: char| c == '*' || c.is_whitespace())
        .to_string();

    let mut fields = vec![with_width(head)];
    for piece in rest {
        let piece = piece.trim();
        let declarator = piece.trim_start_matches(|c: char| c == '*' || c.is_whitespace());
        let pointer = "*".repeat(piece[..piece.len() - declarator.len()].matches('*').count());
        if let Some(arg) = parse_argument(&format!("{base} {pointer}{declarator}")) {
            fields.push(with_width(arg));
        }
    }
    fields
}

fn detect_typedef(
    code: &str,
    chunk: &DeclarationChunk,
    tags: &DocTags,
    location: &Location,
) -> Option<Declaration> {
    let caps = RE_TYPEDEF.captures(code)?;
    let decl = caps.get(1)?.as_str().trim();

    if let Some(fnptr) = RE_FNPTR_TYPEDEF.captures(decl) {
        let name = fnptr.get(2)?.as_str();
        let return_type = clean_return_type(fnptr.get(1).map_or("", |m| m.as_str()));
        let argline = fnptr.get(3).map_or("", |m| m.as_str()).trim();
        let record = function_record(name, &return_type, argline, chunk, tags, location);
        return Some(Declaration::Fnptr(record));
    }

    let arg = parse_argument(decl)?;
    if arg.name.is_empty() {
        return None;
    }
    let mut record = TypedefRecord::new(arg.name, arg.type_name, location.clone());
    record.description = tags.description.clone();
    record.comments = tags.comments.clone();
    Some(Declaration::Typedef(record))
}

fn detect_function(
    code: &str,
    chunk: &DeclarationChunk,
    tags: &DocTags,
    location: &Location,
) -> Option<Declaration> {
    let proto = split_prototype(code)?;
    let record = function_record(
        &proto.name,
        &proto.return_type,
        &proto.argline,
        chunk,
        tags,
        location,
    );
    Some(Declaration::Function(record))
}

fn function_record(
    name: &str,
    return_type: &str,
    argline: &str,
    chunk: &DeclarationChunk,
    tags: &DocTags,
    location: &Location,
) -> FunctionRecord {
    let mut args = parse_arguments(argline);
    let unmatched = bind_docs(&mut args, tags, &chunk.inlines);

    let mut record = FunctionRecord::new(name, location.clone())
        .with_return(normalize_type(return_type))
        .with_args(args)
        .with_argline(argline);
    record.return_value.comment = tags.returns.clone().filter(|r| !r.is_empty());
    record.description = tags.description.clone();
    record.comments = tags.comments.clone();
    record.unmatched_params = unmatched;
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::parse_tags;

    fn chunk(code: &str) -> DeclarationChunk {
        DeclarationChunk {
            code: code.to_string(),
            raw_comment: String::new(),
            start_line: 1,
            end_line: 1,
            inlines: Vec::new(),
        }
    }

    fn run(code: &str, comment: &str) -> Declaration {
        classify(
            &chunk(code),
            &parse_tags(comment),
            "git2/test.h",
            &ParserConfig::default(),
        )
    }

    #[test]
    fn test_function() {
        let decl = run(
            "int add(int a, int b);",
            "Add two numbers.\n@param a first\n@param b second\n@return sum",
        );
        let Declaration::Function(f) = decl else {
            panic!("expected function");
        };
        assert_eq!(f.name, "add");
        assert_eq!(f.signature, "int::int");
        assert_eq!(f.return_value.type_name, "int");
        assert_eq!(f.return_value.comment.as_deref(), Some("sum"));
        assert_eq!(f.args[0].comment.as_deref(), Some("first"));
        assert_eq!(f.description, "Add two numbers.");
        assert_eq!(f.location.file, "git2/test.h");
    }

    #[test]
    fn test_unmatched_param_is_recorded() {
        let decl = run("int f(int a);", "@param b nothing");
        let Declaration::Function(f) = decl else {
            panic!("expected function");
        };
        assert_eq!(f.unmatched_params, vec!["b".to_string()]);
        assert_eq!(f.args[0].comment, None);
    }

    #[test]
    fn test_function_like_macro() {
        let decl = run(
            "#define GIT_OID_CMP(a, b) \n    git_oid_cmp(a, b)",
            "Compare two oids",
        );
        let Declaration::Macro(m) = decl else {
            panic!("expected macro");
        };
        assert_eq!(m.name, "GIT_OID_CMP");
        assert_eq!(m.decl, "GIT_OID_CMP(a, b)");
        assert_eq!(m.value, "git_oid_cmp(a, b)");
    }

    #[test]
    fn test_single_define() {
        let decl = run("#define GIT_OID_RAWSZ 20", "Size (in bytes) of a raw oid");
        let Declaration::Define(d) = decl else {
            panic!("expected define");
        };
        assert_eq!(d.name.as_deref(), Some("GIT_OID_RAWSZ"));
        assert_eq!(d.members, vec![Constant::new("GIT_OID_RAWSZ", Some("20".into()))]);
    }

    #[test]
    fn test_define_run_is_unnamed() {
        let decl = run(
            "#define GIT_PATH_LIST_SEPARATOR ':'\n#define GIT_PATH_MAX 4096\n#define GIT_PATH_MAX 4096",
            "Path constants",
        );
        let Declaration::Define(d) = decl else {
            panic!("expected define");
        };
        assert!(d.is_run());
        assert_eq!(d.name, None);
        assert_eq!(d.members.len(), 2);
        assert_eq!(d.members[0].value.as_deref(), Some("':'"));
    }

    #[test]
    fn test_typedef_enum_uses_alias() {
        let decl = run(
            "typedef enum {\n    GIT_OBJ_ANY = -2,\n    GIT_OBJ_BAD = -1,\n    GIT_OBJ_COMMIT = 1\n} git_otype;",
            "Basic type of any Git object.",
        );
        let Declaration::Enum(e) = decl else {
            panic!("expected enum");
        };
        assert_eq!(e.name.as_deref(), Some("git_otype"));
        assert!(e.is_typedef);
        assert_eq!(e.fields.len(), 3);
        assert_eq!(e.fields[0].name, "GIT_OBJ_ANY");
        assert_eq!(e.fields[0].value.as_deref(), Some("-2"));
        assert_eq!(e.fields[2].value.as_deref(), Some("1"));
        assert_eq!(e.block, "GIT_OBJ_ANY\nGIT_OBJ_BAD\nGIT_OBJ_COMMIT");
    }

    #[test]
    fn test_anonymous_enum_name_from_prefix() {
        let decl = run(
            "enum {\n    GIT_REPOSITORY_OPEN_NO_SEARCH = (1 << 0),\n    GIT_REPOSITORY_OPEN_CROSS_FS = (1 << 1),\n};",
            "Option flags",
        );
        assert_eq!(decl.name(), Some("GIT_REPOSITORY_OPEN"));
        let Declaration::Enum(e) = decl else {
            panic!("expected enum");
        };
        assert_eq!(e.fields[1].value.as_deref(), Some("(1 << 1)"));
    }

    #[test]
    fn test_generic_enum_prefix_left_unnamed() {
        let decl = run("enum {\n    GIT_OK = 0,\n    GIT_ERROR = -1\n};", "Errors");
        assert_eq!(decl.name(), None);
        assert!(matches!(decl, Declaration::Enum(_)));
    }

    #[test]
    fn test_enum_prefix_threshold_is_configurable() {
        let config = ParserConfig::default().with_min_enum_prefix_segments(1);
        let decl = classify(
            &chunk("enum {\n    GIT_OK = 0,\n    GIT_ERROR = -1\n};"),
            &DocTags::default(),
            "git2/errors.h",
            &config,
        );
        assert_eq!(decl.name(), Some("GIT"));
    }

    #[test]
    fn test_enum_inline_comments() {
        let mut c = chunk("typedef enum {\n    GIT_A = 1,\n    GIT_B\n} git_ab;");
        c.inlines = vec![
            InlineComment {
                line: "GIT_A = 1".into(),
                comment: "first".into(),
            },
            InlineComment {
                line: "GIT_B".into(),
                comment: "second".into(),
            },
        ];
        let decl = classify(&c, &DocTags::default(), "a.h", &ParserConfig::default());
        let Declaration::Enum(e) = decl else {
            panic!("expected enum");
        };
        assert_eq!(e.fields[0].comment.as_deref(), Some("first"));
        assert_eq!(e.fields[1].comment.as_deref(), Some("second"));
    }

    #[test]
    fn test_typedef_struct() {
        let decl = run(
            "typedef struct git_strarray {\n    char **strings;\n    size_t count;\n} git_strarray;",
            "Array of strings",
        );
        let Declaration::Struct(s) = decl else {
            panic!("expected struct");
        };
        assert_eq!(s.name.as_deref(), Some("git_strarray"));
        assert!(s.is_typedef);
        assert_eq!(s.fields[0], Field::new("strings", "char **"));
        assert_eq!(s.fields[1], Field::new("count", "size_t"));
        assert_eq!(s.block, "char **strings\nsize_t count");
    }

    #[test]
    fn test_plain_struct_uses_tag() {
        let decl = run("struct git_time {\n    git_time_t time;\n    int offset;\n};", "Time");
        assert_eq!(decl.name(), Some("git_time"));
    }

    #[test]
    fn test_opaque_struct() {
        let decl = run("typedef struct git_repository git_repository;", "Repository");
        let Declaration::Struct(s) = decl else {
            panic!("expected struct");
        };
        assert_eq!(s.name.as_deref(), Some("git_repository"));
        assert!(s.is_opaque());
        assert!(s.is_typedef);
    }

    #[test]
    fn test_struct_fields_bitfield_array_and_declarators() {
        let decl = run(
            "struct flags {\n    unsigned int dirty : 1;\n    char name[16];\n    int x, *y;\n    int (*cb)(void *payload);\n};",
            "Flags",
        );
        let Declaration::Struct(s) = decl else {
            panic!("expected struct");
        };
        let fields: Vec<(&str, &str)> = s
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("dirty", "unsigned int:1"),
                ("name", "char[16]"),
                ("x", "int"),
                ("y", "int *"),
                ("cb", "int (*)(void *payload)"),
            ]
        );
    }

    #[test]
    fn test_function_pointer_member_doc() {
        let mut c = chunk(
            "struct git_opts {\n\tint (*progress)(\n\t\tconst char *str,\n\t\tvoid *payload);\n\tint flags;\n};",
        );
        c.inlines = vec![InlineComment {
            line: "int (*progress)( const char *str, void *payload)".into(),
            comment: "Progress callback".into(),
        }];
        let decl = classify(&c, &DocTags::default(), "a.h", &ParserConfig::default());
        let Declaration::Struct(s) = decl else {
            panic!("expected struct");
        };
        assert_eq!(s.fields[0].name, "progress");
        assert_eq!(s.fields[0].type_name, "int (*)(const char *str, void *payload)");
        assert_eq!(s.fields[0].comment.as_deref(), Some("Progress callback"));
        assert_eq!(s.fields[1].comment, None);
    }

    #[test]
    fn test_function_pointer_typedef() {
        let decl = run(
            "typedef int (*git_tag_foreach_cb)(const char *name, git_oid *oid, void *payload);",
            "Callback for tags\n@param name tag name\n@return non-zero to stop",
        );
        let Declaration::Fnptr(f) = decl else {
            panic!("expected fnptr");
        };
        assert_eq!(f.name, "git_tag_foreach_cb");
        assert_eq!(f.return_value.type_name, "int");
        assert_eq!(f.signature, "const char *::git_oid *::void *");
        assert_eq!(f.args[0].comment.as_deref(), Some("tag name"));
        assert_eq!(f.argline, "const char *name, git_oid *oid, void *payload");
    }

    #[test]
    fn test_plain_typedef() {
        let decl = run("typedef int64_t git_off_t;", "Offset");
        let Declaration::Typedef(t) = decl else {
            panic!("expected typedef");
        };
        assert_eq!(t.name, "git_off_t");
        assert_eq!(t.underlying, "int64_t");
    }

    #[test]
    fn test_catch_all_is_file_doc() {
        let decl = run("", "@brief Git blob routines\n@ingroup Git");
        let Declaration::File(f) = decl else {
            panic!("expected file doc");
        };
        assert_eq!(f.tags.brief.as_deref(), Some("Git blob routines"));
        assert_eq!(f.tags.ingroup.as_deref(), Some("Git"));

        assert!(matches!(run("GIT_BEGIN_DECL", "text"), Declaration::File(_)));
        assert!(matches!(run("int counter;", "text"), Declaration::File(_)));
    }

    #[test]
    fn test_shortest_common_prefix() {
        assert_eq!(shortest_common_prefix(&["abc", "abd", "ab"]), Some("ab"));
        assert_eq!(shortest_common_prefix(&["x", "y"]), Some(""));
        assert_eq!(shortest_common_prefix(&[]), None);
    }
}
