//! Comment/code segmentation for C headers
//!
//! The segmenter walks header text once and pairs every documentation
//! comment (`/** ... */`) with the declaration that follows it. Code that is
//! not preceded by a documentation comment is discarded.
//!
//! It is a small state machine:
//! - `Normal`: top-level text, outside any comment or brace body
//! - `InBlockComment`: inside `/* ... */`
//! - `InBraceBody`: inside a `{ ... }` body (struct, enum, inline function)
//!
//! plus brace and parenthesis depth counters, so a declaration split over
//! several lines is never cut short. Doc comments met inside an open body or
//! argument list, and `/**<` trailing comments, are inline documentation for
//! the member line they sit on.
//!
//! Nothing here fails: an unterminated comment or declaration at end of
//! file simply closes the current chunk.

use crate::tags::cleanup_comment;
use log::trace;

/// A documentation comment paired with the code that follows it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationChunk {
    /// Declaration text, with ordinary comments removed
    pub code: String,
    /// Comment body between `/**` and `*/`, uncleaned
    pub raw_comment: String,
    /// First source line spanned by the declaration
    pub start_line: usize,
    /// Last source line, including the terminating `;` or `}`
    pub end_line: usize,
    /// Inline member documentation found inside the declaration
    pub inlines: Vec<InlineComment>,
}

/// Documentation attached to a single member line of a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineComment {
    /// The member line, trimmed, without trailing `,` or `;`
    pub line: String,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InBlockComment,
    InBraceBody,
}

/// Doc comment seen before the member it documents
#[derive(Debug)]
struct WaitingInline {
    comment: String,
    /// Offset in the pending code where the member starts
    from: usize,
    brace_depth: usize,
    paren_depth: usize,
}

/// Declaration being collected after a doc comment
#[derive(Debug, Default)]
struct Pending {
    comment: String,
    comment_end_line: usize,
    code: String,
    start_line: Option<usize>,
    last_code_line: usize,
    inlines: Vec<InlineComment>,
    /// Inline comment waiting for the member that follows it
    waiting_inline: Option<WaitingInline>,
    /// Collecting a run of `#define` lines
    in_define: bool,
    /// Newlines seen since the last `#define` line
    newlines_after_define: usize,
    /// The open brace body belongs to a function definition
    function_body: bool,
}

/// Split header text into documented declaration chunks
pub fn segment(source: &str) -> Vec<DeclarationChunk> {
    Segmenter::new(source).run()
}

struct Segmenter {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    state: ScanState,
    brace_depth: usize,
    paren_depth: usize,
    /// Braces opened by `extern "C" {` that must not count as bodies
    extern_c_depth: usize,
    /// Recent undocumented text, whitespace-collapsed
    idle_tail: String,
    current: Option<Pending>,
    chunks: Vec<DeclarationChunk>,
}

impl Segmenter {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            state: ScanState::Normal,
            brace_depth: 0,
            paren_depth: 0,
            extern_c_depth: 0,
            idle_tail: String::new(),
            current: None,
            chunks: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<DeclarationChunk> {
        while let Some(c) = self.peek() {
            if self.at("/*") {
                self.block_comment();
            } else if self.at("//") {
                self.line_comment();
            } else if c == '#' && self.at_line_start() {
                self.directive();
            } else if c == '"' || c == '\'' {
                self.literal(c);
            } else {
                self.bump();
                self.code_char(c);
            }
        }

        if self.state == ScanState::InBraceBody || self.paren_depth > 0 {
            trace!("unterminated declaration at line {}", self.line);
        }
        self.finish();
        self.chunks
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at(&self, s: &str) -> bool {
        let mut i = self.pos;
        for c in s.chars() {
            if self.chars.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn at_line_start(&self) -> bool {
        self.chars[..self.pos]
            .iter()
            .rev()
            .take_while(|c| **c != '\n')
            .all(|c| c.is_whitespace())
    }

    fn collecting(&self) -> bool {
        self.current.is_some()
    }

    fn in_open_declaration(&self) -> bool {
        self.brace_depth > 0 || self.paren_depth > 0
    }

    fn block_comment(&mut self) {
        let doc = self.at("/**") && !self.at("/**/") && !self.at("/***");
        let marked_inline = self.at("/**<");
        let previous = self.state;
        self.state = ScanState::InBlockComment;

        let opener = if marked_inline { 4 } else if doc { 3 } else { 2 };
        for _ in 0..opener {
            self.bump();
        }

        let mut text = String::new();
        let mut terminated = false;
        while self.peek().is_some() {
            if self.at("*/") {
                self.bump();
                self.bump();
                terminated = true;
                break;
            }
            if let Some(c) = self.bump() {
                text.push(c);
            }
        }
        self.state = previous;

        if !terminated {
            trace!("unterminated comment at end of input (line {})", self.line);
        }

        if !doc {
            if let Some(p) = self.current.as_mut() {
                if !p.code.is_empty() {
                    p.code.push(' ');
                }
            }
            return;
        }

        if marked_inline || (self.collecting() && self.in_open_declaration()) {
            self.attach_inline(cleanup_comment(&text));
            return;
        }

        if self.brace_depth > 0 {
            // doc comment inside an undocumented body
            return;
        }

        self.finish();
        self.current = Some(Pending {
            comment: text,
            comment_end_line: self.line,
            ..Default::default()
        });
    }

    fn line_comment(&mut self) {
        let trailing = !self.at_line_start();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
            text.push(c);
        }

        let has_line = self
            .current
            .as_ref()
            .is_some_and(|p| !current_line(&p.code).is_empty());
        let after_finished = !self.collecting()
            && trailing
            && self
                .chunks
                .last()
                .is_some_and(|c| c.end_line == self.line && !c.code.is_empty());
        if (self.collecting() && (self.in_open_declaration() || has_line)) || after_finished {
            let comment = text
                .trim_start_matches(['/', '!', '<'])
                .trim()
                .to_string();
            if !comment.is_empty() {
                self.attach_inline(comment);
            }
        }
    }

    /// Preprocessor line; only `#define` survives as declaration text
    fn directive(&mut self) {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                if text.ends_with('\\') {
                    text.pop();
                    text.push('\n');
                    self.bump();
                    continue;
                }
                break;
            }
            self.bump();
            text.push(c);
        }

        let is_define = text
            .trim_start_matches('#')
            .trim_start()
            .starts_with("define");

        let Some(p) = self.current.as_mut() else {
            return;
        };

        if is_define && (p.code.is_empty() || p.in_define) {
            if p.start_line.is_none() {
                p.start_line = Some(self.line - text.matches('\n').count());
            }
            p.code.push_str(&text);
            p.code.push('\n');
            p.last_code_line = self.line;
            p.in_define = true;
            p.newlines_after_define = 0;
        } else if p.in_define {
            self.finish();
        }
    }

    fn literal(&mut self, quote: char) {
        let mut text = String::new();
        if let Some(c) = self.bump() {
            text.push(c);
        }
        while let Some(c) = self.bump() {
            text.push(c);
            if c == '\\' {
                if let Some(escaped) = self.bump() {
                    text.push(escaped);
                }
            } else if c == quote || c == '\n' {
                break;
            }
        }

        let line = self.line;
        match self.current.as_ref().map(|p| p.in_define) {
            Some(false) => {
                if let Some(p) = self.current.as_mut() {
                    if p.start_line.is_none() {
                        p.start_line = Some(line);
                    }
                    p.code.push_str(&text);
                    p.last_code_line = line;
                }
            }
            Some(true) => {
                self.finish();
                self.idle_tail.push_str(&text);
            }
            None => self.idle_tail.push_str(&text),
        }
    }

    fn code_char(&mut self, c: char) {
        if self.current.is_none() {
            self.idle_char(c);
            return;
        }

        if let Some(p) = self.current.as_mut() {
            if p.in_define {
                if c == '\n' {
                    p.newlines_after_define += 1;
                    if p.newlines_after_define >= 2 {
                        self.finish();
                    }
                } else if !c.is_whitespace() {
                    self.finish();
                    self.idle_char(c);
                }
                return;
            }
        }

        let line = self.line;
        let brace_depth = self.brace_depth;
        let paren_depth = self.paren_depth;
        let Some(p) = self.current.as_mut() else {
            return;
        };

        if p.code.is_empty() && c.is_whitespace() {
            return;
        }
        if p.start_line.is_none() {
            p.start_line = Some(line);
        }
        p.code.push(c);
        if !c.is_whitespace() {
            // '\n' has already advanced the line counter
            p.last_code_line = line;
        }

        match c {
            '(' => self.paren_depth += 1,
            ')' => self.paren_depth = paren_depth.saturating_sub(1),
            '{' if paren_depth == 0 => {
                let before = p.code[..p.code.len() - 1].trim_end();
                if brace_depth == 0 && before.ends_with("extern \"C\"") {
                    // linkage block, not a declaration body
                    p.code.clear();
                    p.start_line = None;
                    self.extern_c_depth += 1;
                    self.finish();
                    return;
                }
                if brace_depth == 0 {
                    p.function_body = before.ends_with(')');
                }
                self.brace_depth += 1;
                self.state = ScanState::InBraceBody;
            }
            '}' if paren_depth == 0 => {
                self.brace_depth = brace_depth.saturating_sub(1);
                if self.brace_depth == 0 {
                    self.state = ScanState::Normal;
                    if p.function_body {
                        self.finish();
                        return;
                    }
                }
            }
            ';' if brace_depth == 0 && paren_depth == 0 => {
                self.finish();
                return;
            }
            _ => {}
        }

        if matches!(c, ';' | ',' | ')' | '}') {
            self.flush_waiting_inline(c);
        }
    }

    /// Track braces in undocumented code so doc comments inside its bodies
    /// are not mistaken for new declarations.
    fn idle_char(&mut self, c: char) {
        match c {
            '{' => {
                if self.brace_depth == 0 && self.idle_tail.trim_end().ends_with("extern \"C\"") {
                    self.extern_c_depth += 1;
                } else {
                    self.brace_depth += 1;
                    self.state = ScanState::InBraceBody;
                }
                self.idle_tail.clear();
            }
            '}' => {
                if self.brace_depth == 0 {
                    self.extern_c_depth = self.extern_c_depth.saturating_sub(1);
                } else {
                    self.brace_depth -= 1;
                    if self.brace_depth == 0 {
                        self.state = ScanState::Normal;
                    }
                }
                self.idle_tail.clear();
            }
            ';' => self.idle_tail.clear(),
            c if c.is_whitespace() => {
                if !self.idle_tail.ends_with(' ') {
                    self.idle_tail.push(' ');
                }
            }
            c => self.idle_tail.push(c),
        }
    }

    fn attach_inline(&mut self, comment: String) {
        if comment.is_empty() {
            return;
        }

        let target_code = match self.current.as_ref() {
            Some(p) => p.code.clone(),
            None => match self.chunks.last() {
                Some(chunk) => chunk.code.clone(),
                None => return,
            },
        };

        let line = current_line(&target_code);
        if line.is_empty() {
            let (brace_depth, paren_depth) = (self.brace_depth, self.paren_depth);
            if let Some(p) = self.current.as_mut() {
                p.waiting_inline = Some(WaitingInline {
                    comment,
                    from: p.code.len(),
                    brace_depth,
                    paren_depth,
                });
            }
            return;
        }

        let inline = InlineComment { line, comment };
        match self.current.as_mut() {
            Some(p) => p.inlines.push(inline),
            None => {
                if let Some(chunk) = self.chunks.last_mut() {
                    chunk.inlines.push(inline);
                }
            }
        }
    }

    /// Attach a waiting comment once its member is complete
    ///
    /// A member ends at a `,` or `;` at the depth where the comment was
    /// seen, or at the `)` or `}` that closes the enclosing list.
    fn flush_waiting_inline(&mut self, c: char) {
        let (braces, parens) = (self.brace_depth, self.paren_depth);
        let Some(p) = self.current.as_mut() else {
            return;
        };
        let Some(waiting) = p.waiting_inline.as_ref() else {
            return;
        };
        let closed = match c {
            ';' | ',' => braces == waiting.brace_depth && parens == waiting.paren_depth,
            _ => braces < waiting.brace_depth || parens < waiting.paren_depth,
        };
        if !closed {
            return;
        }

        let end = p.code.len() - c.len_utf8();
        let member = p.code.get(waiting.from.min(end)..end).unwrap_or("");
        let line = normalize_member(member);
        if let Some(waiting) = p.waiting_inline.take() {
            if !line.is_empty() {
                p.inlines.push(InlineComment {
                    line,
                    comment: waiting.comment,
                });
            }
        }
    }

    /// Close the pending chunk, if any
    fn finish(&mut self) {
        let Some(p) = self.current.take() else {
            return;
        };
        self.paren_depth = 0;

        let code = p.code.trim_end().to_string();
        let start_line = if code.is_empty() {
            p.comment_end_line
        } else {
            p.start_line.unwrap_or(p.comment_end_line)
        };
        let end_line = if code.is_empty() {
            p.comment_end_line
        } else {
            p.last_code_line.max(start_line)
        };

        trace!("chunk lines {start_line}-{end_line}");
        self.chunks.push(DeclarationChunk {
            code,
            raw_comment: p.comment,
            start_line,
            end_line,
            inlines: p.inlines,
        });
    }
}

/// Last line of `code`, trimmed, without a trailing `,` or `;`
fn current_line(code: &str) -> String {
    let last = match code.rfind('\n') {
        Some(i) => &code[i + 1..],
        None => code,
    };
    last.trim()
        .trim_end_matches([',', ';'])
        .trim_end()
        .to_string()
}

/// Member text on one line, without its `,` or `;` terminator
fn normalize_member(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([',', ';'])
        .trim_end()
        .to_string()
}
