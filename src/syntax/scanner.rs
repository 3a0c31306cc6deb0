//! Declaration scanner: extracts type declarations from one file.
//!
//! The scanner drives the [`Token`] stream through a small state machine:
//!
//! - `Code`: keywords are meaningful.
//! - `NamespaceName`: collecting the segments after `namespace`.
//! - `AnonymousHead` / `AnonymousBody`: inside `new class(...) { ... }`,
//!   where nothing is declared.
//!
//! A type keyword followed by a name is read straight from the source
//! remainder, because names may contain `:` and `-` (XHP) which are not
//! identifier tokens.

use std::borrow::Cow;
use std::fmt;

use logos::{Lexer, Logos};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use super::lexer::{Token, block_comment_len, is_ident_byte, line_comment_len};
use crate::base::{LineIndex, TextRange, TextSize};

/// Namespace separator used in qualified names.
pub const NAMESPACE_SEPARATOR: char = '\\';

// ============================================================================
// DECLARATIONS
// ============================================================================

/// The kind of type a declaration introduces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl SymbolKind {
    /// Match a declaration keyword, ignoring ASCII case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("class") {
            Some(SymbolKind::Class)
        } else if word.eq_ignore_ascii_case("interface") {
            Some(SymbolKind::Interface)
        } else if word.eq_ignore_ascii_case("trait") {
            Some(SymbolKind::Trait)
        } else if word.eq_ignore_ascii_case("enum") {
            Some(SymbolKind::Enum)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Trait => "trait",
            SymbolKind::Enum => "enum",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One type declaration found in a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: SymbolKind,
    /// Enclosing namespace without leading or trailing separator, empty for
    /// the global namespace.
    pub namespace: SmolStr,
    /// Short name as declared, after XHP and enum normalization.
    pub name: SmolStr,
    /// `namespace\name`, or just `name` in the global namespace.
    pub qualified_name: SmolStr,
    /// Byte range of the declared name in the scanned (decoded) text.
    pub span: TextRange,
    /// 1-indexed line of the declared name.
    pub line: u32,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Extract the declarations in `text`, one per distinct qualified name, in
/// order of first appearance.
///
/// Never fails: unterminated literals or comments simply end at EOF. Bytes
/// that are not valid UTF-8 are replaced before lexing, which keeps every
/// line break and every ASCII byte in place.
///
/// Spans index the decoded text, `String::from_utf8_lossy(text)`. For valid
/// UTF-8 that is `text` itself; otherwise each replaced sequence becomes a
/// three-byte U+FFFD and later offsets shift accordingly. Line numbers are
/// unaffected.
pub fn scan_declarations(text: &[u8]) -> Vec<Declaration> {
    let text: Cow<'_, str> = String::from_utf8_lossy(text);
    scan_str(&text)
}

/// Extract declarations from text that is already valid UTF-8.
pub fn scan_str(text: &str) -> Vec<Declaration> {
    let Some(open) = text.find("<?") else {
        return Vec::new();
    };

    let code_start = open + 2;
    let mut scanner = Scanner::new(text, code_start);
    let mut lex = Token::lexer(&text[code_start..]);

    while let Some(token) = lex.next() {
        scanner.step(token.ok(), &mut lex);
    }

    scanner.finish()
}

// ============================================================================
// STATE MACHINE
// ============================================================================

#[derive(Debug)]
enum State {
    Code,
    NamespaceName { name: String, expect_segment: bool },
    AnonymousHead { parens: u32 },
    AnonymousBody { depth: u32 },
}

struct Scanner<'a> {
    text: &'a str,
    /// Offset of the lexer's source within `text`.
    base: usize,
    state: State,
    namespace: SmolStr,
    /// Last significant token; `None` for unrecognized input.
    prev: Option<Token>,
    prev_is_new: bool,
    seen: FxHashSet<SmolStr>,
    found: Vec<Declaration>,
    lines: Option<LineIndex>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, base: usize) -> Self {
        Self {
            text,
            base,
            state: State::Code,
            namespace: SmolStr::default(),
            prev: None,
            prev_is_new: false,
            seen: FxHashSet::default(),
            found: Vec::new(),
            lines: None,
        }
    }

    fn finish(self) -> Vec<Declaration> {
        self.found
    }

    fn step(&mut self, token: Option<Token>, lex: &mut Lexer<'a, Token>) {
        let state = std::mem::replace(&mut self.state, State::Code);

        self.state = match state {
            State::Code => {
                self.code(token, lex);
                std::mem::replace(&mut self.state, State::Code)
            }
            State::NamespaceName {
                mut name,
                expect_segment,
            } => match token {
                Some(Token::Ident) if expect_segment => {
                    name.push_str(lex.slice());
                    State::NamespaceName {
                        name,
                        expect_segment: false,
                    }
                }
                Some(Token::Backslash) if !expect_segment => {
                    name.push(NAMESPACE_SEPARATOR);
                    State::NamespaceName {
                        name,
                        expect_segment: true,
                    }
                }
                Some(Token::Semicolon | Token::LBrace) if name.is_empty() || !expect_segment => {
                    trace!(namespace = %name, "namespace");
                    self.namespace = SmolStr::new(&name);
                    self.prev = token;
                    State::Code
                }
                _ => {
                    // `namespace\foo()` and friends: not a declaration.
                    self.code(token, lex);
                    std::mem::replace(&mut self.state, State::Code)
                }
            },
            State::AnonymousHead { parens } => match token {
                Some(Token::LParen) => State::AnonymousHead { parens: parens + 1 },
                Some(Token::RParen) => State::AnonymousHead {
                    parens: parens.saturating_sub(1),
                },
                Some(Token::LBrace) if parens == 0 => State::AnonymousBody { depth: 1 },
                Some(Token::Semicolon) if parens == 0 => State::Code,
                _ => State::AnonymousHead { parens },
            },
            State::AnonymousBody { depth } => match token {
                Some(Token::LBrace) => State::AnonymousBody { depth: depth + 1 },
                Some(Token::RBrace) if depth == 1 => {
                    self.prev = token;
                    State::Code
                }
                Some(Token::RBrace) => State::AnonymousBody { depth: depth - 1 },
                _ => State::AnonymousBody { depth },
            },
        };
    }

    fn code(&mut self, token: Option<Token>, lex: &mut Lexer<'a, Token>) {
        let keyword_allowed = !self.prev.is_some_and(Token::blocks_keyword);
        let after_new = self.prev_is_new;

        self.prev = token;
        self.prev_is_new = false;

        if token != Some(Token::Ident) {
            return;
        }

        let word = lex.slice();
        if word.eq_ignore_ascii_case("new") {
            self.prev_is_new = true;
            return;
        }
        if !keyword_allowed {
            return;
        }

        if word.eq_ignore_ascii_case("namespace") {
            self.state = State::NamespaceName {
                name: String::new(),
                expect_segment: true,
            };
            return;
        }

        let Some(kind) = SymbolKind::from_keyword(word) else {
            return;
        };

        let rest = lex.remainder();
        let (skip, name_len) = type_name_after_keyword(rest);
        let raw = &rest[skip..skip + name_len];

        if raw.is_empty() || raw == "extends" || raw == "implements" {
            if kind == SymbolKind::Class && after_new {
                trace!("anonymous class");
                self.state = State::AnonymousHead { parens: 0 };
            }
            return;
        }

        let name = normalize_name(kind, raw);
        let start = self.base + lex.span().end + skip;
        lex.bump(skip + name_len);

        if let Some(name) = name {
            self.emit(kind, name, start, name_len);
        }
    }

    fn emit(&mut self, kind: SymbolKind, name: String, start: usize, len: usize) {
        let qualified = if self.namespace.is_empty() {
            name.clone()
        } else {
            format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, name)
        };
        let qualified_name = SmolStr::new(qualified.trim_start_matches(NAMESPACE_SEPARATOR));

        if !self.seen.insert(qualified_name.clone()) {
            trace!(name = %qualified_name, "repeated declaration in file");
            return;
        }

        let span = TextRange::at(TextSize::from(start as u32), TextSize::from(len as u32));
        let text = self.text;
        let line = self
            .lines
            .get_or_insert_with(|| LineIndex::new(text.as_bytes()))
            .line_col(span.start())
            .line_one_indexed();

        trace!(%kind, name = %qualified_name, line, "declaration");
        self.found.push(Declaration {
            kind,
            namespace: self.namespace.clone(),
            name: SmolStr::new(name),
            qualified_name,
            span,
            line,
        });
    }
}

// ============================================================================
// NAMES
// ============================================================================

/// Measure the separator after a keyword and the type name that follows.
///
/// The separator is any run of whitespace and comments. Returns
/// `(separator_len, name_len)`. A name with no separator in front of it is
/// rejected.
fn type_name_after_keyword(rest: &str) -> (usize, usize) {
    let bytes = rest.as_bytes();
    let sep = skip_trivia(bytes);
    if sep == 0 {
        return (0, 0);
    }

    let name = &bytes[sep..];
    let starts_name = name
        .first()
        .is_some_and(|&b| b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x7f);
    if !starts_name {
        return (sep, 0);
    }

    let len = name
        .iter()
        .take_while(|&&b| is_ident_byte(b) || b == b':' || b == b'-' || b == 0x7f)
        .count();
    (sep, len)
}

/// Length of the leading whitespace and comments in `bytes`.
fn skip_trivia(bytes: &[u8]) -> usize {
    let mut i = 0;

    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        match bytes[i] {
            b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' => i += 1,
            b'/' if next == Some(b'*') => i += 2 + block_comment_len(&bytes[i + 2..]),
            b'/' if next == Some(b'/') => i += 2 + line_comment_len(&bytes[i + 2..]),
            b'#' if next != Some(b'[') => i += 1 + line_comment_len(&bytes[i + 1..]),
            _ => break,
        }
    }

    i
}

/// Apply XHP and backed-enum normalization to a raw declared name.
fn normalize_name(kind: SymbolKind, raw: &str) -> Option<String> {
    let name = if raw.starts_with(':') {
        // :foo:bar-baz => xhp_foo__bar_baz
        let replaced = raw.replace('-', "_").replace(':', "__");
        format!("xhp{}", &replaced[1..])
    } else if kind == SymbolKind::Enum {
        match raw.rfind(':') {
            Some(colon) => raw[..colon].to_string(),
            None => raw.to_string(),
        }
    } else {
        raw.to_string()
    };

    (!name.is_empty()).then_some(name)
}
