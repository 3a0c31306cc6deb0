//! Token stream for the code regions of a PHP-family source file.
//!
//! Only the handful of tokens the declaration scanner looks at are
//! distinguished. Literals, comments and heredoc bodies are consumed whole by
//! callbacks so that nothing inside them can be mistaken for code, and every
//! callback advances with a single forward pass over the remainder.

use logos::{Lexer, Logos, Skip};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[regex(r"[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*")]
    Ident,

    #[token("$")]
    Dollar,

    #[token("::")]
    DoubleColon,

    #[token("->")]
    Arrow,

    #[token("?->")]
    NullsafeArrow,

    #[token("\\")]
    Backslash,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semicolon,

    /// `#[` opens an attribute group rather than a comment.
    #[token("#[")]
    AttributeOpen,

    #[token("'", |lex| quoted(lex, b'\''))]
    #[token("\"", |lex| quoted(lex, b'"'))]
    #[token("`", |lex| quoted(lex, b'`'))]
    Literal,

    /// Heredoc or nowdoc, including its body and closing label.
    #[token("<<<", heredoc)]
    Heredoc,

    #[token("//", line_comment)]
    #[token("#", line_comment)]
    #[token("/*", block_comment)]
    Comment,

    /// `?>` plus the inline content up to and including the next `<?`.
    #[token("?>", close_tag)]
    CloseTag,
}

impl Token {
    /// Tokens after which a keyword is a member, variable or name segment
    /// rather than the start of a declaration.
    pub fn blocks_keyword(self) -> bool {
        matches!(
            self,
            Token::Dollar
                | Token::DoubleColon
                | Token::Arrow
                | Token::NullsafeArrow
                | Token::Backslash
        )
    }
}

/// Whether `byte` may appear in a heredoc label or identifier.
///
/// Every byte of a multi-byte UTF-8 sequence is >= 0x80, so this accepts
/// non-ASCII identifiers without decoding them.
#[inline]
pub fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

#[inline]
fn is_ident_start_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

fn quoted(lex: &mut Lexer<Token>, delimiter: u8) {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;

    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == delimiter => {
                lex.bump(i + 1);
                return;
            }
            _ => i += 1,
        }
    }

    lex.bump(rest.len());
}

/// Length of a line comment body: up to, not including, the line break or
/// a `?>` close tag.
pub(crate) fn line_comment_len(rest: &[u8]) -> usize {
    let mut i = 0;

    while i < rest.len() {
        match rest[i] {
            b'\n' | b'\r' => break,
            b'?' if rest.get(i + 1) == Some(&b'>') => break,
            _ => i += 1,
        }
    }

    i
}

/// Length of a block comment body including the closing `*/`, or the whole
/// remainder when it is unterminated.
pub(crate) fn block_comment_len(rest: &[u8]) -> usize {
    rest.windows(2)
        .position(|pair| pair == b"*/")
        .map_or(rest.len(), |pos| pos + 2)
}

fn line_comment(lex: &mut Lexer<Token>) -> Skip {
    let len = line_comment_len(lex.remainder().as_bytes());
    lex.bump(len);
    Skip
}

fn block_comment(lex: &mut Lexer<Token>) -> Skip {
    let len = block_comment_len(lex.remainder().as_bytes());
    lex.bump(len);
    Skip
}

fn close_tag(lex: &mut Lexer<Token>) {
    let rest = lex.remainder();
    let end = rest.find("<?").map_or(rest.len(), |pos| pos + 2);
    lex.bump(end);
}

fn heredoc(lex: &mut Lexer<Token>) {
    let rest = lex.remainder().as_bytes();
    let Some((label, body_start)) = heredoc_opener(rest) else {
        return;
    };
    let end = heredoc_body_end(rest, label, body_start);
    lex.bump(end);
}

/// Parse `[ \t]*("ID"|'ID'|ID)` followed by a line break.
///
/// Returns the label and the offset at which the body starts.
fn heredoc_opener(rest: &[u8]) -> Option<(&[u8], usize)> {
    let mut i = 0;
    while matches!(rest.get(i), Some(b' ' | b'\t')) {
        i += 1;
    }

    let quote = match rest.get(i) {
        Some(&q @ (b'\'' | b'"')) => {
            i += 1;
            Some(q)
        }
        _ => None,
    };

    let label_start = i;
    if !rest.get(i).copied().is_some_and(is_ident_start_byte) {
        return None;
    }
    while rest.get(i).copied().is_some_and(is_ident_byte) {
        i += 1;
    }
    let label = &rest[label_start..i];

    if let Some(q) = quote {
        if rest.get(i) != Some(&q) {
            return None;
        }
        i += 1;
    }

    match rest.get(i) {
        Some(b'\r') if rest.get(i + 1) == Some(&b'\n') => Some((label, i + 2)),
        Some(b'\r' | b'\n') => Some((label, i + 1)),
        _ => None,
    }
}

/// Find the offset just past the closing label.
///
/// The closing label may be indented and must not run on into an
/// identifier. Without one the body extends to end of input.
fn heredoc_body_end(rest: &[u8], label: &[u8], mut i: usize) -> usize {
    while i < rest.len() {
        match rest[i] {
            b' ' | b'\t' => {
                i += 1;
                continue;
            }
            _ => {
                let end = i + label.len();
                if rest[i..].starts_with(label)
                    && !rest.get(end).copied().is_some_and(is_ident_byte)
                {
                    return end;
                }
            }
        }

        while i < rest.len() && !matches!(rest[i], b'\r' | b'\n') {
            i += 1;
        }
        while i < rest.len() && matches!(rest[i], b'\r' | b'\n') {
            i += 1;
        }
    }

    rest.len()
}
