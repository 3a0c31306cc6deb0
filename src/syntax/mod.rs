//! Lexical declaration scanning for PHP-family sources.
//!
//! [`lexer`] turns the code regions of a file into a coarse token stream;
//! [`scanner`] walks that stream and reports type declarations with their
//! enclosing namespace.

pub mod lexer;
pub mod scanner;

pub use lexer::Token;
pub use scanner::{
    Declaration, NAMESPACE_SEPARATOR, SymbolKind, scan_declarations, scan_str,
};
