//! # classmap
//!
//! Class map generation for PHP-family source trees: find every class,
//! interface, trait and enum declared under a set of roots and map each
//! fully-qualified name to the file that defines it, without executing or
//! fully parsing anything.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! index   → Generator, SymbolMap, conflict resolution, convention checks
//!   ↓
//! project → SourceProvider (native disk, in-memory overlay), path helpers
//! syntax  → Lexer + declaration scanner
//!   ↓
//! base    → Primitives (BatchId, FileId, TextRange, LineIndex)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use classmap::{ConventionRule, Generator, ScanOptions};
//!
//! let mut generator = Generator::new();
//! generator.scan("vendor/acme/lib", &ScanOptions::default())?;
//! generator.scan(
//!     "src",
//!     &ScanOptions::new().convention(ConventionRule::psr4("App\\", "src")),
//! )?;
//!
//! for (name, path) in generator.symbol_map().iter() {
//!     println!("{name} => {path}");
//! }
//! # Ok::<(), classmap::Error>(())
//! ```

/// Foundation types: batch/file ids, spans, line lookup
pub mod base;

/// Error type shared by every fallible operation
pub mod error;

/// Map aggregation: generator, symbol map, options
pub mod index;

/// File sources: providers and path helpers
pub mod project;

/// Lexer and declaration scanner
pub mod syntax;

pub use error::{Error, Result};
pub use index::{
    ConventionRule, ConventionStyle, Generator, GeneratorConfig, ScanMode, ScanOptions, ScanSource,
    SymbolMap, Violation, create_map,
};
pub use project::{MemoryFs, NativeFs, SourceProvider};
pub use syntax::{Declaration, SymbolKind, scan_declarations, scan_str};
