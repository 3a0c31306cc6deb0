//! Map aggregation: folds scanned declarations into a [`SymbolMap`].
//!
//! - [`Generator`] - runs scan batches and resolves conflicts
//! - [`SymbolMap`] - the resulting index plus diagnostics
//! - [`ScanOptions`], [`GeneratorConfig`] - per-batch and per-generator settings
//! - [`Violation`] - a symbol rejected by a convention rule

mod convention;
mod diagnostics;
mod generator;
mod options;
mod symbol_map;

pub use convention::expected_sub_path;
pub use diagnostics::Violation;
pub use generator::{Generator, create_map};
pub use options::{
    ConventionRule, ConventionStyle, DEFAULT_AUXILIARY_DIRS, DEFAULT_EXTENSIONS, GeneratorConfig,
    ScanMode, ScanOptions, ScanSource,
};
pub use symbol_map::SymbolMap;
