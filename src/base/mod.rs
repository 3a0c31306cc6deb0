//! Foundation types shared by the scanner and the map generator.
//!
//! - [`BatchId`], [`FileId`] - Scan batch and discovery-order identifiers
//! - [`TextRange`], [`TextSize`] - Byte positions in scanned text
//! - [`LineCol`], [`LineIndex`] - Line/column conversion for diagnostics
//!
//! This module has NO dependencies on other classmap modules.

mod ids;
mod span;

pub use ids::{BatchId, FileId};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

pub use text_size;
