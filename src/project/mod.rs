//! File sources and path handling.
//!
//! - [`SourceProvider`] - enumeration, reading and canonical identity
//! - [`NativeFs`] - local disk via `walkdir`
//! - [`MemoryFs`] - virtual, URI-keyed overlay

pub mod path;
mod source;

pub use source::{MemoryFs, NativeFs, SourceProvider};
