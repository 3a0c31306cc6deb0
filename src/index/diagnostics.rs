//! Convention violations recorded during a scan.
//!
//! A violation is not an error: the offending symbol is left out of the
//! map and scanning continues.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use super::options::{ConventionRule, ConventionStyle};

/// One symbol whose namespace does not mirror its file location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// File that declared the symbol.
    pub path: Arc<str>,
    /// Qualified name of the rejected symbol.
    pub symbol_name: SmolStr,
    /// Human-readable description.
    pub message: Arc<str>,
    /// 1-indexed line of the declaration.
    pub line: u32,
}

impl Violation {
    /// Build the violation for `symbol_name` declared in `path` under `rule`.
    pub fn convention(
        rule: &ConventionRule,
        symbol_name: &str,
        path: &Arc<str>,
        line: u32,
    ) -> Self {
        let message = format!(
            "Class {} located in {} does not comply with {} autoloading standard (rule: {} => {}). Skipping.",
            symbol_name, path, rule.style, rule.prefix, rule.base_dir,
        );

        Self {
            path: path.clone(),
            symbol_name: SmolStr::new(symbol_name),
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path, self.line, self.message)
    }
}

impl fmt::Display for ConventionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConventionStyle::Psr4 => f.write_str("psr-4"),
            ConventionStyle::Psr0 => f.write_str("psr-0"),
        }
    }
}
