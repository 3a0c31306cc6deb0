//! The symbol map: result of one or more scan batches.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::diagnostics::Violation;
use crate::error::{Error, Result};
use crate::project::path::relative_to;

/// Qualified symbol name → canonical path, plus diagnostics.
///
/// Only the [`Generator`](super::Generator) mutates a map; callers get
/// read access.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolMap {
    /// Canonical location of every discovered symbol, in discovery order.
    entries: IndexMap<SmolStr, Arc<str>>,
    /// Non-canonical occurrences worth reporting.
    ambiguous: IndexMap<SmolStr, Vec<Arc<str>>>,
    /// Every non-canonical occurrence, including overridden ones.
    ambiguous_raw: IndexMap<SmolStr, Vec<Arc<str>>>,
    /// Convention violations in the order they were found.
    violations: Vec<Violation>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    pub fn entries(&self) -> &IndexMap<SmolStr, Arc<str>> {
        &self.entries
    }

    /// Take the entries, dropping diagnostics.
    pub fn into_entries(self) -> IndexMap<SmolStr, Arc<str>> {
        self.entries
    }

    /// Canonical path for `name`, if discovered.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|path| path.as_ref())
    }

    /// Canonical path for `name`, failing if it is not in the map.
    pub fn path_of(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| Error::SymbolNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Order entries by symbol name.
    pub fn sort(&mut self) {
        self.entries.sort_keys();
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Reportable duplicates: name → paths not chosen as canonical.
    pub fn ambiguous(&self) -> &IndexMap<SmolStr, Vec<Arc<str>>> {
        &self.ambiguous
    }

    /// Every non-canonical occurrence, regardless of reportability.
    pub fn ambiguous_raw(&self) -> &IndexMap<SmolStr, Vec<Arc<str>>> {
        &self.ambiguous_raw
    }

    /// Human-readable violation messages in discovery order.
    pub fn violations(&self) -> impl Iterator<Item = &str> + '_ {
        self.violations.iter().map(|v| v.message.as_ref())
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Structured violations grouped by file, files in discovery order.
    pub fn violations_by_file(&self) -> IndexMap<&str, Vec<&Violation>> {
        let mut grouped: IndexMap<&str, Vec<&Violation>> = IndexMap::new();
        for violation in &self.violations {
            grouped
                .entry(violation.path.as_ref())
                .or_default()
                .push(violation);
        }
        grouped
    }

    /// Forget violations recorded for files under `prefix`.
    ///
    /// Used when a later rule legitimately claims files that an earlier,
    /// stricter rule rejected.
    ///
    /// `prefix` matches whole path segments: clearing `/app/src` keeps
    /// violations under `/app/src-legacy`.
    pub fn clear_violations_by_path(&mut self, prefix: &str) {
        let prefix = prefix.trim_end_matches('/');
        self.violations.retain(|violation| {
            let path: &str = &violation.path;
            path != prefix && relative_to(path, prefix).is_none()
        });
    }

    // ------------------------------------------------------------------
    // Mutators (generator only)
    // ------------------------------------------------------------------

    pub(crate) fn entry(&self, name: &str) -> Option<&Arc<str>> {
        self.entries.get(name)
    }

    pub(crate) fn insert(&mut self, name: SmolStr, path: Arc<str>) {
        self.entries.insert(name, path);
    }

    pub(crate) fn push_ambiguous(&mut self, name: SmolStr, path: Arc<str>) {
        self.ambiguous.entry(name).or_default().push(path);
    }

    pub(crate) fn push_ambiguous_raw(&mut self, name: SmolStr, path: Arc<str>) {
        self.ambiguous_raw.entry(name).or_default().push(path);
    }

    pub(crate) fn push_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(path: &str, name: &str) -> Violation {
        Violation {
            path: Arc::from(path),
            symbol_name: SmolStr::new(name),
            message: Arc::from(format!("{name} in {path}")),
            line: 1,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut map = SymbolMap::new();
        map.insert(SmolStr::new("Foo\\Bar"), Arc::from("/src/Bar.php"));

        assert!(map.contains("Foo\\Bar"));
        assert_eq!(map.get("Foo\\Bar"), Some("/src/Bar.php"));
        assert_eq!(map.path_of("Foo\\Bar").unwrap(), "/src/Bar.php");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_path_of_missing() {
        let map = SymbolMap::new();
        let err = map.path_of("Nope").unwrap_err();

        assert!(matches!(err, Error::SymbolNotFound { .. }));
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn test_sort_orders_by_name() {
        let mut map = SymbolMap::new();
        map.insert(SmolStr::new("B"), Arc::from("/b.php"));
        map.insert(SmolStr::new("A"), Arc::from("/a.php"));
        map.sort();

        let names: Vec<_> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_ambiguous_lists_keep_order() {
        let mut map = SymbolMap::new();
        map.push_ambiguous_raw(SmolStr::new("A"), Arc::from("/x.php"));
        map.push_ambiguous_raw(SmolStr::new("A"), Arc::from("/y.php"));
        map.push_ambiguous(SmolStr::new("A"), Arc::from("/y.php"));

        assert_eq!(map.ambiguous_raw()["A"].len(), 2);
        assert_eq!(map.ambiguous_raw()["A"][0].as_ref(), "/x.php");
        assert_eq!(map.ambiguous()["A"].len(), 1);
    }

    #[test]
    fn test_violations_grouped_by_file() {
        let mut map = SymbolMap::new();
        map.push_violation(violation("/src/a.php", "A"));
        map.push_violation(violation("/lib/b.php", "B"));
        map.push_violation(violation("/src/a.php", "C"));

        let by_file = map.violations_by_file();
        assert_eq!(by_file.len(), 2);
        assert_eq!(by_file["/src/a.php"].len(), 2);
        assert_eq!(by_file["/src/a.php"][1].symbol_name.as_str(), "C");
        assert_eq!(map.violations().count(), 3);
    }

    #[test]
    fn test_clear_violations_by_path() {
        let mut map = SymbolMap::new();
        map.push_violation(violation("/src/a.php", "A"));
        map.push_violation(violation("/lib/b.php", "B"));

        map.clear_violations_by_path("/src/");

        assert_eq!(map.violation_count(), 1);
        assert_eq!(map.violations().next(), Some("B in /lib/b.php"));
        assert!(!map.violations_by_file().contains_key("/src/a.php"));
    }

    #[test]
    fn test_clear_violations_matches_whole_segments() {
        let mut map = SymbolMap::new();
        map.push_violation(violation("/app/src/a.php", "A"));
        map.push_violation(violation("/app/src-legacy/b.php", "B"));
        map.push_violation(violation("/app/src", "C"));

        map.clear_violations_by_path("/app/src");

        let remaining: Vec<&str> = map.violations().collect();
        assert_eq!(remaining, vec!["B in /app/src-legacy/b.php"]);
    }
}
