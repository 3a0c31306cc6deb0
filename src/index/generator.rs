//! The map generator: scans batches of files and folds their declarations
//! into a [`SymbolMap`].
//!
//! # Conflict resolution
//!
//! Every canonical entry remembers the batch that set it:
//!
//! 1. Unknown name: inserted.
//! 2. Known name from the **same** batch: the first path stays canonical and
//!    the new one is recorded as ambiguous.
//! 3. Known name from an **earlier** batch: the new path replaces it, so
//!    later scans override earlier ones.
//!
//! # Batches are all-or-nothing
//!
//! A batch enumerates, reads and scans every candidate before folding
//! anything. A missing root or unreadable file therefore leaves the map as
//! it was.

use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::convention::PreparedRule;
use super::diagnostics::Violation;
use super::options::{GeneratorConfig, ScanMode, ScanOptions, ScanSource};
use super::symbol_map::SymbolMap;
use crate::base::{BatchId, FileId};
use crate::error::Result;
use crate::project::path::{extension, has_dir_segment, normalize_separators};
use crate::project::{NativeFs, SourceProvider};
use crate::syntax::{Declaration, scan_declarations};

/// A file that survived filtering and will be scanned.
#[derive(Debug)]
struct Candidate {
    id: FileId,
    /// Path as enumerated or supplied.
    path: String,
    /// Canonical identity; the path recorded in the map.
    canonical: Arc<str>,
}

/// Builds a [`SymbolMap`] from one or more scan batches.
pub struct Generator<P: SourceProvider = NativeFs> {
    provider: P,
    config: GeneratorConfig,
    map: SymbolMap,
    /// Batch that set each canonical entry.
    owners: FxHashMap<SmolStr, BatchId>,
    next_batch: BatchId,
    /// Canonical paths already scanned, when duplicate scans are avoided.
    scanned: Option<FxHashSet<Arc<str>>>,
}

impl Generator<NativeFs> {
    /// A generator over the local filesystem with default settings.
    pub fn new() -> Self {
        Self::with_provider(NativeFs::new(), GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::with_provider(NativeFs::new(), config)
    }
}

impl Default for Generator<NativeFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SourceProvider> Generator<P> {
    pub fn with_provider(provider: P, config: GeneratorConfig) -> Self {
        Self {
            provider,
            config,
            map: SymbolMap::new(),
            owners: FxHashMap::default(),
            next_batch: BatchId::new(0),
            scanned: None,
        }
    }

    /// Skip files whose canonical path an earlier batch already scanned.
    ///
    /// In convention mode a file only counts as scanned once one of its
    /// symbols conformed, so a later rule may still claim it.
    pub fn avoid_duplicate_scans(&mut self) -> &mut Self {
        self.scanned.get_or_insert_with(FxHashSet::default);
        self
    }

    pub fn symbol_map(&self) -> &SymbolMap {
        &self.map
    }

    /// Mutable access for post-processing such as
    /// [`SymbolMap::clear_violations_by_path`] and [`SymbolMap::sort`].
    pub fn symbol_map_mut(&mut self) -> &mut SymbolMap {
        &mut self.map
    }

    pub fn into_symbol_map(self) -> SymbolMap {
        self.map
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Number of batches that completed.
    pub fn batches(&self) -> u32 {
        self.next_batch.index()
    }

    // ========================================================================
    // SCANNING
    // ========================================================================

    /// Run one batch over `source`.
    pub fn scan(&mut self, source: impl Into<ScanSource>, options: &ScanOptions) -> Result<()> {
        let source = source.into();
        let listed = match &source {
            ScanSource::Path(root) => self.provider.enumerate(root)?,
            ScanSource::Files(files) => files.clone(),
        };

        let rule = match &options.mode {
            ScanMode::Classmap => None,
            ScanMode::Convention(rule) => Some(PreparedRule::prepare(rule, &self.provider)?),
        };

        let candidates = self.filter_candidates(listed, options)?;
        let extracted = self.extract_all(&candidates)?;

        let batch = self.next_batch;
        self.next_batch = batch.next();
        debug!(%batch, files = candidates.len(), "scanning batch");

        for (candidate, declarations) in candidates.iter().zip(extracted) {
            trace!(file = %candidate.id, path = %candidate.canonical, count = declarations.len(), "scanned file");

            let declarations = match &rule {
                Some(rule) => self.filter_by_convention(rule, candidate, declarations),
                None => declarations,
            };

            if let Some(scanned) = &mut self.scanned {
                if rule.is_none() || !declarations.is_empty() {
                    scanned.insert(candidate.canonical.clone());
                }
            }

            for declaration in declarations {
                self.fold(batch, declaration.qualified_name, &candidate.canonical);
            }
        }

        Ok(())
    }

    fn filter_candidates(&self, listed: Vec<String>, options: &ScanOptions) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();
        let mut in_batch: FxHashSet<Arc<str>> = FxHashSet::default();

        for path in listed {
            let path = normalize_separators(&path);
            if !self.config.accepts_extension(extension(&path)) {
                continue;
            }
            if options.is_excluded(&path) {
                trace!(path = %path, "excluded");
                continue;
            }

            let canonical: Arc<str> = Arc::from(self.provider.canonicalize(&path)?);
            if options.is_excluded(&canonical) {
                trace!(path = %path, "excluded");
                continue;
            }

            if let Some(scanned) = &self.scanned {
                if scanned.contains(&canonical) || !in_batch.insert(canonical.clone()) {
                    trace!(path = %path, "already scanned");
                    continue;
                }
            }

            candidates.push(Candidate {
                id: FileId::new(candidates.len() as u32),
                path,
                canonical,
            });
        }

        Ok(candidates)
    }

    /// Read and scan every candidate, keeping discovery order.
    fn extract_all(&self, candidates: &[Candidate]) -> Result<Vec<Vec<Declaration>>> {
        let provider = &self.provider;
        let extract = |candidate: &Candidate| -> Result<Vec<Declaration>> {
            let contents = provider.read(&candidate.path)?;
            Ok(scan_declarations(&contents))
        };

        if self.config.parallel {
            candidates.par_iter().map(extract).collect()
        } else {
            candidates.iter().map(extract).collect()
        }
    }

    fn filter_by_convention(
        &mut self,
        rule: &PreparedRule<'_>,
        candidate: &Candidate,
        declarations: Vec<Declaration>,
    ) -> Vec<Declaration> {
        let mut valid = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            if rule.conforms(&declaration.qualified_name, &candidate.canonical) {
                valid.push(declaration);
                continue;
            }

            let violation = Violation::convention(
                rule.rule,
                &declaration.qualified_name,
                &candidate.canonical,
                declaration.line,
            );
            warn!("{}", violation.message);
            self.map.push_violation(violation);
        }

        valid
    }

    fn fold(&mut self, batch: BatchId, name: SmolStr, path: &Arc<str>) {
        let Some(existing) = self.map.entry(&name).cloned() else {
            self.owners.insert(name.clone(), batch);
            self.map.insert(name, path.clone());
            return;
        };

        if self.owners.get(&name) == Some(&batch) {
            if existing == *path {
                return;
            }

            self.map.push_ambiguous_raw(name.clone(), path.clone());
            if self.is_reportable(&existing, path) {
                debug!(%name, canonical = %existing, duplicate = %path, "ambiguous symbol");
                self.map.push_ambiguous(name, path.clone());
            }
            return;
        }

        debug!(%name, previous = %existing, path = %path, "later batch overrides symbol");
        self.owners.insert(name.clone(), batch);
        self.map.insert(name.clone(), path.clone());
        if existing != *path {
            self.map.push_ambiguous_raw(name, existing);
        }
    }

    /// A duplicate is reportable when neither location sits in an auxiliary
    /// directory such as `tests/` or `fixtures/`.
    fn is_reportable(&self, canonical: &str, duplicate: &str) -> bool {
        let aux = self.config.auxiliary_dirs.as_slice();
        !has_dir_segment(canonical, aux) && !has_dir_segment(duplicate, aux)
    }
}

/// Scan `path` once with default settings and return the name → path map.
pub fn create_map(path: impl Into<ScanSource>) -> Result<IndexMap<SmolStr, Arc<str>>> {
    let mut generator = Generator::new();
    generator.scan(path, &ScanOptions::default())?;
    Ok(generator.into_symbol_map().into_entries())
}
