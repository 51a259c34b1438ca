//! Interface to the external descriptor parsers.
//!
//! Matrix definition files and memory layout files are read by a parsing collaborator
//! outside of this crate. Equation systems only see the [`DescriptorSource`] trait, which
//! hands out already parsed, in-memory values.
use crate::entry::{EntrySet, HintRules};
use crate::layout::MemoryLayout;
use eyre::eyre;
use log::debug;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

pub trait DescriptorSource {
    /// The entries of an XML matrix definition file.
    fn matrix_file(&self, path: &Path, hints: &HintRules) -> eyre::Result<EntrySet>;

    /// The entries of a JSON matrix definition file, such as sampling directions.
    fn json_matrix_file(&self, path: &Path, hints: &HintRules) -> eyre::Result<EntrySet>;

    /// The memory layout descriptor at the given path.
    fn memory_layout(&self, path: &Path) -> eyre::Result<MemoryLayout>;
}

/// A [`DescriptorSource`] serving pre-parsed descriptors keyed by path.
#[derive(Clone, Debug, Default)]
pub struct DescriptorStore {
    matrices: FxHashMap<PathBuf, EntrySet>,
    layouts: FxHashMap<PathBuf, MemoryLayout>,
}

impl DescriptorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matrices(mut self, path: impl Into<PathBuf>, entries: EntrySet) -> Self {
        self.insert_matrices(path, entries);
        self
    }

    pub fn with_layout(mut self, path: impl Into<PathBuf>, layout: MemoryLayout) -> Self {
        self.insert_layout(path, layout);
        self
    }

    pub fn insert_matrices(&mut self, path: impl Into<PathBuf>, entries: EntrySet) {
        self.matrices.insert(path.into(), entries);
    }

    pub fn insert_layout(&mut self, path: impl Into<PathBuf>, layout: MemoryLayout) {
        self.layouts.insert(path.into(), layout);
    }

    fn entries_with_hints(&self, path: &Path, hints: &HintRules) -> eyre::Result<EntrySet> {
        let mut entries = self
            .matrices
            .get(path)
            .cloned()
            .ok_or_else(|| eyre!("no matrix descriptor available for {}", path.display()))?;
        entries.apply_hint_rules(hints);
        debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(entries)
    }
}

impl DescriptorSource for DescriptorStore {
    fn matrix_file(&self, path: &Path, hints: &HintRules) -> eyre::Result<EntrySet> {
        self.entries_with_hints(path, hints)
    }

    fn json_matrix_file(&self, path: &Path, hints: &HintRules) -> eyre::Result<EntrySet> {
        self.entries_with_hints(path, hints)
    }

    fn memory_layout(&self, path: &Path) -> eyre::Result<MemoryLayout> {
        self.layouts
            .get(path)
            .cloned()
            .ok_or_else(|| eyre!("no memory layout descriptor available for {}", path.display()))
    }
}
