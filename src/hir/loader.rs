//! Package loading for imports.
//!
//! A [`PackageSource`] hands out unentered package ASTs by name; the
//! [`PackageLoader`] remembers what has been requested so that each package
//! is entered at most once and import cycles are caught instead of recursed.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use thiserror::Error;

use crate::ast::Package;

use super::{PackageName, SymbolId};

// ============================================================================
// ERRORS
// ============================================================================

/// Why an imported package could not be provided.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("package '{package}' not found")]
    NotFound { package: String },
    #[error("package '{package}' is part of an import cycle")]
    Cycle { package: String },
    #[error("package '{package}' failed to load")]
    Failed { package: String },
}

/// A failure that aborts symbol entry for a package.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EnterError {
    #[error("import of '{package}' failed")]
    Import {
        package: String,
        #[source]
        source: LoadError,
    },
}

// ============================================================================
// SOURCES
// ============================================================================

/// Provider of package ASTs, keyed by textual package path.
pub trait PackageSource: Send {
    /// Fetch a fresh copy of the package at `path`, if it exists.
    fn fetch(&self, path: &[&str], version: Option<&str>) -> Option<Package>;
}

/// An in-memory [`PackageSource`].
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    packages: IndexMap<(String, Option<String>), Package, FxBuildHasher>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `package` under a dotted path such as `"lang.net"`.
    pub fn insert(&mut self, path: &str, version: Option<&str>, package: Package) {
        self.packages
            .insert((path.to_string(), version.map(str::to_string)), package);
    }

    pub fn with(mut self, path: &str, package: Package) -> Self {
        self.insert(path, None, package);
        self
    }

    pub fn contains(&self, path: &str, version: Option<&str>) -> bool {
        self.packages
            .contains_key(&(path.to_string(), version.map(str::to_string)))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl PackageSource for MemorySource {
    fn fetch(&self, path: &[&str], version: Option<&str>) -> Option<Package> {
        let key = (path.join("."), version.map(str::to_string));
        self.packages.get(&key).cloned()
    }
}

// ============================================================================
// LOADER
// ============================================================================

/// Progress of one package through symbol entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    InProgress,
    Loaded(SymbolId),
    Failed,
}

/// Tracks package entry state and keeps the ASTs of loaded imports alive.
pub struct PackageLoader {
    source: Box<dyn PackageSource>,
    states: IndexMap<PackageName, LoadState, FxBuildHasher>,
    loaded: Vec<Package>,
}

impl PackageLoader {
    pub fn new(source: impl PackageSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            states: IndexMap::default(),
            loaded: Vec::new(),
        }
    }

    pub fn state(&self, name: &PackageName) -> Option<LoadState> {
        self.states.get(name).copied()
    }

    pub fn set_state(&mut self, name: PackageName, state: LoadState) {
        self.states.insert(name, state);
    }

    pub fn fetch(&self, path: &[&str], version: Option<&str>) -> Option<Package> {
        self.source.fetch(path, version)
    }

    /// Keep an entered import's AST; its nodes carry the symbol links.
    pub fn publish(&mut self, package: Package) {
        self.loaded.push(package);
    }

    /// Imported packages in the order they finished entering.
    pub fn loaded(&self) -> &[Package] {
        &self.loaded
    }

    /// Package names in the order they were first requested.
    pub fn states(&self) -> impl Iterator<Item = (&PackageName, LoadState)> + '_ {
        self.states.iter().map(|(name, &state)| (name, state))
    }
}

impl std::fmt::Debug for PackageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageLoader")
            .field("states", &self.states)
            .field("loaded", &self.loaded.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Interner;

    #[test]
    fn test_memory_source_fetch_by_dotted_path() {
        let source = MemorySource::new().with("lang.net", Package::default());

        assert!(source.fetch(&["lang", "net"], None).is_some());
        assert!(source.fetch(&["lang"], None).is_none());
        assert!(source.fetch(&["lang", "net"], Some("1.0")).is_none());
    }

    #[test]
    fn test_loader_tracks_state() {
        let interner = Interner::new();
        let mut loader = PackageLoader::new(MemorySource::new());
        let name = PackageName::new(vec![interner.intern("q")], None);

        assert_eq!(loader.state(&name), None);
        loader.set_state(name.clone(), LoadState::InProgress);
        assert_eq!(loader.state(&name), Some(LoadState::InProgress));
        loader.set_state(name.clone(), LoadState::Failed);
        assert_eq!(loader.state(&name), Some(LoadState::Failed));
        assert_eq!(loader.states().count(), 1);
    }

    #[test]
    fn test_enter_error_chains_load_error() {
        use std::error::Error as _;

        let err = EnterError::Import {
            package: "q".into(),
            source: LoadError::Cycle { package: "q".into() },
        };
        assert_eq!(err.to_string(), "import of 'q' failed");
        assert_eq!(
            err.source().map(|e| e.to_string()),
            Some("package 'q' is part of an import cycle".to_string())
        );
    }
}
