//! Compilation session: the state shared by every package entered together.

use std::sync::Arc;

use smol_str::SmolStr;
use tracing::debug;

use crate::ast::Package;
use crate::base::Interner;
use crate::config::EnterConfig;
use crate::hir::{
    DiagnosticLog, EnterError, LoadError, LoadState, PackageLoader, PackageName, PackageSource,
    SymbolEnter, SymbolId, SymbolResolver, SymbolTable, SymbolTag,
};

/// Owns the symbol arena, diagnostics and import loader for one compilation.
///
/// The [`Interner`] may be shared with other sessions; everything else is
/// private to this one.
#[derive(Debug)]
pub struct Session {
    pub(crate) interner: Arc<Interner>,
    pub(crate) config: EnterConfig,
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: DiagnosticLog,
    pub(crate) loader: PackageLoader,
}

impl Session {
    pub fn new(source: impl PackageSource + 'static) -> Self {
        Self {
            interner: Arc::new(Interner::new()),
            config: EnterConfig::default(),
            symbols: SymbolTable::new(),
            diagnostics: DiagnosticLog::new(),
            loader: PackageLoader::new(source),
        }
    }

    pub fn with_config(mut self, config: EnterConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a shared interner. Call before entering any package.
    pub fn with_interner(mut self, interner: Arc<Interner>) -> Self {
        self.interner = interner;
        self
    }

    /// Run the entry pass over a package the caller owns.
    pub fn define_package(&mut self, pkg: &mut Package) -> Result<SymbolId, EnterError> {
        SymbolEnter::new(self).define_package(pkg)
    }

    /// Load, enter and cache the package `name`.
    ///
    /// `name` is the import path. Idempotent per path and version, whatever
    /// name the fetched package declares. Requests for a package that is
    /// still being entered fail with [`LoadError::Cycle`].
    pub fn load_package(&mut self, name: &PackageName) -> Result<SymbolId, LoadError> {
        let package = name.render(&self.interner);
        match self.loader.state(name) {
            Some(LoadState::Loaded(symbol)) => return Ok(symbol),
            Some(LoadState::InProgress) => return Err(LoadError::Cycle { package }),
            Some(LoadState::Failed) => return Err(LoadError::Failed { package }),
            None => {}
        }

        let path: Vec<SmolStr> = name
            .components
            .iter()
            .map(|&c| self.interner.resolve(c))
            .collect();
        let path: Vec<&str> = path.iter().map(SmolStr::as_str).collect();
        let version = name.version.map(|v| self.interner.resolve(v));
        let Some(mut pkg) = self.loader.fetch(&path, version.as_deref()) else {
            return Err(LoadError::NotFound { package });
        };

        debug!(%package, "loading imported package");
        self.loader.set_state(name.clone(), LoadState::InProgress);
        let entered = SymbolEnter::new(self)
            .with_import_path(name.clone())
            .define_package(&mut pkg);
        match entered {
            Ok(symbol) => {
                self.loader.set_state(name.clone(), LoadState::Loaded(symbol));
                self.loader.publish(pkg);
                Ok(symbol)
            }
            Err(_) => {
                self.loader.set_state(name.clone(), LoadState::Failed);
                Err(LoadError::Failed { package })
            }
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// A handle to the interner, for building another session over the same
    /// names with [`with_interner`](Self::with_interner).
    pub fn shared_interner(&self) -> Arc<Interner> {
        Arc::clone(&self.interner)
    }

    pub fn config(&self) -> &EnterConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn loader(&self) -> &PackageLoader {
        &self.loader
    }

    /// A resolver over this session's table, for later passes.
    pub fn resolver(&mut self) -> SymbolResolver<'_> {
        SymbolResolver::new(&mut self.symbols, &self.interner, &mut self.diagnostics)
    }

    /// Text of a symbol's name.
    pub fn name_of(&self, symbol: SymbolId) -> SmolStr {
        self.interner.resolve(self.symbols.symbol(symbol).name)
    }

    /// Look `name` up in the scope owned by `container`, of any kind.
    pub fn member(&self, container: SymbolId, name: &str) -> Option<SymbolId> {
        let scope = self.symbols.symbol(container).scope?;
        let name = self.interner.intern(name);
        self.symbols.scope(scope).get(name)
    }

    /// Like [`member`](Self::member), restricted to kinds matching `tag`.
    pub fn member_of_kind(&self, container: SymbolId, name: &str, tag: SymbolTag) -> Option<SymbolId> {
        self.member(container, name)
            .filter(|&id| self.symbols.symbol(id).kind.tag().intersects(tag))
    }

    /// Names bound in the scope owned by `container`, in definition order.
    pub fn scope_names(&self, container: SymbolId) -> Vec<SmolStr> {
        let Some(scope) = self.symbols.symbol(container).scope else {
            return Vec::new();
        };
        self.symbols
            .scope(scope)
            .entries()
            .map(|(name, _)| self.interner.resolve(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::MemorySource;

    #[test]
    fn test_session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Session>();
    }

    #[test]
    fn test_missing_package_is_not_found() {
        let mut session = Session::new(MemorySource::new());
        let name = PackageName::new(vec![session.interner().intern("nowhere")], None);

        assert_eq!(
            session.load_package(&name),
            Err(LoadError::NotFound {
                package: "nowhere".into()
            })
        );
        assert_eq!(session.loader().state(&name), None);
    }

    #[test]
    fn test_load_package_is_idempotent() {
        let mut session = Session::new(MemorySource::new().with("q", Package::default()));
        let name = PackageName::new(vec![session.interner().intern("q")], None);

        let first = session.load_package(&name);
        let second = session.load_package(&name);

        assert!(first.is_ok());
        assert_eq!(first, second);
        assert_eq!(session.loader().loaded().len(), 1);
    }

    #[test]
    fn test_sessions_share_one_interner() {
        let first = Session::new(MemorySource::new());
        let point = first.interner().intern("Point");
        let second = Session::new(MemorySource::new()).with_interner(first.shared_interner());

        assert_eq!(second.interner().intern("Point"), point);
        let origin = second.interner().intern("origin");
        assert_eq!(first.interner().resolve(origin), "origin");
        assert!(Arc::ptr_eq(&first.shared_interner(), &second.shared_interner()));
    }
}
