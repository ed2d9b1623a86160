//! SymbolEnter: the first semantic pass.
//!
//! Walks a populated [`Package`] and creates a symbol for every
//! package-level and member-level declaration, links each to its scope,
//! resolves declared types, and synthesizes initializer functions.
//!
//! Stages run in a fixed order so that forward references within a package
//! resolve no matter where a declaration sits in the source:
//!
//! ```text
//!  1. package symbol          6. connector actions
//!  2. imports                 7. functions and methods
//!  3. struct shapes           8. service init + resources
//!  4. connector/service       9. module variables
//!     shapes + connector init 10. package init
//!  5. struct fields
//! ```
//!
//! Type references are only resolved from stage 4 on, after every
//! type-defining name of the package is already in scope.

use tracing::{debug, trace, warn};

use crate::ast::{
    ConnectorDecl, Flags, FunctionDecl, Ident, ImportDecl, InvokableDecl, Package, ServiceDecl,
    StructDecl, VariableDecl,
};
use crate::base::{Name, Pos};
use crate::session::Session;

use super::init;
use super::loader::{EnterError, LoadError, LoadState};
use super::resolve::SymbolResolver;
use super::types::{InvokableType, StructField, Type};
use super::{
    Env, EnvNode, InvokableInfo, PackageName, ScopeId, Symbol, SymbolDetail, SymbolId, SymbolKind,
    SymbolTag, TypeId,
};

/// One run of the entry pass over one package.
pub struct SymbolEnter<'s> {
    session: &'s mut Session,
    /// The import path this package was loaded by, if any.
    import_path: Option<PackageName>,
}

impl<'s> SymbolEnter<'s> {
    pub fn new(session: &'s mut Session) -> Self {
        Self {
            session,
            import_path: None,
        }
    }

    /// Enter a package on behalf of an import of `path`.
    ///
    /// The path keys the package's load state, whatever name the package
    /// declares, and names the package when it declares none.
    pub fn with_import_path(mut self, path: PackageName) -> Self {
        self.import_path = Some(path);
        self
    }

    /// Enter every declaration of `pkg` and return its package symbol.
    ///
    /// Recoverable problems end up in the session's diagnostics. Only a
    /// failed import aborts the package, after all its imports were tried.
    #[tracing::instrument(level = "debug", skip_all, fields(units = pkg.compilation_units.len()))]
    pub fn define_package(mut self, pkg: &mut Package) -> Result<SymbolId, EnterError> {
        pkg.populate();

        let (env, name) = self.define_package_symbol(pkg);
        let key = self.import_path.clone().unwrap_or(name);
        self.session
            .loader
            .set_state(key.clone(), LoadState::InProgress);

        let result = self.define_members(pkg, env);

        let state = match result {
            Ok(()) => LoadState::Loaded(env.package),
            Err(_) => LoadState::Failed,
        };
        self.session.loader.set_state(key, state);
        result.map(|()| env.package)
    }

    fn define_members(&mut self, pkg: &mut Package, env: Env) -> Result<(), EnterError> {
        debug!(count = pkg.imports.len(), "defining imports");
        let mut failed = None;
        for import in &mut pkg.imports {
            if let Err(err) = self.define_import(import, env) {
                failed.get_or_insert(err);
            }
        }
        if let Some(err) = failed {
            return Err(err);
        }

        debug!(count = pkg.structs.len(), "defining struct shapes");
        for decl in &mut pkg.structs {
            decl.symbol = Some(self.define_container(
                SymbolKind::Type,
                &decl.name,
                decl.flags,
                decl.pos,
                env,
            ));
        }

        debug!(
            connectors = pkg.connectors.len(),
            services = pkg.services.len(),
            "defining connector and service shapes"
        );
        for decl in &mut pkg.connectors {
            self.define_connector(decl, env);
        }
        for decl in &mut pkg.services {
            decl.symbol = Some(self.define_container(
                SymbolKind::Service,
                &decl.name,
                decl.flags,
                decl.pos,
                env,
            ));
        }

        debug!(count = pkg.structs.len(), "defining struct fields");
        for decl in &mut pkg.structs {
            self.define_struct_fields(decl, env);
        }

        debug!(count = pkg.connectors.len(), "defining connector actions");
        for decl in &mut pkg.connectors {
            self.define_actions(decl, env);
        }

        debug!(count = pkg.functions.len(), "defining functions");
        for func in &mut pkg.functions {
            self.define_function(func, env);
        }

        debug!(count = pkg.services.len(), "defining service members");
        for decl in &mut pkg.services {
            self.define_service_members(decl, env);
        }

        debug!(count = pkg.global_vars.len(), "defining module variables");
        for var in &mut pkg.global_vars {
            self.define_variable(var, env);
        }

        self.define_package_init(pkg, env);
        Ok(())
    }

    // ========================================================================
    // PACKAGE AND IMPORTS
    // ========================================================================

    fn define_package_symbol(&mut self, pkg: &mut Package) -> (Env, PackageName) {
        let interner = &self.session.interner;
        let name = match &pkg.pkg_decl {
            Some(decl) => PackageName::new(
                decl.name.iter().map(|c| interner.intern(&c.value)).collect(),
                decl.version.as_ref().map(|v| interner.intern(&v.value)),
            ),
            None => match &self.import_path {
                Some(name) => name.clone(),
                None => PackageName::new(
                    vec![interner.intern(&self.session.config.default_package)],
                    None,
                ),
            },
        };
        let rendered = name.render(interner);
        let symbol_name = interner.intern(&rendered);

        let table = &mut self.session.symbols;
        let pkg_id = table.intern_package(name.clone());
        let package_type = table.types.builtins().package;
        let root = table.root();
        let symbol = table.alloc_symbol(
            Symbol::new(SymbolKind::Package, symbol_name, pkg_id, pkg.pos)
                .with_owner(root)
                .with_type(package_type),
        );
        let scope = table.alloc_scope(symbol, None);
        pkg.symbol = Some(symbol);

        debug!(package = %rendered, ?symbol, "entering package");
        (Env::package(symbol, pkg_id, scope), name)
    }

    fn define_import(&mut self, import: &mut ImportDecl, env: Env) -> Result<(), EnterError> {
        let interner = &self.session.interner;
        let name = PackageName::new(
            import.path.iter().map(|c| interner.intern(&c.value)).collect(),
            import.version.as_ref().map(|v| interner.intern(&v.value)),
        );

        let package = match self.session.load_package(&name) {
            Ok(package) => package,
            Err(source) => {
                let rendered = name.render(&self.session.interner);
                warn!(package = %rendered, error = %source, "import failed");
                match source {
                    LoadError::Cycle { .. } => {
                        self.session.diagnostics.circular_import(import.pos, &rendered)
                    }
                    _ => self.session.diagnostics.import_failed(
                        import.pos,
                        &rendered,
                        &source.to_string(),
                    ),
                }
                return Err(EnterError::Import {
                    package: rendered,
                    source,
                });
            }
        };

        import.symbol = Some(package);
        let alias = self.session.interner.intern(import.alias_text());
        self.resolver().define(import.pos, env.scope, alias, package);
        Ok(())
    }

    // ========================================================================
    // CONTAINERS
    // ========================================================================

    /// Symbol, type and scope for a struct, connector or service.
    fn define_container(
        &mut self,
        kind: SymbolKind,
        ident: &Ident,
        flags: Flags,
        pos: Pos,
        env: Env,
    ) -> SymbolId {
        let name = self.intern(ident);
        let owner = self.owner_of(env.scope);

        let table = &mut self.session.symbols;
        let symbol = table.alloc_symbol(
            Symbol::new(kind, name, env.pkg, pos)
                .with_flags(flags)
                .with_owner(owner),
        );
        let ty = match kind {
            SymbolKind::Type => table.types.new_struct(symbol),
            SymbolKind::Connector => table.types.alloc(Type::Connector { symbol }),
            SymbolKind::Service => table.types.alloc(Type::Service { symbol }),
            _ => table.types.builtins().no_type,
        };
        table.symbol_mut(symbol).ty = Some(ty);
        table.alloc_scope(symbol, Some(env.scope));

        self.resolver().define(pos, env.scope, name, symbol);
        symbol
    }

    fn define_struct_fields(&mut self, decl: &mut StructDecl, env: Env) {
        let Some(symbol) = decl.symbol else {
            return;
        };
        let sym = self.session.symbols.symbol(symbol);
        let (Some(scope), Some(ty)) = (sym.scope, sym.ty) else {
            return;
        };
        let struct_env = env.nested(EnvNode::Struct, scope);

        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &mut decl.fields {
            let ty = self.define_variable(field, struct_env);
            fields.push(StructField {
                name: self.intern(&field.name),
                ty,
            });
        }
        self.session.symbols.types.seal_struct(ty, fields);
    }

    fn define_connector(&mut self, decl: &mut ConnectorDecl, env: Env) {
        decl.symbol = Some(self.define_container(
            SymbolKind::Connector,
            &decl.name,
            decl.flags,
            decl.pos,
            env,
        ));

        let mut init = init::connector_init(decl, &self.session.config);
        self.define_function(&mut init, env);
        decl.init_function = Some(init);
    }

    fn define_actions(&mut self, decl: &mut ConnectorDecl, env: Env) {
        let Some(scope) = self.scope_of(decl.symbol) else {
            return;
        };
        let connector_env = env.nested(EnvNode::Connector, scope);
        for action in &mut decl.actions {
            let name = self.intern(&action.name);
            self.define_invokable(action, SymbolKind::Action, name, None, connector_env);
        }
    }

    fn define_service_members(&mut self, decl: &mut ServiceDecl, env: Env) {
        let mut init = init::service_init(decl, &self.session.config);
        self.define_function(&mut init, env);
        decl.init_function = Some(init);

        let Some(scope) = self.scope_of(decl.symbol) else {
            return;
        };
        let service_env = env.nested(EnvNode::Service, scope);
        for resource in &mut decl.resources {
            let name = self.intern(&resource.name);
            self.define_invokable(resource, SymbolKind::Resource, name, None, service_env);
        }
    }

    fn define_package_init(&mut self, pkg: &mut Package, env: Env) {
        let package_name = self
            .session
            .interner
            .resolve(self.session.symbols.symbol(env.package).name);
        let mut init = init::package_init(
            &package_name,
            pkg.pos,
            &pkg.global_vars,
            &self.session.config,
        );
        self.define_function(&mut init, env);
        pkg.init_function = Some(init);
    }

    // ========================================================================
    // INVOKABLES
    // ========================================================================

    /// A top-level function, or a method when it has a receiver.
    fn define_function(&mut self, func: &mut FunctionDecl, env: Env) -> SymbolId {
        let (kind, name, receiver_ty) = match func.receiver.as_mut() {
            None => (SymbolKind::Function, self.intern(&func.name), None),
            Some(receiver) => {
                let ty = self.resolve_receiver(&func.name, receiver, env);
                let qualified = format!("{}.{}", receiver.type_node, func.name.value);
                let name = self.session.interner.intern(&qualified);
                (SymbolKind::Method, name, Some(ty))
            }
        };

        if receiver_ty.is_some() {
            func.flags |= Flags::ATTACHED;
        }
        let symbol = self.define_invokable(func, kind, name, receiver_ty, env);
        if let Some(ty) = receiver_ty {
            self.check_field_clash(&func.name, ty);
        }
        symbol
    }

    /// Receiver type, or the error type when it is not a local struct.
    fn resolve_receiver(&mut self, func: &Ident, receiver: &mut VariableDecl, env: Env) -> TypeId {
        let ty = self.resolver().resolve_type(&mut receiver.type_node, &env);

        let table = &self.session.symbols;
        if table.types.is_error(ty) {
            return ty;
        }
        let declared_in = table
            .types
            .as_struct(ty)
            .map(|st| table.symbol(st.symbol).pkg);
        if declared_in == Some(env.pkg) {
            return ty;
        }

        let type_name = table.type_name(ty, &self.session.interner);
        match declared_in {
            Some(_) => self
                .session
                .diagnostics
                .receiver_not_local(receiver.pos, &func.value, &type_name),
            None => self
                .session
                .diagnostics
                .receiver_not_struct(receiver.pos, &func.value, &type_name),
        }
        table.types.error()
    }

    fn check_field_clash(&mut self, func: &Ident, receiver_ty: TypeId) {
        let table = &self.session.symbols;
        let struct_scope = table
            .types
            .as_struct(receiver_ty)
            .and_then(|st| table.symbol(st.symbol).scope);
        let Some(struct_scope) = struct_scope else {
            return;
        };

        let field = self.intern(func);
        if self
            .resolver()
            .lookup_member(struct_scope, field, SymbolTag::VARIABLE)
            .is_some()
        {
            let type_name = self
                .session
                .symbols
                .type_name(receiver_ty, &self.session.interner);
            self.session
                .diagnostics
                .field_method_clash(func.pos, &func.value, &type_name);
        }
    }

    /// Symbol, scope, parameters, receiver, returns, workers and type of one
    /// invokable, defined into `env.scope` under `name`.
    fn define_invokable(
        &mut self,
        decl: &mut InvokableDecl,
        kind: SymbolKind,
        name: Name,
        receiver_ty: Option<TypeId>,
        env: Env,
    ) -> SymbolId {
        if matches!(env.node, EnvNode::Connector | EnvNode::Service) {
            decl.flags |= Flags::PUBLIC;
        }
        let owner = self.owner_of(env.scope);
        let table = &mut self.session.symbols;
        let symbol = table.alloc_symbol(
            Symbol::new(kind, name, env.pkg, decl.pos)
                .with_flags(decl.flags)
                .with_owner(owner),
        );
        let scope = table.alloc_scope(symbol, Some(env.scope));
        decl.symbol = Some(symbol);
        self.resolver().define(decl.pos, env.scope, name, symbol);

        let body_env = env.invokable(symbol, scope);
        let mut info = InvokableInfo::default();
        let mut signature = InvokableType::default();

        for param in &mut decl.params {
            signature.params.push(self.define_variable(param, body_env));
            info.params.extend(param.symbol);
        }
        if let (Some(receiver), Some(ty)) = (decl.receiver.as_mut(), receiver_ty) {
            self.define_var_symbol(receiver, ty, body_env);
            info.receiver = receiver.symbol;
            signature.receiver = Some(ty);
        }
        for ret in &mut decl.ret_params {
            signature.returns.push(self.define_variable(ret, body_env));
            info.ret_params.extend(ret.symbol);
        }
        for worker in &mut decl.workers {
            let worker_name = self.intern(&worker.name);
            self.define_invokable(worker, SymbolKind::Worker, worker_name, None, body_env);
        }

        let table = &mut self.session.symbols;
        let ty = table.types.alloc(Type::Invokable(signature));
        let sym = table.symbol_mut(symbol);
        sym.ty = Some(ty);
        sym.detail = SymbolDetail::Invokable(info);
        trace!(?symbol, kind = kind.display(), parent = ?env.invokable, "defined invokable");
        symbol
    }

    // ========================================================================
    // VARIABLES
    // ========================================================================

    /// Resolve the declared type, then define the variable. Returns the type.
    fn define_variable(&mut self, var: &mut VariableDecl, env: Env) -> TypeId {
        let ty = self.resolver().resolve_type(&mut var.type_node, &env);
        self.define_var_symbol(var, ty, env);
        ty
    }

    /// Unnamed bindings get their type recorded but no symbol. Struct
    /// fields are always public.
    fn define_var_symbol(&mut self, var: &mut VariableDecl, ty: TypeId, env: Env) {
        var.ty = Some(ty);
        if env.node == EnvNode::Struct {
            var.flags |= Flags::PUBLIC;
        }
        let name = self.intern(&var.name);
        if name.is_empty() {
            return;
        }

        // Parameters, receivers and returns belong to the invokable.
        let owner = env
            .invokable
            .unwrap_or_else(|| self.owner_of(env.scope));
        let symbol = self.session.symbols.alloc_symbol(
            Symbol::new(SymbolKind::Variable, name, env.pkg, var.pos)
                .with_flags(var.flags)
                .with_owner(owner)
                .with_type(ty),
        );
        var.symbol = Some(symbol);
        self.resolver().define(var.pos, env.scope, name, symbol);
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn resolver(&mut self) -> SymbolResolver<'_> {
        SymbolResolver::new(
            &mut self.session.symbols,
            &self.session.interner,
            &mut self.session.diagnostics,
        )
    }

    fn intern(&self, ident: &Ident) -> Name {
        self.session.interner.intern(&ident.value)
    }

    fn owner_of(&self, scope: ScopeId) -> SymbolId {
        self.session.symbols.scope(scope).owner
    }

    fn scope_of(&self, symbol: Option<SymbolId>) -> Option<ScopeId> {
        symbol.and_then(|s| self.session.symbols.symbol(s).scope)
    }
}
