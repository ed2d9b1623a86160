//! Synthesized initializer functions for connectors, services and packages.
//!
//! Each builder returns an ordinary [`FunctionDecl`] that the entry pass
//! defines like any user function. The body replays the container's
//! variable definitions in declaration order and ends with a valueless
//! return.
//!
//! Module variables are entered before the package initializer is built, so
//! its copies keep their symbols and types. Connector and service variables
//! are not entered by this pass and their copies start unannotated.

use crate::ast::{
    Block, ConnectorDecl, FunctionDecl, Ident, InvokableDecl, ReturnStmt, ServiceDecl, Stmt,
    TypeNode, VariableDecl, VariableDef,
};
use crate::base::Pos;
use crate::config::EnterConfig;

/// `<Connector>.<init>(Connector connector)`.
pub fn connector_init(connector: &ConnectorDecl, config: &EnterConfig) -> FunctionDecl {
    let mut init = init_function(connector.pos, &config.init_name(&connector.name.value));

    let param_name = Ident::new(config.connector_param.clone(), connector.pos);
    let param_type = TypeNode::user_defined(connector.name.clone());
    init.params.push(VariableDecl::new(param_name, param_type));

    finish(init, connector.variables.iter().cloned().map(fresh))
}

/// `<Service>.<init>()`.
pub fn service_init(service: &ServiceDecl, config: &EnterConfig) -> FunctionDecl {
    let init = init_function(service.pos, &config.init_name(&service.name.value));
    finish(init, service.variables.iter().cloned().map(fresh))
}

/// `<package>.<init>()`, initializing module variables in order.
pub fn package_init(
    package: &str,
    pos: Pos,
    globals: &[VariableDecl],
    config: &EnterConfig,
) -> FunctionDecl {
    let init = init_function(pos, &config.init_name(package));
    finish(init, globals.iter().cloned().map(VariableDef::new))
}

fn init_function(pos: Pos, name: &str) -> FunctionDecl {
    InvokableDecl::new(Ident::new(name, pos))
}

fn finish(mut init: FunctionDecl, defs: impl Iterator<Item = VariableDef>) -> FunctionDecl {
    let mut body = Block::new(init.pos);
    body.stmts.extend(defs.map(Stmt::VariableDef));
    body.stmts.push(Stmt::Return(ReturnStmt {
        pos: init.pos,
        exprs: Vec::new(),
    }));
    init.body = Some(body);
    init
}

fn fresh(mut def: VariableDef) -> VariableDef {
    def.var.symbol = None;
    def.var.ty = None;
    def.var.type_node.ty = None;
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Flags, Primitive, TypeNodeKind};
    use crate::hir::{SymbolId, TypeId};

    fn var(name: &str) -> VariableDecl {
        VariableDecl::new(
            Ident::new(name, Pos::default()),
            TypeNode::value(Pos::default(), Primitive::Int),
        )
    }

    fn body_names(init: &FunctionDecl) -> Vec<&str> {
        init.body
            .as_ref()
            .map(|body| {
                body.stmts
                    .iter()
                    .map(|stmt| match stmt {
                        Stmt::VariableDef(def) => def.var.name.value.as_str(),
                        Stmt::Return(_) => "return",
                        Stmt::Expr(_) => "expr",
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_package_init_body_order() {
        let globals = [var("x"), var("y"), var("z")];
        let init = package_init("demo", Pos::default(), &globals, &EnterConfig::default());

        assert_eq!(init.name.value, "demo.<init>");
        assert_eq!(body_names(&init), ["x", "y", "z", "return"]);
        assert!(init.params.is_empty());
    }

    #[test]
    fn test_package_init_keeps_global_annotations() {
        let mut x = var("x");
        x.symbol = Some(SymbolId::from_index(7));
        x.ty = Some(TypeId::from_index(2));

        let init = package_init("demo", Pos::default(), &[x], &EnterConfig::default());

        let Some(Stmt::VariableDef(def)) = init.body.as_ref().and_then(|b| b.stmts.first()) else {
            panic!("expected a variable definition first");
        };
        assert_eq!(def.var.symbol, Some(SymbolId::from_index(7)));
        assert_eq!(def.var.ty, Some(TypeId::from_index(2)));
    }

    #[test]
    fn test_connector_init_takes_connector_param() {
        let connector = ConnectorDecl {
            pos: Pos::default(),
            name: Ident::new("Http", Pos::default()),
            flags: Flags::PUBLIC,
            variables: vec![VariableDef::new(var("timeout"))],
            actions: Vec::new(),
            init_function: None,
            symbol: None,
        };
        let config = EnterConfig::default().with_connector_param("self");

        let init = connector_init(&connector, &config);

        assert_eq!(init.name.value, "Http.<init>");
        assert_eq!(init.params.len(), 1);
        assert_eq!(init.params[0].name.value, "self");
        assert!(matches!(
            &init.params[0].type_node.kind,
            TypeNodeKind::UserDefined { pkg_alias: None, name } if name.value == "Http"
        ));
        assert_eq!(body_names(&init), ["timeout", "return"]);
    }

    #[test]
    fn test_service_init_with_custom_suffix() {
        let service = ServiceDecl {
            pos: Pos::default(),
            name: Ident::new("echo", Pos::default()),
            flags: Flags::empty(),
            variables: Vec::new(),
            resources: Vec::new(),
            init_function: None,
            symbol: None,
        };
        let config = EnterConfig::default().with_init_suffix("init");

        let init = service_init(&service, &config);

        assert_eq!(init.name.value, "echo.init");
        assert_eq!(body_names(&init), ["return"]);
    }
}
