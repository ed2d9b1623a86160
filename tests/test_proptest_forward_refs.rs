//! Property-based tests for struct entry.
//!
//! Generates packages of distinct struct names in arbitrary order, each
//! struct holding a field typed by the next one, so that most references
//! point forward in source order.
#![cfg(feature = "proptest")]

mod common;

use common::*;
use lumen::ast::TopLevelNode;
use lumen::hir::codes;
use proptest::prelude::*;

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Distinct capitalized identifiers, never colliding with primitive keywords.
fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[A-Z][a-zA-Z0-9_]{0,10}", 1..16)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

fn chained_structs(names: &[String]) -> Vec<TopLevelNode> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let next = &names[(i + 1) % names.len()];
            TopLevelNode::Struct(structure(name, vec![var("next", named(next))]))
        })
        .collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_every_struct_is_defined_and_resolvable(names in arb_names()) {
        let mut pkg = package(chained_structs(&names));

        let (session, p) = enter(&mut pkg);

        prop_assert!(session.diagnostics().is_empty(), "{:?}", session.diagnostics());
        for (i, name) in names.iter().enumerate() {
            let symbol = session.member(p, name);
            prop_assert!(symbol.is_some(), "missing struct {}", name);

            let next = member(&session, p, &names[(i + 1) % names.len()]);
            let field_ty = pkg.structs[i].fields[0].ty;
            prop_assert_eq!(field_ty, Some(session.symbols().type_of(next)));
        }
    }

    #[test]
    fn prop_one_duplicate_yields_one_diagnostic(
        names in arb_names(),
        pick in any::<prop::sample::Index>(),
    ) {
        let first = pick.index(names.len());
        let duplicate = names[first].clone();
        let mut nodes = chained_structs(&names);
        nodes.push(TopLevelNode::Struct(structure(&duplicate, vec![])));
        let mut pkg = package(nodes);

        let (session, p) = enter(&mut pkg);

        prop_assert_eq!(
            session.diagnostics().with_code(codes::DUPLICATE_DEFINITION).len(),
            1
        );
        // Every struct plus the package initializer.
        prop_assert_eq!(session.scope_names(p).len(), names.len() + 1);
        prop_assert_eq!(session.member(p, &duplicate), pkg.structs[first].symbol);
    }
}
