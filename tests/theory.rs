//! Integration tests for the body formula compiler: building a formula from
//! a ground theory term and translating it into clauses on a mock backend.

use telingo_rs::ast::TheoryTerm;
use telingo_rs::host::mock::MockControl;
use telingo_rs::host::Symbol;
use telingo_rs::theory::body::TranslateCtx;
use telingo_rs::theory::{construct, Arena};

fn sym(name: &str, step: i64) -> Symbol {
    Symbol::Function(name.to_string(), vec![Symbol::Number(step)])
}

#[test]
fn conjunction_of_two_atoms_binds_through_and_rules() {
    let mut ctl = MockControl::new();
    ctl.atoms.table.insert(sym("p", 0), 1);
    ctl.atoms.table.insert(sym("q", 0), 2);

    let term = TheoryTerm::Function(
        "&".to_string(),
        vec![
            TheoryTerm::Symbol("p".to_string()),
            TheoryTerm::Symbol("q".to_string()),
        ],
    );

    let table = construct::default_table();
    let mut arena = Arena::new();
    let formula = construct::build_formula(&mut arena, &term, &table).unwrap();

    let mut ctx = TranslateCtx {
        horizon: 0,
        final_literal: None,
        ctl: &mut ctl,
    };
    let lit = arena.translate(formula, 0, &mut ctx).unwrap();

    assert!(ctl
        .backend
        .rules
        .iter()
        .any(|(head, body)| head == &vec![lit] && body == &vec![1, 2]));
}

#[test]
fn next_beyond_the_horizon_is_deferred_then_resolved() {
    let mut ctl = MockControl::new();
    ctl.atoms.table.insert(sym("p", 1), 1);

    // `p'` one step in the future of step 0.
    let term = TheoryTerm::Unparsed(vec![telingo_rs::ast::UnparsedElement {
        operators: vec![">".to_string()],
        term: TheoryTerm::Symbol("p".to_string()),
    }]);

    let table = construct::default_table();
    let mut arena = Arena::new();
    let formula = construct::build_formula(&mut arena, &term, &table).unwrap();

    // Translating at step 0 with a horizon of 0 can't see step 1 yet: an
    // external literal is reserved instead of failing.
    let external = {
        let mut ctx = TranslateCtx {
            horizon: 0,
            final_literal: None,
            ctl: &mut ctl,
        };
        arena.translate(formula, 0, &mut ctx).unwrap()
    };
    assert!(ctl.backend.rules.is_empty());

    // Once the horizon reaches step 1, the pending reference resolves and
    // an equivalence with `p(1)`'s literal is emitted.
    arena.resolve_pending(1, &mut ctl).unwrap();
    assert!(ctl
        .backend
        .rules
        .iter()
        .any(|(head, body)| head == &vec![external] && body == &vec![1]));
}
