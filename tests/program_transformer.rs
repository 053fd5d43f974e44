//! Integration tests for the program transformer: classification into
//! initial/always/dynamic parts, time-argument threading, and the
//! synthesized `__final` external. Programs are built by hand here since
//! parsing source text is the host's job, not this crate's.

use telingo_rs::ast::{
    BodyLiteral, Directive, Head, Literal, Location, Position, Program, Rule, Sign, Signature,
    SymbolicAtom, Statement, Term, TheoryAtom, TheoryAtomElement, TheoryTerm,
};
use telingo_rs::program_transformer::ProgramTransformer;
use telingo_rs::types::err::ErrorKind;

fn loc() -> Location {
    Location::at(Position::new("test.lp", 1, 1))
}

fn literal(name: &str, sign: Sign) -> Literal {
    Literal {
        location: loc(),
        sign,
        atom: SymbolicAtom {
            term: Term::constant(name),
        },
    }
}

fn program_directive(name: &str) -> Statement {
    Statement::Directive(Directive::Program {
        name: name.to_string(),
        params: Vec::new(),
    })
}

#[test]
fn rules_are_bucketed_by_active_program_part() {
    let program = Program {
        statements: vec![
            program_directive("base"),
            Statement::Rule(Rule {
                location: loc(),
                head: Head::Literal(literal("p", Sign::NoSign)),
                body: vec![],
            }),
            program_directive("dynamic"),
            Statement::Rule(Rule {
                location: loc(),
                head: Head::Literal(literal("q", Sign::NoSign)),
                body: vec![BodyLiteral::Literal(literal("p", Sign::Negation))],
            }),
        ],
    };

    let out = ProgramTransformer::new().transform(&program).unwrap();

    assert_eq!(out.initial.len(), 1);
    assert_eq!(out.dynamic.len(), 1);
    // `always` only carries the synthesized __final external.
    assert_eq!(out.always.len(), 1);

    let Statement::Rule(rule) = &out.initial[0] else {
        panic!("expected a rule");
    };
    let Head::Literal(head) = &rule.head else {
        panic!("expected a literal head");
    };
    // `p` at part "initial" gets an appended time argument.
    assert_eq!(head.atom.term.name(), Some("p"));
    assert_eq!(head.atom.term.args().len(), 1);
}

#[test]
fn always_rules_get_a_not_final_guard() {
    let program = Program {
        statements: vec![
            program_directive("always"),
            Statement::Rule(Rule {
                location: loc(),
                head: Head::Literal(literal("p", Sign::NoSign)),
                body: vec![],
            }),
        ],
    };

    let out = ProgramTransformer::new().transform(&program).unwrap();
    let Statement::Rule(rule) = &out.always[0] else {
        panic!("expected a rule");
    };
    assert_eq!(rule.body.len(), 1);
    let BodyLiteral::Literal(guard) = &rule.body[0] else {
        panic!("expected a literal guard");
    };
    assert_eq!(guard.atom.term.name(), Some("__final"));
    assert_eq!(guard.sign, Sign::Negation);
}

#[test]
fn future_prime_in_a_normal_head_is_recorded_and_allowed() {
    let program = Program {
        statements: vec![
            program_directive("dynamic"),
            Statement::Rule(Rule {
                location: loc(),
                head: Head::Literal(literal("p'", Sign::NoSign)),
                body: vec![],
            }),
        ],
    };

    let out = ProgramTransformer::new().transform(&program).unwrap();
    assert_eq!(out.reground.max_shift.get(&("p".to_string(), 1)), Some(&1));
}

#[test]
fn show_and_project_signatures_gain_the_time_argument() {
    let program = Program {
        statements: vec![
            Statement::Directive(Directive::ShowSignature(Signature {
                name: "p".to_string(),
                arity: 1,
                positive: true,
            })),
            Statement::Directive(Directive::ProjectSignature(Signature {
                name: "q".to_string(),
                arity: 0,
                positive: true,
            })),
        ],
    };

    let out = ProgramTransformer::new().transform(&program).unwrap();
    assert_eq!(out.show[0].arity, 2);
    assert_eq!(out.project[0].arity, 1);
}

#[test]
fn future_prime_in_a_constraint_body_is_deferred_not_rejected() {
    // `:- p'.` — a constraint has no head slot to fold the future shift
    // into, so it must defer into a reground window instead of erroring.
    let program = Program {
        statements: vec![
            program_directive("always"),
            Statement::Rule(Rule {
                location: loc(),
                head: Head::Disjunction(vec![]),
                body: vec![BodyLiteral::Literal(literal("p'", Sign::NoSign))],
            }),
        ],
    };

    let out = ProgramTransformer::new().transform(&program).unwrap();

    // The rule didn't land in `always` directly (only the synthesized
    // __final external is there) — it was deferred.
    assert_eq!(out.always.len(), 1);
    assert_eq!(out.reground.windows.len(), 1);

    let window = &out.reground.windows[0];
    assert_eq!(window.max_shift, 1);
    assert_eq!(window.future_rules.len(), 1);
    assert_eq!(window.steady_rules.len(), 1);

    let Statement::Rule(steady) = &window.steady_rules[0] else {
        panic!("expected a rule");
    };
    assert!(matches!(&steady.head, Head::Disjunction(d) if d.is_empty()));

    let Statement::Rule(future) = &window.future_rules[0] else {
        panic!("expected a rule");
    };
    // The future form carries one extra guard literal over the steady form.
    assert_eq!(future.body.len(), steady.body.len() + 1);
}

#[test]
fn compound_formula_in_a_head_theory_atom_is_rejected_not_mistranslated() {
    // `&tel{ p & q } :- body.` — a conjunction has no interval-folding
    // equivalent; it must be a named error, not a bogus atom called `&`.
    let program = Program {
        statements: vec![Statement::Rule(Rule {
            location: loc(),
            head: Head::Theory(TheoryAtom {
                location: loc(),
                name: "tel".to_string(),
                elements: vec![TheoryAtomElement {
                    terms: vec![TheoryTerm::Function(
                        "&".to_string(),
                        vec![
                            TheoryTerm::Symbol("p".to_string()),
                            TheoryTerm::Symbol("q".to_string()),
                        ],
                    )],
                    condition: vec![],
                }],
                guard: None,
            }),
            body: vec![],
        })],
    };

    let err = ProgramTransformer::new().transform(&program).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidTemporalFormula(_)));
}
