/*!
Abstract syntax produced by the (external) front-end parser and consumed by
the term transformer, program transformer, and theory compiler.

This is deliberately a small subset of the host's full grammar: only the
shapes this crate actually rewrites (rules, literals, conditional literals,
aggregates, theory atoms, and the handful of directives that carry temporal
meaning) are represented. Anything else a real input program might contain
is expected to be handled by the host's own front end before reaching this
crate, or passed through `#program`/`#show`/`#project` untouched.
*/

mod location;
mod precedence;
mod statement;
mod term;
mod theory_term;

pub use location::{Location, Position};
pub use precedence::{resolve, resolve_sequence, Associativity, OperatorTable};
pub use statement::{Directive, Head, Rule, Signature, Statement};
pub use term::{BinOp, BodyLiteral, CmpOp, ConditionalLiteral, Literal, Sign, SymbolicAtom, Term};
pub use theory_term::{SequenceKind, TheoryAtom, TheoryAtomElement, TheoryGuard, TheoryTerm, UnparsedElement};

/// A parsed program: a flat list of statements in source order, each
/// (for rules) tagged with the `#program` part active when it was read.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}
