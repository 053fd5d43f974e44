//! Operator-precedence resolution for unparsed theory terms.
//!
//! The host's theory grammar accepts any mix of declared operators inside
//! `&name(...){ ... }` and hands back an `UnparsedTerm`: a flat sequence of
//! `operators... term` pairs with no structure beyond "this much text was
//! between two terms". Turning that into a tree is this module's job, via a
//! standard shunting-yard pass parameterized over an [`OperatorTable`].
//!
//! Separate grammars (plain arithmetic inside a theory term, the temporal
//! body grammar, the more restrictive head grammar, and the dynamic-logic
//! path grammar) are expressed as distinct [`OperatorTable`] values built by
//! their respective callers; this module knows nothing about what any
//! particular operator means.

use crate::ast::{SequenceKind, TheoryTerm, UnparsedElement};
use crate::types::err::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Arity {
    Unary,
    Binary,
}

/// Priorities and associativities for a set of operators, keyed by name and
/// arity (the same symbol, e.g. `-`, can be both a unary and a binary
/// operator with different priorities).
#[derive(Clone, Debug, Default)]
pub struct OperatorTable {
    unary: std::collections::HashMap<String, u32>,
    binary: std::collections::HashMap<String, (u32, Associativity)>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unary(mut self, operator: impl Into<String>, priority: u32) -> Self {
        self.unary.insert(operator.into(), priority);
        self
    }

    pub fn binary(
        mut self,
        operator: impl Into<String>,
        priority: u32,
        assoc: Associativity,
    ) -> Self {
        self.binary.insert(operator.into(), (priority, assoc));
        self
    }

    /// Whether `name` is declared as an operator of either arity in this
    /// table — used to tell a compound formula (`p & q`) apart from a plain
    /// atom name once a term has been resolved.
    pub fn is_operator(&self, name: &str) -> bool {
        self.unary.contains_key(name) || self.binary.contains_key(name)
    }

    fn priority(&self, operator: &str, arity: Arity) -> Option<u32> {
        match arity {
            Arity::Unary => self.unary.get(operator).copied(),
            Arity::Binary => self.binary.get(operator).map(|(p, _)| *p),
        }
    }

    fn associativity(&self, operator: &str, arity: Arity) -> Associativity {
        match arity {
            Arity::Unary => Associativity::Right,
            Arity::Binary => self
                .binary
                .get(operator)
                .map(|(_, a)| *a)
                .unwrap_or(Associativity::Left),
        }
    }
}

fn should_reduce(
    table: &OperatorTable,
    top: &(String, Arity),
    incoming: &(String, Arity),
) -> Result<bool, Error> {
    let top_priority = table
        .priority(&top.0, top.1)
        .ok_or_else(|| Error::without_location(ErrorKind::InvalidOperator(top.0.clone())))?;
    let incoming_priority = table
        .priority(&incoming.0, incoming.1)
        .ok_or_else(|| {
            Error::without_location(ErrorKind::InvalidOperator(incoming.0.clone()))
        })?;
    Ok(top_priority > incoming_priority
        || (top_priority == incoming_priority
            && table.associativity(&incoming.0, incoming.1) == Associativity::Left))
}

fn apply(stack: &mut Vec<TheoryTerm>, op: &(String, Arity)) -> Result<(), Error> {
    match op.1 {
        Arity::Unary => {
            let operand = stack
                .pop()
                .ok_or_else(|| Error::without_location(ErrorKind::Parse(
                    "malformed theory term: missing operand".into(),
                )))?;
            stack.push(TheoryTerm::Function(op.0.clone(), vec![operand]));
        }
        Arity::Binary => {
            let rhs = stack
                .pop()
                .ok_or_else(|| Error::without_location(ErrorKind::Parse(
                    "malformed theory term: missing right operand".into(),
                )))?;
            let lhs = stack
                .pop()
                .ok_or_else(|| Error::without_location(ErrorKind::Parse(
                    "malformed theory term: missing left operand".into(),
                )))?;
            stack.push(TheoryTerm::Function(op.0.clone(), vec![lhs, rhs]));
        }
    }
    Ok(())
}

/// Resolves an `UnparsedTerm` (and, recursively, any unparsed subterms
/// inside functions/sequences) against `table`.
pub fn resolve(term: &TheoryTerm, table: &OperatorTable) -> Result<TheoryTerm, Error> {
    match term {
        TheoryTerm::Unparsed(elements) => resolve_unparsed(elements, table),
        TheoryTerm::Function(name, args) => {
            let resolved = args
                .iter()
                .map(|a| resolve(a, table))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TheoryTerm::Function(name.clone(), resolved))
        }
        TheoryTerm::Sequence(kind, items) => {
            let resolved = items
                .iter()
                .map(|a| resolve(a, table))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TheoryTerm::Sequence(*kind, resolved))
        }
        other => Ok(other.clone()),
    }
}

fn resolve_unparsed(elements: &[UnparsedElement], table: &OperatorTable) -> Result<TheoryTerm, Error> {
    let mut output: Vec<TheoryTerm> = Vec::new();
    let mut operators: Vec<(String, Arity)> = Vec::new();

    for (elem_idx, element) in elements.iter().enumerate() {
        for (op_idx, operator) in element.operators.iter().enumerate() {
            let arity = if elem_idx == 0 || op_idx > 0 {
                Arity::Unary
            } else {
                Arity::Binary
            };
            let incoming = (operator.clone(), arity);
            while let Some(top) = operators.last() {
                if should_reduce(table, top, &incoming)? {
                    let top = operators.pop().unwrap();
                    apply(&mut output, &top)?;
                } else {
                    break;
                }
            }
            operators.push(incoming);
        }
        output.push(resolve(&element.term, table)?);
    }

    while let Some(op) = operators.pop() {
        apply(&mut output, &op)?;
    }

    output.pop().ok_or_else(|| {
        Error::without_location(ErrorKind::Parse("empty theory term".into()))
    })
}

/// Convenience used when building a tuple/list/set whose members are each
/// unparsed terms in their own right.
pub fn resolve_sequence(
    kind: SequenceKind,
    items: &[TheoryTerm],
    table: &OperatorTable,
) -> Result<TheoryTerm, Error> {
    let resolved = items
        .iter()
        .map(|i| resolve(i, table))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TheoryTerm::Sequence(kind, resolved))
}
