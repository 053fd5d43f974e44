//! Theory term and theory atom syntax, as handed to us by the host's theory
//! grammar before the operator-precedence pass (see
//! [`crate::ast::precedence`]) turns an `UnparsedTerm` into a concrete
//! formula.

use super::{Location, Term};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceKind {
    Tuple,
    List,
    Set,
}

/// One `operators... term` pair inside an unparsed theory term, e.g. the
/// `- 1` in `&tel{ - 1 }`.
#[derive(Clone, Debug, PartialEq)]
pub struct UnparsedElement {
    pub operators: Vec<String>,
    pub term: TheoryTerm,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TheoryTerm {
    Number(i64),
    Symbol(String),
    Variable(String),
    Function(String, Vec<TheoryTerm>),
    Sequence(SequenceKind, Vec<TheoryTerm>),
    /// A sequence of operator/operand pairs still awaiting
    /// [`crate::ast::precedence`] resolution.
    Unparsed(Vec<UnparsedElement>),
}

impl TheoryTerm {
    /// Renders the term back to the surface syntax it was parsed from.
    /// Used in diagnostics ("invalid temporal formula: ...").
    pub fn to_source(&self) -> String {
        match self {
            TheoryTerm::Number(n) => n.to_string(),
            TheoryTerm::Symbol(s) => s.clone(),
            TheoryTerm::Variable(v) => v.clone(),
            TheoryTerm::Function(name, args) => {
                if args.is_empty() {
                    name.clone()
                } else {
                    let parts: Vec<_> = args.iter().map(TheoryTerm::to_source).collect();
                    format!("{name}({})", parts.join(","))
                }
            }
            TheoryTerm::Sequence(kind, items) => {
                let parts: Vec<_> = items.iter().map(TheoryTerm::to_source).collect();
                match kind {
                    SequenceKind::Tuple => format!("({})", parts.join(",")),
                    SequenceKind::List => format!("[{}]", parts.join(",")),
                    SequenceKind::Set => format!("{{{}}}", parts.join(",")),
                }
            }
            TheoryTerm::Unparsed(elements) => {
                let mut out = String::new();
                for element in elements {
                    for op in &element.operators {
                        out.push_str(op);
                        out.push(' ');
                    }
                    out.push_str(&element.term.to_source());
                }
                out
            }
        }
    }
}

/// `{ terms... : condition... }`, one element of a theory atom's element set.
#[derive(Clone, Debug, PartialEq)]
pub struct TheoryAtomElement {
    pub terms: Vec<TheoryTerm>,
    pub condition: Vec<super::Literal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TheoryGuard {
    pub operator: String,
    pub term: TheoryTerm,
}

/// `&name(args){ elements } guard`, e.g. `&tel(t){ a <- b }`.
#[derive(Clone, Debug, PartialEq)]
pub struct TheoryAtom {
    pub location: Location,
    pub name: String,
    pub args: Vec<Term>,
    pub elements: Vec<TheoryAtomElement>,
    pub guard: Option<TheoryGuard>,
}
