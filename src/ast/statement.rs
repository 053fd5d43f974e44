//! Program-level statements: rules and directives.

use super::{BodyLiteral, ConditionalLiteral, Literal, Location, TheoryAtom};

#[derive(Clone, Debug, PartialEq)]
pub enum Head {
    Literal(Literal),
    /// A disjunction of (conditionally) literals, e.g. `p(S) : S = 1..3`.
    Disjunction(Vec<ConditionalLiteral>),
    Choice(Vec<ConditionalLiteral>),
    Theory(TheoryAtom),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub location: Location,
    pub head: Head,
    pub body: Vec<BodyLiteral>,
}

impl Rule {
    /// A rule with an empty disjunctive head is a constraint.
    pub fn is_constraint(&self) -> bool {
        matches!(&self.head, Head::Disjunction(lits) if lits.is_empty())
    }

    /// A rule is "normal" if its head is a single literal (not a
    /// disjunction, choice, or theory atom); only normal rule heads get
    /// future-atom replacement.
    pub fn is_normal(&self) -> bool {
        matches!(&self.head, Head::Literal(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub name: String,
    pub arity: u32,
    pub positive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `#program name(params).`
    Program { name: String, params: Vec<String> },
    /// `#show name/arity.` or `#show -name/arity.`
    ShowSignature(Signature),
    /// `#project name/arity.`
    ProjectSignature(Signature),
    /// `#external atom : body.` with an optional default truth value.
    External {
        location: Location,
        atom: super::SymbolicAtom,
        body: Vec<BodyLiteral>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Rule(Rule),
    Directive(Directive),
}
