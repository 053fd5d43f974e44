//! Plain (non-theory) terms and atoms: what remains of a rule once theory
//! atoms have been peeled off.

use super::Location;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Xor,
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Number(i64),
    String(String),
    Infimum,
    Supremum,
    Variable(String),
    /// An uninterpreted function symbol, or a plain constant when `args` is
    /// empty. `tuple` marks a parenthesised tuple term `(a, b)`.
    Function {
        name: String,
        args: Vec<Term>,
        tuple: bool,
    },
    UnaryMinus(Box<Term>),
    BinaryOperation(BinOp, Box<Term>, Box<Term>),
    /// `start..end`: an interval pool term, grounded by the host into one
    /// value per integer in range. Used by the head theory-atom transformer
    /// to hand a folded shift range to the host's grounder rather than
    /// enumerating it itself.
    Interval(Box<Term>, Box<Term>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Term {
    pub fn function(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Function {
            name: name.into(),
            args,
            tuple: false,
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Term::function(name, Vec::new())
    }

    /// The function name, if this term is a function/constant. Used by the
    /// term transformer to recognise and rewrite predicate names.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Function { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Function { args, .. } => args,
            _ => &[],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    NoSign,
    Negation,
    DoubleNegation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicAtom {
    pub term: Term,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub location: Location,
    pub sign: Sign,
    pub atom: SymbolicAtom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalLiteral {
    pub literal: Literal,
    /// Plain literals and comparisons guarding `literal`; reuses
    /// [`BodyLiteral`] so a disjunct like `p(S) : S = 1..3` can carry an
    /// interval comparison alongside ordinary condition literals.
    pub condition: Vec<BodyLiteral>,
}

impl ConditionalLiteral {
    pub fn unconditional(literal: Literal) -> Self {
        ConditionalLiteral {
            literal,
            condition: Vec::new(),
        }
    }
}

/// A literal appearing in a rule body: a plain literal, a conditional
/// literal, or an aggregate. Theory atoms are represented separately by
/// [`super::TheoryAtom`] and carried alongside a rule's body, mirroring how
/// the host grammar keeps theory atoms out of the regular literal grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyLiteral {
    Literal(Literal),
    Conditional(ConditionalLiteral),
    Aggregate {
        location: Location,
        sign: Sign,
        elements: Vec<ConditionalLiteral>,
    },
    Theory {
        location: Location,
        sign: Sign,
        atom: super::TheoryAtom,
    },
    /// `lhs op rhs`, primarily used for the `S = start..end` assignments the
    /// head theory-atom transformer generates.
    Comparison {
        location: Location,
        lhs: Term,
        op: CmpOp,
        rhs: Term,
    },
}
