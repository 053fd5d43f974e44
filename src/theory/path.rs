//! Dynamic-logic path expressions: the `+` (choice), `;;` (sequence), `?`
//! (test) and `*` (Kleene star) combinators that build a path out of body
//! formulas, consumed by `Diamond`/`Box` in [`super::body`].

use super::FormulaId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Path {
    /// The atomic transition: advance exactly one time step. Reached
    /// through the surface keyword `&skip` in path position.
    Step,
    /// `p ? f`: test `f` without advancing.
    Check(FormulaId),
    /// `p + q`: nondeterministic choice of `p` or `q`.
    Choice(PathId, PathId),
    /// `p ;; q`: `p` followed by `q`.
    Sequence(PathId, PathId),
    /// `p *`: zero or more repetitions of `p`.
    Star(PathId),
}
