/*!
Rewrites predicate names carrying the prime/underscore shorthand for time
shifts into an explicit trailing time argument.

`p'(X)` at some step `T` means `p(X, T+1)`; `p''(X)` means `p(X, T+2)`; a
leading underscore (`_p(X)`) pins the atom to the initial state regardless
of `T`; a trailing underscore (`p_(X)`) would pin it to the final state, but
that direction is not yet supported (mirroring the original's explicit
guard against it). The two underscore forms cannot be combined with each
other or with primes.

Every predicate name this transformer rewrites is also recorded, together
with the largest shift seen for it, so the program transformer can later
decide which predicates need a `__future_`-prefixed shadow and a
reground-part entry.
*/

use crate::ast::{Location, Term};
pub use crate::shift::Shift;
use crate::shift::{split_shifted_name, ShiftError};
use crate::types::err::{Error, ErrorKind};
use std::collections::HashMap;

impl From<ShiftError> for ErrorKind {
    fn from(e: ShiftError) -> Self {
        match e {
            ShiftError::InitiallyAndFinallyCombined => ErrorKind::InitiallyAndFinallyCombined,
            ShiftError::PrimeWithInitiallyOrFinally => ErrorKind::PrimeWithInitiallyOrFinally,
            ShiftError::FinallyNotSupported => ErrorKind::FinallyNotSupported,
        }
    }
}

/// Per-(name, arity) bookkeeping the program transformer consults when
/// deciding which predicates require a future shadow.
#[derive(Clone, Debug, Default)]
pub struct FuturePredicates {
    /// Largest positive relative shift observed for each predicate.
    pub max_shift: HashMap<(String, u32), i64>,
}

impl FuturePredicates {
    pub fn record(&mut self, name: &str, arity: u32, shift: i64) {
        if shift > 0 {
            let entry = self.max_shift.entry((name.to_string(), arity)).or_insert(0);
            if shift > *entry {
                *entry = shift;
            }
        }
    }
}

/// How a future (positive) shift on a literal is handled, mirroring the
/// original's `replace_future`/`fail_future` pair of flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FutureMode {
    /// Head of a normal, non-constraint rule: the shift is consumed here
    /// (recorded in `future_predicates` for the driver's assumption masking)
    /// and the atom is grounded directly at `t+n`.
    Replace,
    /// Body of a constraint: a constraint has no head slot to fold the
    /// shift into, so it is retained (`t+n` stays in the term) and the
    /// caller is told how far it looked, so the whole rule can be deferred
    /// into a reground window instead of grounded immediately.
    Retain,
    /// Anywhere else (bodies and conditions of non-constraint rules, heads
    /// of choice/disjunctive rules): a future shift has nowhere to go and
    /// is a hard error.
    Forbid,
}

pub struct TermTransformer {
    pub future_predicates: FuturePredicates,
}

impl TermTransformer {
    pub fn new() -> Self {
        TermTransformer {
            future_predicates: FuturePredicates::default(),
        }
    }

    /// Public entry point to [`Self::split_name`], used by the head
    /// theory-atom transformer which needs the bare shift (to fold into an
    /// interval) rather than a rewritten term.
    pub fn shift_of(&self, location: &Location, name: &str) -> Result<(String, Shift), Error> {
        self.split_name(location, name)
    }

    /// Splits `name` into its bare predicate name and shift. Does not
    /// inspect arguments; callers add the time argument themselves once the
    /// shift is known.
    fn split_name(&self, location: &Location, name: &str) -> Result<(String, Shift), Error> {
        split_shifted_name(name).map_err(|e| Error::new(ErrorKind::from(e), location.clone()))
    }

    /// Rewrites a single term occurring in literal/atom position: strips any
    /// prime/underscore shorthand from its function name and appends the
    /// resulting time argument.
    ///
    /// `mode` gates what happens when the shift is positive (future):
    /// [`FutureMode::Replace`] consumes it and records the predicate in
    /// `future_predicates`; [`FutureMode::Retain`] keeps `t+n` in the term
    /// and hands the shift amount back to the caller so the enclosing rule
    /// can be deferred into a reground window; [`FutureMode::Forbid`] is a
    /// hard error. Returns the rewritten term together with the shift
    /// amount retained (0 unless `mode` was `Retain` and the shift was
    /// positive) — this is the per-rule signal `transform_rule` accumulates
    /// to decide whether a rule needs reground-window treatment.
    pub fn transform(
        &mut self,
        term: &Term,
        time: &Term,
        mode: FutureMode,
        location: &Location,
    ) -> Result<(Term, i64), Error> {
        let (name, args) = match term {
            Term::Function { name, args, .. } => (name.clone(), args.clone()),
            other => return Ok((other.clone(), 0)),
        };

        let (core, shift) = self.split_name(location, &name)?;

        let mut retained_shift = 0;
        let time_arg = match shift {
            Shift::Initial => Term::function("__initial", vec![time.clone()]),
            Shift::Relative(0) => time.clone(),
            Shift::Relative(n) if n > 0 => match mode {
                FutureMode::Forbid => {
                    return Err(Error::new(ErrorKind::FutureNotAllowed, location.clone()));
                }
                FutureMode::Replace => {
                    self.future_predicates
                        .record(&core, args.len() as u32 + 1, n);
                    Term::BinaryOperation(
                        crate::ast::BinOp::Add,
                        Box::new(time.clone()),
                        Box::new(Term::Number(n)),
                    )
                }
                FutureMode::Retain => {
                    retained_shift = n;
                    Term::BinaryOperation(
                        crate::ast::BinOp::Add,
                        Box::new(time.clone()),
                        Box::new(Term::Number(n)),
                    )
                }
            },
            Shift::Relative(n) => Term::BinaryOperation(
                crate::ast::BinOp::Sub,
                Box::new(time.clone()),
                Box::new(Term::Number(-n)),
            ),
        };

        let mut new_args = args;
        new_args.push(time_arg);
        Ok((
            Term::Function {
                name: core,
                args: new_args,
                tuple: false,
            },
            retained_shift,
        ))
    }
}

impl Default for TermTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn loc() -> Location {
        Location::at(Position::new("test.lp", 1, 1))
    }

    #[test]
    fn unshifted_name_gets_time_argument() {
        let mut xf = TermTransformer::new();
        let t = Term::function("p", vec![Term::Variable("X".into())]);
        let time = Term::Variable("T".into());
        let (out, shift) = xf.transform(&t, &time, FutureMode::Forbid, &loc()).unwrap();
        assert_eq!(out, Term::function("p", vec![Term::Variable("X".into()), Term::Variable("T".into())]));
        assert_eq!(shift, 0);
    }

    #[test]
    fn future_prime_rejected_outside_head() {
        let mut xf = TermTransformer::new();
        let t = Term::function("p'", vec![]);
        let time = Term::Variable("T".into());
        let err = xf.transform(&t, &time, FutureMode::Forbid, &loc()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FutureNotAllowed);
    }

    #[test]
    fn future_prime_allowed_in_head_and_recorded() {
        let mut xf = TermTransformer::new();
        let t = Term::function("p'", vec![]);
        let time = Term::Variable("T".into());
        xf.transform(&t, &time, FutureMode::Replace, &loc()).unwrap();
        assert_eq!(xf.future_predicates.max_shift.get(&("p".to_string(), 1)), Some(&1));
    }

    #[test]
    fn future_prime_retained_in_constraint_body() {
        let mut xf = TermTransformer::new();
        let t = Term::function("p'", vec![]);
        let time = Term::Variable("T".into());
        let (out, shift) = xf.transform(&t, &time, FutureMode::Retain, &loc()).unwrap();
        assert_eq!(shift, 1);
        assert_eq!(
            out,
            Term::function(
                "p",
                vec![Term::BinaryOperation(
                    crate::ast::BinOp::Add,
                    Box::new(Term::Variable("T".into())),
                    Box::new(Term::Number(1)),
                )]
            )
        );
        // Retained shifts don't go through the `__future_` shadow path.
        assert!(xf.future_predicates.max_shift.is_empty());
    }

    #[test]
    fn initially_and_prime_rejected() {
        let mut xf = TermTransformer::new();
        let t = Term::function("_p'", vec![]);
        let time = Term::Variable("T".into());
        let err = xf
            .transform(&t, &time, FutureMode::Replace, &loc())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PrimeWithInitiallyOrFinally);
    }
}
