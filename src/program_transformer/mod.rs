/*!
Rewrites a parsed program into one with an explicit time argument on every
temporal atom, classifies its rules into `initial`/`always`/`dynamic`
program parts, and records which predicates need a future shadow.

This is the source-to-source half of the theory compiler: no grounding
happens here. `&tel`/`&del` theory atoms in rule bodies are left in place
(re-tagged so the driver knows to invoke [`crate::theory::construct`] on
them once grounded); theory atoms in rule heads are fully expanded into a
disjunction by [`head::fold_to_disjunction`], since that shape has no
direct ground-time equivalent once grounded — it has to become ordinary
disjunctive rules before the host ever sees it.

A constraint body is the one place a future shift is legal without a head
slot to fold it into (see [`crate::term_transformer::FutureMode::Retain`]):
such a rule is pulled out of its normal `initial`/`always`/`dynamic` bucket
entirely and deferred into a [`RegroundWindow`], ground by the driver under
its own windowed program part instead (see [`driver::imain`](crate::driver)).
*/

pub mod head;

use crate::ast::{
    BodyLiteral, Directive, Head, Literal, Location, Program, Rule, Sign, Signature, Statement,
    SymbolicAtom, Term,
};
use crate::term_transformer::{FutureMode, TermTransformer};
use crate::types::err::{Error, ErrorKind};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Part {
    Initial,
    Always,
    Dynamic,
}

impl Part {
    fn from_directive_name(name: &str) -> Option<Part> {
        match name {
            "base" | "initial" => Some(Part::Initial),
            "always" | "final" => Some(Part::Always),
            "dynamic" => Some(Part::Dynamic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Part::Initial => "initial",
            Part::Always => "always",
            Part::Dynamic => "dynamic",
        }
    }
}

/// A rule whose body looks `max_shift` steps into the future (only possible
/// for a constraint, since that's the only body position where a future
/// shift is retained rather than rejected) cannot be ground once and for
/// all at the step it's read: the atoms it refers to don't exist yet. It's
/// ground fresh, windowed by how close the horizon is to the step it peeks
/// at.
///
/// `future_part`/`future_rules` carry the form used while the horizon is
/// still approaching the referenced step (`part_0_{max_shift-1}` in the
/// original, here spelled `<part>_reground_future_<max_shift>`): it carries
/// an extra `not __final(T-1)` guard, the same one normal `always` rules
/// get, so it stops firing once the trace has actually ended without ever
/// reaching that far. `steady_part`/`steady_rules` carry the plain form
/// used from the step the horizon reaches `max_shift` onward (`part_{max_shift}`
/// in the original, here `<part>_reground_steady_<max_shift>`).
#[derive(Clone, Debug)]
pub struct RegroundWindow {
    pub part: Part,
    pub max_shift: i64,
    pub future_part: String,
    pub future_rules: Vec<Statement>,
    pub steady_part: String,
    pub steady_rules: Vec<Statement>,
}

/// Predicates with a future shadow and the largest shift seen for them;
/// consulted by the driver to decide which `dynamic` rule instances need
/// regrounding as the horizon grows, plus the windowed reground parts for
/// future-referring constraints (see [`RegroundWindow`]).
#[derive(Clone, Debug, Default)]
pub struct RegroundParts {
    pub max_shift: HashMap<(String, u32), i64>,
    pub windows: Vec<RegroundWindow>,
}

#[derive(Clone, Debug, Default)]
pub struct TransformedProgram {
    pub initial: Vec<Statement>,
    pub always: Vec<Statement>,
    pub dynamic: Vec<Statement>,
    pub reground: RegroundParts,
    pub show: Vec<Signature>,
    pub project: Vec<Signature>,
}

fn time_var() -> Term {
    Term::Variable("__T".into())
}

fn final_guard(location: &Location, time: &Term) -> BodyLiteral {
    BodyLiteral::Literal(Literal {
        location: location.clone(),
        sign: Sign::Negation,
        atom: SymbolicAtom {
            term: Term::function(
                "__final",
                vec![Term::BinaryOperation(
                    crate::ast::BinOp::Sub,
                    Box::new(time.clone()),
                    Box::new(Term::Number(1)),
                )],
            ),
        },
    })
}

pub struct ProgramTransformer {
    terms: TermTransformer,
    part: Part,
    /// Accumulates (future-rules, steady-rules) per (part, max_shift),
    /// drained into [`RegroundParts::windows`] once the whole program has
    /// been visited.
    reground_windows: HashMap<(Part, i64), (Vec<Statement>, Vec<Statement>)>,
    /// Shared with [`crate::theory::construct`] so a head theory atom can
    /// tell a compound formula apart from a plain (possibly shifted) atom.
    operator_table: crate::ast::OperatorTable,
}

impl ProgramTransformer {
    pub fn new() -> Self {
        ProgramTransformer {
            terms: TermTransformer::new(),
            part: Part::Initial,
            reground_windows: HashMap::new(),
            operator_table: crate::theory::construct::default_table(),
        }
    }

    pub fn transform(mut self, program: &Program) -> Result<TransformedProgram, Error> {
        let mut out = TransformedProgram::default();

        for statement in &program.statements {
            match statement {
                Statement::Directive(Directive::Program { name, .. }) => {
                    if let Some(part) = Part::from_directive_name(name) {
                        self.part = part;
                    }
                    // Unrecognised program parts are left as-is under
                    // whichever bucket was active; they carry no temporal
                    // meaning and the host passes them through untouched.
                }
                Statement::Directive(Directive::ShowSignature(sig)) => {
                    out.show.push(Signature {
                        name: sig.name.clone(),
                        arity: sig.arity + 1,
                        positive: sig.positive,
                    });
                }
                Statement::Directive(Directive::ProjectSignature(sig)) => {
                    out.project.push(Signature {
                        name: sig.name.clone(),
                        arity: sig.arity + 1,
                        positive: sig.positive,
                    });
                }
                Statement::Directive(other) => {
                    self.bucket_mut(&mut out).push(Statement::Directive(other.clone()));
                }
                Statement::Rule(rule) => {
                    let rewritten = self.transform_rule(rule)?;
                    let bucket = self.bucket_mut(&mut out);
                    bucket.extend(rewritten.into_iter().map(Statement::Rule));
                }
            }
        }

        out.always.push(final_external_directive());
        let mut windows = Vec::with_capacity(self.reground_windows.len());
        for ((part, max_shift), (future_rules, steady_rules)) in self.reground_windows {
            windows.push(RegroundWindow {
                part,
                max_shift,
                future_part: format!("{}_reground_future_{}", part.as_str(), max_shift),
                future_rules,
                steady_part: format!("{}_reground_steady_{}", part.as_str(), max_shift),
                steady_rules,
            });
        }
        out.reground = RegroundParts {
            max_shift: self.terms.future_predicates.max_shift.clone(),
            windows,
        };
        Ok(out)
    }

    fn bucket_mut<'a>(&self, out: &'a mut TransformedProgram) -> &'a mut Vec<Statement> {
        match self.part {
            Part::Initial => &mut out.initial,
            Part::Always => &mut out.always,
            Part::Dynamic => &mut out.dynamic,
        }
    }

    fn transform_rule(&mut self, rule: &Rule) -> Result<Vec<Rule>, Error> {
        let time = time_var();
        let is_constraint = rule.is_constraint();
        // Only a normal, non-constraint rule head can fold a future shift
        // into a `__future_`-style placeholder; everywhere else in the head
        // a future shift has nowhere to go. Only a constraint body (no head
        // slot at all) retains a future shift rather than rejecting it —
        // see spec §4.2's "Head vs body semantics for future atoms".
        let head_mode = if rule.is_normal() && !is_constraint {
            FutureMode::Replace
        } else {
            FutureMode::Forbid
        };
        let body_mode = if is_constraint {
            FutureMode::Retain
        } else {
            FutureMode::Forbid
        };

        let mut max_shift = 0i64;
        let mut body = Vec::with_capacity(rule.body.len());
        for lit in &rule.body {
            let (new_lit, shift) = self.transform_body_literal(lit, &time, body_mode)?;
            max_shift = max_shift.max(shift);
            body.push(new_lit);
        }
        // `always` rules only hold while the trace hasn't ended; append the
        // usual `not __final(T-1)` guard so they don't fire one step past
        // the last state. `initial`/`dynamic` rules are naturally bounded by
        // their own program-part grounding window.
        if self.part == Part::Always {
            body.push(final_guard(&rule.location, &time));
        }

        let head = match &rule.head {
            Head::Literal(lit) => {
                let (new_lit, shift) = self.transform_literal(lit, &time, head_mode)?;
                max_shift = max_shift.max(shift);
                Head::Literal(new_lit)
            }
            Head::Disjunction(disjuncts) => {
                let mut new_disjuncts = Vec::with_capacity(disjuncts.len());
                for d in disjuncts {
                    let (new_d, shift) = self.transform_conditional(d, &time, FutureMode::Forbid)?;
                    max_shift = max_shift.max(shift);
                    new_disjuncts.push(new_d);
                }
                Head::Disjunction(new_disjuncts)
            }
            Head::Choice(disjuncts) => {
                let mut new_disjuncts = Vec::with_capacity(disjuncts.len());
                for d in disjuncts {
                    let (new_d, shift) = self.transform_conditional(d, &time, FutureMode::Forbid)?;
                    max_shift = max_shift.max(shift);
                    new_disjuncts.push(new_d);
                }
                Head::Choice(new_disjuncts)
            }
            Head::Theory(atom) => {
                if atom.name != "tel" && atom.name != "del" {
                    return Err(Error::new(
                        ErrorKind::InvalidTemporalFormula(atom.name.clone()),
                        atom.location.clone(),
                    ));
                }
                let disjuncts =
                    head::fold_to_disjunction(&mut self.terms, &self.operator_table, atom, &time)?;
                Head::Disjunction(disjuncts)
            }
        };

        if max_shift > 0 {
            // Only a constraint body can retain a shift (every other
            // context either consumes it via `Replace` or hard-errors via
            // `Forbid`), so a deferred rule always has the empty
            // disjunctive head that makes it a constraint.
            let steady_rule = Rule {
                location: rule.location.clone(),
                head: head.clone(),
                body: body.clone(),
            };
            let mut future_body = body;
            future_body.push(final_guard(&rule.location, &time));
            let future_rule = Rule {
                location: rule.location.clone(),
                head,
                body: future_body,
            };
            let entry = self
                .reground_windows
                .entry((self.part, max_shift))
                .or_default();
            entry.0.push(Statement::Rule(future_rule));
            entry.1.push(Statement::Rule(steady_rule));
            return Ok(Vec::new());
        }

        Ok(vec![Rule {
            location: rule.location.clone(),
            head,
            body,
        }])
    }

    fn transform_conditional(
        &mut self,
        cond: &crate::ast::ConditionalLiteral,
        time: &Term,
        mode: FutureMode,
    ) -> Result<(crate::ast::ConditionalLiteral, i64), Error> {
        let (literal, mut max_shift) = self.transform_literal(&cond.literal, time, mode)?;
        let mut condition = Vec::with_capacity(cond.condition.len());
        for c in &cond.condition {
            let (new_c, shift) = self.transform_body_literal(c, time, mode)?;
            max_shift = max_shift.max(shift);
            condition.push(new_c);
        }
        Ok((crate::ast::ConditionalLiteral { literal, condition }, max_shift))
    }

    fn transform_literal(
        &mut self,
        lit: &Literal,
        time: &Term,
        mode: FutureMode,
    ) -> Result<(Literal, i64), Error> {
        let (term, shift) = self
            .terms
            .transform(&lit.atom.term, time, mode, &lit.location)?;
        Ok((
            Literal {
                location: lit.location.clone(),
                sign: lit.sign,
                atom: SymbolicAtom { term },
            },
            shift,
        ))
    }

    fn transform_body_literal(
        &mut self,
        lit: &BodyLiteral,
        time: &Term,
        mode: FutureMode,
    ) -> Result<(BodyLiteral, i64), Error> {
        match lit {
            BodyLiteral::Literal(l) => {
                let (new_l, shift) = self.transform_literal(l, time, mode)?;
                Ok((BodyLiteral::Literal(new_l), shift))
            }
            BodyLiteral::Conditional(c) => {
                let (new_c, shift) = self.transform_conditional(c, time, mode)?;
                Ok((BodyLiteral::Conditional(new_c), shift))
            }
            BodyLiteral::Aggregate {
                location,
                sign,
                elements,
            } => {
                let mut new_elements = Vec::with_capacity(elements.len());
                let mut max_shift = 0;
                for e in elements {
                    let (new_e, shift) = self.transform_conditional(e, time, mode)?;
                    max_shift = max_shift.max(shift);
                    new_elements.push(new_e);
                }
                Ok((
                    BodyLiteral::Aggregate {
                        location: location.clone(),
                        sign: *sign,
                        elements: new_elements,
                    },
                    max_shift,
                ))
            }
            BodyLiteral::Theory {
                location,
                sign,
                atom,
            } => {
                if atom.name != "tel" && atom.name != "del" {
                    return Err(Error::new(
                        ErrorKind::InvalidTemporalFormula(atom.name.clone()),
                        location.clone(),
                    ));
                }
                // The formula itself is compiled once grounded (see
                // `crate::theory::construct`); here we only validate shape
                // and pass the (untouched) ground-time payload through.
                Ok((
                    BodyLiteral::Theory {
                        location: location.clone(),
                        sign: *sign,
                        atom: atom.clone(),
                    },
                    0,
                ))
            }
            BodyLiteral::Comparison {
                location,
                lhs,
                op,
                rhs,
            } => Ok((
                BodyLiteral::Comparison {
                    location: location.clone(),
                    lhs: lhs.clone(),
                    op: *op,
                    rhs: rhs.clone(),
                },
                0,
            )),
        }
    }
}

impl Default for ProgramTransformer {
    fn default() -> Self {
        Self::new()
    }
}

fn final_external_directive() -> Statement {
    Statement::Directive(Directive::External {
        location: Location::at(crate::ast::Position::new("<generated>", 0, 0)),
        atom: SymbolicAtom {
            term: Term::function("__final", vec![time_var()]),
        },
        body: Vec::new(),
    })
}
