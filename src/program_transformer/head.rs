/*!
Folds a `&tel`/`&del` theory atom appearing in a rule head into a plain
disjunctive rule.

`&tel{ p' ; p'' ; p''' } :- body.` means "the body implies `p` holds at some
point strictly between now and three steps from now" — a disjunction over
`p` shifted by 1, 2, and 3. Rather than emit one disjunct per shift (which
degrades badly once a program uses wide shift ranges), adjacent/overlapping
shifts are folded into [`IntervalSet`] ranges and handed to the host
grounder as a single `p(T+S) : S = start..end-1` conditional disjunct — the
host's own arithmetic grounding expands `S` into however many concrete
ground atoms are needed.

This completes what the original left an explicit stub for; the algorithm
(fold then unfold into one conditional disjunct per resulting range) is
this crate's own, following the interval-folding approach documented for
this transformer.

A head element whose formula is more than a single shifted atom — a
conjunction, disjunction, negation, or any other operator application —
has no interval-folding equivalent: the general recursive algorithm for
that case (an `__aux_k` auxiliary predicate per subformula, routed through
the body formula compiler via `&__tel_head`) is not implemented here.
Rather than silently treat the operator's name as if it were an atom, such
a shape is rejected with a named error; see `DESIGN.md`.
*/

use crate::ast::{
    BinOp, BodyLiteral, CmpOp, ConditionalLiteral, Literal, Location, OperatorTable, Sign,
    SymbolicAtom, Term, TheoryAtom, TheoryTerm,
};
use crate::interval::IntervalSet;
use crate::term_transformer::{Shift, TermTransformer};
use crate::types::err::{Error, ErrorKind};

fn theory_term_to_term(term: &TheoryTerm) -> Result<Term, Error> {
    match term {
        TheoryTerm::Number(n) => Ok(Term::Number(*n)),
        TheoryTerm::Symbol(s) => Ok(Term::constant(s.clone())),
        TheoryTerm::Function(name, args) => {
            let args = args
                .iter()
                .map(theory_term_to_term)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::function(name.clone(), args))
        }
        other => Err(Error::without_location(ErrorKind::InvalidSymbol(
            other.to_source(),
        ))),
    }
}

struct ShiftedAtom {
    name: String,
    args: Vec<Term>,
    shift: Shift,
}

fn extract_shifted_atom(
    term_transformer: &TermTransformer,
    table: &OperatorTable,
    theory_term: &TheoryTerm,
    location: &Location,
) -> Result<ShiftedAtom, Error> {
    let resolved = crate::ast::resolve(theory_term, table)?;
    if let TheoryTerm::Function(name, args) = &resolved {
        if !args.is_empty() && table.is_operator(name) {
            return Err(Error::new(
                ErrorKind::InvalidTemporalFormula(format!(
                    "unsupported compound formula in rule head: {}",
                    theory_term.to_source()
                )),
                location.clone(),
            ));
        }
    }
    let term = theory_term_to_term(&resolved)?;
    let name = term.name().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidTemporalFormula(theory_term.to_source()),
            location.clone(),
        )
    })?;
    let (core, shift) = term_transformer.shift_of(location, name)?;
    Ok(ShiftedAtom {
        name: core,
        args: term.args().to_vec(),
        shift,
    })
}

fn time_term(base: &Term, shift: i64) -> Term {
    match shift {
        0 => base.clone(),
        n if n > 0 => Term::BinaryOperation(BinOp::Add, Box::new(base.clone()), Box::new(Term::Number(n))),
        n => Term::BinaryOperation(BinOp::Sub, Box::new(base.clone()), Box::new(Term::Number(-n))),
    }
}

fn disjunct(location: &Location, name: &str, mut args: Vec<Term>, time: Term) -> ConditionalLiteral {
    args.push(time);
    ConditionalLiteral::unconditional(Literal {
        location: location.clone(),
        sign: Sign::NoSign,
        atom: SymbolicAtom {
            term: Term::function(name, args),
        },
    })
}

/// Folds the elements of a head `&tel`/`&del` atom into disjuncts, pushing
/// any found future shifts into `term_transformer`'s bookkeeping.
pub fn fold_to_disjunction(
    term_transformer: &mut TermTransformer,
    table: &OperatorTable,
    atom: &TheoryAtom,
    time: &Term,
) -> Result<Vec<ConditionalLiteral>, Error> {
    let mut initial_disjuncts = Vec::new();
    let mut relative = IntervalSet::new();
    let mut name_and_args: Option<(String, Vec<Term>)> = None;

    for element in &atom.elements {
        if !element.condition.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidTemporalFormula(
                    "head theory-atom elements may not carry a condition".into(),
                ),
                atom.location.clone(),
            ));
        }
        let [term] = element.terms.as_slice() else {
            return Err(Error::new(
                ErrorKind::InvalidTemporalFormula(
                    "head theory-atom elements must be a single shifted atom".into(),
                ),
                atom.location.clone(),
            ));
        };
        let shifted = extract_shifted_atom(term_transformer, table, term, &atom.location)?;
        match &name_and_args {
            None => name_and_args = Some((shifted.name.clone(), shifted.args.clone())),
            Some((name, args)) if *name == shifted.name && *args == shifted.args => {}
            Some(_) => {
                return Err(Error::new(
                    ErrorKind::InvalidTemporalFormula(
                        "all shifted atoms in a head theory atom must share a predicate".into(),
                    ),
                    atom.location.clone(),
                ))
            }
        }

        match shifted.shift {
            Shift::Initial => {
                let (name, _) = name_and_args.clone().unwrap();
                initial_disjuncts.push(disjunct(
                    &atom.location,
                    &name,
                    shifted.args,
                    Term::function("__initial", vec![time.clone()]),
                ));
            }
            Shift::Relative(n) => {
                relative.insert_point(n);
                if n > 0 {
                    let arity = shifted.args.len() as u32 + 1;
                    term_transformer.future_predicates.record(&shifted.name, arity, n);
                }
            }
        }
    }

    let Some((name, shared_args)) = name_and_args else {
        return Ok(initial_disjuncts);
    };

    let mut disjuncts = initial_disjuncts;
    for range in relative.iter() {
        if range.end - range.start == 1 {
            disjuncts.push(disjunct(
                &atom.location,
                &name,
                shared_args.clone(),
                time_term(time, range.start),
            ));
        } else {
            let var = Term::Variable(format!("__S{}", range.start));
            let mut args = shared_args.clone();
            args.push(Term::BinaryOperation(
                BinOp::Add,
                Box::new(time.clone()),
                Box::new(var.clone()),
            ));
            let literal = Literal {
                location: atom.location.clone(),
                sign: Sign::NoSign,
                atom: SymbolicAtom {
                    term: Term::function(&name, args),
                },
            };
            let condition = vec![BodyLiteral::Comparison {
                location: atom.location.clone(),
                lhs: var,
                op: CmpOp::Eq,
                rhs: Term::Interval(
                    Box::new(Term::Number(range.start)),
                    Box::new(Term::Number(range.end - 1)),
                ),
            }];
            disjuncts.push(ConditionalLiteral { literal, condition });
        }
    }

    Ok(disjuncts)
}
