//! Builds a [`super::BodyFormula`] tree out of an already-ground theory term
//! (the argument of a single `&tel{...}`/`&del{...}` element, after the
//! host's grounder has instantiated every variable).
//!
//! This is the bridge between the theory atom surface syntax and the
//! arena: program/term transformation happens once, source-to-source,
//! before grounding; this conversion happens once per *ground* occurrence,
//! mirroring how the original registers a theory callback invoked per
//! ground theory atom rather than re-implementing grounding itself.

use super::path::Path;
use super::{Arena, BodyFormula, FormulaId};
use crate::ast::TheoryTerm;
use crate::host::Symbol;
use crate::shift::{split_shifted_name, Shift};
use crate::theory::path::PathId;
use crate::types::err::{Error, ErrorKind};

/// Wraps `id` to account for a name's prime/underscore shift, the same
/// shorthand the term transformer applies to bare literals, here applied to
/// an atom nested inside a temporal formula.
fn wrap_shift(arena: &mut Arena, shift: Shift, id: FormulaId) -> FormulaId {
    match shift {
        Shift::Initial => arena.intern(BodyFormula::Initially(id)),
        Shift::Relative(0) => id,
        Shift::Relative(n) if n > 0 => arena.intern(BodyFormula::Next(id, n, false)),
        Shift::Relative(n) => arena.intern(BodyFormula::Previous(id, -n, false)),
    }
}

fn theory_term_to_symbol(term: &TheoryTerm) -> Result<Symbol, Error> {
    match term {
        TheoryTerm::Number(n) => Ok(Symbol::Number(*n)),
        TheoryTerm::Symbol(s) => Ok(Symbol::Function(s.clone(), Vec::new())),
        TheoryTerm::Function(name, args) => {
            let args = args
                .iter()
                .map(theory_term_to_symbol)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Symbol::Function(name.clone(), args))
        }
        other => Err(Error::without_location(ErrorKind::InvalidSymbol(
            other.to_source(),
        ))),
    }
}

/// Builds the leaf `Atom` formula for `name(args)`, splitting off a
/// prime/underscore shift from `name` and wrapping the result accordingly.
fn build_leaf(arena: &mut Arena, name: &str, args: &[TheoryTerm]) -> Result<FormulaId, Error> {
    let symbol_args = args
        .iter()
        .map(theory_term_to_symbol)
        .collect::<Result<Vec<_>, _>>()?;
    let (bare_name, shift) =
        split_shifted_name(name).map_err(|e| Error::without_location(ErrorKind::from(e)))?;
    let atom = arena.intern(BodyFormula::Atom {
        name: bare_name,
        args: symbol_args,
    });
    Ok(wrap_shift(arena, shift, atom))
}

/// `name`/`args` for a term that must already be a plain atom leaf (used to
/// resolve classical negation, which only ever applies directly to an atom).
fn atom_name_args(term: &TheoryTerm) -> Result<(&str, &[TheoryTerm]), Error> {
    match term {
        TheoryTerm::Symbol(s) => Ok((s.as_str(), &[])),
        TheoryTerm::Function(name, args) => Ok((name.as_str(), args.as_slice())),
        other => Err(Error::without_location(ErrorKind::InvalidSymbol(
            other.to_source(),
        ))),
    }
}

/// Dispatches the `&`-prefixed keyword forms shared between the formula and
/// path grammars (`&true`, `&false`; `&initial`/`&final`/`&skip` are only
/// meaningful in their respective grammars and rejected elsewhere).
enum Keyword {
    True,
    False,
    Initial,
    Final,
    Skip,
}

fn keyword_of(args: &[TheoryTerm]) -> Result<Keyword, Error> {
    let arg = args.first().ok_or_else(|| {
        Error::without_location(ErrorKind::Parse("`&` needs exactly one argument".into()))
    })?;
    let TheoryTerm::Symbol(name) = arg else {
        return Err(Error::without_location(ErrorKind::InvalidSymbol(
            arg.to_source(),
        )));
    };
    match name.as_str() {
        "true" => Ok(Keyword::True),
        "false" => Ok(Keyword::False),
        "initial" => Ok(Keyword::Initial),
        "final" => Ok(Keyword::Final),
        "skip" => Ok(Keyword::Skip),
        other => Err(Error::without_location(ErrorKind::InvalidSymbol(
            other.to_string(),
        ))),
    }
}

/// The `&tel`/temporal body grammar: boolean connectives, previous/next with
/// an explicit shift count and weak flag, the since/trigger/until/release
/// family with an optional left-hand side, and the dynamic-logic
/// diamond/box operators over a path built by [`build_path`].
pub fn build_body(arena: &mut Arena, term: &TheoryTerm) -> Result<FormulaId, Error> {
    match term {
        // Classical negation applies only to an atom leaf.
        TheoryTerm::Function(op, args) if op == "-" && args.len() == 1 => {
            let (name, inner_args) = atom_name_args(&args[0])?;
            build_leaf(arena, &format!("-{name}"), inner_args)
        }
        TheoryTerm::Function(op, args) if args.len() == 2 => match op.as_str() {
            "&" => {
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::And(a, b)))
            }
            "|" => {
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::Or(a, b)))
            }
            "->" => {
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                let na = arena.intern(BodyFormula::Negation(a));
                Ok(arena.intern(BodyFormula::Or(na, b)))
            }
            "<-" => {
                let a = build_body(arena, &args[1])?;
                let b = build_body(arena, &args[0])?;
                let na = arena.intern(BodyFormula::Negation(a));
                Ok(arena.intern(BodyFormula::Or(na, b)))
            }
            "<>" => {
                // Biconditional, encoded compositionally as a conjunction
                // of two implications rather than as its own primitive.
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                let na = arena.intern(BodyFormula::Negation(a));
                let nb = arena.intern(BodyFormula::Negation(b));
                let fwd = arena.intern(BodyFormula::Or(na, b));
                let back = arena.intern(BodyFormula::Or(nb, a));
                Ok(arena.intern(BodyFormula::And(fwd, back)))
            }
            "<" | "<:" => {
                let n = number_operand(&args[0])?;
                let rhs = build_body(arena, &args[1])?;
                Ok(shifted_previous(arena, rhs, n, op == "<:"))
            }
            ">" | ">:" => {
                let n = number_operand(&args[0])?;
                let rhs = build_body(arena, &args[1])?;
                Ok(shifted_next(arena, rhs, n, op == ">:"))
            }
            "<;" | "<:;" => {
                let lhs = build_body(arena, &args[0])?;
                let rhs = build_body(arena, &args[1])?;
                let prev = arena.intern(BodyFormula::Previous(lhs, 1, op == "<:;"));
                Ok(arena.intern(BodyFormula::And(prev, rhs)))
            }
            ";>" | ";>:" => {
                let lhs = build_body(arena, &args[0])?;
                let rhs = build_body(arena, &args[1])?;
                let next = arena.intern(BodyFormula::Next(rhs, 1, op == ";>:"));
                Ok(arena.intern(BodyFormula::And(lhs, next)))
            }
            "<*" => {
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::Since(Some(a), b)))
            }
            "<?" => {
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::Trigger(Some(a), b)))
            }
            ">*" => {
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::Until(Some(a), b)))
            }
            ">?" => {
                let a = build_body(arena, &args[0])?;
                let b = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::Release(Some(a), b)))
            }
            ".>?" => {
                let path = build_path(arena, &args[0])?;
                let f = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::Diamond(path, f)))
            }
            ".>*" => {
                let path = build_path(arena, &args[0])?;
                let f = build_body(arena, &args[1])?;
                Ok(arena.intern(BodyFormula::Box(path, f)))
            }
            other => Err(Error::without_location(ErrorKind::InvalidOperator(
                other.to_string(),
            ))),
        },
        TheoryTerm::Function(op, args) if args.len() == 1 => match op.as_str() {
            "~" => {
                let a = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Negation(a)))
            }
            "<" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Previous(rhs, 1, false)))
            }
            "<:" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Previous(rhs, 1, true)))
            }
            ">" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Next(rhs, 1, false)))
            }
            ">:" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Next(rhs, 1, true)))
            }
            "<<" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Initially(rhs)))
            }
            // Unary since/trigger/until/release desugar to the binary form
            // with no left-hand side ("eventually"/"always" flavors).
            "<*" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Since(None, rhs)))
            }
            "<?" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Trigger(None, rhs)))
            }
            ">*" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Until(None, rhs)))
            }
            ">?" => {
                let rhs = build_body(arena, &args[0])?;
                Ok(arena.intern(BodyFormula::Release(None, rhs)))
            }
            ">>" => {
                // Finally(a) = Release(None, ~final | a), with the Next
                // auxiliary handled by Release's own forward_ref.
                let a = build_body(arena, &args[0])?;
                let final_atom = arena.intern(BodyFormula::Atom {
                    name: "__final".to_string(),
                    args: Vec::new(),
                });
                let not_final = arena.intern(BodyFormula::Negation(final_atom));
                let rhs = arena.intern(BodyFormula::Or(not_final, a));
                Ok(arena.intern(BodyFormula::Release(None, rhs)))
            }
            "&" => match keyword_of(args)? {
                Keyword::True => Ok(arena.intern(BodyFormula::BooleanConstant(true))),
                Keyword::False => Ok(arena.intern(BodyFormula::BooleanConstant(false))),
                Keyword::Initial => Ok(arena.intern(BodyFormula::AtInitial)),
                Keyword::Final => Ok(arena.intern(BodyFormula::Atom {
                    name: "__final".to_string(),
                    args: Vec::new(),
                })),
                Keyword::Skip => Err(Error::without_location(ErrorKind::Parse(
                    "`&skip` is only valid in path position".into(),
                ))),
            },
            other => Err(Error::without_location(ErrorKind::InvalidOperator(
                other.to_string(),
            ))),
        },
        TheoryTerm::Symbol(name) => build_leaf(arena, name, &[]),
        TheoryTerm::Function(name, args) => build_leaf(arena, name, args),
        other => Err(Error::without_location(ErrorKind::InvalidSymbol(
            other.to_source(),
        ))),
    }
}

/// The dynamic-logic path grammar nested under `.>?`/`.>*`: test, Kleene
/// star, sequence and choice, plus the atomic `&skip` step.
pub fn build_path(arena: &mut Arena, term: &TheoryTerm) -> Result<PathId, Error> {
    match term {
        TheoryTerm::Function(op, args) if args.len() == 2 => match op.as_str() {
            ";;" => {
                let p = build_path(arena, &args[0])?;
                let q = build_path(arena, &args[1])?;
                Ok(arena.intern_path(Path::Sequence(p, q)))
            }
            "+" => {
                let p = build_path(arena, &args[0])?;
                let q = build_path(arena, &args[1])?;
                Ok(arena.intern_path(Path::Choice(p, q)))
            }
            other => Err(Error::without_location(ErrorKind::InvalidOperator(
                other.to_string(),
            ))),
        },
        TheoryTerm::Function(op, args) if args.len() == 1 => match op.as_str() {
            "?" => {
                let f = build_body(arena, &args[0])?;
                Ok(arena.intern_path(Path::Check(f)))
            }
            "*" => {
                let p = build_path(arena, &args[0])?;
                Ok(arena.intern_path(Path::Star(p)))
            }
            "&" => match keyword_of(args)? {
                Keyword::Skip => Ok(arena.intern_path(Path::Step)),
                _ => Err(Error::without_location(ErrorKind::Parse(
                    "only `&skip` is valid in path position".into(),
                ))),
            },
            other => Err(Error::without_location(ErrorKind::InvalidOperator(
                other.to_string(),
            ))),
        },
        other => Err(Error::without_location(ErrorKind::Parse(format!(
            "invalid path expression: {}",
            other.to_source()
        )))),
    }
}

fn number_operand(term: &TheoryTerm) -> Result<i64, Error> {
    match term {
        TheoryTerm::Number(n) => Ok(*n),
        other => Err(Error::without_location(ErrorKind::InvalidSymbol(
            other.to_source(),
        ))),
    }
}

fn shifted_previous(arena: &mut Arena, rhs: FormulaId, n: i64, weak: bool) -> FormulaId {
    if n == 0 {
        rhs
    } else {
        arena.intern(BodyFormula::Previous(rhs, n, weak))
    }
}

fn shifted_next(arena: &mut Arena, rhs: FormulaId, n: i64, weak: bool) -> FormulaId {
    if n == 0 {
        rhs
    } else {
        arena.intern(BodyFormula::Next(rhs, n, weak))
    }
}

/// Builds the formula for one `&tel{...}` or `&del{...}` element term,
/// resolving operator precedence first.
pub fn build_formula(
    arena: &mut Arena,
    term: &TheoryTerm,
    table: &crate::ast::OperatorTable,
) -> Result<FormulaId, Error> {
    let resolved = crate::ast::resolve(term, table)?;
    build_body(arena, &resolved)
}

/// The default operator table for the `&tel`/`&del` body and path grammar,
/// grounded in the priorities of `original_source/`'s `#theory tel { ... }`
/// declaration (the since/trigger/until/release/previous/next family at
/// priority 5 unary / 4-5 binary, booleans below that, sequencing operators
/// loosest). The dynamic-logic path and `.>?`/`.>*` operators have no
/// original grammar declaration to carry over (see `DESIGN.md`), so their
/// relative priorities are chosen to mirror the boolean tiers they play the
/// same structural role as (`;;`/`+` next to `&`/`|`, `.>?`/`.>*` as the
/// loosest-binding wrapper, same tier as the sequencing sugar).
pub fn default_table() -> crate::ast::OperatorTable {
    use crate::ast::Associativity::*;
    crate::ast::OperatorTable::new()
        .unary("&", 6)
        .unary("-", 6)
        .unary("~", 5)
        .unary("<", 5)
        .binary("<", 5, Right)
        .unary("<:", 5)
        .binary("<:", 5, Right)
        .unary("<?", 5)
        .unary("<*", 5)
        .unary("<<", 5)
        .unary(">", 5)
        .binary(">", 5, Right)
        .unary(">:", 5)
        .binary(">:", 5, Right)
        .unary(">?", 5)
        .unary(">*", 5)
        .unary(">>", 5)
        .unary("*", 5)
        .unary("?", 5)
        .binary(">*", 4, Left)
        .binary(">?", 4, Left)
        .binary("<*", 4, Left)
        .binary("<?", 4, Left)
        .binary("&", 3, Left)
        .binary(";;", 3, Left)
        .binary("|", 2, Left)
        .binary("+", 2, Left)
        .binary("<-", 1, Left)
        .binary("->", 1, Left)
        .binary("<>", 1, Left)
        .binary(";>", 0, Right)
        .binary(";>:", 0, Right)
        .binary("<;", 0, Left)
        .binary("<:;", 0, Left)
        .binary(".>?", 0, Left)
        .binary(".>*", 0, Left)
}
