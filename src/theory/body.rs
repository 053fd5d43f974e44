//! Per-step translation of a single [`super::BodyFormula`] node.

use super::{Arena, BodyFormula, FormulaId, Pending, StepData};
use crate::host::{Control, Literal, TruthValue};
use crate::theory::path::Path;
use crate::types::err::{Error, ErrorKind};

pub struct TranslateCtx<'a> {
    pub horizon: i64,
    /// The literal of `__final` at the step currently being translated.
    /// Currently unused: every construct that needs `__final` (`&final`,
    /// `Finally`'s desugaring, the Kleene-star boundary conjunct) reaches it
    /// by translating the synthesized `__final` atom directly rather than
    /// through this field. Kept because a future operator may need the
    /// current step's `__final` literal without round-tripping through the
    /// atom table.
    pub final_literal: Option<Literal>,
    pub ctl: &'a mut dyn Control,
}

fn bind_and(ctl: &mut dyn Control, x: Literal, a: Literal, b: Literal) -> Result<(), Error> {
    ctl.backend().add_rule(&[x], &[a, b])?;
    ctl.backend().add_rule(&[], &[x, -a])?;
    ctl.backend().add_rule(&[], &[x, -b])?;
    Ok(())
}

fn bind_or(ctl: &mut dyn Control, x: Literal, a: Literal, b: Literal) -> Result<(), Error> {
    ctl.backend().add_rule(&[x], &[a])?;
    ctl.backend().add_rule(&[x], &[b])?;
    ctl.backend().add_rule(&[], &[x, -a, -b])?;
    Ok(())
}

/// `f` at `target_step` if that step is already inside the ground horizon;
/// otherwise a fresh external that the arena will bind once grounding
/// reaches it (see [`super::Arena::resolve_pending`]). `weak` is the default
/// truth value the external carries until it's resolved: a weak reference
/// (`next(f,n,weak)`/`[skip]f`) defaults to true, a strong one
/// (`next(f,n,strong)`/`<skip>f`) defaults to false, matching the reading
/// that a weak forward reference is vacuously satisfied past the end of the
/// run while a strong one is not.
fn forward_ref(
    arena: &mut Arena,
    formula: FormulaId,
    target_step: i64,
    weak: bool,
    ctx: &mut TranslateCtx,
) -> Result<Literal, Error> {
    if target_step <= ctx.horizon {
        return arena.translate(formula, target_step, ctx);
    }
    let external = ctx.ctl.backend().add_literal()?;
    let default = if weak { TruthValue::True } else { TruthValue::False };
    ctx.ctl.backend().add_external(external, default)?;
    arena.pending.push(Pending {
        formula,
        target_step,
        external,
    });
    Ok(external)
}

pub fn translate(
    arena: &mut Arena,
    id: FormulaId,
    step: i64,
    ctx: &mut TranslateCtx,
) -> Result<Literal, Error> {
    if let Some(data) = arena.steps.get(&(id, step)) {
        return Ok(data.literal);
    }

    match arena.get(id).clone() {
        BodyFormula::Atom { name, mut args } => {
            args.push(crate::host::Symbol::Number(step));
            let symbol = crate::host::Symbol::Function(name, args);
            // An atom absent from the symbol table was never grounded, so
            // it's simply false, not a translation error.
            let literal = match ctx.ctl.symbolic_atoms().literal(&symbol) {
                Some(literal) => literal,
                None => arena.false_literal(ctx.ctl)?,
            };
            arena.steps.insert(
                (id, step),
                StepData {
                    literal,
                    done: true,
                },
            );
            Ok(literal)
        }
        BodyFormula::BooleanConstant(value) => {
            let literal = if value {
                arena.true_literal(ctx.ctl)?
            } else {
                arena.false_literal(ctx.ctl)?
            };
            arena.steps.insert(
                (id, step),
                StepData {
                    literal,
                    done: true,
                },
            );
            Ok(literal)
        }
        BodyFormula::Negation(child) => {
            let child_lit = arena.translate(child, step, ctx)?;
            Ok(-child_lit)
        }
        BodyFormula::Previous(child, n, weak) => {
            if step >= n {
                arena.translate(child, step - n, ctx)
            } else if weak {
                arena.true_literal(ctx.ctl)
            } else {
                arena.false_literal(ctx.ctl)
            }
        }
        BodyFormula::Initially(child) => arena.translate(child, 0, ctx),
        BodyFormula::AtInitial => {
            if step == 0 {
                arena.true_literal(ctx.ctl)
            } else {
                arena.false_literal(ctx.ctl)
            }
        }
        BodyFormula::Next(child, n, weak) => {
            // Cached explicitly: `forward_ref` allocates a fresh external
            // and a pending entry each time it defers, so a repeated lookup
            // of the same `(id, step)` must not re-enter it.
            let literal = forward_ref(arena, child, step + n, weak, ctx)?;
            arena.steps.insert(
                (id, step),
                StepData {
                    literal,
                    done: true,
                },
            );
            Ok(literal)
        }
        _ => translate_reserved(arena, id, step, ctx),
    }
}

/// Formulas whose own expansion may refer back to `(id, step)` (binary
/// connectives over self-referential children, since/trigger/until/release,
/// and the dynamic-logic operators) go through a reserve-then-define
/// two-phase translation: a literal is allocated and cached *before*
/// recursing into children, so a cyclic reference picks up the same literal
/// rather than looping the translator.
fn translate_reserved(
    arena: &mut Arena,
    id: FormulaId,
    step: i64,
    ctx: &mut TranslateCtx,
) -> Result<Literal, Error> {
    let x = ctx.ctl.backend().add_literal()?;
    arena.steps.insert(
        (id, step),
        StepData {
            literal: x,
            done: false,
        },
    );

    match arena.get(id).clone() {
        BodyFormula::And(a, b) => {
            let a_lit = arena.translate(a, step, ctx)?;
            let b_lit = arena.translate(b, step, ctx)?;
            bind_and(ctx.ctl, x, a_lit, b_lit)?;
        }
        BodyFormula::Or(a, b) => {
            let a_lit = arena.translate(a, step, ctx)?;
            let b_lit = arena.translate(b, step, ctx)?;
            bind_or(ctx.ctl, x, a_lit, b_lit)?;
        }
        // Since(a?, b): x <-> b | (a & prev), where prev is the formula
        // translated one step back. With no lhs, the "a &" conjunct drops
        // out entirely: x <-> b | prev ("b held at some point up to now").
        BodyFormula::Since(a, b) => {
            let b_lit = arena.translate(b, step, ctx)?;
            if step == 0 {
                ctx.ctl.backend().add_rule(&[x], &[b_lit])?;
                ctx.ctl.backend().add_rule(&[], &[x, -b_lit])?;
            } else {
                let prev = arena.translate(id, step - 1, ctx)?;
                match a {
                    Some(a) => {
                        let a_lit = arena.translate(a, step, ctx)?;
                        let and_tmp = ctx.ctl.backend().add_literal()?;
                        bind_and(ctx.ctl, and_tmp, a_lit, prev)?;
                        bind_or(ctx.ctl, x, b_lit, and_tmp)?;
                    }
                    None => bind_or(ctx.ctl, x, b_lit, prev)?,
                }
            }
        }
        // Trigger(a?, b), the dual of since: x <-> b & (a | prev), with no
        // lhs collapsing to x <-> b & prev ("b has always held up to now").
        BodyFormula::Trigger(a, b) => {
            let b_lit = arena.translate(b, step, ctx)?;
            if step == 0 {
                ctx.ctl.backend().add_rule(&[x], &[b_lit])?;
                ctx.ctl.backend().add_rule(&[], &[x, -b_lit])?;
            } else {
                let prev = arena.translate(id, step - 1, ctx)?;
                match a {
                    Some(a) => {
                        let a_lit = arena.translate(a, step, ctx)?;
                        let or_tmp = ctx.ctl.backend().add_literal()?;
                        bind_or(ctx.ctl, or_tmp, a_lit, prev)?;
                        bind_and(ctx.ctl, x, b_lit, or_tmp)?;
                    }
                    None => bind_and(ctx.ctl, x, b_lit, prev)?,
                }
            }
        }
        // Until(a?, b): x <-> b | (a & next), next being a weak
        // self-reference one step ahead (weak: true past the horizon, so an
        // unresolved future doesn't falsify an otherwise-satisfied until).
        BodyFormula::Until(a, b) => {
            let b_lit = arena.translate(b, step, ctx)?;
            let next = forward_ref(arena, id, step + 1, true, ctx)?;
            match a {
                Some(a) => {
                    let a_lit = arena.translate(a, step, ctx)?;
                    let and_tmp = ctx.ctl.backend().add_literal()?;
                    bind_and(ctx.ctl, and_tmp, a_lit, next)?;
                    bind_or(ctx.ctl, x, b_lit, and_tmp)?;
                }
                None => bind_or(ctx.ctl, x, b_lit, next)?,
            }
        }
        // Release(a?, b), the dual of until: x <-> b & (a | next), next
        // being a strong self-reference (defaults false past the horizon).
        BodyFormula::Release(a, b) => {
            let b_lit = arena.translate(b, step, ctx)?;
            let next = forward_ref(arena, id, step + 1, false, ctx)?;
            match a {
                Some(a) => {
                    let a_lit = arena.translate(a, step, ctx)?;
                    let or_tmp = ctx.ctl.backend().add_literal()?;
                    bind_or(ctx.ctl, or_tmp, a_lit, next)?;
                    bind_and(ctx.ctl, x, b_lit, or_tmp)?;
                }
                None => bind_and(ctx.ctl, x, b_lit, next)?,
            }
        }
        BodyFormula::Diamond(path, f) => {
            let result = translate_diamond(arena, path, f, step, ctx)?;
            ctx.ctl.backend().add_rule(&[x], &[result])?;
            ctx.ctl.backend().add_rule(&[], &[x, -result])?;
        }
        BodyFormula::Box(path, f) => {
            let result = translate_box(arena, path, f, step, ctx)?;
            ctx.ctl.backend().add_rule(&[x], &[result])?;
            ctx.ctl.backend().add_rule(&[], &[x, -result])?;
        }
        already_handled => {
            return Err(Error::without_location(ErrorKind::Parse(format!(
                "formula {already_handled:?} should have been handled before reservation"
            ))))
        }
    }

    if let Some(data) = arena.steps.get_mut(&(id, step)) {
        data.done = true;
    }
    Ok(x)
}

/// The literal of "there is no step beyond this one yet", used to guard the
/// Kleene-star unrolling: a strong one-step lookahead that can't yet be
/// confirmed defaults to false, so `final_lit` is true exactly at the
/// current edge of the horizon.
fn final_lit(arena: &mut Arena, step: i64, ctx: &mut TranslateCtx) -> Result<Literal, Error> {
    let truth = arena.intern(BodyFormula::BooleanConstant(true));
    let next_true = forward_ref(arena, truth, step + 1, false, ctx)?;
    Ok(-next_true)
}

fn translate_diamond(
    arena: &mut Arena,
    path: crate::theory::path::PathId,
    f: FormulaId,
    step: i64,
    ctx: &mut TranslateCtx,
) -> Result<Literal, Error> {
    match arena.get_path(path) {
        Path::Step => forward_ref(arena, f, step + 1, false, ctx),
        Path::Check(c) => {
            let c_lit = arena.translate(c, step, ctx)?;
            let f_lit = arena.translate(f, step, ctx)?;
            let x = ctx.ctl.backend().add_literal()?;
            bind_and(ctx.ctl, x, c_lit, f_lit)?;
            Ok(x)
        }
        Path::Choice(p, q) => {
            let p_lit = translate_diamond(arena, p, f, step, ctx)?;
            let q_lit = translate_diamond(arena, q, f, step, ctx)?;
            let x = ctx.ctl.backend().add_literal()?;
            bind_or(ctx.ctl, x, p_lit, q_lit)?;
            Ok(x)
        }
        Path::Sequence(p, q) => {
            let inner = arena.intern(BodyFormula::Diamond(q, f));
            translate_diamond(arena, p, inner, step, ctx)
        }
        Path::Star(p) => {
            // `<p*>f <-> (final -> f) & (f | <p><p*>f)`.
            let inner = arena.intern(BodyFormula::Diamond(path, f));
            let unrolled = translate_diamond(arena, p, inner, step, ctx)?;
            let base = arena.translate(f, step, ctx)?;
            let or_lit = ctx.ctl.backend().add_literal()?;
            bind_or(ctx.ctl, or_lit, base, unrolled)?;
            let final_literal = final_lit(arena, step, ctx)?;
            let imp_lit = ctx.ctl.backend().add_literal()?;
            bind_or(ctx.ctl, imp_lit, -final_literal, base)?;
            let x = ctx.ctl.backend().add_literal()?;
            bind_and(ctx.ctl, x, imp_lit, or_lit)?;
            Ok(x)
        }
    }
}

fn translate_box(
    arena: &mut Arena,
    path: crate::theory::path::PathId,
    f: FormulaId,
    step: i64,
    ctx: &mut TranslateCtx,
) -> Result<Literal, Error> {
    match arena.get_path(path) {
        Path::Step => forward_ref(arena, f, step + 1, true, ctx),
        Path::Check(c) => {
            // `c ? -> f`: if the test fails the modality is vacuously true.
            let c_lit = arena.translate(c, step, ctx)?;
            let f_lit = arena.translate(f, step, ctx)?;
            let x = ctx.ctl.backend().add_literal()?;
            bind_or(ctx.ctl, x, -c_lit, f_lit)?;
            Ok(x)
        }
        Path::Choice(p, q) => {
            let p_lit = translate_box(arena, p, f, step, ctx)?;
            let q_lit = translate_box(arena, q, f, step, ctx)?;
            let x = ctx.ctl.backend().add_literal()?;
            bind_and(ctx.ctl, x, p_lit, q_lit)?;
            Ok(x)
        }
        Path::Sequence(p, q) => {
            let inner = arena.intern(BodyFormula::Box(q, f));
            translate_box(arena, p, inner, step, ctx)
        }
        Path::Star(p) => {
            // `[p*]f <-> (final -> f) & (f & [p][p*]f)`.
            let inner = arena.intern(BodyFormula::Box(path, f));
            let unrolled = translate_box(arena, p, inner, step, ctx)?;
            let base = arena.translate(f, step, ctx)?;
            let and_lit = ctx.ctl.backend().add_literal()?;
            bind_and(ctx.ctl, and_lit, base, unrolled)?;
            let final_literal = final_lit(arena, step, ctx)?;
            let imp_lit = ctx.ctl.backend().add_literal()?;
            bind_or(ctx.ctl, imp_lit, -final_literal, base)?;
            let x = ctx.ctl.backend().add_literal()?;
            bind_and(ctx.ctl, x, imp_lit, and_lit)?;
            Ok(x)
        }
    }
}
