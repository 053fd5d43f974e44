/*!
The incremental driver: the step loop that grounds, translates, and solves
one state at a time, extending the horizon until a stop condition fires.

Corresponds to the original's `imain`. Where that loop reads `--const`s off
the clingo command line, [`imain`] takes a [`Config`] directly; where it
drives a single global `Theory` and `Control`, here both are explicit
arguments so the driver has no hidden state between calls.
*/

use crate::config::{Config, StopCriterion};
use crate::host::{Control, GroundTheoryAtom, Model, Symbol, SolveResult, TruthValue};
use crate::program_transformer::{Part, RegroundParts, TransformedProgram};
use crate::theory::body::TranslateCtx;
use crate::theory::{construct, Arena};
use crate::types::err::Error;

const TARGET: &str = "driver";

fn final_symbol(step: i64) -> Symbol {
    Symbol::Function("__final".to_string(), vec![Symbol::Number(step)])
}

/// Whether `part` is normally ground at `step`, ignoring reground windows:
/// `initial` only at step 0, `always` at every step, `dynamic` from step 1
/// onward.
fn part_grounds_at(part: Part, step: i64) -> bool {
    match part {
        Part::Initial => step == 0,
        Part::Always => true,
        Part::Dynamic => step > 0,
    }
}

/// The ground-parts list for one iteration: `initial` only at step 0,
/// `always` at every step (guarded internally by `not __final(T-1)`),
/// `dynamic` from step 1 onward, plus — for every future-referring
/// constraint deferred into a reground window — its windowed future form
/// while the horizon hasn't yet reached the referenced step, or its steady
/// form from then on, each at the cadence of the part it was deferred from.
fn ground_parts(step: i64, reground: &RegroundParts) -> Vec<(String, Vec<Symbol>)> {
    let mut parts = Vec::new();
    if step == 0 {
        parts.push(("initial".to_string(), vec![Symbol::Number(0)]));
    }
    parts.push(("always".to_string(), vec![Symbol::Number(step)]));
    if step > 0 {
        parts.push(("dynamic".to_string(), vec![Symbol::Number(step)]));
    }
    for window in &reground.windows {
        if !part_grounds_at(window.part, step) {
            continue;
        }
        let name = if step < window.max_shift {
            &window.future_part
        } else {
            &window.steady_part
        };
        parts.push((name.clone(), vec![Symbol::Number(step)]));
    }
    parts
}

fn should_continue(step: u32, config: &Config, last_result: Option<SolveResult>) -> bool {
    if let Some(imax) = config.imax {
        if step >= imax {
            return false;
        }
    }
    if step == 0 || step < config.imin {
        return true;
    }
    match last_result {
        None => true,
        Some(result) => !stop_criterion_met(config.istop, result),
    }
}

fn stop_criterion_met(istop: StopCriterion, result: SolveResult) -> bool {
    matches!(
        (istop, result),
        (StopCriterion::Sat, SolveResult::Satisfiable)
            | (StopCriterion::Unsat, SolveResult::Unsatisfiable)
            | (StopCriterion::Unknown, SolveResult::Unknown)
    )
}

/// For every predicate carrying a future shift, every known instance whose
/// trailing time argument lies beyond `step` is assumed false for this
/// solve: the ground program already contains rule instances that mention
/// it (grounding a rule with a `p'(X)` head also instantiates `p` at the
/// successor time), but nothing has happened yet to support it.
fn compute_assumptions(ctl: &dyn Control, program: &TransformedProgram, step: i64) -> Vec<i32> {
    let mut assumptions = Vec::new();
    for (name, arity) in &program.reground.max_shift {
        for atom in ctl.symbolic_atoms().by_signature(name, *arity as usize) {
            let Some(Symbol::Number(t)) = atom.args().last() else {
                continue;
            };
            if *t > step {
                if let Some(literal) = ctl.symbolic_atoms().literal(&atom) {
                    assumptions.push(-literal);
                }
            }
        }
    }
    assumptions
}

fn translate_new_theory_atoms(
    arena: &mut Arena,
    atoms: Vec<GroundTheoryAtom>,
    table: &crate::ast::OperatorTable,
    step: i64,
    ctl: &mut dyn Control,
) -> Result<(), Error> {
    for atom in atoms {
        let formula = construct::build_formula(arena, &atom.term, table)?;
        let mut ctx = TranslateCtx {
            horizon: step,
            final_literal: None,
            ctl: &mut *ctl,
        };
        arena.translate(formula, atom.step, &mut ctx)?;
    }
    Ok(())
}

/// Runs the step loop described in the module doc comment until a stop
/// condition is met, delivering every accepted model to `on_model(step,
/// model)`. Returns the last solve result (the one that triggered the
/// stop, or `Unknown` if the loop never ran a solve).
pub fn imain(
    ctl: &mut dyn Control,
    program: &TransformedProgram,
    config: &Config,
    mut on_model: impl FnMut(i64, &dyn Model),
) -> Result<SolveResult, Error> {
    for statement in program
        .initial
        .iter()
        .chain(program.always.iter())
        .chain(program.dynamic.iter())
        .chain(program.reground.windows.iter().flat_map(|w| w.future_rules.iter().chain(w.steady_rules.iter())))
    {
        ctl.add(statement)?;
    }

    let table = construct::default_table();
    let mut arena = Arena::new();
    let mut step: i64 = 0;
    let mut last_result: Option<SolveResult> = None;

    loop {
        if !should_continue(step as u32, config, last_result) {
            break;
        }

        log::debug!(target: TARGET, "grounding step {step}");
        let parts = ground_parts(step, &program.reground);

        if step > 0 {
            ctl.release_external(&final_symbol(step - 1))?;
        }

        ctl.ground(&parts)?;

        let new_theory_atoms = ctl.theory_atoms();
        translate_new_theory_atoms(&mut arena, new_theory_atoms, &table, step, &mut *ctl)?;
        arena.resolve_pending(step, &mut *ctl)?;

        ctl.assign_external(&final_symbol(step), TruthValue::True)?;

        let assumptions = compute_assumptions(ctl, program, step);

        log::trace!(target: TARGET, "solving step {step} under {} assumptions", assumptions.len());
        let result = ctl.solve(&assumptions, &mut |model| on_model(step, model))?;
        log::info!(target: TARGET, "step {step}: {result:?}");

        last_result = Some(result);
        step += 1;
    }

    Ok(last_result.unwrap_or(SolveResult::Unknown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::host::mock::MockControl;
    use crate::program_transformer::TransformedProgram;

    #[test]
    fn stops_at_imin_zero_on_first_satisfiable_step() {
        let mut ctl = MockControl::new();
        let program = TransformedProgram::default();
        let config = Config {
            imin: 0,
            imax: None,
            istop: StopCriterion::Sat,
        };
        let mut seen_steps = Vec::new();
        let result = imain(&mut ctl, &program, &config, |step, _model| {
            seen_steps.push(step);
        })
        .unwrap();
        assert_eq!(result, SolveResult::Satisfiable);
        assert_eq!(seen_steps, vec![0]);
    }

    #[test]
    fn imax_bounds_the_number_of_iterations() {
        let mut ctl = MockControl::new();
        let program = TransformedProgram::default();
        let config = Config {
            imin: 0,
            imax: Some(3),
            istop: StopCriterion::Unsat,
        };
        let mut seen_steps = Vec::new();
        imain(&mut ctl, &program, &config, |step, _model| {
            seen_steps.push(step);
        })
        .unwrap();
        assert_eq!(seen_steps, vec![0, 1, 2]);
    }
}
