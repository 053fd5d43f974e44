/*!
The body formula compiler: translates a temporal/dynamic-logic body formula
into literals of the host engine's ground program, one step at a time.

Formulas are hash-consed into an arena keyed by their canonical string
representation, so that `a & b` appearing in two different rules (or at two
different steps) is translated once and its literal reused — this is what
lets the incremental driver avoid re-deriving clauses for formulas whose
structure hasn't changed as the horizon grows.

Two concerns that would otherwise tangle the translation are kept out of
this module on purpose:
  - turning source syntax into a `BodyFormula` tree is the job of the
    program/term transformers, which call [`Arena::intern`];
  - the head-only transformation (folding a family of shifted `&tel` atoms
    in a rule head into a disjunction) is [`crate::program_transformer::head`],
    since it operates before a formula ever reaches this arena.
*/

pub mod body;
pub mod construct;
pub mod path;

use crate::host::{Literal, Symbol};
use crate::types::err::Error;
use path::{Path, PathId};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormulaId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BodyFormula {
    /// An atom nested in a temporal/dynamic formula, named and with ground
    /// arguments but *without* a time argument — [`body::translate`]
    /// appends the step being translated, which is what lets the same
    /// interned `Atom` serve every step it's asked about.
    Atom { name: String, args: Vec<Symbol> },
    BooleanConstant(bool),
    Negation(FormulaId),
    And(FormulaId, FormulaId),
    Or(FormulaId, FormulaId),
    /// `n < f` / `n <: f` (leading primes for `n=1`): `f` as it held `n`
    /// steps ago; `false` (or `true`, if weak) before step `n`.
    Previous(FormulaId, i64, bool),
    /// `_f`: the value `f` took at step 0, referenced from any step.
    Initially(FormulaId),
    /// `n > f` / `n >: f` (trailing primes for `n=1`): `f` as it will hold
    /// `n` steps ahead.
    Next(FormulaId, i64, bool),
    /// `a <* b` (since, `lhs = None` gives "eventually in the past"): `b`
    /// held at some point up to and including now, and `a` (if present) has
    /// held at every point since.
    Since(Option<FormulaId>, FormulaId),
    /// `a <? b` (trigger, `lhs = None` gives "always in the past"), the
    /// dual of since.
    Trigger(Option<FormulaId>, FormulaId),
    /// `a >* b` (until, `lhs = None` gives "eventually in the future"): `b`
    /// will hold at some future point, and `a` (if present) holds until
    /// then.
    Until(Option<FormulaId>, FormulaId),
    /// `a >? b` (release, `lhs = None` gives "always in the future"), the
    /// dual of until.
    Release(Option<FormulaId>, FormulaId),
    /// `&initial`: true exactly when the current step is 0. Distinct from
    /// `Initially`, which evaluates its argument at step 0 rather than
    /// asking whether the current step *is* 0.
    AtInitial,
    /// `<>f` under dynamic logic path `path`: some path-compatible successor
    /// satisfies `f`.
    Diamond(PathId, FormulaId),
    /// `[]f` under dynamic logic path `path`: every path-compatible
    /// successor satisfies `f`.
    Box(PathId, FormulaId),
}

/// Either the finished literal for a `(formula, step)` pair, or a literal
/// that was reserved before its defining rules were emitted — reserving
/// first lets a formula's own expansion refer back to itself (as happens
/// unrolling `f*`) without the arena recursing forever: ASP's stable-model
/// semantics already treats a literal with no support but its own positive
/// occurrence as false, which is exactly the fixed point `f*` wants.
#[derive(Clone, Copy, Debug)]
struct StepData {
    literal: Literal,
    done: bool,
}

struct Pending {
    formula: FormulaId,
    target_step: i64,
    external: Literal,
}

pub struct Arena {
    canon: HashMap<String, FormulaId>,
    formulas: Vec<BodyFormula>,
    path_canon: HashMap<String, PathId>,
    paths: Vec<Path>,
    steps: HashMap<(FormulaId, i64), StepData>,
    pending: Vec<Pending>,
    true_literal: Option<Literal>,
    false_literal: Option<Literal>,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            canon: HashMap::new(),
            formulas: Vec::new(),
            path_canon: HashMap::new(),
            paths: Vec::new(),
            steps: HashMap::new(),
            pending: Vec::new(),
            true_literal: None,
            false_literal: None,
        }
    }

    fn canon_key(formula: &BodyFormula) -> String {
        format!("{formula:?}")
    }

    /// Hash-conses `formula`, returning the existing id if an identical
    /// formula was already interned.
    pub fn intern(&mut self, formula: BodyFormula) -> FormulaId {
        let key = Self::canon_key(&formula);
        if let Some(id) = self.canon.get(&key) {
            return *id;
        }
        let id = FormulaId(self.formulas.len() as u32);
        self.formulas.push(formula);
        self.canon.insert(key, id);
        id
    }

    fn path_key(path: &Path) -> String {
        format!("{path:?}")
    }

    pub fn intern_path(&mut self, path: Path) -> PathId {
        let key = Self::path_key(&path);
        if let Some(id) = self.path_canon.get(&key) {
            return *id;
        }
        let id = PathId(self.paths.len() as u32);
        self.paths.push(path);
        self.path_canon.insert(key, id);
        id
    }

    fn get(&self, id: FormulaId) -> &BodyFormula {
        &self.formulas[id.0 as usize]
    }

    fn get_path(&self, id: PathId) -> Path {
        self.paths[id.0 as usize].clone()
    }

    /// Binds whichever externals became resolvable now that `horizon` grew
    /// to include `new_step`. Called by the driver right after grounding
    /// each new step.
    pub fn resolve_pending(
        &mut self,
        horizon: i64,
        ctl: &mut dyn crate::host::Control,
    ) -> Result<(), Error> {
        let ready: Vec<Pending> = {
            let mut ready = Vec::new();
            let mut still_pending = Vec::new();
            for p in self.pending.drain(..) {
                if p.target_step <= horizon {
                    ready.push(p);
                } else {
                    still_pending.push(p);
                }
            }
            self.pending = still_pending;
            ready
        };
        let mut ctx = body::TranslateCtx {
            horizon,
            final_literal: None,
            ctl,
        };
        for p in ready {
            let target = self.translate(p.formula, p.target_step, &mut ctx)?;
            ctx.ctl
                .backend()
                .add_rule(&[p.external], &[target])?;
            ctx.ctl
                .backend()
                .add_rule(&[], &[p.external, -target])?;
            // The rules above now fully determine the external; stop
            // forcing a default value for it.
            ctx.ctl
                .backend()
                .add_external(p.external, crate::host::TruthValue::Free)?;
        }
        Ok(())
    }

    pub fn translate(
        &mut self,
        id: FormulaId,
        step: i64,
        ctx: &mut body::TranslateCtx,
    ) -> Result<Literal, Error> {
        body::translate(self, id, step, ctx)
    }

    fn true_literal(&mut self, ctl: &mut dyn crate::host::Control) -> Result<Literal, Error> {
        if let Some(l) = self.true_literal {
            return Ok(l);
        }
        let l = ctl.backend().add_literal()?;
        ctl.backend().add_rule(&[l], &[])?;
        self.true_literal = Some(l);
        Ok(l)
    }

    fn false_literal(&mut self, ctl: &mut dyn crate::host::Control) -> Result<Literal, Error> {
        if let Some(l) = self.false_literal {
            return Ok(l);
        }
        let l = ctl.backend().add_literal()?;
        ctl.backend().add_rule(&[], &[l])?;
        self.false_literal = Some(l);
        Ok(l)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
