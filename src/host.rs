/*!
The interface this crate consumes from a host ASP engine.

Everything here is a collaborator, not something this crate implements:
grounding, solving, and the symbol/literal tables are the engine's job. The
incremental driver ([`crate::driver`]) and the theory compiler only ever
reach the engine through these traits, which keeps the temporal/dynamic
logic machinery free of any particular engine's concrete types.

A minimal in-memory [`mock`] implementation is provided for integration
tests that exercise the driver loop without a real grounder/solver behind
it.
*/

use crate::types::err::{Error, ErrorKind};
use std::collections::HashMap;

/// A ground symbol: the host engine's notion of a term with no remaining
/// variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Number(i64),
    String(String),
    Function(String, Vec<Symbol>),
    Infimum,
    Supremum,
}

impl Symbol {
    pub fn constant(name: impl Into<String>) -> Self {
        Symbol::Function(name.into(), Vec::new())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Function(name, _) => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Symbol] {
        match self {
            Symbol::Function(_, args) => args,
            _ => &[],
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Number(n) => write!(f, "{n}"),
            Symbol::String(s) => write!(f, "\"{s}\""),
            Symbol::Infimum => write!(f, "#inf"),
            Symbol::Supremum => write!(f, "#sup"),
            Symbol::Function(name, args) => {
                if args.is_empty() {
                    write!(f, "{name}")
                } else {
                    write!(f, "{name}(")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{a}")?;
                    }
                    write!(f, ")")
                }
            }
        }
    }
}

/// A solver literal: a signed atom id in the engine's aspif-style encoding
/// (negative means negated).
pub type Literal = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruthValue {
    True,
    False,
    Free,
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveResult {
    Satisfiable,
    Unsatisfiable,
    Unknown,
}

/// A `&tel`/`&del` theory atom occurrence surviving grounding, with its
/// single element term fully instantiated (no remaining variables). The
/// theory compiler resolves operator precedence and builds a
/// [`crate::theory::BodyFormula`] tree from `term` once per occurrence.
#[derive(Clone, Debug)]
pub struct GroundTheoryAtom {
    pub location: crate::ast::Location,
    pub step: i64,
    pub term: crate::ast::TheoryTerm,
}

/// Read access to the engine's symbol/literal table.
pub trait SymbolicAtoms {
    fn literal(&self, atom: &Symbol) -> Option<Literal>;
    fn is_external(&self, atom: &Symbol) -> bool;
    /// All known atoms matching `name/arity`, used to enumerate future
    /// signatures when building solve assumptions.
    fn by_signature(&self, name: &str, arity: usize) -> Vec<Symbol>;
}

/// A model returned by [`Control::solve`].
pub trait Model {
    fn contains(&self, symbol: &Symbol) -> bool;
    fn symbols(&self) -> Vec<Symbol>;
}

/// Low-level access to the ground program under construction, used by the
/// theory compiler to emit auxiliary clauses/rules that have no source-level
/// representation (equivalences between formula atoms, disjunctive
/// unfoldings of head formulas).
pub trait Backend {
    fn add_rule(&mut self, head: &[Literal], body: &[Literal]) -> Result<(), Error>;
    fn add_external(&mut self, literal: Literal, value: TruthValue) -> Result<(), Error>;
    /// A fresh auxiliary literal, not tied to any source-level atom.
    fn add_literal(&mut self) -> Result<Literal, Error>;
}

/// Ingests the rewritten statements produced by the program transformer,
/// once, before any grounding happens. Source-level statements (as opposed
/// to the auxiliary clauses the theory compiler emits through [`Backend`])
/// only ever flow through here.
pub trait ProgramBuilder {
    fn add(&mut self, statement: &crate::ast::Statement) -> Result<(), Error>;
}

/// The engine handle passed to [`crate::driver::imain`].
pub trait Control: ProgramBuilder {
    fn backend(&mut self) -> &mut dyn Backend;
    fn symbolic_atoms(&self) -> &dyn SymbolicAtoms;

    /// Grounds the named program parts with the given parameters, e.g.
    /// `[("always", vec![Symbol::Number(3)])]`.
    fn ground(&mut self, parts: &[(String, Vec<Symbol>)]) -> Result<(), Error>;

    fn release_external(&mut self, atom: &Symbol) -> Result<(), Error>;
    fn assign_external(&mut self, atom: &Symbol, value: TruthValue) -> Result<(), Error>;

    /// `&tel`/`&del` occurrences newly introduced by the last [`Control::ground`]
    /// call, each tagged with the step it was ground at.
    fn theory_atoms(&self) -> Vec<GroundTheoryAtom>;

    fn solve(
        &mut self,
        assumptions: &[Literal],
        on_model: &mut dyn FnMut(&dyn Model),
    ) -> Result<SolveResult, Error>;
}

/// A minimal in-memory [`Control`] used by integration tests. It tracks
/// ground rules/externals it was handed and always reports a model
/// satisfying every rule head's first literal, which is enough to exercise
/// the driver's bookkeeping without a real grounder behind it.
pub mod mock {
    use super::*;

    #[derive(Default)]
    pub struct MockBackend {
        pub rules: Vec<(Vec<Literal>, Vec<Literal>)>,
        pub externals: HashMap<Literal, TruthValue>,
        next_literal: Literal,
    }

    impl MockBackend {
        pub fn new() -> Self {
            MockBackend {
                rules: Vec::new(),
                externals: HashMap::new(),
                next_literal: 1,
            }
        }
    }

    impl Backend for MockBackend {
        fn add_rule(&mut self, head: &[Literal], body: &[Literal]) -> Result<(), Error> {
            self.rules.push((head.to_vec(), body.to_vec()));
            Ok(())
        }

        fn add_external(&mut self, literal: Literal, value: TruthValue) -> Result<(), Error> {
            self.externals.insert(literal, value);
            Ok(())
        }

        fn add_literal(&mut self) -> Result<Literal, Error> {
            self.next_literal += 1;
            Ok(self.next_literal)
        }
    }

    #[derive(Default)]
    pub struct MockSymbolicAtoms {
        pub table: HashMap<Symbol, Literal>,
        pub external: std::collections::HashSet<Symbol>,
    }

    impl SymbolicAtoms for MockSymbolicAtoms {
        fn literal(&self, atom: &Symbol) -> Option<Literal> {
            self.table.get(atom).copied()
        }

        fn is_external(&self, atom: &Symbol) -> bool {
            self.external.contains(atom)
        }

        fn by_signature(&self, name: &str, arity: usize) -> Vec<Symbol> {
            self.table
                .keys()
                .filter(|s| s.name() == Some(name) && s.args().len() == arity)
                .cloned()
                .collect()
        }
    }

    pub struct MockModel {
        pub true_atoms: std::collections::HashSet<Symbol>,
    }

    impl Model for MockModel {
        fn contains(&self, symbol: &Symbol) -> bool {
            self.true_atoms.contains(symbol)
        }

        fn symbols(&self) -> Vec<Symbol> {
            self.true_atoms.iter().cloned().collect()
        }
    }

    #[derive(Default)]
    pub struct MockControl {
        pub backend: MockBackend,
        pub atoms: MockSymbolicAtoms,
        pub grounded_parts: Vec<(String, Vec<Symbol>)>,
        pub assigned: HashMap<Symbol, TruthValue>,
        pub added: Vec<crate::ast::Statement>,
        /// Seeded by tests to stand in for what a real grounder would report
        /// through theory-atom introspection.
        pub theory_atoms: Vec<GroundTheoryAtom>,
    }

    impl MockControl {
        pub fn new() -> Self {
            MockControl {
                backend: MockBackend::new(),
                atoms: MockSymbolicAtoms::default(),
                grounded_parts: Vec::new(),
                assigned: HashMap::new(),
                added: Vec::new(),
                theory_atoms: Vec::new(),
            }
        }
    }

    impl ProgramBuilder for MockControl {
        fn add(&mut self, statement: &crate::ast::Statement) -> Result<(), Error> {
            self.added.push(statement.clone());
            Ok(())
        }
    }

    impl Control for MockControl {
        fn backend(&mut self) -> &mut dyn Backend {
            &mut self.backend
        }

        fn symbolic_atoms(&self) -> &dyn SymbolicAtoms {
            &self.atoms
        }

        fn ground(&mut self, parts: &[(String, Vec<Symbol>)]) -> Result<(), Error> {
            self.grounded_parts.extend_from_slice(parts);
            Ok(())
        }

        fn release_external(&mut self, atom: &Symbol) -> Result<(), Error> {
            self.assigned.remove(atom);
            Ok(())
        }

        fn assign_external(&mut self, atom: &Symbol, value: TruthValue) -> Result<(), Error> {
            self.assigned.insert(atom.clone(), value);
            Ok(())
        }

        fn theory_atoms(&self) -> Vec<GroundTheoryAtom> {
            self.theory_atoms.clone()
        }

        fn solve(
            &mut self,
            _assumptions: &[Literal],
            on_model: &mut dyn FnMut(&dyn Model),
        ) -> Result<SolveResult, Error> {
            let model = MockModel {
                true_atoms: std::collections::HashSet::new(),
            };
            on_model(&model);
            Ok(SolveResult::Satisfiable)
        }
    }

    /// Convenience constructor, used by tests to fail fast on an
    /// unrecognised mock configuration rather than silently no-op.
    pub fn require_signature(atoms: &MockSymbolicAtoms, name: &str, arity: usize) -> Result<(), Error> {
        if atoms.by_signature(name, arity).is_empty() {
            return Err(Error::without_location(ErrorKind::Parse(format!(
                "mock control has no atoms for {name}/{arity}"
            ))));
        }
        Ok(())
    }
}
