/*!
Incremental grounding and solving of temporal and dynamic logic programs on
top of an external ASP engine.

This crate implements the source-to-source and ground-time transformations
`telingo` applies to turn a program written with temporal/dynamic
theory atoms (`&tel{...}`, `&del{...}`) into an ordinary ASP program that a
host engine can ground and solve incrementally, one time step at a time. It
does not parse, ground, or solve anything itself: those are the job of a
host engine reached only through the [`host`] traits, which keeps the
temporal/dynamic logic machinery free of any one engine's concrete types.

# Orientation

A run goes through the pipeline implemented by these modules, leaves first:

- [`ast`] — the parsed program shapes this crate consumes (rules, literals,
  theory atoms) and the operator-precedence resolver shared by the theory
  grammar.
- [`shift`] and [`term_transformer`] — the prime/underscore shorthand for
  time shifts (`p'`, `_p`), rewriting bare literals into an explicit time
  argument.
- [`program_transformer`] — classifies rules into `initial`/`always`/
  `dynamic` parts and folds a family of shifted head atoms into a
  disjunction (see [`program_transformer::head`]).
- [`theory`] — hash-conses temporal/dynamic body formulas into an arena and
  compiles them into clauses on the host's backend, one step at a time (see
  [`theory::body`] and [`theory::construct`]).
- [`interval`] — a merging set of half-open integer ranges, used when
  folding shifted head atoms.
- [`driver`] — the incremental step loop (`imain`): ground, translate,
  solve, extend the horizon, repeat until a stop condition is met.
- [`config`] — `imin`/`imax`/`istop`, read by the driver.
- [`host`] — the consumed interface to the host engine, plus an in-memory
  [`host::mock`] implementation used by this crate's own tests.

# Logs

Calls to [log!](log) are made throughout, gated by module-scoped targets
(`"driver"`, and the module paths of the theory/program transformers) so a
consumer can filter with `RUST_LOG=driver=debug`. As in the teacher this
crate is built on, no log implementation is provided — plug in
[env_logger](https://docs.rs/env_logger/latest/env_logger/) or similar.
*/

pub mod ast;
pub mod config;
pub mod driver;
pub mod host;
pub mod interval;
pub mod program_transformer;
pub mod shift;
pub mod term_transformer;
pub mod theory;
pub mod types;
