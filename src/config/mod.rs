/*!
Configuration of the incremental driver.

Mirrors the three `--const`s the original incremental main loop reads
(`imin`, `imax`, `istop`), plus nothing else: heuristics, restarts, and the
like belong to the host engine, not this crate.
*/

mod istop;
pub use istop::StopCriterion;

/// The primary configuration structure, consumed by [`crate::driver::imain`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Minimum number of iterations (states) before `istop` is consulted.
    pub imin: u32,

    /// Maximum number of iterations (states). `None` means unbounded.
    pub imax: Option<u32>,

    /// When to stop extending the horizon.
    pub istop: StopCriterion,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            imin: 0,
            imax: None,
            istop: StopCriterion::default(),
        }
    }
}
