use std::path::PathBuf;

use clap::{value_parser, Arg, Command};

use telingo_rs::config::{Config, StopCriterion};

pub fn cli() -> Command {
    Command::new("telingo_rs")
        .about("Incremental grounding and solving of temporal and dynamic logic programs")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("paths")
                .required(false)
                .trailing_var_arg(true)
                .num_args(0..)
                .value_parser(value_parser!(PathBuf))
                .help("Input program files. With none given, reads standard input."),
        )
        .arg(
            Arg::new("imin")
                .long("imin")
                .value_parser(value_parser!(u32))
                .required(false)
                .num_args(1)
                .help("Minimum number of steps before --istop is consulted. Default: 0"),
        )
        .arg(
            Arg::new("imax")
                .long("imax")
                .value_parser(value_parser!(u32))
                .required(false)
                .num_args(1)
                .help("Maximum number of steps. Default: unbounded"),
        )
        .arg(
            Arg::new("istop")
                .long("istop")
                .value_parser(value_parser!(StopCriterion))
                .required(false)
                .num_args(1)
                .help("Stop as soon as a step's result matches {sat|unsat|unknown}. Default: sat"),
        )
}

/// Extracts a [`Config`] and the requested input paths from parsed
/// arguments. An empty path list means "read standard input".
pub fn config_from_matches(matches: &clap::ArgMatches) -> (Config, Vec<PathBuf>) {
    let mut cfg = Config::default();

    if let Some(&imin) = matches.get_one::<u32>("imin") {
        cfg.imin = imin;
    }
    if let Some(&imax) = matches.get_one::<u32>("imax") {
        cfg.imax = Some(imax);
    }
    if let Some(&istop) = matches.get_one::<StopCriterion>("istop") {
        cfg.istop = istop;
    }

    let paths = matches
        .get_many::<PathBuf>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    (cfg, paths)
}

impl clap::builder::ValueParserFactory for StopCriterion {
    type Parser = clap::builder::ValueParser;

    fn value_parser() -> Self::Parser {
        clap::builder::ValueParser::new(|s: &str| {
            s.parse::<StopCriterion>()
                .map_err(|_| format!("invalid --istop value: {s} (expected sat, unsat, or unknown)"))
        })
    }
}
