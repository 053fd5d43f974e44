/*!
A thin CLI front-end.

# Use

```sh
telingo_cli [--imin=<n>] [--imax=<n>] [--istop=<sat|unsat|unknown>] [file.lp]...
```

With no paths given, the program text is read from standard input.

This binary wires arguments to a `telingo_rs::config::Config` and hands the
read source text to a host ASP engine. Parsing that text into ground rules,
and grounding/solving it, is the host's job: the library only transforms the
already-parsed program and drives the step loop once a
`telingo_rs::host::Control` is available. A standalone binary has no such
engine linked in, so it stops once the configuration and input are in hand.
*/

mod config;
use config::{cli, config_from_matches};

use std::io::Read;

fn read_input(paths: &[std::path::PathBuf]) -> std::io::Result<String> {
    if paths.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    let mut buf = String::new();
    for path in paths {
        buf.push_str(&std::fs::read_to_string(path)?);
        buf.push('\n');
    }
    Ok(buf)
}

fn main() {
    let matches = cli().get_matches();
    let (cfg, paths) = config_from_matches(&matches);

    let source = match read_input(&paths) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error reading input: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "read {} bytes of source, imin={} imax={:?} istop={}",
        source.len(),
        cfg.imin,
        cfg.imax,
        cfg.istop
    );

    eprintln!(
        "telingo_rs: parsed configuration (imin={}, imax={:?}, istop={}) and {} bytes of input; \
         no host ASP engine is linked into this binary, so there is nothing further to run. \
         Embed this crate's driver::imain against a concrete host::Control to solve.",
        cfg.imin,
        cfg.imax,
        cfg.istop,
        source.len(),
    );
}
