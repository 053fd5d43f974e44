/*!
The prime/underscore shorthand for time shifts on a predicate name, shared
by the term transformer (rewriting bare literals like `p'(X)` at the AST
level) and the theory compiler (rewriting atoms nested inside a `&tel`/
`&del` formula at the ground-symbol level).

A trailing prime is one step in the future, a leading prime one step in
the past; the net shift is `trailing_count - leading_count`, so `'p'` (one
of each) is shift 0, `''p` is -2, `p''` is +2. `_p` is pinned to the
initial state; `p_` would be pinned to the final state but that direction
is not yet supported (see [`crate::types::err::ErrorKind::FinallyNotSupported`]).
The two underscore forms cannot be combined with each other or with
primes.
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    Initial,
    Relative(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftError {
    InitiallyAndFinallyCombined,
    PrimeWithInitiallyOrFinally,
    FinallyNotSupported,
}

pub fn split_shifted_name(name: &str) -> Result<(String, Shift), ShiftError> {
    let leading_underscore = name.starts_with('_');
    let mut core = if leading_underscore { &name[1..] } else { name };

    let trailing_underscore = core.ends_with('_') && !core.ends_with("__");
    if trailing_underscore {
        core = &core[..core.len() - 1];
    }

    let leading_primes = core.chars().take_while(|c| *c == '\'').count();
    let core = &core[leading_primes..];
    let trailing_primes = core.chars().rev().take_while(|c| *c == '\'').count();
    let core = &core[..core.len() - trailing_primes];

    if leading_underscore && trailing_underscore {
        return Err(ShiftError::InitiallyAndFinallyCombined);
    }
    if (leading_primes > 0 || trailing_primes > 0) && (leading_underscore || trailing_underscore) {
        return Err(ShiftError::PrimeWithInitiallyOrFinally);
    }
    if trailing_underscore {
        return Err(ShiftError::FinallyNotSupported);
    }

    if leading_underscore {
        Ok((core.to_string(), Shift::Initial))
    } else {
        Ok((
            core.to_string(),
            Shift::Relative(trailing_primes as i64 - leading_primes as i64),
        ))
    }
}
