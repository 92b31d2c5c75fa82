//! Legacy positional calling convention.
//!
//! The original interface took a weakly-typed argument list and decided
//! between synchronous and asynchronous delivery by looking for a callback
//! among the positions. [`classify`] performs that shape-sniffing once, up
//! front, so the rest of the crate only ever deals with a validated
//! [`ParamRequest`] and an explicit [`Mode`].

use std::fmt;

use crate::dispatch::ParamsCallback;
use crate::error::PickError;
use crate::request::{MAXMEM_DEFAULT, MAXMEMFRAC_DEFAULT, ParamRequest};

/// One positional argument.
pub enum Arg {
    Num(f64),
    Str(String),
    Bool(bool),
    Callback(ParamsCallback),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Num(n) => f.debug_tuple("Num").field(n).finish(),
            Arg::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Arg::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Arg::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// How the outcome of a request gets delivered. Decided once per request.
pub enum Mode {
    Sync,
    Async(ParamsCallback),
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sync => f.write_str("Sync"),
            Mode::Async(_) => f.write_str("Async"),
        }
    }
}

/// Classifies a positional argument list into a request and a delivery mode.
///
/// Positions are fixed: maxtime, then maxmemfrac, then maxmem. A callback at
/// any position after the first switches the call to asynchronous delivery
/// and ends the scan; everything after it is ignored. Trailing non-callback
/// arguments past maxmem are also ignored, never validated. Non-positive
/// maxmemfrac and negative maxmem silently fall back to their defaults;
/// only a missing, non-numeric, or non-positive maxtime is an error.
pub fn classify(args: Vec<Arg>) -> Result<(ParamRequest, Mode), PickError> {
    if args.is_empty() {
        return Err(PickError::InvalidArguments(
            "wrong number of arguments: at least one argument is needed - the maxtime".to_string(),
        ));
    }
    if matches!(args[0], Arg::Callback(_)) {
        return Err(PickError::InvalidArguments(
            "wrong number of arguments: at least one argument is needed before the callback - the maxtime"
                .to_string(),
        ));
    }

    let mut maxtime = 0.0;
    let mut maxmemfrac = MAXMEMFRAC_DEFAULT;
    let mut maxmem = MAXMEM_DEFAULT;
    let mut callback = None;

    for (i, arg) in args.into_iter().enumerate() {
        let arg = match arg {
            Arg::Callback(cb) if i > 0 => {
                callback = Some(cb);
                break;
            }
            arg => arg,
        };

        match i {
            0 => match arg {
                Arg::Num(t) if t > 0.0 => maxtime = t,
                Arg::Num(_) => {
                    return Err(PickError::InvalidArguments(
                        "maxtime must be greater than 0".to_string(),
                    ));
                }
                _ => {
                    return Err(PickError::InvalidArguments(
                        "maxtime argument must be a number".to_string(),
                    ));
                }
            },
            1 => match arg {
                Arg::Num(f) => {
                    if f > 0.0 {
                        maxmemfrac = f;
                    }
                }
                _ => {
                    return Err(PickError::InvalidArguments(
                        "maxmemfrac argument must be a number".to_string(),
                    ));
                }
            },
            2 => match arg {
                Arg::Num(m) => {
                    if m >= 0.0 {
                        maxmem = m as u64;
                    }
                }
                _ => {
                    return Err(PickError::InvalidArguments(
                        "maxmem argument must be a number".to_string(),
                    ));
                }
            },
            // Anything past maxmem that is not a callback is tolerated.
            _ => {}
        }
    }

    let req = ParamRequest::new(maxtime, maxmemfrac, maxmem)?;
    let mode = match callback {
        Some(cb) => Mode::Async(cb),
        None => Mode::Sync,
    };
    Ok((req, mode))
}
