//! Cost parameter search.
//!
//! The search itself sits behind the [`Resolver`] trait so executors (and
//! tests) stay independent of how parameters are actually found. The default
//! implementation is [`SystemResolver`].

pub mod system;

pub use system::SystemResolver;

use std::fmt;

use crate::request::CostParams;

/// Picks scrypt cost parameters satisfying the given budgets.
///
/// `maxmem` is a byte cap (0 means uncapped), `maxmemfrac` the fraction of
/// system memory the parameters may plan around, and `maxtime` the wall-clock
/// budget in seconds for one scrypt call at the picked parameters.
pub trait Resolver: Send + Sync {
    fn resolve(&self, maxmem: u64, maxmemfrac: f64, maxtime: f64) -> Result<CostParams, ErrorCode>;
}

/// Reasons a resolver can fail to produce parameters.
///
/// Each code has exactly one fixed human-readable description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Could not determine how much memory the system has.
    MemoryProbe,
    /// Could not take a usable timing measurement.
    ClockProbe,
    /// The throughput probe's key derivation failed.
    KdfProbe,
}

impl ErrorCode {
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorCode::MemoryProbe => "getrlimit or sysctl(hw.usermem) failed",
            ErrorCode::ClockProbe => "clock_getres or clock_gettime failed",
            ErrorCode::KdfProbe => "error computing derived key",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_message_per_code() {
        let codes = [
            ErrorCode::MemoryProbe,
            ErrorCode::ClockProbe,
            ErrorCode::KdfProbe,
        ];
        let mut messages: Vec<&str> = codes.iter().map(|c| c.describe()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), codes.len());
        assert_eq!(
            ErrorCode::MemoryProbe.to_string(),
            "getrlimit or sysctl(hw.usermem) failed"
        );
    }
}
