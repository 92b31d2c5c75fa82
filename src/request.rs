//! Validated budgets going into a pick, and the cost triple coming out.

use serde::Serialize;

use crate::error::PickError;

/// Default cap on memory use, in bytes. Zero means no explicit cap.
pub const MAXMEM_DEFAULT: u64 = 0;
/// Default fraction of system memory the search may plan around.
pub const MAXMEMFRAC_DEFAULT: f64 = 0.5;

/// Budgets for a parameter pick.
///
/// A `ParamRequest` is always fully populated: construction validates
/// `maxtime` and substitutes defaults for the optional budgets, so an
/// executor never sees a partially valid request.
#[derive(Debug, Clone, Copy)]
pub struct ParamRequest {
    maxtime: f64,
    maxmemfrac: f64,
    maxmem: u64,
}

impl ParamRequest {
    pub fn new(maxtime: f64, maxmemfrac: f64, maxmem: u64) -> Result<Self, PickError> {
        if maxtime.is_nan() || maxtime <= 0.0 {
            return Err(PickError::InvalidArguments(
                "maxtime must be greater than 0".to_string(),
            ));
        }

        // Non-positive fractions fall back to the default rather than erroring.
        let maxmemfrac = if maxmemfrac <= 0.0 {
            MAXMEMFRAC_DEFAULT
        } else {
            maxmemfrac
        };

        Ok(Self {
            maxtime,
            maxmemfrac,
            maxmem,
        })
    }

    /// A request with default memory budgets and the given time budget.
    pub fn with_maxtime(maxtime: f64) -> Result<Self, PickError> {
        Self::new(maxtime, MAXMEMFRAC_DEFAULT, MAXMEM_DEFAULT)
    }

    pub fn maxtime(&self) -> f64 {
        self.maxtime
    }

    pub fn maxmemfrac(&self) -> f64 {
        self.maxmemfrac
    }

    pub fn maxmem(&self) -> u64 {
        self.maxmem
    }
}

/// Scrypt cost parameters picked for a request.
///
/// Serializes to exactly `{"N": .., "r": .., "p": ..}` in that key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostParams {
    #[serde(rename = "N")]
    n: u64,
    r: u32,
    p: u32,
}

impl CostParams {
    pub fn new(n: u64, r: u32, p: u32) -> Self {
        Self { n, r, p }
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    /// Encodes the triple as a JSON object with keys `N`, `r`, `p`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "N": self.n,
            "r": self.r,
            "p": self.p,
        })
    }
}
