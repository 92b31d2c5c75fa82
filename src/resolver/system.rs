//! The default resolver: probe the machine, then run the classic search.
//!
//! Follows the reference scrypt parameter search: derive a memory limit from
//! system memory, benchmark salsa20/8 core throughput, then split on whether
//! the CPU or the memory budget is the binding constraint.

use std::time::{Duration, Instant};

use log::debug;
use scrypt::{Params, scrypt};
use sysinfo::System;

use super::{ErrorCode, Resolver};
use crate::request::CostParams;

/// Floor for the operations budget, matching the reference search.
const MIN_OPS: u64 = 32768;
/// Block size is fixed at r = 8 by the reference search.
const BLOCK_R: u32 = 8;
/// Smallest memory limit the search will plan around (1 MiB).
const MIN_MEMLIMIT: u64 = 1024 * 1024;
/// Minimum wall-clock span of the throughput probe.
const PROBE_TARGET: Duration = Duration::from_millis(10);
/// log2(N) used for the throughput probe runs.
const PROBE_LOG_N: u8 = 9;

/// Picks parameters against the memory and CPU actually present.
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve(&self, maxmem: u64, maxmemfrac: f64, maxtime: f64) -> Result<CostParams, ErrorCode> {
        let memlimit = memory_budget(maxmem, maxmemfrac)?;
        let opps = salsa_ops_per_sec()?;
        debug!("memory limit {memlimit} bytes, {opps:.0} salsa20/8 cores per second");
        Ok(pick(memlimit, opps, maxtime))
    }
}

/// How many bytes the picked parameters may require.
///
/// Fractions above 0.5 are clamped so a single scrypt call can never plan for
/// more than half of system memory, and the limit never drops below 1 MiB.
/// A nonzero `maxmem` caps the result.
fn memory_budget(maxmem: u64, maxmemfrac: f64) -> Result<u64, ErrorCode> {
    let mut sys = System::new();
    sys.refresh_memory();
    let total = sys.total_memory();
    if total == 0 {
        return Err(ErrorCode::MemoryProbe);
    }

    let frac = if maxmemfrac.is_nan() || maxmemfrac <= 0.0 || maxmemfrac > 0.5 {
        0.5
    } else {
        maxmemfrac
    };

    let mut limit = (total as f64 * frac) as u64;
    if maxmem > 0 && limit > maxmem {
        limit = maxmem;
    }
    Ok(limit.max(MIN_MEMLIMIT))
}

/// Benchmarks salsa20/8 core throughput by timing small scrypt calls.
///
/// One scrypt call at (N = 2^PROBE_LOG_N, r = 1, p = 1) runs 4 * N salsa20/8
/// cores; calls repeat until at least PROBE_TARGET has elapsed.
fn salsa_ops_per_sec() -> Result<f64, ErrorCode> {
    let params = Params::new(PROBE_LOG_N, 1, 1, 32).map_err(|_| ErrorCode::KdfProbe)?;
    let cores_per_call = 4 * (1u64 << PROBE_LOG_N);

    let mut out = [0u8; 32];
    let start = Instant::now();
    let mut calls = 0u64;
    loop {
        scrypt(b"", b"", &params, &mut out).map_err(|_| ErrorCode::KdfProbe)?;
        calls += 1;

        let elapsed = start.elapsed();
        if elapsed >= PROBE_TARGET {
            let secs = elapsed.as_secs_f64();
            if secs <= 0.0 {
                return Err(ErrorCode::ClockProbe);
            }
            return Ok((calls * cores_per_call) as f64 / secs);
        }
    }
}

/// The search proper, pure in its probed inputs.
///
/// The memory limit requires 128 * N * r <= memlimit and the CPU limit
/// requires 4 * N * r * p <= opslimit. When opslimit < memlimit / 32 the
/// CPU budget binds N; otherwise memory binds N and the leftover CPU budget
/// goes into p.
fn pick(memlimit: u64, opps: f64, maxtime: f64) -> CostParams {
    let opslimit = ((opps * maxtime) as u64).max(MIN_OPS);
    let r = BLOCK_R;

    if opslimit < memlimit / 32 {
        let max_n = opslimit / (u64::from(r) * 4);
        CostParams::new(1u64 << log2_for(max_n), r, 1)
    } else {
        let max_n = memlimit / (u64::from(r) * 128);
        let log_n = log2_for(max_n);

        let max_rp = ((opslimit / 4) >> log_n).min(0x3fff_ffff);
        let p = ((max_rp / u64::from(r)) as u32).max(1);
        CostParams::new(1u64 << log_n, r, p)
    }
}

// Largest power of two N with N <= max_n, expressed as its exponent.
fn log2_for(max_n: u64) -> u32 {
    let mut log_n = 1;
    while log_n < 63 {
        if (1u64 << log_n) > max_n / 2 {
            break;
        }
        log_n += 1;
    }
    log_n
}
