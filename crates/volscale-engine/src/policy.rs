//! Sizing policy: pure computation of a volume's target allocation.
//!
//! No I/O and no side effects; the decision engine owns all
//! mutation. Two strategies:
//!
//! - **Dynamic**: size the volume so it cannot run out of space
//!   before the next scheduled run, assuming worst-case sustained
//!   writes. The platform grants write throughput proportional to the
//!   allocation (per-level rate, per-level ceiling), so below the
//!   ceiling the resize itself speeds up the fill rate and the
//!   projection is a fixed point, not a single multiplication.
//! - **Static**: size the volume so a fixed percentage of the new
//!   allocation is free immediately, independent of any timing
//!   assumption. Used for alert-triggered invocations.
//!
//! Both strategies never shrink and clamp to the platform's maximum
//! volume size (clamp-to-max is deliberate, not inherited behavior).

use volscale_core::{MAX_VOLUME_SIZE, ResizeMode, ServiceLevel, StrategyConfig, VolumeSnapshot};

use crate::error::{EngineError, EngineResult};

/// Check a strategy before any volume is fetched.
pub fn validate(strategy: &StrategyConfig) -> EngineResult<()> {
    if strategy.margin_percent >= 100 {
        return Err(EngineError::Configuration(format!(
            "margin_percent must be in [0, 100), got {}",
            strategy.margin_percent
        )));
    }
    if let ResizeMode::Dynamic {
        interval_minutes: 0,
    } = strategy.mode
    {
        return Err(EngineError::Configuration(
            "dynamic interval must be at least one minute".to_string(),
        ));
    }
    Ok(())
}

/// Proposed allocation in bytes for one volume under one strategy.
///
/// The result never lies below the current allocation and never above
/// [`MAX_VOLUME_SIZE`]. Recomputing with unchanged usage reproduces
/// the same target, so a second run right after a resize proposes no
/// further growth.
pub fn compute_target(snapshot: &VolumeSnapshot, strategy: &StrategyConfig) -> EngineResult<u64> {
    validate(strategy)?;
    let target = match strategy.mode {
        ResizeMode::Dynamic { interval_minutes } => dynamic_target(
            snapshot.used_bytes,
            snapshot.service_level,
            interval_minutes,
            strategy.margin_percent,
        ),
        ResizeMode::Static => static_target(snapshot.used_bytes, strategy.margin_percent),
    };
    Ok(target.max(snapshot.allocated_bytes))
}

fn dynamic_target(
    used_bytes: u64,
    level: ServiceLevel,
    interval_minutes: u32,
    margin_percent: u32,
) -> u64 {
    let used = used_bytes as u128;
    let interval = interval_minutes as u128;
    let factor = 100 + margin_percent as u128;
    let k = level.write_rate_kib_per_sec_per_gib() as u128;

    // Below the ceiling, rate(s) = s * k * 60 / 2^20 bytes/min and
    // the target solves T = (used + rate(T) * interval) * factor/100.
    // With num/den = rate-share of T written per interval (margin
    // included), the closed form is T = used * factor * den /
    // (100 * (den - num)); it only exists when num < den, i.e. the
    // volume cannot outrun its own growth.
    let den: u128 = 100 << 20;
    let num = k * 60 * interval * factor;
    let ceiling = level.write_rate_ceiling_bytes_per_sec() as u128;
    if num < den {
        let target = used * factor * den / (100 * (den - num));
        // The linear rate only holds up to the size where the
        // per-level ceiling kicks in.
        let saturation_size = ceiling * (1 << 20) / k;
        if target <= saturation_size {
            return clamp(target);
        }
    }
    // At (or past) the ceiling the rate is size-independent.
    clamp(projected_target(used, ceiling * 60, interval, factor))
}

/// Size-independent projection: worst-case writes over the interval
/// on top of current usage, inflated by the margin factor (percent,
/// e.g. 110 for a 10% margin).
fn projected_target(used: u128, rate_bytes_per_min: u128, interval: u128, factor: u128) -> u128 {
    (used + rate_bytes_per_min * interval) * factor / 100
}

fn static_target(used_bytes: u64, margin_percent: u32) -> u64 {
    clamp(used_bytes as u128 * 100 / (100 - margin_percent) as u128)
}

fn clamp(target: u128) -> u64 {
    target.min(MAX_VOLUME_SIZE as u128) as u64
}
