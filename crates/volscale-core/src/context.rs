//! Invocation context: what one run of the engine was asked to do.
//!
//! Adapters (CLI flags, scheduled messages, alert events) all
//! normalize into an `InvocationContext`; the engine consumes nothing
//! else. Contexts are immutable for the duration of an invocation.

use serde::{Deserialize, Serialize};

use crate::types::VolumeId;

/// Default check interval when none is configured, in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

/// Default safety margin when none is configured, in percent.
pub const DEFAULT_MARGIN_PERCENT: u32 = 20;

/// How the target size is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResizeMode {
    /// Project the worst-case write burst over the next
    /// `interval_minutes` and size the volume to absorb it.
    Dynamic { interval_minutes: u32 },
    /// Size the volume so a fixed percentage of the new allocation is
    /// free, independent of any timing assumption.
    Static,
}

impl ResizeMode {
    /// Map the raw interval selector used by adapters: absent means
    /// the platform default, `0` selects the static strategy, any
    /// positive value is a dynamic interval in minutes.
    pub fn from_interval_selector(selector: Option<u32>) -> Self {
        match selector {
            None => Self::Dynamic {
                interval_minutes: DEFAULT_INTERVAL_MINUTES,
            },
            Some(0) => Self::Static,
            Some(n) => Self::Dynamic {
                interval_minutes: n,
            },
        }
    }
}

/// Sizing strategy for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(flatten)]
    pub mode: ResizeMode,
    /// Safety percentage added on top of the computed target.
    /// Must be in `[0, 100)`; validated by the engine before any I/O.
    pub margin_percent: u32,
    /// When set, targets are computed and reported but never applied.
    pub dry_run: bool,
}

/// Which volumes one invocation considers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSet {
    /// Every volume in the project (scheduled sweeps, CLI).
    Project(String),
    /// Exactly one volume (alert events).
    Volume(VolumeId),
}

/// Normalized invocation: candidate set plus sizing strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub candidates: CandidateSet,
    pub strategy: StrategyConfig,
}

impl InvocationContext {
    /// Context for a project-wide sweep (scheduled or CLI-triggered).
    pub fn sweep(
        project: impl Into<String>,
        interval_selector: Option<u32>,
        margin_percent: Option<u32>,
        dry_run: bool,
    ) -> Self {
        Self {
            candidates: CandidateSet::Project(project.into()),
            strategy: StrategyConfig {
                mode: ResizeMode::from_interval_selector(interval_selector),
                margin_percent: margin_percent.unwrap_or(DEFAULT_MARGIN_PERCENT),
                dry_run,
            },
        }
    }

    /// Context for a single-volume alert invocation.
    ///
    /// Alerts carry no timing guarantee, so the strategy is forced to
    /// static here regardless of any configured interval. This is a
    /// policy rule, not a default an adapter may override.
    pub fn alert(volume: VolumeId, margin_percent: Option<u32>, dry_run: bool) -> Self {
        Self {
            candidates: CandidateSet::Volume(volume),
            strategy: StrategyConfig {
                mode: ResizeMode::Static,
                margin_percent: margin_percent.unwrap_or(DEFAULT_MARGIN_PERCENT),
                dry_run,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_selector_mapping() {
        assert_eq!(
            ResizeMode::from_interval_selector(None),
            ResizeMode::Dynamic {
                interval_minutes: 60
            }
        );
        assert_eq!(ResizeMode::from_interval_selector(Some(0)), ResizeMode::Static);
        assert_eq!(
            ResizeMode::from_interval_selector(Some(15)),
            ResizeMode::Dynamic {
                interval_minutes: 15
            }
        );
    }

    #[test]
    fn alert_context_always_static() {
        let ctx = InvocationContext::alert(VolumeId::new("us-east4", "v-1"), None, false);
        assert_eq!(ctx.strategy.mode, ResizeMode::Static);
        assert_eq!(ctx.strategy.margin_percent, DEFAULT_MARGIN_PERCENT);
    }

    #[test]
    fn sweep_context_defaults() {
        let ctx = InvocationContext::sweep("my-project", None, None, true);
        assert_eq!(
            ctx.strategy.mode,
            ResizeMode::Dynamic {
                interval_minutes: 60
            }
        );
        assert!(ctx.strategy.dry_run);
        assert_eq!(
            ctx.candidates,
            CandidateSet::Project("my-project".to_string())
        );
    }
}
