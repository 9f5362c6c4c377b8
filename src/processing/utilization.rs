//! Utilization of prefixes and ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage of a block's capacity taken by its stored children.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Utilization {
    /// Always within `0.0..=100.0`.
    pub percent: f64,
    /// Forced to 100% by the `mark_utilized` flag.
    pub mark_utilized: bool,
}

impl Utilization {
    /// Utilization for `covered` addresses out of `capacity`.
    ///
    /// Coverage above capacity is capped, so the result never exceeds 100.
    pub fn compute(covered: u128, capacity: u128, mark_utilized: bool) -> Utilization {
        if mark_utilized {
            return Utilization {
                percent: 100.0,
                mark_utilized,
            };
        }
        let percent = if capacity == 0 {
            0.0
        } else if covered >= capacity {
            100.0
        } else {
            (covered as f64 / capacity as f64 * 100.0).clamp(0.0, 100.0)
        };
        Utilization {
            percent,
            mark_utilized,
        }
    }

    /// Coloring level for the utilization bar.
    ///
    /// Prefixes marked as utilized never get warning or danger coloring.
    pub fn level(&self, thresholds: &Thresholds) -> UtilizationLevel {
        if self.mark_utilized {
            UtilizationLevel::Normal
        } else if self.percent >= thresholds.danger {
            UtilizationLevel::Danger
        } else if self.percent >= thresholds.warning {
            UtilizationLevel::Warning
        } else {
            UtilizationLevel::Normal
        }
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent.floor())
    }
}

/// Warning and danger thresholds, in percent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warning: f64,
    pub danger: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            warning: 75.0,
            danger: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationLevel {
    Normal,
    Warning,
    Danger,
}
