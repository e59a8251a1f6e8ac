//! Physiological thresholds used by the insight rules and status colors
//!
//! The `pub const` items are the published defaults. Code never reads them
//! directly: it takes a [`Thresholds`] value, which defaults to these numbers
//! and can be overridden from the config file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recovery zone cut-points (recovery score, %)
pub const RECOVERY_GREEN: f64 = 67.0;
pub const RECOVERY_YELLOW: f64 = 34.0;

/// Sleep performance cut-points (%)
pub const SLEEP_PERF_GREEN: f64 = 85.0;
pub const SLEEP_PERF_YELLOW: f64 = 70.0;

/// Sleep efficiency target (%)
pub const SLEEP_EFFICIENCY_TARGET: f64 = 85.0;

/// HRV deviation multipliers relative to the rolling baseline
pub const HRV_LOW_MULTIPLIER: f64 = 0.8;
pub const HRV_HIGH_MULTIPLIER: f64 = 1.1;

/// Number of most recent recoveries that form the HRV baseline
pub const HRV_BASELINE_WINDOW: usize = 7;

/// Minimum REM share of actual sleep (%)
pub const REM_SLEEP_MIN_PCT: f64 = 15.0;

/// Sleep debt thresholds (hours)
pub const SLEEP_DEBT_CRITICAL: f64 = 2.0;
pub const SLEEP_DEBT_WARNING: f64 = 1.0;

/// Optimal day strain by recovery zone
pub const STRAIN_OPTIMAL_GREEN: f64 = 14.0;
pub const STRAIN_OPTIMAL_YELLOW: f64 = 10.0;
pub const STRAIN_OPTIMAL_RED: f64 = 6.0;

/// Strain deviation that triggers an insight
pub const STRAIN_TOLERANCE: f64 = 2.0;

/// Strain deviation band for display colors only
pub const STRAIN_COLOR_TOLERANCE: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryThresholds {
    pub green: f64,
    pub yellow: f64,
}

impl Default for RecoveryThresholds {
    fn default() -> Self {
        Self {
            green: RECOVERY_GREEN,
            yellow: RECOVERY_YELLOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepThresholds {
    pub performance_green: f64,
    pub performance_yellow: f64,
    pub efficiency_target: f64,
    pub rem_min_pct: f64,
    pub debt_critical_hours: f64,
    pub debt_warning_hours: f64,
}

impl Default for SleepThresholds {
    fn default() -> Self {
        Self {
            performance_green: SLEEP_PERF_GREEN,
            performance_yellow: SLEEP_PERF_YELLOW,
            efficiency_target: SLEEP_EFFICIENCY_TARGET,
            rem_min_pct: REM_SLEEP_MIN_PCT,
            debt_critical_hours: SLEEP_DEBT_CRITICAL,
            debt_warning_hours: SLEEP_DEBT_WARNING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrvThresholds {
    pub low_multiplier: f64,
    pub high_multiplier: f64,
    pub baseline_window: usize,
}

impl Default for HrvThresholds {
    fn default() -> Self {
        Self {
            low_multiplier: HRV_LOW_MULTIPLIER,
            high_multiplier: HRV_HIGH_MULTIPLIER,
            baseline_window: HRV_BASELINE_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrainThresholds {
    pub optimal_green: f64,
    pub optimal_yellow: f64,
    pub optimal_red: f64,
    pub tolerance: f64,
    pub color_tolerance: f64,
}

impl Default for StrainThresholds {
    fn default() -> Self {
        Self {
            optimal_green: STRAIN_OPTIMAL_GREEN,
            optimal_yellow: STRAIN_OPTIMAL_YELLOW,
            optimal_red: STRAIN_OPTIMAL_RED,
            tolerance: STRAIN_TOLERANCE,
            color_tolerance: STRAIN_COLOR_TOLERANCE,
        }
    }
}

/// Complete threshold table handed to the insight generator and renderers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default)]
    pub recovery: RecoveryThresholds,
    #[serde(default)]
    pub sleep: SleepThresholds,
    #[serde(default)]
    pub hrv: HrvThresholds,
    #[serde(default)]
    pub strain: StrainThresholds,
}

/// Recovery zone derived from a recovery score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryZone {
    Green,
    Yellow,
    Red,
}

impl RecoveryZone {
    /// Green at or above `green`, yellow at or above `yellow`, red below
    pub fn from_score(score: f64, thresholds: &RecoveryThresholds) -> Self {
        if score >= thresholds.green {
            RecoveryZone::Green
        } else if score >= thresholds.yellow {
            RecoveryZone::Yellow
        } else {
            RecoveryZone::Red
        }
    }

    /// Target day strain for this zone
    pub fn optimal_strain(&self, thresholds: &StrainThresholds) -> f64 {
        match self {
            RecoveryZone::Green => thresholds.optimal_green,
            RecoveryZone::Yellow => thresholds.optimal_yellow,
            RecoveryZone::Red => thresholds.optimal_red,
        }
    }

    pub fn status(&self) -> StatusColor {
        match self {
            RecoveryZone::Green => StatusColor::Green,
            RecoveryZone::Yellow => StatusColor::Yellow,
            RecoveryZone::Red => StatusColor::Red,
        }
    }
}

impl fmt::Display for RecoveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryZone::Green => write!(f, "Green"),
            RecoveryZone::Yellow => write!(f, "Yellow"),
            RecoveryZone::Red => write!(f, "Red"),
        }
    }
}

/// Traffic-light bucket used by the renderers and chart series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    /// Higher is better: `value >= green` is green, `value >= yellow` yellow
    pub fn from_cutpoints(value: f64, green: f64, yellow: f64) -> Self {
        if value >= green {
            StatusColor::Green
        } else if value >= yellow {
            StatusColor::Yellow
        } else {
            StatusColor::Red
        }
    }

    /// Lower is better: `value <= green` is green, `value <= yellow` yellow
    pub fn from_cutpoints_inverted(value: f64, green: f64, yellow: f64) -> Self {
        if value <= green {
            StatusColor::Green
        } else if value <= yellow {
            StatusColor::Yellow
        } else {
            StatusColor::Red
        }
    }

    pub fn for_recovery(score: f64, thresholds: &RecoveryThresholds) -> Self {
        Self::from_cutpoints(score, thresholds.green, thresholds.yellow)
    }

    pub fn for_sleep_performance(performance: f64, thresholds: &SleepThresholds) -> Self {
        Self::from_cutpoints(
            performance,
            thresholds.performance_green,
            thresholds.performance_yellow,
        )
    }

    /// Distance from the optimal strain, bucketed by the two tolerance bands
    pub fn for_strain(strain: f64, optimal: f64, thresholds: &StrainThresholds) -> Self {
        Self::from_cutpoints_inverted(
            (strain - optimal).abs(),
            thresholds.tolerance,
            thresholds.color_tolerance,
        )
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StatusColor::Green => "🟢",
            StatusColor::Yellow => "🟡",
            StatusColor::Red => "🔴",
        }
    }

    /// Hex color used by chart series
    pub fn hex(&self) -> &'static str {
        match self {
            StatusColor::Green => "#34d399",
            StatusColor::Yellow => "#fbbf24",
            StatusColor::Red => "#f87171",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_zone_boundaries() {
        let t = RecoveryThresholds::default();
        assert_eq!(RecoveryZone::from_score(67.0, &t), RecoveryZone::Green);
        assert_eq!(RecoveryZone::from_score(66.9, &t), RecoveryZone::Yellow);
        assert_eq!(RecoveryZone::from_score(34.0, &t), RecoveryZone::Yellow);
        assert_eq!(RecoveryZone::from_score(33.0, &t), RecoveryZone::Red);
    }

    #[test]
    fn test_optimal_strain_by_zone() {
        let t = StrainThresholds::default();
        assert_eq!(RecoveryZone::Green.optimal_strain(&t), 14.0);
        assert_eq!(RecoveryZone::Yellow.optimal_strain(&t), 10.0);
        assert_eq!(RecoveryZone::Red.optimal_strain(&t), 6.0);
    }

    #[test]
    fn test_strain_color_bands() {
        let t = StrainThresholds::default();
        assert_eq!(StatusColor::for_strain(12.5, 14.0, &t), StatusColor::Green);
        assert_eq!(StatusColor::for_strain(17.0, 14.0, &t), StatusColor::Yellow);
        assert_eq!(StatusColor::for_strain(4.0, 10.0, &t), StatusColor::Red);
    }

    #[test]
    fn test_custom_thresholds_change_zone() {
        let t = RecoveryThresholds {
            green: 80.0,
            yellow: 50.0,
        };
        assert_eq!(RecoveryZone::from_score(70.0, &t), RecoveryZone::Yellow);
    }

    #[test]
    fn test_thresholds_partial_toml() {
        let parsed: Thresholds =
            toml::from_str("[recovery]\ngreen = 70.0\nyellow = 40.0\n").unwrap();
        assert_eq!(parsed.recovery.green, 70.0);
        assert_eq!(parsed.sleep, SleepThresholds::default());
    }
}
