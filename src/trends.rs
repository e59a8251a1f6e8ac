use crate::models::{
    scored_newest_first, Cycle, CycleScore, Recovery, RecoveryScore, Scored, Sleep, SleepScore,
};
use crate::units::{millis_to_hours, round_to};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Direction of the short-term average relative to the older window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Stable => "→",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Aggregate statistics for one metric over the lookback period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    /// Mean of all values, rounded to one decimal
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Most recent observation
    pub current: f64,
    pub trend: TrendDirection,
    /// Observations, newest first
    pub values: Vec<f64>,
}

impl TrendStats {
    /// Oldest observation in the window
    pub fn oldest(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Per-metric trend statistics for one analysis period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendData {
    pub period: u32,
    pub recovery: Option<TrendStats>,
    pub hrv: Option<TrendStats>,
    pub rhr: Option<TrendStats>,
    pub sleep_performance: Option<TrendStats>,
    pub sleep_hours: Option<TrendStats>,
    pub strain: Option<TrendStats>,
}

/// Trend calculation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Number of newest observations forming the recent window (default: 3)
    pub recent_window: usize,

    /// Dead band around zero change, as a fraction of the overall mean (default: 0.05)
    pub deadband: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        TrendConfig {
            recent_window: 3,
            deadband: 0.05,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rolling trend statistics over scored records
#[derive(Debug, Clone, Default)]
pub struct TrendCalculator {
    config: TrendConfig,
}

impl TrendCalculator {
    /// Create calculator with default window and dead band
    pub fn new() -> Self {
        TrendCalculator {
            config: TrendConfig::default(),
        }
    }

    pub fn with_config(config: TrendConfig) -> Self {
        TrendCalculator { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Summarize a newest-first series; `None` when it is empty
    ///
    /// The caller is responsible for slicing the series to the lookback
    /// period. The recent window is compared against everything older; with
    /// no older observations the trend is stable.
    pub fn calculate(&self, values: &[f64]) -> Option<TrendStats> {
        let current = *values.first()?;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let raw_average = mean(values);

        let window = self.config.recent_window.clamp(1, values.len());
        let recent_average = mean(&values[..window]);
        let older_average = if values.len() > window {
            mean(&values[window..])
        } else {
            recent_average
        };

        let diff = recent_average - older_average;
        let threshold = raw_average * self.config.deadband;

        let trend = if diff > threshold {
            TrendDirection::Up
        } else if diff < -threshold {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        };

        Some(TrendStats {
            // rounding can push the mean past a bound that is not on the 0.1 grid
            average: round_to(raw_average, 1).clamp(min, max),
            min,
            max,
            current,
            trend,
            values: values.to_vec(),
        })
    }

    /// Per-metric trends from raw record slices
    ///
    /// Records that are not fully scored are dropped and the rest sorted
    /// newest first before extraction. Sleep metrics ignore naps; sleep hours
    /// are in-bed time and need the stage summary.
    pub fn analyze_trends(
        &self,
        recovery: &[Recovery],
        sleep: &[Sleep],
        cycle: &[Cycle],
        period: u32,
    ) -> TrendData {
        let scored_recovery = scored_newest_first(recovery);
        let scored_sleep: Vec<&Sleep> = scored_newest_first(sleep)
            .into_iter()
            .filter(|s| !s.nap)
            .collect();
        let scored_cycle = scored_newest_first(cycle);

        debug!(
            period,
            recovery = scored_recovery.len(),
            sleep = scored_sleep.len(),
            cycle = scored_cycle.len(),
            "Analyzing trends"
        );

        let recovery_scores = extract(&scored_recovery, |s: &RecoveryScore| s.recovery_score);
        let hrv_values = extract(&scored_recovery, |s: &RecoveryScore| s.hrv_rmssd_milli);
        let rhr_values = extract(&scored_recovery, |s: &RecoveryScore| s.resting_heart_rate);
        let sleep_performance = extract(&scored_sleep, |s: &SleepScore| {
            s.sleep_performance_percentage
        });
        let sleep_hours = extract(&scored_sleep, |s: &SleepScore| {
            s.stage_summary
                .as_ref()
                .map(|stages| millis_to_hours(stages.total_in_bed_time_milli))
        });
        let strain_values = extract(&scored_cycle, |s: &CycleScore| s.strain);

        TrendData {
            period,
            recovery: self.calculate(&recovery_scores),
            hrv: self.calculate(&hrv_values),
            rhr: self.calculate(&rhr_values),
            sleep_performance: self.calculate(&sleep_performance),
            sleep_hours: self.calculate(&sleep_hours),
            strain: self.calculate(&strain_values),
        }
    }
}

fn extract<T, F>(records: &[&T], field: F) -> Vec<f64>
where
    T: Scored,
    F: Fn(&T::Score) -> Option<f64>,
{
    records
        .iter()
        .filter_map(|r| r.scored().and_then(&field))
        .collect()
}
