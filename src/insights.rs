//! Rule-based daily insights
//!
//! The generator looks at the newest scored recovery, main sleep and cycle
//! and runs a fixed sequence of independent rules over them:
//!
//! 1. recovery zone
//! 2. HRV against the rolling baseline
//! 3. sleep debt
//! 4. sleep efficiency
//! 5. REM share of actual sleep
//! 6. day strain against the zone's optimal strain
//! 7. no workout on a green day
//!
//! Output order is the rule order. A rule whose inputs are missing is
//! skipped; the generator itself never fails.

use crate::constants::{RecoveryZone, Thresholds};
use crate::models::{
    scored_newest_first, Cycle, CycleScore, Recovery, RecoveryScore, Scored, Sleep, SleepScore,
    Workout,
};
use crate::units::{millis_to_hours, to_fixed};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Recovery,
    Sleep,
    Strain,
    Hrv,
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightCategory::Recovery => write!(f, "recovery"),
            InsightCategory::Sleep => write!(f, "sleep"),
            InsightCategory::Strain => write!(f, "strain"),
            InsightCategory::Hrv => write!(f, "hrv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    Good,
    Warning,
    Critical,
}

impl InsightLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            InsightLevel::Good => "✅",
            InsightLevel::Warning => "⚠️",
            InsightLevel::Critical => "🔴",
        }
    }
}

impl fmt::Display for InsightLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightLevel::Good => write!(f, "good"),
            InsightLevel::Warning => write!(f, "warning"),
            InsightLevel::Critical => write!(f, "critical"),
        }
    }
}

/// One actionable observation about today's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub level: InsightLevel,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Insight {
    fn new(
        category: InsightCategory,
        level: InsightLevel,
        title: &str,
        message: String,
        action: impl Into<String>,
    ) -> Self {
        Insight {
            category,
            level,
            title: title.to_string(),
            message,
            action: Some(action.into()),
        }
    }
}

/// Applies the threshold table to the latest records
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    thresholds: Thresholds,
}

impl InsightGenerator {
    pub fn new() -> Self {
        InsightGenerator {
            thresholds: Thresholds::default(),
        }
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        InsightGenerator { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run every rule in order and collect what fires
    pub fn generate(
        &self,
        recovery: &[Recovery],
        sleep: &[Sleep],
        cycle: &[Cycle],
        workout: &[Workout],
    ) -> Vec<Insight> {
        let scored_recovery = scored_newest_first(recovery);
        let scored_sleep = scored_newest_first(sleep);
        let scored_cycle = scored_newest_first(cycle);
        let scored_workouts = workout.iter().filter(|w| w.is_scored()).count();

        let today = scored_recovery.first().and_then(|r| r.scored());
        let today_sleep = scored_sleep
            .iter()
            .find(|s| !s.nap)
            .and_then(|s| s.scored());
        let today_cycle = scored_cycle.first().and_then(|c| c.scored());

        let mut insights = Vec::new();

        if let Some(today) = today {
            insights.extend(self.recovery_zone(today));
            insights.extend(self.hrv_baseline(today, &scored_recovery));
        }

        if let Some(today_sleep) = today_sleep {
            insights.extend(self.sleep_debt(today_sleep));
            insights.extend(self.sleep_efficiency(today_sleep));
            insights.extend(self.rem_sleep(today_sleep));
        }

        if let (Some(today_cycle), Some(today)) = (today_cycle, today) {
            insights.extend(self.strain_target(today_cycle, today));
        }

        if scored_workouts == 0 {
            insights.extend(today.and_then(|today| self.no_workout(today)));
        }

        debug!(
            recovery = scored_recovery.len(),
            sleep = scored_sleep.len(),
            cycle = scored_cycle.len(),
            workouts = scored_workouts,
            insights = insights.len(),
            "Generated insights"
        );

        insights
    }

    fn zone(&self, recovery_score: f64) -> RecoveryZone {
        RecoveryZone::from_score(recovery_score, &self.thresholds.recovery)
    }

    fn recovery_zone(&self, today: &RecoveryScore) -> Option<Insight> {
        let score = today.recovery_score?;

        let insight = match self.zone(score) {
            RecoveryZone::Green => Insight::new(
                InsightCategory::Recovery,
                InsightLevel::Good,
                "Green Recovery",
                format!("Recovery at {}% — body is primed for high strain.", score),
                "Great day for intense training or competition.",
            ),
            RecoveryZone::Yellow => Insight::new(
                InsightCategory::Recovery,
                InsightLevel::Warning,
                "Yellow Recovery",
                format!("Recovery at {}% — moderate readiness.", score),
                "Consider moderate activity. Avoid max efforts.",
            ),
            RecoveryZone::Red => Insight::new(
                InsightCategory::Recovery,
                InsightLevel::Critical,
                "Red Recovery",
                format!("Recovery at {}% — body needs rest.", score),
                "Prioritize rest, hydration, and sleep tonight.",
            ),
        };

        Some(insight)
    }

    /// Mean HRV over the newest recoveries that report a non-zero HRV
    fn hrv_baseline_average(&self, scored_recovery: &[&Recovery]) -> f64 {
        let values: Vec<f64> = scored_recovery
            .iter()
            .take(self.thresholds.hrv.baseline_window)
            .filter_map(|r| r.scored().and_then(|s| s.hrv_rmssd_milli))
            .filter(|hrv| *hrv != 0.0)
            .collect();

        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    fn hrv_baseline(
        &self,
        today: &RecoveryScore,
        scored_recovery: &[&Recovery],
    ) -> Option<Insight> {
        let hrv = today.hrv_rmssd_milli?;
        let baseline = self.hrv_baseline_average(scored_recovery);
        if baseline <= 0.0 {
            return None;
        }

        let t = &self.thresholds.hrv;
        if hrv < baseline * t.low_multiplier {
            Some(Insight::new(
                InsightCategory::Hrv,
                InsightLevel::Warning,
                "HRV Below Baseline",
                format!(
                    "Today's HRV ({}ms) is {}% below your 7-day average.",
                    to_fixed(hrv, 0),
                    to_fixed((1.0 - hrv / baseline) * 100.0, 0)
                ),
                "Possible stress, poor sleep, or overtraining. Monitor closely.",
            ))
        } else if hrv > baseline * t.high_multiplier {
            Some(Insight::new(
                InsightCategory::Hrv,
                InsightLevel::Good,
                "HRV Above Baseline",
                format!(
                    "Today's HRV ({}ms) is {}% above your 7-day average.",
                    to_fixed(hrv, 0),
                    to_fixed((hrv / baseline - 1.0) * 100.0, 0)
                ),
                "Excellent recovery. Good day for peak performance.",
            ))
        } else {
            None
        }
    }

    fn sleep_debt(&self, sleep: &SleepScore) -> Option<Insight> {
        let needed = sleep.sleep_needed.as_ref()?;
        let debt_hours = millis_to_hours(needed.need_from_sleep_debt_milli);
        let t = &self.thresholds.sleep;

        if debt_hours > t.debt_critical_hours {
            Some(Insight::new(
                InsightCategory::Sleep,
                InsightLevel::Critical,
                "Significant Sleep Debt",
                format!(
                    "You have {} hours of accumulated sleep debt.",
                    to_fixed(debt_hours, 1)
                ),
                "Try to get to bed 30-60 min earlier for the next few days.",
            ))
        } else if debt_hours > t.debt_warning_hours {
            Some(Insight::new(
                InsightCategory::Sleep,
                InsightLevel::Warning,
                "Mild Sleep Debt",
                format!("You have {} hours of sleep debt.", to_fixed(debt_hours, 1)),
                "Consider an earlier bedtime tonight.",
            ))
        } else {
            None
        }
    }

    fn sleep_efficiency(&self, sleep: &SleepScore) -> Option<Insight> {
        let efficiency = sleep.sleep_efficiency_percentage?;
        let target = self.thresholds.sleep.efficiency_target;
        if efficiency >= target {
            return None;
        }

        Some(Insight::new(
            InsightCategory::Sleep,
            InsightLevel::Warning,
            "Low Sleep Efficiency",
            format!(
                "Sleep efficiency at {}% (target: {}%+).",
                to_fixed(efficiency, 0),
                target
            ),
            "Limit screen time before bed. Keep room cool and dark.",
        ))
    }

    fn rem_sleep(&self, sleep: &SleepScore) -> Option<Insight> {
        let stages = sleep.stage_summary.as_ref()?;
        let rem_pct = stages.rem_percentage();

        // 0 means no measurable sleep, not zero REM
        if rem_pct <= 0.0 || rem_pct >= self.thresholds.sleep.rem_min_pct {
            return None;
        }

        Some(Insight::new(
            InsightCategory::Sleep,
            InsightLevel::Warning,
            "Low REM Sleep",
            format!(
                "REM was only {}% of sleep (target: 20-25%).",
                to_fixed(rem_pct, 0)
            ),
            "Avoid alcohol and late meals. Maintain consistent wake time.",
        ))
    }

    fn strain_target(&self, cycle: &CycleScore, today: &RecoveryScore) -> Option<Insight> {
        let strain = cycle.strain?;
        let recovery_score = today.recovery_score?;
        let t = &self.thresholds.strain;
        let optimal = self.zone(recovery_score).optimal_strain(t);
        let remaining = optimal - strain;

        if remaining > t.tolerance {
            Some(Insight::new(
                InsightCategory::Strain,
                InsightLevel::Good,
                "Strain Capacity Available",
                format!(
                    "Current strain: {}. Optimal target: ~{}.",
                    to_fixed(strain, 1),
                    optimal
                ),
                format!("Room for {} more strain today.", to_fixed(remaining, 1)),
            ))
        } else if strain > optimal + t.tolerance {
            Some(Insight::new(
                InsightCategory::Strain,
                InsightLevel::Warning,
                "Strain Exceeds Optimal",
                format!(
                    "Strain ({}) is above optimal ({}) for your recovery.",
                    to_fixed(strain, 1),
                    optimal
                ),
                "Wind down. Focus on recovery for the rest of the day.",
            ))
        } else {
            None
        }
    }

    fn no_workout(&self, today: &RecoveryScore) -> Option<Insight> {
        let score = today.recovery_score?;
        if self.zone(score) != RecoveryZone::Green {
            return None;
        }

        Some(Insight::new(
            InsightCategory::Strain,
            InsightLevel::Good,
            "No Workout Yet",
            "High recovery day with no recorded workout.".to_string(),
            "Great opportunity for an intense session.",
        ))
    }
}
