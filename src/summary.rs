//! Multi-day averages and the single-day snapshot used by the renderers

use crate::constants::{RecoveryZone, Thresholds};
use crate::models::{
    scored_newest_first, Cycle, CycleScore, Recovery, RecoveryScore, Scored, Sleep, SleepScore,
    Workout,
};
use crate::units::millis_to_hours;
use serde::{Deserialize, Serialize};

/// Averages over every scored record in the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub days: u32,
    pub avg_sleep_perf: Option<f64>,
    /// Actual sleep (in bed minus awake), hours
    pub avg_sleep_hours: Option<f64>,
    pub avg_hrv: Option<f64>,
    pub avg_rhr: Option<f64>,
    pub avg_recovery: Option<f64>,
    pub avg_strain: Option<f64>,
}

fn average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

impl SummaryStats {
    pub fn compute(sleep: &[Sleep], recovery: &[Recovery], cycle: &[Cycle], days: u32) -> Self {
        let main_sleep: Vec<&SleepScore> = sleep
            .iter()
            .filter(|s| !s.nap)
            .filter_map(|s| s.scored())
            .collect();
        let recovery_scores: Vec<&RecoveryScore> =
            recovery.iter().filter_map(|r| r.scored()).collect();
        let cycle_scores: Vec<&CycleScore> = cycle.iter().filter_map(|c| c.scored()).collect();

        SummaryStats {
            days,
            avg_sleep_perf: average(
                main_sleep
                    .iter()
                    .filter_map(|s| s.sleep_performance_percentage),
            ),
            avg_sleep_hours: average(main_sleep.iter().filter_map(|s| {
                s.stage_summary
                    .as_ref()
                    .map(|stages| millis_to_hours(stages.actual_sleep_milli()))
            })),
            avg_hrv: average(recovery_scores.iter().filter_map(|r| r.hrv_rmssd_milli)),
            avg_rhr: average(recovery_scores.iter().filter_map(|r| r.resting_heart_rate)),
            avg_recovery: average(recovery_scores.iter().filter_map(|r| r.recovery_score)),
            avg_strain: average(cycle_scores.iter().filter_map(|c| c.strain)),
        }
    }
}

/// The newest scored records of one day, borrowed from a record set
#[derive(Debug, Clone, Serialize)]
pub struct DailySnapshot<'a> {
    pub recovery: Option<&'a RecoveryScore>,
    /// Newest non-nap sleep
    pub sleep: Option<&'a SleepScore>,
    pub cycle: Option<&'a CycleScore>,
    pub workouts: Vec<&'a Workout>,
}

impl<'a> DailySnapshot<'a> {
    pub fn from_records(
        recovery: &'a [Recovery],
        sleep: &'a [Sleep],
        cycle: &'a [Cycle],
        workout: &'a [Workout],
    ) -> Self {
        let mut workouts: Vec<&Workout> = workout.iter().filter(|w| w.is_scored()).collect();
        workouts.sort_by_key(|w| w.start);

        DailySnapshot {
            recovery: scored_newest_first(recovery)
                .into_iter()
                .next()
                .and_then(|r| r.scored()),
            sleep: scored_newest_first(sleep)
                .into_iter()
                .find(|s| !s.nap)
                .and_then(|s| s.scored()),
            cycle: scored_newest_first(cycle)
                .into_iter()
                .next()
                .and_then(|c| c.scored()),
            workouts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recovery.is_none()
            && self.sleep.is_none()
            && self.cycle.is_none()
            && self.workouts.is_empty()
    }

    /// Optimal strain for today's recovery zone
    ///
    /// Without a recovery score the yellow zone target is used.
    pub fn optimal_strain(&self, thresholds: &Thresholds) -> f64 {
        let zone = self
            .recovery
            .and_then(|r| r.recovery_score)
            .map(|score| RecoveryZone::from_score(score, &thresholds.recovery))
            .unwrap_or(RecoveryZone::Yellow);
        zone.optimal_strain(&thresholds.strain)
    }
}
