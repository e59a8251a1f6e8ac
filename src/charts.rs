//! Chart-ready series
//!
//! Each builder takes the most recent scored records (at most
//! [`CHART_WINDOW_DAYS`]), orders them oldest first for plotting and returns
//! plain data that a front end can feed to any charting library.

use crate::constants::{StatusColor, Thresholds};
use crate::models::{Cycle, Recovery, Scored, Sleep};
use crate::units::{fixed_value, kilojoules_to_kcal, millis_to_minutes};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of days shown on every chart
pub const CHART_WINDOW_DAYS: usize = 30;

/// Window of the HRV moving average
pub const HRV_MOVING_AVERAGE_WINDOW: usize = 7;

/// Trailing moving average
///
/// Point `i` averages `values[i + 1 - window ..= i]`; the first points use
/// however many values exist so far. A zero window is treated as one.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Scored records, oldest first, limited to the newest `CHART_WINDOW_DAYS`
fn chart_window<T, K>(records: &[T], key: K) -> Vec<&T>
where
    T: Scored,
    K: Fn(&T) -> DateTime<Utc>,
{
    let mut scored: Vec<&T> = records.iter().filter(|r| r.is_scored()).collect();
    scored.sort_by_key(|r| key(*r));
    let skip = scored.len().saturating_sub(CHART_WINDOW_DAYS);
    scored.split_off(skip)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySeries {
    pub dates: Vec<NaiveDate>,
    pub recovery: Vec<f64>,
    pub hrv: Vec<f64>,
    pub rhr: Vec<f64>,
    /// One color per recovery bar
    pub colors: Vec<StatusColor>,
    pub avg_recovery: f64,
    pub avg_hrv: f64,
    pub avg_rhr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrvSeries {
    pub dates: Vec<NaiveDate>,
    pub hrv: Vec<f64>,
    pub moving_average: Vec<f64>,
    pub avg_hrv: f64,
    pub latest_hrv: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrainSeries {
    pub dates: Vec<NaiveDate>,
    pub strain: Vec<f64>,
    pub calories: Vec<f64>,
    pub avg_strain: f64,
    pub avg_calories: f64,
}

/// Sleep stage minutes per night
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSeries {
    pub dates: Vec<NaiveDate>,
    pub performance: Vec<f64>,
    pub deep_minutes: Vec<f64>,
    pub rem_minutes: Vec<f64>,
    pub light_minutes: Vec<f64>,
    pub avg_performance: f64,
    pub avg_deep_minutes: f64,
    pub avg_rem_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSeries {
    pub recovery: RecoverySeries,
    pub sleep: SleepSeries,
    pub hrv: HrvSeries,
    pub strain: StrainSeries,
    pub recovery_status: StatusColor,
    pub sleep_status: StatusColor,
}

pub fn recovery_series(records: &[Recovery], thresholds: &Thresholds) -> RecoverySeries {
    let window = chart_window(records, |r| r.created_at);

    let mut series = RecoverySeries {
        dates: Vec::with_capacity(window.len()),
        recovery: Vec::with_capacity(window.len()),
        hrv: Vec::with_capacity(window.len()),
        rhr: Vec::with_capacity(window.len()),
        colors: Vec::with_capacity(window.len()),
        avg_recovery: 0.0,
        avg_hrv: 0.0,
        avg_rhr: 0.0,
    };

    for record in window {
        let Some(score) = record.scored() else { continue };
        let recovery = score.recovery_score.unwrap_or(0.0);
        series.dates.push(record.created_at.date_naive());
        series.recovery.push(recovery);
        series.hrv.push(fixed_value(score.hrv_rmssd_milli.unwrap_or(0.0), 1));
        series.rhr.push(score.resting_heart_rate.unwrap_or(0.0));
        series
            .colors
            .push(StatusColor::for_recovery(recovery, &thresholds.recovery));
    }

    series.avg_recovery = mean_or_zero(&series.recovery);
    series.avg_hrv = mean_or_zero(&series.hrv);
    series.avg_rhr = mean_or_zero(&series.rhr);
    series
}

pub fn hrv_series(records: &[Recovery]) -> HrvSeries {
    let window = chart_window(records, |r| r.created_at);

    let mut dates = Vec::with_capacity(window.len());
    let mut hrv = Vec::with_capacity(window.len());
    for record in window {
        if let Some(value) = record.scored().and_then(|s| s.hrv_rmssd_milli) {
            dates.push(record.created_at.date_naive());
            hrv.push(fixed_value(value, 1));
        }
    }

    let moving = moving_average(&hrv, HRV_MOVING_AVERAGE_WINDOW)
        .into_iter()
        .map(|v| fixed_value(v, 1))
        .collect();

    HrvSeries {
        avg_hrv: mean_or_zero(&hrv),
        latest_hrv: hrv.last().copied(),
        dates,
        moving_average: moving,
        hrv,
    }
}

pub fn strain_series(records: &[Cycle]) -> StrainSeries {
    let window = chart_window(records, |c| c.start);

    let mut dates = Vec::with_capacity(window.len());
    let mut strain = Vec::with_capacity(window.len());
    let mut calories = Vec::with_capacity(window.len());
    for record in window {
        let Some(score) = record.scored() else { continue };
        dates.push(record.start.date_naive());
        strain.push(fixed_value(score.strain.unwrap_or(0.0), 2));
        calories.push(kilojoules_to_kcal(score.kilojoule).round());
    }

    StrainSeries {
        avg_strain: mean_or_zero(&strain),
        avg_calories: mean_or_zero(&calories),
        dates,
        strain,
        calories,
    }
}

pub fn sleep_series(records: &[Sleep]) -> SleepSeries {
    let main: Vec<Sleep> = records.iter().filter(|s| !s.nap).cloned().collect();
    let window = chart_window(&main, |s| s.start);

    let mut series = SleepSeries {
        dates: Vec::with_capacity(window.len()),
        performance: Vec::with_capacity(window.len()),
        deep_minutes: Vec::with_capacity(window.len()),
        rem_minutes: Vec::with_capacity(window.len()),
        light_minutes: Vec::with_capacity(window.len()),
        avg_performance: 0.0,
        avg_deep_minutes: 0.0,
        avg_rem_minutes: 0.0,
    };

    for record in window {
        let Some(score) = record.scored() else { continue };
        let stages = score.stage_summary.clone().unwrap_or_default();
        series.dates.push(record.start.date_naive());
        series
            .performance
            .push(score.sleep_performance_percentage.unwrap_or(0.0));
        series
            .deep_minutes
            .push(millis_to_minutes(stages.total_slow_wave_sleep_time_milli).round());
        series
            .rem_minutes
            .push(millis_to_minutes(stages.total_rem_sleep_time_milli).round());
        series
            .light_minutes
            .push(millis_to_minutes(stages.total_light_sleep_time_milli).round());
    }

    series.avg_performance = mean_or_zero(&series.performance);
    series.avg_deep_minutes = mean_or_zero(&series.deep_minutes);
    series.avg_rem_minutes = mean_or_zero(&series.rem_minutes);
    series
}

pub fn dashboard_series(
    sleep: &[Sleep],
    recovery: &[Recovery],
    cycle: &[Cycle],
    thresholds: &Thresholds,
) -> DashboardSeries {
    let recovery_series = recovery_series(recovery, thresholds);
    let sleep_series = sleep_series(sleep);

    DashboardSeries {
        recovery_status: StatusColor::for_recovery(
            recovery_series.avg_recovery,
            &thresholds.recovery,
        ),
        sleep_status: StatusColor::for_sleep_performance(
            sleep_series.avg_performance,
            &thresholds.sleep,
        ),
        hrv: hrv_series(recovery),
        strain: strain_series(cycle),
        recovery: recovery_series,
        sleep: sleep_series,
    }
}
