use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scoring state reported by the data source for every record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreState {
    /// Score computed and safe to read
    Scored,
    /// Record exists but has not been scored yet
    #[default]
    PendingScore,
    /// Record cannot be scored (e.g. too little data)
    Unscorable,
}

/// Common view over records that carry an optional score payload
///
/// A record's score must only be read through [`Scored::scored`], which hides
/// the payload unless the record is in [`ScoreState::Scored`].
pub trait Scored {
    type Score;

    fn score_state(&self) -> ScoreState;

    fn created_at(&self) -> DateTime<Utc>;

    /// Raw payload, regardless of state
    fn raw_score(&self) -> Option<&Self::Score>;

    fn scored(&self) -> Option<&Self::Score> {
        match self.score_state() {
            ScoreState::Scored => self.raw_score(),
            _ => None,
        }
    }

    fn is_scored(&self) -> bool {
        self.scored().is_some()
    }
}

/// Keep only fully scored records, newest `created_at` first
///
/// The sort is stable: records sharing a timestamp keep their input order.
pub fn scored_newest_first<T: Scored>(records: &[T]) -> Vec<&T> {
    let mut scored: Vec<&T> = records.iter().filter(|r| r.is_scored()).collect();
    scored.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    scored
}

/// Basic user profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    pub height_meter: f64,
    pub weight_kilogram: f64,
    pub max_heart_rate: u16,
}

/// Daily recovery record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recovery {
    #[serde(default)]
    pub cycle_id: i64,
    #[serde(default)]
    pub sleep_id: String,
    #[serde(default)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub score_state: ScoreState,
    #[serde(default)]
    pub score: Option<RecoveryScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryScore {
    #[serde(default)]
    pub user_calibrating: bool,
    /// Recovery score, 0-100 %
    pub recovery_score: Option<f64>,
    /// Resting heart rate in bpm
    pub resting_heart_rate: Option<f64>,
    /// HRV as RMSSD in milliseconds
    pub hrv_rmssd_milli: Option<f64>,
    /// Blood oxygen, only reported by newer hardware
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_temp_celsius: Option<f64>,
}

/// Sleep or nap record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sleep {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cycle_id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub timezone_offset: String,
    #[serde(default)]
    pub nap: bool,
    pub score_state: ScoreState,
    #[serde(default)]
    pub score: Option<SleepScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepScore {
    #[serde(default)]
    pub stage_summary: Option<SleepStageSummary>,
    #[serde(default)]
    pub sleep_needed: Option<SleepNeeded>,
    #[serde(default)]
    pub respiratory_rate: Option<f64>,
    #[serde(default)]
    pub sleep_performance_percentage: Option<f64>,
    #[serde(default)]
    pub sleep_consistency_percentage: Option<f64>,
    #[serde(default)]
    pub sleep_efficiency_percentage: Option<f64>,
}

/// Time spent in each sleep stage, all in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepStageSummary {
    pub total_in_bed_time_milli: f64,
    pub total_awake_time_milli: f64,
    #[serde(default)]
    pub total_no_data_time_milli: f64,
    pub total_light_sleep_time_milli: f64,
    pub total_slow_wave_sleep_time_milli: f64,
    pub total_rem_sleep_time_milli: f64,
    #[serde(default)]
    pub sleep_cycle_count: u32,
    #[serde(default)]
    pub disturbance_count: u32,
}

impl SleepStageSummary {
    /// In-bed time minus awake time
    pub fn actual_sleep_milli(&self) -> f64 {
        self.total_in_bed_time_milli - self.total_awake_time_milli
    }

    /// Share of actual sleep spent in `stage_milli`, 0 when there was no sleep
    pub fn stage_percentage(&self, stage_milli: f64) -> f64 {
        let actual = self.actual_sleep_milli();
        if actual > 0.0 {
            stage_milli / actual * 100.0
        } else {
            0.0
        }
    }

    pub fn rem_percentage(&self) -> f64 {
        self.stage_percentage(self.total_rem_sleep_time_milli)
    }

    pub fn deep_percentage(&self) -> f64 {
        self.stage_percentage(self.total_slow_wave_sleep_time_milli)
    }
}

/// Modeled sleep need components, all in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepNeeded {
    pub baseline_milli: f64,
    pub need_from_sleep_debt_milli: f64,
    pub need_from_recent_strain_milli: f64,
    pub need_from_recent_nap_milli: f64,
}

impl SleepNeeded {
    /// Total sleep needed tonight
    pub fn total_milli(&self) -> f64 {
        self.baseline_milli
            + self.need_from_sleep_debt_milli
            + self.need_from_recent_strain_milli
            + self.need_from_recent_nap_milli
    }
}

/// Physiological day (one wake-to-wake cycle)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub start: DateTime<Utc>,
    /// Absent while the cycle is still in progress
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timezone_offset: String,
    pub score_state: ScoreState,
    #[serde(default)]
    pub score: Option<CycleScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleScore {
    /// Day strain on the 0-21 scale
    pub strain: Option<f64>,
    #[serde(default)]
    pub kilojoule: f64,
    #[serde(default)]
    pub average_heart_rate: f64,
    #[serde(default)]
    pub max_heart_rate: f64,
}

/// Single recorded activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub timezone_offset: String,
    #[serde(default)]
    pub sport_name: String,
    pub score_state: ScoreState,
    #[serde(default)]
    pub score: Option<WorkoutScore>,
}

impl Workout {
    /// Whole minutes between start and end, rounded to nearest
    pub fn duration_minutes(&self) -> i64 {
        let millis = (self.end - self.start).num_milliseconds().max(0);
        (millis as f64 / 60_000.0).round() as i64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutScore {
    pub strain: f64,
    #[serde(default)]
    pub average_heart_rate: f64,
    #[serde(default)]
    pub max_heart_rate: f64,
    #[serde(default)]
    pub kilojoule: f64,
    #[serde(default)]
    pub percent_recorded: f64,
    #[serde(default)]
    pub zone_durations: Option<ZoneDurations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_gain_meter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_change_meter: Option<f64>,
}

/// Time in each heart rate zone, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDurations {
    pub zone_zero_milli: f64,
    pub zone_one_milli: f64,
    pub zone_two_milli: f64,
    pub zone_three_milli: f64,
    pub zone_four_milli: f64,
    pub zone_five_milli: f64,
}

macro_rules! impl_scored {
    ($record:ty, $score:ty) => {
        impl Scored for $record {
            type Score = $score;

            fn score_state(&self) -> ScoreState {
                self.score_state
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn raw_score(&self) -> Option<&$score> {
                self.score.as_ref()
            }
        }
    };
}

impl_scored!(Recovery, RecoveryScore);
impl_scored!(Sleep, SleepScore);
impl_scored!(Cycle, CycleScore);
impl_scored!(Workout, WorkoutScore);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn recovery(day: u32, state: ScoreState, score: Option<f64>) -> Recovery {
        Recovery {
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 7, 0, 0).unwrap(),
            score_state: state,
            score: score.map(|s| RecoveryScore {
                recovery_score: Some(s),
                ..RecoveryScore::default()
            }),
            ..Recovery::default()
        }
    }

    #[test]
    fn test_unscored_records_hide_payload() {
        let pending = recovery(15, ScoreState::PendingScore, Some(80.0));
        assert!(pending.raw_score().is_some());
        assert!(pending.scored().is_none());

        let missing = recovery(15, ScoreState::Scored, None);
        assert!(!missing.is_scored());
    }

    #[test]
    fn test_scored_newest_first_filters_and_sorts() {
        let records = vec![
            recovery(13, ScoreState::Scored, Some(70.0)),
            recovery(15, ScoreState::Scored, Some(80.0)),
            recovery(16, ScoreState::Unscorable, None),
            recovery(14, ScoreState::Scored, Some(60.0)),
        ];

        let sorted = scored_newest_first(&records);
        let scores: Vec<f64> = sorted
            .iter()
            .map(|r| r.scored().unwrap().recovery_score.unwrap())
            .collect();
        assert_eq!(scores, vec![80.0, 60.0, 70.0]);
    }

    #[test]
    fn test_score_state_wire_format() {
        let state: ScoreState = serde_json::from_str("\"PENDING_SCORE\"").unwrap();
        assert_eq!(state, ScoreState::PendingScore);
        assert_eq!(serde_json::to_string(&ScoreState::Scored).unwrap(), "\"SCORED\"");
    }

    #[test]
    fn test_rem_percentage_guards_zero_sleep() {
        let stages = SleepStageSummary {
            total_in_bed_time_milli: 3_600_000.0,
            total_awake_time_milli: 3_600_000.0,
            total_rem_sleep_time_milli: 600_000.0,
            ..SleepStageSummary::default()
        };
        assert_eq!(stages.rem_percentage(), 0.0);
    }

    #[test]
    fn test_sleep_needed_total() {
        let need = SleepNeeded {
            baseline_milli: 28_800_000.0,
            need_from_sleep_debt_milli: 1_800_000.0,
            need_from_recent_strain_milli: 600_000.0,
            need_from_recent_nap_milli: -300_000.0,
        };
        assert_eq!(need.total_milli(), 30_900_000.0);
    }
}
