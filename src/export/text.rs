//! Human-readable renderers for trends, insights and daily summaries
//!
//! Whole numbers coming straight from the data source (recovery score, RHR)
//! are shown as-is; derived values go through [`to_fixed`].

use crate::constants::{StatusColor, Thresholds};
use crate::insights::Insight;
use crate::models::{BodyMeasurement, Profile};
use crate::summary::{DailySnapshot, SummaryStats};
use crate::trends::{TrendData, TrendStats};
use crate::units::{kilojoules_to_kcal, millis_to_hours, millis_to_minutes, to_fixed};
use chrono::NaiveDate;
use std::path::Path;

use super::ExportError;

const RULE_WIDTH: usize = 38;

fn fixed_or_na(value: Option<f64>, decimals: u32) -> String {
    value
        .map(|v| to_fixed(v, decimals))
        .unwrap_or_else(|| "N/A".to_string())
}

fn plain_or_na(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// `── Title ────…` padded to a fixed width
fn section_rule(title: &str) -> String {
    let head = format!("── {} ", title);
    let fill = RULE_WIDTH.saturating_sub(head.chars().count());
    format!("{}{}", head, "─".repeat(fill))
}

pub fn format_trends(data: &TrendData) -> String {
    let mut lines = vec![format!("📊 {}-Day Trends", data.period), String::new()];

    let range_plain = |s: &TrendStats| format!("{}-{}", s.min, s.max);
    let range_fixed =
        |s: &TrendStats, d: u32| format!("{}-{}", to_fixed(s.min, d), to_fixed(s.max, d));

    if let Some(s) = &data.recovery {
        lines.push(format!(
            "💚 Recovery: {}% avg ({}) {}",
            s.average,
            range_plain(s),
            s.trend.arrow()
        ));
    }
    if let Some(s) = &data.hrv {
        lines.push(format!(
            "💓 HRV: {}ms avg ({}) {}",
            s.average,
            range_fixed(s, 0),
            s.trend.arrow()
        ));
    }
    if let Some(s) = &data.rhr {
        lines.push(format!(
            "❤️ RHR: {}bpm avg ({}) {}",
            s.average,
            range_plain(s),
            s.trend.arrow()
        ));
    }
    if let Some(s) = &data.sleep_performance {
        lines.push(format!(
            "😴 Sleep: {}% avg ({}) {}",
            s.average,
            range_plain(s),
            s.trend.arrow()
        ));
    }
    if let Some(s) = &data.sleep_hours {
        lines.push(format!(
            "🛏️ Hours: {}h avg ({}) {}",
            to_fixed(s.average, 1),
            range_fixed(s, 1),
            s.trend.arrow()
        ));
    }
    if let Some(s) = &data.strain {
        lines.push(format!(
            "🔥 Strain: {} avg ({}) {}",
            to_fixed(s.average, 1),
            range_fixed(s, 1),
            s.trend.arrow()
        ));
    }

    lines.join("\n")
}

pub fn format_insights(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "✅ No actionable insights — all metrics look healthy!".to_string();
    }

    let mut lines = vec!["💡 Insights & Recommendations".to_string(), String::new()];
    for insight in insights {
        lines.push(format!("{} {}", insight.level.icon(), insight.title));
        lines.push(format!("   {}", insight.message));
        if let Some(action) = &insight.action {
            lines.push(format!("   → {}", action));
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

/// Multi-day averages; `color` swaps the category icons for status icons
pub fn format_summary_stats(stats: &SummaryStats, color: bool, thresholds: &Thresholds) -> String {
    let mut lines = vec![format!("📊 {}-Day Summary", stats.days), String::new()];

    if let Some(recovery) = stats.avg_recovery {
        let icon = if color {
            StatusColor::for_recovery(recovery, &thresholds.recovery).icon()
        } else {
            "💚"
        };
        lines.push(format!("{} Avg Recovery:  {}%", icon, to_fixed(recovery, 1)));
    }
    if let Some(hrv) = stats.avg_hrv {
        lines.push(format!("💓 Avg HRV:       {}ms", to_fixed(hrv, 1)));
    }
    if let Some(rhr) = stats.avg_rhr {
        lines.push(format!("❤️  Avg RHR:       {}bpm", to_fixed(rhr, 1)));
    }
    if let Some(perf) = stats.avg_sleep_perf {
        let icon = if color {
            StatusColor::for_sleep_performance(perf, &thresholds.sleep).icon()
        } else {
            "😴"
        };
        let hours = stats
            .avg_sleep_hours
            .map(|h| format!("{}h", to_fixed(h, 1)))
            .unwrap_or_else(|| "N/A".to_string());
        lines.push(format!(
            "{} Avg Sleep:     {}% | {}",
            icon,
            to_fixed(perf, 1),
            hours
        ));
    }
    if let Some(strain) = stats.avg_strain {
        lines.push(format!("🔥 Avg Strain:    {}", to_fixed(strain, 1)));
    }

    lines.join("\n")
}

/// One-line summary of a single day
pub fn format_daily_summary(date: NaiveDate, day: &DailySnapshot) -> String {
    let mut parts = Vec::new();

    if let Some(r) = day.recovery {
        if let Some(score) = r.recovery_score {
            parts.push(format!("Recovery: {}%", score));
        }
        if let Some(hrv) = r.hrv_rmssd_milli {
            parts.push(format!("HRV: {}ms", to_fixed(hrv, 0)));
        }
        if let Some(rhr) = r.resting_heart_rate {
            parts.push(format!("RHR: {}", rhr));
        }
    }
    if let Some(perf) = day.sleep.and_then(|s| s.sleep_performance_percentage) {
        parts.push(format!("Sleep: {}%", perf));
    }
    if let Some(strain) = day.cycle.and_then(|c| c.strain) {
        parts.push(format!("Strain: {}", to_fixed(strain, 1)));
    }
    if !day.workouts.is_empty() {
        parts.push(format!("Workouts: {}", day.workouts.len()));
    }

    if parts.is_empty() {
        format!("{} | No data", date)
    } else {
        format!("{} | {}", date, parts.join(" | "))
    }
}

/// Detailed view of one day: profile, body, recovery, sleep, workouts and strain
pub fn format_daily_detail(
    date: NaiveDate,
    profile: Option<&Profile>,
    body: Option<&BodyMeasurement>,
    day: &DailySnapshot,
) -> String {
    let mut lines = vec![format!("📅 {}", date), String::new()];

    if let Some(p) = profile {
        lines.push(format!("👤 {}", p.full_name()));
    }
    if let Some(b) = body {
        lines.push(format!(
            "📏 {}m | {}kg | Max HR: {}",
            b.height_meter, b.weight_kilogram, b.max_heart_rate
        ));
    }

    if let Some(r) = day.recovery {
        lines.push(format!(
            "💚 Recovery: {}% | HRV: {}ms | RHR: {}bpm",
            plain_or_na(r.recovery_score),
            fixed_or_na(r.hrv_rmssd_milli, 1),
            plain_or_na(r.resting_heart_rate)
        ));
        if let Some(spo2) = r.spo2_percentage {
            lines.push(format!(
                "   SpO2: {}% | Skin temp: {}°C",
                spo2,
                fixed_or_na(r.skin_temp_celsius, 1)
            ));
        }
    }

    if let Some(s) = day.sleep {
        let stages = s.stage_summary.as_ref();
        lines.push(format!(
            "😴 Sleep: {}% | {}h | Efficiency: {}%",
            fixed_or_na(s.sleep_performance_percentage, 0),
            fixed_or_na(stages.map(|st| millis_to_hours(st.total_in_bed_time_milli)), 1),
            fixed_or_na(s.sleep_efficiency_percentage, 0)
        ));
        if let Some(st) = stages {
            lines.push(format!(
                "   REM: {}min | Deep: {}min",
                to_fixed(millis_to_minutes(st.total_rem_sleep_time_milli), 0),
                to_fixed(millis_to_minutes(st.total_slow_wave_sleep_time_milli), 0)
            ));
        }
    }

    let scored_workouts: Vec<_> = day
        .workouts
        .iter()
        .filter_map(|w| w.score.as_ref().map(|score| (w, score)))
        .collect();
    if !scored_workouts.is_empty() {
        lines.push("🏋️ Workouts:".to_string());
        for (workout, score) in scored_workouts {
            lines.push(format!(
                "   {}: Strain {} | Avg HR: {} | {} cal",
                workout.sport_name,
                to_fixed(score.strain, 1),
                score.average_heart_rate,
                to_fixed(kilojoules_to_kcal(score.kilojoule), 0)
            ));
        }
    }

    if let Some(c) = day.cycle {
        lines.push(format!(
            "🔄 Day strain: {} | {} cal | Avg HR: {}",
            fixed_or_na(c.strain, 1),
            to_fixed(kilojoules_to_kcal(c.kilojoule), 0),
            c.average_heart_rate
        ));
    }

    lines.join("\n")
}

/// Multi-line daily summary with traffic-light icons
pub fn format_daily_color(date: NaiveDate, day: &DailySnapshot, thresholds: &Thresholds) -> String {
    let mut lines = vec![format!("📅 {}", date)];

    if let Some(r) = day.recovery {
        if let Some(score) = r.recovery_score {
            lines.push(format!(
                "{} Recovery: {}% | HRV: {}ms | RHR: {}bpm",
                StatusColor::for_recovery(score, &thresholds.recovery).icon(),
                score,
                fixed_or_na(r.hrv_rmssd_milli, 0),
                plain_or_na(r.resting_heart_rate)
            ));
        }
    }

    if let Some(s) = day.sleep {
        let perf = s.sleep_performance_percentage.unwrap_or(0.0);
        let in_bed = s
            .stage_summary
            .as_ref()
            .map(|st| millis_to_hours(st.total_in_bed_time_milli));
        lines.push(format!(
            "{} Sleep: {}% | {}h | Efficiency: {}%",
            StatusColor::for_sleep_performance(perf, &thresholds.sleep).icon(),
            to_fixed(perf, 0),
            fixed_or_na(in_bed, 1),
            fixed_or_na(s.sleep_efficiency_percentage, 0)
        ));
    }

    if let Some(c) = day.cycle {
        if let Some(strain) = c.strain {
            let optimal = day.optimal_strain(thresholds);
            lines.push(format!(
                "{} Strain: {} (optimal: ~{}) | {} cal",
                StatusColor::for_strain(strain, optimal, &thresholds.strain).icon(),
                to_fixed(strain, 1),
                optimal,
                to_fixed(kilojoules_to_kcal(c.kilojoule), 0)
            ));
        }
    }

    if !day.workouts.is_empty() {
        let sports: Vec<&str> = day.workouts.iter().map(|w| w.sport_name.as_str()).collect();
        lines.push(format!(
            "🏋️ Workouts: {} | {}",
            day.workouts.len(),
            sports.join(", ")
        ));
    }

    lines.join("\n")
}

fn compare_arrow(today: f64, average: f64) -> &'static str {
    if today > average {
        "↑"
    } else if today < average {
        "↓"
    } else {
        "→"
    }
}

fn format_duration(minutes: i64) -> String {
    if minutes >= 60 {
        format!("{}h{}m", minutes / 60, minutes % 60)
    } else {
        format!("{}min", minutes)
    }
}

/// Full dashboard: today's recovery, sleep and strain plus short-term trends
pub fn format_dashboard(
    date: NaiveDate,
    profile: Option<&Profile>,
    day: &DailySnapshot,
    trends: &TrendData,
    thresholds: &Thresholds,
) -> String {
    let mut lines = Vec::new();

    match profile {
        Some(p) => lines.push(format!("📅 {} | {}", date, p.full_name())),
        None => lines.push(format!("📅 {}", date)),
    }
    lines.push(String::new());

    lines.push(section_rule("Recovery"));
    match day.recovery.filter(|r| r.recovery_score.is_some()) {
        Some(r) => {
            let score = r.recovery_score.unwrap_or_default();
            let hrv = r.hrv_rmssd_milli.unwrap_or_default();
            let rhr = r.resting_heart_rate.unwrap_or_default();
            let hrv_avg = trends.hrv.as_ref().map(|s| s.average).unwrap_or(0.0);
            let rhr_avg = trends.rhr.as_ref().map(|s| s.average).unwrap_or(0.0);

            let hrv_delta = if hrv_avg > 0.0 {
                format!(" ({} vs {} avg)", compare_arrow(hrv, hrv_avg), to_fixed(hrv_avg, 0))
            } else {
                String::new()
            };
            let rhr_delta = if rhr_avg > 0.0 {
                format!(" ({} vs {} avg)", compare_arrow(rhr, rhr_avg), to_fixed(rhr_avg, 0))
            } else {
                String::new()
            };

            lines.push(format!(
                "{} {}% | HRV: {}ms{} | RHR: {}bpm{}",
                StatusColor::for_recovery(score, &thresholds.recovery).icon(),
                score,
                to_fixed(hrv, 0),
                hrv_delta,
                rhr,
                rhr_delta
            ));

            let mut extras = Vec::new();
            if let Some(spo2) = r.spo2_percentage {
                extras.push(format!("SpO2: {}%", spo2));
            }
            if let Some(skin) = r.skin_temp_celsius {
                extras.push(format!("Skin: {}°C", to_fixed(skin, 1)));
            }
            if let Some(resp) = day.sleep.and_then(|s| s.respiratory_rate) {
                extras.push(format!("Resp: {}/min", to_fixed(resp, 1)));
            }
            if !extras.is_empty() {
                lines.push(format!("   {}", extras.join(" | ")));
            }
        }
        None => lines.push("   No recovery data".to_string()),
    }
    lines.push(String::new());

    lines.push(section_rule("Sleep"));
    match day.sleep {
        Some(s) => {
            let stages = s.stage_summary.clone().unwrap_or_default();
            let hours = |millis: f64| to_fixed(millis_to_hours(millis), 1);
            lines.push(format!(
                "😴 {}% | {}h total | Efficiency: {}%",
                fixed_or_na(s.sleep_performance_percentage, 0),
                hours(stages.total_in_bed_time_milli),
                fixed_or_na(s.sleep_efficiency_percentage, 0)
            ));
            lines.push(format!(
                "   Deep: {}h ({}%) | REM: {}h ({}%) | Light: {}h",
                hours(stages.total_slow_wave_sleep_time_milli),
                stages.deep_percentage().round(),
                hours(stages.total_rem_sleep_time_milli),
                stages.rem_percentage().round(),
                hours(stages.total_light_sleep_time_milli)
            ));
            lines.push(format!(
                "   Disturbances: {} | Consistency: {}%",
                stages.disturbance_count,
                fixed_or_na(s.sleep_consistency_percentage, 0)
            ));
            if let Some(needed) = &s.sleep_needed {
                lines.push(format!(
                    "   💤 Sleep debt: {}h | Need tonight: {}h",
                    hours(needed.need_from_sleep_debt_milli),
                    hours(needed.total_milli())
                ));
            }
        }
        None => lines.push("   No sleep data".to_string()),
    }
    lines.push(String::new());

    lines.push(section_rule("Strain"));
    let day_strain = day.cycle.and_then(|c| c.strain.map(|strain| (strain, c.kilojoule)));
    if let Some((strain, kilojoule)) = day_strain {
        lines.push(format!(
            "🔥 {} / {} optimal | {} cal",
            to_fixed(strain, 1),
            day.optimal_strain(thresholds),
            to_fixed(kilojoules_to_kcal(kilojoule), 0)
        ));
    }
    for workout in &day.workouts {
        let strain = workout.score.as_ref().map(|s| s.strain).unwrap_or_default();
        lines.push(format!(
            "   {} (strain {}, {})",
            workout.sport_name,
            to_fixed(strain, 1),
            format_duration(workout.duration_minutes())
        ));
    }
    if day_strain.is_none() && day.workouts.is_empty() {
        lines.push("   No strain data".to_string());
    }
    lines.push(String::new());

    lines.push(section_rule(&format!("{}-Day Trends", trends.period)));
    let oldest = |s: &TrendStats, d: Option<u32>| match (s.oldest(), d) {
        (Some(v), Some(d)) => to_fixed(v, d),
        (Some(v), None) => v.to_string(),
        (None, _) => "?".to_string(),
    };
    if let Some(s) = &trends.hrv {
        lines.push(format!(
            "   HRV:      {} → {}ms {}  (range {}-{})",
            oldest(s, Some(0)),
            to_fixed(s.current, 0),
            s.trend.arrow(),
            to_fixed(s.min, 0),
            to_fixed(s.max, 0)
        ));
    }
    if let Some(s) = &trends.rhr {
        lines.push(format!(
            "   RHR:      {} → {}bpm {}  (range {}-{})",
            oldest(s, None),
            s.current,
            s.trend.arrow(),
            s.min,
            s.max
        ));
    }
    if let Some(s) = &trends.recovery {
        lines.push(format!(
            "   Recovery: {} → {}% {}",
            oldest(s, None),
            s.current,
            s.trend.arrow()
        ));
    }
    if let Some(s) = &trends.sleep_hours {
        lines.push(format!(
            "   Sleep:    {} → {}h {}",
            oldest(s, Some(1)),
            to_fixed(s.current, 1),
            s.trend.arrow()
        ));
    }
    if let Some(s) = &trends.strain {
        lines.push(format!(
            "   Strain:   {} avg (range {}-{})",
            to_fixed(s.average, 1),
            to_fixed(s.min, 1),
            to_fixed(s.max, 1)
        ));
    }

    lines.join("\n")
}

/// Write rendered text to a file
pub fn export_text<P: AsRef<Path>>(text: &str, output_path: P) -> Result<(), ExportError> {
    super::write_output(&format!("{}\n", text), output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{InsightCategory, InsightLevel};
    use crate::models::{
        CycleScore, RecoveryScore, ScoreState, SleepNeeded, SleepScore, SleepStageSummary,
        Workout, WorkoutScore,
    };
    use crate::trends::{TrendCalculator, TrendDirection};
    use chrono::{TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn recovery_score() -> RecoveryScore {
        RecoveryScore {
            recovery_score: Some(75.0),
            resting_heart_rate: Some(52.0),
            hrv_rmssd_milli: Some(85.5),
            spo2_percentage: Some(98.0),
            skin_temp_celsius: Some(33.2),
            ..RecoveryScore::default()
        }
    }

    fn sleep_score() -> SleepScore {
        SleepScore {
            sleep_performance_percentage: Some(90.0),
            sleep_efficiency_percentage: Some(92.5),
            sleep_consistency_percentage: Some(80.0),
            respiratory_rate: Some(15.2),
            sleep_needed: Some(SleepNeeded {
                baseline_milli: 28_800_000.0,
                need_from_sleep_debt_milli: 3_600_000.0,
                ..SleepNeeded::default()
            }),
            stage_summary: Some(SleepStageSummary {
                total_in_bed_time_milli: 28_800_000.0,
                total_awake_time_milli: 3_600_000.0,
                total_slow_wave_sleep_time_milli: 5_400_000.0,
                total_rem_sleep_time_milli: 5_400_000.0,
                total_light_sleep_time_milli: 14_400_000.0,
                disturbance_count: 3,
                sleep_cycle_count: 4,
                ..SleepStageSummary::default()
            }),
        }
    }

    fn cycle_score() -> CycleScore {
        CycleScore {
            strain: Some(12.5),
            kilojoule: 8000.0,
            average_heart_rate: 72.0,
            max_heart_rate: 155.0,
        }
    }

    fn workout() -> Workout {
        Workout {
            sport_name: "Running".to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 15, 7, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 15, 8, 5, 0).unwrap(),
            score_state: ScoreState::Scored,
            score: Some(WorkoutScore {
                strain: 10.5,
                kilojoule: 2500.0,
                average_heart_rate: 148.0,
                ..WorkoutScore::default()
            }),
            ..Workout::default()
        }
    }

    fn empty_trends(period: u32) -> TrendData {
        TrendData {
            period,
            recovery: None,
            hrv: None,
            rhr: None,
            sleep_performance: None,
            sleep_hours: None,
            strain: None,
        }
    }

    #[test]
    fn test_format_trends() {
        let calc = TrendCalculator::new();
        let mut data = empty_trends(7);
        data.recovery = calc.calculate(&[80.0, 75.0, 70.0, 50.0, 45.0, 40.0]);
        data.hrv = calc.calculate(&[62.4, 60.0, 58.7]);

        let text = format_trends(&data);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "📊 7-Day Trends");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "💚 Recovery: 60% avg (40-80) ↑");
        assert_eq!(lines[3], "💓 HRV: 60.4ms avg (59-62) →");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_format_insights_empty() {
        assert_eq!(
            format_insights(&[]),
            "✅ No actionable insights — all metrics look healthy!"
        );
    }

    #[test]
    fn test_format_insights() {
        let insights = vec![
            Insight {
                category: InsightCategory::Sleep,
                level: InsightLevel::Critical,
                title: "High Sleep Debt".to_string(),
                message: "You have 2.5 hours of accumulated sleep debt.".to_string(),
                action: Some("Prioritize sleep tonight.".to_string()),
            },
            Insight {
                category: InsightCategory::Hrv,
                level: InsightLevel::Good,
                title: "HRV Above Baseline".to_string(),
                message: "Looking good.".to_string(),
                action: None,
            },
        ];

        let text = format_insights(&insights);
        assert_eq!(
            text,
            "💡 Insights & Recommendations\n\n\
             🔴 High Sleep Debt\n   You have 2.5 hours of accumulated sleep debt.\n   → Prioritize sleep tonight.\n\n\
             ✅ HRV Above Baseline\n   Looking good."
        );
    }

    #[test]
    fn test_format_summary_stats() {
        let stats = SummaryStats {
            days: 7,
            avg_sleep_perf: Some(82.25),
            avg_sleep_hours: Some(7.04),
            avg_hrv: Some(64.0),
            avg_rhr: None,
            avg_recovery: Some(58.0),
            avg_strain: Some(11.25),
        };

        let plain = format_summary_stats(&stats, false, &Thresholds::default());
        assert!(plain.starts_with("📊 7-Day Summary\n\n"));
        assert!(plain.contains("💚 Avg Recovery:  58.0%"));
        assert!(plain.contains("😴 Avg Sleep:     82.3% | 7.0h"));
        assert!(plain.contains("🔥 Avg Strain:    11.3"));
        assert!(!plain.contains("RHR"));

        let color = format_summary_stats(&stats, true, &Thresholds::default());
        assert!(color.contains("🟡 Avg Recovery:  58.0%"));
        assert!(color.contains("🟡 Avg Sleep:"));
    }

    #[test]
    fn test_format_daily_summary() {
        let recovery = recovery_score();
        let sleep = sleep_score();
        let cycle = cycle_score();
        let w = workout();
        let day = DailySnapshot {
            recovery: Some(&recovery),
            sleep: Some(&sleep),
            cycle: Some(&cycle),
            workouts: vec![&w],
        };

        assert_eq!(
            format_daily_summary(date(), &day),
            "2024-03-15 | Recovery: 75% | HRV: 86ms | RHR: 52 | Sleep: 90% | Strain: 12.5 | Workouts: 1"
        );
    }

    #[test]
    fn test_format_daily_summary_no_data() {
        let day = DailySnapshot::from_records(&[], &[], &[], &[]);
        assert_eq!(format_daily_summary(date(), &day), "2024-03-15 | No data");
    }

    #[test]
    fn test_format_daily_detail() {
        let recovery = recovery_score();
        let sleep = sleep_score();
        let cycle = cycle_score();
        let w = workout();
        let day = DailySnapshot {
            recovery: Some(&recovery),
            sleep: Some(&sleep),
            cycle: Some(&cycle),
            workouts: vec![&w],
        };
        let profile = Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Profile::default()
        };
        let body = BodyMeasurement {
            height_meter: 1.7,
            weight_kilogram: 60.0,
            max_heart_rate: 190,
        };

        let text = format_daily_detail(date(), Some(&profile), Some(&body), &day);
        let expected = [
            "📅 2024-03-15",
            "",
            "👤 Ada Lovelace",
            "📏 1.7m | 60kg | Max HR: 190",
            "💚 Recovery: 75% | HRV: 85.5ms | RHR: 52bpm",
            "   SpO2: 98% | Skin temp: 33.2°C",
            "😴 Sleep: 90% | 8.0h | Efficiency: 93%",
            "   REM: 90min | Deep: 90min",
            "🏋️ Workouts:",
            "   Running: Strain 10.5 | Avg HR: 148 | 598 cal",
            "🔄 Day strain: 12.5 | 1912 cal | Avg HR: 72",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_format_daily_detail_no_data() {
        let day = DailySnapshot::from_records(&[], &[], &[], &[]);
        assert_eq!(format_daily_detail(date(), None, None, &day), "📅 2024-03-15\n");
    }

    #[test]
    fn test_export_text_appends_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.txt");
        export_text("📅 2024-03-15 | No data", &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "📅 2024-03-15 | No data\n"
        );
    }

    #[test]
    fn test_format_daily_color() {
        let recovery = recovery_score();
        let sleep = sleep_score();
        let cycle = cycle_score();
        let w = workout();
        let day = DailySnapshot {
            recovery: Some(&recovery),
            sleep: Some(&sleep),
            cycle: Some(&cycle),
            workouts: vec![&w],
        };

        let text = format_daily_color(date(), &day, &Thresholds::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "📅 2024-03-15");
        assert_eq!(lines[1], "🟢 Recovery: 75% | HRV: 86ms | RHR: 52bpm");
        assert_eq!(lines[2], "🟢 Sleep: 90% | 8.0h | Efficiency: 93%");
        // 12.5 against 14 is within the inner tolerance
        assert_eq!(lines[3], "🟢 Strain: 12.5 (optimal: ~14) | 1912 cal");
        assert_eq!(lines[4], "🏋️ Workouts: 1 | Running");
    }

    #[test]
    fn test_format_dashboard() {
        let recovery = recovery_score();
        let sleep = sleep_score();
        let cycle = cycle_score();
        let w = workout();
        let day = DailySnapshot {
            recovery: Some(&recovery),
            sleep: Some(&sleep),
            cycle: Some(&cycle),
            workouts: vec![&w],
        };
        let profile = Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Profile::default()
        };

        let calc = TrendCalculator::new();
        let mut trends = empty_trends(7);
        trends.hrv = calc.calculate(&[85.5, 70.0, 66.0]);
        trends.rhr = calc.calculate(&[52.0, 54.0, 55.0]);

        let text = format_dashboard(date(), Some(&profile), &day, &trends, &Thresholds::default());

        assert!(text.starts_with("📅 2024-03-15 | Ada Lovelace\n\n── Recovery ──"));
        assert!(text.contains("🟢 75% | HRV: 86ms (↑ vs 74 avg) | RHR: 52bpm (↓ vs 54 avg)"));
        assert!(text.contains("   SpO2: 98% | Skin: 33.2°C | Resp: 15.2/min"));
        assert!(text.contains("😴 90% | 8.0h total | Efficiency: 93%"));
        assert!(text.contains("   Deep: 1.5h (21%) | REM: 1.5h (21%) | Light: 4.0h"));
        assert!(text.contains("   Disturbances: 3 | Consistency: 80%"));
        assert!(text.contains("   💤 Sleep debt: 1.0h | Need tonight: 9.0h"));
        assert!(text.contains("🔥 12.5 / 14 optimal | 1912 cal"));
        assert!(text.contains("   Running (strain 10.5, 1h5m)"));
        assert!(text.contains("   HRV:      66 → 86ms → "));
        assert!(text.contains("   RHR:      55 → 52bpm →  (range 52-55)"));
    }

    #[test]
    fn test_format_dashboard_empty_day() {
        let day = DailySnapshot::from_records(&[], &[], &[], &[]);
        let text = format_dashboard(date(), None, &day, &empty_trends(7), &Thresholds::default());

        assert!(text.starts_with("📅 2024-03-15\n"));
        assert!(text.contains("   No recovery data"));
        assert!(text.contains("   No sleep data"));
        assert!(text.contains("   No strain data"));
        assert!(text.ends_with("── 7-Day Trends ──────────────────────"));
    }

    #[test]
    fn test_section_rule_width() {
        assert_eq!(
            section_rule("Recovery"),
            "── Recovery ──────────────────────────"
        );
        assert_eq!(section_rule("Sleep").chars().count(), RULE_WIDTH);
    }

    #[test]
    fn test_trend_arrow_in_dashboard() {
        let stats = TrendStats {
            average: 50.0,
            min: 40.0,
            max: 60.0,
            current: 60.0,
            trend: TrendDirection::Up,
            values: vec![60.0, 50.0, 40.0],
        };
        let mut trends = empty_trends(7);
        trends.recovery = Some(stats);
        let day = DailySnapshot::from_records(&[], &[], &[], &[]);
        let text = format_dashboard(date(), None, &day, &trends, &Thresholds::default());
        assert!(text.contains("   Recovery: 40 → 60% ↑"));
    }
}
