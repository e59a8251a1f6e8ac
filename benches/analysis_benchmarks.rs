use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use whooprs::charts;
use whooprs::{
    Cycle, CycleScore, InsightGenerator, Recovery, RecoveryScore, ScoreState, Sleep, SleepScore,
    SleepStageSummary, Thresholds, TrendCalculator,
};

/// Benchmarks for the trend, insight and chart paths
///
/// Dataset sizes cover the CLI periods and a long history.

fn create_recoveries(days: usize) -> Vec<Recovery> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    (0..days)
        .map(|day| Recovery {
            created_at: base - Duration::days(day as i64),
            score_state: ScoreState::Scored,
            score: Some(RecoveryScore {
                recovery_score: Some(30.0 + (day % 60) as f64),
                resting_heart_rate: Some(48.0 + (day % 7) as f64),
                hrv_rmssd_milli: Some(55.0 + (day % 11) as f64),
                ..RecoveryScore::default()
            }),
            ..Recovery::default()
        })
        .collect()
}

fn create_sleeps(days: usize) -> Vec<Sleep> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap();
    (0..days)
        .map(|day| {
            let at = base - Duration::days(day as i64);
            Sleep {
                created_at: at,
                start: at - Duration::hours(8),
                end: at,
                nap: day % 5 == 0,
                score_state: ScoreState::Scored,
                score: Some(SleepScore {
                    sleep_performance_percentage: Some(70.0 + (day % 25) as f64),
                    sleep_efficiency_percentage: Some(88.0),
                    stage_summary: Some(SleepStageSummary {
                        total_in_bed_time_milli: 28_800_000.0,
                        total_awake_time_milli: 2_400_000.0,
                        total_rem_sleep_time_milli: 5_400_000.0,
                        total_slow_wave_sleep_time_milli: 5_000_000.0,
                        total_light_sleep_time_milli: 16_000_000.0,
                        ..SleepStageSummary::default()
                    }),
                    ..SleepScore::default()
                }),
                ..Sleep::default()
            }
        })
        .collect()
}

fn create_cycles(days: usize) -> Vec<Cycle> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap();
    (0..days)
        .map(|day| Cycle {
            created_at: base - Duration::days(day as i64),
            start: base - Duration::days(day as i64),
            score_state: ScoreState::Scored,
            score: Some(CycleScore {
                strain: Some(6.0 + (day % 12) as f64),
                kilojoule: 9000.0,
                ..CycleScore::default()
            }),
            ..Cycle::default()
        })
        .collect()
}

fn bench_trend_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trend Analysis");
    let calculator = TrendCalculator::new();

    for &days in &[7, 14, 30, 365] {
        let recovery = create_recoveries(days);
        let sleep = create_sleeps(days);
        let cycle = create_cycles(days);

        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::new("analyze_trends", days), &days, |b, _| {
            b.iter(|| {
                calculator.analyze_trends(
                    black_box(&recovery),
                    black_box(&sleep),
                    black_box(&cycle),
                    days as u32,
                )
            });
        });
    }

    group.finish();
}

fn bench_insights(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insights");
    let generator = InsightGenerator::new();

    for &days in &[7, 30, 365] {
        let recovery = create_recoveries(days);
        let sleep = create_sleeps(days);
        let cycle = create_cycles(days);

        group.bench_with_input(BenchmarkId::new("generate", days), &days, |b, _| {
            b.iter(|| {
                generator.generate(
                    black_box(&recovery),
                    black_box(&sleep),
                    black_box(&cycle),
                    &[],
                )
            });
        });
    }

    group.finish();
}

fn bench_chart_series(c: &mut Criterion) {
    let recovery = create_recoveries(365);
    let sleep = create_sleeps(365);
    let cycle = create_cycles(365);
    let thresholds = Thresholds::default();

    c.bench_function("dashboard_series_365", |b| {
        b.iter(|| {
            charts::dashboard_series(
                black_box(&sleep),
                black_box(&recovery),
                black_box(&cycle),
                &thresholds,
            )
        });
    });
}

criterion_group!(benches, bench_trend_analysis, bench_insights, bench_chart_series);
criterion_main!(benches);
