//! Performance benchmarks for aggregation and rollups.
//!
//! Covers roster sizes of 100 and 1000 employees, each with two sessions:
//! - Session aggregation for one day
//! - Global and per-branch rollup for one day
//! - A 30-day concurrent range rollup over an in-memory provider
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use workforce_engine::calculation::{
    RangeOptions, aggregate_sessions, rollup_by_branch, rollup_day, rollup_range_concurrent,
};
use workforce_engine::models::{AttendanceEvent, AttendanceStatus, Employee, Roster};
use workforce_engine::providers::InMemoryEventProvider;
use workforce_engine::values::DateRange;

const ROSTER_SIZES: [usize; 2] = [100, 1000];

fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 10).unwrap()
}

/// Creates a roster spread over ten branches.
fn create_roster(size: usize) -> Roster {
    Roster::new(
        (0..size)
            .map(|i| Employee {
                employee_id: format!("emp_{i:04}"),
                name: format!("Employee {i}"),
                branch_id: Some(format!("branch_{}", i % 10)),
                face_id: (i % 2 == 0).then(|| format!("face_{i:04}")),
                designation: None,
            })
            .collect(),
    )
}

/// Creates a morning and an afternoon session for four out of five employees.
fn create_events(size: usize, date: NaiveDate) -> Vec<AttendanceEvent> {
    let at = |hour: u32, minute: u32| {
        Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
    };

    (0..size)
        .filter(|i| i % 5 != 0)
        .flat_map(|i| {
            let employee_id = format!("emp_{i:04}");
            let status = if i % 7 == 0 {
                AttendanceStatus::Late
            } else {
                AttendanceStatus::Present
            };
            [
                AttendanceEvent {
                    employee_id: employee_id.clone(),
                    attendance_id: format!("{date}_{i}_am"),
                    check_in_time: at(8, (i % 50) as u32),
                    check_out_time: Some(at(13, 0)),
                    status,
                },
                AttendanceEvent {
                    employee_id,
                    attendance_id: format!("{date}_{i}_pm"),
                    check_in_time: at(14, 0),
                    check_out_time: (i % 3 != 0).then(|| at(18, 5)),
                    status: AttendanceStatus::Present,
                },
            ]
        })
        .collect()
}

/// Benchmark: Session aggregation for one day.
fn bench_aggregate_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_sessions");
    for size in ROSTER_SIZES {
        let events = create_events(size, bench_date());
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| black_box(aggregate_sessions(black_box(events), bench_date())))
        });
    }
    group.finish();
}

/// Benchmark: Global and per-branch rollup for one day.
fn bench_rollup_day(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollup_day");
    for size in ROSTER_SIZES {
        let roster = create_roster(size);
        let ids = roster.ids();
        let summaries = aggregate_sessions(&create_events(size, bench_date()), bench_date());

        group.bench_with_input(BenchmarkId::new("global", size), &summaries, |b, summaries| {
            b.iter(|| black_box(rollup_day(summaries, &ids)))
        });
        group.bench_with_input(BenchmarkId::new("by_branch", size), &summaries, |b, summaries| {
            b.iter(|| black_box(rollup_by_branch(summaries, &roster, &[])))
        });
    }
    group.finish();
}

/// Benchmark: 30-day concurrent range rollup.
fn bench_range_rollup(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("rollup_range_30_days");

    for size in ROSTER_SIZES {
        let end = bench_date();
        let range = DateRange::trailing(end, 30);
        let provider = range.days().fold(InMemoryEventProvider::new(), |provider, date| {
            provider.with_events(date, create_events(size, date))
        });
        let ids: BTreeSet<String> = create_roster(size).ids();

        group.bench_with_input(BenchmarkId::from_parameter(size), &provider, |b, provider| {
            b.to_async(&rt).iter(|| async {
                let options = RangeOptions::default();
                black_box(rollup_range_concurrent(&range, &ids, provider, options).await)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregate_sessions, bench_rollup_day, bench_range_rollup);
criterion_main!(benches);
