//! Benchmarks for the integration step and checkpoint comparison
//!
//! One tick must stay far below the 50 ms tick interval; these measure the
//! pure state machine without the owner task.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use pacekeeper::calibration::Calibration;
use pacekeeper::corrector::{self, SnapshotLog};
use pacekeeper::test_utils::dashboard_route_sheet;
use std::hint::black_box;
use std::time::Duration;

fn running_calibration() -> Calibration {
    let mut calibration = Calibration::new(1042.0).expect("default factor is valid");
    calibration.set_instructed_speed(82.0);
    calibration.record_odometer_reading(1500.0);
    calibration.arm_race_clock(3_060_000);
    calibration.start();
    calibration
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("integration_step");

    group.bench_function("advance_50ms", |b| {
        let mut calibration = running_calibration();
        b.iter(|| {
            calibration.advance(black_box(Duration::from_millis(50)));
            black_box(calibration.corrected_distance_meters())
        })
    });

    group.bench_function("advance_one_minute_of_ticks", |b| {
        b.iter_batched(
            running_calibration,
            |mut calibration| {
                for _ in 0..1200 {
                    calibration.advance(Duration::from_millis(50));
                }
                black_box(calibration.state())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let sheet = dashboard_route_sheet();
    let mut calibration = running_calibration();
    calibration.advance(Duration::from_secs(100));
    let state = calibration.state();

    c.bench_function("compare_and_log", |b| {
        b.iter_batched(
            SnapshotLog::new,
            |mut log| {
                for (index, reference) in sheet.references().iter().enumerate() {
                    if let Ok(snapshot) = corrector::compare(index, reference, black_box(&state), -25) {
                        log.push(snapshot);
                    }
                }
                black_box(log.latest_recommended_factor())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_advance, bench_compare);
criterion_main!(benches);
