use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cert_expiry_notifier::parsing::{format_expiry_date, parse_not_after, remaining_days};
use chrono::{Duration, TimeZone, Utc};

fn not_after_parsing_benchmark(c: &mut Criterion) {
    let test_values = vec![
        "Jan 02 15:04:05 2030 GMT",
        "Jan  2 15:04:05 2030 GMT",
        "Dec 31 23:59:59 2026 GMT",
        "Feb 28 00:00:00 2027 GMT",
        "not a date",
    ];

    c.bench_function("parse_not_after", |b| {
        b.iter(|| {
            for value in &test_values {
                black_box(parse_not_after(black_box(value)));
            }
        })
    });
}

fn remaining_days_benchmark(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
    let expiries = vec![
        now + Duration::days(90),
        now + Duration::days(10) - Duration::hours(1),
        now - Duration::hours(2),
    ];

    c.bench_function("remaining_days", |b| {
        b.iter(|| {
            for expiry in &expiries {
                black_box(remaining_days(black_box(*expiry), black_box(now)));
            }
        })
    });

    c.bench_function("format_expiry_date", |b| {
        b.iter(|| black_box(format_expiry_date(black_box(now))))
    });
}

criterion_group!(benches, not_after_parsing_benchmark, remaining_days_benchmark);
criterion_main!(benches);
