use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use jsontext::parse;

static SAMPLE: &str = r#"{
    "id": 4017,
    "name": "sensor-array \"north\"",
    "active": true,
    "calibration": null,
    "readings": [0.125, -17.5, 1200.5, 3e4, 0.0031],
    "location": {
        "city": "Utrecht",
        "coordinates": {"lat": 52.0907, "lon": 5.1214},
        "tags": ["weather", "v2", "café"]
    },
    "history": [
        {"at": 1700000000, "status": "ok"},
        {"at": 1700000600, "status": "degraded"},
        {"at": 1700001200, "status": "ok"}
    ]
}"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("reader/parse", |b| {
        b.iter(|| parse(SAMPLE).expect("sample document is valid"));
    });
}

fn bench_write(c: &mut Criterion) {
    let value = parse(SAMPLE).expect("sample document is valid");
    c.bench_function("writer/compact", |b| b.iter(|| value.to_text()));
    c.bench_function("writer/indented", |b| b.iter(|| value.to_text_pretty()));
}

fn bench_round_trip(c: &mut Criterion) {
    c.bench_function("codec/round-trip", |b| {
        b.iter(|| {
            let value = parse(SAMPLE).expect("sample document is valid");
            let text = value.to_text();
            (value, text)
        });
    });
}

criterion_group!(codec, bench_parse, bench_write, bench_round_trip);
criterion_main!(codec);
