use std::collections::HashSet;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

use paddock_standings::entry_list::{collect_race_name_keys, merge_drivers_with_entry};
use paddock_standings::model::Championship;
use paddock_standings::parsing::{parse_championship_json, parse_entry_list_json};
use paddock_standings::pipeline::{PipelineContext, build_standings};
use paddock_standings::standings::{TeamPolicy, compute_drivers_from_races};

const TEAMS: &[&str] = &[
    "Red Bull", "Ferrari", "McLaren", "Mercedes", "Alpine", "Williams", "Haas", "Sauber",
    "Aston Martin", "Cadillac",
];

/// A full season: 24 rounds, 22 drivers, positions rotated each round.
fn synthetic_season_json() -> String {
    let drivers = 22usize;
    let races: Vec<_> = (0..24usize)
        .map(|round| {
            let results: Vec<_> = (0..drivers)
                .map(|slot| {
                    let idx = (slot + round * 3) % drivers;
                    json!({
                        "driverName": format!("Driver {idx:02}"),
                        "team": TEAMS[idx % TEAMS.len()],
                        "pos": slot + 1,
                        "grid": drivers - slot,
                        "tyresUsed": ["S", "M"],
                        "finalTimeMs": 5_400_000 + slot * 1_250,
                    })
                })
                .collect();
            json!({
                "round": round + 1,
                "date": format!("2026-{:02}-{:02}", 3 + round / 4, 1 + (round % 4) * 7),
                "trackName": format!("Track {round}"),
                "results": results,
            })
        })
        .collect();
    json!({
        "meta": { "season": "Bench", "updatedAt": "01/01/2026 00:00" },
        "races": races,
        "standings": { "drivers": [] },
    })
    .to_string()
}

fn synthetic_entry_json() -> String {
    let rows: Vec<_> = (0..26usize)
        .map(|idx| json!({ "name": format!("driver {idx:02}"), "model": "gp_2026_cad26" }))
        .collect();
    json!({ "EntryList": rows }).to_string()
}

fn bench_championship_parse(c: &mut Criterion) {
    let raw = synthetic_season_json();
    c.bench_function("championship_parse", |b| {
        b.iter(|| {
            let champ = parse_championship_json(black_box(&raw)).unwrap();
            black_box(champ.races.len());
        })
    });
}

fn bench_driver_aggregation(c: &mut Criterion) {
    let champ = parse_championship_json(&synthetic_season_json()).unwrap();
    c.bench_function("driver_aggregation", |b| {
        b.iter(|| {
            let drivers = compute_drivers_from_races(black_box(&champ.races));
            black_box(drivers.len());
        })
    });
}

fn bench_entry_merge(c: &mut Criterion) {
    let champ = parse_championship_json(&synthetic_season_json()).unwrap();
    let entry = parse_entry_list_json(&synthetic_entry_json()).unwrap();
    let drivers = compute_drivers_from_races(&champ.races);
    let keys: HashSet<String> = collect_race_name_keys(&champ.races);
    c.bench_function("entry_merge", |b| {
        b.iter(|| {
            let merged = merge_drivers_with_entry(black_box(&drivers), &entry, &keys);
            black_box(merged.len());
        })
    });
}

fn bench_build_standings(c: &mut Criterion) {
    let champ: Championship = parse_championship_json(&synthetic_season_json()).unwrap();
    let entry = parse_entry_list_json(&synthetic_entry_json()).unwrap();
    let ctx = PipelineContext::new(entry, TeamPolicy::Exclude);
    c.bench_function("build_standings", |b| {
        b.iter(|| {
            let view = build_standings(black_box(&champ), &ctx);
            black_box(view.drivers.len());
        })
    });
}

criterion_group!(
    perf,
    bench_championship_parse,
    bench_driver_aggregation,
    bench_entry_merge,
    bench_build_standings
);
criterion_main!(perf);
