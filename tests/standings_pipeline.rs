use std::fs;
use std::path::PathBuf;

use paddock_standings::model::EntryListRecord;
use paddock_standings::parsing::{parse_championship_json, parse_entry_list_json};
use paddock_standings::pipeline::{PipelineContext, StandingsView, build_standings};
use paddock_standings::race_summary::ResultNote;
use paddock_standings::standings::TeamPolicy;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn entry_list() -> Vec<EntryListRecord> {
    parse_entry_list_json(&read_fixture("entrylist.json")).expect("entry list should parse")
}

fn build(champ_fixture: &str, entry: Vec<EntryListRecord>, policy: TeamPolicy) -> StandingsView {
    let champ = parse_championship_json(&read_fixture(champ_fixture)).expect("fixture should parse");
    build_standings(&champ, &PipelineContext::new(entry, policy))
}

#[test]
fn drivers_are_recomputed_merged_and_ranked() {
    let view = build("championship.json", entry_list(), TeamPolicy::Exclude);

    let names: Vec<&str> = view.drivers.iter().map(|d| d.driver_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Max Verstappen",
            "Lia Gomez",
            "Juan Perez",
            "Tom Nobody",
            "Carl Out",
            "Aaron Reserve",
            "New Rookie",
        ]
    );

    let max = &view.drivers[0];
    assert_eq!(max.points, 45.0);
    assert_eq!(max.wins, 1);
    assert_eq!(max.team, "Red Bull");
    assert!(max.has_result && !max.registered_only);

    let juan = &view.drivers[2];
    assert_eq!(juan.points, 17.0);
    assert_eq!(juan.wins, 0);
    // A valid team from the results is never replaced by the roster.
    assert_eq!(juan.team, "Ferrari");

    let carl = &view.drivers[4];
    assert_eq!(carl.points, 0.0);
    assert!(carl.has_result && !carl.registered_only);

    let rookie = &view.drivers[6];
    assert_eq!(rookie.team, "Cadillac");
    assert!(rookie.registered_only && !rookie.has_result);
}

#[test]
fn team_board_excludes_unassigned_by_default() {
    let view = build("championship.json", entry_list(), TeamPolicy::Exclude);
    let teams: Vec<(&str, f64, u32)> = view
        .teams
        .iter()
        .map(|t| (t.team.as_str(), t.points, t.drivers))
        .collect();
    assert_eq!(
        teams,
        vec![
            ("Red Bull", 45.0, 1),
            ("Alpine", 34.0, 1),
            ("Ferrari", 17.0, 1),
            ("Cadillac", 0.0, 2),
        ]
    );
    assert_eq!(view.teams[0].wins, 1);
}

#[test]
fn bucket_policy_adds_dash_team() {
    let view = build("championship.json", entry_list(), TeamPolicy::Bucket);
    let dash = view
        .teams
        .iter()
        .position(|t| t.team == "—")
        .expect("bucket team");
    assert_eq!(dash, 3);
    assert_eq!(view.teams[dash].points, 15.0);
    assert_eq!(view.teams[dash].drivers, 2);
}

#[test]
fn race_history_is_latest_first_with_summaries() {
    let view = build("championship.json", Vec::new(), TeamPolicy::Exclude);
    assert_eq!(view.season.as_deref(), Some("Temporada 2026"));
    assert_eq!(view.updated_at, "12/03/2026 21:40");
    assert_eq!(view.races.len(), 2);

    let jeddah = &view.races[0];
    assert_eq!(jeddah.track_name, "Jeddah");
    let winner = jeddah.summary.winner.as_ref().expect("winner");
    assert_eq!(winner.driver_name, "Lia Gomez");
    assert_eq!(winner.team, "Alpine");
    assert_eq!(jeddah.summary.most_overtakes.as_ref().unwrap().gained, 6);
    assert!(jeddah.summary.fastest_lap.is_none());
    assert_eq!(jeddah.rows[0].notes, vec![ResultNote::Dsq]);
    assert_eq!(jeddah.rows[0].points, 0.0);
    assert_eq!(jeddah.rows[2].points, 25.0);

    let bahrain = &view.races[1];
    assert_eq!(bahrain.summary.winner.as_ref().unwrap().driver_name, "Max Verstappen");
    let mo = bahrain.summary.most_overtakes.as_ref().expect("computed leader");
    assert_eq!(mo.driver_name, "Juan Perez");
    assert_eq!(mo.gained, 7);
    assert_eq!(bahrain.rows[0].time, "92:03.45");
    assert!(bahrain.rows[0].fastest_lap);
    assert_eq!(bahrain.rows[2].notes[0].label(), "+5.0s");
    let last = bahrain.rows.last().unwrap();
    assert_eq!(last.driver_name, "Carl Out");
    assert_eq!(last.notes, vec![ResultNote::Dnf]);
}

#[test]
fn placeholder_standings_are_recomputed() {
    let view = build("championship_stale_standings.json", Vec::new(), TeamPolicy::Exclude);
    assert_eq!(view.drivers[0].driver_name, "A");
    assert_eq!(view.drivers[0].points, 10.0);
    assert_eq!(view.drivers[0].wins, 1);
    assert_eq!(view.drivers[1].points, 5.0);
}

#[test]
fn authoritative_standings_are_trusted() {
    let view = build("championship_authoritative.json", Vec::new(), TeamPolicy::Exclude);
    assert_eq!(view.drivers.len(), 2);
    assert_eq!(view.drivers[0].driver_name, "B");
    assert_eq!(view.drivers[0].points, 55.0);
    assert_eq!(view.drivers[1].points, 40.0);
    assert_eq!(view.drivers[1].wins, 2);
    assert_eq!(view.teams[0].team, "Blue");
}

#[test]
fn rebuilding_is_idempotent() {
    let champ = parse_championship_json(&read_fixture("championship.json")).unwrap();
    let ctx = PipelineContext::new(entry_list(), TeamPolicy::Exclude);
    let first = build_standings(&champ, &ctx);
    let second = build_standings(&champ, &ctx);
    assert_eq!(first.drivers, second.drivers);
    assert_eq!(first.teams, second.teams);
    assert_eq!(first.races, second.races);
}
