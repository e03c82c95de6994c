use anyhow::{Context, Result};
use serde_json::Value;

use crate::fields::{
    as_f64, as_string, compare_names, pick, pick_f64, pick_f64_or, pick_position,
    pick_positive_u32, pick_string, pick_string_or, pick_truthy,
};
use crate::model::{
    Championship, ChampionshipMeta, Driver, EntryListRecord, FastestLap, OvertakeLeader, Race,
    RaceResult, ResultStatus,
};

const NAME_KEYS: &[&str] = &["driverName", "driver", "name"];
const TEAM_KEYS: &[&str] = &["team", "constructor", "teamName"];
const POINTS_KEYS: &[&str] = &["points", "pts", "score", "puntos"];
const WINS_KEYS: &[&str] = &["wins", "victories"];
const POS_KEYS: &[&str] = &["pos", "position"];
const GRID_KEYS: &[&str] = &["grid", "startPos", "start", "gridPos", "qualPos", "qualiPos"];
const TYRE_KEYS: &[&str] = &[
    "tyre",
    "tire",
    "compound",
    "tyres",
    "tires",
    "finishTyre",
    "finishTire",
    "finalTyre",
    "finalTire",
    "endTyre",
    "endTire",
    "tyreEnd",
    "tireEnd",
    "tyreFinish",
    "tireFinish",
];
const TYRES_USED_KEYS: &[&str] = &["tyresUsed", "tiresUsed", "compoundsUsed"];
const TYRE_OBJECT_PREVIEW: usize = 24;

pub fn parse_championship_json(raw: &str) -> Result<Championship> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Championship::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid championship json")?;
    Ok(championship_from_value(&root))
}

pub fn championship_from_value(root: &Value) -> Championship {
    let meta = parse_meta(root.get("meta").unwrap_or(&Value::Null));

    let races = ["races", "rounds"]
        .iter()
        .find_map(|k| root.get(*k).and_then(|v| v.as_array()))
        .map(|arr| arr.iter().filter(|v| v.is_object()).map(parse_race).collect())
        .unwrap_or_default();

    let standings = root
        .get("standings")
        .and_then(|s| s.get("drivers"))
        .and_then(|d| d.as_array())
        .map(|arr| arr.iter().filter_map(parse_standings_driver).collect())
        .unwrap_or_default();

    Championship {
        meta,
        races,
        standings,
    }
}

pub fn parse_entry_list_json(raw: &str) -> Result<Vec<EntryListRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid entry list json")?;
    Ok(entry_list_from_value(&root))
}

pub fn entry_list_from_value(root: &Value) -> Vec<EntryListRecord> {
    let Some(list) = ["EntryList", "entryList", "entry_list"]
        .iter()
        .find_map(|k| root.get(*k))
    else {
        return Vec::new();
    };

    let items: Vec<&Value> = match list {
        Value::Object(map) => map.values().collect(),
        Value::Array(arr) => arr.iter().collect(),
        _ => return Vec::new(),
    };

    let mut out: Vec<EntryListRecord> = items
        .into_iter()
        .filter_map(|v| {
            let name = pick_string(v, &["Name", "name"])?;
            Some(EntryListRecord {
                name,
                team: pick_string(v, &["Team", "team"]),
                model: pick_string(v, &["Model", "model"]),
            })
        })
        .collect();
    // Stable alphabetical order for a roster with no races yet.
    out.sort_by(|a, b| compare_names(&a.name, &b.name));
    out
}

fn parse_meta(v: &Value) -> ChampionshipMeta {
    let points = v.get("points").and_then(|p| p.as_array()).map(|arr| {
        arr.iter()
            .map(|slot| as_f64(slot).unwrap_or(0.0))
            .collect::<Vec<_>>()
    });
    ChampionshipMeta {
        season: pick_string(v, &["season"]),
        updated_at: pick_string(v, &["updatedAt"]),
        points,
    }
}

fn parse_race(v: &Value) -> Race {
    let results = ["results", "classification"]
        .iter()
        .find_map(|k| v.get(*k).and_then(|r| r.as_array()))
        .map(|arr| arr.iter().filter_map(parse_result).collect())
        .unwrap_or_default();

    Race {
        round: pick_positive_u32(v, &["round"]),
        date: pick_string_or(v, &["date", "day"], ""),
        track_name: pick_string_or(v, &["trackName", "track", "name", "gp", "title"], ""),
        results,
        fastest_lap: parse_fastest_lap(pick(v, &["fastestLap", "fastLap"])),
        most_overtakes: parse_overtake_leader(pick(
            v,
            &["mostOvertakes", "mostOvertake", "overtakesLeader"],
        )),
    }
}

fn parse_result(v: &Value) -> Option<RaceResult> {
    let driver_name = pick_string(v, NAME_KEYS)?;
    let status = pick_string(v, &["status"])
        .map(|s| ResultStatus::from_raw(&s))
        .unwrap_or_default();

    Some(RaceResult {
        driver_name,
        team: pick_string_or(v, TEAM_KEYS, ""),
        pos: pick_position(v, POS_KEYS),
        status,
        points: pick_f64(v, POINTS_KEYS).map(|p| p.max(0.0)),
        grid: pick_positive_u32(v, GRID_KEYS),
        tyre_end: pick_tyre(v),
        tyres_used: pick_tyres_used(v),
        no_compound_change: pick_truthy(v, &["noCompoundChange"]),
        penalty_extra_ms: pick_f64(v, &["penaltyExtraMs"]),
        final_time_ms: pick_f64(v, &["finalTimeMs"]),
        final_time: pick_string(v, &["finalTime"]),
    })
}

fn parse_standings_driver(v: &Value) -> Option<Driver> {
    let name = pick_string(v, NAME_KEYS)?;
    let mut driver = Driver::new(&name, &pick_string_or(v, TEAM_KEYS, ""));
    driver.points = pick_f64_or(v, POINTS_KEYS, 0.0).max(0.0);
    driver.wins = pick_f64(v, WINS_KEYS)
        .map(|w| w.max(0.0).floor() as u32)
        .unwrap_or(0);
    Some(driver)
}

fn parse_fastest_lap(v: Option<&Value>) -> Option<FastestLap> {
    let v = v?;
    if !v.is_object() {
        return None;
    }
    Some(FastestLap {
        driver_name: pick_string_or(v, &["driverName", "driver"], ""),
        time: pick_string(v, &["time", "lapTime"]),
    })
}

/// Precomputed leader, only when it names a driver and carries a finite gain.
fn parse_overtake_leader(v: Option<&Value>) -> Option<OvertakeLeader> {
    let v = v?;
    let driver_name = pick_string(v, &["driverName", "driver"])?;
    let gained = pick(v, &["gained", "positions", "overtakes"]).and_then(as_f64)?;
    Some(OvertakeLeader {
        driver_name,
        gained: gained.floor() as i64,
    })
}

/// Final compound. Scalars win over objects; an object contributes its
/// `compound` or `name`, else a short JSON preview.
fn pick_tyre(v: &Value) -> Option<String> {
    let candidates: Vec<&Value> = TYRE_KEYS.iter().filter_map(|k| v.get(*k)).collect();
    for c in &candidates {
        match c {
            Value::String(s) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => {
                return Some(n.to_string());
            }
            _ => {}
        }
    }
    let obj = candidates.into_iter().find(|c| c.is_object())?;
    if let Some(s) = obj.get("compound").and_then(|x| x.as_str()) {
        return Some(s.to_string());
    }
    if let Some(s) = obj.get("name").and_then(|x| x.as_str()) {
        return Some(s.to_string());
    }
    let text = obj.to_string();
    if text.chars().count() > TYRE_OBJECT_PREVIEW {
        Some(format!(
            "{}…",
            text.chars().take(TYRE_OBJECT_PREVIEW).collect::<String>()
        ))
    } else {
        Some(text)
    }
}

fn pick_tyres_used(v: &Value) -> Vec<String> {
    TYRES_USED_KEYS
        .iter()
        .find_map(|k| v.get(*k).and_then(|x| x.as_array()))
        .map(|arr| arr.iter().filter_map(as_string).collect())
        .unwrap_or_default()
}
