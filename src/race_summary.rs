use std::cmp::Ordering;

use serde::Serialize;

use crate::display::ms_to_clock;
use crate::model::{FastestLap, OvertakeLeader, Race, RaceResult, ResultStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub driver_name: String,
    pub team: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    pub winner: Option<Winner>,
    pub fastest_lap: Option<FastestLap>,
    pub most_overtakes: Option<OvertakeLeader>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TyreClass {
    Hard,
    Medium,
    Soft,
    Inter,
    Wet,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TyreMark {
    pub compound: String,
    pub class: TyreClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResultNote {
    Dnf,
    Dsq,
    Penalty { seconds: f64 },
    NoCompoundChange,
    FastestLap,
    Overtakes { gained: i64 },
}

impl ResultNote {
    pub fn label(&self) -> String {
        match self {
            ResultNote::Dnf => "DNF".to_string(),
            ResultNote::Dsq => "DSQ".to_string(),
            ResultNote::Penalty { seconds } => format!("+{seconds:.1}s"),
            ResultNote::NoCompoundChange => "NO CHANGE".to_string(),
            ResultNote::FastestLap => "FL".to_string(),
            ResultNote::Overtakes { gained } => format!("+{gained}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub pos: Option<u32>,
    pub driver_name: String,
    pub team: String,
    pub tyres: Vec<TyreMark>,
    pub tyre_end: Option<String>,
    pub time: String,
    pub points: f64,
    pub notes: Vec<ResultNote>,
    pub fastest_lap: bool,
    pub most_overtakes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceCard {
    pub round: Option<u32>,
    pub date: String,
    pub track_name: String,
    pub summary: RaceSummary,
    pub rows: Vec<ResultRow>,
}

/// Results ordered by finishing position; unclassified rows go last, ties keep
/// input order.
pub fn results_by_pos(race: &Race) -> Vec<&RaceResult> {
    let mut rows: Vec<&RaceResult> = race.results.iter().collect();
    rows.sort_by_key(|r| r.pos.unwrap_or(u32::MAX));
    rows
}

/// First non-DSQ result by position, else the first result at all.
pub fn winner_of(race: &Race) -> Option<&RaceResult> {
    let rows = results_by_pos(race);
    rows.iter()
        .find(|r| !r.status.is_dsq())
        .or_else(|| rows.first())
        .copied()
}

pub fn fastest_lap_of(race: &Race) -> Option<&FastestLap> {
    race.fastest_lap.as_ref()
}

/// Precomputed leader if present, else the largest positive grid-to-finish gain.
/// Equal gains keep the earlier result.
pub fn most_overtakes_of(race: &Race) -> Option<OvertakeLeader> {
    if let Some(mo) = race.most_overtakes.as_ref() {
        return Some(mo.clone());
    }

    let mut best: Option<OvertakeLeader> = None;
    for r in &race.results {
        if r.status.is_dsq() {
            continue;
        }
        let (Some(grid), Some(pos)) = (r.grid, r.pos) else {
            continue;
        };
        let gained = grid as i64 - pos as i64;
        if gained <= 0 {
            continue;
        }
        if best.as_ref().is_none_or(|b| gained > b.gained) {
            best = Some(OvertakeLeader {
                driver_name: r.driver_name.clone(),
                gained,
            });
        }
    }
    best
}

pub fn summarize_race(race: &Race) -> RaceSummary {
    RaceSummary {
        winner: winner_of(race).map(|w| Winner {
            driver_name: w.driver_name.clone(),
            team: w.team.clone(),
        }),
        fastest_lap: fastest_lap_of(race).cloned(),
        most_overtakes: most_overtakes_of(race),
    }
}

pub fn build_race_card(race: &Race) -> RaceCard {
    let summary = summarize_race(race);
    let fl_driver = summary
        .fastest_lap
        .as_ref()
        .map(|fl| fl.driver_name.as_str())
        .filter(|name| !name.is_empty());
    let mo = summary.most_overtakes.as_ref();

    let rows = results_by_pos(race)
        .into_iter()
        .map(|r| {
            let is_fl = fl_driver.is_some_and(|name| name == r.driver_name);
            let is_mo = mo.is_some_and(|m| m.driver_name == r.driver_name);
            let mut notes = status_notes(r);
            if r.no_compound_change {
                notes.push(ResultNote::NoCompoundChange);
            }
            if is_fl {
                notes.push(ResultNote::FastestLap);
            }
            if let Some(m) = mo.filter(|m| is_mo && m.gained != 0) {
                notes.push(ResultNote::Overtakes { gained: m.gained });
            }
            ResultRow {
                pos: r.pos,
                driver_name: r.driver_name.clone(),
                team: r.team.clone(),
                tyres: tyre_marks(&r.tyres_used, r.tyre_end.as_deref()),
                tyre_end: r.tyre_end.as_ref().map(|t| t.trim().to_uppercase()),
                time: result_time_text(r),
                points: r.points.unwrap_or(0.0),
                notes,
                fastest_lap: is_fl,
                most_overtakes: is_mo,
            }
        })
        .collect();

    RaceCard {
        round: race.round,
        date: race.date.clone(),
        track_name: race.track_name.clone(),
        summary,
        rows,
    }
}

/// Latest round first, then latest date.
pub fn history_order(a: &Race, b: &Race) -> Ordering {
    b.round
        .unwrap_or(0)
        .cmp(&a.round.unwrap_or(0))
        .then_with(|| b.date.cmp(&a.date))
}

pub fn build_race_history(races: &[Race]) -> Vec<RaceCard> {
    let mut ordered: Vec<&Race> = races.iter().collect();
    ordered.sort_by(|a, b| history_order(a, b));
    ordered.into_iter().map(build_race_card).collect()
}

pub fn tyre_class(compound: &str) -> TyreClass {
    let s = compound.trim().to_uppercase();
    match s.as_str() {
        "H" | "HARD" | "C1" | "C2" => TyreClass::Hard,
        "M" | "MEDIUM" | "C3" => TyreClass::Medium,
        "S" | "SOFT" | "C4" | "C5" => TyreClass::Soft,
        "I" | "INTER" | "INTERS" | "IM" | "INT" => TyreClass::Inter,
        "W" | "WET" | "RAIN" => TyreClass::Wet,
        _ if is_c_compound(&s) => TyreClass::Soft,
        _ => TyreClass::Unknown,
    }
}

fn is_c_compound(s: &str) -> bool {
    s.strip_prefix('C')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Compounds used across the race, or just the final one when none are listed.
fn tyre_marks(used: &[String], end: Option<&str>) -> Vec<TyreMark> {
    let list: Vec<String> = if used.is_empty() {
        end.map(|e| e.trim().to_uppercase())
            .filter(|e| !e.is_empty())
            .into_iter()
            .collect()
    } else {
        used.iter().map(|t| t.trim().to_uppercase()).collect()
    };
    list.into_iter()
        .map(|compound| TyreMark {
            class: tyre_class(&compound),
            compound,
        })
        .collect()
}

fn status_notes(r: &RaceResult) -> Vec<ResultNote> {
    let mut notes = Vec::new();
    match r.status {
        ResultStatus::Dnf => notes.push(ResultNote::Dnf),
        ResultStatus::Dsq => notes.push(ResultNote::Dsq),
        _ => {}
    }
    if let Some(ms) = r.penalty_extra_ms.filter(|ms| *ms > 0.0) {
        notes.push(ResultNote::Penalty {
            seconds: ms / 1000.0,
        });
    }
    notes
}

fn result_time_text(r: &RaceResult) -> String {
    r.final_time_ms
        .and_then(ms_to_clock)
        .or_else(|| r.final_time.clone())
        .unwrap_or_default()
}
