use serde::{Deserialize, Serialize};

pub const DEFAULT_POINTS: [f64; 10] = [20.0, 17.0, 14.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0, 1.0];

/// Literal team name used for unassigned drivers under `TeamPolicy::Bucket`.
pub const UNASSIGNED_TEAM: &str = "—";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    #[default]
    Ok,
    Dnf,
    Dsq,
    Other(String),
}

impl ResultStatus {
    pub fn from_raw(raw: &str) -> Self {
        let s = raw.trim().to_uppercase();
        match s.as_str() {
            "" | "OK" => ResultStatus::Ok,
            "DNF" => ResultStatus::Dnf,
            "DSQ" => ResultStatus::Dsq,
            _ => ResultStatus::Other(s),
        }
    }

    pub fn is_dsq(&self) -> bool {
        matches!(self, ResultStatus::Dsq)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub driver_name: String,
    pub team: String,
    // None when absent or not positive (unclassified).
    pub pos: Option<u32>,
    pub status: ResultStatus,
    pub points: Option<f64>,
    pub grid: Option<u32>,
    pub tyre_end: Option<String>,
    pub tyres_used: Vec<String>,
    pub no_compound_change: bool,
    pub penalty_extra_ms: Option<f64>,
    pub final_time_ms: Option<f64>,
    pub final_time: Option<String>,
}

impl RaceResult {
    pub fn new(driver_name: &str, pos: Option<u32>) -> Self {
        Self {
            driver_name: driver_name.trim().to_string(),
            pos,
            ..Self::default()
        }
    }

    /// Positive finishing position and not disqualified.
    pub fn is_classified(&self) -> bool {
        self.pos.is_some_and(|p| p > 0) && !self.status.is_dsq()
    }

    pub fn is_win(&self) -> bool {
        self.pos == Some(1) && !self.status.is_dsq()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastestLap {
    pub driver_name: String,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertakeLeader {
    pub driver_name: String,
    pub gained: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub round: Option<u32>,
    pub date: String,
    pub track_name: String,
    pub results: Vec<RaceResult>,
    pub fastest_lap: Option<FastestLap>,
    pub most_overtakes: Option<OvertakeLeader>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_name: String,
    pub team: String,
    pub points: f64,
    pub wins: u32,
    pub has_result: bool,
    pub registered_only: bool,
}

impl Driver {
    pub fn new(driver_name: &str, team: &str) -> Self {
        Self {
            driver_name: driver_name.trim().to_string(),
            team: team.trim().to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team: String,
    pub points: f64,
    pub wins: u32,
    pub drivers: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListRecord {
    pub name: String,
    pub team: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipMeta {
    pub season: Option<String>,
    pub updated_at: Option<String>,
    pub points: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Championship {
    pub meta: ChampionshipMeta,
    pub races: Vec<Race>,
    pub standings: Vec<Driver>,
}

impl Championship {
    /// Has either precomputed standings or at least one race.
    pub fn looks_usable(&self) -> bool {
        !self.standings.is_empty() || !self.races.is_empty()
    }

    pub fn has_race_results(&self) -> bool {
        self.races.iter().any(|r| !r.results.is_empty())
    }

    /// The document's own table, else `fallback`.
    pub fn points_table(&self, fallback: &[f64]) -> Vec<f64> {
        self.meta
            .points
            .clone()
            .unwrap_or_else(|| fallback.to_vec())
    }
}
