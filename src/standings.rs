use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::fields::{compare_names, is_valid_team_name};
use crate::model::{Championship, Driver, Race, Team, UNASSIGNED_TEAM};

/// What happens to drivers without a usable team on the team board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamPolicy {
    /// Left off the team board entirely.
    #[default]
    Exclude,
    /// Collected into a literal `—` team.
    Bucket,
}

impl TeamPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "exclude" | "drop" => Some(TeamPolicy::Exclude),
            "bucket" | "dash" => Some(TeamPolicy::Bucket),
            _ => None,
        }
    }
}

/// Fold race results into per-driver totals, keyed by the trimmed raw name.
/// The team comes from the first result that supplies one. Output keeps
/// first-appearance order; ranking is left to the sorters.
pub fn compute_drivers_from_races(races: &[Race]) -> Vec<Driver> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Driver> = Vec::new();

    for race in races {
        for r in &race.results {
            let name = r.driver_name.trim();
            if name.is_empty() {
                continue;
            }
            let idx = *index.entry(name.to_string()).or_insert_with(|| {
                out.push(Driver::new(name, ""));
                out.len() - 1
            });
            let driver = &mut out[idx];
            if driver.team.is_empty() && !r.team.trim().is_empty() {
                driver.team = r.team.trim().to_string();
            }
            driver.points += r.points.unwrap_or(0.0);
            if r.is_win() {
                driver.wins += 1;
            }
        }
    }
    out
}

/// Authoritative standings when present and meaningful, else recomputed from
/// races. A standings block summing to zero while races have results is a
/// stale placeholder.
pub fn resolve_drivers(champ: &Championship) -> Vec<Driver> {
    if champ.standings.is_empty() {
        debug!("no standings block, computing from {} races", champ.races.len());
        return compute_drivers_from_races(&champ.races);
    }
    if champ.has_race_results() {
        let sum: f64 = champ.standings.iter().map(|d| d.points).sum();
        if !sum.is_finite() || sum <= 0.0 {
            debug!("standings block sums to {sum}, recomputing from races");
            return compute_drivers_from_races(&champ.races);
        }
    }
    champ.standings.clone()
}

/// Team totals re-derived from the current driver set.
pub fn compute_teams_from_drivers(drivers: &[Driver], policy: TeamPolicy) -> Vec<Team> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Team> = Vec::new();

    for d in drivers {
        let team = d.team.trim();
        let key = if is_valid_team_name(team) {
            team
        } else {
            match policy {
                TeamPolicy::Exclude => continue,
                TeamPolicy::Bucket => UNASSIGNED_TEAM,
            }
        };
        let idx = *index.entry(key.to_string()).or_insert_with(|| {
            out.push(Team {
                team: key.to_string(),
                ..Team::default()
            });
            out.len() - 1
        });
        let t = &mut out[idx];
        t.points += d.points;
        t.wins += d.wins;
        t.drivers += 1;
    }
    out
}

/// Points, wins, then name.
pub fn standings_order(a: &Driver, b: &Driver) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| compare_names(&a.driver_name, &b.driver_name))
}

/// Leaderboard order once the entry list is merged in: points, wins, raced
/// before not-raced, registered-only last, then name.
pub fn leaderboard_order(a: &Driver, b: &Driver) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.has_result.cmp(&a.has_result))
        .then_with(|| a.registered_only.cmp(&b.registered_only))
        .then_with(|| compare_names(&a.driver_name, &b.driver_name))
}

pub fn team_order(a: &Team, b: &Team) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| compare_names(&a.team, &b.team))
}

pub fn sort_standings(drivers: &mut [Driver]) {
    drivers.sort_by(standings_order);
}

pub fn sort_leaderboard(drivers: &mut [Driver]) {
    drivers.sort_by(leaderboard_order);
}

pub fn sort_teams(teams: &mut [Team]) {
    teams.sort_by(team_order);
}
