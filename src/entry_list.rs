use std::collections::{HashMap, HashSet};

use crate::fields::{is_valid_team_name, normalize_name_key};
use crate::model::{Driver, EntryListRecord, Race};

/// Car model codes mapped to the team that runs them, for entries without an
/// explicit team.
pub const MODEL_TO_TEAM: &[(&str, &str)] = &[
    ("gp_2026_w17", "Mercedes"),
    ("gp_2026_sf26", "Ferrari"),
    ("gp_2026_a526", "Alpine"),
    ("gp_2026_rb22", "Red Bull"),
    ("gp_2026_vcarb03", "VCARB"),
    ("gp_2026_cad26", "Cadillac"),
];

pub fn team_for_model(model: &str) -> Option<&'static str> {
    let model = model.trim();
    MODEL_TO_TEAM
        .iter()
        .find(|(code, _)| *code == model)
        .map(|(_, team)| *team)
}

impl EntryListRecord {
    /// Explicit team, else the team mapped from the car model, else empty.
    pub fn resolved_team(&self) -> String {
        if let Some(team) = self.team.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return team.to_string();
        }
        self.model
            .as_deref()
            .and_then(team_for_model)
            .unwrap_or_default()
            .to_string()
    }
}

/// Normalized name keys of every driver appearing in any race result.
pub fn collect_race_name_keys(races: &[Race]) -> HashSet<String> {
    races
        .iter()
        .flat_map(|race| race.results.iter())
        .map(|r| normalize_name_key(&r.driver_name))
        .filter(|k| !k.is_empty())
        .collect()
}

/// Reconcile standings with the roster. Drivers are matched by normalized
/// name key, so the output never holds two drivers with the same key.
/// Roster-only drivers surface with 0 points. Output keeps first-seen order.
pub fn merge_drivers_with_entry(
    drivers: &[Driver],
    entry: &[EntryListRecord],
    race_keys: &HashSet<String>,
) -> Vec<Driver> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Driver> = Vec::new();

    for d in drivers {
        let key = normalize_name_key(&d.driver_name);
        if key.is_empty() {
            continue;
        }
        let mut copy = d.clone();
        copy.has_result = race_keys.contains(&key) || copy.points > 0.0 || copy.wins > 0;
        copy.registered_only = false;
        match index.get(&key).copied() {
            // Same driver listed twice in the standings: the later row wins.
            Some(idx) => out[idx] = copy,
            None => {
                index.insert(key, out.len());
                out.push(copy);
            }
        }
    }

    for e in entry {
        let key = normalize_name_key(&e.name);
        if key.is_empty() {
            continue;
        }
        let raced = race_keys.contains(&key);
        let entry_team = e.resolved_team();
        match index.get(&key).copied() {
            Some(idx) => {
                let d = &mut out[idx];
                if !is_valid_team_name(&d.team) && is_valid_team_name(&entry_team) {
                    d.team = entry_team;
                }
                d.registered_only = !raced && d.points == 0.0 && d.wins == 0;
            }
            None => {
                let mut nd = Driver::new(&e.name, &entry_team);
                nd.has_result = raced;
                nd.registered_only = !raced;
                index.insert(key, out.len());
                out.push(nd);
            }
        }
    }
    out
}
