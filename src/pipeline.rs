use chrono::Local;
use log::{debug, info};
use serde::Serialize;

use crate::config::StandingsConfig;
use crate::entry_list::{collect_race_name_keys, merge_drivers_with_entry};
use crate::model::{Championship, DEFAULT_POINTS, Driver, EntryListRecord, Team};
use crate::points::assign_all_points;
use crate::race_summary::{RaceCard, build_race_history};
use crate::source::{FetchOptions, Source, load_championship, load_entry_list};
use crate::standings::{
    TeamPolicy, compute_teams_from_drivers, resolve_drivers, sort_leaderboard, sort_teams,
};

/// Inputs threaded through one load → build pass.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub entry_list: Vec<EntryListRecord>,
    pub team_policy: TeamPolicy,
    /// Used when the document carries no `meta.points` of its own.
    pub default_points: Vec<f64>,
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new(Vec::new(), TeamPolicy::default())
    }
}

impl PipelineContext {
    pub fn new(entry_list: Vec<EntryListRecord>, team_policy: TeamPolicy) -> Self {
        Self {
            entry_list,
            team_policy,
            default_points: DEFAULT_POINTS.to_vec(),
        }
    }

    pub fn with_default_points(mut self, table: Vec<f64>) -> Self {
        self.default_points = table;
        self
    }
}

/// Ordered championship state handed to the presentation layer.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsView {
    pub season: Option<String>,
    pub updated_at: String,
    pub points_table: Vec<f64>,
    pub drivers: Vec<Driver>,
    pub teams: Vec<Team>,
    pub races: Vec<RaceCard>,
}

impl StandingsView {
    /// Nothing to show; the caller should offer a manual load instead.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.teams.is_empty() && self.races.is_empty()
    }
}

/// Run the whole derivation on a championship document. The input is not
/// modified; points are assigned on a private copy of the races. A missing
/// `updatedAt` stays empty here.
pub fn build_standings(champ: &Championship, ctx: &PipelineContext) -> StandingsView {
    let table = champ.points_table(&ctx.default_points);
    let mut champ = champ.clone();
    assign_all_points(&mut champ.races, &table);

    let drivers = resolve_drivers(&champ);
    let race_keys = collect_race_name_keys(&champ.races);
    let mut drivers = merge_drivers_with_entry(&drivers, &ctx.entry_list, &race_keys);
    sort_leaderboard(&mut drivers);

    let mut teams = compute_teams_from_drivers(&drivers, ctx.team_policy);
    sort_teams(&mut teams);

    let races = build_race_history(&champ.races);
    debug!(
        "built standings: {} drivers, {} teams, {} races",
        drivers.len(),
        teams.len(),
        races.len()
    );

    StandingsView {
        season: champ.meta.season.clone(),
        updated_at: champ.meta.updated_at.clone().unwrap_or_default(),
        points_table: table,
        drivers,
        teams,
        races,
    }
}

/// Usable championship first; otherwise an empty season so the roster still
/// shows with 0 points; otherwise nothing.
pub fn build_with_fallback(champ: Option<&Championship>, ctx: &PipelineContext) -> StandingsView {
    if let Some(champ) = champ.filter(|c| c.looks_usable()) {
        return build_standings(champ, ctx);
    }
    if !ctx.entry_list.is_empty() {
        info!(
            "no usable championship, showing {} registered drivers",
            ctx.entry_list.len()
        );
        return build_standings(&Championship::default(), ctx);
    }
    StandingsView::default()
}

pub fn load_and_build(cfg: &StandingsConfig) -> StandingsView {
    let opts = FetchOptions {
        timeout: cfg.http_timeout,
        cache_bust: cfg.cache_bust,
    };
    let entry_list = load_entry_list(&Source::parse(cfg.entrylist_source()), &opts);
    let ctx = PipelineContext::new(entry_list, cfg.team_policy);

    let champ = match load_championship(&Source::parse(&cfg.source), &opts) {
        Ok(champ) => Some(champ),
        Err(err) => {
            info!("championship unavailable: {err:#}");
            None
        }
    };
    let mut view = build_with_fallback(champ.as_ref(), &ctx);
    if view.updated_at.is_empty() && !view.is_empty() {
        view.updated_at = rendered_at_now();
    }
    view
}

fn rendered_at_now() -> String {
    Local::now().format("%d/%m/%Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Race, RaceResult};

    fn entry(name: &str) -> EntryListRecord {
        EntryListRecord {
            name: name.to_string(),
            ..EntryListRecord::default()
        }
    }

    #[test]
    fn nothing_usable_yields_empty_view() {
        let view = build_with_fallback(None, &PipelineContext::default());
        assert!(view.is_empty());
        let view = build_with_fallback(Some(&Championship::default()), &PipelineContext::default());
        assert!(view.is_empty());
    }

    #[test]
    fn roster_alone_shows_registered_drivers() {
        let ctx = PipelineContext::new(vec![entry("B"), entry("A")], TeamPolicy::Exclude);
        let view = build_with_fallback(None, &ctx);
        assert_eq!(view.drivers.len(), 2);
        assert_eq!(view.drivers[0].driver_name, "A");
        assert!(view.drivers.iter().all(|d| d.registered_only && d.points == 0.0));
        assert_eq!(view.points_table.len(), 10);
        assert!(view.updated_at.is_empty());
    }

    #[test]
    fn context_points_fill_in_for_missing_meta_table() {
        let champ = Championship {
            races: vec![Race {
                results: vec![RaceResult::new("A", Some(1)), RaceResult::new("B", Some(2))],
                ..Race::default()
            }],
            ..Championship::default()
        };
        let ctx = PipelineContext::default().with_default_points(vec![10.0, 6.0]);
        let view = build_standings(&champ, &ctx);
        assert_eq!(view.points_table, vec![10.0, 6.0]);
        assert_eq!(view.drivers[0].points, 10.0);
        assert_eq!(view.drivers[1].points, 6.0);

        let mut with_meta = champ.clone();
        with_meta.meta.points = Some(vec![3.0, 1.0]);
        assert_eq!(build_standings(&with_meta, &ctx).drivers[0].points, 3.0);
    }

    #[test]
    fn missing_updated_at_does_not_read_the_clock() {
        let champ = Championship {
            races: vec![Race {
                results: vec![RaceResult::new("A", Some(1))],
                ..Race::default()
            }],
            ..Championship::default()
        };
        let first = build_standings(&champ, &PipelineContext::default());
        assert_eq!(first.updated_at, "");
        let second = build_standings(&champ, &PipelineContext::default());
        assert_eq!(first.drivers, second.drivers);
        assert_eq!(first.updated_at, second.updated_at);
    }

    #[test]
    fn input_document_is_left_untouched() {
        let champ = Championship {
            races: vec![Race {
                results: vec![RaceResult::new("A", Some(1))],
                ..Race::default()
            }],
            ..Championship::default()
        };
        let view = build_standings(&champ, &PipelineContext::default());
        assert_eq!(view.drivers[0].points, 20.0);
        assert!(champ.races[0].results[0].points.is_none());
    }
}
