use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::LevelFilter;

use paddock_standings::banner::resolve_team_banner;
use paddock_standings::config::{StandingsConfig, parse_level};
use paddock_standings::display::{format_driver_display_name, format_points, team_hue, team_slug};
use paddock_standings::export::export_standings_xlsx;
use paddock_standings::pipeline::{StandingsView, load_and_build};
use paddock_standings::race_summary::RaceCard;
use paddock_standings::source::{FetchOptions, Source};
use paddock_standings::standings::TeamPolicy;

#[derive(Debug, Default)]
struct CliArgs {
    source: Option<String>,
    entrylist: Option<String>,
    xlsx: Option<PathBuf>,
    team_policy: Option<TeamPolicy>,
    log_level: Option<LevelFilter>,
    json: bool,
    hide_points: bool,
    banners: bool,
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1).collect());
    let mut cfg = StandingsConfig::from_env();
    if let Some(source) = args.source.clone() {
        cfg.source = source;
    }
    if let Some(entrylist) = args.entrylist.clone() {
        cfg.entrylist_source = Some(entrylist);
    }
    if let Some(policy) = args.team_policy {
        cfg.team_policy = policy;
    }
    if let Some(level) = args.log_level {
        cfg.log_level = level;
    }
    cfg.hide_points |= args.hide_points;

    setup_logging(cfg.log_level).context("failed to set up logging")?;

    let view = load_and_build(&cfg);
    if view.is_empty() {
        println!("No standings data found in {}.", cfg.source);
        println!("Provide data/championship.json or data/entrylist.json, or pass --source=<dir|url>.");
        return Ok(());
    }

    if let Some(path) = args.xlsx.as_ref() {
        let report = export_standings_xlsx(path, &view)?;
        eprintln!(
            "Exported {} drivers, {} teams, {} race rows to {}",
            report.drivers,
            report.teams,
            report.race_rows,
            path.display()
        );
    }

    if args.json {
        let mut out = serde_json::to_value(&view).context("serialize standings")?;
        if args.banners {
            attach_banners(&mut out, &view, &cfg);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize standings")?
        );
    } else {
        print_view(&view, cfg.hide_points);
    }
    Ok(())
}

fn setup_logging(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn parse_args(args: Vec<String>) -> CliArgs {
    let mut out = CliArgs::default();
    let mut iter = args.into_iter().peekable();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| iter.next_if(|next| !next.starts_with("--")))
                .filter(|v| !v.trim().is_empty())
        };
        match flag.as_str() {
            "--source" => out.source = value(),
            "--entrylist" => out.entrylist = value(),
            "--xlsx" => out.xlsx = value().map(PathBuf::from),
            "--team-policy" => out.team_policy = value().and_then(|v| TeamPolicy::parse(&v)),
            "--log" => out.log_level = value().and_then(|v| parse_level(&v)),
            "--json" => out.json = true,
            "--hide-points" => out.hide_points = true,
            "--banners" => out.banners = true,
            other => eprintln!("ignoring unknown argument: {other}"),
        }
    }
    out
}

fn attach_banners(out: &mut serde_json::Value, view: &StandingsView, cfg: &StandingsConfig) {
    let source = Source::parse(&cfg.source);
    let opts = FetchOptions {
        timeout: cfg.http_timeout,
        cache_bust: false,
    };
    let Some(teams) = out.get_mut("teams").and_then(|t| t.as_array_mut()) else {
        return;
    };
    for (entry, team) in teams.iter_mut().zip(view.teams.iter()) {
        let banner = resolve_team_banner(&source, &team.team, &opts);
        if let Some(obj) = entry.as_object_mut() {
            obj.insert("banner".to_string(), serde_json::json!(banner));
            obj.insert(
                "hue".to_string(),
                serde_json::json!(team_hue(&team_slug(&team.team))),
            );
        }
    }
}

fn print_view(view: &StandingsView, hide_points: bool) {
    println!(
        "{}  |  Updated: {}  |  Points: {}",
        view.season.as_deref().unwrap_or("Season"),
        view.updated_at,
        view.points_table
            .iter()
            .map(|p| format_points(*p))
            .collect::<Vec<_>>()
            .join(",")
    );
    println!();

    println!("DRIVERS ({})", view.drivers.len());
    for (idx, d) in view.drivers.iter().enumerate() {
        let badge = if d.registered_only { " [REGISTERED]" } else { "" };
        let points = if hide_points {
            String::new()
        } else {
            format!("{:>6}", format_points(d.points))
        };
        println!(
            "{:>3}. {:<18} {:<20}{}{badge}",
            idx + 1,
            format_driver_display_name(&d.driver_name),
            d.team,
            points
        );
    }

    if !view.teams.is_empty() {
        println!();
        println!("TEAMS ({})", view.teams.len());
        for (idx, t) in view.teams.iter().enumerate() {
            let points = if hide_points {
                String::new()
            } else {
                format!("{:>6}", format_points(t.points))
            };
            println!(
                "{:>3}. {:<24} {:>2} drivers{}",
                idx + 1,
                t.team.to_uppercase(),
                t.drivers,
                points
            );
        }
    }

    println!();
    println!("HISTORY ({} races)", view.races.len());
    for card in &view.races {
        print_race(card);
    }
}

fn print_race(card: &RaceCard) {
    let round = card
        .round
        .map(|r| r.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!();
    println!("Round {round}  {}  {}", card.track_name, card.date);

    match card.summary.winner.as_ref() {
        Some(w) if !w.team.is_empty() => println!("  Winner: {} ({})", w.driver_name, w.team),
        Some(w) => println!("  Winner: {}", w.driver_name),
        None => println!("  Winner: —"),
    }
    if let Some(fl) = card.summary.fastest_lap.as_ref() {
        let name = if fl.driver_name.is_empty() {
            "—"
        } else {
            fl.driver_name.as_str()
        };
        match fl.time.as_deref() {
            Some(time) => println!("  Fastest lap: {name} {time}"),
            None => println!("  Fastest lap: {name}"),
        }
    }
    if let Some(mo) = card.summary.most_overtakes.as_ref() {
        println!("  Most overtakes: {} +{}", mo.driver_name, mo.gained);
    }

    for row in &card.rows {
        let pos = row.pos.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
        let tyres = row
            .tyres
            .iter()
            .map(|t| t.compound.as_str())
            .collect::<Vec<_>>()
            .join("/");
        let notes = row
            .notes
            .iter()
            .map(|n| n.label())
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {pos:>3} {:<22} {:<16} {:<10} {:>10} {:>4}  {notes}",
            row.driver_name,
            row.team,
            tyres,
            row.time,
            format_points(row.points)
        );
    }
}
