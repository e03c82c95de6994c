use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::display::format_points;
use crate::pipeline::StandingsView;
use crate::race_summary::{RaceCard, ResultRow};

pub struct ExportReport {
    pub drivers: usize,
    pub teams: usize,
    pub race_rows: usize,
}

pub fn export_standings_xlsx(path: &Path, view: &StandingsView) -> Result<ExportReport> {
    let mut drivers_rows = vec![vec![
        "Pos".to_string(),
        "Driver".to_string(),
        "Team".to_string(),
        "Points".to_string(),
        "Wins".to_string(),
        "Registered Only".to_string(),
    ]];
    for (idx, d) in view.drivers.iter().enumerate() {
        drivers_rows.push(vec![
            (idx + 1).to_string(),
            d.driver_name.clone(),
            d.team.clone(),
            format_points(d.points),
            d.wins.to_string(),
            yes_no(d.registered_only),
        ]);
    }

    let mut teams_rows = vec![vec![
        "Pos".to_string(),
        "Team".to_string(),
        "Points".to_string(),
        "Wins".to_string(),
        "Drivers".to_string(),
    ]];
    for (idx, t) in view.teams.iter().enumerate() {
        teams_rows.push(vec![
            (idx + 1).to_string(),
            t.team.clone(),
            format_points(t.points),
            t.wins.to_string(),
            t.drivers.to_string(),
        ]);
    }

    let mut race_rows = vec![vec![
        "Round".to_string(),
        "Date".to_string(),
        "Track".to_string(),
        "Pos".to_string(),
        "Driver".to_string(),
        "Team".to_string(),
        "Tyres".to_string(),
        "Time".to_string(),
        "Points".to_string(),
        "Notes".to_string(),
    ]];
    for card in &view.races {
        race_rows.extend(card.rows.iter().map(|row| race_row(card, row)));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Drivers")?;
        write_rows(sheet, &drivers_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &teams_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Races")?;
        write_rows(sheet, &race_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        drivers: drivers_rows.len().saturating_sub(1),
        teams: teams_rows.len().saturating_sub(1),
        race_rows: race_rows.len().saturating_sub(1),
    })
}

fn race_row(card: &RaceCard, row: &ResultRow) -> Vec<String> {
    vec![
        opt_to_string(card.round),
        card.date.clone(),
        card.track_name.clone(),
        opt_to_string(row.pos),
        row.driver_name.clone(),
        row.team.clone(),
        row.tyres
            .iter()
            .map(|t| t.compound.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        row.time.clone(),
        format_points(row.points),
        row.notes
            .iter()
            .map(|n| n.label())
            .collect::<Vec<_>>()
            .join(" "),
    ]
}

fn yes_no(value: bool) -> String {
    if value {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
