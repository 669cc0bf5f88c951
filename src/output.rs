use crate::dashboard::Dashboard;
use crate::error::{LeaderboardError, Result};
use crate::reports;
use crate::types::TeamWeeklyRow;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(|source| LeaderboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Write a pre-formatted grid (first line is the header).
pub fn write_grid_csv(path: &Path, grid: &[Vec<String>]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for line in grid {
        wtr.write_record(line)?;
    }
    wtr.flush().map_err(|source| LeaderboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|source| LeaderboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

/// Markdown table from a header-first grid of strings.
pub fn render_grid(grid: &[Vec<String>]) -> String {
    if grid.len() < 2 {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    for line in grid {
        builder.push_record(line.iter().cloned());
    }
    builder.build().with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
}

/// Write the team summary, top performers, weekly series, distribution and
/// `summary.json` into `out_dir`. Returns the files written.
pub fn export_dashboard(
    dashboard: &Dashboard,
    out_dir: &Path,
    bucket_count: usize,
    generated_on: NaiveDate,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|source| LeaderboardError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::new();

    let path = out_dir.join("team_summary.csv");
    write_csv(&path, &reports::team_summary_rows(&dashboard.teams))?;
    written.push(path);

    let path = out_dir.join("top_performers.csv");
    write_csv(&path, &reports::top_performer_rows(&dashboard.top_performers))?;
    written.push(path);

    let weekly: Vec<TeamWeeklyRow> = dashboard
        .team_weekly_series
        .teams
        .iter()
        .flat_map(|s| reports::weekly_rows(&s.points))
        .collect();
    let path = out_dir.join("team_weekly.csv");
    write_csv(&path, &weekly)?;
    written.push(path);

    let path = out_dir.join("distribution.csv");
    let grid = reports::distribution_grid(&dashboard.distribution(bucket_count), false);
    write_grid_csv(&path, &grid)?;
    written.push(path);

    let path = out_dir.join("summary.json");
    write_json(&path, &reports::generate_summary(dashboard, generated_on))?;
    written.push(path);

    info!(dir = %out_dir.display(), files = written.len(), "exported reports");
    Ok(written)
}
