// Entry point and high-level CLI flow.
//
// Every subcommand loads the CSV once, computes the whole dashboard and
// prints one view. `interactive` keeps the computed dashboard in memory so
// several views can be printed from a single load; option [1] reloads.
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use leaderboard_report::config::{ChallengePairing, TeamSort};
use leaderboard_report::insights::TrendInsight;
use leaderboard_report::rankings::MAX_BUCKETS;
use leaderboard_report::{output, reports, util, Dashboard, DashboardConfig};
use once_cell::sync::Lazy;
use tracing::error;
use tracing_subscriber::EnvFilter;

// The one snapshot an interactive session works from. A reload replaces it.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Dashboard>,
}

#[derive(Parser)]
#[command(name = "leaderboard-report")]
#[command(about = "Team and member leaderboards from a weekly-scored CSV export", long_about = None)]
struct Cli {
    /// Leaderboard CSV export
    #[arg(long, global = true, default_value = "leaderboard.csv")]
    csv: PathBuf,
    /// JSON config file; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Pair challenge columns with weeks by position instead of by label
    #[arg(long, global = true)]
    positional_challenges: bool,
    /// Order teams by activity score only, ignoring challenge points
    #[arg(long, global = true)]
    sort_by_total: bool,
    /// Size of the top performer list
    #[arg(long, global = true)]
    top: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Team totals, highest combined score first
    Teams,
    /// Teams by average score per member
    Averages,
    /// Top performers across all teams
    Top,
    /// Members of one team by total score
    Members {
        #[arg(long)]
        team: String,
    },
    /// Score distribution by team
    Distribution {
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BUCKETS as u64))]
        buckets: Option<usize>,
        /// Show each team's share of a bucket instead of counts
        #[arg(long)]
        percent: bool,
    },
    /// Weekly series for one team, or all teams
    Weekly {
        #[arg(long)]
        team: Option<String>,
    },
    /// Active members per week against the cross-team average
    Activity,
    /// Weekly team scores over time
    Timeline,
    /// Trend insights and coaching recommendations for one team
    Trend {
        #[arg(long)]
        team: String,
    },
    /// Write every report as CSV plus a JSON summary
    Export {
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,
    },
    /// Menu-driven session over a single load
    Interactive,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut cfg = match &cli.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if cli.positional_challenges {
        cfg.challenge_pairing = ChallengePairing::Positional;
    }
    if cli.sort_by_total {
        cfg.team_sort = TeamSort::Total;
    }
    if let Some(n) = cli.top {
        cfg.top_n = n;
    }
    Ok(cfg)
}

fn load(path: &Path, cfg: &DashboardConfig) -> anyhow::Result<Dashboard> {
    Dashboard::load(path, cfg)
        .with_context(|| format!("failed to load leaderboard {}", path.display()))
}

fn print_load_summary(d: &Dashboard) {
    let report = &d.load_report;
    println!(
        "Processing dataset... ({} rows read, {} members across {} teams, {} weeks)",
        util::format_int(report.total_rows),
        util::format_int(report.loaded_rows),
        util::format_int(d.teams.len()),
        util::format_int(d.schema.week_columns.len())
    );
    if report.skipped_rows() > 0 {
        println!(
            "Note: {} rows skipped ({} without name or team, {} blank, {} malformed).",
            util::format_int(report.skipped_rows()),
            util::format_int(report.missing_identity),
            util::format_int(report.blank_rows),
            util::format_int(report.parse_errors.len())
        );
    }
    println!();
}

fn print_teams(d: &Dashboard) {
    println!("Team Scores\n");
    output::preview_table_rows(&reports::team_summary_rows(&d.teams), usize::MAX);
}

fn print_averages(d: &Dashboard) {
    println!("Average Score Per Member\n");
    output::preview_table_rows(&reports::team_summary_rows(&d.teams_by_average()), usize::MAX);
}

fn print_top(d: &Dashboard) {
    println!("Top Performers\n");
    output::preview_table_rows(&reports::top_performer_rows(&d.top_performers), usize::MAX);
}

fn print_members(d: &Dashboard, team: &str) {
    let members = d.team_members(team);
    if members.is_empty() {
        println!("No members found for team {:?}. Teams: {}\n", team, d.team_names().join(", "));
        return;
    }
    println!("Individual Performance: {}\n", team);
    output::preview_table_rows(&reports::member_rank_rows(&members), usize::MAX);
}

fn print_distribution(d: &Dashboard, buckets: usize, percent: bool) {
    println!("Score Distribution ({} buckets)\n", buckets.clamp(1, MAX_BUCKETS));
    let grid = reports::distribution_grid(&d.distribution(buckets), percent);
    println!("{}\n", output::render_grid(&grid));
}

fn print_weekly(d: &Dashboard, team: Option<&str>) {
    for series in &d.team_weekly_series.teams {
        if team.is_some_and(|t| t != series.team_name) {
            continue;
        }
        println!("{}: weekly performance\n", series.team_name);
        output::preview_table_rows(&reports::weekly_rows(&series.points), usize::MAX);
    }
}

fn print_activity(d: &Dashboard) {
    println!("Active Members vs Weekly Average\n");
    println!("{}\n", output::render_grid(&reports::activity_grid(&d.activity_deviation())));
}

fn print_timeline(d: &Dashboard) {
    println!("Team Performance Over Time\n");
    println!("{}\n", output::render_grid(&reports::timeline_grid(&d.score_timeline())));
}

fn signed(n: f64, suffix: &str) -> String {
    if n > 0.0 {
        format!("+{}{}", util::format_score(n), suffix)
    } else {
        format!("{}{}", util::format_score(n), suffix)
    }
}

fn print_insight(team: &str, insight: Option<TrendInsight>) {
    let Some(i) = insight else {
        println!("No weekly data for team {:?}.\n", team);
        return;
    };
    println!("{}: performance & participation trends\n", i.team_name);
    println!(
        "Score: {} ({} vs last week)",
        util::format_score(i.current_score),
        signed(i.score_trend, "")
    );
    println!(
        "Participation: {}% ({}/{} members, {} vs last week)",
        i.current_participation,
        i.active_members,
        i.member_count,
        signed(i.participation_trend as f64, "%")
    );
    if !i.highlights.is_empty() {
        println!("\nHighlights:");
        for h in &i.highlights {
            println!("- {}", h);
        }
    }
    println!("\nCoaching Recommendations:");
    if i.recommendations.is_empty() {
        println!("- Keep up the current routine");
    }
    for r in &i.recommendations {
        println!("- {}", r);
    }
    println!();
}

fn export(d: &Dashboard, out_dir: &Path, buckets: usize) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();
    let files = output::export_dashboard(d, out_dir, buckets, today)
        .with_context(|| format!("failed to export reports to {}", out_dir.display()))?;
    for f in files {
        println!("(Exported {})", f.display());
    }
    println!();
    Ok(())
}

/// Export from the interactive menu. A write failure is reported and the
/// session keeps its snapshot; returns whether every file was written.
fn handle_export(d: &Dashboard, out_dir: &Path, buckets: usize) -> bool {
    match export(d, out_dir, buckets) {
        Ok(()) => true,
        Err(e) => {
            error!("{:#}", e);
            println!("Write error: {:#}\n", e);
            false
        }
    }
}

/// Read a single line of input after printing `prompt`.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Option [1]: (re)load the CSV and replace the in-memory snapshot.
fn handle_load(path: &Path, cfg: &DashboardConfig) {
    match load(path, cfg) {
        Ok(d) => {
            print_load_summary(&d);
            let mut state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
            state.data = Some(d);
        }
        Err(e) => {
            error!("{:#}", e);
            println!("Failed to load file: {:#}\n", e);
        }
    }
}

fn current_snapshot() -> Option<Dashboard> {
    let state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    state.data.clone()
}

fn run_interactive(path: &Path, cfg: &DashboardConfig) -> anyhow::Result<()> {
    loop {
        println!("Leaderboard Reports:");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Team Trends\n");
        let choice = read_line("Enter choice: ");
        if choice.is_empty() || choice.eq_ignore_ascii_case("q") {
            println!("Exiting the program.");
            return Ok(());
        }
        match choice.as_str() {
            "1" => handle_load(path, cfg),
            "2" | "3" => {
                let Some(d) = current_snapshot() else {
                    println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
                    continue;
                };
                println!();
                if choice == "2" {
                    print_teams(&d);
                    print_top(&d);
                    print_distribution(&d, cfg.bucket_count, true);
                    handle_export(&d, Path::new("reports"), cfg.bucket_count);
                } else {
                    println!("Teams: {}", d.team_names().join(", "));
                    let team = read_line("Team: ");
                    print_insight(&team, d.insights(&team));
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    return Ok(());
                }
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;

    if let Commands::Interactive = cli.command {
        return run_interactive(&cli.csv, &cfg);
    }

    let d = load(&cli.csv, &cfg)?;
    print_load_summary(&d);

    match &cli.command {
        Commands::Teams => print_teams(&d),
        Commands::Averages => print_averages(&d),
        Commands::Top => print_top(&d),
        Commands::Members { team } => print_members(&d, team),
        Commands::Distribution { buckets, percent } => {
            print_distribution(&d, buckets.unwrap_or(cfg.bucket_count), *percent)
        }
        Commands::Weekly { team } => print_weekly(&d, team.as_deref()),
        Commands::Activity => print_activity(&d),
        Commands::Timeline => print_timeline(&d),
        Commands::Trend { team } => print_insight(team, d.insights(team)),
        Commands::Export { out_dir } => export(&d, out_dir, cfg.bucket_count)?,
        Commands::Interactive => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Name,Team Name,1/1,1/8\nAlice,TeamA,10,20\nBob,TeamB,5,5\n";

    #[test]
    fn export_failure_is_reported_not_fatal() {
        let d = Dashboard::from_text(SAMPLE, &DashboardConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("reports");
        std::fs::write(&blocked, "not a directory").unwrap();
        assert!(!handle_export(&d, &blocked, 4));
    }

    #[test]
    fn export_writes_into_a_fresh_directory() {
        let d = Dashboard::from_text(SAMPLE, &DashboardConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        assert!(handle_export(&d, &out, 4));
        assert!(out.join("summary.json").exists());
    }

    #[test]
    fn bucket_flag_is_range_checked() {
        let parsed = Cli::try_parse_from(["leaderboard-report", "distribution", "--buckets", "6"]);
        assert!(parsed.is_ok());
        for bad in ["0", "18446744073709551615"] {
            let parsed =
                Cli::try_parse_from(["leaderboard-report", "distribution", "--buckets", bad]);
            assert!(parsed.is_err());
        }
    }
}
