use crate::aggregate::{build_members, build_teams, team_members, team_names, teams_by_average};
use crate::columns::{classify, ColumnSchema};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::insights::{generate_insight, TrendInsight};
use crate::loader::{load_from_path, parse_text, LoadReport, ParsedTable};
use crate::rankings::{distribution, top_performers, DistributionBucket};
use crate::types::{MemberRecord, TeamAggregate, TopPerformer};
use crate::weekly::{
    active_member_deviation, build_team_weekly_series, score_timeline, TeamActivityDeviation,
    TeamWeeklySeries, TimelinePoint,
};
use std::path::Path;
use tracing::info;

/// Everything derived from one load of the leaderboard file.
///
/// Built in a single pass and never mutated; a reload builds a new one.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub schema: ColumnSchema,
    pub members: Vec<MemberRecord>,
    pub teams: Vec<TeamAggregate>,
    pub top_performers: Vec<TopPerformer>,
    pub team_weekly_series: TeamWeeklySeries,
    pub load_report: LoadReport,
}

impl Dashboard {
    pub fn load(path: &Path, cfg: &DashboardConfig) -> Result<Self> {
        let table = load_from_path(path)?;
        Ok(Self::from_table(table, cfg))
    }

    pub fn from_text(text: &str, cfg: &DashboardConfig) -> Result<Self> {
        let table = parse_text(text)?;
        Ok(Self::from_table(table, cfg))
    }

    pub fn from_table(table: ParsedTable, cfg: &DashboardConfig) -> Self {
        let ParsedTable {
            headers,
            rows,
            mut report,
        } = table;

        let schema = classify(&headers, cfg);
        let (members, missing_identity) = build_members(&rows, &schema);
        report.missing_identity = missing_identity;
        report.loaded_rows = members.len();

        let teams = build_teams(&members, cfg.team_sort);
        let top_performers = top_performers(&members, cfg.top_n);
        let team_weekly_series = build_team_weekly_series(&members);

        info!(
            members = members.len(),
            teams = teams.len(),
            weeks = schema.week_columns.len(),
            skipped = report.skipped_rows(),
            "dashboard computed"
        );

        Dashboard {
            schema,
            members,
            teams,
            top_performers,
            team_weekly_series,
            load_report: report,
        }
    }

    pub fn distribution(&self, bucket_count: usize) -> Vec<DistributionBucket> {
        distribution(&self.members, bucket_count)
    }

    /// `None` for an unknown team or a team without weeks.
    pub fn insights(&self, team: &str) -> Option<TrendInsight> {
        self.team_weekly_series.get(team).and_then(generate_insight)
    }

    pub fn teams_by_average(&self) -> Vec<TeamAggregate> {
        teams_by_average(&self.teams)
    }

    pub fn team_members(&self, team: &str) -> Vec<&MemberRecord> {
        team_members(&self.members, team)
    }

    pub fn team_names(&self) -> Vec<String> {
        team_names(&self.members)
    }

    pub fn activity_deviation(&self) -> Vec<TeamActivityDeviation> {
        active_member_deviation(&self.team_weekly_series)
    }

    pub fn score_timeline(&self) -> Vec<TimelinePoint> {
        score_timeline(&self.team_weekly_series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_report_accounts_for_every_row() {
        let text = "Name,Team Name,1/1\nAlice,TeamA,3\n,TeamA,4\nBad\n,,\nBob,TeamB,1\n";
        let d = Dashboard::from_text(text, &DashboardConfig::default()).unwrap();
        assert_eq!(d.load_report.total_rows, 5);
        assert_eq!(d.load_report.loaded_rows, 2);
        assert_eq!(d.load_report.missing_identity, 1);
        assert_eq!(d.load_report.blank_rows, 1);
        assert_eq!(d.load_report.parse_errors.len(), 1);
        assert_eq!(d.load_report.skipped_rows(), 3);
    }

    #[test]
    fn top_n_follows_config() {
        let cfg = DashboardConfig {
            top_n: 1,
            ..DashboardConfig::default()
        };
        let d = Dashboard::from_text("Name,Team Name,1/1\nA,T,1\nB,T,9\n", &cfg).unwrap();
        assert_eq!(d.top_performers.len(), 1);
        assert_eq!(d.top_performers[0].name, "B");
    }

    #[test]
    fn unknown_team_has_no_insight() {
        let d = Dashboard::from_text("Name,Team Name,1/1\nA,T,1\n", &DashboardConfig::default())
            .unwrap();
        assert!(d.insights("T").is_some());
        assert!(d.insights("Nope").is_none());
    }

    #[test]
    fn no_week_columns_means_no_insight() {
        let d = Dashboard::from_text("Name,Team Name\nA,T\n", &DashboardConfig::default())
            .unwrap();
        assert_eq!(d.members.len(), 1);
        assert_eq!(d.teams[0].total_score, 0.0);
        assert!(d.insights("T").is_none());
    }
}
