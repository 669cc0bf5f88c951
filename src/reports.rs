// Presentation rows for the tables and exports.
//
// Each builder takes already-computed aggregates and only formats them; no
// figures are recomputed here.
use crate::dashboard::Dashboard;
use crate::insights::participation_percent;
use crate::rankings::DistributionBucket;
use crate::types::{
    MemberRankRow, MemberRecord, SummaryStats, TeamAggregate, TeamSummaryRow, TeamWeeklyPoint,
    TeamWeeklyRow, TopPerformer,
};
use crate::util::{format_number, format_score};
use crate::weekly::{TeamActivityDeviation, TimelinePoint};
use chrono::NaiveDate;

pub fn team_summary_rows(teams: &[TeamAggregate]) -> Vec<TeamSummaryRow> {
    teams
        .iter()
        .map(|t| TeamSummaryRow {
            team: t.team_name.clone(),
            members: t.member_count,
            activity_score: format_score(t.total_score),
            challenge_score: format_score(t.total_challenge_score),
            combined_score: format_score(t.combined_score),
            avg_score: format_number(t.avg_score, 2),
            top_score: format_score(t.top_score),
        })
        .collect()
}

pub fn top_performer_rows(top: &[TopPerformer]) -> Vec<MemberRankRow> {
    top.iter()
        .map(|p| MemberRankRow {
            rank: p.rank,
            name: p.name.clone(),
            team: p.team.clone(),
            score: format_score(p.score),
        })
        .collect()
}

pub fn member_rank_rows(members: &[&MemberRecord]) -> Vec<MemberRankRow> {
    members
        .iter()
        .enumerate()
        .map(|(idx, m)| MemberRankRow {
            rank: idx + 1,
            name: m.name.clone(),
            team: m.team.clone(),
            score: format_score(m.total_score),
        })
        .collect()
}

pub fn weekly_rows(points: &[TeamWeeklyPoint]) -> Vec<TeamWeeklyRow> {
    points
        .iter()
        .map(|p| TeamWeeklyRow {
            team: p.team_name.clone(),
            week_num: p.week_num,
            week_date: p.week_date.clone(),
            score: format_score(p.team_weekly_score),
            challenge_score: format_score(p.team_weekly_challenge_score),
            active_members: p.active_members,
            member_count: p.member_count,
            participation_pct: participation_percent(p),
        })
        .collect()
}

/// Header plus one line per bucket: label, total, then one column per team,
/// either raw counts or percent of the bucket.
pub fn distribution_grid(buckets: &[DistributionBucket], percent: bool) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(buckets.len() + 1);
    let mut header = vec!["Range".to_string(), "Members".to_string()];
    if let Some(first) = buckets.first() {
        header.extend(first.team_counts.iter().map(|(team, _)| team.clone()));
    }
    grid.push(header);

    for b in buckets {
        let mut line = vec![b.label.clone(), b.total.to_string()];
        if percent {
            line.extend(
                b.percentages()
                    .into_iter()
                    .map(|(_, pct)| format!("{}%", format_number(pct, 1))),
            );
        } else {
            line.extend(b.team_counts.iter().map(|(_, c)| c.to_string()));
        }
        grid.push(line);
    }
    grid
}

/// Team rows, one column per week: signed deviation from the cross-team
/// average with the absolute active count in brackets.
pub fn activity_grid(deviation: &[TeamActivityDeviation]) -> Vec<Vec<String>> {
    let mut weeks: Vec<usize> = deviation
        .iter()
        .flat_map(|t| t.weeks.iter().map(|w| w.week_num))
        .collect();
    weeks.sort_unstable();
    weeks.dedup();

    let mut header = vec!["Team".to_string()];
    header.extend(weeks.iter().map(|w| format!("Week {}", w)));
    let mut grid = vec![header];
    for team in deviation {
        let mut line = vec![team.team_name.clone()];
        for week_num in &weeks {
            let cell = match team.weeks.iter().find(|w| w.week_num == *week_num) {
                Some(w) => format!(
                    "{}{} ({})",
                    if w.deviation >= 0.0 { "+" } else { "" },
                    format_number(w.deviation, 1),
                    w.active_members
                ),
                None => "-".to_string(),
            };
            line.push(cell);
        }
        grid.push(line);
    }
    grid
}

/// One line per timeline point, one column per team.
pub fn timeline_grid(timeline: &[TimelinePoint]) -> Vec<Vec<String>> {
    let mut header = vec!["Week".to_string()];
    if let Some(first) = timeline.first() {
        header.extend(first.scores.iter().map(|(team, _)| team.clone()));
    }
    let mut grid = vec![header];
    for point in timeline {
        let mut line = vec![point.label.clone()];
        line.extend(point.scores.iter().map(|(_, s)| format_score(*s)));
        grid.push(line);
    }
    grid
}

pub fn generate_summary(dashboard: &Dashboard, generated_on: NaiveDate) -> SummaryStats {
    SummaryStats {
        generated_on,
        total_members: dashboard.members.len(),
        total_teams: dashboard.teams.len(),
        total_weeks: dashboard.schema.week_columns.len(),
        total_activity_score: dashboard.members.iter().map(|m| m.total_score).sum(),
        total_challenge_score: dashboard.members.iter().map(|m| m.total_challenge_score).sum(),
        leading_team: dashboard.teams.first().map(|t| t.team_name.clone()),
        top_performer: dashboard.top_performers.first().map(|p| p.name.clone()),
        skipped_rows: dashboard.load_report.skipped_rows(),
    }
}
