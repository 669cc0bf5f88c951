use crate::columns::ColumnSchema;
use crate::config::TeamSort;
use crate::types::{MemberRecord, RawRow, TeamAggregate, WeeklyScore};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Reduce every row that has both a name and a team to a [`MemberRecord`].
///
/// Returns the members in input order plus the number of rows dropped for
/// missing identity. Whitespace-only name or team counts as missing; any
/// other label is kept verbatim.
pub fn build_members(rows: &[RawRow], schema: &ColumnSchema) -> (Vec<MemberRecord>, usize) {
    let mut members = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        let name = schema.name.and_then(|i| row.get(i).as_text());
        let team = schema.team.and_then(|i| row.get(i).as_text());
        let (Some(name), Some(team)) = (name, team) else {
            dropped += 1;
            continue;
        };

        let weekly_scores: Vec<WeeklyScore> = schema
            .week_columns
            .iter()
            .map(|col| {
                let score = row.get(col.index).as_score();
                let challenge_score = col
                    .challenge_index
                    .map(|i| row.get(i).as_score())
                    .unwrap_or(0.0);
                WeeklyScore {
                    week_num: col.week_num,
                    week_date: col.label.clone(),
                    score,
                    challenge_score,
                    active: score > 0.0,
                }
            })
            .collect();

        let total_score: f64 = weekly_scores.iter().map(|w| w.score).sum();
        let total_challenge_score: f64 = schema
            .challenge_columns
            .iter()
            .map(|c| row.get(c.index).as_score())
            .sum();

        members.push(MemberRecord {
            name: name.to_string(),
            team: team.to_string(),
            external_id: schema
                .external_id
                .and_then(|i| row.get(i).as_text())
                .map(str::to_string),
            weekly_scores,
            total_score,
            total_challenge_score,
            combined_score: total_score + total_challenge_score,
        });
    }

    (members, dropped)
}

/// Group members by exact team label, in order of first appearance.
pub fn group_by_team(members: &[MemberRecord]) -> Vec<(String, Vec<&MemberRecord>)> {
    let mut order: Vec<(String, Vec<&MemberRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for m in members {
        match index.get(m.team.as_str()) {
            Some(&i) => order[i].1.push(m),
            None => {
                index.insert(m.team.as_str(), order.len());
                order.push((m.team.clone(), vec![m]));
            }
        }
    }
    order
}

/// Per-team totals, sorted descending by the configured key. Ties keep the
/// order in which teams first appear.
pub fn build_teams(members: &[MemberRecord], sort: TeamSort) -> Vec<TeamAggregate> {
    let mut teams: Vec<TeamAggregate> = group_by_team(members)
        .into_iter()
        .map(|(team_name, group)| {
            let member_count = group.len();
            let total_score: f64 = group.iter().map(|m| m.total_score).sum();
            let total_challenge_score: f64 = group.iter().map(|m| m.total_challenge_score).sum();
            let top_score = group
                .iter()
                .map(|m| m.total_score)
                .fold(f64::NEG_INFINITY, f64::max);
            TeamAggregate {
                team_name,
                member_count,
                total_score,
                total_challenge_score,
                combined_score: total_score + total_challenge_score,
                avg_score: total_score / member_count as f64,
                top_score,
            }
        })
        .collect();

    match sort {
        TeamSort::Combined => teams.sort_by(|a, b| desc(a.combined_score, b.combined_score)),
        TeamSort::Total => teams.sort_by(|a, b| desc(a.total_score, b.total_score)),
    }
    teams
}

/// Teams ordered by average score per member, highest first.
pub fn teams_by_average(teams: &[TeamAggregate]) -> Vec<TeamAggregate> {
    let mut sorted = teams.to_vec();
    sorted.sort_by(|a, b| desc(a.avg_score, b.avg_score));
    sorted
}

/// Members of one team, highest total first. Unknown team yields nothing.
pub fn team_members<'a>(members: &'a [MemberRecord], team: &str) -> Vec<&'a MemberRecord> {
    let mut selected: Vec<&MemberRecord> = members.iter().filter(|m| m.team == team).collect();
    selected.sort_by(|a, b| desc(a.total_score, b.total_score));
    selected
}

/// Distinct team labels, alphabetically.
pub fn team_names(members: &[MemberRecord]) -> Vec<String> {
    let mut names: Vec<String> = group_by_team(members)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    names.sort();
    names
}

pub(crate) fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
