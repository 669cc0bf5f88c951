//! Per-team weekly series and the trend views built on them.

use crate::aggregate::group_by_team;
use crate::types::{MemberRecord, TeamWeeklyPoint};
use serde::Serialize;
use std::collections::BTreeMap;

/// One team's weekly points, ascending by week number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeries {
    pub team_name: String,
    pub points: Vec<TeamWeeklyPoint>,
}

/// Weekly series for every team, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamWeeklySeries {
    pub teams: Vec<TeamSeries>,
}

impl TeamWeeklySeries {
    pub fn get(&self, team: &str) -> Option<&[TeamWeeklyPoint]> {
        self.teams
            .iter()
            .find(|s| s.team_name == team)
            .map(|s| s.points.as_slice())
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|s| s.team_name.as_str())
    }

    /// Every week number present in any team, ascending, with its label.
    pub fn weeks(&self) -> Vec<(usize, String)> {
        let mut weeks: BTreeMap<usize, String> = BTreeMap::new();
        for point in self.teams.iter().flat_map(|s| s.points.iter()) {
            weeks
                .entry(point.week_num)
                .or_insert_with(|| point.week_date.clone());
        }
        weeks.into_iter().collect()
    }
}

/// Full rescan of `members` into per-team weekly points.
///
/// The weeks of a team are the union of the weeks its members report. A
/// member without an entry for a week counts as score 0 and inactive.
pub fn build_team_weekly_series(members: &[MemberRecord]) -> TeamWeeklySeries {
    let teams = group_by_team(members)
        .into_iter()
        .map(|(team_name, group)| {
            let mut labels: BTreeMap<usize, &str> = BTreeMap::new();
            for w in group.iter().flat_map(|m| m.weekly_scores.iter()) {
                labels.entry(w.week_num).or_insert(w.week_date.as_str());
            }
            let member_count = group.len();
            let points = labels
                .into_iter()
                .map(|(week_num, week_date)| {
                    let mut point = TeamWeeklyPoint {
                        team_name: team_name.clone(),
                        week_num,
                        week_date: week_date.to_string(),
                        team_weekly_score: 0.0,
                        team_weekly_challenge_score: 0.0,
                        active_members: 0,
                        member_count,
                    };
                    for week in group.iter().filter_map(|m| m.week(week_num)) {
                        point.team_weekly_score += week.score;
                        point.team_weekly_challenge_score += week.challenge_score;
                        if week.active {
                            point.active_members += 1;
                        }
                    }
                    point
                })
                .collect();
            TeamSeries { team_name, points }
        })
        .collect();
    TeamWeeklySeries { teams }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekDeviation {
    pub week_num: usize,
    pub active_members: usize,
    /// Mean active members over the teams that have this week.
    pub week_average: f64,
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamActivityDeviation {
    pub team_name: String,
    pub weeks: Vec<WeekDeviation>,
}

/// How far each team's active-member count sits from the cross-team mean,
/// week by week.
pub fn active_member_deviation(series: &TeamWeeklySeries) -> Vec<TeamActivityDeviation> {
    let mut sums: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for point in series.teams.iter().flat_map(|s| s.points.iter()) {
        let e = sums.entry(point.week_num).or_insert((0, 0));
        e.0 += point.active_members;
        e.1 += 1;
    }

    series
        .teams
        .iter()
        .map(|s| TeamActivityDeviation {
            team_name: s.team_name.clone(),
            weeks: s
                .points
                .iter()
                .map(|p| {
                    let week_average = sums
                        .get(&p.week_num)
                        .map(|(total, teams)| *total as f64 / *teams as f64)
                        .unwrap_or(0.0);
                    WeekDeviation {
                        week_num: p.week_num,
                        active_members: p.active_members,
                        week_average,
                        deviation: p.active_members as f64 - week_average,
                    }
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// 0 for the synthetic start point.
    pub week_num: usize,
    pub label: String,
    /// Weekly score per team, in series order.
    pub scores: Vec<(String, f64)>,
}

/// Weekly score per team over time, led by a `Start` point where every team
/// is at 0. A team missing a week reads 0 there.
pub fn score_timeline(series: &TeamWeeklySeries) -> Vec<TimelinePoint> {
    let names: Vec<&str> = series.team_names().collect();
    let mut timeline = vec![TimelinePoint {
        week_num: 0,
        label: "Start".to_string(),
        scores: names.iter().map(|n| (n.to_string(), 0.0)).collect(),
    }];

    for (week_num, date) in series.weeks() {
        let scores = series
            .teams
            .iter()
            .map(|s| {
                let score = s
                    .points
                    .iter()
                    .find(|p| p.week_num == week_num)
                    .map(|p| p.team_weekly_score)
                    .unwrap_or(0.0);
                (s.team_name.clone(), score)
            })
            .collect();
        timeline.push(TimelinePoint {
            week_num,
            label: format!("Week {} ({})", week_num, date),
            scores,
        });
    }
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeeklyScore;

    fn member(name: &str, team: &str, scores: &[f64]) -> MemberRecord {
        let weekly_scores: Vec<WeeklyScore> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| WeeklyScore {
                week_num: i + 1,
                week_date: format!("1/{}", 1 + 7 * i),
                score: *s,
                challenge_score: 0.0,
                active: *s > 0.0,
            })
            .collect();
        let total: f64 = scores.iter().sum();
        MemberRecord {
            name: name.to_string(),
            team: team.to_string(),
            external_id: None,
            weekly_scores,
            total_score: total,
            total_challenge_score: 0.0,
            combined_score: total,
        }
    }

    #[test]
    fn sums_scores_and_counts_active_members() {
        let members = vec![
            member("Alice", "TeamA", &[10.0, 20.0]),
            member("Bob", "TeamA", &[5.0, 5.0]),
        ];
        let series = build_team_weekly_series(&members);
        let points = series.get("TeamA").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].week_num, 1);
        assert_eq!(points[0].team_weekly_score, 15.0);
        assert_eq!(points[0].active_members, 2);
        assert_eq!(points[1].week_num, 2);
        assert_eq!(points[1].team_weekly_score, 25.0);
        assert_eq!(points[1].week_date, "1/8");
        assert_eq!(points[1].member_count, 2);
    }

    #[test]
    fn short_member_history_counts_as_inactive() {
        let members = vec![
            member("Alice", "TeamA", &[10.0, 20.0, 30.0]),
            member("Bob", "TeamA", &[5.0]),
        ];
        let series = build_team_weekly_series(&members);
        let points = series.get("TeamA").unwrap();
        let weeks: Vec<usize> = points.iter().map(|p| p.week_num).collect();
        assert_eq!(weeks, vec![1, 2, 3]);
        assert_eq!(points[2].team_weekly_score, 30.0);
        assert_eq!(points[2].active_members, 1);
        assert!(points.iter().all(|p| p.active_members <= p.member_count));
    }

    #[test]
    fn zero_weeks_gives_empty_series() {
        let members = vec![member("Alice", "TeamA", &[])];
        let series = build_team_weekly_series(&members);
        assert!(series.get("TeamA").unwrap().is_empty());
        assert!(series.get("Nobody").is_none());
    }

    #[test]
    fn deviation_from_cross_team_average() {
        let members = vec![
            member("A1", "TeamA", &[1.0]),
            member("A2", "TeamA", &[1.0]),
            member("A3", "TeamA", &[1.0]),
            member("B1", "TeamB", &[1.0]),
        ];
        let series = build_team_weekly_series(&members);
        let deviation = active_member_deviation(&series);
        assert_eq!(deviation[0].weeks[0].week_average, 2.0);
        assert_eq!(deviation[0].weeks[0].deviation, 1.0);
        assert_eq!(deviation[1].weeks[0].deviation, -1.0);
    }

    #[test]
    fn timeline_starts_at_zero() {
        let members = vec![
            member("Alice", "TeamA", &[10.0, 20.0]),
            member("Bea", "TeamB", &[3.0]),
        ];
        let series = build_team_weekly_series(&members);
        let timeline = score_timeline(&series);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[0].label, "Start");
        assert!(timeline[0].scores.iter().all(|(_, s)| *s == 0.0));
        assert_eq!(timeline[2].label, "Week 2 (1/8)");
        assert_eq!(
            timeline[2].scores,
            vec![("TeamA".to_string(), 20.0), ("TeamB".to_string(), 0.0)]
        );
    }
}
