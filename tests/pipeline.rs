use leaderboard_report::config::ChallengePairing;
use leaderboard_report::insights::generate_insight;
use leaderboard_report::types::TeamWeeklyPoint;
use leaderboard_report::{Dashboard, DashboardConfig};

const CLUB_EXPORT: &str = "\
Name,Team Name,Strava id,1/6,1/13,1/13 Challenge,1/20,Challenge 1/20,Comments
Maya,Slayin' Peaches,9001,60,45,10,80,,
Theo,Slayin' Peaches,9002,30,0,0,25,5,rest week
Ines,Goat Guavas,9003,90,120,20,0,,
Omar,Goat Guavas,9004,15,30,,45,10,
Lena,,9005,100,100,,100,,
Ravi,Power Plums,9006,0,0,,0,,

Jun,Power Plums,9007,40,40,5,40,5,
";

fn load(text: &str) -> Dashboard {
    Dashboard::from_text(text, &DashboardConfig::default()).unwrap()
}

#[test]
fn two_member_team_matches_hand_computation() {
    let d = load("Name,Team Name,1/1,1/8\nAlice,TeamA,10,20\nBob,TeamA,5,5\n");
    assert_eq!(d.teams.len(), 1);
    let team = &d.teams[0];
    assert_eq!(team.team_name, "TeamA");
    assert_eq!(team.total_score, 40.0);
    assert_eq!(team.member_count, 2);
    assert_eq!(team.avg_score, 20.0);

    let points = d.team_weekly_series.get("TeamA").unwrap();
    let summary: Vec<(usize, f64, usize)> = points
        .iter()
        .map(|p| (p.week_num, p.team_weekly_score, p.active_members))
        .collect();
    assert_eq!(summary, vec![(1, 15.0, 2), (2, 25.0, 2)]);
}

#[test]
fn team_totals_partition_member_totals() {
    let d = load(CLUB_EXPORT);
    let member_sum: f64 = d.members.iter().map(|m| m.total_score).sum();
    let team_sum: f64 = d.teams.iter().map(|t| t.total_score).sum();
    assert_eq!(member_sum, team_sum);
    for t in &d.teams {
        assert!(t.member_count > 0);
        assert_eq!(t.avg_score, t.total_score / t.member_count as f64);
    }
}

#[test]
fn member_without_team_is_invisible_everywhere() {
    let d = load(CLUB_EXPORT);
    assert!(d.members.iter().all(|m| m.name != "Lena"));
    assert!(d.top_performers.iter().all(|p| p.name != "Lena"));
    assert_eq!(d.load_report.missing_identity, 1);
    assert!(d.load_report.parse_errors.is_empty());
    let counted: usize = d.distribution(4).iter().map(|b| b.total).sum();
    assert_eq!(counted, d.members.len());
    assert_eq!(d.members.len(), 6);
}

#[test]
fn teams_ordered_by_combined_score() {
    let d = load(CLUB_EXPORT);
    let names: Vec<&str> = d.teams.iter().map(|t| t.team_name.as_str()).collect();
    // Guavas 300 + 30, Peaches 240 + 15, Plums 120 + 10
    assert_eq!(names, vec!["Goat Guavas", "Slayin' Peaches", "Power Plums"]);
    assert_eq!(d.teams[0].combined_score, 330.0);
    assert_eq!(d.teams[0].top_score, 210.0);
}

#[test]
fn challenge_pairing_by_label_and_by_position() {
    let d = load(CLUB_EXPORT);
    let theo = d.members.iter().find(|m| m.name == "Theo").unwrap();
    let weekly: Vec<f64> = theo.weekly_scores.iter().map(|w| w.challenge_score).collect();
    assert_eq!(weekly, vec![0.0, 0.0, 5.0]);
    assert_eq!(theo.total_challenge_score, 5.0);

    let cfg = DashboardConfig {
        challenge_pairing: ChallengePairing::Positional,
        ..DashboardConfig::default()
    };
    let d = Dashboard::from_text(CLUB_EXPORT, &cfg).unwrap();
    let jun = d.members.iter().find(|m| m.name == "Jun").unwrap();
    let weekly: Vec<f64> = jun.weekly_scores.iter().map(|w| w.challenge_score).collect();
    assert_eq!(weekly, vec![5.0, 5.0, 0.0]);
    assert_eq!(jun.total_challenge_score, 10.0);
}

#[test]
fn top_performers_are_stable_across_reloads() {
    let first = load(CLUB_EXPORT);
    let second = load(CLUB_EXPORT);
    assert_eq!(first.top_performers, second.top_performers);
    let names: Vec<&str> = first.top_performers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ines", "Maya", "Jun", "Omar", "Theo", "Ravi"]);
}

#[test]
fn weekly_series_is_contiguous_and_bounded() {
    let d = load(CLUB_EXPORT);
    let week_count = d.schema.week_columns.len();
    assert_eq!(week_count, 3);
    for series in &d.team_weekly_series.teams {
        let weeks: Vec<usize> = series.points.iter().map(|p| p.week_num).collect();
        assert_eq!(weeks, (1..=week_count).collect::<Vec<_>>());
        assert!(series
            .points
            .iter()
            .all(|p| p.active_members <= p.member_count));
    }
}

#[test]
fn distribution_counts_match_team_sizes() {
    let d = load(CLUB_EXPORT);
    for bucket_count in [4, 6] {
        let buckets = d.distribution(bucket_count);
        assert_eq!(buckets.len(), bucket_count);
        assert!(buckets.last().unwrap().upper_bound.is_none());
        for team in &d.teams {
            let counted: usize = buckets
                .iter()
                .flat_map(|b| b.team_counts.iter())
                .filter(|(name, _)| *name == team.team_name)
                .map(|(_, c)| *c)
                .sum();
            assert_eq!(counted, team.member_count);
        }
    }
}

#[test]
fn insight_for_dip_and_recovery() {
    let points: Vec<TeamWeeklyPoint> = [10.0, 8.0, 12.0]
        .iter()
        .enumerate()
        .map(|(i, score)| TeamWeeklyPoint {
            team_name: "Sigma Mangoes".to_string(),
            week_num: i + 1,
            week_date: format!("3/{}", i + 1),
            team_weekly_score: *score,
            team_weekly_challenge_score: 0.0,
            active_members: 3,
            member_count: 4,
        })
        .collect();
    let insight = generate_insight(&points).unwrap();
    assert_eq!(insight.score_trend, 4.0);
    assert!(!insight.has_consistent_improvement);
    assert_eq!(insight.current_participation, 75);
}

#[test]
fn insights_through_the_dashboard() {
    let d = load(CLUB_EXPORT);
    let guavas = d.insights("Goat Guavas").unwrap();
    // weekly scores 105, 150, 45; both members active until Ines sits out week 3
    assert_eq!(guavas.current_score, 45.0);
    assert_eq!(guavas.score_trend, -105.0);
    assert_eq!(guavas.current_participation, 50);
    assert_eq!(guavas.participation_trend, -50);
    assert!(d.insights("goat guavas").is_none());
}
