//! Trend signals and coaching recommendations for one team's weekly series.

use crate::types::TeamWeeklyPoint;
use crate::util::rounded_percent;
use serde::Serialize;
use std::fmt;

const STRONG_SCORE_SWING: f64 = 5.0;
const PARTICIPATION_SWING: i64 = 10;
const LOW_PARTICIPATION: i64 = 70;
const BROAD_PARTICIPATION: i64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// Participation and score moved the same way.
    Positive,
    /// They moved in opposite directions.
    Negative,
}

/// Observations shown next to the headline numbers, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    ConsistentImprovement,
    ConsistentDecline,
    StrongWeek(f64),
    SignificantDrop(f64),
    FullParticipation,
    LowParticipation(i64),
    SharpParticipationDecline,
    StrongParticipationGain,
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Highlight::ConsistentImprovement => write!(f, "Consistent improvement for 3+ weeks"),
            Highlight::ConsistentDecline => write!(f, "Scores declining for 3+ consecutive weeks"),
            Highlight::StrongWeek(d) => write!(f, "Strong improvement this week (+{})", d),
            Highlight::SignificantDrop(d) => write!(f, "Significant drop this week ({})", d),
            Highlight::FullParticipation => write!(f, "Full team participation!"),
            Highlight::LowParticipation(p) => write!(f, "Low team participation ({}%)", p),
            Highlight::SharpParticipationDecline => write!(f, "Sharp decline in participation"),
            Highlight::StrongParticipationGain => {
                write!(f, "Strong improvement in participation")
            }
        }
    }
}

/// Coaching recommendations, declared in the order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ScheduleTeamMeeting,
    ReviewEngagement,
    ReachOutIndividually,
    RecognizeProgress,
    FocusOnEffectiveness,
    KeepFocusOnEngagement,
    BroadenEngagement,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Recommendation::ScheduleTeamMeeting => {
                "Urgent: schedule a team meeting to address the consistent performance decline"
            }
            Recommendation::ReviewEngagement => {
                "Review team engagement strategies: both participation and scores are dropping"
            }
            Recommendation::ReachOutIndividually => {
                "Reach out to inactive team members individually"
            }
            Recommendation::RecognizeProgress => {
                "Recognize the team's consistent progress and highlight successful strategies"
            }
            Recommendation::FocusOnEffectiveness => {
                "Team is more engaged but scores are dropping: focus on effectiveness of activities"
            }
            Recommendation::KeepFocusOnEngagement => {
                "Participation directly impacts scores: continue focusing on engagement"
            }
            Recommendation::BroadenEngagement => {
                "Scores hold up with low participation: engage more members to keep it sustainable"
            }
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendInsight {
    pub team_name: String,
    pub current_score: f64,
    pub score_trend: f64,
    pub current_participation: i64,
    pub participation_trend: i64,
    pub has_consistent_improvement: bool,
    pub has_consistent_decline: bool,
    pub member_count: usize,
    pub active_members: usize,
    pub correlation: Option<Correlation>,
    pub highlights: Vec<Highlight>,
    pub recommendations: Vec<Recommendation>,
}

pub fn participation_percent(point: &TeamWeeklyPoint) -> i64 {
    rounded_percent(point.active_members, point.member_count)
}

/// Derive the insight for one team. `points` must be ascending by week;
/// an empty series has no insight.
pub fn generate_insight(points: &[TeamWeeklyPoint]) -> Option<TrendInsight> {
    let current = points.last()?;
    let previous = points.len().checked_sub(2).map(|i| &points[i]);

    let current_participation = participation_percent(current);
    let (score_trend, participation_trend) = match previous {
        Some(prev) => (
            current.team_weekly_score - prev.team_weekly_score,
            current_participation - participation_percent(prev),
        ),
        None => (0.0, 0),
    };

    let scores: Vec<f64> = points.iter().map(|p| p.team_weekly_score).collect();
    let has_consistent_improvement = last_three_strictly(&scores, |a, b| b > a);
    let has_consistent_decline = last_three_strictly(&scores, |a, b| b < a);

    let correlation = if points.len() >= 3 {
        let first = &points[points.len() - 3];
        let score_delta = current.team_weekly_score - first.team_weekly_score;
        let participation_delta = current_participation - participation_percent(first);
        correlate(score_delta, participation_delta)
    } else {
        None
    };

    let mut insight = TrendInsight {
        team_name: current.team_name.clone(),
        current_score: current.team_weekly_score,
        score_trend,
        current_participation,
        participation_trend,
        has_consistent_improvement,
        has_consistent_decline,
        member_count: current.member_count,
        active_members: current.active_members,
        correlation,
        highlights: Vec::new(),
        recommendations: Vec::new(),
    };
    insight.highlights = highlights(&insight);
    insight.recommendations = recommendations(&insight);
    Some(insight)
}

fn last_three_strictly(scores: &[f64], step: impl Fn(f64, f64) -> bool) -> bool {
    if scores.len() < 3 {
        return false;
    }
    scores[scores.len() - 3..]
        .windows(2)
        .all(|w| step(w[0], w[1]))
}

fn correlate(score_delta: f64, participation_delta: i64) -> Option<Correlation> {
    if score_delta == 0.0 || participation_delta == 0 {
        return None;
    }
    if (score_delta > 0.0) == (participation_delta > 0) {
        Some(Correlation::Positive)
    } else {
        Some(Correlation::Negative)
    }
}

fn highlights(i: &TrendInsight) -> Vec<Highlight> {
    let mut out = Vec::new();
    if i.has_consistent_improvement {
        out.push(Highlight::ConsistentImprovement);
    }
    if i.has_consistent_decline {
        out.push(Highlight::ConsistentDecline);
    }
    if i.score_trend > STRONG_SCORE_SWING {
        out.push(Highlight::StrongWeek(i.score_trend));
    }
    if i.score_trend < -STRONG_SCORE_SWING {
        out.push(Highlight::SignificantDrop(i.score_trend));
    }
    if i.current_participation == 100 {
        out.push(Highlight::FullParticipation);
    }
    if i.current_participation < LOW_PARTICIPATION {
        out.push(Highlight::LowParticipation(i.current_participation));
    }
    if i.participation_trend < -PARTICIPATION_SWING {
        out.push(Highlight::SharpParticipationDecline);
    }
    if i.participation_trend > PARTICIPATION_SWING {
        out.push(Highlight::StrongParticipationGain);
    }
    out
}

fn recommendations(i: &TrendInsight) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if i.has_consistent_decline {
        out.push(Recommendation::ScheduleTeamMeeting);
    }
    if i.score_trend < -STRONG_SCORE_SWING && i.participation_trend < 0 {
        out.push(Recommendation::ReviewEngagement);
    }
    if i.current_participation < LOW_PARTICIPATION {
        out.push(Recommendation::ReachOutIndividually);
    }
    if i.has_consistent_improvement {
        out.push(Recommendation::RecognizeProgress);
    }
    if i.score_trend < 0.0 && i.participation_trend > 0 {
        out.push(Recommendation::FocusOnEffectiveness);
    }
    match i.correlation {
        Some(Correlation::Positive) => out.push(Recommendation::KeepFocusOnEngagement),
        Some(Correlation::Negative) if i.current_participation < BROAD_PARTICIPATION => {
            out.push(Recommendation::BroadenEngagement)
        }
        _ => {}
    }
    out
}
