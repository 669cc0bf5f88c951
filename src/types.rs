use serde::Serialize;
use tabled::Tabled;

/// A single CSV field after dynamic typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Numeric-looking field. `raw` keeps the source text so ids survive
    /// without float formatting.
    Number { value: f64, raw: String },
    Text(String),
    Empty,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Score value of the cell; anything that is not a number counts as 0.
    pub fn as_score(&self) -> f64 {
        match self {
            Cell::Number { value, .. } if value.is_finite() => *value,
            _ => 0.0,
        }
    }

    /// Textual value as read, `None` when blank. Not trimmed: labels are
    /// compared verbatim.
    pub fn as_text(&self) -> Option<&str> {
        let s = match self {
            Cell::Number { raw, .. } => raw.as_str(),
            Cell::Text(s) => s.as_str(),
            Cell::Empty => return None,
        };
        if s.trim().is_empty() {
            None
        } else {
            Some(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source text.
    pub line: u64,
    pub cells: Vec<Cell>,
}

impl RawRow {
    /// Cell at a header position; short rows read as empty.
    pub fn get(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyScore {
    pub week_num: usize,
    /// Raw header label, e.g. `1/8`.
    pub week_date: String,
    pub score: f64,
    pub challenge_score: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    pub name: String,
    pub team: String,
    pub external_id: Option<String>,
    pub weekly_scores: Vec<WeeklyScore>,
    pub total_score: f64,
    pub total_challenge_score: f64,
    pub combined_score: f64,
}

impl MemberRecord {
    pub fn week(&self, week_num: usize) -> Option<&WeeklyScore> {
        self.weekly_scores.iter().find(|w| w.week_num == week_num)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAggregate {
    pub team_name: String,
    pub member_count: usize,
    pub total_score: f64,
    pub total_challenge_score: f64,
    pub combined_score: f64,
    pub avg_score: f64,
    pub top_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWeeklyPoint {
    pub team_name: String,
    pub week_num: usize,
    pub week_date: String,
    pub team_weekly_score: f64,
    pub team_weekly_challenge_score: f64,
    pub active_members: usize,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub rank: usize,
    pub name: String,
    pub team: String,
    pub score: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TeamSummaryRow {
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "Members")]
    #[tabled(rename = "Members")]
    pub members: usize,
    #[serde(rename = "ActivityScore")]
    #[tabled(rename = "ActivityScore")]
    pub activity_score: String,
    #[serde(rename = "ChallengeScore")]
    #[tabled(rename = "ChallengeScore")]
    pub challenge_score: String,
    #[serde(rename = "CombinedScore")]
    #[tabled(rename = "CombinedScore")]
    pub combined_score: String,
    #[serde(rename = "AvgScore")]
    #[tabled(rename = "AvgScore")]
    pub avg_score: String,
    #[serde(rename = "TopScore")]
    #[tabled(rename = "TopScore")]
    pub top_score: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MemberRankRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TeamWeeklyRow {
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "Week")]
    #[tabled(rename = "Week")]
    pub week_num: usize,
    #[serde(rename = "WeekDate")]
    #[tabled(rename = "WeekDate")]
    pub week_date: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
    #[serde(rename = "ChallengeScore")]
    #[tabled(rename = "ChallengeScore")]
    pub challenge_score: String,
    #[serde(rename = "Active")]
    #[tabled(rename = "Active")]
    pub active_members: usize,
    #[serde(rename = "Members")]
    #[tabled(rename = "Members")]
    pub member_count: usize,
    #[serde(rename = "ParticipationPct")]
    #[tabled(rename = "ParticipationPct")]
    pub participation_pct: i64,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub generated_on: chrono::NaiveDate,
    pub total_members: usize,
    pub total_teams: usize,
    pub total_weeks: usize,
    pub total_activity_score: f64,
    pub total_challenge_score: f64,
    pub leading_team: Option<String>,
    pub top_performer: Option<String>,
    pub skipped_rows: usize,
}
