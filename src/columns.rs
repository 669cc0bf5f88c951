//! Header classification.
//!
//! Turns the raw header strings into a typed [`ColumnSchema`] so the
//! aggregation code never has to look at header text again.

use crate::config::{ChallengePairing, DashboardConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static WEEK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+/\d+$").expect("week header pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekColumn {
    /// 1-based position among week columns; header order, not date order.
    pub week_num: usize,
    pub label: String,
    /// Position in the header row.
    pub index: usize,
    /// Header position of the paired challenge column, if any.
    pub challenge_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeColumn {
    pub label: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: Option<usize>,
    pub team: Option<usize>,
    pub external_id: Option<usize>,
    pub week_columns: Vec<WeekColumn>,
    pub challenge_columns: Vec<ChallengeColumn>,
}

pub fn is_week_header(header: &str, challenge_marker: &str) -> bool {
    WEEK_HEADER.is_match(header) && !header.contains(challenge_marker)
}

pub fn is_challenge_header(header: &str, challenge_marker: &str) -> bool {
    header.contains(challenge_marker)
}

/// Classify `headers` into identity, week and challenge columns and pair each
/// week with its challenge column according to `cfg.challenge_pairing`.
pub fn classify<S: AsRef<str>>(headers: &[S], cfg: &DashboardConfig) -> ColumnSchema {
    let marker = cfg.challenge_marker.as_str();
    let headers: Vec<&str> = headers.iter().map(|h| h.as_ref()).collect();
    let position = |wanted: &str| headers.iter().position(|h| *h == wanted);

    let name = position(cfg.name_column.as_str());
    let team = position(cfg.team_column.as_str());
    let external_id = cfg
        .external_id_columns
        .iter()
        .find_map(|candidate| position(candidate.as_str()));

    let challenge_columns: Vec<ChallengeColumn> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_challenge_header(h, marker))
        .map(|(index, h)| ChallengeColumn {
            label: h.to_string(),
            index,
        })
        .collect();

    let week_columns: Vec<WeekColumn> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_week_header(h, marker))
        .enumerate()
        .map(|(pos, (index, h))| {
            let label = h.to_string();
            let challenge_index = match cfg.challenge_pairing {
                ChallengePairing::Substring => challenge_columns
                    .iter()
                    .find(|c| c.label.contains(&label))
                    .map(|c| c.index),
                ChallengePairing::Positional => challenge_columns.get(pos).map(|c| c.index),
            };
            WeekColumn {
                week_num: pos + 1,
                label,
                index,
                challenge_index,
            }
        })
        .collect();

    debug!(
        weeks = week_columns.len(),
        challenges = challenge_columns.len(),
        has_name = name.is_some(),
        has_team = team.is_some(),
        "classified header"
    );

    ColumnSchema {
        name,
        team,
        external_id,
        week_columns,
        challenge_columns,
    }
}
