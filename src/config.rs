// Runtime knobs for column discovery and the derived views.
//
// Every field has a default matching the club's export format, so an empty
// JSON object (or no config file at all) yields a working setup.
use crate::error::{LeaderboardError, Result};
use crate::rankings::MAX_BUCKETS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a week column finds its challenge column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengePairing {
    /// First challenge column whose header contains the week label.
    ///
    /// Containment is plain substring matching, so week `1/1` also matches
    /// `1/13 Challenge`; whichever of those comes first in the header wins.
    /// Use `Positional` when labels share prefixes and the order is reliable.
    #[default]
    Substring,
    /// The i-th challenge column belongs to the i-th week column.
    Positional,
}

/// Key used for the default team ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSort {
    #[default]
    Combined,
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub name_column: String,
    pub team_column: String,
    /// Candidate headers for the external id; the first one present wins.
    pub external_id_columns: Vec<String>,
    pub challenge_marker: String,
    pub challenge_pairing: ChallengePairing,
    pub team_sort: TeamSort,
    pub top_n: usize,
    pub bucket_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            name_column: "Name".to_string(),
            team_column: "Team Name".to_string(),
            external_id_columns: vec!["Strava id".to_string(), "Strava Id".to_string()],
            challenge_marker: "Challenge".to_string(),
            challenge_pairing: ChallengePairing::Substring,
            team_sort: TeamSort::Combined,
            top_n: 10,
            bucket_count: 4,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: DashboardConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).map_err(|source| LeaderboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name_column.trim().is_empty() || self.team_column.trim().is_empty() {
            return Err(LeaderboardError::Config(
                "name_column and team_column must not be empty".to_string(),
            ));
        }
        if self.challenge_marker.is_empty() {
            return Err(LeaderboardError::Config(
                "challenge_marker must not be empty".to_string(),
            ));
        }
        if self.bucket_count > MAX_BUCKETS {
            return Err(LeaderboardError::Config(format!(
                "bucket_count must be at most {}, got {}",
                MAX_BUCKETS, self.bucket_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = DashboardConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg =
            DashboardConfig::from_json_str(r#"{"challenge_pairing": "positional", "top_n": 5}"#)
                .unwrap();
        assert_eq!(cfg.challenge_pairing, ChallengePairing::Positional);
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.team_column, "Team Name");
    }

    #[test]
    fn rejects_blank_identity_columns() {
        let err = DashboardConfig::from_json_str(r#"{"team_column": " "}"#).unwrap_err();
        assert!(matches!(err, LeaderboardError::Config(_)));
    }

    #[test]
    fn rejects_oversized_bucket_count() {
        let err = DashboardConfig::from_json_str(r#"{"bucket_count": 1000000}"#).unwrap_err();
        assert!(matches!(err, LeaderboardError::Config(_)));
        assert!(DashboardConfig::from_json_str(r#"{"bucket_count": 100}"#).is_ok());
    }
}
