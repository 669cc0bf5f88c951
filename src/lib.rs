//! Leaderboard reporting for a weekly-scored club export.
//!
//! The pipeline runs one way: CSV text is parsed into rows ([`loader`]), the
//! header is classified ([`columns`]), rows become member records and team
//! totals ([`aggregate`]), weekly series are derived per team ([`weekly`]),
//! and rankings, distributions ([`rankings`]) and trend insights
//! ([`insights`]) are views over those. [`dashboard::Dashboard`] runs the
//! whole pipeline for one load.

pub mod aggregate;
pub mod columns;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod insights;
pub mod loader;
pub mod output;
pub mod rankings;
pub mod reports;
pub mod types;
pub mod util;
pub mod weekly;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{LeaderboardError, Result};
