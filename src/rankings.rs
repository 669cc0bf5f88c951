use crate::aggregate::desc;
use crate::types::{MemberRecord, TopPerformer};
use crate::util::format_score;
use serde::Serialize;

/// Upper limit on distribution buckets.
pub const MAX_BUCKETS: usize = 100;

/// The `n` highest `total_score` members. The sort is stable, so ties keep
/// their input order.
pub fn top_performers(members: &[MemberRecord], n: usize) -> Vec<TopPerformer> {
    let mut ranked: Vec<&MemberRecord> = members.iter().collect();
    ranked.sort_by(|a, b| desc(a.total_score, b.total_score));
    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, m)| TopPerformer {
            rank: idx + 1,
            name: m.name.clone(),
            team: m.team.clone(),
            score: m.total_score,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    /// 1-based.
    pub index: usize,
    pub label: String,
    pub lower_bound: f64,
    /// `None` for the last bucket, which is open above.
    pub upper_bound: Option<f64>,
    /// Members in this bucket across all teams.
    pub total: usize,
    /// Member count per team, teams in order of first appearance.
    pub team_counts: Vec<(String, usize)>,
}

impl DistributionBucket {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.lower_bound && self.upper_bound.map_or(true, |ub| score < ub)
    }

    /// Share of this bucket held by each team, in percent. An empty bucket
    /// reports 0 for every team.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        self.team_counts
            .iter()
            .map(|(team, count)| {
                let pct = if self.total > 0 {
                    *count as f64 / self.total as f64 * 100.0
                } else {
                    0.0
                };
                (team.clone(), pct)
            })
            .collect()
    }
}

/// Split `[0, max total_score]` into `bucket_count` equal-width buckets and
/// count members per team in each.
///
/// Width is `ceil(max / bucket_count)`; the last bucket has no upper bound.
/// A negative total lands in the first bucket so every member is counted
/// exactly once. `bucket_count` is clamped to `1..=MAX_BUCKETS`.
pub fn distribution(members: &[MemberRecord], bucket_count: usize) -> Vec<DistributionBucket> {
    let bucket_count = bucket_count.clamp(1, MAX_BUCKETS);
    let max_score = members
        .iter()
        .map(|m| m.total_score)
        .fold(0.0_f64, f64::max);
    let width = (max_score / bucket_count as f64).ceil();

    let mut teams: Vec<String> = Vec::new();
    for m in members {
        if !teams.contains(&m.team) {
            teams.push(m.team.clone());
        }
    }

    let mut buckets: Vec<DistributionBucket> = (0..bucket_count)
        .map(|i| {
            let lower_bound = i as f64 * width;
            let last = i + 1 == bucket_count;
            let upper_bound = if last { None } else { Some((i + 1) as f64 * width) };
            let label = match upper_bound {
                Some(ub) => format!(
                    "Bucket {} ({}-{})",
                    i + 1,
                    format_score(lower_bound),
                    format_score(ub)
                ),
                None => format!("Bucket {} ({}+)", i + 1, format_score(lower_bound)),
            };
            DistributionBucket {
                index: i + 1,
                label,
                lower_bound,
                upper_bound,
                total: 0,
                team_counts: teams.iter().map(|t| (t.clone(), 0)).collect(),
            }
        })
        .collect();

    for m in members {
        let slot = buckets
            .iter()
            .position(|b| b.contains(m.total_score))
            .unwrap_or(0);
        let bucket = &mut buckets[slot];
        bucket.total += 1;
        if let Some(entry) = bucket.team_counts.iter_mut().find(|(t, _)| *t == m.team) {
            entry.1 += 1;
        }
    }

    buckets
}
