use serde::Serialize;
use uuid::Uuid;

use crate::children::repo::Child;
use crate::insights::repo::{SelInsight, COMPETENCY_COUNT, COMPETENCY_MAX};

/// Bucket-over-bucket deltas on the already-rounded averages; the first
/// bucket has no predecessor and gets 0.
pub fn improvements(averages: &[i32]) -> Vec<i32> {
    averages
        .iter()
        .enumerate()
        .map(|(i, &avg)| if i == 0 { 0 } else { avg - averages[i - 1] })
        .collect()
}

/// One row of the "Top Improvers" ranking. Scores are 0-100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovementEntry {
    pub child_id: Uuid,
    pub display_name: String,
    pub first_score: i32,
    pub last_score: i32,
    pub improvement: i32,
}

fn score_fraction(insight: &SelInsight) -> f64 {
    let mean = insight.competency_sum() as f64 / COMPETENCY_COUNT as f64;
    mean / COMPETENCY_MAX as f64
}

/// Ranks children by improvement between their first and last insight.
/// Children with fewer than two insights are excluded entirely, not
/// scored as zero. Ties keep the input order (children arrive oldest
/// first from the store).
pub fn rank_top_improvers(children: &[Child], insights: &[SelInsight]) -> Vec<ImprovementEntry> {
    let mut entries: Vec<ImprovementEntry> = children
        .iter()
        .filter_map(|child| {
            // insights arrive ascending by recorded_at
            let mut history = insights.iter().filter(|i| i.child_id == child.id);
            let first = history.next()?;
            let last = history.last()?;

            let first_frac = score_fraction(first);
            let last_frac = score_fraction(last);
            Some(ImprovementEntry {
                child_id: child.id,
                display_name: child.display_name.clone(),
                first_score: (first_frac * 100.0).round() as i32,
                last_score: (last_frac * 100.0).round() as i32,
                improvement: ((last_frac - first_frac) * 100.0).round() as i32,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.improvement.cmp(&a.improvement));
    entries
}
