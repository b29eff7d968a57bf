use serde::Serialize;

use crate::children::repo::Child;
use crate::insights::repo::{SelInsight, COMPETENCY_COUNT, COMPETENCY_MAX};

use super::window::{partition_by_month, MonthBucket};

/// Per-bucket summary. `average_score` is on a 0-100 scale (competency
/// mean over its 0-10 range, as a percentage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub month: String,
    pub count: usize,
    pub completion_rate: u8,
    pub average_score: i32,
}

fn score_percent(total: i32, records: usize) -> i32 {
    let mean = total as f64 / (records * COMPETENCY_COUNT) as f64;
    (mean / COMPETENCY_MAX as f64 * 100.0).round() as i32
}

fn completion_percent(count: usize, active_children: usize, cadence: u32) -> u8 {
    let expected = active_children as u64 * cadence as u64;
    if expected == 0 {
        return 0;
    }
    let rate = (count as f64 / expected as f64 * 100.0).round() as u64;
    rate.min(100) as u8
}

/// Reduces each month bucket to summary statistics. An empty bucket
/// carries forward the previous bucket's average (0 when there is no
/// previous value) so trend lines do not cliff to zero.
pub fn summarize(
    buckets: &[MonthBucket],
    insights: &[SelInsight],
    active_children: usize,
    cadence: u32,
) -> Vec<BucketStats> {
    let partitioned = partition_by_month(buckets, insights, |i| i.recorded_at);

    let mut stats = Vec::with_capacity(buckets.len());
    let mut carried_average = 0;
    for (bucket, records) in buckets.iter().zip(partitioned) {
        let count = records.len();
        let average_score = if count > 0 {
            let total: i32 = records.iter().map(|i| i.competency_sum()).sum();
            score_percent(total, count)
        } else {
            carried_average
        };
        carried_average = average_score;

        stats.push(BucketStats {
            month: bucket.label(),
            count,
            completion_rate: completion_percent(count, active_children, cadence),
            average_score,
        });
    }
    stats
}

/// Headline numbers for the parent dashboard. `None` when the parent has
/// no children, so callers never divide by zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    pub total_children: usize,
    pub total_insights: usize,
    pub average_score: i32,
    pub active_streaks: usize,
}

/// Streaks at or above this length count as "active" on the dashboard.
pub const ACTIVE_STREAK_MIN: i32 = 3;

pub fn overall_stats(children: &[Child], insights: &[SelInsight]) -> Option<OverallStats> {
    if children.is_empty() {
        return None;
    }
    let average_score = if insights.is_empty() {
        0
    } else {
        let total: i32 = insights.iter().map(|i| i.competency_sum()).sum();
        score_percent(total, insights.len())
    };
    Some(OverallStats {
        total_children: children.len(),
        total_insights: insights.len(),
        average_score,
        active_streaks: children
            .iter()
            .filter(|c| c.streak_count >= ACTIVE_STREAK_MIN)
            .count(),
    })
}

#[cfg(test)]
pub(super) mod test_support {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::children::repo::Child;
    use crate::insights::repo::SelInsight;

    pub fn insight(child_id: Uuid, recorded_at: OffsetDateTime, score: i16) -> SelInsight {
        SelInsight {
            id: Uuid::new_v4(),
            child_id,
            self_awareness: score,
            self_management: score,
            social_awareness: score,
            relationship_skills: score,
            responsible_decision: score,
            source_text: None,
            recorded_at,
            created_at: recorded_at,
        }
    }

    pub fn child(parent_id: Uuid, date_of_birth: time::Date, streak: i32) -> Child {
        Child {
            id: Uuid::new_v4(),
            parent_id,
            display_name: "Sprout".to_string(),
            date_of_birth,
            grade: None,
            avatar: None,
            learning_styles: vec![],
            sel_strengths: vec![],
            interests: vec![],
            story_preferences: vec![],
            sel_challenges: vec![],
            relationship_to_parent: None,
            streak_count: streak,
            xp_points: 0,
            badges: vec![],
            daily_check_in_completed: false,
            last_check_in_date: None,
            creation_status: "completed".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod aggregate_tests {
    use super::test_support::{child, insight};
    use super::*;
    use crate::progress::window::{month_buckets, Lookback};
    use crate::progress::DEFAULT_ENTRIES_PER_CHILD_PER_MONTH;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn single_insight_this_month_with_leading_empty_buckets() {
        let now = datetime!(2026-08-29 10:00 UTC);
        let buckets = month_buckets(now, Lookback::ThreeMonths);
        let insights = vec![insight(Uuid::new_v4(), datetime!(2026-08-10 09:00 UTC), 8)];

        let stats = summarize(&buckets, &insights, 1, DEFAULT_ENTRIES_PER_CHILD_PER_MONTH);
        let averages: Vec<i32> = stats.iter().map(|s| s.average_score).collect();
        assert_eq!(averages, vec![0, 0, 80]);
        assert_eq!(stats[2].count, 1);
        // one of four expected entries this month
        assert_eq!(stats[2].completion_rate, 25);
    }

    #[test]
    fn empty_bucket_carries_previous_average_forward() {
        let now = datetime!(2026-08-29 10:00 UTC);
        let buckets = month_buckets(now, Lookback::ThreeMonths);
        let insights = vec![insight(Uuid::new_v4(), datetime!(2026-06-10 09:00 UTC), 6)];

        let stats = summarize(&buckets, &insights, 1, DEFAULT_ENTRIES_PER_CHILD_PER_MONTH);
        let averages: Vec<i32> = stats.iter().map(|s| s.average_score).collect();
        assert_eq!(averages, vec![60, 60, 60]);
        assert_eq!(stats[1].count, 0);
        assert_eq!(stats[2].count, 0);
    }

    #[test]
    fn completion_rate_is_clamped_to_100() {
        let now = datetime!(2026-08-29 10:00 UTC);
        let buckets = month_buckets(now, Lookback::ThreeMonths);
        let child_id = Uuid::new_v4();
        // far more than the expected four entries for one child
        let insights: Vec<_> = (1..=9)
            .map(|day| {
                insight(
                    child_id,
                    datetime!(2026-08-02 09:00 UTC) + time::Duration::days(day),
                    5,
                )
            })
            .collect();

        let stats = summarize(&buckets, &insights, 1, DEFAULT_ENTRIES_PER_CHILD_PER_MONTH);
        assert_eq!(stats[2].count, 9);
        assert_eq!(stats[2].completion_rate, 100);
    }

    #[test]
    fn zero_active_children_yields_zero_rate_without_panicking() {
        let now = datetime!(2026-08-29 10:00 UTC);
        let buckets = month_buckets(now, Lookback::ThreeMonths);
        let stats = summarize(&buckets, &[], 0, DEFAULT_ENTRIES_PER_CHILD_PER_MONTH);
        assert!(stats.iter().all(|s| s.completion_rate == 0));
        assert!(stats.iter().all(|s| s.average_score == 0));
    }

    #[test]
    fn mixed_scores_average_across_records_and_fields() {
        let now = datetime!(2026-08-29 10:00 UTC);
        let buckets = month_buckets(now, Lookback::ThreeMonths);
        let child_id = Uuid::new_v4();
        let insights = vec![
            insight(child_id, datetime!(2026-08-05 09:00 UTC), 4),
            insight(child_id, datetime!(2026-08-20 09:00 UTC), 8),
        ];

        let stats = summarize(&buckets, &insights, 1, DEFAULT_ENTRIES_PER_CHILD_PER_MONTH);
        // field mean is 6 on the 0-10 scale
        assert_eq!(stats[2].average_score, 60);
    }

    #[test]
    fn overall_stats_absent_without_children() {
        assert_eq!(overall_stats(&[], &[]), None);
    }

    #[test]
    fn overall_stats_counts_active_streaks() {
        let parent = Uuid::new_v4();
        let children = vec![
            child(parent, date!(2018 - 04 - 02), 5),
            child(parent, date!(2016 - 11 - 20), 1),
        ];
        let insights = vec![insight(children[0].id, datetime!(2026-08-01 09:00 UTC), 8)];

        let stats = overall_stats(&children, &insights).expect("children present");
        assert_eq!(stats.total_children, 2);
        assert_eq!(stats.total_insights, 1);
        assert_eq!(stats.average_score, 80);
        assert_eq!(stats.active_streaks, 1);
    }
}
