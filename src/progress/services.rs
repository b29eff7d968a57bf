use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::store::{RecordStore, StoreError};

use super::aggregate::{overall_stats, summarize, OverallStats};
use super::cohort::{cohort_stats, CohortStats};
use super::dto::TrendPoint;
use super::trend::{improvements, rank_top_improvers, ImprovementEntry};
use super::window::{month_buckets, Lookback};
use super::APPROX_DAYS_PER_MONTH;

/// Fetcher -> windowing -> aggregator -> delta calculator, per parent.
/// A store failure surfaces as `Err`; a parent with no data gets a real
/// (all-zero) series, never an error.
pub async fn trend_report(
    store: &dyn RecordStore,
    parent_id: Uuid,
    lookback: Lookback,
    cadence: u32,
    now: OffsetDateTime,
) -> Result<Vec<TrendPoint>, StoreError> {
    let children = store.children_of(parent_id).await?;
    let child_ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();

    let since = now - Duration::days(lookback.months() as i64 * APPROX_DAYS_PER_MONTH);
    let insights = store.insights_since(&child_ids, since).await?;

    let buckets = month_buckets(now, lookback);
    let stats = summarize(&buckets, &insights, children.len(), cadence);
    let averages: Vec<i32> = stats.iter().map(|s| s.average_score).collect();
    let deltas = improvements(&averages);

    Ok(stats
        .into_iter()
        .zip(deltas)
        .map(|(s, improvement)| TrendPoint {
            month: s.month,
            count: s.count,
            completion_rate: s.completion_rate,
            average_score: s.average_score,
            improvement,
        })
        .collect())
}

pub async fn top_improvers_report(
    store: &dyn RecordStore,
    parent_id: Uuid,
) -> Result<Vec<ImprovementEntry>, StoreError> {
    let children = store.children_of(parent_id).await?;
    let child_ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();
    let insights = store
        .insights_since(&child_ids, OffsetDateTime::UNIX_EPOCH)
        .await?;
    Ok(rank_top_improvers(&children, &insights))
}

pub async fn cohort_report(
    store: &dyn RecordStore,
    parent_id: Uuid,
    now: OffsetDateTime,
) -> Result<Vec<CohortStats>, StoreError> {
    let children = store.children_of(parent_id).await?;
    let child_ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();
    let insights = store
        .insights_since(&child_ids, OffsetDateTime::UNIX_EPOCH)
        .await?;
    Ok(cohort_stats(&children, &insights, now.date()))
}

pub async fn overview_report(
    store: &dyn RecordStore,
    parent_id: Uuid,
) -> Result<Option<OverallStats>, StoreError> {
    let children = store.children_of(parent_id).await?;
    let child_ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();
    let insights = store
        .insights_since(&child_ids, OffsetDateTime::UNIX_EPOCH)
        .await?;
    Ok(overall_stats(&children, &insights))
}

#[cfg(test)]
mod services_tests {
    use super::*;
    use crate::children::repo::Child;
    use crate::insights::repo::SelInsight;
    use crate::progress::aggregate::test_support::{child, insight};
    use crate::progress::DEFAULT_ENTRIES_PER_CHILD_PER_MONTH;
    use axum::async_trait;
    use time::macros::{date, datetime};

    /// In-memory stand-in for the Postgres store. `unavailable` simulates
    /// a transport failure, which must stay distinct from "no data".
    struct MemoryStore {
        children: Vec<Child>,
        insights: Vec<SelInsight>,
        unavailable: bool,
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn children_of(&self, parent_id: Uuid) -> Result<Vec<Child>, StoreError> {
            if self.unavailable {
                return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
            }
            Ok(self
                .children
                .iter()
                .filter(|c| c.parent_id == parent_id)
                .cloned()
                .collect())
        }

        async fn insights_since(
            &self,
            child_ids: &[Uuid],
            since: OffsetDateTime,
        ) -> Result<Vec<SelInsight>, StoreError> {
            if self.unavailable {
                return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
            }
            Ok(self
                .insights
                .iter()
                .filter(|i| child_ids.contains(&i.child_id) && i.recorded_at >= since)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn trend_for_single_recent_insight() {
        let parent_id = Uuid::new_v4();
        let kid = child(parent_id, date!(2018 - 04 - 02), 0);
        let store = MemoryStore {
            insights: vec![insight(kid.id, datetime!(2026-08-10 09:00 UTC), 8)],
            children: vec![kid],
            unavailable: false,
        };

        let now = datetime!(2026-08-29 10:00 UTC);
        let points = trend_report(
            &store,
            parent_id,
            Lookback::ThreeMonths,
            DEFAULT_ENTRIES_PER_CHILD_PER_MONTH,
            now,
        )
        .await
        .expect("store is up");

        assert_eq!(points.len(), 3);
        let averages: Vec<i32> = points.iter().map(|p| p.average_score).collect();
        let deltas: Vec<i32> = points.iter().map(|p| p.improvement).collect();
        assert_eq!(averages, vec![0, 0, 80]);
        assert_eq!(deltas, vec![0, 0, 80]);
    }

    #[tokio::test]
    async fn no_data_is_a_valid_series_not_an_error() {
        let parent_id = Uuid::new_v4();
        let store = MemoryStore {
            children: vec![child(parent_id, date!(2018 - 04 - 02), 0)],
            insights: vec![],
            unavailable: false,
        };

        let now = datetime!(2026-08-29 10:00 UTC);
        let points = trend_report(
            &store,
            parent_id,
            Lookback::SixMonths,
            DEFAULT_ENTRIES_PER_CHILD_PER_MONTH,
            now,
        )
        .await
        .expect("empty is not a failure");

        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|p| p.count == 0 && p.average_score == 0));
    }

    #[tokio::test]
    async fn store_failure_propagates_as_unavailable() {
        let store = MemoryStore {
            children: vec![],
            insights: vec![],
            unavailable: true,
        };

        let now = datetime!(2026-08-29 10:00 UTC);
        let err = trend_report(
            &store,
            Uuid::new_v4(),
            Lookback::ThreeMonths,
            DEFAULT_ENTRIES_PER_CHILD_PER_MONTH,
            now,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn overview_is_none_for_childless_parent() {
        let store = MemoryStore {
            children: vec![],
            insights: vec![],
            unavailable: false,
        };
        let stats = overview_report(&store, Uuid::new_v4())
            .await
            .expect("store is up");
        assert_eq!(stats, None);
    }

    #[tokio::test]
    async fn top_improvers_uses_full_history() {
        let parent_id = Uuid::new_v4();
        let kid = child(parent_id, date!(2017 - 02 - 11), 0);
        let store = MemoryStore {
            insights: vec![
                insight(kid.id, datetime!(2026-06-01 09:00 UTC), 4),
                insight(kid.id, datetime!(2026-08-15 09:00 UTC), 8),
            ],
            children: vec![kid.clone()],
            unavailable: false,
        };

        let ranked = top_improvers_report(&store, parent_id)
            .await
            .expect("store is up");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].first_score, 40);
        assert_eq!(ranked[0].last_score, 80);
        assert_eq!(ranked[0].improvement, 40);
    }

    #[tokio::test]
    async fn cohorts_skip_other_parents_children() {
        let parent_id = Uuid::new_v4();
        let mine = child(parent_id, date!(2019 - 03 - 01), 0);
        let other = child(Uuid::new_v4(), date!(2019 - 03 - 01), 0);
        let store = MemoryStore {
            insights: vec![insight(other.id, datetime!(2026-08-01 09:00 UTC), 9)],
            children: vec![mine, other],
            unavailable: false,
        };

        let now = datetime!(2026-08-29 10:00 UTC);
        let cohorts = cohort_report(&store, parent_id, now)
            .await
            .expect("store is up");
        assert_eq!(cohorts.len(), 1);
        assert_eq!(cohorts[0].children_count, 1);
        assert_eq!(cohorts[0].average_score, 0);
    }
}
