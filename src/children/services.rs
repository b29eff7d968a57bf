use sqlx::PgPool;
use time::{Date, Duration};
use tracing::{debug, info};
use uuid::Uuid;

use super::repo::Child;

pub const XP_PER_CHECK_IN: i32 = 10;
pub const XP_PER_JOURNAL: i32 = 15;

/// Streak milestones that award a badge, each at most once per child.
pub const STREAK_BADGES: &[(i32, &str)] = &[
    (3, "streak_3"),
    (7, "streak_7"),
    (14, "streak_14"),
    (30, "streak_30"),
];

#[derive(Debug, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// Already checked in today; nothing changes.
    AlreadyCompleted,
    Updated {
        streak: i32,
        xp_awarded: i32,
        new_badges: Vec<String>,
    },
}

/// Pure streak/badge transition for a daily check-in. A check-in the day
/// after the last one extends the streak; any gap resets it to 1.
pub fn evaluate_check_in(
    streak: i32,
    last_check_in: Option<Date>,
    badges: &[String],
    today: Date,
) -> CheckInOutcome {
    if last_check_in == Some(today) {
        return CheckInOutcome::AlreadyCompleted;
    }

    let streak = match last_check_in {
        Some(last) if last == today - Duration::days(1) => streak + 1,
        _ => 1,
    };

    let new_badges: Vec<String> = STREAK_BADGES
        .iter()
        .filter(|(threshold, name)| *threshold == streak && !badges.iter().any(|b| b == name))
        .map(|(_, name)| name.to_string())
        .collect();

    CheckInOutcome::Updated {
        streak,
        xp_awarded: XP_PER_CHECK_IN,
        new_badges,
    }
}

#[derive(Debug)]
pub struct CheckInResult {
    pub child: Child,
    pub new_badges: Vec<String>,
    pub already_completed: bool,
}

/// Applies a daily check-in for the child inside a single transaction.
/// Returns `None` when the child does not exist.
pub async fn check_in(
    db: &PgPool,
    child_id: Uuid,
    today: Date,
) -> anyhow::Result<Option<CheckInResult>> {
    let mut tx = db.begin().await?;

    let Some(child) = Child::lock_for_update(&mut tx, child_id).await? else {
        tx.rollback().await?;
        return Ok(None);
    };

    match evaluate_check_in(
        child.streak_count,
        child.last_check_in_date,
        &child.badges,
        today,
    ) {
        CheckInOutcome::AlreadyCompleted => {
            tx.rollback().await?;
            debug!(%child_id, "check-in already completed today");
            Ok(Some(CheckInResult {
                child,
                new_badges: Vec::new(),
                already_completed: true,
            }))
        }
        CheckInOutcome::Updated {
            streak,
            xp_awarded,
            new_badges,
        } => {
            let mut badges = child.badges.clone();
            badges.extend(new_badges.iter().cloned());

            Child::apply_check_in(&mut tx, child_id, streak, xp_awarded, &badges, today).await?;
            tx.commit().await?;

            info!(%child_id, streak, xp_awarded, "check-in recorded");
            let mut child = child;
            child.streak_count = streak;
            child.xp_points += xp_awarded;
            child.badges = badges;
            child.daily_check_in_completed = true;
            child.last_check_in_date = Some(today);

            Ok(Some(CheckInResult {
                child,
                new_badges,
                already_completed: false,
            }))
        }
    }
}

#[cfg(test)]
mod check_in_tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn first_check_in_starts_streak_at_one() {
        let outcome = evaluate_check_in(0, None, &[], date!(2026 - 08 - 29));
        assert_eq!(
            outcome,
            CheckInOutcome::Updated {
                streak: 1,
                xp_awarded: XP_PER_CHECK_IN,
                new_badges: vec![],
            }
        );
    }

    #[test]
    fn consecutive_day_extends_streak() {
        let outcome = evaluate_check_in(1, Some(date!(2026 - 08 - 28)), &[], date!(2026 - 08 - 29));
        match outcome {
            CheckInOutcome::Updated { streak, .. } => assert_eq!(streak, 2),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn gap_resets_streak() {
        let outcome = evaluate_check_in(9, Some(date!(2026 - 08 - 25)), &[], date!(2026 - 08 - 29));
        match outcome {
            CheckInOutcome::Updated { streak, .. } => assert_eq!(streak, 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn same_day_is_idempotent() {
        let today = date!(2026 - 08 - 29);
        let outcome = evaluate_check_in(4, Some(today), &[], today);
        assert_eq!(outcome, CheckInOutcome::AlreadyCompleted);
    }

    #[test]
    fn milestone_awards_badge_once() {
        let outcome = evaluate_check_in(2, Some(date!(2026 - 08 - 28)), &[], date!(2026 - 08 - 29));
        match outcome {
            CheckInOutcome::Updated { streak, new_badges, .. } => {
                assert_eq!(streak, 3);
                assert_eq!(new_badges, vec!["streak_3".to_string()]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        // Already owned: no duplicate award even at the same streak value.
        let owned = vec!["streak_3".to_string()];
        let outcome =
            evaluate_check_in(2, Some(date!(2026 - 08 - 28)), &owned, date!(2026 - 08 - 29));
        match outcome {
            CheckInOutcome::Updated { new_badges, .. } => assert!(new_badges.is_empty()),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn streak_across_month_boundary() {
        let outcome = evaluate_check_in(5, Some(date!(2026 - 07 - 31)), &[], date!(2026 - 08 - 01));
        match outcome {
            CheckInOutcome::Updated { streak, .. } => assert_eq!(streak, 6),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
