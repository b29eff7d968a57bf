use sqlx::PgPool;
use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::children::repo::Child;
use crate::children::services::XP_PER_JOURNAL;

use super::repo::{JournalEntry, Ratings, Reflections};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// First write for this day; journal XP is granted.
    NewDay { xp_awarded: i32 },
    /// The day already has an entry: the new values replace it in place
    /// (one row per child per day) and no further XP is granted.
    Replacement,
}

/// Pure XP decision for a journal submission. Only a pre-existing entry
/// for the same calendar day suppresses the award; history on other
/// days is irrelevant.
pub fn evaluate_submission(
    existing: Option<&JournalEntry>,
    entry_date: Date,
) -> SubmissionOutcome {
    match existing {
        Some(prev) if prev.entry_date == entry_date => SubmissionOutcome::Replacement,
        _ => SubmissionOutcome::NewDay {
            xp_awarded: XP_PER_JOURNAL,
        },
    }
}

#[derive(Debug)]
pub struct SubmittedEntry {
    pub entry: JournalEntry,
    /// XP is granted only for the first write of a given day; replacing
    /// the same day's entry does not award again.
    pub xp_awarded: i32,
}

/// Writes the day's journal entry (latest write wins) and awards XP once
/// per new day, all in one transaction. `None` when the child is unknown.
pub async fn submit_entry(
    db: &PgPool,
    child_id: Uuid,
    entry_date: Date,
    ratings: Ratings,
    reflections: &Reflections,
) -> anyhow::Result<Option<SubmittedEntry>> {
    let mut tx = db.begin().await?;

    let Some(_child) = Child::lock_for_update(&mut tx, child_id).await? else {
        tx.rollback().await?;
        return Ok(None);
    };

    let existing = JournalEntry::find_by_day(&mut tx, child_id, entry_date).await?;
    let outcome = evaluate_submission(existing.as_ref(), entry_date);

    let entry = JournalEntry::upsert(&mut tx, child_id, entry_date, ratings, reflections).await?;

    let xp_awarded = match outcome {
        SubmissionOutcome::NewDay { xp_awarded } => {
            Child::award_xp(&mut tx, child_id, xp_awarded).await?;
            xp_awarded
        }
        SubmissionOutcome::Replacement => 0,
    };

    tx.commit().await?;
    info!(%child_id, %entry_date, xp_awarded, "journal entry submitted");
    Ok(Some(SubmittedEntry { entry, xp_awarded }))
}

#[cfg(test)]
mod journal_tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;

    fn entry_for(child_id: Uuid, entry_date: Date, mood: Option<i16>) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4(),
            child_id,
            entry_date,
            mood,
            sleep: None,
            water: None,
            exercise: None,
            mindfulness: None,
            kindness: None,
            positivity: None,
            confidence: None,
            gratitude: None,
            highlight: None,
            challenge: None,
            goal: None,
            notes: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn first_write_of_the_day_awards_xp() {
        let outcome = evaluate_submission(None, date!(2026 - 08 - 29));
        assert_eq!(
            outcome,
            SubmissionOutcome::NewDay {
                xp_awarded: XP_PER_JOURNAL
            }
        );
    }

    #[test]
    fn same_day_rewrite_replaces_without_further_xp() {
        let today = date!(2026 - 08 - 29);
        let existing = entry_for(Uuid::new_v4(), today, Some(4));
        let outcome = evaluate_submission(Some(&existing), today);
        assert_eq!(outcome, SubmissionOutcome::Replacement);
    }

    #[test]
    fn entry_from_another_day_does_not_suppress_xp() {
        let existing = entry_for(Uuid::new_v4(), date!(2026 - 08 - 28), Some(7));
        let outcome = evaluate_submission(Some(&existing), date!(2026 - 08 - 29));
        assert_eq!(
            outcome,
            SubmissionOutcome::NewDay {
                xp_awarded: XP_PER_JOURNAL
            }
        );
    }
}
