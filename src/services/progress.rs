//! Progress tracker: owns the per-(student, course) progress record and
//! its enrollment lifecycle. Derived state is recomputed by the pure
//! `recompute` function after every mutation, never inside field setters.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::db::operations::content;
use crate::db::operations::progress::{self, UserProgress};
use crate::db::operations::users;
use crate::db::Database;
use crate::error::EngineError;

/// Applies the derived-state invariant: whenever `total_lessons > 0`,
/// `completion_percentage = 100 * lessons_completed / total_lessons` and
/// `is_completed` iff the counters are equal. `completed_at` is stamped on
/// the first transition into completed and never overwritten afterwards.
pub fn recompute(mut record: UserProgress, now: DateTime<Utc>) -> UserProgress {
    if record.total_lessons > 0 {
        record.completion_percentage =
            record.lessons_completed as f64 * 100.0 / record.total_lessons as f64;
        let completed = record.lessons_completed == record.total_lessons;
        if completed && record.completed_at.is_none() {
            record.completed_at = Some(now);
        }
        record.is_completed = completed;
    }
    record
}

async fn get_or_create_in(
    conn: &mut SqliteConnection,
    student_id: i64,
    course_id: i64,
    now: DateTime<Utc>,
) -> Result<UserProgress, EngineError> {
    if let Some(existing) =
        progress::find_by_student_and_course(&mut *conn, student_id, course_id).await?
    {
        return Ok(existing);
    }

    users::get_user(&mut *conn, student_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("student {student_id}")))?;
    content::get_course(&mut *conn, course_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("course {course_id}")))?;

    // Snapshot the lesson count at enrollment time.
    let total_lessons = content::count_lessons_by_course(&mut *conn, course_id).await?;
    let record = progress::insert(&mut *conn, student_id, course_id, total_lessons, now).await?;

    tracing::info!(student_id, course_id, total_lessons, "progress record created");
    Ok(record)
}

pub async fn get_or_create(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<UserProgress, EngineError> {
    let mut tx = db.pool().begin().await?;
    let record = get_or_create_in(&mut tx, student_id, course_id, Utc::now()).await?;
    tx.commit().await?;
    Ok(record)
}

/// Idempotent: an existing record is returned untouched.
pub async fn enroll(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<UserProgress, EngineError> {
    get_or_create(db, student_id, course_id).await
}

/// Deleting an absent record is a no-op, not an error.
pub async fn unenroll(db: &Database, student_id: i64, course_id: i64) -> Result<(), EngineError> {
    let existed =
        progress::delete_by_student_and_course(db.pool(), student_id, course_id).await?;
    if existed {
        tracing::info!(student_id, course_id, "progress record deleted");
    }
    Ok(())
}

pub async fn record_lesson_progress(
    db: &Database,
    student_id: i64,
    course_id: i64,
    lesson_id: i64,
    minutes_spent: Option<i64>,
    completed: Option<bool>,
) -> Result<UserProgress, EngineError> {
    let now = Utc::now();
    let mut tx = db.pool().begin().await?;

    let mut record = get_or_create_in(&mut tx, student_id, course_id, now).await?;

    if let Some(minutes) = minutes_spent {
        record.total_time_spent += minutes;
    }
    record.last_accessed_lesson_id = Some(lesson_id);

    // No per-lesson ledger exists: every completed=true event increments
    // the counter, so re-marking the same lesson inflates it past
    // total_lessons.
    if completed == Some(true) {
        record.lessons_completed += 1;
    }

    record.last_updated = now;
    let record = recompute(record, now);
    progress::update(&mut *tx, &record).await?;
    tx.commit().await?;
    Ok(record)
}

/// Returns the record to its enrolled-but-untouched shape. Everything is
/// zeroed except the `total_lessons` snapshot.
pub async fn reset(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<UserProgress, EngineError> {
    let mut tx = db.pool().begin().await?;

    let mut record = progress::find_by_student_and_course(&mut *tx, student_id, course_id)
        .await?
        .ok_or_else(|| {
            EngineError::invalid_state(format!(
                "no progress record for student {student_id} in course {course_id}"
            ))
        })?;

    record.lessons_completed = 0;
    record.quiz_score = 0.0;
    record.total_time_spent = 0;
    record.completion_percentage = 0.0;
    record.is_completed = false;
    record.last_accessed_lesson_id = None;
    record.completed_at = None;
    record.last_updated = Utc::now();

    progress::update(&mut *tx, &record).await?;
    tx.commit().await?;

    tracing::info!(student_id, course_id, "progress reset");
    Ok(record)
}

pub async fn update_quiz_score(
    db: &Database,
    student_id: i64,
    course_id: i64,
    score: f64,
) -> Result<UserProgress, EngineError> {
    let now = Utc::now();
    let mut tx = db.pool().begin().await?;
    let mut record = get_or_create_in(&mut tx, student_id, course_id, now).await?;
    record.quiz_score = score;
    record.last_updated = now;
    progress::update(&mut *tx, &record).await?;
    tx.commit().await?;
    Ok(record)
}

pub async fn get_progress(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<Option<UserProgress>, EngineError> {
    Ok(progress::find_by_student_and_course(db.pool(), student_id, course_id).await?)
}

pub async fn list_by_student(
    db: &Database,
    student_id: i64,
) -> Result<Vec<UserProgress>, EngineError> {
    Ok(progress::list_by_student(db.pool(), student_id).await?)
}

pub async fn list_by_course(
    db: &Database,
    course_id: i64,
) -> Result<Vec<UserProgress>, EngineError> {
    Ok(progress::list_by_course(db.pool(), course_id).await?)
}

pub async fn list_completed_by_student(
    db: &Database,
    student_id: i64,
) -> Result<Vec<UserProgress>, EngineError> {
    Ok(progress::list_by_student_and_completion(db.pool(), student_id, true).await?)
}

pub async fn list_in_progress_by_student(
    db: &Database,
    student_id: i64,
) -> Result<Vec<UserProgress>, EngineError> {
    Ok(progress::list_by_student_and_completion(db.pool(), student_id, false).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lessons_completed: i64, total_lessons: i64) -> UserProgress {
        let now = Utc::now();
        UserProgress {
            id: 1,
            student_id: 1,
            course_id: 1,
            lessons_completed,
            total_lessons,
            quiz_score: 0.0,
            total_time_spent: 0,
            completion_percentage: 0.0,
            is_completed: false,
            last_accessed_lesson_id: None,
            started_at: now,
            completed_at: None,
            last_updated: now,
        }
    }

    #[test]
    fn percentage_tracks_counters() {
        let out = recompute(record(1, 4), Utc::now());
        assert_eq!(out.completion_percentage, 25.0);
        assert!(!out.is_completed);
        assert!(out.completed_at.is_none());
    }

    #[test]
    fn full_completion_sets_flag_and_stamp() {
        let now = Utc::now();
        let out = recompute(record(4, 4), now);
        assert_eq!(out.completion_percentage, 100.0);
        assert!(out.is_completed);
        assert_eq!(out.completed_at, Some(now));
    }

    #[test]
    fn completion_stamp_is_set_once() {
        let first = Utc::now();
        let stamped = recompute(record(3, 3), first);
        let later = first + chrono::Duration::seconds(60);
        let again = recompute(stamped, later);
        assert_eq!(again.completed_at, Some(first));
    }

    #[test]
    fn zero_total_lessons_leaves_derived_state_alone() {
        let out = recompute(record(0, 0), Utc::now());
        assert_eq!(out.completion_percentage, 0.0);
        assert!(!out.is_completed);
    }

    #[test]
    fn overcounted_record_reports_over_100_and_not_completed() {
        let out = recompute(record(5, 4), Utc::now());
        assert_eq!(out.completion_percentage, 125.0);
        assert!(!out.is_completed);
    }
}
