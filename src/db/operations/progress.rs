use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::operations::SqliteExec;

/// Per-(student, course) aggregate of consumption and completion state.
/// `completion_percentage` and `is_completed` are derived; callers go
/// through `services::progress::recompute` after mutating the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub lessons_completed: i64,
    pub total_lessons: i64,
    pub quiz_score: f64,
    pub total_time_spent: i64,
    pub completion_percentage: f64,
    pub is_completed: bool,
    pub last_accessed_lesson_id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

fn map_progress(row: &SqliteRow) -> UserProgress {
    UserProgress {
        id: row.get("id"),
        student_id: row.get("student_id"),
        course_id: row.get("course_id"),
        lessons_completed: row.get("lessons_completed"),
        total_lessons: row.get("total_lessons"),
        quiz_score: row.get("quiz_score"),
        total_time_spent: row.get("total_time_spent"),
        completion_percentage: row.get("completion_percentage"),
        is_completed: row.get("is_completed"),
        last_accessed_lesson_id: row.get("last_accessed_lesson_id"),
        started_at: row.get("started_at"),
        completed_at: row.get("completed_at"),
        last_updated: row.get("last_updated"),
    }
}

pub async fn find_by_student_and_course<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    course_id: i64,
) -> Result<Option<UserProgress>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT * FROM "user_progress" WHERE "student_id" = ? AND "course_id" = ? LIMIT 1"#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(|r| map_progress(&r)))
}

pub async fn insert<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    course_id: i64,
    total_lessons: i64,
    now: DateTime<Utc>,
) -> Result<UserProgress, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO "user_progress"
          ("student_id", "course_id", "lessons_completed", "total_lessons",
           "quiz_score", "total_time_spent", "completion_percentage",
           "is_completed", "last_accessed_lesson_id", "started_at",
           "completed_at", "last_updated")
        VALUES (?, ?, 0, ?, 0.0, 0, 0.0, 0, NULL, ?, NULL, ?)
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .bind(total_lessons)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(UserProgress {
        id: result.last_insert_rowid(),
        student_id,
        course_id,
        lessons_completed: 0,
        total_lessons,
        quiz_score: 0.0,
        total_time_spent: 0,
        completion_percentage: 0.0,
        is_completed: false,
        last_accessed_lesson_id: None,
        started_at: now,
        completed_at: None,
        last_updated: now,
    })
}

/// Full-row write-back of a mutated record.
pub async fn update<'e, E: SqliteExec<'e>>(
    executor: E,
    progress: &UserProgress,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE "user_progress"
        SET "lessons_completed" = ?, "total_lessons" = ?, "quiz_score" = ?,
            "total_time_spent" = ?, "completion_percentage" = ?, "is_completed" = ?,
            "last_accessed_lesson_id" = ?, "completed_at" = ?, "last_updated" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(progress.lessons_completed)
    .bind(progress.total_lessons)
    .bind(progress.quiz_score)
    .bind(progress.total_time_spent)
    .bind(progress.completion_percentage)
    .bind(progress.is_completed)
    .bind(progress.last_accessed_lesson_id)
    .bind(progress.completed_at)
    .bind(progress.last_updated)
    .bind(progress.id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Returns whether a record existed.
pub async fn delete_by_student_and_course<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    course_id: i64,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query(r#"DELETE FROM "user_progress" WHERE "student_id" = ? AND "course_id" = ?"#)
            .bind(student_id)
            .bind(course_id)
            .execute(executor)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_by_student<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
) -> Result<Vec<UserProgress>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT * FROM "user_progress" WHERE "student_id" = ? ORDER BY "last_updated" DESC"#,
    )
    .bind(student_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_progress).collect())
}

pub async fn list_by_course<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
) -> Result<Vec<UserProgress>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "user_progress"
        WHERE "course_id" = ?
        ORDER BY "completion_percentage" DESC
        "#,
    )
    .bind(course_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_progress).collect())
}

pub async fn list_by_student_and_completion<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    completed: bool,
) -> Result<Vec<UserProgress>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "user_progress"
        WHERE "student_id" = ? AND "is_completed" = ?
        ORDER BY "last_updated" DESC
        "#,
    )
    .bind(student_id)
    .bind(completed)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_progress).collect())
}

/// NULL (no rows) stays `None`; display-level coercion to 0.0 is the
/// caller's business.
pub async fn avg_completion_by_student<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT AVG("completion_percentage") FROM "user_progress" WHERE "student_id" = ?"#,
    )
    .bind(student_id)
    .fetch_one(executor)
    .await
}

pub async fn avg_completion_by_course<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT AVG("completion_percentage") FROM "user_progress" WHERE "course_id" = ?"#,
    )
    .bind(course_id)
    .fetch_one(executor)
    .await
}

pub async fn count_by_student<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    completed_only: bool,
) -> Result<i64, sqlx::Error> {
    if completed_only {
        sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM "user_progress" WHERE "student_id" = ? AND "is_completed" = 1"#,
        )
        .bind(student_id)
        .fetch_one(executor)
        .await
    } else {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user_progress" WHERE "student_id" = ?"#)
            .bind(student_id)
            .fetch_one(executor)
            .await
    }
}

pub async fn count_by_course<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
    completed_only: bool,
) -> Result<i64, sqlx::Error> {
    if completed_only {
        sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM "user_progress" WHERE "course_id" = ? AND "is_completed" = 1"#,
        )
        .bind(course_id)
        .fetch_one(executor)
        .await
    } else {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user_progress" WHERE "course_id" = ?"#)
            .bind(course_id)
            .fetch_one(executor)
            .await
    }
}

pub async fn list_at_or_above_percentage<'e, E: SqliteExec<'e>>(
    executor: E,
    min_percentage: f64,
) -> Result<Vec<UserProgress>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "user_progress"
        WHERE "completion_percentage" >= ?
        ORDER BY "completion_percentage" DESC
        "#,
    )
    .bind(min_percentage)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_progress).collect())
}
