use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::operations::SqliteExec;

/// Immutable record of one student's one attempt at one quiz. A unique
/// index on (student_id, quiz_id) backs the at-most-one guarantee, so
/// concurrent duplicate submissions serialize at the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: i64,
    pub student_id: i64,
    pub quiz_id: i64,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub points_earned: i64,
    pub time_taken_seconds: Option<i64>,
    pub submitted_at: DateTime<Utc>,
}

fn map_result(row: &SqliteRow) -> QuizResult {
    QuizResult {
        id: row.get("id"),
        student_id: row.get("student_id"),
        quiz_id: row.get("quiz_id"),
        user_answer: row.get("user_answer"),
        is_correct: row.get("is_correct"),
        points_earned: row.get("points_earned"),
        time_taken_seconds: row.get("time_taken_seconds"),
        submitted_at: row.get("submitted_at"),
    }
}

pub async fn find_by_student_and_quiz<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    quiz_id: i64,
) -> Result<Option<QuizResult>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT * FROM "quiz_results" WHERE "student_id" = ? AND "quiz_id" = ? LIMIT 1"#,
    )
    .bind(student_id)
    .bind(quiz_id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(|r| map_result(&r)))
}

pub async fn insert<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    quiz_id: i64,
    user_answer: Option<&str>,
    is_correct: bool,
    points_earned: i64,
    time_taken_seconds: Option<i64>,
    now: DateTime<Utc>,
) -> Result<QuizResult, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO "quiz_results"
          ("student_id", "quiz_id", "user_answer", "is_correct",
           "points_earned", "time_taken_seconds", "submitted_at")
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(student_id)
    .bind(quiz_id)
    .bind(user_answer)
    .bind(is_correct)
    .bind(points_earned)
    .bind(time_taken_seconds)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(QuizResult {
        id: result.last_insert_rowid(),
        student_id,
        quiz_id,
        user_answer: user_answer.map(str::to_string),
        is_correct,
        points_earned,
        time_taken_seconds,
        submitted_at: now,
    })
}

pub async fn list_by_student<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
) -> Result<Vec<QuizResult>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT * FROM "quiz_results" WHERE "student_id" = ? ORDER BY "submitted_at" DESC"#,
    )
    .bind(student_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_result).collect())
}

pub async fn list_by_student_and_course<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    course_id: i64,
) -> Result<Vec<QuizResult>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT "qr".* FROM "quiz_results" "qr"
        JOIN "quizzes" "q" ON "q"."id" = "qr"."quiz_id"
        JOIN "lessons" "l" ON "l"."id" = "q"."lesson_id"
        WHERE "qr"."student_id" = ? AND "l"."course_id" = ?
        ORDER BY "qr"."submitted_at" DESC
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_result).collect())
}

pub async fn count_by_student_and_course<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    course_id: i64,
    correct_only: bool,
) -> Result<i64, sqlx::Error> {
    if correct_only {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM "quiz_results" "qr"
            JOIN "quizzes" "q" ON "q"."id" = "qr"."quiz_id"
            JOIN "lessons" "l" ON "l"."id" = "q"."lesson_id"
            WHERE "qr"."student_id" = ? AND "l"."course_id" = ? AND "qr"."is_correct" = 1
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(executor)
        .await
    } else {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM "quiz_results" "qr"
            JOIN "quizzes" "q" ON "q"."id" = "qr"."quiz_id"
            JOIN "lessons" "l" ON "l"."id" = "q"."lesson_id"
            WHERE "qr"."student_id" = ? AND "l"."course_id" = ?
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(executor)
        .await
    }
}

pub async fn avg_points_by_student_and_course<'e, E: SqliteExec<'e>>(
    executor: E,
    student_id: i64,
    course_id: i64,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT AVG("qr"."points_earned") FROM "quiz_results" "qr"
        JOIN "quizzes" "q" ON "q"."id" = "qr"."quiz_id"
        JOIN "lessons" "l" ON "l"."id" = "q"."lesson_id"
        WHERE "qr"."student_id" = ? AND "l"."course_id" = ?
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_one(executor)
    .await
}
