//! Read-only aggregations over stored progress and quiz-result rows. No
//! caching, no mutation. A `None` average means "no data" and is handed to
//! the caller as such; coercion to 0.0 for display is the caller's job.

use crate::db::operations::progress::{self, UserProgress};
use crate::db::operations::results;
use crate::db::Database;
use crate::error::EngineError;

pub async fn average_completion_by_student(
    db: &Database,
    student_id: i64,
) -> Result<Option<f64>, EngineError> {
    Ok(progress::avg_completion_by_student(db.pool(), student_id).await?)
}

pub async fn average_completion_by_course(
    db: &Database,
    course_id: i64,
) -> Result<Option<f64>, EngineError> {
    Ok(progress::avg_completion_by_course(db.pool(), course_id).await?)
}

pub async fn completed_courses_count(
    db: &Database,
    student_id: i64,
) -> Result<i64, EngineError> {
    Ok(progress::count_by_student(db.pool(), student_id, true).await?)
}

pub async fn enrolled_courses_count(db: &Database, student_id: i64) -> Result<i64, EngineError> {
    Ok(progress::count_by_student(db.pool(), student_id, false).await?)
}

pub async fn completed_students_count(
    db: &Database,
    course_id: i64,
) -> Result<i64, EngineError> {
    Ok(progress::count_by_course(db.pool(), course_id, true).await?)
}

pub async fn enrolled_students_count(db: &Database, course_id: i64) -> Result<i64, EngineError> {
    Ok(progress::count_by_course(db.pool(), course_id, false).await?)
}

/// All progress records at or above the given completion percentage.
pub async fn high_performers(
    db: &Database,
    min_percentage: f64,
) -> Result<Vec<UserProgress>, EngineError> {
    Ok(progress::list_at_or_above_percentage(db.pool(), min_percentage).await?)
}

pub async fn correct_answers_count(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<i64, EngineError> {
    Ok(results::count_by_student_and_course(db.pool(), student_id, course_id, true).await?)
}

pub async fn total_answers_count(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<i64, EngineError> {
    Ok(results::count_by_student_and_course(db.pool(), student_id, course_id, false).await?)
}

pub async fn average_score_by_student_and_course(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<Option<f64>, EngineError> {
    Ok(results::avg_points_by_student_and_course(db.pool(), student_id, course_id).await?)
}
