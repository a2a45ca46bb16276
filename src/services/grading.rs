//! Quiz grading. Submission is idempotent per (student, quiz): the first
//! attempt is graded and persisted, every later attempt is rejected, never
//! silently overwritten.

use crate::db::operations::content::{self, QuizType};
use crate::db::operations::results::{self, QuizResult};
use crate::db::operations::users;
use crate::db::Database;
use crate::error::EngineError;

/// Pure, deterministic verdict for a submitted answer.
///
/// MULTIPLE_CHOICE / TRUE_FALSE / FILL_BLANK compare trimmed and
/// case-insensitive. DRAWING and MATCHING carry serialized payloads the
/// engine does not parse; byte-for-byte equality is the contract. A quiz
/// with no stored correct answer, or a missing submission, grades
/// incorrect.
pub fn evaluate_answer(
    quiz_type: QuizType,
    correct_answer: Option<&str>,
    submitted: Option<&str>,
) -> bool {
    let (Some(correct), Some(submitted)) = (correct_answer, submitted) else {
        return false;
    };

    match quiz_type {
        QuizType::MultipleChoice | QuizType::TrueFalse | QuizType::FillBlank => {
            correct.trim().to_lowercase() == submitted.trim().to_lowercase()
        }
        QuizType::Drawing | QuizType::Matching => correct == submitted,
    }
}

pub async fn submit_quiz_answer(
    db: &Database,
    quiz_id: i64,
    student_id: i64,
    answer: Option<&str>,
    time_taken_seconds: Option<i64>,
) -> Result<QuizResult, EngineError> {
    let mut tx = db.pool().begin().await?;

    let quiz = content::get_quiz(&mut *tx, quiz_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("quiz {quiz_id}")))?;
    users::get_user(&mut *tx, student_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("student {student_id}")))?;

    if results::find_by_student_and_quiz(&mut *tx, student_id, quiz_id)
        .await?
        .is_some()
    {
        return Err(EngineError::AlreadySubmitted);
    }

    let is_correct = evaluate_answer(quiz.quiz_type, quiz.correct_answer.as_deref(), answer);
    let points_earned = if is_correct { quiz.points } else { 0 };

    // The unique index on (student_id, quiz_id) is the real guarantee; the
    // lookup above only gives the common case a clean error before insert.
    let result = results::insert(
        &mut *tx,
        student_id,
        quiz_id,
        answer,
        is_correct,
        points_earned,
        time_taken_seconds,
        chrono::Utc::now(),
    )
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            EngineError::AlreadySubmitted
        }
        other => EngineError::Store(other),
    })?;

    tx.commit().await?;

    tracing::debug!(quiz_id, student_id, is_correct, "quiz submission graded");
    Ok(result)
}

pub async fn get_result(
    db: &Database,
    student_id: i64,
    quiz_id: i64,
) -> Result<Option<QuizResult>, EngineError> {
    Ok(results::find_by_student_and_quiz(db.pool(), student_id, quiz_id).await?)
}

pub async fn list_results_by_student(
    db: &Database,
    student_id: i64,
) -> Result<Vec<QuizResult>, EngineError> {
    Ok(results::list_by_student(db.pool(), student_id).await?)
}

pub async fn list_results_by_student_and_course(
    db: &Database,
    student_id: i64,
    course_id: i64,
) -> Result<Vec<QuizResult>, EngineError> {
    Ok(results::list_by_student_and_course(db.pool(), student_id, course_id).await?)
}
