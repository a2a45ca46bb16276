mod common;

use common::*;
use elearn_engine::db::operations::content::QuizType;
use elearn_engine::error::EngineError;
use elearn_engine::services::grading;

#[tokio::test]
async fn true_false_submission_trims_and_ignores_case() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let course = seed_course(&db, &teacher, "logic").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 1).await;
    let quiz = seed_quiz(&db, &teacher, lessons[0].id, QuizType::TrueFalse, Some("True")).await;

    let alice = seed_student(&db, "alice").await;
    let result = grading::submit_quiz_answer(&db, quiz.id, alice.id, Some(" true "), Some(12))
        .await
        .expect("submission");
    assert!(result.is_correct);
    assert_eq!(result.points_earned, 1);
    assert_eq!(result.time_taken_seconds, Some(12));

    let bob = seed_student(&db, "bob").await;
    let result = grading::submit_quiz_answer(&db, quiz.id, bob.id, Some("False"), None)
        .await
        .expect("submission");
    assert!(!result.is_correct);
    assert_eq!(result.points_earned, 0);
}

#[tokio::test]
async fn resubmission_is_rejected_and_not_overwritten() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let course = seed_course(&db, &teacher, "math").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 1).await;
    let quiz = seed_quiz(
        &db,
        &teacher,
        lessons[0].id,
        QuizType::FillBlank,
        Some("four"),
    )
    .await;
    let student = seed_student(&db, "alice").await;

    let first = grading::submit_quiz_answer(&db, quiz.id, student.id, Some("four"), None)
        .await
        .expect("first submission");
    assert!(first.is_correct);

    let second = grading::submit_quiz_answer(&db, quiz.id, student.id, Some("five"), None).await;
    assert!(matches!(second, Err(EngineError::AlreadySubmitted)));

    let stored = grading::get_result(&db, student.id, quiz.id)
        .await
        .expect("lookup")
        .expect("result exists");
    assert_eq!(stored.id, first.id);
    assert!(stored.is_correct);

    let all = grading::list_results_by_student(&db, student.id)
        .await
        .expect("list");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn matching_quiz_requires_exact_payload() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let course = seed_course(&db, &teacher, "geo").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 1).await;

    let key = serde_json::json!({"paris": "france", "rome": "italy"}).to_string();
    let quiz = seed_quiz(&db, &teacher, lessons[0].id, QuizType::Matching, Some(&key)).await;

    let alice = seed_student(&db, "alice").await;
    let result = grading::submit_quiz_answer(&db, quiz.id, alice.id, Some(&key), None)
        .await
        .expect("submission");
    assert!(result.is_correct);

    // Same mapping, different key order: a different byte sequence.
    let reordered = serde_json::json!({"rome": "italy", "paris": "france"}).to_string();
    let bob = seed_student(&db, "bob").await;
    let result = grading::submit_quiz_answer(&db, quiz.id, bob.id, Some(&reordered), None)
        .await
        .expect("submission");
    assert!(!result.is_correct);
}

#[tokio::test]
async fn quiz_without_answer_key_always_grades_incorrect() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let course = seed_course(&db, &teacher, "art").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 1).await;
    let quiz = seed_quiz(&db, &teacher, lessons[0].id, QuizType::Drawing, None).await;
    let student = seed_student(&db, "alice").await;

    let result = grading::submit_quiz_answer(&db, quiz.id, student.id, Some("anything"), None)
        .await
        .expect("submission");
    assert!(!result.is_correct);
    assert_eq!(result.points_earned, 0);
}

#[tokio::test]
async fn unknown_quiz_or_student_is_not_found() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let course = seed_course(&db, &teacher, "bio").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 1).await;
    let quiz = seed_quiz(&db, &teacher, lessons[0].id, QuizType::TrueFalse, Some("True")).await;
    let student = seed_student(&db, "alice").await;

    let missing_quiz = grading::submit_quiz_answer(&db, 9999, student.id, Some("True"), None).await;
    assert!(matches!(missing_quiz, Err(EngineError::NotFound(_))));

    let missing_student = grading::submit_quiz_answer(&db, quiz.id, 9999, Some("True"), None).await;
    assert!(matches!(missing_student, Err(EngineError::NotFound(_))));
}

#[tokio::test]
async fn points_follow_quiz_point_value() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let course = seed_course(&db, &teacher, "chem").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 1).await;
    let quiz = elearn_engine::services::content::create_quiz(
        &db,
        &elearn_engine::auth::Principal::teacher(teacher.id),
        lessons[0].id,
        quiz_fields(QuizType::MultipleChoice, Some("b"), 5),
    )
    .await
    .expect("quiz");
    let student = seed_student(&db, "alice").await;

    let result = grading::submit_quiz_answer(&db, quiz.id, student.id, Some("B"), None)
        .await
        .expect("submission");
    assert!(result.is_correct);
    assert_eq!(result.points_earned, 5);
}
