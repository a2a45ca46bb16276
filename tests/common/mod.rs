#![allow(dead_code)]

use elearn_engine::auth::{Principal, Role};
use elearn_engine::db::operations::content::{
    Course, CourseFields, Lesson, LessonFields, Quiz, QuizFields, QuizType,
};
use elearn_engine::db::operations::users::{self, User};
use elearn_engine::db::Database;
use elearn_engine::services::content;

pub async fn test_db() -> Database {
    Database::in_memory().await.expect("in-memory database")
}

pub async fn seed_teacher(db: &Database, username: &str) -> User {
    users::create_user(db.pool(), username, Role::Teacher)
        .await
        .expect("seed teacher")
}

pub async fn seed_student(db: &Database, username: &str) -> User {
    users::create_user(db.pool(), username, Role::Student)
        .await
        .expect("seed student")
}

pub fn course_fields(title: &str) -> CourseFields {
    CourseFields {
        title: title.to_string(),
        description: format!("{title} description"),
        category: "general".to_string(),
        difficulty: "beginner".to_string(),
        estimated_duration: Some(60),
        is_published: true,
    }
}

pub async fn seed_course(db: &Database, teacher: &User, title: &str) -> Course {
    content::create_course(db, &Principal::teacher(teacher.id), course_fields(title))
        .await
        .expect("seed course")
}

pub async fn seed_lessons(db: &Database, teacher: &User, course_id: i64, count: usize) -> Vec<Lesson> {
    let principal = Principal::teacher(teacher.id);
    let mut lessons = Vec::with_capacity(count);
    for index in 0..count {
        let fields = LessonFields {
            title: format!("lesson {}", index + 1),
            content: "body".to_string(),
            ..Default::default()
        };
        let lesson = content::create_lesson(db, &principal, course_id, fields)
            .await
            .expect("seed lesson");
        lessons.push(lesson);
    }
    lessons
}

pub fn quiz_fields(quiz_type: QuizType, correct_answer: Option<&str>, points: i64) -> QuizFields {
    QuizFields {
        title: "quiz".to_string(),
        question: "question".to_string(),
        quiz_type,
        options: None,
        correct_answer: correct_answer.map(str::to_string),
        explanation: None,
        points,
    }
}

pub async fn seed_quiz(
    db: &Database,
    teacher: &User,
    lesson_id: i64,
    quiz_type: QuizType,
    correct_answer: Option<&str>,
) -> Quiz {
    content::create_quiz(
        db,
        &Principal::teacher(teacher.id),
        lesson_id,
        quiz_fields(quiz_type, correct_answer, 1),
    )
    .await
    .expect("seed quiz")
}
