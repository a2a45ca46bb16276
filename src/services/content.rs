//! Course / lesson / quiz lifecycle. Every mutation runs inside one
//! transaction and passes the authorization gate first; reads of published
//! content are unguarded.

use crate::auth::{Principal, Role};
use crate::db::operations::content::{
    self, Course, CourseFields, Lesson, LessonFields, Quiz, QuizFields,
};
use crate::db::operations::users;
use crate::db::Database;
use crate::error::EngineError;
use crate::services::authz::{self, ContentRef};

/// `is_published = true` requires non-empty title and description. Checked
/// at creation and on every publish/update; never relaxed.
fn ensure_publishable(title: &str, description: &str) -> Result<(), EngineError> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(EngineError::validation(
            "a published course requires a non-empty title and description",
        ));
    }
    Ok(())
}

// ========== Courses ==========

pub async fn create_course(
    db: &Database,
    principal: &Principal,
    fields: CourseFields,
) -> Result<Course, EngineError> {
    if principal.role != Role::Teacher {
        return Err(EngineError::unauthorized(
            "only teachers can create courses",
        ));
    }
    if fields.is_published {
        ensure_publishable(&fields.title, &fields.description)?;
    }

    let mut tx = db.pool().begin().await?;
    let teacher = users::get_user(&mut *tx, principal.id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("teacher {}", principal.id)))?;
    if teacher.role != Role::Teacher {
        return Err(EngineError::unauthorized("stored role is not TEACHER"));
    }

    let id = content::insert_course(&mut *tx, teacher.id, &fields).await?;
    let course = content::get_course(&mut *tx, id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("course {id}")))?;
    tx.commit().await?;

    tracing::info!(course_id = course.id, teacher_id = teacher.id, "course created");
    Ok(course)
}

pub async fn update_course(
    db: &Database,
    principal: &Principal,
    course_id: i64,
    fields: CourseFields,
) -> Result<Course, EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Course(course_id)).await?;
    if fields.is_published {
        ensure_publishable(&fields.title, &fields.description)?;
    }
    content::update_course(&mut *tx, course_id, &fields).await?;
    let course = content::get_course(&mut *tx, course_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("course {course_id}")))?;
    tx.commit().await?;
    Ok(course)
}

pub async fn delete_course(
    db: &Database,
    principal: &Principal,
    course_id: i64,
) -> Result<(), EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Course(course_id)).await?;
    content::delete_course(&mut *tx, course_id).await?;
    tx.commit().await?;
    tracing::info!(course_id, "course deleted");
    Ok(())
}

pub async fn publish_course(
    db: &Database,
    principal: &Principal,
    course_id: i64,
) -> Result<Course, EngineError> {
    let mut tx = db.pool().begin().await?;
    let course = authz::authorize(&mut tx, principal, ContentRef::Course(course_id)).await?;
    ensure_publishable(&course.title, &course.description)?;
    content::set_course_published(&mut *tx, course_id, true).await?;
    let course = content::get_course(&mut *tx, course_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("course {course_id}")))?;
    tx.commit().await?;
    Ok(course)
}

pub async fn unpublish_course(
    db: &Database,
    principal: &Principal,
    course_id: i64,
) -> Result<Course, EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Course(course_id)).await?;
    content::set_course_published(&mut *tx, course_id, false).await?;
    let course = content::get_course(&mut *tx, course_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("course {course_id}")))?;
    tx.commit().await?;
    Ok(course)
}

pub async fn get_course(db: &Database, course_id: i64) -> Result<Option<Course>, EngineError> {
    Ok(content::get_course(db.pool(), course_id).await?)
}

pub async fn list_published_courses(db: &Database) -> Result<Vec<Course>, EngineError> {
    Ok(content::list_published_courses(db.pool()).await?)
}

/// Substring search over the published catalog, matching title or description.
pub async fn search_courses(db: &Database, term: &str) -> Result<Vec<Course>, EngineError> {
    Ok(content::search_published_courses(db.pool(), term).await?)
}

pub async fn list_courses_by_teacher(
    db: &Database,
    teacher_id: i64,
) -> Result<Vec<Course>, EngineError> {
    Ok(content::list_courses_by_teacher(db.pool(), teacher_id).await?)
}

// ========== Lessons ==========

pub async fn create_lesson(
    db: &Database,
    principal: &Principal,
    course_id: i64,
    fields: LessonFields,
) -> Result<Lesson, EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Course(course_id)).await?;

    // Requested order wins; otherwise append after the current maximum.
    let order = match fields.lesson_order {
        Some(order) => order,
        None => content::max_lesson_order(&mut *tx, course_id)
            .await?
            .map(|max| max + 1)
            .unwrap_or(1),
    };

    let id = content::insert_lesson(&mut *tx, course_id, &fields, order).await?;
    let lesson = content::get_lesson(&mut *tx, id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("lesson {id}")))?;
    tx.commit().await?;
    Ok(lesson)
}

pub async fn update_lesson(
    db: &Database,
    principal: &Principal,
    lesson_id: i64,
    fields: LessonFields,
) -> Result<Lesson, EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Lesson(lesson_id)).await?;

    let existing = content::get_lesson(&mut *tx, lesson_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("lesson {lesson_id}")))?;
    let order = fields.lesson_order.unwrap_or(existing.lesson_order);

    content::update_lesson(&mut *tx, lesson_id, &fields, order).await?;
    let lesson = content::get_lesson(&mut *tx, lesson_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("lesson {lesson_id}")))?;
    tx.commit().await?;
    Ok(lesson)
}

pub async fn reorder_lesson(
    db: &Database,
    principal: &Principal,
    lesson_id: i64,
    new_order: i64,
) -> Result<Lesson, EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Lesson(lesson_id)).await?;
    content::set_lesson_order(&mut *tx, lesson_id, new_order).await?;
    let lesson = content::get_lesson(&mut *tx, lesson_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("lesson {lesson_id}")))?;
    tx.commit().await?;
    Ok(lesson)
}

pub async fn delete_lesson(
    db: &Database,
    principal: &Principal,
    lesson_id: i64,
) -> Result<(), EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Lesson(lesson_id)).await?;
    content::delete_lesson(&mut *tx, lesson_id).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn get_lesson(db: &Database, lesson_id: i64) -> Result<Option<Lesson>, EngineError> {
    Ok(content::get_lesson(db.pool(), lesson_id).await?)
}

pub async fn list_lessons(db: &Database, course_id: i64) -> Result<Vec<Lesson>, EngineError> {
    Ok(content::list_lessons_by_course(db.pool(), course_id).await?)
}

/// Substring search over one course's lessons, matching title or body text.
pub async fn search_lessons(
    db: &Database,
    course_id: i64,
    term: &str,
) -> Result<Vec<Lesson>, EngineError> {
    Ok(content::search_lessons_in_course(db.pool(), course_id, term).await?)
}

pub async fn count_lessons(db: &Database, course_id: i64) -> Result<i64, EngineError> {
    Ok(content::count_lessons_by_course(db.pool(), course_id).await?)
}

// ========== Quizzes ==========

pub async fn create_quiz(
    db: &Database,
    principal: &Principal,
    lesson_id: i64,
    fields: QuizFields,
) -> Result<Quiz, EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Lesson(lesson_id)).await?;
    let id = content::insert_quiz(&mut *tx, lesson_id, &fields).await?;
    let quiz = content::get_quiz(&mut *tx, id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("quiz {id}")))?;
    tx.commit().await?;
    Ok(quiz)
}

pub async fn update_quiz(
    db: &Database,
    principal: &Principal,
    quiz_id: i64,
    fields: QuizFields,
) -> Result<Quiz, EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Quiz(quiz_id)).await?;
    content::update_quiz(&mut *tx, quiz_id, &fields).await?;
    let quiz = content::get_quiz(&mut *tx, quiz_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("quiz {quiz_id}")))?;
    tx.commit().await?;
    Ok(quiz)
}

pub async fn delete_quiz(
    db: &Database,
    principal: &Principal,
    quiz_id: i64,
) -> Result<(), EngineError> {
    let mut tx = db.pool().begin().await?;
    authz::authorize(&mut tx, principal, ContentRef::Quiz(quiz_id)).await?;
    content::delete_quiz(&mut *tx, quiz_id).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn get_quiz(db: &Database, quiz_id: i64) -> Result<Option<Quiz>, EngineError> {
    Ok(content::get_quiz(db.pool(), quiz_id).await?)
}

pub async fn list_quizzes(db: &Database, lesson_id: i64) -> Result<Vec<Quiz>, EngineError> {
    Ok(content::list_quizzes_by_lesson(db.pool(), lesson_id).await?)
}

pub async fn count_quizzes(db: &Database, lesson_id: i64) -> Result<i64, EngineError> {
    Ok(content::count_quizzes_by_lesson(db.pool(), lesson_id).await?)
}
