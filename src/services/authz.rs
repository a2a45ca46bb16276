use sqlx::SqliteConnection;

use crate::auth::{Principal, Role};
use crate::db::operations::content::{self, Course};
use crate::error::EngineError;

/// A node in the content hierarchy. Ownership always resolves upward to a
/// single course, whose `teacher_id` is the authorization anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRef {
    Course(i64),
    Lesson(i64),
    Quiz(i64),
}

/// The ownership rule itself, independent of hierarchy depth.
pub fn owns(principal: &Principal, course: &Course) -> bool {
    principal.role == Role::Teacher && principal.id == course.teacher_id
}

/// Walks the hierarchy upward (Quiz -> Lesson -> Course) to the owning
/// course. A missing node anywhere in the walk is `NotFound`.
pub async fn resolve_owning_course(
    conn: &mut SqliteConnection,
    target: ContentRef,
) -> Result<Course, EngineError> {
    let course_id = match target {
        ContentRef::Course(id) => id,
        ContentRef::Lesson(id) => {
            let lesson = content::get_lesson(&mut *conn, id)
                .await?
                .ok_or_else(|| EngineError::not_found(format!("lesson {id}")))?;
            lesson.course_id
        }
        ContentRef::Quiz(id) => {
            let quiz = content::get_quiz(&mut *conn, id)
                .await?
                .ok_or_else(|| EngineError::not_found(format!("quiz {id}")))?;
            let lesson = content::get_lesson(&mut *conn, quiz.lesson_id)
                .await?
                .ok_or_else(|| EngineError::not_found(format!("lesson {}", quiz.lesson_id)))?;
            lesson.course_id
        }
    };

    content::get_course(&mut *conn, course_id)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("course {course_id}")))
}

/// Mandatory gate before every create/update/delete/publish/unpublish/
/// reorder on course, lesson or quiz. Never applied to reads of published
/// content. Returns the owning course so callers avoid a second lookup.
pub async fn authorize(
    conn: &mut SqliteConnection,
    principal: &Principal,
    target: ContentRef,
) -> Result<Course, EngineError> {
    let course = resolve_owning_course(conn, target).await?;
    if owns(principal, &course) {
        Ok(course)
    } else {
        tracing::debug!(
            principal_id = principal.id,
            course_id = course.id,
            "ownership check failed"
        );
        Err(EngineError::unauthorized(format!(
            "principal {} does not own course {}",
            principal.id, course.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn course_owned_by(teacher_id: i64) -> Course {
        Course {
            id: 1,
            title: "t".to_string(),
            description: "d".to_string(),
            category: String::new(),
            difficulty: String::new(),
            estimated_duration: None,
            is_published: true,
            teacher_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_teacher_passes() {
        assert!(owns(&Principal::teacher(7), &course_owned_by(7)));
    }

    #[test]
    fn other_teacher_fails() {
        assert!(!owns(&Principal::teacher(8), &course_owned_by(7)));
    }

    #[test]
    fn student_never_owns() {
        assert!(!owns(&Principal::student(7), &course_owned_by(7)));
    }
}
