use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::operations::SqliteExec;

// ========== Types ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonType {
    Text,
    Video,
    Interactive,
    Diagram,
    Quiz,
}

impl Default for LessonType {
    fn default() -> Self {
        Self::Text
    }
}

impl LessonType {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "VIDEO" => Self::Video,
            "INTERACTIVE" => Self::Interactive,
            "DIAGRAM" => Self::Diagram,
            "QUIZ" => Self::Quiz,
            _ => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Video => "VIDEO",
            Self::Interactive => "INTERACTIVE",
            Self::Diagram => "DIAGRAM",
            Self::Quiz => "QUIZ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizType {
    MultipleChoice,
    TrueFalse,
    FillBlank,
    Drawing,
    Matching,
}

impl QuizType {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "TRUE_FALSE" => Self::TrueFalse,
            "FILL_BLANK" => Self::FillBlank,
            "DRAWING" => Self::Drawing,
            "MATCHING" => Self::Matching,
            _ => Self::MultipleChoice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::TrueFalse => "TRUE_FALSE",
            Self::FillBlank => "FILL_BLANK",
            Self::Drawing => "DRAWING",
            Self::Matching => "MATCHING",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub estimated_duration: Option<i64>,
    pub is_published: bool,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub lesson_type: LessonType,
    pub lesson_order: i64,
    pub duration_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub lesson_id: i64,
    pub title: String,
    pub question: String,
    pub quiz_type: QuizType,
    pub options: Option<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable course fields, shared by insert and full-replace update.
#[derive(Debug, Clone, Default)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub estimated_duration: Option<i64>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LessonFields {
    pub title: String,
    pub content: String,
    pub lesson_type: LessonType,
    pub lesson_order: Option<i64>,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct QuizFields {
    pub title: String,
    pub question: String,
    pub quiz_type: QuizType,
    pub options: Option<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub points: i64,
}

// ========== Row mapping ==========

fn map_course(row: &SqliteRow) -> Course {
    Course {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        difficulty: row.get("difficulty"),
        estimated_duration: row.get("estimated_duration"),
        is_published: row.get("is_published"),
        teacher_id: row.get("teacher_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_lesson(row: &SqliteRow) -> Lesson {
    Lesson {
        id: row.get("id"),
        course_id: row.get("course_id"),
        title: row.get("title"),
        content: row.get("content"),
        lesson_type: LessonType::from_str(row.get::<String, _>("type").as_str()),
        lesson_order: row.get("lesson_order"),
        duration_minutes: row.get("duration_minutes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_quiz(row: &SqliteRow) -> Quiz {
    Quiz {
        id: row.get("id"),
        lesson_id: row.get("lesson_id"),
        title: row.get("title"),
        question: row.get("question"),
        quiz_type: QuizType::from_str(row.get::<String, _>("type").as_str()),
        options: row.get("options"),
        correct_answer: row.get("correct_answer"),
        explanation: row.get("explanation"),
        points: row.get("points"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ========== Courses ==========

pub async fn get_course<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Course>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "courses" WHERE "id" = ? LIMIT 1"#)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|r| map_course(&r)))
}

pub async fn insert_course<'e, E: SqliteExec<'e>>(
    executor: E,
    teacher_id: i64,
    fields: &CourseFields,
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO "courses"
          ("title", "description", "category", "difficulty", "estimated_duration",
           "is_published", "teacher_id", "created_at", "updated_at")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.category)
    .bind(&fields.difficulty)
    .bind(fields.estimated_duration)
    .bind(fields.is_published)
    .bind(teacher_id)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_course<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
    fields: &CourseFields,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE "courses"
        SET "title" = ?, "description" = ?, "category" = ?, "difficulty" = ?,
            "estimated_duration" = ?, "is_published" = ?, "updated_at" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.category)
    .bind(&fields.difficulty)
    .bind(fields.estimated_duration)
    .bind(fields.is_published)
    .bind(Utc::now())
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn set_course_published<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
    published: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"UPDATE "courses" SET "is_published" = ?, "updated_at" = ? WHERE "id" = ?"#)
        .bind(published)
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_course<'e, E: SqliteExec<'e>>(executor: E, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM "courses" WHERE "id" = ?"#)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn list_published_courses<'e, E: SqliteExec<'e>>(
    executor: E,
) -> Result<Vec<Course>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT * FROM "courses" WHERE "is_published" = 1 ORDER BY "created_at" DESC"#,
    )
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_course).collect())
}

pub async fn search_published_courses<'e, E: SqliteExec<'e>>(
    executor: E,
    term: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    let pattern = format!("%{term}%");
    let rows = sqlx::query(
        r#"SELECT * FROM "courses"
           WHERE "is_published" = 1 AND ("title" LIKE ? OR "description" LIKE ?)
           ORDER BY "created_at" DESC"#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_course).collect())
}

pub async fn list_courses_by_teacher<'e, E: SqliteExec<'e>>(
    executor: E,
    teacher_id: i64,
) -> Result<Vec<Course>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT * FROM "courses" WHERE "teacher_id" = ? ORDER BY "created_at" DESC"#,
    )
    .bind(teacher_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_course).collect())
}

// ========== Lessons ==========

pub async fn get_lesson<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Lesson>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "lessons" WHERE "id" = ? LIMIT 1"#)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|r| map_lesson(&r)))
}

pub async fn insert_lesson<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
    fields: &LessonFields,
    lesson_order: i64,
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO "lessons"
          ("course_id", "title", "content", "type", "lesson_order",
           "duration_minutes", "created_at", "updated_at")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(course_id)
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(fields.lesson_type.as_str())
    .bind(lesson_order)
    .bind(fields.duration_minutes)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_lesson<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
    fields: &LessonFields,
    lesson_order: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE "lessons"
        SET "title" = ?, "content" = ?, "type" = ?, "lesson_order" = ?,
            "duration_minutes" = ?, "updated_at" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(fields.lesson_type.as_str())
    .bind(lesson_order)
    .bind(fields.duration_minutes)
    .bind(Utc::now())
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn set_lesson_order<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
    lesson_order: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"UPDATE "lessons" SET "lesson_order" = ?, "updated_at" = ? WHERE "id" = ?"#)
        .bind(lesson_order)
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_lesson<'e, E: SqliteExec<'e>>(executor: E, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM "lessons" WHERE "id" = ?"#)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn list_lessons_by_course<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
) -> Result<Vec<Lesson>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT * FROM "lessons" WHERE "course_id" = ? ORDER BY "lesson_order" ASC"#,
    )
    .bind(course_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_lesson).collect())
}

pub async fn search_lessons_in_course<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
    term: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    let pattern = format!("%{term}%");
    let rows = sqlx::query(
        r#"SELECT * FROM "lessons"
           WHERE "course_id" = ? AND ("title" LIKE ? OR "content" LIKE ?)
           ORDER BY "lesson_order" ASC"#,
    )
    .bind(course_id)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_lesson).collect())
}

pub async fn count_lessons_by_course<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "lessons" WHERE "course_id" = ?"#)
        .bind(course_id)
        .fetch_one(executor)
        .await
}

pub async fn max_lesson_order<'e, E: SqliteExec<'e>>(
    executor: E,
    course_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT MAX("lesson_order") FROM "lessons" WHERE "course_id" = ?"#)
        .bind(course_id)
        .fetch_one(executor)
        .await
}

// ========== Quizzes ==========

pub async fn get_quiz<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Quiz>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "quizzes" WHERE "id" = ? LIMIT 1"#)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|r| map_quiz(&r)))
}

pub async fn insert_quiz<'e, E: SqliteExec<'e>>(
    executor: E,
    lesson_id: i64,
    fields: &QuizFields,
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO "quizzes"
          ("lesson_id", "title", "question", "type", "options", "correct_answer",
           "explanation", "points", "created_at", "updated_at")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(lesson_id)
    .bind(&fields.title)
    .bind(&fields.question)
    .bind(fields.quiz_type.as_str())
    .bind(fields.options.as_deref())
    .bind(fields.correct_answer.as_deref())
    .bind(fields.explanation.as_deref())
    .bind(fields.points)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_quiz<'e, E: SqliteExec<'e>>(
    executor: E,
    id: i64,
    fields: &QuizFields,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE "quizzes"
        SET "title" = ?, "question" = ?, "type" = ?, "options" = ?,
            "correct_answer" = ?, "explanation" = ?, "points" = ?, "updated_at" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.question)
    .bind(fields.quiz_type.as_str())
    .bind(fields.options.as_deref())
    .bind(fields.correct_answer.as_deref())
    .bind(fields.explanation.as_deref())
    .bind(fields.points)
    .bind(Utc::now())
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete_quiz<'e, E: SqliteExec<'e>>(executor: E, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM "quizzes" WHERE "id" = ?"#)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn list_quizzes_by_lesson<'e, E: SqliteExec<'e>>(
    executor: E,
    lesson_id: i64,
) -> Result<Vec<Quiz>, sqlx::Error> {
    let rows = sqlx::query(r#"SELECT * FROM "quizzes" WHERE "lesson_id" = ? ORDER BY "id" ASC"#)
        .bind(lesson_id)
        .fetch_all(executor)
        .await?;
    Ok(rows.iter().map(map_quiz).collect())
}

pub async fn count_quizzes_by_lesson<'e, E: SqliteExec<'e>>(
    executor: E,
    lesson_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "quizzes" WHERE "lesson_id" = ?"#)
        .bind(lesson_id)
        .fetch_one(executor)
        .await
}
