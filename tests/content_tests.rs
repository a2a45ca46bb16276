mod common;

use common::*;
use elearn_engine::auth::Principal;
use elearn_engine::db::operations::content::{CourseFields, LessonFields};
use elearn_engine::error::EngineError;
use elearn_engine::services::content;

#[tokio::test]
async fn lesson_order_is_appended_when_not_given() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let course = seed_course(&db, &teacher, "rust").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 3).await;

    let orders: Vec<i64> = lessons.iter().map(|l| l.lesson_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    // An explicit order is taken as-is, even when it collides.
    let explicit = content::create_lesson(
        &db,
        &Principal::teacher(teacher.id),
        course.id,
        LessonFields {
            title: "intro revisited".to_string(),
            lesson_order: Some(2),
            ..Default::default()
        },
    )
    .await
    .expect("lesson");
    assert_eq!(explicit.lesson_order, 2);
}

#[tokio::test]
async fn reorder_moves_a_lesson() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let principal = Principal::teacher(teacher.id);
    let course = seed_course(&db, &teacher, "rust").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 2).await;

    let moved = content::reorder_lesson(&db, &principal, lessons[0].id, 9)
        .await
        .expect("reorder");
    assert_eq!(moved.lesson_order, 9);

    let listed = content::list_lessons(&db, course.id).await.expect("list");
    assert_eq!(listed.last().expect("lesson").id, lessons[0].id);
}

#[tokio::test]
async fn publishing_requires_title_and_description() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let principal = Principal::teacher(teacher.id);

    let bare = CourseFields {
        title: "draft".to_string(),
        description: String::new(),
        is_published: false,
        ..Default::default()
    };
    let course = content::create_course(&db, &principal, bare.clone())
        .await
        .expect("draft course");
    assert!(!course.is_published);

    let publish = content::publish_course(&db, &principal, course.id).await;
    assert!(matches!(publish, Err(EngineError::Validation(_))));

    let at_creation = content::create_course(
        &db,
        &principal,
        CourseFields {
            is_published: true,
            ..bare
        },
    )
    .await;
    assert!(matches!(at_creation, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn publish_and_unpublish_round_trip() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let principal = Principal::teacher(teacher.id);
    let course = seed_course(&db, &teacher, "rust").await;
    assert!(course.is_published);

    let course = content::unpublish_course(&db, &principal, course.id)
        .await
        .expect("unpublish");
    assert!(!course.is_published);
    assert!(content::list_published_courses(&db)
        .await
        .expect("list")
        .is_empty());

    let course = content::publish_course(&db, &principal, course.id)
        .await
        .expect("publish");
    assert!(course.is_published);
}

#[tokio::test]
async fn deleting_a_course_removes_its_subtree() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let principal = Principal::teacher(teacher.id);
    let course = seed_course(&db, &teacher, "rust").await;
    let lessons = seed_lessons(&db, &teacher, course.id, 2).await;
    seed_quiz(
        &db,
        &teacher,
        lessons[0].id,
        elearn_engine::db::operations::content::QuizType::TrueFalse,
        Some("True"),
    )
    .await;

    content::delete_course(&db, &principal, course.id)
        .await
        .expect("delete");

    assert!(content::get_course(&db, course.id)
        .await
        .expect("get")
        .is_none());
    assert!(content::list_lessons(&db, course.id)
        .await
        .expect("lessons")
        .is_empty());
    assert!(content::get_lesson(&db, lessons[0].id)
        .await
        .expect("lesson")
        .is_none());
}

#[tokio::test]
async fn teacher_course_listing_is_scoped() {
    let db = test_db().await;
    let first = seed_teacher(&db, "first").await;
    let second = seed_teacher(&db, "second").await;
    seed_course(&db, &first, "rust").await;
    seed_course(&db, &first, "go").await;
    seed_course(&db, &second, "python").await;

    let mine = content::list_courses_by_teacher(&db, first.id)
        .await
        .expect("list");
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|c| c.teacher_id == first.id));
}

#[tokio::test]
async fn course_search_matches_title_or_description_of_published_only() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let principal = Principal::teacher(teacher.id);

    seed_course(&db, &teacher, "Rust fundamentals").await;
    // Description carries the term, title does not.
    content::create_course(
        &db,
        &principal,
        CourseFields {
            title: "Systems programming".to_string(),
            description: "A tour of Rust idioms".to_string(),
            ..course_fields("ignored")
        },
    )
    .await
    .expect("create");
    // Matching but unpublished, so invisible to the catalog search.
    content::create_course(
        &db,
        &principal,
        CourseFields {
            is_published: false,
            ..course_fields("Rust internals")
        },
    )
    .await
    .expect("create");
    seed_course(&db, &teacher, "Intro to SQL").await;

    let hits = content::search_courses(&db, "rust").await.expect("search");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|c| c.is_published));
    assert!(hits
        .iter()
        .any(|c| c.title == "Rust fundamentals"));
    assert!(hits
        .iter()
        .any(|c| c.title == "Systems programming"));

    let none = content::search_courses(&db, "haskell").await.expect("search");
    assert!(none.is_empty());
}

#[tokio::test]
async fn lesson_search_is_scoped_to_one_course_and_keeps_order() {
    let db = test_db().await;
    let teacher = seed_teacher(&db, "teacher").await;
    let principal = Principal::teacher(teacher.id);
    let rust = seed_course(&db, &teacher, "rust").await;
    let other = seed_course(&db, &teacher, "go").await;

    for title in ["Ownership", "Borrowing basics", "Lifetimes"] {
        content::create_lesson(
            &db,
            &principal,
            rust.id,
            LessonFields {
                title: title.to_string(),
                content: "borrow checker walkthrough".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("create");
    }
    content::create_lesson(
        &db,
        &principal,
        other.id,
        LessonFields {
            title: "Borrowing in Go".to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("create");

    // "borrow" hits one title and every body, but never the other course.
    let hits = content::search_lessons(&db, rust.id, "borrow")
        .await
        .expect("search");
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|l| l.course_id == rust.id));
    let orders: Vec<i64> = hits.iter().map(|l| l.lesson_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let titled = content::search_lessons(&db, rust.id, "Lifetimes")
        .await
        .expect("search");
    assert_eq!(titled.len(), 1);
    assert_eq!(titled[0].title, "Lifetimes");
}
