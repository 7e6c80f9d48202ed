//! Course and lesson collections over the store.
//!
//! The catalog owns the `courses` and `lessons` documents. First access on an
//! empty store seeds the demo catalog, so every other component can assume
//! the collections exist.

use std::collections::BTreeMap;

use crate::domain::{Course, CourseId, Lesson, LessonId, Level, Material, Reading, Week};
use crate::store::{keys, KeyValueStore, StoreError};

pub struct Catalog<'a, S: KeyValueStore> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> Catalog<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load the course collection, seeding the demo catalog on first access
    pub fn courses(&self) -> Result<Vec<Course>, StoreError> {
        if let Some(courses) = self.store.get_as::<Vec<Course>>(keys::COURSES)? {
            return Ok(courses);
        }
        self.seed()
    }

    pub fn course(&self, course_id: CourseId) -> Result<Option<Course>, StoreError> {
        let courses = self.courses()?;
        Ok(courses.into_iter().find(|c| c.id == course_id))
    }

    pub fn lessons_for(&self, course_id: CourseId) -> Result<Vec<Lesson>, StoreError> {
        let lessons: BTreeMap<CourseId, Vec<Lesson>> =
            self.store.get_as(keys::LESSONS)?.unwrap_or_default();
        Ok(lessons.get(&course_id).cloned().unwrap_or_default())
    }

    pub fn lesson(
        &self,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<Option<Lesson>, StoreError> {
        let lessons = self.lessons_for(course_id)?;
        Ok(lessons.into_iter().find(|l| l.id == lesson_id))
    }

    /// Replace the course collection (admin edits)
    pub fn save_courses(&self, courses: &[Course]) -> Result<(), StoreError> {
        self.store.set_as(keys::COURSES, &courses)
    }

    fn seed(&self) -> Result<Vec<Course>, StoreError> {
        tracing::info!("Seeding demo course catalog");
        let courses = sample_courses();
        self.store.set_as(keys::COURSES, &courses)?;
        self.store.set_as(keys::LESSONS, &sample_lessons())?;
        Ok(courses)
    }
}

fn sample_courses() -> Vec<Course> {
    vec![
        Course::new(
            1,
            "JavaScript Fundamentals",
            "Learn JavaScript from basics to advanced concepts",
            "JavaScript",
            Level::Beginner,
            50.0,
            20,
            12,
        )
        .with_rating(4.5)
        .with_students(120)
        .with_syllabus(vec![
            Week {
                week: 1,
                title: "Getting Started".to_string(),
                topics: vec!["History".to_string(), "Tooling".to_string()],
                lessons: vec![1],
            },
            Week {
                week: 2,
                title: "Language Basics".to_string(),
                topics: vec!["Variables".to_string(), "Types".to_string()],
                lessons: vec![2],
            },
            Week {
                week: 3,
                title: "Functions and Scope".to_string(),
                topics: vec!["Closures".to_string()],
                lessons: vec![],
            },
        ])
        .with_materials(vec![
            Material {
                id: 1,
                title: "Language Cheatsheet".to_string(),
                kind: "cheatsheet".to_string(),
                downloadable: true,
            },
            Material {
                id: 2,
                title: "Intro Lecture".to_string(),
                kind: "video".to_string(),
                downloadable: false,
            },
        ])
        .with_readings(vec![Reading {
            id: 1,
            title: "A Short History of JavaScript".to_string(),
            week: 1,
            kind: "article".to_string(),
        }]),
        Course::new(
            2,
            "React.js Development",
            "Build modern web applications with React",
            "React",
            Level::Intermediate,
            30.0,
            30,
            15,
        )
        .with_rating(4.7)
        .with_students(85),
        Course::new(
            3,
            "Full Stack Web Development",
            "Complete web development with MERN stack",
            "Web Development",
            Level::Advanced,
            129.0,
            50,
            25,
        )
        .with_rating(4.8)
        .with_students(40),
    ]
}

fn sample_lessons() -> BTreeMap<CourseId, Vec<Lesson>> {
    let mut lessons = BTreeMap::new();
    lessons.insert(
        1,
        vec![
            Lesson {
                id: 1,
                title: "Introduction to JavaScript".to_string(),
                content: "Welcome to JavaScript!".to_string(),
                code_example: Some("console.log(\"Hello World!\");".to_string()),
            },
            Lesson {
                id: 2,
                title: "Variables and Data Types".to_string(),
                content: "Learn about variables".to_string(),
                code_example: Some("let name = \"JavaScript\";".to_string()),
            },
        ],
    );
    lessons.insert(
        2,
        vec![
            Lesson {
                id: 3,
                title: "Introduction to React".to_string(),
                content: "Welcome to React!".to_string(),
                code_example: Some("const App = () => <h1>Hello React!</h1>;".to_string()),
            },
            Lesson {
                id: 4,
                title: "Components and Props".to_string(),
                content: "Learn about components".to_string(),
                code_example: None,
            },
        ],
    );
    lessons.insert(
        3,
        vec![Lesson {
            id: 5,
            title: "Full Stack Overview".to_string(),
            content: "Welcome to Full Stack!".to_string(),
            code_example: Some("const server = require(\"express\")();".to_string()),
        }],
    );
    lessons
}
