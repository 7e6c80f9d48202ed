pub mod course;
pub mod progress;
pub mod quiz;
pub mod user;

pub use course::{Course, Lesson, Level, Material, Reading, Week};
pub use progress::{CourseProgress, LessonRecord};
pub use quiz::{Question, Quiz, QuizFormError};
pub use user::{User, UserStatus};

pub type UserId = i64;
pub type CourseId = i64;
pub type LessonId = i64;
pub type MaterialId = i64;
pub type ReadingId = i64;
