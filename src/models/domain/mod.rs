pub mod content;
pub mod lesson_progress;
pub mod material;
pub mod overall_progress;
pub mod quiz;
pub mod quiz_question;
pub mod quiz_result;
pub mod sub_bab_progress;
pub mod subject_progress;
pub use content::{LessonInfo, StudentProfile, SubBabInfo, SubjectInfo};
pub use lesson_progress::LessonProgress;
pub use material::MaterialType;
pub use overall_progress::OverallProgress;
pub use quiz::Quiz;
pub use quiz_question::{QuestionType, QuizQuestion};
pub use quiz_result::QuizResult;
pub use sub_bab_progress::SubBabProgress;
pub use subject_progress::SubjectProgress;
