pub mod request;
pub mod response;

pub use request::{GradeEssayRequest, SubmitQuizRequest};
pub use response::{
    CascadeReport, CascadeStage, ProgressUpdate, QuizOutcome, QuizScores, RebuildReport,
    StageOutcome, StageReport,
};
