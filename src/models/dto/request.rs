use std::collections::BTreeMap;

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub answers: Vec<i32>,

    #[serde(default)]
    pub essay_answers: BTreeMap<String, String>,

    #[validate(range(min = 0, message = "Time spent cannot be negative"))]
    pub time_spent: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeEssayRequest {
    #[validate(length(min = 1, message = "Result id is required"))]
    pub result_id: String,

    #[validate(length(min = 1, message = "Question id is required"))]
    pub question_id: String,

    pub is_correct: bool,
}
