use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: i32, // option index; ignored for essays
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    MultipleChoice, // auto-graded against correct_answer
    Essay,          // graded by an instructor
}

impl QuizQuestion {
    pub fn is_essay(&self) -> bool {
        self.question_type == QuestionType::Essay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_without_type_defaults_to_multiple_choice() {
        let json = r#"{"id":"q-1","question":"2+2?","options":["3","4"],"correctAnswer":1}"#;
        let question: QuizQuestion = serde_json::from_str(json).expect("question should parse");

        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert!(!question.is_essay());
    }

    #[test]
    fn essay_type_round_trips_as_screaming_snake_case() {
        let json = serde_json::to_string(&QuestionType::Essay).unwrap();
        assert_eq!(json, "\"ESSAY\"");

        let parsed: QuestionType = serde_json::from_str("\"MULTIPLE_CHOICE\"").unwrap();
        assert_eq!(parsed, QuestionType::MultipleChoice);
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<QuestionType>("\"MATCHING\"");
        assert!(parsed.is_err());
    }
}
