use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::quiz_question::QuizQuestion;

/// Quiz attached to a sub-bab. Owned by the content side; the scoring engine
/// only reads it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub sub_bab_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: f64, // percent
    #[serde(default)]
    pub time_limit: i32, // minutes, 0 means no limit
}

impl Quiz {
    /// Multiple-choice questions with their position in the answer list.
    pub fn multiple_choice_questions(&self) -> impl Iterator<Item = (usize, &QuizQuestion)> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, question)| !question.is_essay())
    }

    pub fn essay_questions(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.questions.iter().filter(|question| question.is_essay())
    }

    pub fn find_question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|question| question.id == question_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::quiz_question::QuestionType;

    fn question(id: &str, question_type: QuestionType) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            question: format!("Question {}", id),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: 0,
            question_type,
            explanation: String::new(),
        }
    }

    fn quiz(passing_score: f64) -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            sub_bab_id: "sub-1".to_string(),
            title: "Fractions".to_string(),
            description: String::new(),
            questions: vec![
                question("q-1", QuestionType::MultipleChoice),
                question("q-2", QuestionType::Essay),
                question("q-3", QuestionType::MultipleChoice),
            ],
            passing_score,
            time_limit: 0,
        }
    }

    #[test]
    fn partitions_questions_keeping_answer_positions() {
        let quiz = quiz(70.0);

        let mc: Vec<usize> = quiz.multiple_choice_questions().map(|(i, _)| i).collect();
        let essays: Vec<&str> = quiz.essay_questions().map(|q| q.id.as_str()).collect();

        assert_eq!(mc, vec![0, 2]);
        assert_eq!(essays, vec!["q-2"]);
        assert!(quiz.find_question("q-3").is_some());
        assert!(quiz.find_question("q-9").is_none());
    }

    #[test]
    fn passing_score_must_be_a_percentage() {
        assert!(quiz(70.0).validate().is_ok());
        assert!(quiz(120.0).validate().is_err());
        assert!(quiz(-1.0).validate().is_err());
    }
}
