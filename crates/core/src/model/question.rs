use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyText,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz question with its adaptive weight.
///
/// The text is the question's identity: two questions with the same text are
/// the same question for dedup and no-repeat purposes. The weight is the sort
/// key for tree construction — lower means answered correctly more often,
/// i.e. "easier". It only moves through [`Question::record_answer`] and can
/// never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    weight: u32,
    correct_count: u32,
    incorrect_count: u32,
}

impl Question {
    /// Create a fresh question with weight 0 and zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is empty after trimming.
    pub fn new(text: impl Into<String>) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        Ok(Self {
            text,
            weight: 0,
            correct_count: 0,
            incorrect_count: 0,
        })
    }

    /// Rehydrate a question from persisted counters.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is empty after trimming.
    pub fn from_parts(
        text: impl Into<String>,
        weight: u32,
        correct_count: u32,
        incorrect_count: u32,
    ) -> Result<Self, QuestionError> {
        let mut question = Self::new(text)?;
        question.weight = weight;
        question.correct_count = correct_count;
        question.incorrect_count = incorrect_count;
        Ok(question)
    }

    /// Record the outcome of asking this question.
    ///
    /// A correct answer lowers the weight by one (saturating at zero); an
    /// incorrect answer raises it by one with no ceiling. Counters update
    /// accordingly. Always succeeds.
    pub fn record_answer(&mut self, correct: bool) {
        if correct {
            self.correct_count += 1;
            self.weight = self.weight.saturating_sub(1);
        } else {
            self.incorrect_count += 1;
            self.weight += 1;
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    /// Total number of times this question has been answered.
    #[must_use]
    pub fn times_asked(&self) -> u32 {
        self.correct_count + self.incorrect_count
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_question_starts_at_weight_zero() {
        let q = Question::new("What animal lays eggs?").unwrap();
        assert_eq!(q.weight(), 0);
        assert_eq!(q.correct_count(), 0);
        assert_eq!(q.incorrect_count(), 0);
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(Question::new("   "), Err(QuestionError::EmptyText));
        assert_eq!(Question::new(""), Err(QuestionError::EmptyText));
    }

    #[test]
    fn correct_answer_never_increases_weight() {
        let mut q = Question::new("Q").unwrap();
        q.record_answer(true);
        assert_eq!(q.weight(), 0);
        assert_eq!(q.correct_count(), 1);

        let mut q = Question::from_parts("Q", 3, 0, 3).unwrap();
        q.record_answer(true);
        assert_eq!(q.weight(), 2);
    }

    #[test]
    fn incorrect_answer_increases_weight_by_one() {
        let mut q = Question::new("Q").unwrap();
        for expected in 1..=5 {
            q.record_answer(false);
            assert_eq!(q.weight(), expected);
        }
        assert_eq!(q.incorrect_count(), 5);
    }

    #[test]
    fn weight_saturates_at_zero() {
        let mut q = Question::new("Q").unwrap();
        q.record_answer(true);
        q.record_answer(true);
        assert_eq!(q.weight(), 0);
        assert_eq!(q.correct_count(), 2);
    }

    #[test]
    fn times_asked_sums_both_counters() {
        let mut q = Question::new("Q").unwrap();
        q.record_answer(true);
        q.record_answer(false);
        q.record_answer(false);
        assert_eq!(q.times_asked(), 3);
    }
}
