use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use quiz_core::model::Question;
use quiz_core::scheduler::DifficultyScheduler;
use quiz_core::tree::QuestionTree;

use super::config::SessionConfig;
use super::selector::SessionSelector;
use crate::error::SessionError;

//
// ─── SUMMARY & PROGRESS VIEWS ──────────────────────────────────────────────────
//

/// Aggregate results for a session, suitable for display and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub category: String,
    pub answered: u32,
    pub correct: u32,
    pub best_streak: u32,
    pub accuracy_percent: f64,
    pub level: u32,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of a category.
///
/// The session exclusively owns its question tree, scheduler, used-question
/// set, and random source — nothing is shared across sessions, so concurrent
/// players just get independent values. The loop per round is: take a
/// question via [`QuizSession::next_question`], resolve it with the player,
/// then feed the outcome back with [`QuizSession::submit_answer`], which
/// rebuilds the tree so the next depth query sees fresh weights.
#[derive(Debug)]
pub struct QuizSession {
    category: String,
    config: SessionConfig,
    tree: QuestionTree,
    scheduler: DifficultyScheduler,
    selector: SessionSelector,
    issued: usize,
    answered: usize,
    rng: StdRng,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Create a session over a prepared question pool.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic in tests.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Tree` when `questions` is empty and
    /// `SessionError::Scheduler` when the config's max level is invalid.
    pub fn new(
        category: impl Into<String>,
        questions: Vec<Question>,
        config: SessionConfig,
        rng: StdRng,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let tree = QuestionTree::build(questions)?;
        let scheduler = DifficultyScheduler::new(config.max_level())?;
        Ok(Self {
            category: category.into(),
            config,
            tree,
            scheduler,
            selector: SessionSelector::new(),
            issued: 0,
            answered: 0,
            rng,
            started_at,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current difficulty level the scheduler is targeting.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.scheduler.level()
    }

    /// Number of questions in the session's pool.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answered >= self.config.count()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.config.count(),
            answered: self.answered,
            remaining: self.config.count().saturating_sub(self.answered),
            is_complete: self.is_complete(),
        }
    }

    /// Issue the next question at the scheduler's current difficulty.
    ///
    /// The question counts as used as soon as it is issued, so the no-repeat
    /// policy holds even for questions the player abandons.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Exhausted` once the configured count has been
    /// issued, and `SessionError::InsufficientQuestions` when the pool runs
    /// dry under the no-repeat policy.
    pub fn next_question(&mut self) -> Result<Question, SessionError> {
        if self.issued >= self.config.count() {
            return Err(SessionError::Exhausted);
        }

        let level = self.scheduler.level();
        let question = self
            .selector
            .pick_at_level(&self.tree, &self.config, level, &mut self.rng)
            .ok_or(SessionError::InsufficientQuestions {
                requested: self.config.count(),
                selected: self.issued,
            })?;
        self.issued += 1;
        Ok(question)
    }

    /// Select the whole session's questions up front, spread across levels.
    ///
    /// Alternative to the incremental [`QuizSession::next_question`] flow:
    /// slots are planned over `1..=max_level` and filled in one pass.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Exhausted` if questions were already issued,
    /// or `SessionError::InsufficientQuestions` when the pool is too small.
    pub fn select_questions(&mut self) -> Result<Vec<Question>, SessionError> {
        if self.issued > 0 {
            return Err(SessionError::Exhausted);
        }
        let selected =
            self.selector
                .select_questions(&self.tree, &self.config, &mut self.rng)?;
        self.issued = selected.len();
        Ok(selected)
    }

    /// Record the player's outcome for an issued question.
    ///
    /// Mutates the owned question's weight, updates the scheduler, and
    /// rebuilds the tree so the next depth query maps to fresh weights.
    /// Returns the updated difficulty level.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` when the text does not match
    /// a question this session has issued.
    pub fn submit_answer(&mut self, question_text: &str, correct: bool) -> Result<u32, SessionError> {
        if !self.selector.is_used(question_text)
            || !self.tree.record_answer(question_text, correct)
        {
            return Err(SessionError::UnknownQuestion(question_text.to_string()));
        }

        self.answered += 1;
        let level = self.scheduler.on_answer(correct);
        // Weights changed; rebuild once per round, before the next query.
        self.tree.rebuild();
        Ok(level)
    }

    /// Summary of everything answered so far.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            category: self.category.clone(),
            answered: self.scheduler.answered(),
            correct: self.scheduler.correct(),
            best_streak: self.scheduler.best_streak(),
            accuracy_percent: self.scheduler.accuracy_percent(),
            level: self.scheduler.level(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new(format!("Q{i}")).unwrap())
            .collect()
    }

    fn session(pool: usize, config: SessionConfig) -> QuizSession {
        QuizSession::new(
            "Farm",
            questions(pool),
            config,
            StdRng::seed_from_u64(4),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn empty_pool_is_rejected_at_start() {
        let err = QuizSession::new(
            "Farm",
            Vec::new(),
            SessionConfig::default(),
            StdRng::seed_from_u64(4),
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Tree(_)));
    }

    #[test]
    fn issues_at_most_the_configured_count() {
        let mut s = session(10, SessionConfig::default());
        for _ in 0..5 {
            s.next_question().unwrap();
        }
        assert!(matches!(s.next_question(), Err(SessionError::Exhausted)));
    }

    #[test]
    fn all_correct_answers_drive_level_to_the_cap() {
        let config = SessionConfig::new(10, 5, true, false).unwrap();
        let mut s = session(31, config);

        let mut levels = Vec::new();
        for _ in 0..10 {
            let q = s.next_question().unwrap();
            levels.push(s.submit_answer(q.text(), true).unwrap());
        }

        // 100% accuracy from the first answer: one step up per round,
        // clamped at 5.
        assert_eq!(levels, vec![2, 3, 4, 5, 5, 5, 5, 5, 5, 5]);
        let summary = s.summary();
        assert_eq!(summary.answered, 10);
        assert_eq!(summary.correct, 10);
        assert_eq!(summary.best_streak, 10);
        assert_eq!(summary.accuracy_percent, 100.0);
    }

    #[test]
    fn wrong_answers_raise_the_question_weight_in_the_pool() {
        let mut s = session(7, SessionConfig::default());
        let q = s.next_question().unwrap();
        s.submit_answer(q.text(), false).unwrap();

        // After the rebuild the missed question carries weight 1 and sits at
        // the heavy end of the in-order sequence.
        let weights: Vec<u32> = s.tree.questions().iter().map(|x| x.weight()).collect();
        assert_eq!(weights.iter().sum::<u32>(), 1);
        assert_eq!(*weights.last().unwrap(), 1);
    }

    #[test]
    fn submitting_an_unissued_question_is_an_error() {
        let mut s = session(7, SessionConfig::default());
        let err = s.submit_answer("Q0", true).unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion(text) if text == "Q0"));
    }

    #[test]
    fn no_repeats_within_a_session() {
        let mut s = session(7, SessionConfig::default());
        let mut texts = Vec::new();
        for _ in 0..5 {
            let q = s.next_question().unwrap();
            texts.push(q.text().to_string());
            s.submit_answer(q.text(), true).unwrap();
        }
        let distinct: std::collections::HashSet<&String> = texts.iter().collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn small_pool_runs_out_with_insufficient_questions() {
        let config = SessionConfig::new(5, 5, true, false).unwrap();
        let mut s = session(3, config);
        for _ in 0..3 {
            let q = s.next_question().unwrap();
            s.submit_answer(q.text(), true).unwrap();
        }
        assert!(matches!(
            s.next_question(),
            Err(SessionError::InsufficientQuestions { requested: 5, selected: 3 })
        ));
    }

    #[test]
    fn batch_selection_only_works_before_the_first_issue() {
        let mut s = session(9, SessionConfig::default());
        let selected = s.select_questions().unwrap();
        assert_eq!(selected.len(), 5);
        assert!(matches!(s.select_questions(), Err(SessionError::Exhausted)));
    }

    #[test]
    fn progress_tracks_answers_not_issues() {
        let mut s = session(9, SessionConfig::default());
        let q = s.next_question().unwrap();
        assert_eq!(s.progress().answered, 0);
        s.submit_answer(q.text(), true).unwrap();

        let progress = s.progress();
        assert_eq!(progress.total, 5);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 4);
        assert!(!progress.is_complete);
    }
}
