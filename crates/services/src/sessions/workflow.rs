use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use quiz_core::Clock;
use quiz_core::model::QuestionBank;
use quiz_core::tree::QuestionTree;
use storage::repository::{PlayerStore, ProgressRecord};

use super::config::SessionConfig;
use super::service::QuizSession;
use crate::error::SessionError;

/// Orchestrates sessions over a question bank and a player store.
///
/// The store is a boundary collaborator: it is consulted when a session
/// starts or finishes, never mid-round, and its failures surface to the
/// caller without touching in-memory session state.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    bank: QuestionBank,
    store: Arc<dyn PlayerStore>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, bank: QuestionBank, store: Arc<dyn PlayerStore>) -> Self {
        Self { clock, bank, store }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Build a fresh weighted tree for a category.
    ///
    /// Questions are shuffled before the build so zero-weight ties arrange
    /// differently from game to game; pass a seed for a reproducible shape.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` for unknown or empty categories.
    pub fn build_category_tree(
        &self,
        category: &str,
        seed: Option<u64>,
    ) -> Result<QuestionTree, SessionError> {
        let mut questions = self.bank.questions_for(category)?;
        let mut rng = seeded_rng(seed);
        questions.shuffle(&mut rng);
        Ok(QuestionTree::build(questions)?)
    }

    /// Start a session for a category.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` for unknown or empty categories and
    /// `SessionError::Scheduler` for an invalid config max level.
    pub fn start_session(
        &self,
        category: &str,
        config: SessionConfig,
        seed: Option<u64>,
    ) -> Result<QuizSession, SessionError> {
        let mut questions = self.bank.questions_for(category)?;
        let mut rng = seeded_rng(seed);
        questions.shuffle(&mut rng);
        QuizSession::new(category, questions, config, rng, self.clock.now())
    }

    /// Latest stored progress for a player in a category.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the store cannot be read; the
    /// caller may treat that as "no prior progress" and continue.
    pub fn load_progress(
        &self,
        player: &str,
        category: &str,
    ) -> Result<Option<ProgressRecord>, SessionError> {
        Ok(self.store.load_progress(player, category)?)
    }

    /// Persist a finished (or abandoned) session's results for a player.
    ///
    /// The session itself is untouched: a failed save leaves its in-memory
    /// state fully usable, including retrying this call.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the save fails.
    pub fn finish_session(
        &self,
        player: &str,
        session: &QuizSession,
    ) -> Result<ProgressRecord, SessionError> {
        let summary = session.summary();
        let record = ProgressRecord {
            category: summary.category,
            total_answered: summary.answered,
            correct_answers: summary.correct,
            best_streak: summary.best_streak,
            level: summary.level,
            recorded_at: self.clock.now(),
        };
        self.store.save_progress(player, &record)?;
        Ok(record)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
