use std::collections::HashSet;

use rand::Rng;

use quiz_core::model::Question;
use quiz_core::tree::QuestionTree;

use super::config::SessionConfig;
use super::plan::distribute_levels;
use crate::error::SessionError;

/// Neutral bias for fallback draws; level targeting already steers difficulty.
const FALLBACK_BIAS: f64 = 0.5;

/// Random draw attempts per slot before scanning the pool deterministically.
/// Keeps selection from depending on luck when few unused questions remain.
const MAX_RANDOM_DRAWS: usize = 32;

//
// ─── SELECTOR ──────────────────────────────────────────────────────────────────
//

/// Picks questions for a session, enforcing the no-repeat policy.
///
/// The selector holds no questions of its own — it works off borrowed tree
/// queries and remembers only the identities it has handed out.
#[derive(Debug, Clone, Default)]
pub struct SessionSelector {
    used: HashSet<String>,
}

impl SessionSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct questions issued so far.
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// True when the question with this text has already been issued.
    #[must_use]
    pub fn is_used(&self, text: &str) -> bool {
        self.used.contains(text)
    }

    /// Select `config.count()` questions across difficulty levels.
    ///
    /// Each slot gets a target level from the distribution plan and tries a
    /// depth query first, falling back to weighted-random draws. Slots that
    /// stay empty after the level pass are filled ignoring level targets.
    /// Returns the questions in slot-fill order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientQuestions` when the pool runs out
    /// under the no-repeat policy.
    pub fn select_questions<R: Rng + ?Sized>(
        &mut self,
        tree: &QuestionTree,
        config: &SessionConfig,
        rng: &mut R,
    ) -> Result<Vec<Question>, SessionError> {
        let mut selected = Vec::with_capacity(config.count());
        for level in distribute_levels(config, rng) {
            if let Some(question) = self.pick_at_level(tree, config, level, rng) {
                selected.push(question);
            }
        }

        while selected.len() < config.count() {
            match self.draw_any(tree, config, rng) {
                Some(question) => selected.push(question),
                None => {
                    return Err(SessionError::InsufficientQuestions {
                        requested: config.count(),
                        selected: selected.len(),
                    });
                }
            }
        }

        Ok(selected)
    }

    /// Pick one question at the target depth, falling back to random draws
    /// when the depth query misses or hits an already-used question.
    pub(crate) fn pick_at_level<R: Rng + ?Sized>(
        &mut self,
        tree: &QuestionTree,
        config: &SessionConfig,
        level: u32,
        rng: &mut R,
    ) -> Option<Question> {
        if let Some(question) = tree.get_by_depth(level) {
            if self.allowed(config, question.text()) {
                let question = question.clone();
                self.used.insert(question.text().to_string());
                return Some(question);
            }
        }
        self.draw_any(tree, config, rng)
    }

    /// Draw any allowed question, level targets ignored.
    fn draw_any<R: Rng + ?Sized>(
        &mut self,
        tree: &QuestionTree,
        config: &SessionConfig,
        rng: &mut R,
    ) -> Option<Question> {
        if !config.allow_repeats() && self.pool_exhausted(tree) {
            return None;
        }

        for _ in 0..MAX_RANDOM_DRAWS {
            if let Some(question) = tree.weighted_random(rng, FALLBACK_BIAS) {
                if self.allowed(config, question.text()) {
                    let question = question.clone();
                    self.used.insert(question.text().to_string());
                    return Some(question);
                }
            }
        }

        // Unused questions exist but the random walk kept missing them;
        // take the first one in weight order.
        let question = tree
            .questions()
            .into_iter()
            .find(|q| self.allowed(config, q.text()))?
            .clone();
        self.used.insert(question.text().to_string());
        Some(question)
    }

    fn allowed(&self, config: &SessionConfig, text: &str) -> bool {
        config.allow_repeats() || !self.used.contains(text)
    }

    fn pool_exhausted(&self, tree: &QuestionTree) -> bool {
        tree.questions().iter().all(|q| self.used.contains(q.text()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn tree(n: usize) -> QuestionTree {
        let questions = (0..n)
            .map(|i| Question::new(format!("Q{i}")).unwrap())
            .collect();
        QuestionTree::build(questions).unwrap()
    }

    #[test]
    fn balanced_no_repeat_session_yields_distinct_questions() {
        let tree = tree(7);
        let config = SessionConfig::new(5, 5, true, false).unwrap();
        let mut selector = SessionSelector::new();
        let mut rng = StdRng::seed_from_u64(21);

        let selected = selector.select_questions(&tree, &config, &mut rng).unwrap();
        assert_eq!(selected.len(), 5);

        let texts: HashSet<&str> = selected.iter().map(Question::text).collect();
        assert_eq!(texts.len(), 5, "questions must be distinct");
        assert_eq!(selector.used_count(), 5);
    }

    #[test]
    fn exhausted_pool_reports_insufficient_questions() {
        let tree = tree(4);
        let config = SessionConfig::new(10, 5, true, false).unwrap();
        let mut selector = SessionSelector::new();
        let mut rng = StdRng::seed_from_u64(5);

        let err = selector
            .select_questions(&tree, &config, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientQuestions {
                requested: 10,
                selected: 4,
            }
        ));
    }

    #[test]
    fn allowing_repeats_always_fills_the_session() {
        let tree = tree(2);
        let config = SessionConfig::new(10, 3, false, true).unwrap();
        let mut selector = SessionSelector::new();
        let mut rng = StdRng::seed_from_u64(13);

        let selected = selector.select_questions(&tree, &config, &mut rng).unwrap();
        assert_eq!(selected.len(), 10);
        assert!(selected.iter().all(|q| tree.contains(q.text())));
    }

    #[test]
    fn pick_at_level_prefers_the_depth_query() {
        // Depth 1 is the sorted median; with nothing used yet the depth query
        // must win over the random fallback.
        let tree = tree(7);
        let config = SessionConfig::default();
        let mut selector = SessionSelector::new();
        let mut rng = StdRng::seed_from_u64(2);

        let question = selector.pick_at_level(&tree, &config, 1, &mut rng).unwrap();
        assert_eq!(question.text(), tree.get_by_depth(1).unwrap().text());
    }

    #[test]
    fn pick_at_level_falls_back_when_depth_exceeds_height() {
        let tree = tree(3); // height 2
        let config = SessionConfig::default();
        let mut selector = SessionSelector::new();
        let mut rng = StdRng::seed_from_u64(8);

        let question = selector.pick_at_level(&tree, &config, 9, &mut rng);
        assert!(question.is_some(), "fallback should still produce a question");
    }

    #[test]
    fn selection_is_reproducible_with_a_seed() {
        let tree_a = tree(9);
        let tree_b = tree(9);
        let config = SessionConfig::new(6, 4, true, false).unwrap();

        let a = SessionSelector::new()
            .select_questions(&tree_a, &config, &mut StdRng::seed_from_u64(77))
            .unwrap();
        let b = SessionSelector::new()
            .select_questions(&tree_b, &config, &mut StdRng::seed_from_u64(77))
            .unwrap();

        let texts = |v: &[Question]| v.iter().map(|q| q.text().to_string()).collect::<Vec<_>>();
        assert_eq!(texts(&a), texts(&b));
    }
}
