use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Question, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("unknown category: {name}")]
    UnknownCategory { name: String },
    #[error("category '{name}' has no questions")]
    EmptyCategory { name: String },
    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Static bank of question texts keyed by category name.
///
/// The bank is read-only during play: it is the source trees are built from,
/// and the per-question weights live in the tree, not here. A `BTreeMap`
/// keeps category iteration order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    categories: BTreeMap<String, Vec<String>>,
}

impl QuestionBank {
    /// An empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in categories shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        let mut bank = Self::new();
        bank.insert_category(
            "Farm",
            [
                "Which animal lays eggs?",
                "What food do cows produce?",
                "Which animal gives us wool?",
                "What do bees make?",
                "Which bird wakes the farm at dawn?",
                "What vegetable grows underground and is orange?",
                "Which animal pulls the plough?",
            ],
        );
        bank.insert_category(
            "Forest",
            [
                "Which tree produces acorns?",
                "Which animal hibernates in winter?",
                "Which mushroom with red cap and white dots is poisonous?",
                "Which bird hoots at night?",
                "What do squirrels store for winter?",
                "Which animal builds dams in rivers?",
                "What covers the forest floor in autumn?",
            ],
        );
        bank.insert_category(
            "City",
            [
                "What color means stop at a traffic light?",
                "Which vehicle carries many passengers on rails underground?",
                "Where do you borrow books in a city?",
                "Which service do you call when there is a fire?",
                "What do pedestrians use to cross the street safely?",
                "Which building is the tallest kind in a city?",
                "Where do children go to learn?",
            ],
        );
        bank
    }

    /// Add or replace a category with its question texts.
    pub fn insert_category<I, S>(&mut self, name: impl Into<String>, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(name.into(), texts.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Category names in deterministic (sorted) order.
    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Number of questions declared for a category, zero if unknown.
    #[must_use]
    pub fn category_len(&self, category: &str) -> usize {
        self.categories.get(category).map_or(0, Vec::len)
    }

    /// Build fresh `Question` values for a category, in declared order.
    ///
    /// All questions start at weight 0; shuffling for tie-break variety is the
    /// caller's business so it can use an injected random source.
    ///
    /// # Errors
    ///
    /// Returns `BankError::UnknownCategory` if the category does not exist,
    /// `BankError::EmptyCategory` if it has no questions (this rejects empty
    /// trees at configuration time), or a `QuestionError` for blank texts.
    pub fn questions_for(&self, category: &str) -> Result<Vec<Question>, BankError> {
        let texts = self
            .categories
            .get(category)
            .ok_or_else(|| BankError::UnknownCategory {
                name: category.to_string(),
            })?;
        if texts.is_empty() {
            return Err(BankError::EmptyCategory {
                name: category.to_string(),
            });
        }

        texts
            .iter()
            .map(|text| Question::new(text.clone()).map_err(BankError::from))
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
