use rand::Rng;
use thiserror::Error;

use crate::model::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot build a tree from zero questions")]
    Empty,
}

//
// ─── TREE ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeNode {
    question: Question,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

/// Weight-balanced binary tree of questions.
///
/// The tree is a complete-tree shape over the weight-sorted question sequence:
/// built by recursive median split, so shallow depths hold lower-weight
/// ("easier") questions on average. It is not a search tree and not
/// self-balancing — after any weight changes it is rebuilt wholesale via
/// [`QuestionTree::rebuild`], at the caller's request, once per round.
///
/// Each node exclusively owns its question; callers only ever see borrowed
/// views and mutate through [`QuestionTree::record_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTree {
    root: Option<Box<TreeNode>>,
    len: usize,
}

impl QuestionTree {
    /// Build a tree from the given questions.
    ///
    /// Questions are stable-sorted ascending by weight (ties keep their input
    /// order, which makes the shape a pure function of the input sequence),
    /// then split recursively at the median: for an inclusive range
    /// `[lo, hi]` the root is the element at `(lo + hi) / 2`.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::Empty` if `questions` is empty.
    pub fn build(mut questions: Vec<Question>) -> Result<Self, TreeError> {
        if questions.is_empty() {
            return Err(TreeError::Empty);
        }
        let len = questions.len();
        questions.sort_by_key(Question::weight);
        Ok(Self {
            root: build_subtree(questions),
            len,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; the root sits at depth 1.
    ///
    /// Median-split construction keeps this at ⌈log2(n + 1)⌉.
    #[must_use]
    pub fn height(&self) -> u32 {
        node_height(self.root.as_deref())
    }

    /// Fetch a question at the given 1-based depth, left-biased.
    ///
    /// Depth-first: the left subtree is tried before the right, and a path is
    /// pruned as soon as its depth exceeds the target. Returns `None` when
    /// `depth` is 0 or exceeds the tree height.
    #[must_use]
    pub fn get_by_depth(&self, depth: u32) -> Option<&Question> {
        if depth == 0 {
            return None;
        }
        find_at_depth(self.root.as_deref()?, 1, depth)
    }

    /// Draw a question by random descent.
    ///
    /// At each node, with probability `bias_toward_heavier` (clamped to
    /// `[0, 1]`) descend into the right, heavier-weight subtree when one
    /// exists; otherwise pick uniformly among left, right, and stay. Picking
    /// a missing child stops the walk at the current node.
    ///
    /// The random source is injected so tests can seed it; same tree, same
    /// seed, same draw.
    #[must_use]
    pub fn weighted_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bias_toward_heavier: f64,
    ) -> Option<&Question> {
        let bias = bias_toward_heavier.clamp(0.0, 1.0);
        let mut node = self.root.as_deref()?;
        loop {
            if let Some(right) = node.right.as_deref() {
                if rng.random_bool(bias) {
                    node = right;
                    continue;
                }
            }
            match rng.random_range(0..3u8) {
                0 => match node.left.as_deref() {
                    Some(left) => node = left,
                    None => return Some(&node.question),
                },
                1 => match node.right.as_deref() {
                    Some(right) => node = right,
                    None => return Some(&node.question),
                },
                _ => return Some(&node.question),
            }
        }
    }

    /// Record an answer against the question with the given text.
    ///
    /// Returns `false` when no such question exists in this tree. After a
    /// `true` return the depth-to-difficulty mapping is stale until
    /// [`QuestionTree::rebuild`] is called.
    pub fn record_answer(&mut self, text: &str, correct: bool) -> bool {
        let Some(root) = self.root.as_deref_mut() else {
            return false;
        };
        match find_mut(root, text) {
            Some(question) => {
                question.record_answer(correct);
                true
            }
            None => false,
        }
    }

    /// Rebuild the tree from its current questions and weights.
    ///
    /// Questions are collected in-order (the previous sorted order), so ties
    /// keep their prior relative position and rebuilding is reproducible.
    pub fn rebuild(&mut self) {
        let mut questions = Vec::with_capacity(self.len);
        collect_in_order(self.root.take(), &mut questions);
        questions.sort_by_key(Question::weight);
        self.root = build_subtree(questions);
    }

    /// All questions in weight order (in-order traversal).
    #[must_use]
    pub fn questions(&self) -> Vec<&Question> {
        let mut out = Vec::with_capacity(self.len);
        collect_refs(self.root.as_deref(), &mut out);
        out
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.questions().iter().any(|q| q.text() == text)
    }
}

//
// ─── TRAVERSAL HELPERS ─────────────────────────────────────────────────────────
//
// Plain recursion is fine at the scale of a question bank (dozens of
// questions, depth ~log2 n).

fn build_subtree(mut items: Vec<Question>) -> Option<Box<TreeNode>> {
    if items.is_empty() {
        return None;
    }
    let mid = (items.len() - 1) / 2;
    let right_items = items.split_off(mid + 1);
    let question = items.pop()?;
    Some(Box::new(TreeNode {
        question,
        left: build_subtree(items),
        right: build_subtree(right_items),
    }))
}

fn node_height(node: Option<&TreeNode>) -> u32 {
    node.map_or(0, |n| {
        1 + node_height(n.left.as_deref()).max(node_height(n.right.as_deref()))
    })
}

fn find_at_depth(node: &TreeNode, current: u32, target: u32) -> Option<&Question> {
    if current > target {
        return None;
    }
    if current == target {
        return Some(&node.question);
    }
    node.left
        .as_deref()
        .and_then(|left| find_at_depth(left, current + 1, target))
        .or_else(|| {
            node.right
                .as_deref()
                .and_then(|right| find_at_depth(right, current + 1, target))
        })
}

fn find_mut<'a>(node: &'a mut TreeNode, text: &str) -> Option<&'a mut Question> {
    if node.question.text() == text {
        return Some(&mut node.question);
    }
    if let Some(left) = node.left.as_deref_mut() {
        if let Some(found) = find_mut(left, text) {
            return Some(found);
        }
    }
    node.right
        .as_deref_mut()
        .and_then(|right| find_mut(right, text))
}

fn collect_in_order(node: Option<Box<TreeNode>>, out: &mut Vec<Question>) {
    if let Some(node) = node {
        let node = *node;
        collect_in_order(node.left, out);
        out.push(node.question);
        collect_in_order(node.right, out);
    }
}

fn collect_refs<'a>(node: Option<&'a TreeNode>, out: &mut Vec<&'a Question>) {
    if let Some(node) = node {
        collect_refs(node.left.as_deref(), out);
        out.push(&node.question);
        collect_refs(node.right.as_deref(), out);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
