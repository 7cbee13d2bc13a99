pub mod loader;
pub mod shuffle;
pub mod text;

/// A single trivia question with its answers in display order.
/// `correct_answer` is always one of `answers`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub text: String,
    pub correct_answer: String,
    pub answers: Vec<String>,
}

impl Question {
    pub fn new(text: String, correct_answer: String, answers: Vec<String>) -> Self {
        Self {
            text,
            correct_answer,
            answers,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    Submitted,
}

/// Proof that a load was started against the current session generation.
/// `apply_load` rejects tokens from before the latest `reset`, so a fetch
/// that resolves late cannot overwrite a fresher session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoadToken(u64);

/// The whole quiz lifecycle: Loading -> Ready -> Submitted, with reset back
/// to Loading. Illegal transitions are silent no-ops so the UI layer can
/// stay dumb about ordering.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    questions: Vec<Question>,
    selections: Vec<Option<String>>,
    phase: Phase,
    score: Option<usize>,
    epoch: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selection(&self, index: usize) -> Option<&str> {
        self.selections.get(index)?.as_deref()
    }

    /// Defined only after `submit`.
    pub fn score(&self) -> Option<usize> {
        self.score
    }

    /// Drops all questions, selections and the score, returns to `Loading`
    /// and hands back the token the next `apply_load` must present.
    pub fn reset(&mut self) -> LoadToken {
        self.questions.clear();
        self.selections.clear();
        self.score = None;
        self.phase = Phase::Loading;
        self.epoch += 1;
        LoadToken(self.epoch)
    }

    /// Populates the session from a finished fetch. Returns false (and leaves
    /// the session untouched) if the token is stale or the session already
    /// left `Loading`.
    pub fn apply_load(&mut self, token: LoadToken, questions: Vec<Question>) -> bool {
        if token.0 != self.epoch || self.phase != Phase::Loading {
            log::debug!("discarding stale load result ({:?})", token);
            return false;
        }
        self.selections = vec![None; questions.len()];
        self.questions = questions;
        self.phase = Phase::Ready;
        true
    }

    /// Records a selection, overwriting any earlier pick for that question.
    /// Ignored outside `Ready`, for an out-of-range index, or for an answer
    /// that doesn't belong to the question.
    pub fn select_answer(&mut self, index: usize, answer: &str) {
        if self.phase != Phase::Ready {
            return;
        }
        let Some(question) = self.questions.get(index) else {
            return;
        };
        if !question.answers.iter().any(|a| a == answer) {
            return;
        }
        self.selections[index] = Some(answer.to_string());
    }

    /// Freezes the session and counts correct selections. Unanswered
    /// questions count as incorrect. Ignored outside `Ready`.
    pub fn submit(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        let correct = self
            .questions
            .iter()
            .zip(&self.selections)
            .filter(|(question, selected)| selected.as_deref() == Some(&question.correct_answer))
            .count();
        self.score = Some(correct);
        self.phase = Phase::Submitted;
    }

    pub fn score_message(&self) -> Option<String> {
        let score = self.score?;
        Some(format!(
            "You got {} out of {}!",
            score,
            self.questions.len()
        ))
    }
}
