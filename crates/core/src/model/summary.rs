use chrono::{DateTime, Utc};

use crate::model::{Evaluation, GameKind, Grade, Subject};

/// Outcome of one question within a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionResult {
    pub index: usize,
    pub kind: GameKind,
    pub evaluation: Evaluation,
}

/// Aggregate summary for a finished game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    subject: Subject,
    grade: Grade,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_questions: usize,
    score: u32,
    results: Vec<QuestionResult>,
}

impl GameSummary {
    /// Build a summary from the recorded results of a session.
    ///
    /// A `completed_at` earlier than `started_at` (clock skew) is clamped to `started_at`.
    #[must_use]
    pub fn from_results(
        subject: Subject,
        grade: Grade,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_questions: usize,
        results: Vec<QuestionResult>,
    ) -> Self {
        let score = results
            .iter()
            .fold(0_u32, |acc, r| acc.saturating_add(r.evaluation.awarded));
        Self {
            subject,
            grade,
            started_at,
            completed_at: completed_at.max(started_at),
            total_questions,
            score,
            results,
        }
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.grade
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Questions evaluated during the session (mind maps are never evaluated).
    #[must_use]
    pub fn answered(&self) -> usize {
        self.results.len()
    }

    /// Questions answered fully correctly.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.results.iter().filter(|r| r.evaluation.correct).count()
    }

    #[must_use]
    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }
}
