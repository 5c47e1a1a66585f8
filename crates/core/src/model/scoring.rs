use serde::{Deserialize, Serialize};

/// Points awarded per game kind.
///
/// Multi-part questions (labeling, matching) award the full bonus when every part
/// is right, otherwise a per-item partial credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub mcq_correct: u32,
    pub labeling_full: u32,
    pub labeling_per_part: u32,
    pub matching_full: u32,
    pub matching_per_pair: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            mcq_correct: 10,
            labeling_full: 15,
            labeling_per_part: 3,
            matching_full: 20,
            matching_per_pair: 4,
        }
    }
}

/// Result of evaluating one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
    pub correct_count: usize,
    pub total: usize,
    pub awarded: u32,
}

impl ScoringRules {
    #[must_use]
    pub fn mcq(&self, correct: bool) -> Evaluation {
        Evaluation {
            correct,
            correct_count: usize::from(correct),
            total: 1,
            awarded: if correct { self.mcq_correct } else { 0 },
        }
    }

    #[must_use]
    pub fn labeling(&self, correct_count: usize, total_parts: usize) -> Evaluation {
        tiered(
            correct_count,
            total_parts,
            self.labeling_full,
            self.labeling_per_part,
        )
    }

    #[must_use]
    pub fn matching(&self, correct_count: usize, total_pairs: usize) -> Evaluation {
        tiered(
            correct_count,
            total_pairs,
            self.matching_full,
            self.matching_per_pair,
        )
    }
}

fn tiered(correct_count: usize, total: usize, full: u32, per_item: u32) -> Evaluation {
    let correct = correct_count == total;
    let awarded = if correct {
        full
    } else {
        let count = u32::try_from(correct_count).unwrap_or(u32::MAX);
        count.saturating_mul(per_item)
    };
    Evaluation {
        correct,
        correct_count,
        total,
        awarded,
    }
}
