use stem_core::model::{StudyConcept, StudyTopic};

use crate::error::StudyError;

/// Position of the study card on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StudyCursor {
    pub topic: usize,
    pub concept: usize,
}

/// Aggregated view of study progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudyProgress {
    /// Zero-based index of the current concept across all topics.
    pub position: usize,
    pub total: usize,
    pub fraction: f32,
    pub is_at_end: bool,
}

/// Linear walk over the (topic, concept) pairs of the loaded topics.
///
/// Topics without concepts are skipped in both directions. Starts on the first
/// concept of the first non-empty topic; the last concept of the last non-empty
/// topic is terminal and `advance` is a no-op there.
#[derive(Debug, Clone, Default)]
pub struct StudyProgression {
    topics: Vec<StudyTopic>,
    cursor: StudyCursor,
}

impl StudyProgression {
    #[must_use]
    pub fn new(topics: Vec<StudyTopic>) -> Self {
        let topic = topics
            .iter()
            .position(|topic| topic.concept_count() > 0)
            .unwrap_or(0);
        Self {
            topics,
            cursor: StudyCursor { topic, concept: 0 },
        }
    }

    #[must_use]
    pub fn topics(&self) -> &[StudyTopic] {
        &self.topics
    }

    #[must_use]
    pub fn cursor(&self) -> StudyCursor {
        self.cursor
    }

    /// No topics were loaded; there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    #[must_use]
    pub fn total_concepts(&self) -> usize {
        self.topics.iter().map(StudyTopic::concept_count).sum()
    }

    #[must_use]
    pub fn current_topic(&self) -> Option<&StudyTopic> {
        self.topics.get(self.cursor.topic)
    }

    #[must_use]
    pub fn current_concept(&self) -> Option<&StudyConcept> {
        self.current_topic()
            .and_then(|topic| topic.concepts.get(self.cursor.concept))
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        let Some(topic) = self.current_topic() else {
            return false;
        };
        self.cursor.concept + 1 < topic.concept_count()
            || self.next_filled_topic().is_some()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.cursor.concept > 0 || self.previous_filled_topic().is_some()
    }

    /// Cursor sits on a concept and no later topic has concepts.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.current_concept().is_some() && !self.has_next()
    }

    /// Move to the next concept, crossing into the next non-empty topic when needed.
    ///
    /// Returns `false` when already at the end.
    pub fn advance(&mut self) -> bool {
        let Some(topic) = self.current_topic() else {
            return false;
        };
        if self.cursor.concept + 1 < topic.concept_count() {
            self.cursor.concept += 1;
        } else if let Some(next) = self.next_filled_topic() {
            self.cursor = StudyCursor {
                topic: next,
                concept: 0,
            };
        } else {
            return false;
        }
        tracing::debug!(topic = self.cursor.topic, concept = self.cursor.concept, "study advanced");
        true
    }

    /// Move to the previous concept, crossing into the last concept of the
    /// previous non-empty topic.
    ///
    /// Returns `false` when already at the first concept.
    pub fn retreat(&mut self) -> bool {
        if self.cursor.concept > 0 {
            self.cursor.concept -= 1;
        } else if let Some(previous) = self.previous_filled_topic() {
            self.cursor = StudyCursor {
                topic: previous,
                concept: self.topics[previous].concept_count() - 1,
            };
        } else {
            return false;
        }
        tracing::debug!(topic = self.cursor.topic, concept = self.cursor.concept, "study retreated");
        true
    }

    /// Jump to the first concept of a topic.
    ///
    /// # Errors
    ///
    /// Leaves the cursor unchanged and returns `StudyError::TopicOutOfRange` if
    /// `index` does not name a loaded topic, or `StudyError::EmptyTopic` if the
    /// topic has no concepts.
    pub fn jump_to_topic(&mut self, index: usize) -> Result<(), StudyError> {
        let Some(topic) = self.topics.get(index) else {
            tracing::warn!(index, topics = self.topics.len(), "ignoring jump to missing topic");
            return Err(StudyError::TopicOutOfRange {
                index,
                len: self.topics.len(),
            });
        };
        if topic.concept_count() == 0 {
            tracing::warn!(index, "ignoring jump to topic without concepts");
            return Err(StudyError::EmptyTopic { index });
        }
        self.cursor = StudyCursor {
            topic: index,
            concept: 0,
        };
        Ok(())
    }

    fn next_filled_topic(&self) -> Option<usize> {
        let from = self.cursor.topic + 1;
        self.topics
            .iter()
            .skip(from)
            .position(|topic| topic.concept_count() > 0)
            .map(|offset| from + offset)
    }

    fn previous_filled_topic(&self) -> Option<usize> {
        self.topics
            .iter()
            .take(self.cursor.topic)
            .rposition(|topic| topic.concept_count() > 0)
    }

    /// Concepts before the cursor across all topics.
    #[must_use]
    pub fn position(&self) -> usize {
        let before: usize = self
            .topics
            .iter()
            .take(self.cursor.topic)
            .map(StudyTopic::concept_count)
            .sum();
        before + self.cursor.concept
    }

    /// Share of concepts already passed, in `0.0..=1.0`.
    ///
    /// `0.0` with no content; exactly `1.0` on the terminal concept.
    #[must_use]
    pub fn completion_fraction(&self) -> f32 {
        let total = self.total_concepts();
        if total == 0 {
            return 0.0;
        }
        if self.is_at_end() {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.position() as f32 / total as f32;
        fraction.min(1.0)
    }

    #[must_use]
    pub fn progress(&self) -> StudyProgress {
        StudyProgress {
            position: self.position(),
            total: self.total_concepts(),
            fraction: self.completion_fraction(),
            is_at_end: self.is_at_end(),
        }
    }
}
