use std::fmt;
use std::sync::Arc;

use catalog::ContentCatalog;
use stem_core::model::{Grade, StudyConcept, Subject};
use tokio::sync::watch;

use super::progression::{StudyCursor, StudyProgress, StudyProgression};
use crate::error::LoadError;

/// Everything the study screen renders, republished after every intent.
#[derive(Debug, Clone, PartialEq)]
pub struct StudySnapshot {
    pub subject: Subject,
    pub grade: Grade,
    pub is_loading: bool,
    pub topic_titles: Vec<String>,
    pub cursor: StudyCursor,
    pub topic_title: Option<String>,
    pub concept: Option<StudyConcept>,
    pub progress: StudyProgress,
    pub has_next: bool,
    pub has_previous: bool,
    pub error_message: Option<String>,
}

/// Drives study mode for one subject and grade.
pub struct StudyController {
    catalog: Arc<dyn ContentCatalog>,
    subject: Subject,
    grade: Grade,
    study: StudyProgression,
    is_loading: bool,
    error_message: Option<String>,
    state: watch::Sender<StudySnapshot>,
}

impl StudyController {
    /// Create a controller in the loading state. Call [`StudyController::load`] next.
    #[must_use]
    pub fn new(catalog: Arc<dyn ContentCatalog>, subject: Subject, grade: Grade) -> Self {
        let study = StudyProgression::default();
        let initial = snapshot(subject, grade, &study, true, None);
        let (state, _) = watch::channel(initial);
        Self {
            catalog,
            subject,
            grade,
            study,
            is_loading: true,
            error_message: None,
            state,
        }
    }

    /// Load the topics from the catalog. Returns the number of topics loaded.
    ///
    /// A failed load is logged, surfaced as the error message and leaves the
    /// controller loaded with no content.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Catalog` if the catalog failed.
    pub async fn load(&mut self) -> Result<usize, LoadError> {
        self.is_loading = true;
        self.publish();

        let loaded = self.catalog.load_topics(self.subject, self.grade).await;
        let result = match loaded {
            Ok(topics) => {
                let count = topics.len();
                self.study = StudyProgression::new(topics);
                self.error_message = None;
                Ok(count)
            }
            Err(err) => {
                tracing::error!(subject = %self.subject, grade = %self.grade, error = %err, "failed to load study content");
                self.study = StudyProgression::default();
                self.error_message = Some(format!("Failed to load study content: {err}"));
                Err(err.into())
            }
        };

        self.is_loading = false;
        self.publish();
        result
    }

    /// Subscribe to snapshots; the receiver starts with the current state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StudySnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> StudySnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn progression(&self) -> &StudyProgression {
        &self.study
    }

    pub fn next_concept(&mut self) {
        self.study.advance();
        self.publish();
    }

    pub fn previous_concept(&mut self) {
        self.study.retreat();
        self.publish();
    }

    pub fn jump_to_topic(&mut self, index: usize) {
        if let Err(err) = self.study.jump_to_topic(index) {
            self.error_message = Some(err.to_string());
        }
        self.publish();
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
        self.publish();
    }

    fn publish(&self) {
        self.state.send_replace(snapshot(
            self.subject,
            self.grade,
            &self.study,
            self.is_loading,
            self.error_message.clone(),
        ));
    }
}

fn snapshot(
    subject: Subject,
    grade: Grade,
    study: &StudyProgression,
    is_loading: bool,
    error_message: Option<String>,
) -> StudySnapshot {
    StudySnapshot {
        subject,
        grade,
        is_loading,
        topic_titles: study.topics().iter().map(|t| t.title.clone()).collect(),
        cursor: study.cursor(),
        topic_title: study.current_topic().map(|t| t.title.clone()),
        concept: study.current_concept().cloned(),
        progress: study.progress(),
        has_next: study.has_next(),
        has_previous: study.has_previous(),
        error_message,
    }
}

impl fmt::Debug for StudyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyController")
            .field("subject", &self.subject)
            .field("grade", &self.grade)
            .field("cursor", &self.study.cursor())
            .field("topics_len", &self.study.topics().len())
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::InMemoryCatalog;
    use stem_core::model::StudyTopic;

    fn catalog_with_topics() -> Arc<dyn ContentCatalog> {
        let catalog = InMemoryCatalog::new();
        let topics = vec![
            StudyTopic::new(
                "Simple Machines",
                vec![
                    StudyConcept::new("Levers", "Lift with less effort"),
                    StudyConcept::new("Pulleys", "Change direction of force"),
                ],
            ),
            StudyTopic::new("Forces", vec![StudyConcept::new("Push", "Away from you")]),
        ];
        catalog
            .insert_topics(Subject::Physics, Grade::new(6), topics)
            .unwrap();
        Arc::new(catalog)
    }

    #[tokio::test]
    async fn loading_flag_flips_after_load() {
        let mut controller =
            StudyController::new(catalog_with_topics(), Subject::Physics, Grade::new(6));
        let rx = controller.subscribe();
        assert!(rx.borrow().is_loading);

        assert_eq!(controller.load().await.unwrap(), 2);

        let state = rx.borrow().clone();
        assert!(!state.is_loading);
        assert_eq!(state.topic_titles, ["Simple Machines", "Forces"]);
        assert_eq!(state.concept.unwrap().title, "Levers");
        assert!(state.has_next);
        assert!(!state.has_previous);
    }

    #[tokio::test]
    async fn intents_publish_new_cursor() {
        let mut controller =
            StudyController::new(catalog_with_topics(), Subject::Physics, Grade::new(6));
        controller.load().await.unwrap();
        let rx = controller.subscribe();

        controller.next_concept();
        controller.next_concept();
        let state = rx.borrow().clone();
        assert_eq!(state.topic_title.as_deref(), Some("Forces"));
        assert!(state.progress.is_at_end);
        assert!((state.progress.fraction - 1.0).abs() < f32::EPSILON);

        controller.previous_concept();
        assert_eq!(rx.borrow().concept.as_ref().unwrap().title, "Pulleys");
    }

    #[tokio::test]
    async fn bad_jump_surfaces_message_and_keeps_cursor() {
        let mut controller =
            StudyController::new(catalog_with_topics(), Subject::Physics, Grade::new(6));
        controller.load().await.unwrap();

        controller.jump_to_topic(9);
        let state = controller.snapshot();
        assert!(state.error_message.is_some());
        assert_eq!(state.cursor, StudyCursor::default());

        controller.clear_error();
        assert!(controller.snapshot().error_message.is_none());
    }

    #[tokio::test]
    async fn unknown_combination_loads_empty() {
        let mut controller =
            StudyController::new(catalog_with_topics(), Subject::Unknown, Grade::new(6));
        assert_eq!(controller.load().await.unwrap(), 0);

        let state = controller.snapshot();
        assert!(!state.is_loading);
        assert!(state.concept.is_none());
        assert!(state.progress.fraction.abs() < f32::EPSILON);
    }
}
