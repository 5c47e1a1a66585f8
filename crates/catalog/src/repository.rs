use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stem_core::model::{GameQuestion, Grade, StudyTopic, Subject};
use thiserror::Error;

/// Errors surfaced by catalog backends.
///
/// A subject/grade with no content is not an error: catalogs return an empty list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("malformed content for {subject}: {source}")]
    Malformed {
        subject: Subject,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only source of study and game content keyed by subject and grade.
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Study topics for a subject and grade, in display order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only for backend failures; unknown combinations yield an empty list.
    async fn load_topics(
        &self,
        subject: Subject,
        grade: Grade,
    ) -> Result<Vec<StudyTopic>, CatalogError>;

    /// Game questions for a subject and grade, in play order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only for backend failures; unknown combinations yield an empty list.
    async fn load_questions(
        &self,
        subject: Subject,
        grade: Grade,
    ) -> Result<Vec<GameQuestion>, CatalogError>;
}

type Key = (Subject, Grade);

/// Simple in-memory catalog for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    topics: Arc<Mutex<HashMap<Key, Vec<StudyTopic>>>>,
    questions: Arc<Mutex<HashMap<Key, Vec<GameQuestion>>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the topics stored for a subject and grade.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the lock is poisoned.
    pub fn insert_topics(
        &self,
        subject: Subject,
        grade: Grade,
        topics: Vec<StudyTopic>,
    ) -> Result<(), CatalogError> {
        let mut guard = self
            .topics
            .lock()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        guard.insert((subject, grade), topics);
        Ok(())
    }

    /// Replace the questions stored for a subject and grade.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the lock is poisoned.
    pub fn insert_questions(
        &self,
        subject: Subject,
        grade: Grade,
        questions: Vec<GameQuestion>,
    ) -> Result<(), CatalogError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        guard.insert((subject, grade), questions);
        Ok(())
    }
}

#[async_trait]
impl ContentCatalog for InMemoryCatalog {
    async fn load_topics(
        &self,
        subject: Subject,
        grade: Grade,
    ) -> Result<Vec<StudyTopic>, CatalogError> {
        let guard = self
            .topics
            .lock()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(guard.get(&(subject, grade)).cloned().unwrap_or_default())
    }

    async fn load_questions(
        &self,
        subject: Subject,
        grade: Grade,
    ) -> Result<Vec<GameQuestion>, CatalogError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(guard.get(&(subject, grade)).cloned().unwrap_or_default())
    }
}
