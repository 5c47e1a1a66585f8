//! Content shipped with the app, embedded as one JSON document per subject.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use stem_core::model::{GameQuestion, Grade, StudyTopic, Subject};

use crate::repository::{CatalogError, ContentCatalog};

const PLANT: &str = include_str!("../content/plant.json");
const ANIMAL: &str = include_str!("../content/animal.json");
const PHYSICS: &str = include_str!("../content/physics.json");

/// Placeholder in fallback prompts, replaced by the requested grade.
const GRADE_PLACEHOLDER: &str = "{grade}";

#[derive(Debug, Deserialize)]
struct SubjectContent {
    #[serde(default)]
    topics: GradedContent<StudyTopic>,
    #[serde(default)]
    questions: GradedContent<GameQuestion>,
}

/// Lists keyed by grade, with an optional list for every other grade.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct GradedContent<T> {
    #[serde(default)]
    by_grade: BTreeMap<u8, Vec<T>>,
    #[serde(default)]
    fallback: Vec<T>,
}

impl<T> Default for GradedContent<T> {
    fn default() -> Self {
        Self {
            by_grade: BTreeMap::new(),
            fallback: Vec::new(),
        }
    }
}

impl<T> GradedContent<T> {
    /// Take the list for `grade`; `true` when the fallback list was used.
    fn into_grade(mut self, grade: Grade) -> (Vec<T>, bool) {
        match self.by_grade.remove(&grade.value()) {
            Some(items) => (items, false),
            None => (self.fallback, true),
        }
    }
}

/// The built-in Plant, Animal and Physics content.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parse(subject: Subject) -> Result<Option<SubjectContent>, CatalogError> {
        let raw = match subject {
            Subject::Plant => PLANT,
            Subject::Animal => ANIMAL,
            Subject::Physics => PHYSICS,
            Subject::Unknown => return Ok(None),
        };
        serde_json::from_str(raw)
            .map(Some)
            .map_err(|source| CatalogError::Malformed { subject, source })
    }

    /// Parse every embedded document and log content warnings.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Malformed` for the first document that fails to parse.
    pub fn validate(&self) -> Result<usize, CatalogError> {
        let mut warnings = 0;
        for subject in Subject::KNOWN {
            let Some(content) = Self::parse(subject)? else {
                continue;
            };
            let graded = content.questions.by_grade.values();
            for question in graded.flatten().chain(&content.questions.fallback) {
                warnings += log_lint(subject, question);
            }
        }
        Ok(warnings)
    }
}

fn log_lint(subject: Subject, question: &GameQuestion) -> usize {
    let warnings = question.lint();
    for warning in &warnings {
        tracing::warn!(%subject, prompt = %question.prompt, "{warning}");
    }
    warnings.len()
}

#[async_trait]
impl ContentCatalog for BuiltinCatalog {
    async fn load_topics(
        &self,
        subject: Subject,
        grade: Grade,
    ) -> Result<Vec<StudyTopic>, CatalogError> {
        let Some(content) = Self::parse(subject)? else {
            tracing::warn!(%subject, %grade, "unknown subject, no study content");
            return Ok(Vec::new());
        };
        let (topics, _) = content.topics.into_grade(grade);
        tracing::debug!(%subject, %grade, topics = topics.len(), "loaded study topics");
        Ok(topics)
    }

    async fn load_questions(
        &self,
        subject: Subject,
        grade: Grade,
    ) -> Result<Vec<GameQuestion>, CatalogError> {
        let Some(content) = Self::parse(subject)? else {
            tracing::warn!(%subject, %grade, "unknown subject, no questions");
            return Ok(Vec::new());
        };
        let (mut questions, fallback) = content.questions.into_grade(grade);
        if fallback {
            let grade = grade.to_string();
            for question in &mut questions {
                question.prompt = question.prompt.replace(GRADE_PLACEHOLDER, &grade);
            }
        }
        for question in &questions {
            log_lint(subject, question);
        }
        tracing::debug!(%subject, %grade, questions = questions.len(), "loaded questions");
        Ok(questions)
    }
}
