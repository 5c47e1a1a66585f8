use serde::{Deserialize, Serialize};

/// An ordered group of concepts shown one card at a time in study mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTopic {
    pub title: String,
    /// Opaque icon token; rendering is up to the presentation layer.
    #[serde(default)]
    pub icon: String,
    pub concepts: Vec<StudyConcept>,
}

impl StudyTopic {
    #[must_use]
    pub fn new(title: impl Into<String>, concepts: Vec<StudyConcept>) -> Self {
        Self {
            title: title.into(),
            icon: String::new(),
            concepts,
        }
    }

    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }
}

/// A single study card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConcept {
    pub title: String,
    pub definition: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub interactive: Option<InteractiveElement>,
    #[serde(default)]
    pub fun_facts: Vec<String>,
}

impl StudyConcept {
    /// Concept with only a title and definition.
    #[must_use]
    pub fn new(title: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            definition: definition.into(),
            key_points: Vec::new(),
            examples: Vec::new(),
            interactive: None,
            fun_facts: Vec::new(),
        }
    }
}

/// Descriptive widget attached to a concept. Never scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractiveElement {
    ImageClick { parts: Vec<ClickablePart> },
    /// Items to sort into categories; there is no stored correct mapping.
    DragDrop {
        items: Vec<String>,
        categories: Vec<String>,
    },
    Timeline { events: Vec<TimelineEvent> },
    Comparison { columns: Vec<ComparisonColumn> },
}

/// A tappable region on a diagram, in normalized `0.0..=1.0` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickablePart {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub step: String,
    pub description: String,
    pub detail: String,
}

/// One category of a comparison table and its features, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonColumn {
    pub label: String,
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concept_defaults_optional_lists() {
        let json = r#"{ "title": "Roots", "definition": "Hold the plant" }"#;
        let concept: StudyConcept = serde_json::from_str(json).unwrap();
        assert_eq!(concept, StudyConcept::new("Roots", "Hold the plant"));
    }

    #[test]
    fn interactive_element_is_tagged_by_type() {
        let json = r#"{
            "type": "comparison",
            "columns": [
                { "label": "Push", "features": ["Away from you"] },
                { "label": "Pull", "features": ["Toward you"] }
            ]
        }"#;
        let element: InteractiveElement = serde_json::from_str(json).unwrap();
        let InteractiveElement::Comparison { columns } = element else {
            panic!("expected comparison");
        };
        let labels: Vec<_> = columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Push", "Pull"]);
    }
}
