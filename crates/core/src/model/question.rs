use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Compare a submitted answer with its key: surrounding whitespace and case are ignored.
#[must_use]
pub fn answers_match(submitted: &str, expected: &str) -> bool {
    submitted.trim().to_lowercase() == expected.trim().to_lowercase()
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Kind tag of a game question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Mcq,
    Labeling,
    Matching,
    MindMap,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameKind::Mcq => "multiple choice",
            GameKind::Labeling => "labeling",
            GameKind::Matching => "matching",
            GameKind::MindMap => "mind map",
        };
        f.write_str(name)
    }
}

/// A single step of game mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameQuestion {
    pub prompt: String,
    #[serde(flatten)]
    pub body: QuestionBody,
}

/// Kind-specific payload of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionBody {
    Mcq(McqData),
    Labeling(LabelingData),
    Matching(MatchingData),
    MindMap(MindMapData),
}

impl GameQuestion {
    #[must_use]
    pub fn new(prompt: impl Into<String>, body: QuestionBody) -> Self {
        Self {
            prompt: prompt.into(),
            body,
        }
    }

    #[must_use]
    pub fn mcq<I, S>(prompt: impl Into<String>, options: I, correct_answer: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            prompt,
            QuestionBody::Mcq(McqData {
                options: options.into_iter().map(Into::into).collect(),
                correct_answer: correct_answer.into(),
            }),
        )
    }

    #[must_use]
    pub fn kind(&self) -> GameKind {
        match &self.body {
            QuestionBody::Mcq(_) => GameKind::Mcq,
            QuestionBody::Labeling(_) => GameKind::Labeling,
            QuestionBody::Matching(_) => GameKind::Matching,
            QuestionBody::MindMap(_) => GameKind::MindMap,
        }
    }

    #[must_use]
    pub fn as_mcq(&self) -> Option<&McqData> {
        match &self.body {
            QuestionBody::Mcq(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_labeling(&self) -> Option<&LabelingData> {
        match &self.body {
            QuestionBody::Labeling(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_matching(&self) -> Option<&MatchingData> {
        match &self.body {
            QuestionBody::Matching(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mind_map(&self) -> Option<&MindMapData> {
        match &self.body {
            QuestionBody::MindMap(data) => Some(data),
            _ => None,
        }
    }

    /// Content problems that would make the question unanswerable or unfair.
    ///
    /// These are conventions of the content, not structural guarantees, so they
    /// are reported rather than rejected.
    #[must_use]
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        match &self.body {
            QuestionBody::Mcq(data) => {
                if data.options.is_empty() {
                    warnings.push("multiple choice question has no options".to_string());
                } else if !data
                    .options
                    .iter()
                    .any(|option| answers_match(option, &data.correct_answer))
                {
                    warnings.push(format!(
                        "correct answer {:?} is not one of the options",
                        data.correct_answer
                    ));
                }
            }
            QuestionBody::Labeling(data) => {
                for part in &data.parts {
                    let expected = part.expected_label();
                    if !data.labels.iter().any(|label| answers_match(label, expected)) {
                        warnings.push(format!("no label available for part {:?}", part.name));
                    }
                }
            }
            QuestionBody::Matching(data) => {
                for (left, right) in &data.correct_pairs {
                    if !data.left_items.contains(left) {
                        warnings.push(format!("answer key refers to unknown left item {left:?}"));
                    }
                    if !data.right_items.contains(right) {
                        warnings.push(format!("answer key refers to unknown right item {right:?}"));
                    }
                }
            }
            QuestionBody::MindMap(_) => {}
        }
        warnings
    }
}

//
// ─── PAYLOADS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqData {
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl McqData {
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        answers_match(option, &self.correct_answer)
    }
}

/// Place labels on the parts of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelingData {
    pub parts: Vec<LabelingPart>,
    pub labels: Vec<String>,
}

/// A drop zone on the labeling diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelingPart {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Label that belongs on this part; the part's own name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_label: Option<String>,
}

impl LabelingPart {
    #[must_use]
    pub fn new(name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            expected_label: None,
        }
    }

    #[must_use]
    pub fn expected_label(&self) -> &str {
        self.expected_label.as_deref().unwrap_or(&self.name)
    }
}

impl LabelingData {
    /// Find a part by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&LabelingPart> {
        self.parts.iter().find(|part| answers_match(&part.name, name))
    }

    /// Number of placements (part name → label) that match the answer key.
    #[must_use]
    pub fn correct_count(&self, placements: &BTreeMap<String, String>) -> usize {
        placements
            .iter()
            .filter(|(part, label)| {
                self.part(part)
                    .is_some_and(|part| answers_match(label, part.expected_label()))
            })
            .count()
    }
}

/// Pair items from two columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingData {
    pub left_items: Vec<String>,
    pub right_items: Vec<String>,
    /// The authoritative left → right answer key.
    pub correct_pairs: BTreeMap<String, String>,
}

impl MatchingData {
    /// Number of submitted pairs that appear in the answer key.
    #[must_use]
    pub fn correct_count(&self, pairs: &BTreeMap<String, String>) -> usize {
        pairs
            .iter()
            .filter(|(left, right)| self.correct_pairs.get(*left) == Some(*right))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapData {
    pub central_topic: String,
    pub branches: Vec<MindMapBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapBranch {
    pub title: String,
    pub items: Vec<String>,
    /// `#RRGGBB` display color.
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant_labeling() -> LabelingData {
        LabelingData {
            parts: vec![
                LabelingPart::new("Leaves", 0.3, 0.3),
                LabelingPart::new("Stem", 0.45, 0.55),
                LabelingPart::new("Roots", 0.45, 0.85),
            ],
            labels: vec!["Leaves".into(), "Stem".into(), "Roots".into()],
        }
    }

    #[test]
    fn answers_match_ignores_case_and_whitespace() {
        assert!(answers_match(" roots ", "Roots"));
        assert!(!answers_match("Root", "Roots"));
    }

    #[test]
    fn question_deserializes_with_flattened_kind() {
        let json = r#"{
            "prompt": "Which is a simple machine?",
            "kind": "mcq",
            "options": ["Computer", "Lever"],
            "correct_answer": "Lever"
        }"#;
        let question: GameQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind(), GameKind::Mcq);
        assert!(question.as_mcq().unwrap().is_correct("lever"));
        assert!(question.as_matching().is_none());
    }

    #[test]
    fn labeling_counts_against_explicit_key() {
        let mut data = plant_labeling();
        data.parts[0].expected_label = Some("Leaf".into());

        let placements = BTreeMap::from([
            ("Leaves".to_string(), "leaf".to_string()),
            ("Stem".to_string(), "STEM".to_string()),
            ("Roots".to_string(), "Stem".to_string()),
            ("Flower".to_string(), "Flower".to_string()),
        ]);
        assert_eq!(data.correct_count(&placements), 2);
    }

    #[test]
    fn part_lookup_ignores_case_and_whitespace() {
        let data = plant_labeling();
        assert_eq!(data.part(" stem ").map(|part| part.name.as_str()), Some("Stem"));
        assert!(data.part("Flower").is_none());

        let placements = BTreeMap::from([("roots".to_string(), "Roots".to_string())]);
        assert_eq!(data.correct_count(&placements), 1);
    }

    #[test]
    fn matching_counts_exact_pairs() {
        let data = MatchingData {
            left_items: vec!["Xylem".into(), "Phloem".into()],
            right_items: vec!["Water & minerals".into(), "Food & sugar".into()],
            correct_pairs: BTreeMap::from([
                ("Xylem".to_string(), "Water & minerals".to_string()),
                ("Phloem".to_string(), "Food & sugar".to_string()),
            ]),
        };
        let pairs = BTreeMap::from([
            ("Xylem".to_string(), "Water & minerals".to_string()),
            ("Phloem".to_string(), "Water & minerals".to_string()),
        ]);
        assert_eq!(data.correct_count(&pairs), 1);
    }

    #[test]
    fn lint_reports_answer_outside_options() {
        let question = GameQuestion::mcq("Pick", ["A", "B"], "C");
        assert_eq!(question.lint().len(), 1);

        let labeling = GameQuestion::new("Label", QuestionBody::Labeling(plant_labeling()));
        assert!(labeling.lint().is_empty());
    }
}
