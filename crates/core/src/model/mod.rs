mod question;
mod scoring;
mod study;
mod subject;
mod summary;

pub use question::{
    GameKind, GameQuestion, LabelingData, LabelingPart, MatchingData, McqData, MindMapBranch,
    MindMapData, QuestionBody, answers_match,
};
pub use scoring::{Evaluation, ScoringRules};
pub use study::{
    ClickablePart, ComparisonColumn, InteractiveElement, StudyConcept, StudyTopic, TimelineEvent,
};
pub use subject::{Grade, GradeError, Subject};
pub use summary::{GameSummary, QuestionResult};
