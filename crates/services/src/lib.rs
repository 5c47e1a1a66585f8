#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;
pub mod study;

pub use stem_core::Clock;

pub use error::{LoadError, StudyError};
pub use quiz::{AnswerState, GameController, GameSnapshot, MatchSide, QuizEngine, Step};
pub use study::{StudyController, StudyCursor, StudyProgress, StudyProgression, StudySnapshot};
