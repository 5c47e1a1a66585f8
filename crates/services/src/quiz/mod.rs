mod answers;
mod controller;
mod engine;

pub use answers::{AnswerState, MatchSide};
pub use controller::{GameController, GameSnapshot};
pub use engine::{QuizEngine, Step};
