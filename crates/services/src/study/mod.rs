mod controller;
mod progression;

pub use controller::{StudyController, StudySnapshot};
pub use progression::{StudyCursor, StudyProgress, StudyProgression};
