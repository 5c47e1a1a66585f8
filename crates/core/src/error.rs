use thiserror::Error;

use crate::model::GradeError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Grade(#[from] GradeError),
}
