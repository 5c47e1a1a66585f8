//! Shared error types for the services crate.

use thiserror::Error;

use catalog::CatalogError;

/// Errors emitted by study navigation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudyError {
    #[error("topic {index} is out of range ({len} topics loaded)")]
    TopicOutOfRange { index: usize, len: usize },
    #[error("topic {index} has no concepts")]
    EmptyTopic { index: usize },
}

/// Errors emitted while loading content into a controller.
///
/// The controller has already settled into its empty state when this is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
