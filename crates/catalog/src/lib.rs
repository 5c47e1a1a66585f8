#![forbid(unsafe_code)]

pub mod builtin;
pub mod repository;

pub use builtin::BuiltinCatalog;
pub use repository::{CatalogError, ContentCatalog, InMemoryCatalog};
