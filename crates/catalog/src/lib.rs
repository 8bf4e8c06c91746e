#![forbid(unsafe_code)]

pub mod repository;
pub mod sample;

pub use repository::{Catalog, CatalogError, InMemoryCatalog, LessonCatalog, QuizCatalog};
pub use sample::{SampleDataError, sample_catalog};
