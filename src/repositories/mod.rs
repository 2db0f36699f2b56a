pub mod content_repository;
pub mod document;
pub mod in_memory;
pub mod mongo_collection;
pub mod progress_store;
pub mod student_repository;
pub mod upsert;

pub use content_repository::{ContentDirectory, MongoContentDirectory};
pub use document::{document_key, DocumentCollection, ProgressDocument};
pub use in_memory::InMemoryCollection;
pub use mongo_collection::MongoDocumentCollection;
pub use progress_store::ProgressStore;
pub use student_repository::{MongoStudentDirectory, StudentDirectory};
pub use upsert::UpsertWriter;
