pub mod document;
pub mod error;
pub mod files;
pub mod repository;
pub mod service;
pub mod worker;

pub use document::PersistedTask;
pub use files::{default_data_dir, ensure_dir};
pub use repository::JsonTaskRepository;
pub use service::{snapshot, PersistenceService};
pub use worker::{SaveJob, SaveWorker};
