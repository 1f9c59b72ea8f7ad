pub mod config;
pub mod models;
pub mod pipeline;
pub mod processing;
pub mod store;
pub mod utils;
pub mod validation;

pub use config::IntakeConfig;
pub use pipeline::{IntakePipeline, UploadOutcome};
pub use store::{InMemoryRecordStore, RecordStore};
pub use utils::IntakeError;
