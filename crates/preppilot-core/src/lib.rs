pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod pack;
pub mod render;
pub mod store;

// Re-export main types for convenience
pub use client::{GenerationClient, Phase};
pub use config::Config;
pub use error::{ConfigurationError, ExportError, GenerationError, LoadError, StoreError, ValidationError};
pub use export::{Exporter, EXPORT_FILENAME};
pub use pack::{
    can_generate, GenerateRequest, Level, PrepPack, TechQuestion, MIN_JOB_DESCRIPTION_CHARS, PLACEHOLDER,
};
pub use render::{copy_json, copy_text, project, Entry, RenderedSection, ResultView, SectionId};
pub use store::{FileStore, ResultStore, SessionStore};
