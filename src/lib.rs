pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{FileSource, MemorySource};
pub use crate::config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::{batch::BatchProcessor, catalog::Catalog};
pub use crate::domain::model::{BatchReport, CatalogSnapshot, WorkerReport, WorkerStatus};
pub use crate::utils::error::{RegistrarError, Result};
