pub mod batch;
pub mod catalog;
pub mod command;
pub mod learner;
pub mod roster;

pub use crate::domain::model::{BatchReport, CatalogSnapshot, Command, StudentKey, WorkerReport};
pub use crate::domain::ports::{CommandSource, ConfigProvider};
pub use crate::utils::error::Result;
