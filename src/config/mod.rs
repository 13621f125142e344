pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_COURSES: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "course-registrar"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Apply registration command files to a shared course catalog in parallel")
)]
pub struct CliConfig {
    /// Registration command files, one worker per file
    #[cfg_attr(feature = "cli", arg(required = true))]
    pub sources: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "."))]
    pub base_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "3"))]
    pub max_courses: u32,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(
        feature = "cli",
        arg(long, help = "Print the batch report and final catalog as JSON")
    )]
    pub json: bool,
}

impl ConfigProvider for CliConfig {
    fn max_courses_per_student(&self) -> u32 {
        self.max_courses
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("base_path", &self.base_path)?;
        validate_positive_number("max_courses", self.max_courses, 1)?;
        for source in &self.sources {
            validate_path("sources", source)?;
        }
        Ok(())
    }
}
