use crate::config::DEFAULT_MAX_COURSES;
use crate::core::catalog::Catalog;
use crate::core::ConfigProvider;
use crate::utils::error::{RegistrarError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_subject_id, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub registrar: RegistrarConfig,
    pub batch: BatchConfig,
    /// 啟動時預先建立的課程
    #[serde(default)]
    pub subjects: Vec<SubjectSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrarConfig {
    #[serde(default = "default_max_courses")]
    pub max_courses: u32,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            max_courses: DEFAULT_MAX_COURSES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_base_path")]
    pub base_path: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSeed {
    pub department: String,
    pub course_number: u32,
    pub seats: u32,
}

fn default_max_courses() -> u32 {
    DEFAULT_MAX_COURSES
}

fn default_base_path() -> String {
    ".".to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegistrarError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RegistrarError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REGISTRATION_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RegistrarError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("registrar.max_courses", self.registrar.max_courses, 1)?;
        validate_path("batch.base_path", &self.batch.base_path)?;

        if self.batch.sources.is_empty() {
            return Err(RegistrarError::ConfigValidationError {
                field: "batch.sources".to_string(),
                message: "at least one source is required".to_string(),
            });
        }
        for source in &self.batch.sources {
            validate_path("batch.sources", source)?;
        }

        for seed in &self.subjects {
            validate_subject_id(&seed.department, seed.course_number)?;
            validate_positive_number("subjects.seats", seed.seats, 1)?;
        }

        Ok(())
    }

    /// 依設定建立目錄並加入預設課程，回傳新建立的課程數
    pub fn build_catalog(&self) -> Result<(Catalog, usize)> {
        let catalog = Catalog::new(self.registrar.max_courses);
        let mut created = 0;
        for seed in &self.subjects {
            if catalog.add_subject(&seed.department, seed.course_number, seed.seats)? {
                created += 1;
            }
        }
        Ok((catalog, created))
    }
}

impl ConfigProvider for TomlConfig {
    fn max_courses_per_student(&self) -> u32 {
        self.registrar.max_courses
    }

    fn base_path(&self) -> &str {
        &self.batch.base_path
    }

    fn sources(&self) -> &[String] {
        &self.batch.sources
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
