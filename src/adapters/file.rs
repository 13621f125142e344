use crate::domain::ports::CommandSource;
use crate::utils::error::{RegistrarError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// 以 `base_path` 為根目錄讀取指令檔
#[derive(Debug, Clone)]
pub struct FileSource {
    base_path: PathBuf,
}

impl FileSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, source_id: &str) -> PathBuf {
        self.base_path.join(source_id)
    }
}

impl CommandSource for FileSource {
    fn open(&self, source_id: &str) -> Result<Box<dyn BufRead + Send>> {
        let full_path = self.resolve(source_id);
        tracing::debug!("Opening command source: {}", full_path.display());

        let file = File::open(&full_path).map_err(|source| RegistrarError::SourceUnavailable {
            source_id: source_id.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}
