use crate::domain::ports::CommandSource;
use crate::utils::error::{RegistrarError, Result};
use std::collections::HashMap;
use std::io::{BufRead, Cursor};
use std::sync::{Arc, Mutex, PoisonError};

/// 記憶體中的具名指令腳本，clone 後共用同一份內容
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    scripts: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, source_id: impl Into<String>, script: impl Into<String>) {
        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        scripts.insert(source_id.into(), script.into());
    }

    pub fn with_script(self, source_id: impl Into<String>, script: impl Into<String>) -> Self {
        self.insert(source_id, script);
        self
    }
}

impl CommandSource for MemorySource {
    fn open(&self, source_id: &str) -> Result<Box<dyn BufRead + Send>> {
        let scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        let script = scripts
            .get(source_id)
            .cloned()
            .ok_or_else(|| RegistrarError::SourceUnavailable {
                source_id: source_id.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("No script named: {}", source_id),
                ),
            })?;
        Ok(Box::new(Cursor::new(script.into_bytes())))
    }
}
