use crate::utils::error::Result;
use std::io::BufRead;

/// 指令來源：依識別字開啟一個逐行讀取的串流
pub trait CommandSource: Send + Sync {
    fn open(&self, source_id: &str) -> Result<Box<dyn BufRead + Send>>;
}

pub trait ConfigProvider: Send + Sync {
    fn max_courses_per_student(&self) -> u32;
    fn base_path(&self) -> &str;
    fn sources(&self) -> &[String];
}
