use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 學生在目錄與名冊中的鍵：名 + 姓直接串接。
///
/// 串接後相同的兩位學生（例如 "Ann"+"Lee" 與 "An"+"nLee"）會被視為同一筆紀錄，
/// 這是既有的識別方式，刻意保留。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentKey(String);

impl StudentKey {
    pub fn from_names(first_name: &str, last_name: &str) -> Self {
        let mut key = String::with_capacity(first_name.len() + last_name.len());
        key.push_str(first_name);
        key.push_str(last_name);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 由一行指令解析出的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSubject {
        department: String,
        course_number: u32,
        seat_count: u32,
    },
    EnrollStudent {
        department: String,
        course_number: u32,
        first_name: String,
        last_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSnapshot {
    pub department: String,
    pub course_number: u32,
    pub total_seats: u32,
    pub enrolled: Vec<StudentKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerSnapshot {
    pub given_name: String,
    pub family_name: String,
    pub enrolled_courses: u32,
}

/// 某一時間點的完整目錄內容，依系所、課號、學生鍵排序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub max_courses_per_student: u32,
    pub subjects: Vec<SubjectSnapshot>,
    pub learners: Vec<LearnerSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Created,
    Running,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerReport {
    pub source_id: String,
    pub status: WorkerStatus,
    pub lines_read: usize,
    pub subjects_added: usize,
    pub enrollments_accepted: usize,
    pub enrollments_rejected: usize,
    /// worker 提早結束的原因；正常跑完為 None
    pub error: Option<String>,
}

impl WorkerReport {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            status: WorkerStatus::Created,
            lines_read: 0,
            subjects_added: 0,
            enrollments_accepted: 0,
            enrollments_rejected: 0,
            error: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == WorkerStatus::Finished && self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub workers: Vec<WorkerReport>,
}

impl BatchReport {
    pub fn failed_workers(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(|w| !w.succeeded())
    }

    pub fn total_enrollments_accepted(&self) -> usize {
        self.workers.iter().map(|w| w.enrollments_accepted).sum()
    }

    pub fn total_enrollments_rejected(&self) -> usize {
        self.workers.iter().map(|w| w.enrollments_rejected).sum()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
