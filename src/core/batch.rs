use crate::core::catalog::Catalog;
use crate::core::command::parse_line;
use crate::domain::model::{BatchReport, Command, WorkerReport, WorkerStatus};
use crate::domain::ports::CommandSource;
use crate::utils::error::{RegistrarError, Result};
use chrono::Utc;
use std::io::BufRead;
use std::sync::Arc;

/// 平行處理多個指令來源，全部寫入同一個 `Catalog`。
///
/// 每個來源一個 worker（各自一條 blocking thread），來源之間沒有順序保證，
/// 同一來源內的指令依行序執行。任何 worker 的錯誤只會結束它自己。
pub struct BatchProcessor<S: CommandSource> {
    catalog: Arc<Catalog>,
    source: Arc<S>,
}

impl<S: CommandSource + 'static> BatchProcessor<S> {
    pub fn new(catalog: Arc<Catalog>, source: S) -> Self {
        Self {
            catalog,
            source: Arc::new(source),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// 為每個來源啟動一個 worker，等待全部結束後回傳報告
    pub async fn run<I, T>(&self, source_ids: I) -> BatchReport
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let started_at = Utc::now();

        let handles: Vec<_> = source_ids
            .into_iter()
            .map(Into::into)
            .map(|source_id: String| {
                let catalog = Arc::clone(&self.catalog);
                let source = Arc::clone(&self.source);
                let worker = Worker::new(source_id.clone());
                let handle =
                    tokio::task::spawn_blocking(move || worker.run(source.as_ref(), &catalog));
                (source_id, handle)
            })
            .collect();

        tracing::info!("🚀 Started {} registration worker(s)", handles.len());

        let mut workers = Vec::with_capacity(handles.len());
        for (source_id, handle) in handles {
            let report = match handle.await {
                Ok(report) => report,
                Err(join_error) => {
                    let err = RegistrarError::WorkerPanicked {
                        source_id: source_id.clone(),
                    };
                    tracing::error!("❌ {}: {}", err, join_error);
                    let mut report = WorkerReport::new(source_id);
                    report.status = WorkerStatus::Finished;
                    report.error = Some(err.to_string());
                    report
                }
            };
            workers.push(report);
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            workers,
        };
        tracing::info!(
            "✅ Batch finished: {} accepted, {} rejected, {} failed worker(s)",
            report.total_enrollments_accepted(),
            report.total_enrollments_rejected(),
            report.failed_workers().count()
        );
        report
    }

    /// 只解析來源，不修改目錄
    pub fn scan(&self, source_id: &str) -> Result<Vec<Command>> {
        let reader = self.source.open(source_id)?;
        let mut commands = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = read_line(source_id, line)?;
            if let Some(command) = parse_command(source_id, index, &line)? {
                commands.push(command);
            }
        }
        Ok(commands)
    }
}

struct Worker {
    report: WorkerReport,
}

impl Worker {
    fn new(source_id: String) -> Self {
        Self {
            report: WorkerReport::new(source_id),
        }
    }

    fn run(mut self, source: &dyn CommandSource, catalog: &Catalog) -> WorkerReport {
        let span = tracing::info_span!("worker", source = %self.report.source_id);
        let _guard = span.enter();

        self.transition(WorkerStatus::Running);
        if let Err(e) = self.process(source, catalog) {
            tracing::warn!("⚠️ Worker stopped early: {}", e);
            tracing::debug!("💡 {}", e.recovery_suggestion());
            self.report.error = Some(e.to_string());
        }
        self.transition(WorkerStatus::Finished);

        self.report
    }

    fn transition(&mut self, status: WorkerStatus) {
        tracing::debug!("{:?} -> {:?}", self.report.status, status);
        self.report.status = status;
    }

    fn process(&mut self, source: &dyn CommandSource, catalog: &Catalog) -> Result<()> {
        let reader = source.open(&self.report.source_id)?;

        for (index, line) in reader.lines().enumerate() {
            let line = read_line(&self.report.source_id, line)?;
            self.report.lines_read += 1;

            if let Some(command) = parse_command(&self.report.source_id, index, &line)? {
                self.apply(&command, catalog)?;
            }
        }

        tracing::info!(
            "Processed {} line(s): {} subject(s) added, {} enrollment(s) accepted, {} rejected",
            self.report.lines_read,
            self.report.subjects_added,
            self.report.enrollments_accepted,
            self.report.enrollments_rejected
        );
        Ok(())
    }

    /// 每個指令各自取得一次目錄鎖，不跨指令持有
    fn apply(&mut self, command: &Command, catalog: &Catalog) -> Result<()> {
        match command {
            Command::AddSubject {
                department,
                course_number,
                seat_count,
            } => {
                if catalog.add_subject(department, *course_number, *seat_count)? {
                    self.report.subjects_added += 1;
                }
            }
            Command::EnrollStudent {
                department,
                course_number,
                first_name,
                last_name,
            } => {
                if catalog.enroll_student(department, *course_number, first_name, last_name)? {
                    self.report.enrollments_accepted += 1;
                } else {
                    tracing::debug!(
                        "Enrollment rejected: {} {} -> {} {}",
                        first_name,
                        last_name,
                        department,
                        course_number
                    );
                    self.report.enrollments_rejected += 1;
                }
            }
        }
        Ok(())
    }
}

fn read_line(source_id: &str, line: std::io::Result<String>) -> Result<String> {
    line.map_err(|source| RegistrarError::SourceUnavailable {
        source_id: source_id.to_string(),
        source,
    })
}

fn parse_command(source_id: &str, index: usize, line: &str) -> Result<Option<Command>> {
    parse_line(line).map_err(|source| RegistrarError::MalformedCommand {
        source_id: source_id.to_string(),
        line: index + 1,
        source,
    })
}
