use clap::Parser;
use course_registrar::core::ConfigProvider;
use course_registrar::utils::{logger, validation::Validate};
use course_registrar::{BatchProcessor, BatchReport, Catalog, CatalogSnapshot, CliConfig, FileSource};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a BatchReport,
    catalog: CatalogSnapshot,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌；JSON 模式下日誌寫到 stderr，stdout 只留結果
    if config.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting course-registrar");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let catalog = Arc::new(Catalog::new(config.max_courses_per_student()));
    let processor = BatchProcessor::new(Arc::clone(&catalog), FileSource::new(config.base_path()));

    let report = processor.run(config.sources().iter().cloned()).await;
    let snapshot = catalog.snapshot();

    if config.json {
        let output = JsonOutput {
            report: &report,
            catalog: snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&report, &snapshot);
    }

    Ok(())
}

fn print_summary(report: &BatchReport, snapshot: &CatalogSnapshot) {
    println!("✅ Processed {} source(s) in {} ms", report.workers.len(), report.elapsed().num_milliseconds());
    for worker in &report.workers {
        match &worker.error {
            None => println!(
                "  ✓ {}: {} line(s), {} accepted, {} rejected",
                worker.source_id, worker.lines_read, worker.enrollments_accepted, worker.enrollments_rejected
            ),
            Some(error) => println!("  ✗ {}: {}", worker.source_id, error),
        }
    }

    println!("📚 {} subject(s), {} student(s)", snapshot.subjects.len(), snapshot.learners.len());
    for subject in &snapshot.subjects {
        println!(
            "  {} {}: {}/{} seats taken",
            subject.department,
            subject.course_number,
            subject.enrolled.len(),
            subject.total_seats
        );
    }
}
