use clap::Parser;
use course_registrar::core::ConfigProvider;
use course_registrar::utils::{logger, validation::Validate};
use course_registrar::{BatchProcessor, FileSource, TomlConfig};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "toml-registrar")]
#[command(about = "Course registration driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "registrar.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override max courses per student from config
    #[arg(long)]
    max_courses: Option<u32>,

    /// Dry run - parse every source without touching the catalog
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based registrar");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(max_courses) = args.max_courses {
        config.registrar.max_courses = max_courses;
        tracing::info!("🔧 max_courses overridden to: {}", max_courses);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let (catalog, seeded) = config.build_catalog()?;
    tracing::info!(
        "✅ Catalog ready: {} seeded subject(s), max {} course(s) per student",
        seeded,
        catalog.max_courses_per_student()
    );

    let processor = BatchProcessor::new(Arc::new(catalog), FileSource::new(config.base_path()));

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No registrations will be applied");
        let mut failures = 0;
        for source_id in config.sources() {
            match processor.scan(source_id) {
                Ok(commands) => println!("  ✓ {}: {} command(s)", source_id, commands.len()),
                Err(e) => {
                    failures += 1;
                    println!("  ✗ {}: {}", source_id, e.user_friendly_message());
                }
            }
        }
        if failures > 0 {
            std::process::exit(2);
        }
        return Ok(());
    }

    let report = processor.run(config.sources().iter().cloned()).await;

    for worker in report.failed_workers() {
        eprintln!(
            "⚠️ {} stopped early: {}",
            worker.source_id,
            worker.error.as_deref().unwrap_or("unknown error")
        );
    }
    println!(
        "✅ {} enrollment(s) accepted, {} rejected, {} subject(s) in catalog",
        report.total_enrollments_accepted(),
        report.total_enrollments_rejected(),
        processor.catalog().count_subjects()
    );

    Ok(())
}
