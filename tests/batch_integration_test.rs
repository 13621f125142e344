use course_registrar::{BatchProcessor, Catalog, FileSource, MemorySource, TomlConfig, WorkerStatus};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_end_to_end_with_files() {
    let temp_dir = TempDir::new().unwrap();
    write_source(
        &temp_dir,
        "subjects.txt",
        "addsubject CS 101 2\naddsubject MATH 200 10\n",
    );
    write_source(
        &temp_dir,
        "students.txt",
        "enrollstudent MATH 200 Ada Lovelace\nENROLLSTUDENT math 200 Alan Turing\n",
    );

    let catalog = Arc::new(Catalog::new(3));
    let processor = BatchProcessor::new(Arc::clone(&catalog), FileSource::new(temp_dir.path()));

    let report = processor.run(["subjects.txt", "students.txt"]).await;

    assert_eq!(report.workers.len(), 2);
    assert!(report.workers.iter().all(|w| w.status == WorkerStatus::Finished));
    assert!(report.failed_workers().next().is_none());
    assert_eq!(catalog.count_subjects(), 2);
    // 兩個來源之間沒有順序保證，MATH 200 可能在選課時尚未建立
    assert!(catalog.count_students_in_subject("MATH", 200) <= 1);
    assert_eq!(catalog.count_students_in_subject("math", 200), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_student_from_two_sources_enrolls_once() {
    let source = MemorySource::new()
        .with_script("a.txt", "enrollstudent CS 101 John Doe\n")
        .with_script("b.txt", "enrollstudent CS 101 John Doe\n");
    let catalog = Arc::new(Catalog::new(3));
    catalog.add_subject("CS", 101, 30).unwrap();
    let processor = BatchProcessor::new(Arc::clone(&catalog), source);

    let report = processor.run(["a.txt", "b.txt"]).await;

    assert_eq!(report.total_enrollments_accepted(), 1);
    assert_eq!(report.total_enrollments_rejected(), 1);
    assert_eq!(catalog.count_students_in_subject("CS", 101), 1);
    assert_eq!(catalog.learner_course_count("John", "Doe"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_many_sources_never_overfill() {
    let source = MemorySource::new();
    let mut ids = Vec::new();
    for worker in 0..12 {
        let mut script = String::from("addsubject HIST 210 7\n");
        for n in 0..25 {
            script.push_str(&format!("enrollstudent HIST 210 W{}N{} Student\n", worker, n));
        }
        let id = format!("batch{}.txt", worker);
        source.insert(id.clone(), script);
        ids.push(id);
    }

    let catalog = Arc::new(Catalog::new(1));
    let processor = BatchProcessor::new(Arc::clone(&catalog), source);
    let report = processor.run(ids).await;

    assert_eq!(report.total_enrollments_accepted(), 7);
    assert_eq!(report.total_enrollments_rejected(), 12 * 25 - 7);
    assert_eq!(catalog.count_students_in_subject("HIST", 210), 7);
    assert_eq!(report.workers.iter().map(|w| w.subjects_added).sum::<usize>(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unreadable_source_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    write_source(&temp_dir, "ok.txt", "addsubject CS 101 5\nenrollstudent CS 101 Jane Roe\n");

    let catalog = Arc::new(Catalog::new(3));
    let processor = BatchProcessor::new(Arc::clone(&catalog), FileSource::new(temp_dir.path()));

    let report = processor.run(["ghost.txt", "ok.txt"]).await;

    let failed: Vec<_> = report.failed_workers().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].source_id, "ghost.txt");
    assert_eq!(failed[0].lines_read, 0);
    assert!(catalog.is_student_enrolled("CS", 101, "Jane", "Roe"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_toml_config_drives_batch() {
    let temp_dir = TempDir::new().unwrap();
    write_source(&temp_dir, "one.txt", "enrollstudent CS 101 A B\nenrollstudent MATH 200 A B\n");
    write_source(&temp_dir, "two.txt", "enrollstudent CS 101 C D\n");

    let base_path = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let toml_content = format!(
        r#"
[registrar]
max_courses = 1

[batch]
base_path = "{}"
sources = ["one.txt", "two.txt"]

[[subjects]]
department = "CS"
course_number = 101
seats = 2

[[subjects]]
department = "MATH"
course_number = 200
seats = 2
"#,
        base_path
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let (catalog, seeded) = config.build_catalog().unwrap();
    assert_eq!(seeded, 2);

    let processor = BatchProcessor::new(Arc::new(catalog), FileSource::new(&config.batch.base_path));
    let report = processor.run(config.batch.sources.clone()).await;

    assert_eq!(report.total_enrollments_accepted(), 2);
    assert_eq!(report.total_enrollments_rejected(), 1);
    assert!(processor.catalog().is_student_enrolled("CS", 101, "A", "B"));
    assert!(!processor.catalog().is_student_enrolled("MATH", 200, "A", "B"));
    assert!(processor.catalog().is_student_enrolled("CS", 101, "C", "D"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_report_serializes_to_json() {
    let source = MemorySource::new().with_script("a.txt", "addsubject CS 101 1\n");
    let processor = BatchProcessor::new(Arc::new(Catalog::new(3)), source);

    let report = processor.run(["a.txt"]).await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["workers"][0]["source_id"], "a.txt");
    assert_eq!(json["workers"][0]["status"], "finished");
    assert_eq!(json["workers"][0]["subjects_added"], 1);

    let snapshot = serde_json::to_value(processor.catalog().snapshot()).unwrap();
    assert_eq!(snapshot["subjects"][0]["department"], "CS");
}
