use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tmpsweep_core::{RuleSet, SweepConfig, SweepPhase, SweepProgress, Sweeper, WalkEstimator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 创建一个模拟的 /tmp
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("go-build4242").join("b001"))?;
    fs::write(root.join("go-build4242").join("b001").join("_pkg_.a"), "x".repeat(2048))?;
    fs::write(root.join("snapshot-7.db"), "x".repeat(512))?;
    fs::write(root.join("gopls.99-goroutines.txt"), "goroutine 1")?;
    fs::create_dir_all(root.join("keepme"))?;

    let config = SweepConfig {
        root: root.to_path_buf(),
        dry_run: false,
    };
    let sweeper = Sweeper::new(config, RuleSet::default()).with_estimator(Box::new(WalkEstimator));

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = Arc::clone(&events);
    let summary = sweeper.run_with_progress(move |progress: SweepProgress| {
        println!(
            "[{}/{}] {:?}: {}",
            progress.index + 1,
            progress.total,
            progress.phase,
            progress.path.display()
        );
        if let Ok(mut events) = events_clone.lock() {
            events.push(progress.phase);
        }
    })?;

    let deletions = events
        .lock()
        .map(|events| events.iter().filter(|p| **p == SweepPhase::Deleting).count())
        .unwrap_or(0);

    println!("{}", summary.describe());
    println!("deleted {deletions} entries, keepme still there: {}", root.join("keepme").exists());
    Ok(())
}
