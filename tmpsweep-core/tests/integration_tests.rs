use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use tmpsweep_core::{
    DeletionTally, RuleSet, RulesConfig, SizeStrategy, SizeTally, SweepConfig, SweepError,
    Sweeper, WalkEstimator,
};

/// 创建一个模拟的临时目录
fn populate_tmp_root(root: &Path) -> Result<()> {
    // 可清理的目录
    let go_build = root.join("go-build-123");
    fs::create_dir_all(go_build.join("ab"))?;
    fs::write(go_build.join("ab").join("obj.a"), "x".repeat(4096))?;

    let consul = root.join("consul-test");
    fs::create_dir_all(&consul)?;
    fs::write(consul.join("raft.db"), "x".repeat(1024))?;

    // 可清理的文件
    fs::write(root.join("snapshot.bin"), "x".repeat(512))?;
    fs::write(root.join("gopls.abc-heap.pb.gz"), "x".repeat(256))?;

    // 需要保留的条目
    let keep = root.join("keepme");
    fs::create_dir_all(&keep)?;
    fs::write(keep.join("important.txt"), "do not delete")?;
    fs::write(root.join("notes.txt"), "keep")?;
    // 文件规则不作用于目录
    fs::create_dir_all(root.join("snapshot-dir-lookalike"))?;

    Ok(())
}

fn sweeper(root: &Path, dry_run: bool) -> Sweeper {
    let config = SweepConfig {
        root: root.to_path_buf(),
        dry_run,
    };
    Sweeper::new(config, RuleSet::default()).with_estimator(Box::new(WalkEstimator))
}

#[test]
fn test_end_to_end_sweep() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    populate_tmp_root(root)?;

    let summary = sweeper(root, false).run()?;

    assert_eq!(summary.candidates, 4);
    assert!(summary.total_bytes >= 4096 + 1024 + 512 + 256);
    assert_eq!(summary.deleted.len(), 4);
    assert!(summary.skipped_deletions.is_empty());

    assert!(!root.join("go-build-123").exists());
    assert!(!root.join("consul-test").exists());
    assert!(!root.join("snapshot.bin").exists());
    assert!(!root.join("gopls.abc-heap.pb.gz").exists());

    assert!(root.join("keepme").join("important.txt").exists());
    assert!(root.join("notes.txt").exists());
    assert!(root.join("snapshot-dir-lookalike").exists());

    Ok(())
}

#[test]
fn test_dry_run_leaves_everything_in_place() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    populate_tmp_root(root)?;

    let dry = sweeper(root, true).run()?;

    assert!(dry.dry_run);
    assert!(dry.deleted.is_empty());
    assert!(root.join("go-build-123").exists());
    assert!(root.join("snapshot.bin").exists());

    // 与真实运行的统计一致
    let live = sweeper(root, false).run()?;
    assert_eq!(dry.candidates, live.candidates);
    assert_eq!(dry.total_bytes, live.total_bytes);
    assert!(!root.join("go-build-123").exists());

    Ok(())
}

#[test]
fn test_second_run_finds_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    populate_tmp_root(root)?;

    sweeper(root, false).run()?;
    let again = sweeper(root, false).run()?;

    assert_eq!(again.candidates, 0);
    assert_eq!(again.describe(), "estimated savings ~0B from 0 directories");
    Ok(())
}

#[test]
fn test_phases_through_public_api() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::write(root.join("snapshot.bin"), "x".repeat(100))?;
    fs::write(root.join("notes.txt"), "keep")?;

    let sweeper = sweeper(root, false);
    let candidates = sweeper.collect_candidates()?;
    assert_eq!(candidates, vec![root.join("snapshot.bin")]);

    let sizes: SizeTally = sweeper.estimate_total(&candidates)?;
    assert_eq!(sizes.total_bytes, 100);
    assert!(sizes.skipped.is_empty());

    let deletions: DeletionTally = sweeper.delete_candidates(&candidates)?;
    assert_eq!(deletions.deleted, candidates);
    assert!(!root.join("snapshot.bin").exists());
    assert!(root.join("notes.txt").exists());
    Ok(())
}

#[test]
fn test_missing_root_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let err = sweeper(&temp_dir.path().join("missing"), false)
        .run()
        .unwrap_err();

    assert!(matches!(err, SweepError::Listing { .. }));
    Ok(())
}

#[test]
fn test_custom_rules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    populate_tmp_root(root)?;
    fs::create_dir_all(root.join("bazel-out"))?;

    let rules = RuleSet::from_config(&RulesConfig {
        dir_prefixes: Some(vec!["bazel-".to_string()]),
        file_prefixes: Some(Vec::new()),
        file_patterns: Some(Vec::new()),
        exact_dir_name: None,
    })?;
    let config = SweepConfig {
        root: root.to_path_buf(),
        dry_run: false,
    };
    let summary = Sweeper::new(config, rules)
        .with_estimator(SizeStrategy::Walk.estimator())
        .run()?;

    // bazel-out 和 consul-test
    assert_eq!(summary.candidates, 2);
    assert!(!root.join("bazel-out").exists());
    assert!(!root.join("consul-test").exists());
    assert!(root.join("go-build-123").exists());
    assert!(root.join("snapshot.bin").exists());
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_end_to_end_with_du() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    populate_tmp_root(root)?;

    let config = SweepConfig {
        root: root.to_path_buf(),
        dry_run: true,
    };
    let summary = Sweeper::new(config, RuleSet::default()).run()?;

    assert_eq!(summary.candidates, 4);
    assert!(summary.total_bytes > 0);
    Ok(())
}
