use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::SweepSummary;
use crate::error::{SweepError, SweepResult};
use crate::estimator::{DuEstimator, SizeEstimator};
use crate::fs::{LocalFs, TempFs};
use crate::rules::RuleSet;

/// 默认扫描的临时目录
pub const DEFAULT_TMP_ROOT: &str = "/tmp";

/// 清理器配置
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub root: PathBuf,
    pub dry_run: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_TMP_ROOT),
            dry_run: false,
        }
    }
}

/// 清理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    Estimating,
    WouldDelete,
    Deleting,
}

/// 清理进度信息
#[derive(Debug, Clone, PartialEq)]
pub struct SweepProgress {
    pub path: PathBuf,
    pub index: usize,
    pub total: usize,
    pub phase: SweepPhase,
}

/// 估算阶段的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeTally {
    pub total_bytes: u64,
    /// 因权限不足未能估算的路径
    pub skipped: Vec<PathBuf>,
}

/// 删除阶段的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletionTally {
    pub deleted: Vec<PathBuf>,
    /// 因权限不足未能删除的路径
    pub skipped: Vec<PathBuf>,
}

/// 临时目录清理器
pub struct Sweeper {
    config: SweepConfig,
    rules: RuleSet,
    estimator: Box<dyn SizeEstimator>,
    fs: Box<dyn TempFs>,
}

impl Sweeper {
    /// 创建新的清理器，默认使用本地文件系统和 du
    pub fn new(config: SweepConfig, rules: RuleSet) -> Self {
        Self {
            config,
            rules,
            estimator: Box::new(DuEstimator::default()),
            fs: Box::new(LocalFs),
        }
    }

    pub fn with_estimator(mut self, estimator: Box<dyn SizeEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_fs(mut self, fs: Box<dyn TempFs>) -> Self {
        self.fs = fs;
        self
    }

    /// 执行完整的清理流程
    pub fn run(&self) -> SweepResult<SweepSummary> {
        self.run_with_progress(|_| {})
    }

    /// 执行完整的清理流程（带进度回调）
    ///
    /// 估算阶段全部完成后才会开始删除，因此汇总的大小反映的是删除前的状态。
    pub fn run_with_progress<F>(&self, progress_callback: F) -> SweepResult<SweepSummary>
    where
        F: Fn(SweepProgress),
    {
        let start_time = Instant::now();

        let candidates = self.collect_candidates()?;
        info!(
            "在 {:?} 下找到 {} 个可清理条目",
            self.config.root,
            candidates.len()
        );

        let sizes = self.estimate_total_with_progress(&candidates, &progress_callback)?;
        let deletions = self.delete_candidates_with_progress(&candidates, &progress_callback)?;

        let summary = SweepSummary {
            total_bytes: sizes.total_bytes,
            candidates: candidates.len(),
            deleted: deletions.deleted,
            skipped_estimates: sizes.skipped,
            skipped_deletions: deletions.skipped,
            dry_run: self.config.dry_run,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "清理完成: 候选 {} 个，删除 {} 个，预计释放 {}，耗时 {}ms",
            summary.candidates,
            summary.deleted.len(),
            summary.format_size(),
            summary.duration_ms
        );

        Ok(summary)
    }

    /// 列出根目录并筛选出可删除的条目，保持列举顺序
    pub fn collect_candidates(&self) -> SweepResult<Vec<PathBuf>> {
        let root = self.resolved_root()?;

        let entries = self.fs.list(&root).inspect_err(|e| {
            error!("无法列出 {:?}: {}", root, e);
        })?;

        let candidates: Vec<PathBuf> = entries
            .iter()
            .filter(|entry| self.rules.is_eligible(entry.is_dir, &entry.name))
            .map(|entry| root.join(&entry.name))
            .collect();

        debug!(
            "{} 个条目中有 {} 个匹配规则",
            entries.len(),
            candidates.len()
        );
        Ok(candidates)
    }

    /// 累加所有候选项的估算大小
    pub fn estimate_total(&self, candidates: &[PathBuf]) -> SweepResult<SizeTally> {
        self.estimate_total_with_progress(candidates, &|_: SweepProgress| {})
    }

    fn estimate_total_with_progress<F>(
        &self,
        candidates: &[PathBuf],
        progress_callback: &F,
    ) -> SweepResult<SizeTally>
    where
        F: Fn(SweepProgress),
    {
        let mut tally = SizeTally::default();

        for (index, path) in candidates.iter().enumerate() {
            progress_callback(SweepProgress {
                path: path.clone(),
                index,
                total: candidates.len(),
                phase: SweepPhase::Estimating,
            });

            match self.estimator.estimate_size(path) {
                Ok(bytes) => {
                    debug!("{:?} 估算大小 {} 字节", path, bytes);
                    tally.total_bytes = tally.total_bytes.saturating_add(bytes);
                }
                Err(e) if e.is_permission_denied() => {
                    warn!("跳过 {:?} 的大小估算: {}", path, e);
                    tally.skipped.push(path.clone());
                }
                Err(e) => {
                    error!("估算 {:?} 大小失败: {}", path, e);
                    return Err(e);
                }
            }
        }

        Ok(tally)
    }

    /// 按顺序删除候选项；dry run 模式下只报告
    pub fn delete_candidates(&self, candidates: &[PathBuf]) -> SweepResult<DeletionTally> {
        self.delete_candidates_with_progress(candidates, &|_: SweepProgress| {})
    }

    fn delete_candidates_with_progress<F>(
        &self,
        candidates: &[PathBuf],
        progress_callback: &F,
    ) -> SweepResult<DeletionTally>
    where
        F: Fn(SweepProgress),
    {
        let mut tally = DeletionTally::default();

        for (index, path) in candidates.iter().enumerate() {
            let phase = if self.config.dry_run {
                SweepPhase::WouldDelete
            } else {
                SweepPhase::Deleting
            };
            progress_callback(SweepProgress {
                path: path.clone(),
                index,
                total: candidates.len(),
                phase,
            });

            if self.config.dry_run {
                info!("DRY RUN: 将删除 {:?}", path);
                continue;
            }

            match self.fs.remove_all(path) {
                Ok(()) => {
                    debug!("已删除 {:?}", path);
                    tally.deleted.push(path.clone());
                }
                Err(e) if e.is_permission_denied() => {
                    warn!("跳过 {:?}: {}", path, e);
                    tally.skipped.push(path.clone());
                }
                Err(e) => {
                    error!("删除 {:?} 失败: {}", path, e);
                    return Err(e);
                }
            }
        }

        Ok(tally)
    }

    /// 校验根目录并转换为绝对路径
    fn resolved_root(&self) -> SweepResult<PathBuf> {
        let root: &Path = &self.config.root;
        if root.as_os_str().is_empty() {
            return Err(SweepError::Configuration(
                "missing required tmp root".to_string(),
            ));
        }

        std::path::absolute(root).map_err(|e| {
            SweepError::Configuration(format!("invalid tmp root {}: {e}", root.display()))
        })
    }
}
