use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod estimator;
pub mod fs;
pub mod rules;
pub mod sweeper;

pub use config::SweepSettings;
pub use error::{SweepError, SweepResult};
pub use estimator::{DuEstimator, SizeEstimator, SizeStrategy, WalkEstimator};
pub use fs::{DirectoryEntry, LocalFs, TempFs};
pub use rules::{RuleSet, RulesConfig};
pub use sweeper::{DeletionTally, SizeTally, SweepConfig, SweepPhase, SweepProgress, Sweeper};

/// 一次清理的结果统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// 删除前估算的总字节数（权限不足的候选项按 0 计）
    pub total_bytes: u64,
    /// 匹配到的候选项数量，包括被跳过的
    pub candidates: usize,
    pub deleted: Vec<PathBuf>,
    pub skipped_estimates: Vec<PathBuf>,
    pub skipped_deletions: Vec<PathBuf>,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl SweepSummary {
    pub fn format_size(&self) -> String {
        humanize_bytes(self.total_bytes)
    }

    /// 一行人类可读的汇总
    pub fn describe(&self) -> String {
        format!(
            "estimated savings ~{} from {} directories",
            self.format_size(),
            self.candidates
        )
    }
}

/// 格式化字节大小为人类可读格式
///
/// 每级整除 1024，不保留小数，最大单位为 T。
pub fn humanize_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "K", "M", "G", "T"];
    let mut value = bytes;
    let mut unit_index = 0;

    while value >= 1024 && unit_index < UNITS.len() - 1 {
        value /= 1024;
        unit_index += 1;
    }

    format!("{}{}", value, UNITS[unit_index])
}
