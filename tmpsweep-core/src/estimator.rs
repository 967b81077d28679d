use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{SweepError, SweepResult, mentions_permission_denied};

/// 估算一个路径（及其子树）占用的字节数
pub trait SizeEstimator {
    fn estimate_size(&self, path: &Path) -> SweepResult<u64>;
}

/// 大小估算策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeStrategy {
    /// 调用外部 `du` 命令
    #[default]
    Du,
    /// 用 walkdir 自行累加文件大小
    Walk,
}

impl SizeStrategy {
    pub fn estimator(self) -> Box<dyn SizeEstimator> {
        match self {
            SizeStrategy::Du => Box::new(DuEstimator::default()),
            SizeStrategy::Walk => Box::new(WalkEstimator),
        }
    }
}

/// 基于 `du -s --block-size=1` 的估算器
#[derive(Debug, Clone)]
pub struct DuEstimator {
    program: String,
}

impl Default for DuEstimator {
    fn default() -> Self {
        Self {
            program: "du".to_string(),
        }
    }
}

impl DuEstimator {
    /// 使用指定的 du 可执行文件
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SizeEstimator for DuEstimator {
    fn estimate_size(&self, path: &Path) -> SweepResult<u64> {
        if path.as_os_str().is_empty() {
            return Err(SweepError::InvalidArgument);
        }

        debug!("执行 {} -s --block-size=1 {:?}", self.program, path);

        let output = Command::new(&self.program)
            .arg("-s")
            .arg("--block-size=1")
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::PermissionDenied {
                    SweepError::PermissionDenied {
                        path: path.to_path_buf(),
                        detail: e.to_string(),
                    }
                } else {
                    SweepError::Execution {
                        program: self.program.clone(),
                        path: path.to_path_buf(),
                        status: e.to_string(),
                        stderr: String::new(),
                    }
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if mentions_permission_denied(&stderr) {
                return Err(SweepError::PermissionDenied {
                    path: path.to_path_buf(),
                    detail: stderr,
                });
            }
            return Err(SweepError::Execution {
                program: self.program.clone(),
                path: path.to_path_buf(),
                status: output.status.to_string(),
                stderr,
            });
        }

        parse_du_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// 解析 du 的输出：开头必须是十进制整数，后面跟空白
pub fn parse_du_output(output: &str) -> SweepResult<u64> {
    let digits_end = output
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(output.len());
    let (digits, rest) = output.split_at(digits_end);

    let followed_by_whitespace = rest.chars().next().is_some_and(char::is_whitespace);
    if digits.is_empty() || !followed_by_whitespace {
        return Err(SweepError::UnparseableOutput(output.to_string()));
    }

    digits
        .parse::<u64>()
        .map_err(|_| SweepError::UnparseableOutput(output.to_string()))
}

/// 纯 Rust 的估算器，适用于没有 GNU du 的系统
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkEstimator;

impl SizeEstimator for WalkEstimator {
    fn estimate_size(&self, path: &Path) -> SweepResult<u64> {
        if path.as_os_str().is_empty() {
            return Err(SweepError::InvalidArgument);
        }

        let mut total: u64 = 0;
        // 顶层符号链接只删除链接本身，不统计目标
        for entry in WalkDir::new(path)
            .follow_links(false)
            .follow_root_links(false)
        {
            let entry = entry.map_err(|e| walk_error(path, e))?;
            let metadata = entry.metadata().map_err(|e| walk_error(path, e))?;
            total = total.saturating_add(metadata.len());
        }

        debug!("walk 估算 {:?}: {} 字节", path, total);
        Ok(total)
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> SweepError {
    let at = err.path().unwrap_or(root).to_path_buf();
    let denied = err
        .io_error()
        .is_some_and(|io| io.kind() == io::ErrorKind::PermissionDenied);

    if denied {
        SweepError::PermissionDenied {
            path: at,
            detail: err.to_string(),
        }
    } else {
        SweepError::Execution {
            program: "walk".to_string(),
            path: at,
            status: "error".to_string(),
            stderr: err.to_string(),
        }
    }
}
