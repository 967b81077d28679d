use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{SweepError, SweepResult};

/// 根目录下的一个直接子条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirectoryEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

/// 清理器依赖的文件系统操作
pub trait TempFs {
    /// 列出 `root` 的直接子条目，顺序由文件系统决定
    fn list(&self, root: &Path) -> SweepResult<Vec<DirectoryEntry>>;

    /// 递归删除一个路径（目录或文件）
    fn remove_all(&self, path: &Path) -> SweepResult<()>;
}

/// 本地文件系统实现
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl TempFs for LocalFs {
    fn list(&self, root: &Path) -> SweepResult<Vec<DirectoryEntry>> {
        let listing_error = |source: io::Error| SweepError::Listing {
            path: root.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(root).map_err(listing_error)? {
            let entry = entry.map_err(listing_error)?;
            // 与 `ReadDir` 语义一致：符号链接不算目录
            let is_dir = entry.file_type().map_err(listing_error)?.is_dir();
            match entry.file_name().into_string() {
                Ok(name) => entries.push(DirectoryEntry { name, is_dir }),
                Err(raw) => warn!("跳过非 UTF-8 文件名: {:?}", raw),
            }
        }

        debug!("{:?} 下共有 {} 个条目", root, entries.len());
        Ok(entries)
    }

    fn remove_all(&self, path: &Path) -> SweepResult<()> {
        if !path.is_absolute() {
            return Err(SweepError::Configuration(format!(
                "not an absolute path: {}",
                path.display()
            )));
        }

        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{:?} 已不存在，视为已删除", path);
                return Ok(());
            }
            Err(e) => return Err(SweepError::from_removal(path.to_path_buf(), e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SweepError::from_removal(path.to_path_buf(), e)),
        }
    }
}
