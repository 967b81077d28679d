use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 清理过程中可能出现的错误
#[derive(Debug, Error)]
pub enum SweepError {
    /// 缺失或无效的配置（例如空的根目录、无法编译的正则）
    #[error("{0}")]
    Configuration(String),

    /// 传给大小估算器的路径为空
    #[error("missing directory name")]
    InvalidArgument,

    /// 无法列出根目录，属于致命错误
    #[error("failed to list {}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 权限不足，单个候选项跳过即可
    #[error("permission denied: {}: {detail}", path.display())]
    PermissionDenied { path: PathBuf, detail: String },

    /// 外部大小估算工具运行失败
    #[error("{} failed for {}: {status}: {stderr}", program, path.display())]
    Execution {
        program: String,
        path: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("unrecognized du output: {0}")]
    UnparseableOutput(String),

    /// 删除失败（非权限原因）
    #[error("failed to delete {}", path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type SweepResult<T> = std::result::Result<T, SweepError>;

impl SweepError {
    /// 是否属于可跳过的权限错误
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, SweepError::PermissionDenied { .. })
    }

    /// 将删除时的 I/O 错误按类型归类
    pub(crate) fn from_removal(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            SweepError::PermissionDenied {
                path,
                detail: source.to_string(),
            }
        } else {
            SweepError::Deletion { path, source }
        }
    }
}

/// 外部工具只能通过 stderr 文本报告权限问题
pub(crate) fn mentions_permission_denied(text: &str) -> bool {
    text.to_lowercase().contains("permission denied")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_error_classification() {
        let denied = SweepError::from_removal(
            PathBuf::from("/tmp/go-build1"),
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(denied.is_permission_denied());

        let busy = SweepError::from_removal(
            PathBuf::from("/tmp/go-build1"),
            io::Error::other("device busy"),
        );
        assert!(!busy.is_permission_denied());
        assert!(matches!(busy, SweepError::Deletion { .. }));
    }

    #[test]
    fn test_mentions_permission_denied() {
        assert!(mentions_permission_denied(
            "du: cannot read directory '/tmp/x': Permission denied"
        ));
        assert!(mentions_permission_denied("PERMISSION DENIED"));
        assert!(!mentions_permission_denied("No such file or directory"));
    }

    #[test]
    fn test_io_cause_reported_once() {
        let err = SweepError::Listing {
            path: PathBuf::from("/tmp/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(err.to_string(), "failed to list /tmp/missing");

        let chained = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(
            chained,
            "failed to list /tmp/missing: No such file or directory"
        );

        let err = SweepError::Deletion {
            path: PathBuf::from("/tmp/go-build1"),
            source: io::Error::other("resource busy"),
        };
        let chained = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chained.matches("resource busy").count(), 1);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SweepError::InvalidArgument.to_string(),
            "missing directory name"
        );
        assert_eq!(
            SweepError::UnparseableOutput("garbage".to_string()).to_string(),
            "unrecognized du output: garbage"
        );
    }
}
