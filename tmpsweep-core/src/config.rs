use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{SweepError, SweepResult};
use crate::estimator::SizeStrategy;
use crate::rules::RulesConfig;

/// 配置文件内容
///
/// ```toml
/// tmp_root = "/var/tmp"
/// dry_run = true
/// estimator = "walk"
///
/// [rules]
/// dir_prefixes = ["go-build", "bazel-"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepSettings {
    pub tmp_root: Option<PathBuf>,
    pub dry_run: Option<bool>,
    pub estimator: Option<SizeStrategy>,
    pub rules: RulesConfig,
}

impl SweepSettings {
    pub fn from_toml_str(content: &str) -> SweepResult<Self> {
        toml::from_str(content)
            .map_err(|e| SweepError::Configuration(format!("invalid settings: {e}")))
    }

    /// 从文件加载设置
    pub fn load_from_file(path: &Path) -> SweepResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SweepError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let settings = Self::from_toml_str(&content)?;
        info!("已加载配置文件: {:?}", path);
        Ok(settings)
    }
}
