use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SweepError, SweepResult};

/// 内置的目录前缀
pub const DEFAULT_DIR_PREFIXES: &[&str] = &[
    "007-agent",
    "agent_smith",
    "go-build",
    "jones-agent",
    "Test",
    "test-agent",
    "test-consul-agent",
    "consul",
    "Agent1-agent",
    "Agent2-agent",
    "betty-agent",
    "bob-agent",
    "bonnie-agent",
    "dc1-agent",
    "dc2-agent",
    "gopls-",
    "dc1-consul",
    "dc2-consul",
    "test-container",
];

/// 内置的文件前缀
pub const DEFAULT_FILE_PREFIXES: &[&str] = &["snapshot", "config-err-"];

/// 内置的文件名正则（整名匹配）
pub const DEFAULT_FILE_PATTERNS: &[&str] = &[
    r"^go\..*\.(sum|mod)$",
    r"^gopls\..*-heap.pb.gz$",
    r"^gopls\..*-goroutines.txt$",
    r"^gopls-.*.log$",
    r"^gopls\..*\.zip$",
];

/// 无论前缀如何都要删除的顶层目录
pub const DEFAULT_EXACT_DIR_NAME: &str = "consul-test";

/// 用户可配置的规则（来自配置文件的 `[rules]` 表）
///
/// 每个出现的字段都会整体替换对应的内置列表。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub dir_prefixes: Option<Vec<String>>,
    pub file_prefixes: Option<Vec<String>>,
    pub file_patterns: Option<Vec<String>>,
    pub exact_dir_name: Option<String>,
}

/// 不可变的匹配规则集合
#[derive(Debug, Clone)]
pub struct RuleSet {
    dir_prefixes: Vec<String>,
    file_prefixes: Vec<String>,
    file_patterns: Vec<Regex>,
    exact_dir_name: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
            .unwrap_or_else(|e| unreachable!("built-in patterns must compile: {e}"))
    }
}

impl RuleSet {
    /// 用给定的列表构建规则集
    pub fn new<S: AsRef<str>>(
        dir_prefixes: &[S],
        file_prefixes: &[S],
        file_patterns: &[S],
        exact_dir_name: &str,
    ) -> SweepResult<Self> {
        let file_patterns = file_patterns
            .iter()
            .map(|p| compile_anchored(p.as_ref()))
            .collect::<SweepResult<Vec<_>>>()?;

        Ok(Self {
            dir_prefixes: to_owned_list(dir_prefixes),
            file_prefixes: to_owned_list(file_prefixes),
            file_patterns,
            exact_dir_name: exact_dir_name.to_string(),
        })
    }

    /// 内置规则叠加配置文件中的覆盖项
    pub fn from_config(config: &RulesConfig) -> SweepResult<Self> {
        let dir_prefixes = config
            .dir_prefixes
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_DIR_PREFIXES));
        let file_prefixes = config
            .file_prefixes
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_FILE_PREFIXES));
        let file_patterns = config
            .file_patterns
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_FILE_PATTERNS));
        let exact_dir_name = config
            .exact_dir_name
            .as_deref()
            .unwrap_or(DEFAULT_EXACT_DIR_NAME);

        Self::new(&dir_prefixes, &file_prefixes, &file_patterns, exact_dir_name)
    }

    /// 判断一个顶层条目是否可以删除
    ///
    /// 目录只看目录规则，文件只看文件规则，各规则之间是“或”的关系。
    pub fn is_eligible(&self, is_dir: bool, name: &str) -> bool {
        let eligible = if is_dir {
            name == self.exact_dir_name
                || self
                    .dir_prefixes
                    .iter()
                    .any(|prefix| name.starts_with(prefix.as_str()))
        } else {
            self.file_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
                || self.file_patterns.iter().any(|re| re.is_match(name))
        };

        if eligible {
            debug!("匹配到可清理条目: {} (dir={})", name, is_dir);
        }
        eligible
    }

    pub fn dir_prefixes(&self) -> &[String] {
        &self.dir_prefixes
    }

    pub fn file_prefixes(&self) -> &[String] {
        &self.file_prefixes
    }

    pub fn file_patterns(&self) -> impl Iterator<Item = &str> {
        self.file_patterns.iter().map(Regex::as_str)
    }

    pub fn exact_dir_name(&self) -> &str {
        &self.exact_dir_name
    }
}

fn to_owned_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

/// 统一包一层锚点，保证整名匹配
fn compile_anchored(pattern: &str) -> SweepResult<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
        SweepError::Configuration(format!("invalid file pattern {pattern:?}: {e}"))
    })
}
