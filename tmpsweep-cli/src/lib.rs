use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use tmpsweep_core::{
    RuleSet, SizeStrategy, SweepConfig, SweepPhase, SweepProgress, SweepSettings, SweepSummary,
    Sweeper, sweeper::DEFAULT_TMP_ROOT,
};

#[derive(Parser, Debug)]
#[command(name = "tmpsweep")]
#[command(about = "Sweep disposable build and test artifacts out of a temp directory")]
#[command(version)]
pub struct Cli {
    /// Root of your temp directory [default: /tmp]
    #[arg(long)]
    pub tmp_root: Option<String>,

    /// Don't delete anything, only report what would be deleted
    #[arg(short = 'n', long, overrides_with = "no_dry_run")]
    pub dry_run: bool,

    /// Delete even if the settings file enables dry run
    #[arg(long, overrides_with = "dry_run")]
    pub no_dry_run: bool,

    /// Settings file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How to estimate the size of each candidate
    #[arg(long, value_enum)]
    pub estimator: Option<EstimatorArg>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum EstimatorArg {
    /// Use `du -s --block-size=1`
    #[value(name = "du")]
    Du,
    /// Walk the tree and sum file sizes
    #[value(name = "walk")]
    Walk,
}

impl From<EstimatorArg> for SizeStrategy {
    fn from(arg: EstimatorArg) -> Self {
        match arg {
            EstimatorArg::Du => SizeStrategy::Du,
            EstimatorArg::Walk => SizeStrategy::Walk,
        }
    }
}

/// 命令行参数与配置文件合并后的最终设置
#[derive(Debug)]
struct ResolvedSettings {
    config: SweepConfig,
    strategy: SizeStrategy,
    rules: RuleSet,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("tmpsweep_core={log_level},tmpsweep_cli={log_level}"))
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(cli.config.as_ref())?;
    let resolved = resolve_settings(&cli, settings)?;

    let sweeper = Sweeper::new(resolved.config, resolved.rules)
        .with_estimator(resolved.strategy.estimator());
    let summary = sweeper.run_with_progress(print_progress)?;

    display_summary(&summary);
    Ok(())
}

/// 显式指定的配置文件必须可读；否则尝试默认位置
fn load_settings(explicit: Option<&PathBuf>) -> Result<SweepSettings> {
    if let Some(path) = explicit {
        return SweepSettings::load_from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.is_file() => SweepSettings::load_from_file(&path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        _ => {
            tracing::debug!("使用默认配置");
            Ok(SweepSettings::default())
        }
    }
}

/// 获取配置文件路径
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tmpsweep").join("config.toml"))
}

/// 命令行优先，其次配置文件，最后是内置默认值
fn resolve_settings(cli: &Cli, settings: SweepSettings) -> Result<ResolvedSettings> {
    let root = match &cli.tmp_root {
        Some(root) => PathBuf::from(root),
        None => settings
            .tmp_root
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TMP_ROOT)),
    };
    let dry_run = if cli.dry_run {
        true
    } else if cli.no_dry_run {
        false
    } else {
        settings.dry_run.unwrap_or(false)
    };
    let strategy = cli
        .estimator
        .map(SizeStrategy::from)
        .or(settings.estimator)
        .unwrap_or_default();
    let rules = RuleSet::from_config(&settings.rules)?;

    Ok(ResolvedSettings {
        config: SweepConfig { root, dry_run },
        strategy,
        rules,
    })
}

fn print_progress(progress: SweepProgress) {
    match progress.phase {
        SweepPhase::Estimating => {}
        SweepPhase::WouldDelete => println!("DRY-RUN: deleting {}", progress.path.display()),
        SweepPhase::Deleting => println!("deleting {}", progress.path.display()),
    }
}

fn display_summary(summary: &SweepSummary) {
    for path in &summary.skipped_estimates {
        println!("WARN: could not estimate size of {}", path.display());
    }
    for path in &summary.skipped_deletions {
        println!("WARN: could not delete {}", path.display());
    }
    println!("{}", summary.describe());
}
