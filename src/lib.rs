//! # tmpsweep
//!
//! Sweep disposable build and test artifacts out of a temp directory.
//!
//! Only the direct children of the temp root are considered. A directory is
//! removed when its name starts with one of the known artifact prefixes
//! (`go-build`, `consul`, `test-agent`, ...); a file is removed when its name
//! starts with a known prefix (`snapshot`, `config-err-`) or fully matches
//! one of the file patterns (`go.*.sum`, `gopls.*-heap.pb.gz`, ...).
//!
//! ## Usage
//!
//! ### Command Line
//!
//! ```bash
//! # Show what would be removed from /tmp
//! tmpsweep --dry-run
//!
//! # Sweep another directory, estimating sizes without GNU du
//! tmpsweep --tmp-root /var/tmp --estimator walk
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use tmpsweep_core::{RuleSet, SweepConfig, Sweeper, WalkEstimator};
//!
//! let temp_dir = tempfile::TempDir::new()?;
//! std::fs::create_dir(temp_dir.path().join("go-build123"))?;
//!
//! let config = SweepConfig {
//!     root: temp_dir.path().to_path_buf(),
//!     dry_run: true,
//! };
//! let sweeper = Sweeper::new(config, RuleSet::default())
//!     .with_estimator(Box::new(WalkEstimator));
//! let summary = sweeper.run()?;
//! assert_eq!(summary.candidates, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export core functionality
pub use tmpsweep_core::*;

pub use tmpsweep_cli::run_cli;
