use std::path::Path;

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start file-based logging under the data directory. The TUI owns the
/// terminal, so nothing may log to stderr; persistence and delivery
/// failures end up here instead. Level comes from `RUST_LOG`, defaulting
/// to info. The returned handle must be kept alive.
pub fn init(log_dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    Logger::try_with_env_or_str("info")
        .context("invalid log specification")?
        .log_to_file(FileSpec::default().directory(log_dir).basename("nudge"))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .append()
        .start()
        .context("failed to start logger")
}
