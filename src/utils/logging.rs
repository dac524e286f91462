use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "daymaker";
const LOG_DIR: &str = "logs";
const KEPT_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "info";

/// How the cli wants its diagnostics. `level` wins over `RUST_LOG`, `console` mirrors the log
/// into stdout on top of the log files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    pub level: Option<LevelFilter>,
    pub console: bool,
}

impl LogOptions {
    /// `--log` turns on everything and echoes it.
    pub fn from_flag(verbose: bool) -> Self {
        Self {
            level: verbose.then_some(LevelFilter::TRACE),
            console: verbose,
        }
    }

    /// Filter directive scoped to this crate, so dependencies stay quiet.
    fn directive(&self, rust_log: Option<String>) -> String {
        let level = self
            .level
            .map(|v| v.to_string().to_lowercase())
            .or(rust_log.filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_LEVEL.into());
        format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
    }
}

/// Installs the global subscriber writing into `<app dir>/logs`, rotated daily.
pub fn enable_logging(app_dir: &Path, options: LogOptions) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(app_dir.join(LOG_DIR))?;

    let console = options.console;
    let stdout = std::io::stdout.with_filter(move |_| console);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            options.directive(std::env::var("RUST_LOG").ok()),
        ))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::LogOptions;

    #[test]
    fn flag_overrides_environment() {
        let options = LogOptions::from_flag(true);
        assert!(options.console);
        assert_eq!(options.directive(Some("warn".into())), "daymaker=trace");
    }

    #[test]
    fn environment_then_default() {
        let quiet = LogOptions::from_flag(false);
        assert!(!quiet.console);
        assert_eq!(quiet.directive(Some("debug".into())), "daymaker=debug");
        assert_eq!(quiet.directive(Some("  ".into())), "daymaker=info");
        assert_eq!(quiet.directive(None), "daymaker=info");

        let pinned = LogOptions {
            level: Some(LevelFilter::WARN),
            console: false,
        };
        assert_eq!(pinned.directive(None), "daymaker=warn");
    }
}
