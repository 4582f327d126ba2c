use std::path::Path;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber. With a log file, output goes to both
/// stdout (ANSI) and the file (plain).
pub fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("circlefund-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init();
    }
}
