use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Sends `tracing` output to `path` through a background writer, so logging never draws
/// over the terminal. Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_file_logging(path: &Path) -> WorkerGuard {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .map(|f| f.to_os_string())
        .unwrap_or_else(|| "mazegen.log".into());

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let _ = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
    guard
}
