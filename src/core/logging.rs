//! Logging setup.
//!
//! Library code logs through the `log` macros; these functions install a
//! `tracing` subscriber and bridge `log` records into it.
//!
//! - [`init_tui`]: JSON lines to a daily rolling file only. The TUI owns the
//!   terminal, so nothing is written to stdout.
//! - [`init_stdout`]: pretty stdout output for the non-interactive commands.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Base name of the rolling log file.
pub const LOG_FILE_PREFIX: &str = "novel-refiner.log";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn install_log_bridge() {
    // tracing-subscriber's `init` usually installs the bridge already.
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("log bridge already installed: {e}");
    }
}

/// Initialize file logging for TUI mode.
///
/// Logs go to `<log_dir>/novel-refiner.log.<date>`. The returned guard must
/// be held until shutdown so buffered lines are flushed.
pub fn init_tui(log_dir: &Path, default_level: &str) -> WorkerGuard {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter(default_level));

    tracing_subscriber::registry().with(file_layer).init();
    install_log_bridge();

    let dir = log_dir.to_path_buf();
    std::thread::spawn(move || compress_old_logs(&dir));

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

/// Initialize human-readable logging on stdout.
pub fn init_stdout(default_level: &str) {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .pretty()
        .with_filter(env_filter(default_level));

    tracing_subscriber::registry().with(stdout_layer).init();
    install_log_bridge();
}

/// Whether a file in the log directory is a rolled log that should be gzipped.
///
/// Today's file is still being written and is left alone, as are files
/// that are already compressed.
pub fn should_compress(file_name: &str, today_suffix: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| !date.is_empty() && date != today_suffix && !date.ends_with(".gz"))
}

/// Gzip every rolled log except today's.
pub fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(Some(gz)) => log::info!("Compressed old log: {:?}", gz),
            Ok(None) => {}
            Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

/// Compress `path` to `path.gz` and remove the original.
///
/// Returns `None` when the `.gz` already exists.
fn compress_file(path: &Path) -> io::Result<Option<PathBuf>> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);

    if gz_path.exists() {
        return Ok(None);
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(Some(gz_path))
}
