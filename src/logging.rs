//! Log output
//!
//! Every message goes to the console and, unless disabled, to a debug log
//! file. Lines carry no timestamps. The file is written through an
//! unbuffered handle, one write per line, so a crash loses nothing that
//! was already logged.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::{DefaultFields, Format, Full};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Formatting layer for plain-text sinks: no colour, time or target
pub type PlainLayer<S, W> = fmt::Layer<S, DefaultFields, Format<Full, ()>, W>;

/// Build the layer used for the log file, writing to any `MakeWriter`
pub fn plain_layer<S, W>(writer: W) -> PlainLayer<S, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .without_time()
}

/// Default filter directive for a verbosity level
pub fn default_directive(quiet: bool, verbose: u8) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    format!("keyclack={},warn", level)
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `directive`. A log file that cannot be
/// created is reported on the console and skipped.
pub fn init(directive: &str, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let console = fmt::layer().with_target(false).without_time();

    let (file, file_error) = match log_file.map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let file_layer = file.map(|file| plain_layer(Mutex::new(file)));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    if let (Some(path), Some(e)) = (log_file, file_error) {
        tracing::warn!("Cannot write log file {:?}: {}", path, e);
    }
}

/// Create (or truncate) the log file, making its directory if needed
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_logs_info_and_drops_debug() {
        let output = capture::logged(|| {
            tracing::info!("visible line");
            tracing::debug!("hidden line");
        });

        assert!(output.contains("INFO visible line"), "{}", output);
        assert!(!output.contains("hidden line"), "{}", output);
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, 0), "keyclack=info,warn");
        assert_eq!(default_directive(false, 1), "keyclack=debug,warn");
        assert_eq!(default_directive(false, 5), "keyclack=trace,warn");
        assert_eq!(default_directive(true, 2), "keyclack=error,warn");
    }

    #[test]
    fn test_open_log_file_truncates_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keyclack.log");

        open_log_file(&path).unwrap();
        std::fs::write(&path, "old contents\n").unwrap();

        open_log_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
