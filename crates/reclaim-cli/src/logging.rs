//! Subscriber setup: console output plus optional timestamped log files.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Console level for a `-v` count.
fn console_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` drives the console only when no `-v` flag is given. With a
/// `log_dir`, every event from DEBUG up goes to `<stamp>-debug.log` and
/// errors also go to `<stamp>-error.log`.
pub fn init(verbose: u8, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let fallback = || EnvFilter::new(console_level(verbose).as_str());
    let console_filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (debug_file, error_file) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let debug = File::create(dir.join(format!("{stamp}-debug.log")))?;
            let error = File::create(dir.join(format!("{stamp}-error.log")))?;

            (
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(debug))
                        .with_filter(LevelFilter::DEBUG),
                ),
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(error))
                        .with_filter(LevelFilter::ERROR),
                ),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(debug_file)
        .with(error_file)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_level_from_verbosity() {
        assert_eq!(console_level(0), Level::WARN);
        assert_eq!(console_level(1), Level::INFO);
        assert_eq!(console_level(2), Level::DEBUG);
        assert_eq!(console_level(9), Level::TRACE);
    }
}
