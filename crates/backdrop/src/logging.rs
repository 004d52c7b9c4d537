//! File logging. The terminal belongs to the UI, so events go to a log file
//! under the platform data directory.
//!
//! The subscriber is installed before the config file is read so that
//! loading is logged too. Its filter is swapped once the configured level
//! is known.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

pub const LOG_FILE: &str = "backdrop.log";

/// Level used until the config file has been read.
pub const DEFAULT_LEVEL: &str = "info";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// The installed subscriber.
pub struct Logging {
    /// `None` when `RUST_LOG` chose the filter.
    filter: Option<FilterHandle>,
}

impl Logging {
    /// Switch to `level` unless `RUST_LOG` is in charge.
    pub fn set_level(&self, level: &str) -> Result<()> {
        if let Some(filter) = &self.filter {
            filter
                .reload(EnvFilter::new(level))
                .wrap_err("failed to change log level")?;
            tracing::debug!(level, "log level set from config");
        }
        Ok(())
    }
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> (impl Subscriber + Send + Sync, FilterHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false));
    (subscriber, handle)
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
///
/// Returns `None` when the platform has no data directory and logging
/// stays off.
pub fn init(level: &str) -> Result<Option<Logging>> {
    let Some(dir) = backdrop_config::log_dir() else {
        return Ok(None);
    };
    fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(level), false),
    };
    let (subscriber, handle) = subscriber(filter, Mutex::new(file));
    subscriber
        .try_init()
        .wrap_err("failed to install log subscriber")?;
    tracing::debug!(path = %path.display(), "logging started");
    Ok(Some(Logging {
        filter: (!from_env).then_some(handle),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_events_before_config_are_kept_and_level_follows_config() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let (subscriber, handle) = subscriber(EnvFilter::new(DEFAULT_LEVEL), move || writer.clone());
        let logging = Logging {
            filter: Some(handle),
        };
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("reading config file");
            logging.set_level("warn").unwrap();
            tracing::info!("dropped after reload");
            tracing::warn!("kept after reload");
        });
        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("reading config file"));
        assert!(!text.contains("dropped after reload"));
        assert!(text.contains("kept after reload"));
    }

    #[test]
    fn test_env_controlled_filter_is_left_alone() {
        let logging = Logging { filter: None };
        assert!(logging.set_level("trace").is_ok());
    }
}
