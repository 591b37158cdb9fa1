use neuron_admin_error::{NAError, NAResult};
use neuron_admin_models::settings::Log;
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};
use tracing::{subscriber::set_global_default, Level};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::DynFilterFn,
    fmt::{self},
    layer::SubscriberExt,
    Layer, Registry,
};

pub struct Logger {
    level: Arc<Mutex<Level>>,
    dir: String,
    file: String,
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    /// Build a logger from the `[log]` settings section.
    ///
    /// An unparsable level falls back to `INFO`.
    pub fn new(settings: &Log) -> Self {
        Logger {
            level: Arc::new(Mutex::new(
                Level::from_str(&settings.level).unwrap_or(Level::INFO),
            )),
            dir: settings.dir.clone(),
            file: settings.file.clone(),
            _file_guard: None,
        }
    }

    #[inline]
    /// Sets the new logging level; takes effect for both console and file output.
    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }

    #[inline]
    pub fn get_level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::INFO)
    }

    /// Installs console and daily rolling file output as the global subscriber.
    ///
    /// The returned guard is kept inside the logger; dropping the logger
    /// flushes and stops the file writer.
    pub fn initialize(&mut self) -> NAResult<()> {
        let file_appender = rolling::daily(&self.dir, &self.file);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        self._file_guard = Some(guard);

        let console_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| {
                level
                    .lock()
                    .map(|l| metadata.level() <= &*l)
                    .unwrap_or(true)
            })
        };

        let file_filter = {
            let level = Arc::clone(&self.level);
            DynFilterFn::new(move |metadata, _| {
                level
                    .lock()
                    .map(|l| metadata.level() <= &*l)
                    .unwrap_or(true)
            })
        };

        let console_layer = {
            #[cfg(debug_assertions)]
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true);

            #[cfg(not(debug_assertions))]
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false);

            layer.with_filter(console_filter)
        };

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(file_filter);

        let subscriber = Registry::default().with(console_layer).with(file_layer);

        set_global_default(subscriber).map_err(|_| NAError::from("Failed to set logger"))?;
        Ok(())
    }
}
