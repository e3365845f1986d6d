//! Rolling Logger
//!
//! Writes formatted log lines to one file per day (`<app>_<YYYY-MM-DD>.log`)
//! and keeps the most recent lines in a circular buffer so the application
//! can show them without reading the files back.
//!
//! Records emitted through the `log` facade are bridged into the same
//! subscriber, so library code can keep using `log::info!` and friends.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::NaiveDate;
use tracing_subscriber::fmt::MakeWriter;

pub use tracing::level_filters::LevelFilter;

/// Default number of daily files kept on disk
pub const DEFAULT_MAX_FILES: usize = 7;
/// Default number of lines kept in memory
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<RollingFile> = OnceLock::new();

/// Logger errors
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("log io error: {0}")]
    Io(#[from] io::Error),
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
    #[error("logger not initialized")]
    NotInitialized,
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub dir: PathBuf,
    pub app_name: String,
    pub max_files: usize,
    pub buffer_lines: usize,
    pub level: LevelFilter,
}

impl LoggerOptions {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            dir: dir.into(),
            app_name: app_name.to_string(),
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
            level: LevelFilter::INFO,
        }
    }
}

struct OpenFile {
    date: NaiveDate,
    file: File,
}

struct Inner {
    current: Option<OpenFile>,
    recent: VecDeque<String>,
}

/// Daily-rolled log file with an in-memory tail
///
/// Cheap to clone; clones share the same file handle and buffer.
#[derive(Clone)]
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    max_files: usize,
    capacity: usize,
    inner: Arc<Mutex<Inner>>,
}

impl RollingFile {
    /// Create the log directory and prune files beyond the retention limit
    pub fn open(options: &LoggerOptions) -> Result<Self, LoggerError> {
        fs::create_dir_all(&options.dir)?;

        let rolling = Self {
            dir: options.dir.clone(),
            app_name: options.app_name.clone(),
            max_files: options.max_files.max(1),
            capacity: options.buffer_lines,
            inner: Arc::new(Mutex::new(Inner {
                current: None,
                recent: VecDeque::with_capacity(options.buffer_lines),
            })),
        };
        rolling.prune()?;
        Ok(rolling)
    }

    /// Path of the file used for a given day
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}_{}.log", self.app_name, date.format("%Y-%m-%d")))
    }

    /// Last `n` lines, oldest first
    pub fn recent(&self, n: usize) -> Vec<String> {
        match self.inner.lock() {
            Ok(inner) => {
                let skip = inner.recent.len().saturating_sub(n);
                inner.recent.iter().skip(skip).cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Append raw bytes to the file for `date`, rolling over if the day changed
    pub fn write_at(&self, date: NaiveDate, buf: &[u8]) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log state poisoned"))?;

        let needs_roll = inner.current.as_ref().map_or(true, |open| open.date != date);
        if needs_roll {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.file_path(date))?;
            inner.current = Some(OpenFile { date, file });
            // Rolled to a new day: old files may now exceed the limit
            drop(inner);
            self.prune().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            inner = self
                .inner
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log state poisoned"))?;
        }

        if let Some(open) = inner.current.as_mut() {
            open.file.write_all(buf)?;
        }

        if self.capacity > 0 {
            for line in String::from_utf8_lossy(buf).lines() {
                if line.trim().is_empty() {
                    continue;
                }
                if inner.recent.len() == self.capacity {
                    inner.recent.pop_front();
                }
                inner.recent.push_back(line.to_string());
            }
        }
        Ok(())
    }

    fn flush_current(&self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log state poisoned"))?;
        match inner.current.as_mut() {
            Some(open) => open.file.flush(),
            None => Ok(()),
        }
    }

    /// Log files belonging to this app, oldest first
    pub fn log_files(&self) -> Result<Vec<PathBuf>, LoggerError> {
        list_log_files(&self.dir, &self.app_name)
    }

    fn prune(&self) -> Result<(), LoggerError> {
        let files = self.log_files()?;
        if files.len() > self.max_files {
            let excess = files.len() - self.max_files;
            for path in files.into_iter().take(excess) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

fn list_log_files(dir: &Path, app_name: &str) -> Result<Vec<PathBuf>, LoggerError> {
    let prefix = format!("{}_", app_name);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with(&prefix) && n.ends_with(".log"));
        if is_ours {
            files.push(path);
        }
    }
    // Date suffix is zero-padded, so name order is age order
    files.sort();
    Ok(files)
}

/// `io::Write` handle handed to the fmt subscriber for each event
pub struct RollingWriter {
    target: RollingFile,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let today = chrono::Local::now().date_naive();
        self.target.write_at(today, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.target.flush_current()
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter { target: self.clone() }
    }
}

/// Initialize the global logger with default retention
pub fn init_logger(log_dir: impl Into<PathBuf>, app_name: &str) -> Result<(), LoggerError> {
    init_with_options(LoggerOptions::new(log_dir, app_name))
}

/// Initialize the global logger
///
/// Fails with `AlreadyInitialized` if a global subscriber is already set.
pub fn init_with_options(options: LoggerOptions) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized("rolling logger".to_string()));
    }

    let rolling = RollingFile::open(&options)?;

    tracing_subscriber::fmt()
        .with_writer(rolling.clone())
        .with_ansi(false)
        .with_target(true)
        .with_max_level(options.level)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;

    // The subscriber installs the log bridge at TRACE; keep both facades in step
    log::set_max_level(to_log_level(options.level));

    LOGGER
        .set(rolling)
        .map_err(|_| LoggerError::AlreadyInitialized("rolling logger".to_string()))?;

    tracing::info!(
        dir = %options.dir.display(),
        app = %options.app_name,
        "rolling logger initialized"
    );
    Ok(())
}

fn to_log_level(level: LevelFilter) -> log::LevelFilter {
    if level == LevelFilter::OFF {
        log::LevelFilter::Off
    } else if level == LevelFilter::ERROR {
        log::LevelFilter::Error
    } else if level == LevelFilter::WARN {
        log::LevelFilter::Warn
    } else if level == LevelFilter::INFO {
        log::LevelFilter::Info
    } else if level == LevelFilter::DEBUG {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Trace
    }
}

fn ensure_initialized() -> Result<(), LoggerError> {
    LOGGER.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Last `n` buffered lines of the global logger (empty before init)
pub fn recent_lines(n: usize) -> Vec<String> {
    LOGGER.get().map(|l| l.recent(n)).unwrap_or_default()
}
