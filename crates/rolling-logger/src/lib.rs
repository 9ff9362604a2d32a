//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes plain-text lines to
//! `<dir>/<app>.log`, archives the file once it grows past a size limit and
//! keeps the most recent lines in memory for in-app display.
//! Records emitted through the `log` facade are bridged into the same sink.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;
const DEFAULT_MAX_ARCHIVES: usize = 5;
const DEFAULT_BUFFER_LINES: usize = 500;

static RECENT: OnceLock<Arc<Mutex<RingBuffer>>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] io::Error),

    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub dir: PathBuf,
    pub app_name: String,
    pub max_file_bytes: u64,
    pub max_archives: usize,
    pub buffer_lines: usize,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl LoggerConfig {
    pub fn new(dir: PathBuf, app_name: &str) -> Self {
        Self {
            dir,
            app_name: app_name.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_archives: DEFAULT_MAX_ARCHIVES,
            buffer_lines: DEFAULT_BUFFER_LINES,
            default_filter: "info".to_string(),
        }
    }
}

/// Initialize the global logger with default limits
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), LoggerError> {
    init_with(LoggerConfig::new(log_dir, app_name))
}

/// Initialize the global logger
pub fn init_with(config: LoggerConfig) -> Result<(), LoggerError> {
    let file = RollingFile::open(
        &config.dir,
        &config.app_name,
        config.max_file_bytes,
        config.max_archives,
    )?;
    let recent = RECENT
        .get_or_init(|| Arc::new(Mutex::new(RingBuffer::new(config.buffer_lines))))
        .clone();
    let writer = RollingWriter {
        file: Arc::new(Mutex::new(file)),
        recent,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(app = %config.app_name, dir = %config.dir.display(), "logger initialized");
    Ok(())
}

/// Log an informational message through the `log` facade
pub fn info(message: &str) {
    log::info!(target: "app", "{}", message);
}

/// Log an error message through the `log` facade
pub fn error(message: &str) {
    log::error!(target: "app", "{}", message);
}

/// Most recent log lines, oldest first. Empty before initialization.
pub fn recent_lines() -> Vec<String> {
    RECENT
        .get()
        .and_then(|buffer| buffer.lock().ok().map(|b| b.lines()))
        .unwrap_or_default()
}

// ========================
// Ring Buffer
// ========================

/// Fixed-capacity line buffer; the oldest line is dropped when full
#[derive(Debug)]
pub struct RingBuffer {
    lines: VecDeque<String>,
    capacity: usize,
    partial: String,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            partial: String::new(),
        }
    }

    /// Append raw output; complete lines are stored, a trailing fragment waits
    /// for the next write.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(bytes));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            self.push_line(line.trim_end().to_string());
        }
    }

    fn push_line(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

// ========================
// Rolling File
// ========================

/// Active log file plus archive management
#[derive(Debug)]
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    file: File,
    written: u64,
    max_bytes: u64,
    max_archives: usize,
}

impl RollingFile {
    pub fn open(dir: &Path, app_name: &str, max_bytes: u64, max_archives: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{app_name}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            app_name: app_name.to_string(),
            file,
            written,
            max_bytes: max_bytes.max(1),
            max_archives,
        })
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    /// Archived files for this app, oldest first
    pub fn archives(&self) -> io::Result<Vec<PathBuf>> {
        let prefix = format!("{}-", self.app_name);
        let mut archives: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_prefix(&prefix))
                    .is_some_and(is_archive_suffix)
            })
            .collect();
        archives.sort();
        Ok(archives)
    }

    // sequence suffix keeps same-millisecond archives in name order
    fn archive_path(&self, stamp: &str, sequence: u32) -> PathBuf {
        self.dir
            .join(format!("{}-{}-{:03}.log", self.app_name, stamp, sequence))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f").to_string();
        let mut counter = 0u32;
        let mut target = self.archive_path(&stamp, counter);
        while target.exists() {
            counter += 1;
            target = self.archive_path(&stamp, counter);
        }
        fs::rename(self.active_path(), &target)?;
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        self.written = 0;

        let archives = self.archives()?;
        if archives.len() > self.max_archives {
            for stale in &archives[..archives.len() - self.max_archives] {
                fs::remove_file(stale)?;
            }
        }
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Cloneable writer handed to the subscriber for every event
#[derive(Clone)]
struct RollingWriter {
    file: Arc<Mutex<RollingFile>>,
    recent: Arc<Mutex<RingBuffer>>,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut recent) = self.recent.lock() {
            recent.push_bytes(buf);
        }
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

/// `YYYYMMDD-HHMMSS.mmm-NNN.log`, the part of an archive name after `<app>-`
fn is_archive_suffix(name: &str) -> bool {
    fn digits(part: &str, len: usize) -> bool {
        part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    }

    let Some(stem) = name.strip_suffix(".log") else {
        return false;
    };
    let mut parts = stem.split('-');
    let (Some(date), Some(time), Some(sequence), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Some((seconds, millis)) = time.split_once('.') else {
        return false;
    };
    digits(date, 8)
        && digits(seconds, 6)
        && digits(millis, 3)
        && sequence.len() >= 3
        && sequence.bytes().all(|b| b.is_ascii_digit())
}
