//! Rolling Logger
//!
//! File logger that rotates by size and keeps the most recent lines in a
//! circular buffer. Installed as the global `tracing` subscriber; records
//! from the `log` facade are bridged into it.

use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Rotation and buffering limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingConfig {
    /// Rotate once the active file would grow past this size
    pub max_bytes: u64,
    /// Rotated files kept next to the active one (`app.1.log` ..)
    pub keep_files: usize,
    /// Lines held in memory for `recent_lines`
    pub buffer_lines: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
            keep_files: 3,
            buffer_lines: 500,
        }
    }
}

struct RollingState {
    dir: PathBuf,
    app_name: String,
    config: RollingConfig,
    file: Option<File>,
    written: u64,
    recent: VecDeque<String>,
    partial: String,
}

fn log_path(dir: &Path, app_name: &str, index: usize) -> PathBuf {
    if index == 0 {
        dir.join(format!("{}.log", app_name))
    } else {
        dir.join(format!("{}.{}.log", app_name, index))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl RollingState {
    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        let keep = self.config.keep_files;

        let oldest = log_path(&self.dir, &self.app_name, keep);
        if let Err(e) = fs::remove_file(&oldest) {
            if e.kind() != io::ErrorKind::NotFound {
                return Err(e);
            }
        }
        for index in (0..keep).rev() {
            let from = log_path(&self.dir, &self.app_name, index);
            if from.exists() {
                fs::rename(&from, log_path(&self.dir, &self.app_name, index + 1))?;
            }
        }

        self.file = Some(open_append(&log_path(&self.dir, &self.app_name, 0))?);
        self.written = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        if self.config.buffer_lines == 0 {
            return;
        }
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.recent.len() == self.config.buffer_lines {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end().to_string());
        }
    }
}

/// Size-rotated log file plus an in-memory tail. Cheap to clone.
#[derive(Clone)]
pub struct RollingWriter {
    state: Arc<Mutex<RollingState>>,
}

impl RollingWriter {
    pub fn open(dir: impl AsRef<Path>, app_name: &str, config: RollingConfig) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let file = open_append(&log_path(&dir, app_name, 0))?;
        let written = file.metadata()?.len();

        Ok(Self {
            state: Arc::new(Mutex::new(RollingState {
                dir,
                app_name: app_name.to_string(),
                config,
                file: Some(file),
                written,
                recent: VecDeque::new(),
                partial: String::new(),
            })),
        })
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        match self.state.lock() {
            Ok(state) => log_path(&state.dir, &state.app_name, 0),
            Err(poisoned) => {
                let state = poisoned.into_inner();
                log_path(&state.dir, &state.app_name, 0)
            }
        }
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.recent.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log state poisoned"))?;
        let state = &mut *guard;

        if state.written > 0 && state.written + buf.len() as u64 > state.config.max_bytes {
            state.rotate()?;
        }
        let file = state
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file closed"))?;
        file.write_all(buf)?;
        state.written += buf.len() as u64;
        state.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log state poisoned"))?;
        match guard.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

static WRITER: OnceLock<RollingWriter> = OnceLock::new();

/// Install the global logger writing to `<log_dir>/<app_name>.log`.
/// Fails if a logger is already installed.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, RollingConfig::default())
}

pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    config: RollingConfig,
) -> Result<(), String> {
    if WRITER.get().is_some() {
        return Err("Logger already initialized".to_string());
    }
    let log_dir = log_dir.as_ref();
    let writer = RollingWriter::open(log_dir, app_name, config)
        .map_err(|e| format!("Failed to open log in {}: {}", log_dir.display(), e))?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(tracing::Level::INFO)
        .with_writer(writer.clone())
        .try_init()
        .map_err(|e| e.to_string())?;

    let _ = WRITER.set(writer);
    tracing::info!(app = app_name, "Logger initialized");
    Ok(())
}

fn installed() -> Result<&'static RollingWriter, String> {
    WRITER.get().ok_or_else(|| "Logger not initialized".to_string())
}

pub fn info(message: &str) -> Result<(), String> {
    installed()?;
    log::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), String> {
    installed()?;
    log::error!("{}", message);
    Ok(())
}

/// Tail of the global log; empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    WRITER.get().map(RollingWriter::recent_lines).unwrap_or_default()
}

/// Active log file of the global logger
pub fn current_log_file() -> Option<PathBuf> {
    WRITER.get().map(RollingWriter::current_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(max_bytes: u64, keep_files: usize, buffer_lines: usize) -> RollingConfig {
        RollingConfig { max_bytes, keep_files, buffer_lines }
    }

    #[test]
    fn test_writes_and_remembers_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::open(dir.path(), "App", small(1024, 2, 10)).unwrap();

        writer.write_all(b"first\nsec").unwrap();
        writer.write_all(b"ond\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.recent_lines(), vec!["first".to_string(), "second".to_string()]);
        let content = fs::read_to_string(writer.current_path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_buffer_drops_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::open(dir.path(), "App", small(1024, 1, 2)).unwrap();
        for line in ["a\n", "b\n", "c\n"] {
            writer.write_all(line.as_bytes()).unwrap();
        }
        assert_eq!(writer.recent_lines(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_rotates_by_size_and_keeps_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::open(dir.path(), "App", small(10, 2, 0)).unwrap();

        for line in ["aaaaaaaa\n", "bbbbbbbb\n", "cccccccc\n", "dddddddd\n"] {
            writer.write_all(line.as_bytes()).unwrap();
        }
        writer.flush().unwrap();

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("App.log"), "dddddddd\n");
        assert_eq!(read("App.1.log"), "cccccccc\n");
        assert_eq!(read("App.2.log"), "bbbbbbbb\n");
        assert!(!dir.path().join("App.3.log").exists());
    }

    // The only test that touches the global logger
    #[test]
    fn test_global_logger_lifecycle() {
        assert!(info("before init").is_err());
        assert!(recent_lines().is_empty());
        assert_eq!(current_log_file(), None);

        let dir = tempfile::tempdir().unwrap();
        init_logger_with(dir.path(), "App", small(1024 * 1024, 1, 50)).unwrap();
        assert!(init_logger(dir.path(), "App").is_err());

        log::info!("bridged from log");
        log::debug!("below the level");
        info("helper line").unwrap();

        let lines = recent_lines();
        assert!(lines.iter().any(|l| l.contains("bridged from log")));
        assert!(lines.iter().any(|l| l.contains("helper line")));
        assert!(!lines.iter().any(|l| l.contains("below the level")));

        let path = current_log_file().unwrap();
        assert_eq!(path, dir.path().join("App.log"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("bridged from log"));
    }
}
