use std::collections::VecDeque;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{Error, Result};

pub const LOG_CAPACITY: usize = 50;
pub const VISIBLE_LOG_LINES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Success,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Success => "SUCC",
        }
    }

    fn from_tracing(level: Level) -> Self {
        match level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

/// Most recent log lines, oldest first. Cheap to clone; clones share storage.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, level: LogLevel, message: impl Into<String>) {
        let mut lines = self.lines.lock();
        if lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(LogLine {
            time: Local::now(),
            level,
            message: message.into(),
        });
    }

    pub fn snapshot(&self) -> Vec<LogLine> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

/// Collects the message and fields of one event into a single line.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<String>,
    success: bool,
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            name => self.fields.push(format!("{}={:?}", name, value)),
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            name => self.fields.push(format!("{}={}", name, value)),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "success" {
            self.success = value;
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

impl LineVisitor {
    fn into_message(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} ({})", self.message, self.fields.join(", "))
        }
    }
}

/// Feeds events into a `LogBuffer` for the in-app log panel.
/// Events carrying `success = true` are shown as SUCC.
pub struct PanelLayer {
    buffer: LogBuffer,
}

impl PanelLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for PanelLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let level = if visitor.success {
            LogLevel::Success
        } else {
            LogLevel::from_tracing(*event.metadata().level())
        };
        self.buffer.push(level, visitor.into_message());
    }
}

/// Log file truncated at startup, flushed after every write.
#[derive(Clone)]
pub struct LogFileWriter {
    inner: Arc<Mutex<File>>,
}

impl LogFileWriter {
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.inner.lock();
        let written = file.write(buf)?;
        file.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("recent-branches")
        .join("rb.log")
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber: a plain-text file layer plus the panel
/// layer. The terminal belongs to the UI, so nothing is written to stderr.
pub fn init(log_file: Option<&Path>, default_level: &str) -> Result<LogBuffer> {
    let path = log_file.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let writer = LogFileWriter::create(&path)?;
    let buffer = LogBuffer::default();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(file_layer.with_filter(filter(default_level)))
        .with(PanelLayer::new(buffer.clone()).with_filter(filter(default_level)))
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialised: {}", e)))?;

    tracing::info!(log_path = %path.display(), "Logging initialised");
    Ok(buffer)
}

/// Scroll state of the log panel. Follows the newest line until the user
/// scrolls up; reaching the bottom again resumes following.
#[derive(Debug, Clone)]
pub struct LogViewer {
    offset: usize,
    follow: bool,
    visible: usize,
}

impl Default for LogViewer {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
            visible: VISIBLE_LOG_LINES,
        }
    }
}

impl LogViewer {
    pub fn is_following(&self) -> bool {
        self.follow
    }

    fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.visible)
    }

    pub fn scroll_up(&mut self, total: usize) {
        if self.follow {
            self.offset = self.max_offset(total);
        }
        self.offset = self.offset.saturating_sub(1);
        self.follow = self.offset >= self.max_offset(total);
    }

    pub fn scroll_down(&mut self, total: usize) {
        self.offset = (self.offset + 1).min(self.max_offset(total));
        if self.offset >= self.max_offset(total) {
            self.follow = true;
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.follow = true;
    }

    /// Indices of the lines to draw.
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = if self.follow {
            self.max_offset(total)
        } else {
            self.offset.min(self.max_offset(total))
        };
        start..(start + self.visible).min(total)
    }
}
