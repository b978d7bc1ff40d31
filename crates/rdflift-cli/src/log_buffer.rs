//! Bounded in-memory log buffer
//!
//! [`LogBufferLayer`] is a `tracing` layer that keeps the most recent events
//! in a FIFO buffer next to the normal stderr output, so a run can report
//! how many warnings and errors it produced and show the latest entries.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Entries kept before the oldest is evicted
pub const DEFAULT_CAPACITY: usize = 1000;

/// One recorded event
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub message: String,

    /// Structured fields other than the message, in emission order
    pub fields: Vec<(String, String)>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {}: {}",
            self.timestamp, self.level, self.target, self.message
        )?;
        for (name, value) in &self.fields {
            write!(f, " {}={}", name, value)?;
        }
        Ok(())
    }
}

/// Per-level counts of the buffered entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    pub total: usize,
    pub error: usize,
    pub warn: usize,
    pub info: usize,
    pub debug: usize,
    pub trace: usize,
}

struct Inner {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

/// Shared handle to the buffered entries
///
/// Clones share the same buffer.
#[derive(Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<Inner>>,
}

impl LogBuffer {
    /// Buffer holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                capacity,
                entries: VecDeque::with_capacity(capacity),
            })),
        }
    }

    /// Layer that records into this buffer
    pub fn layer(&self) -> LogBufferLayer {
        LogBufferLayer {
            buffer: self.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // entries stay readable after a poisoning panic
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, entry: LogEntry) {
        let mut inner = self.lock();
        if inner.entries.len() == inner.capacity {
            inner.entries.pop_front();
        }
        inner.entries.push_back(entry);
    }

    /// The last `count` entries, oldest first
    pub fn recent(&self, count: usize) -> Vec<LogEntry> {
        let inner = self.lock();
        let skip = inner.entries.len().saturating_sub(count);
        inner.entries.iter().skip(skip).cloned().collect()
    }

    pub fn by_level(&self, level: Level) -> Vec<LogEntry> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> LogStats {
        let inner = self.lock();
        let mut stats = LogStats {
            total: inner.entries.len(),
            ..LogStats::default()
        };
        for entry in &inner.entries {
            match entry.level {
                Level::ERROR => stats.error += 1,
                Level::WARN => stats.warn += 1,
                Level::INFO => stats.info += 1,
                Level::DEBUG => stats.debug += 1,
                Level::TRACE => stats.trace += 1,
            }
        }
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// `tracing` layer feeding a [`LogBuffer`]
pub struct LogBufferLayer {
    buffer: LogBuffer,
}

/// Splits an event into its message and the remaining fields
#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl EventVisitor {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record(field, value.to_string());
    }
}

impl<S> Layer<S> for LogBufferLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.buffer.push(LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}
