//! Log capture for tests.
//!
//! [`capture_logs`] installs a thread-scoped subscriber whose
//! [`TestLogLayer`] records every event into a private [`LogStorage`].
//! Current-thread tokio tests see events from spawned tasks too, since they
//! all run on the test thread.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Captured events, oldest first, bounded to `max_entries`.
#[derive(Default)]
pub struct LogStorage {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
}

impl LogStorage {
    #[must_use]
    pub const fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    #[must_use]
    pub const fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    #[must_use]
    pub fn contains_message(&self, message: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(message))
    }

    #[must_use]
    pub fn contains_field_value(&self, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.fields.iter().any(|(_, value)| value.contains(needle)))
    }

    #[must_use]
    pub fn contains_level(&self, level: Level) -> bool {
        self.entries.iter().any(|e| e.level == level)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: Instant,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    #[must_use]
    pub fn new(level: Level, target: &str, message: &str) -> Self {
        Self {
            level,
            target: target.to_string(),
            message: message.to_string(),
            timestamp: Instant::now(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }
}

/// Layer that copies each event into shared storage.
pub struct TestLogLayer {
    storage: Arc<Mutex<LogStorage>>,
}

impl TestLogLayer {
    pub const fn new(storage: Arc<Mutex<LogStorage>>) -> Self {
        Self { storage }
    }
}

struct EventVisitor<'a> {
    message: &'a mut String,
    fields: &'a mut Vec<(String, String)>,
}

impl tracing::field::Visit for EventVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            *self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for TestLogLayer
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let mut message = String::new();
        let mut fields = Vec::new();
        event.record(&mut EventVisitor {
            message: &mut message,
            fields: &mut fields,
        });

        let mut entry = LogEntry::new(*metadata.level(), metadata.target(), &message);
        entry.fields = fields;

        if let Ok(mut storage) = self.storage.lock() {
            storage.push(entry);
        }
    }
}

/// Handle on a running capture. Dropping it uninstalls the subscriber.
pub struct LogCapture {
    storage: Arc<Mutex<LogStorage>>,
    _guard: DefaultGuard,
}

impl LogCapture {
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.storage
            .lock()
            .map(|storage| storage.entries().iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.with_storage(|storage| storage.contains_message(message))
    }

    #[must_use]
    pub fn contains_field_value(&self, needle: &str) -> bool {
        self.with_storage(|storage| storage.contains_field_value(needle))
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.with_storage(|storage| storage.contains_level(Level::ERROR))
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.with_storage(|storage| storage.contains_level(Level::WARN))
    }

    /// One line per event, for assertion failure messages.
    #[must_use]
    pub fn format_for_display(&self) -> String {
        let entries = self.entries();
        if entries.is_empty() {
            return String::from("No logs captured");
        }
        entries
            .iter()
            .map(|entry| {
                let fields = entry
                    .fields
                    .iter()
                    .map(|(key, value)| format!(" {key}={value}"))
                    .collect::<String>();
                format!(
                    "[{}] {}: {}{fields}",
                    entry.level, entry.target, entry.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn with_storage(&self, check: impl FnOnce(&LogStorage) -> bool) -> bool {
        self.storage.lock().map(|s| check(&s)).unwrap_or(false)
    }
}

/// Capture events matching `filter` on the current thread until the
/// returned handle is dropped.
#[must_use]
pub fn capture_logs(filter: &str) -> LogCapture {
    let storage = Arc::new(Mutex::new(LogStorage::new(1000)));
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(TestLogLayer::new(Arc::clone(&storage)));
    let guard = tracing::subscriber::set_default(subscriber);
    LogCapture {
        storage,
        _guard: guard,
    }
}
