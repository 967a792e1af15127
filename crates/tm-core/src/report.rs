//! Status reporting interface
//!
//! Components never print directly. They receive a `&dyn Reporter` and emit
//! human-facing progress through it, so the CLI can colour the output and
//! tests can capture it.

/// Sink for human-facing migration progress.
pub trait Reporter: Send + Sync {
    /// Neutral informational line
    fn info(&self, message: &str);

    /// A phase of the run is starting
    fn step(&self, message: &str);

    /// A unit of work completed
    fn success(&self, message: &str);

    /// Something unexpected that does not stop the run
    fn warn(&self, message: &str);
}

/// Reporter that forwards every message to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn step(&self, message: &str) {
        log::info!("{message}");
    }

    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Severity of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Step,
    Success,
    Warn,
}

/// Reporter that keeps every message in memory.
///
/// Used by embedders that render progress themselves, and by tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: std::sync::Mutex<Vec<(ReportLevel, String)>>,
}

impl RecordingReporter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, in order
    pub fn messages(&self) -> Vec<(ReportLevel, String)> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages recorded at `level`
    pub fn at_level(&self, level: ReportLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: ReportLevel, message: &str) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.record(ReportLevel::Info, message);
    }

    fn step(&self, message: &str) {
        self.record(ReportLevel::Step, message);
    }

    fn success(&self, message: &str) {
        self.record(ReportLevel::Success, message);
    }

    fn warn(&self, message: &str) {
        self.record(ReportLevel::Warn, message);
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
