//! Output sinks - where headers and report lines go

use crate::config::HarnessConfig;
use crate::report::Report;
use colored::*;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for everything a suite prints
pub trait ReportSink: Send + Sync {
    /// A case is about to run; `title` is its suite header
    fn header(&self, title: &str);

    /// A single pass/fail line
    fn report(&self, report: &Report);

    /// A case finished
    fn separator(&self);
}

/// Shared handle to a sink
pub type SharedSink = Arc<dyn ReportSink>;

/// Writes to stdout in the console format
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    config: HarnessConfig,
}

impl ConsoleSink {
    /// Create a new console sink using `config`
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    fn write_line(&self, line: &str) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

impl ReportSink for ConsoleSink {
    fn header(&self, title: &str) {
        let underline = underline_for(title);
        if self.config.color {
            self.write_line(&title.bold().to_string());
            self.write_line(&underline.dimmed().to_string());
        } else {
            self.write_line(title);
            self.write_line(&underline);
        }
    }

    fn report(&self, report: &Report) {
        self.write_line(&report.render(&self.config));
    }

    fn separator(&self) {
        self.write_line("");
    }
}

/// Line of dashes as wide as the header it sits under
pub fn underline_for(title: &str) -> String {
    "-".repeat(title.chars().count())
}

/// Something a [`MemorySink`] recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Header(String),
    Report(Report),
    Separator,
}

/// Records events instead of printing them
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl MemorySink {
    /// Create a new, empty sink
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Everything recorded so far, in order
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the report lines
    pub fn reports(&self) -> Vec<Report> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Report(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    /// Headers in the order cases ran
    pub fn headers(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Header(title) => Some(title),
                _ => None,
            })
            .collect()
    }

    /// The uncolored console transcript
    pub fn transcript(&self, config: &HarnessConfig) -> Vec<String> {
        let mut lines = Vec::new();
        for event in self.events() {
            match event {
                SinkEvent::Header(title) => {
                    let underline = underline_for(&title);
                    lines.push(title);
                    lines.push(underline);
                }
                SinkEvent::Report(report) => lines.push(report.render(config)),
                SinkEvent::Separator => lines.push(String::new()),
            }
        }
        lines
    }
}

impl ReportSink for MemorySink {
    fn header(&self, title: &str) {
        self.push(SinkEvent::Header(title.to_string()));
    }

    fn report(&self, report: &Report) {
        self.push(SinkEvent::Report(report.clone()));
    }

    fn separator(&self) {
        self.push(SinkEvent::Separator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Outcome;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_underline_matches_header_width() {
        assert_eq!(underline_for("Running: Math"), "-------------");
        assert_eq!(underline_for(""), "");
    }

    #[test]
    fn test_memory_sink_transcript() {
        let sink = MemorySink::new();
        sink.header("Running: Demo");
        sink.report(&Report::new("main.rs:3", Outcome::Pass, Some("_a".into()), ""));
        sink.separator();

        let config = HarnessConfig::default();
        assert_eq!(
            sink.transcript(&config),
            vec![
                "Running: Demo".to_string(),
                "-------------".to_string(),
                "main.rs:3 ✅ _a".to_string(),
                String::new(),
            ]
        );
        assert_eq!(sink.headers(), vec!["Running: Demo".to_string()]);
        assert_eq!(sink.reports().len(), 1);
    }

    #[test]
    fn test_console_sink_does_not_panic() {
        let sink = ConsoleSink::new(HarnessConfig::default().with_color(false));
        sink.header("Running: Console");
        sink.report(&Report::new("here", Outcome::Fail, None, "boom"));
        sink.separator();
    }
}
