//! Tracing subscriber: console and log-file rendering of sparse-store events.
//!
//! Events say what they are through fields, not targets: `stage = true`
//! marks a section header and `failure = "<kind>"` marks a per-path failure
//! record (see [`BackupFailure::kind`](crate::resources::error::BackupFailure::kind)).
//! Both sinks classify an event once into an [`Entry`] and render from that.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::location::log_file_path;

/// Fields sparse-store events carry.
#[derive(Debug, Default)]
struct EventFields {
    message: String,
    stage: bool,
    failure: Option<String>,
}

impl EventFields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn entry(&self, level: Level) -> Entry<'_> {
        let msg = self.message.as_str();
        match (&self.failure, self.stage) {
            (Some(kind), _) => Entry::Failure {
                kind: kind.as_str(),
                msg,
            },
            (None, true) => Entry::Stage(msg),
            (None, false) => Entry::Plain { level, msg },
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "failure" => self.failure = Some(format!("{value:?}")),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => value.clone_into(&mut self.message),
            "failure" => self.failure = Some(value.to_owned()),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "stage" {
            self.stage = value;
        }
    }
}

/// A classified event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry<'a> {
    /// Section header such as "Commencing backup...".
    Stage(&'a str),
    /// One failure record from the end-of-run list.
    Failure { kind: &'a str, msg: &'a str },
    /// Anything else, at its level.
    Plain { level: Level, msg: &'a str },
}

impl Entry<'_> {
    fn console_line(self) -> String {
        match self {
            Self::Stage(msg) => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Failure { msg, .. } => format!("  \x1b[31m\u{2717}\x1b[0m {msg}"),
            Self::Plain { level, msg } => match level {
                Level::ERROR => format!("\x1b[31merror:\x1b[0m {msg}"),
                Level::WARN => format!("\x1b[33mwarning:\x1b[0m {msg}"),
                Level::INFO => format!("  {msg}"),
                _ => format!("  \x1b[2m{msg}\x1b[0m"),
            },
        }
    }

    /// Plain-text line for the log file, prefixed with `time`.
    fn file_line(self, time: &str) -> String {
        match self {
            Self::Stage(msg) => format!("{time} ==> {msg}"),
            Self::Failure { kind, msg } => format!("{time} FAIL  [{kind}] {msg}"),
            Self::Plain { level, msg } => format!("{time} {:<5} {msg}", level.as_str()),
        }
    }
}

/// A [`tracing_subscriber::Layer`] writing every event to the run's log file.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write the run header.
    ///
    /// `None` if the file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let mut file = fs::File::create(&path).ok()?;
        writeln!(
            file,
            "# sparse-store {} {command} {}",
            crate::commands::version::version(),
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let fields = EventFields::of(event);
        let time = chrono::Utc::now().format("%H:%M:%S").to_string();
        let line = fields.entry(*event.metadata().level()).file_line(&time);
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console [`FormatEvent`](tracing_subscriber::fmt::FormatEvent) for
/// sparse-store events.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let fields = EventFields::of(event);
        let line = fields.entry(*event.metadata().level()).console_line();
        writeln!(writer, "{line}")
    }
}

/// Install the global subscriber for a run of `command`.
///
/// Warnings, errors and failure records go to stderr; everything else to
/// stdout, with debug lines only when `verbose`.  The log file always gets
/// debug lines.  Call once, before the first event.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(ConsoleFormatter)
                .with_writer(writer)
                .with_filter(console_level),
        )
        .with(FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG)))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(message: &str, stage: bool, failure: Option<&str>) -> EventFields {
        EventFields {
            message: message.to_owned(),
            stage,
            failure: failure.map(str::to_owned),
        }
    }

    #[test]
    fn failure_field_wins_over_level() {
        let f = fields("path not found: /gone", false, Some("not-found"));
        assert_eq!(
            f.entry(Level::ERROR),
            Entry::Failure {
                kind: "not-found",
                msg: "path not found: /gone"
            }
        );
    }

    #[test]
    fn stage_field_marks_header() {
        let f = fields("Commencing backup...", true, None);
        assert_eq!(f.entry(Level::INFO), Entry::Stage("Commencing backup..."));
    }

    #[test]
    fn unmarked_event_keeps_its_level() {
        let f = fields("up to date: /s/a", false, None);
        assert_eq!(
            f.entry(Level::DEBUG),
            Entry::Plain {
                level: Level::DEBUG,
                msg: "up to date: /s/a"
            }
        );
    }

    #[test]
    fn file_lines_are_plain_text() {
        let failure = Entry::Failure {
            kind: "file-copy",
            msg: "could not copy file /a to /b: denied",
        };
        assert_eq!(
            failure.file_line("12:00:00"),
            "12:00:00 FAIL  [file-copy] could not copy file /a to /b: denied"
        );
        assert_eq!(
            Entry::Stage("Loading manifest").file_line("12:00:00"),
            "12:00:00 ==> Loading manifest"
        );
        let warn = Entry::Plain {
            level: Level::WARN,
            msg: "path not found: /x",
        };
        assert_eq!(warn.file_line("12:00:00"), "12:00:00 WARN  path not found: /x");
        let debug = Entry::Plain {
            level: Level::DEBUG,
            msg: "copy /a -> /b",
        };
        assert!(!debug.file_line("t").contains('\x1b'));
    }

    #[test]
    fn console_marks_failures_and_indents_info() {
        let failure = Entry::Failure {
            kind: "not-found",
            msg: "path not found: /gone",
        };
        assert!(failure.console_line().ends_with(" path not found: /gone"));
        assert!(failure.console_line().contains('\u{2717}'));
        let info = Entry::Plain {
            level: Level::INFO,
            msg: "5 copied, 12 up to date",
        };
        assert_eq!(info.console_line(), "  5 copied, 12 up to date");
    }
}
