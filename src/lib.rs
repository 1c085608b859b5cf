use serde::Serialize;

#[macro_use]
mod macros;
mod api;
mod engine;

pub use api::{Options, ParseDetails, ParseResult, parse, parse_file, parse_reader, parse_verbose_with, parse_with, read_text};
pub use engine::{MetadataMask, ParseMetrics, UnclosedRecord};

/// Errors surfaced by the crate.
///
/// Report content never produces an error: lines that match nothing are
/// skipped. Only obtaining the text (or serializing it back out) can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

// --- Document model ---------------------------------------------------------

/// A parsed timings report.
///
/// Metadata fields are `None` when the corresponding `#` line never appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Identifier of the server build that produced the report (`# Version ...`).
    pub version: Option<String>,
    /// Entity count (`# Entities N`).
    pub entities: Option<u64>,
    /// Living entity count (`# LivingEntities N`).
    pub living: Option<u64>,
    /// Overall sample duration (`Sample time N`).
    pub time: Option<u64>,
    /// Sampling windows in the order they appear in the text.
    pub records: Vec<Record>,
}

impl Report {
    /// Records attributed to the game itself.
    pub fn game_records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.is_game())
    }

    /// Records attributed to the plugin called `name`.
    pub fn plugin_records<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| matches!(&r.source, Some(Source::Plugin { name: n, .. }) if n == name))
    }
}

/// One sampling window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    /// `None` only when a `Total time` line closed the window before any source line.
    pub source: Option<Source>,
    pub timings: Vec<Timing>,
    /// Stamped by the closing `Total time` line; unset when a metadata line closed the window.
    pub time: Option<u64>,
}

impl Record {
    pub fn is_game(&self) -> bool {
        matches!(self.source, Some(Source::Game))
    }
}

/// Who a record or task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// The host game process (a bare `Minecraft` line).
    Game,
    Plugin { name: String, version: String },
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Game => f.write_str("Minecraft"),
            Source::Plugin { name, version } => write!(f, "{name} {version}"),
        }
    }
}

/// Statistics shared by every timing shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimingStats {
    pub time: u64,
    pub count: u64,
    pub average: u64,
    pub violations: u64,
}

/// A single timing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Timing {
    Event(EventTiming),
    Task(TaskTiming),
    Named(NamedTiming),
}

impl Timing {
    pub fn stats(&self) -> &TimingStats {
        match self {
            Timing::Event(t) => &t.stats,
            Timing::Task(t) => &t.stats,
            Timing::Named(t) => &t.stats,
        }
    }

    /// Human-readable label: the event/named label, or the owning source for tasks.
    pub fn label(&self) -> String {
        match self {
            Timing::Event(t) if t.group => format!("{} (and others)", t.name),
            Timing::Event(t) => t.name.clone(),
            Timing::Task(t) => format!("Task: {}", t.source),
            Timing::Named(t) => t.name.clone(),
        }
    }
}

/// An event handler timing. `group` is set when the line aggregates several
/// events (`(and others)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTiming {
    pub name: String,
    pub group: bool,
    #[serde(flatten)]
    pub stats: TimingStats,
}

/// A scheduled task timing. `interval` is `None` for tasks that run once (`Id:(Single)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTiming {
    pub source: Source,
    pub interval: Option<u64>,
    #[serde(flatten)]
    pub stats: TimingStats,
}

/// Fallback shape for game timing lines that are neither tasks nor events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedTiming {
    pub name: String,
    #[serde(flatten)]
    pub stats: TimingStats,
}
