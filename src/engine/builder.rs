//! Record assembly.
//!
//! The builder folds classified lines into a [`Report`]. It owns two pieces of
//! state: the report so far and the record accumulator (`current`). Record
//! boundaries are implicit in the text, so the accumulator is closed from two
//! places:
//!
//! ```text
//!     Total time N   ──▶ stamp time = N ──┐
//!                                          ├─▶ close_current_record ─▶ push + reset
//!     # <metadata>   ──▶ (source set?) ───┘
//! ```
//!
//! Whatever is still open when the input ends is dropped unless
//! [`Options::keep_unclosed`] asks otherwise; either way it is reported in
//! [`ParseMetrics::unclosed`].

use super::classify::{Classified, Entry, LineClass, classify};
use super::metrics::{MetadataMask, ParseMetrics, UnclosedRecord};
use crate::{Options, Record, Report};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closure {
    TotalTime,
    Metadata,
    EndOfInput,
}

/// Report plus the metrics gathered while building it.
#[derive(Debug, Clone)]
pub(crate) struct RunResult {
    pub report: Report,
    pub metrics: ParseMetrics,
}

/// Single-pass report builder.
///
/// Usage: `ReportBuilder::new()`, then [`feed_line`](Self::feed_line) for every
/// line in order, then [`finish`](Self::finish).
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    report: Report,
    /// Record accumulator. Its `source` doubles as the "source assigned" state.
    current: Record,
    /// 1-based line of the source line that opened `current`.
    opened_at: Option<usize>,
    metrics: ParseMetrics,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and apply one line. `number` is 1-based and only used for diagnostics.
    pub fn feed_line(&mut self, number: usize, line: &str) {
        let class = LineClass::of(line);
        self.metrics.count_line(class);

        if class == LineClass::Metadata && self.current.source.is_some() {
            self.close_current_record(None, Closure::Metadata);
        }

        match classify(line, class, self.current.is_game()) {
            Classified::Matched { pattern, entry } => {
                tracing::trace!(line = number, pattern, "matched");
                self.apply(number, entry);
            }
            Classified::Unrecognized => {
                if !line.trim().is_empty() {
                    tracing::trace!(line = number, ?class, text = line, "skipped unrecognized line");
                    self.metrics.skipped.push(number);
                }
            }
        }
    }

    fn apply(&mut self, number: usize, entry: Entry) {
        match entry {
            Entry::Timing(timing) => self.current.timings.push(timing),
            Entry::TotalTime(time) => self.close_current_record(Some(time), Closure::TotalTime),
            Entry::Version(version) => {
                self.report.version = Some(version);
                self.metrics.seen |= MetadataMask::VERSION;
            }
            Entry::Entities(n) => {
                self.report.entities = Some(n);
                self.metrics.seen |= MetadataMask::ENTITIES;
            }
            Entry::LivingEntities(n) => {
                self.report.living = Some(n);
                self.metrics.seen |= MetadataMask::LIVING_ENTITIES;
            }
            Entry::Source(source) => {
                self.current.source = Some(source);
                self.opened_at = Some(number);
            }
            Entry::SampleTime(time) => {
                // Seeds the accumulator too; a later `Total time` overwrites it.
                self.current.time = Some(time);
                self.report.time = Some(time);
                self.metrics.seen |= MetadataMask::SAMPLE_TIME;
            }
        }
    }

    /// Push the accumulator into the report and start a fresh one.
    /// `stamp` sets the record's `time` first when the closing line carries one.
    fn close_current_record(&mut self, stamp: Option<u64>, reason: Closure) {
        if let Some(time) = stamp {
            self.current.time = Some(time);
        }

        let record = std::mem::take(&mut self.current);
        self.opened_at = None;

        match reason {
            Closure::TotalTime => self.metrics.closed_by_total += 1,
            Closure::Metadata => self.metrics.closed_by_metadata += 1,
            Closure::EndOfInput => {}
        }

        tracing::debug!(
            index = self.report.records.len(),
            source = ?record.source,
            timings = record.timings.len(),
            time = ?record.time,
            ?reason,
            "closed record"
        );
        self.report.records.push(record);
    }

    /// End of input: decide what happens to a still-open record and return the report.
    pub fn finish(mut self, options: &Options) -> RunResult {
        if self.current.source.is_some() || !self.current.timings.is_empty() {
            let unclosed = UnclosedRecord {
                opened_at: self.opened_at,
                timings: self.current.timings.len(),
                kept: options.keep_unclosed,
            };

            if options.keep_unclosed {
                self.close_current_record(None, Closure::EndOfInput);
            } else {
                tracing::debug!(opened_at = ?unclosed.opened_at, timings = unclosed.timings, "dropped unclosed record");
            }
            self.metrics.unclosed = Some(unclosed);
        }

        RunResult { report: self.report, metrics: self.metrics }
    }
}

/// Build a report from `text` in one pass.
///
/// Every `\r` is removed before splitting on `\n`, so CRLF and stray CR input
/// parse the same as LF input.
pub(crate) fn run(text: &str, options: &Options) -> RunResult {
    let start = Instant::now();
    let normalized = text.replace('\r', "");

    let mut builder = ReportBuilder::new();
    for (idx, line) in normalized.split('\n').enumerate() {
        builder.feed_line(idx + 1, line);
    }

    let mut result = builder.finish(options);
    result.metrics.total = start.elapsed();
    result
}
