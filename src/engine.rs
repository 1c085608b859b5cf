//! Line classification and report assembly.
//!
//! Parsing a report is a single forward pass:
//!
//! ```text
//! text ── strip '\r' ── split '\n' ──┐
//!                                    v
//!                        LineClass::of (classify.rs)
//!                          - first character only
//!                                    │
//!                                    v
//!                        classify (classify.rs)
//!                          - ordered LinePattern list per class
//!                          - extractors in patterns.rs
//!                          - Matched { entry } | Unrecognized
//!                                    │
//!                                    v
//!                        ReportBuilder (builder.rs)
//!                          - apply entry to report / accumulator
//!                          - close records on Total time or metadata
//!                          - count lines, skips, closures (metrics.rs)
//!                                    │
//!                                    v
//!                          Report + ParseMetrics
//! ```
//!
//! ## Responsibilities by module
//!
//! - `patterns.rs`: one regex-backed extractor per line shape.
//! - `classify.rs`: line classes, pattern priority, the `Classified` outcome.
//! - `builder.rs`: the accumulator state machine and both closure triggers.
//! - `metrics.rs`: counters and the `MetadataMask` exposed via `ParseDetails`.
//!
//! ## Adding a line shape
//!
//! Write an extractor in `patterns.rs`, give it an `Entry` variant if it carries
//! a new kind of value, and insert it into the right list in `classify.rs`.
//! Put it *ahead* of any more permissive pattern that would also accept it.
//!
//! ## Debugging
//!
//! The builder emits `tracing` events: `debug` for every closed or dropped
//! record, `trace` for every matched and skipped line.

#[path = "engine/builder.rs"]
mod builder;
#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/patterns.rs"]
mod patterns;


pub(crate) use builder::run;
pub(crate) use classify::LinePattern;
pub use metrics::{MetadataMask, ParseMetrics, UnclosedRecord};
