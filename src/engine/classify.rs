//! Line classification.
//!
//! A line's *class* is decided by its first character alone; within a class,
//! an ordered list of [`LinePattern`]s is tried and the first match wins.
//!
//! ```text
//! ' '  ── Timing ──┬─ game record:  task → marked → event → named → total time
//!                  └─ otherwise:    event → total time
//! '#'  ── Metadata ─── version → entities → living entities
//! else ── Other ────── source → sample time
//! ```
//!
//! Order matters: the named shape accepts almost any `<label> Time: ...` line,
//! so it sits behind the task and event shapes. Only `** `-marked lines, which
//! the event shape would otherwise swallow marker and all, go to it first.

use super::patterns;
use crate::{Source, Timing};

/// Coarse line class, from the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LineClass {
    Timing,
    Metadata,
    Other,
}

impl LineClass {
    pub fn of(line: &str) -> Self {
        if line.starts_with(' ') {
            LineClass::Timing
        } else if line.starts_with('#') {
            LineClass::Metadata
        } else {
            LineClass::Other
        }
    }
}

/// A typed value extracted from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entry {
    Timing(Timing),
    TotalTime(u64),
    Version(String),
    Entities(u64),
    LivingEntities(u64),
    Source(Source),
    SampleTime(u64),
}

/// Outcome of classifying a line. `Unrecognized` lines are skipped by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classified {
    Matched { pattern: &'static str, entry: Entry },
    Unrecognized,
}

/// A named extractor. `extract` returns `None` to pass the line on to the next pattern.
pub(crate) struct LinePattern {
    pub name: &'static str,
    pub extract: fn(&str) -> Option<Entry>,
}

impl std::fmt::Debug for LinePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinePattern").field("name", &self.name).field("extract", &"<function>").finish()
    }
}

static GAME_TIMING_PATTERNS: &[LinePattern] = &[
    line_pattern!(name: "task_timing", extract: patterns::task_timing),
    line_pattern!(name: "marked_timing", extract: patterns::marked_timing),
    line_pattern!(name: "event_timing", extract: patterns::event_timing),
    line_pattern!(name: "named_timing", extract: patterns::named_timing),
    line_pattern!(name: "total_time", extract: patterns::total_time),
];

static TIMING_PATTERNS: &[LinePattern] = &[
    line_pattern!(name: "event_timing", extract: patterns::event_timing),
    line_pattern!(name: "total_time", extract: patterns::total_time),
];

static METADATA_PATTERNS: &[LinePattern] = &[
    line_pattern!(name: "version", extract: patterns::version),
    line_pattern!(name: "entities", extract: patterns::entities),
    line_pattern!(name: "living_entities", extract: patterns::living_entities),
];

static OTHER_PATTERNS: &[LinePattern] = &[
    line_pattern!(name: "source", extract: patterns::source),
    line_pattern!(name: "sample_time", extract: patterns::sample_time),
];

/// The ordered pattern list for `class`. Timing lines inside a game record
/// additionally accept task and named shapes.
pub(crate) fn patterns_for(class: LineClass, in_game_record: bool) -> &'static [LinePattern] {
    match class {
        LineClass::Timing if in_game_record => GAME_TIMING_PATTERNS,
        LineClass::Timing => TIMING_PATTERNS,
        LineClass::Metadata => METADATA_PATTERNS,
        LineClass::Other => OTHER_PATTERNS,
    }
}

/// Try each pattern for `class` in order and return the first match.
pub(crate) fn classify(line: &str, class: LineClass, in_game_record: bool) -> Classified {
    patterns_for(class, in_game_record)
        .iter()
        .find_map(|p| (p.extract)(line).map(|entry| Classified::Matched { pattern: p.name, entry }))
        .unwrap_or(Classified::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_name(line: &str, in_game_record: bool) -> Option<&'static str> {
        match classify(line, LineClass::of(line), in_game_record) {
            Classified::Matched { pattern, .. } => Some(pattern),
            Classified::Unrecognized => None,
        }
    }

    #[test]
    fn class_by_first_character() {
        assert_eq!(LineClass::of("    Total time 1"), LineClass::Timing);
        assert_eq!(LineClass::of("# Version 1"), LineClass::Metadata);
        assert_eq!(LineClass::of("Minecraft"), LineClass::Other);
        assert_eq!(LineClass::of(""), LineClass::Other);
        assert_eq!(LineClass::of("\tTotal time 1"), LineClass::Other);
    }

    #[test]
    fn first_match_wins() {
        let cases: Vec<(&str, bool, Option<&str>)> = vec![
            ("    Task: A 1 Id:(interval:20) Time: 5 Count: 1 Avg: 5 Violations: 0", true, Some("task_timing")),
            ("    Task: A 1 Id:(interval:20) Time: 5 Count: 1 Avg: 5 Violations: 0", false, None),
            ("    EventName Time: 10 Count: 2 Avg: 5 Violations: 0", true, Some("event_timing")),
            ("    EventName Time: 10 Count: 2 Avg: 5 Violations: 0", false, Some("event_timing")),
            ("    ** tick(x) Time: 1 Count: 1 Avg: 1 Violations: 0", true, Some("marked_timing")),
            ("    ** tick Time: 1 Count: 1 Avg: 1 Violations: 0", true, Some("marked_timing")),
            ("    tick(x) Time: 1 Count: 1 Avg: 1 Violations: 0", true, Some("named_timing")),
            ("    ** tick(x) Time: 1 Count: 1 Avg: 1 Violations: 0", false, None),
            ("    Total time 15", true, Some("total_time")),
            ("    Total time 15", false, Some("total_time")),
            ("    garbage", true, None),
            ("# Version 1.20", false, Some("version")),
            ("# Entities 10", false, Some("entities")),
            ("# LivingEntities 3", false, Some("living_entities")),
            ("# Chunks 3", false, None),
            ("Minecraft", false, Some("source")),
            ("PluginA 1.0", false, Some("source")),
            ("My Plugin v2", false, Some("source")),
            ("Sample time 1000", false, Some("sample_time")),
            ("", false, None),
        ];

        for (line, in_game, expected) in cases {
            assert_eq!(pattern_name(line, in_game), expected, "line: {line:?} in_game: {in_game}");
        }
    }
}
