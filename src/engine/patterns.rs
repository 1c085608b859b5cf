//! Line patterns.
//!
//! Every recognizable line shape has one extractor here: a function from the
//! raw line to `Option<Entry>`. An extractor returns `None` when the shape does
//! not match *or* when a captured number does not fit a `u64`; either way the
//! classifier moves on to the next pattern in its list.
//!
//! The shapes, as they appear in a report:
//!
//! ```text
//! # Version git-Spigot-1.20                       version
//! # Entities 812                                  entities
//! # LivingEntities 377                            living
//! Sample time 1000                                sample_time
//! Minecraft                                       source (game)
//! Essentials 2.19.7                               source (plugin)
//!     Task: Essentials 2.19.7 Id:(interval:20) Time: 5 Count: 1 Avg: 5 Violations: 0
//!     PlayerMoveEvent (and others) Time: 10 Count: 2 Avg: 5 Violations: 0
//!     ** tickEntity - EntityPlayer(nms) Time: 4 Count: 2 Avg: 2 Violations: 0
//!     Total time 15
//! ```

use super::classify::Entry;
use crate::{EventTiming, NamedTiming, Source, TaskTiming, Timing, TimingStats};
use regex::Captures;

/// Read the shared `Time/Count/Avg/Violations` suffix starting at group `first`.
fn stats_from(caps: &Captures<'_>, first: usize) -> Option<TimingStats> {
    Some(TimingStats {
        time: capture_u64!(caps, first),
        count: capture_u64!(caps, first + 1),
        average: capture_u64!(caps, first + 2),
        violations: capture_u64!(caps, first + 3),
    })
}

// --- Timing lines ------------------------------------------------------------

/// `Task: <name> <version> Id:(interval:N) ...` or `... Id:(Single) ...`.
///
/// The task's owner is split on the last space before `Id:`, so plugin names
/// may contain spaces but versions may not.
pub(crate) fn task_timing(line: &str) -> Option<Entry> {
    let caps = regex!(
        r"^\s*Task: (.*) (.*) Id:\((?:interval:(\d+)|Single)\) Time: (\d+) Count: (\d+) Avg: (\d+) Violations: (\d+)"
    )
    .captures(line)?;

    let interval = match caps.get(3) {
        Some(m) => Some(m.as_str().parse::<u64>().ok()?),
        None => None,
    };

    Some(Entry::Timing(Timing::Task(TaskTiming {
        source: Source::Plugin { name: caps[1].to_string(), version: caps[2].to_string() },
        interval,
        stats: stats_from(&caps, 4)?,
    })))
}

/// `<name>[ (and others)] Time: ...`. The name may not contain `(`.
pub(crate) fn event_timing(line: &str) -> Option<Entry> {
    let caps = regex!(
        r"^\s*([^(]+)(?: (\(and others\)))? Time: (\d+) Count: (\d+) Avg: (\d+) Violations: (\d+)"
    )
    .captures(line)?;

    Some(Entry::Timing(Timing::Event(EventTiming {
        name: caps[1].to_string(),
        group: caps.get(2).is_some(),
        stats: stats_from(&caps, 3)?,
    })))
}

/// A `** `-marked line. Marked lines are game internals, never events, so this
/// runs ahead of the event shape in game records and strips the marker.
pub(crate) fn marked_timing(line: &str) -> Option<Entry> {
    let caps = regex!(r"^\s*\*\* (.*) Time: (\d+) Count: (\d+) Avg: (\d+) Violations: (\d+)").captures(line)?;

    Some(Entry::Timing(Timing::Named(NamedTiming { name: caps[1].to_string(), stats: stats_from(&caps, 2)? })))
}

/// Anything followed by the stats suffix, with an optional `** ` marker.
pub(crate) fn named_timing(line: &str) -> Option<Entry> {
    let caps = regex!(r"^\s*(?:\*\* )?(.*) Time: (\d+) Count: (\d+) Avg: (\d+) Violations: (\d+)").captures(line)?;

    Some(Entry::Timing(Timing::Named(NamedTiming { name: caps[1].to_string(), stats: stats_from(&caps, 2)? })))
}

pub(crate) fn total_time(line: &str) -> Option<Entry> {
    let caps = regex!(r"^\s*Total time (\d+)").captures(line)?;
    Some(Entry::TotalTime(capture_u64!(caps, 1)))
}

// --- Metadata lines ----------------------------------------------------------

pub(crate) fn version(line: &str) -> Option<Entry> {
    let caps = regex!(r"^# Version (.*)").captures(line)?;
    Some(Entry::Version(caps[1].to_string()))
}

pub(crate) fn entities(line: &str) -> Option<Entry> {
    let caps = regex!(r"^# Entities (\d+)").captures(line)?;
    Some(Entry::Entities(capture_u64!(caps, 1)))
}

pub(crate) fn living_entities(line: &str) -> Option<Entry> {
    let caps = regex!(r"^# LivingEntities (\d+)").captures(line)?;
    Some(Entry::LivingEntities(capture_u64!(caps, 1)))
}

// --- Source / sample lines ---------------------------------------------------

/// A bare `Minecraft`, or `<name> <version>` split on the last space.
///
/// Plugin names may contain spaces; versions may not. A `Sample time N` line
/// would fit the plugin shape too, so it is left for [`sample_time`].
pub(crate) fn source(line: &str) -> Option<Entry> {
    if sample_time(line).is_some() {
        return None;
    }
    let caps = regex!(r"^(?:(Minecraft)|(\S.*) (\S+))\s*$").captures(line)?;

    if caps.get(1).is_some() {
        return Some(Entry::Source(Source::Game));
    }
    Some(Entry::Source(Source::Plugin { name: caps[2].to_string(), version: caps[3].to_string() }))
}

pub(crate) fn sample_time(line: &str) -> Option<Entry> {
    let caps = regex!(r"^Sample time (\d+)").captures(line)?;
    Some(Entry::SampleTime(capture_u64!(caps, 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(time: u64, count: u64, average: u64, violations: u64) -> TimingStats {
        TimingStats { time, count, average, violations }
    }

    #[test]
    fn task_with_interval() {
        let entry = task_timing("    Task: PluginA 1.0 Id:(interval:20) Time: 5 Count: 1 Avg: 5 Violations: 0").unwrap();
        assert_eq!(
            entry,
            Entry::Timing(Timing::Task(TaskTiming {
                source: Source::Plugin { name: "PluginA".into(), version: "1.0".into() },
                interval: Some(20),
                stats: stats(5, 1, 5, 0),
            }))
        );
    }

    #[test]
    fn task_single_has_no_interval() {
        let Some(Entry::Timing(Timing::Task(task))) =
            task_timing("    Task: PluginA 1.0 Id:(Single) Time: 7 Count: 1 Avg: 7 Violations: 1")
        else {
            panic!("expected a task timing");
        };
        assert_eq!(task.interval, None);
        assert_eq!(task.stats, stats(7, 1, 7, 1));
    }

    #[test]
    fn task_owner_splits_on_last_space() {
        let Some(Entry::Timing(Timing::Task(task))) =
            task_timing("    Task: My Plugin v2 Id:(interval:1) Time: 1 Count: 1 Avg: 1 Violations: 0")
        else {
            panic!("expected a task timing");
        };
        assert_eq!(task.source, Source::Plugin { name: "My Plugin".into(), version: "v2".into() });
    }

    #[test]
    fn event_group_marker() {
        let cases: Vec<(&str, &str, bool)> = vec![
            ("    PlayerMoveEvent Time: 10 Count: 2 Avg: 5 Violations: 0", "PlayerMoveEvent", false),
            ("    PlayerMoveEvent (and others) Time: 10 Count: 2 Avg: 5 Violations: 0", "PlayerMoveEvent", true),
            ("    Block Break Event Time: 10 Count: 2 Avg: 5 Violations: 0", "Block Break Event", false),
        ];

        for (line, name, group) in cases {
            let Some(Entry::Timing(Timing::Event(event))) = event_timing(line) else {
                panic!("expected an event timing for {line:?}");
            };
            assert_eq!(event.name, name, "line: {line}");
            assert_eq!(event.group, group, "line: {line}");
            assert_eq!(event.stats, stats(10, 2, 5, 0));
        }
    }

    #[test]
    fn event_rejects_parenthesized_names() {
        assert!(event_timing("    ** tickEntity - EntityPlayer(nms) Time: 4 Count: 2 Avg: 2 Violations: 0").is_none());
        assert!(event_timing("    Task: A 1 Id:(Single) Time: 4 Count: 2 Avg: 2 Violations: 0").is_none());
    }

    #[test]
    fn named_strips_marker() {
        let Some(Entry::Timing(Timing::Named(named))) =
            named_timing("    ** tickEntity - EntityPlayer(nms) Time: 4 Count: 2 Avg: 2 Violations: 0")
        else {
            panic!("expected a named timing");
        };
        assert_eq!(named.name, "tickEntity - EntityPlayer(nms)");
    }

    #[test]
    fn oversized_numbers_do_not_match() {
        let line = "    Tick Time: 99999999999999999999999 Count: 1 Avg: 1 Violations: 0";
        assert!(event_timing(line).is_none());
        assert!(named_timing(line).is_none());
        assert!(total_time("    Total time 99999999999999999999999").is_none());
    }

    #[test]
    fn metadata_lines() {
        assert_eq!(version("# Version git-Spigot-1.20"), Some(Entry::Version("git-Spigot-1.20".into())));
        assert_eq!(entities("# Entities 812"), Some(Entry::Entities(812)));
        assert_eq!(living_entities("# LivingEntities 377"), Some(Entry::LivingEntities(377)));
        assert_eq!(entities("# LivingEntities 377"), None);
        assert_eq!(version("# Chunks 12"), None);
    }

    #[test]
    fn source_lines() {
        assert_eq!(source("Minecraft"), Some(Entry::Source(Source::Game)));
        assert_eq!(
            source("Essentials 2.19.7"),
            Some(Entry::Source(Source::Plugin { name: "Essentials".into(), version: "2.19.7".into() }))
        );
        assert_eq!(
            source("My Plugin v2"),
            Some(Entry::Source(Source::Plugin { name: "My Plugin".into(), version: "v2".into() }))
        );
        assert_eq!(source("Sample time 1000"), None);
        assert_eq!(source("Sample time 1000 (1s)"), None);
        assert_eq!(source(""), None);
        assert_eq!(source("Lonely"), None);
        assert_eq!(source("\tIndented by tab"), None);
    }

    #[test]
    fn marked_requires_marker() {
        let Some(Entry::Timing(Timing::Named(named))) =
            marked_timing("    ** tickTileEntity Time: 4 Count: 2 Avg: 2 Violations: 0")
        else {
            panic!("expected a named timing");
        };
        assert_eq!(named.name, "tickTileEntity");
        assert!(marked_timing("    tickTileEntity Time: 4 Count: 2 Avg: 2 Violations: 0").is_none());
    }

    #[test]
    fn sample_and_total_time() {
        assert_eq!(sample_time("Sample time 1000"), Some(Entry::SampleTime(1000)));
        assert_eq!(sample_time("Sample time 1000 (1s)"), Some(Entry::SampleTime(1000)));
        assert_eq!(total_time("    Total time 15 (0.0s)"), Some(Entry::TotalTime(15)));
        assert_eq!(total_time("    Total time n/a"), None);
    }
}
