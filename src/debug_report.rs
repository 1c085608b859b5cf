use timings_report::{ParseDetails, Record, Report, Timing};

/// Timings listed per record before the rest are folded into "+N more".
const TOP_TIMINGS: usize = 5;

mod ansi {
    const RESET: &str = "\x1b[0m";

    /// What a piece of output *is*; the palette decides how it looks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Tone {
        Rule,
        Muted,
        Source,
        Kind,
        Measure,
        Good,
        Warn,
        Alert,
    }

    impl Tone {
        fn code(self) -> &'static str {
            match self {
                Tone::Rule => "\x1b[90m",
                Tone::Muted => "\x1b[2m",
                Tone::Source => "\x1b[1;36m",
                Tone::Kind => "\x1b[34m",
                Tone::Measure => "\x1b[33m",
                Tone::Good => "\x1b[32m",
                Tone::Warn => "\x1b[33m",
                Tone::Alert => "\x1b[1;31m",
            }
        }
    }

    /// Pick a tone for a violation count: none, a few, or many relative to `count`.
    pub fn violation_tone(violations: u64, count: u64) -> Tone {
        match violations {
            0 => Tone::Muted,
            v if v.saturating_mul(10) < count => Tone::Warn,
            _ => Tone::Alert,
        }
    }

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn tone(&self, s: impl AsRef<str>, tone: Tone) -> String {
            if self.enabled { format!("{}{}{RESET}", tone.code(), s.as_ref()) } else { s.as_ref().to_string() }
        }

        pub fn rule(&self, title: impl AsRef<str>) -> String {
            self.tone(format!("━━━ {} ━━━", title.as_ref()), Tone::Rule)
        }
    }
}

use ansi::Tone;

pub fn print_report(report: &Report, details: Option<&ParseDetails>, color: bool) {
    let palette = ansi::Palette::new(color);

    println!("\n{}", palette.rule("Report"));
    print_header(report, &palette);

    println!("\n{}", palette.rule(format!("Records ({})", report.records.len())));
    if report.records.is_empty() {
        println!("{}", palette.tone("  No records found", Tone::Muted));
        println!("\n{}", palette.tone("Possible reasons:", Tone::Warn));
        println!("  • Timing lines are not indented with spaces");
        println!("  • No source line (`Minecraft` or `<plugin> <version>`) precedes the timings");
        println!("  • The last record has no `Total time` line (try --keep-unclosed)");
    }
    for (idx, record) in report.records.iter().enumerate() {
        print_record(idx, record, &palette);
    }

    if let Some(details) = details {
        println!("\n{}", palette.rule("Parse"));
        print_details(details, &palette);
    }
    println!();
}

fn print_header(report: &Report, palette: &ansi::Palette) {
    let field = |label: &str, v: Option<String>| {
        let value = v.map(|v| palette.tone(v, Tone::Good)).unwrap_or_else(|| palette.tone("?", Tone::Muted));
        format!("{} {}", palette.tone(label, Tone::Muted), value)
    };

    println!("  {}", field("version:", report.version.clone()));
    println!(
        "  {}  {}  {}",
        field("entities:", report.entities.map(|n| n.to_string())),
        field("│ living:", report.living.map(|n| n.to_string())),
        field("│ sample time:", report.time.map(|n| n.to_string())),
    );
}

fn print_record(idx: usize, record: &Record, palette: &ansi::Palette) {
    let source = match &record.source {
        Some(source) => palette.tone(source.to_string(), Tone::Source),
        None => palette.tone("<no source>", Tone::Muted),
    };
    let time = match record.time {
        Some(time) => palette.tone(format!("total {time}"), Tone::Good),
        None => palette.tone("total ?", Tone::Muted),
    };
    let violations: u64 = record.timings.iter().map(|t| t.stats().violations).sum();

    println!(
        "  {} {} {} {} {}{}",
        palette.tone(format!("[{idx}]"), Tone::Rule),
        source,
        palette.tone("│", Tone::Muted),
        time,
        palette.tone(format!("│ {} timings", record.timings.len()), Tone::Muted),
        if violations > 0 { palette.tone(format!(" │ {violations} violations"), Tone::Alert) } else { String::new() },
    );

    let mut by_time: Vec<&Timing> = record.timings.iter().collect();
    by_time.sort_by(|a, b| b.stats().time.cmp(&a.stats().time));

    for timing in by_time.iter().take(TOP_TIMINGS) {
        println!("      {}", fmt_timing(timing, palette));
    }
    if by_time.len() > TOP_TIMINGS {
        println!("      {}", palette.tone(format!("... +{} more", by_time.len() - TOP_TIMINGS), Tone::Muted));
    }
}

fn fmt_timing(timing: &Timing, palette: &ansi::Palette) -> String {
    let stats = timing.stats();
    let kind = match timing {
        Timing::Event(_) => "event",
        Timing::Task(t) if t.interval.is_some() => "task",
        Timing::Task(_) => "task once",
        Timing::Named(_) => "named",
    };

    format!(
        "{} {} {} {} {}",
        palette.tone(format!("{:>8}", stats.time), Tone::Measure),
        palette.tone(format!("{kind:<9}"), Tone::Kind),
        timing.label(),
        palette.tone(format!("│ count {} avg {} │", stats.count, stats.average), Tone::Muted),
        palette.tone(format!("{} violations", stats.violations), ansi::violation_tone(stats.violations, stats.count)),
    )
}

fn print_details(details: &ParseDetails, palette: &ansi::Palette) {
    let muted = |s: &str| palette.tone(s, Tone::Muted);

    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        muted("lines:"),
        details.lines,
        muted("│ timing:"),
        details.timing_lines,
        muted("│ metadata:"),
        details.metadata_lines,
        muted("│ other:"),
        details.other_lines,
    );
    println!(
        "  {} {}  {} {}",
        muted("closed by total time:"),
        details.closed_by_total,
        muted("│ by metadata:"),
        details.closed_by_metadata,
    );

    if details.skipped_lines.is_empty() {
        println!("  {}", palette.tone("✓ no skipped lines", Tone::Good));
    } else {
        let shown: Vec<String> = details.skipped_lines.iter().take(10).map(|n| n.to_string()).collect();
        let more = details.skipped_lines.len().saturating_sub(shown.len());
        let suffix = if more > 0 { format!(" (+{more} more)") } else { String::new() };
        println!(
            "  {} {}{}",
            palette.tone(format!("✗ {} skipped lines:", details.skipped_lines.len()), Tone::Warn),
            shown.join(", "),
            suffix
        );
    }

    if let Some(unclosed) = &details.unclosed {
        let at = unclosed.opened_at.map(|n| format!("line {n}")).unwrap_or_else(|| "before any source".to_string());
        let fate = if unclosed.kept { "kept" } else { "dropped" };
        println!(
            "  {} {}",
            palette.tone(format!("! unclosed record at end of input ({at}, {} timings)", unclosed.timings), Tone::Warn),
            muted(fate),
        );
    }
    if !details.seen.has_full_header() {
        println!("  {}", palette.tone(format!("header lines seen: {:?}", details.seen), Tone::Muted));
    }

    println!("  {} {}", muted("elapsed:"), palette.tone(format!("{:?}", details.elapsed), Tone::Good));
}
