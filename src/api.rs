use crate::engine::{self, MetadataMask, ParseMetrics, UnclosedRecord};
use crate::{Error, Report};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Options that affect record assembly.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Keep a record that is still open at the end of the input instead of
    /// dropping it.
    ///
    /// Reports written by the server tool always close their last record, so a
    /// trailing open record usually means a truncated file. It is dropped by
    /// default to stay compatible with existing consumers.
    pub keep_unclosed: bool,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub report: Report,
    pub details: ParseDetails,
}

/// What happened during a parse, beyond the report itself.
#[derive(Debug, Clone)]
pub struct ParseDetails {
    /// Total elapsed time.
    pub elapsed: Duration,
    pub lines: usize,
    pub timing_lines: usize,
    pub metadata_lines: usize,
    pub other_lines: usize,
    /// 1-based numbers of non-blank lines that matched no pattern.
    pub skipped_lines: Vec<usize>,
    pub closed_by_total: usize,
    pub closed_by_metadata: usize,
    /// Set when the input ended inside a record.
    pub unclosed: Option<UnclosedRecord>,
    /// Report-wide lines that were present.
    pub seen: MetadataMask,
}

impl ParseDetails {
    /// True when no line was skipped and no record was left open.
    pub fn is_clean(&self) -> bool {
        self.skipped_lines.is_empty() && self.unclosed.is_none()
    }
}

impl From<ParseMetrics> for ParseDetails {
    fn from(m: ParseMetrics) -> Self {
        ParseDetails {
            elapsed: m.total,
            lines: m.lines,
            timing_lines: m.timing_lines,
            metadata_lines: m.metadata_lines,
            other_lines: m.other_lines,
            skipped_lines: m.skipped,
            closed_by_total: m.closed_by_total,
            closed_by_metadata: m.closed_by_metadata,
            unclosed: m.unclosed,
            seen: m.seen,
        }
    }
}

/// Parse report `text` with default [`Options`].
///
/// Never fails: lines that match no known shape are skipped, and a record
/// still open at the end of the input is dropped.
///
/// # Example
/// ```
/// use timings_report::{Source, parse};
///
/// let report = parse("# Version 1.20\nMinecraft\n    Total time 15\n");
/// assert_eq!(report.version.as_deref(), Some("1.20"));
/// assert_eq!(report.records[0].source, Some(Source::Game));
/// assert_eq!(report.records[0].time, Some(15));
/// ```
pub fn parse(text: &str) -> Report {
    parse_with(text, &Options::default())
}

pub fn parse_with(text: &str, options: &Options) -> Report {
    engine::run(text, options).report
}

/// Parse `text` and also return [`ParseDetails`] (line counts, skipped lines,
/// record closures).
pub fn parse_verbose_with(text: &str, options: &Options) -> ParseResult {
    let run = engine::run(text, options);
    ParseResult { report: run.report, details: run.metrics.into() }
}

/// Read the whole of `reader` as text.
///
/// Invalid UTF-8 is replaced rather than rejected; the parser skips whatever
/// it cannot recognize anyway.
pub fn read_text<R: Read>(mut reader: R) -> Result<String, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Read and parse a report from `reader`. Only I/O can fail.
pub fn parse_reader<R: Read>(reader: R, options: &Options) -> Result<Report, Error> {
    let text = read_text(reader)?;
    Ok(parse_with(&text, options))
}

/// Read and parse the report at `path`.
pub fn parse_file(path: impl AsRef<Path>, options: &Options) -> Result<Report, Error> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| Error::ReadFile { path: path.to_path_buf(), source })?;
    let text = read_text(file).map_err(|err| match err {
        Error::Io(source) => Error::ReadFile { path: path.to_path_buf(), source },
        other => other,
    })?;
    Ok(parse_with(&text, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;

    const REPORT: &str = "# Version 1.20\n\
                          Sample time 1000\n\
                          Minecraft\n    \
                          Tick Time: 4 Count: 2 Avg: 2 Violations: 0\n    \
                          Total time 4\n\
                          WorldEdit 7.2\n    \
                          what is this\n    \
                          PlayerMoveEvent Time: 3 Count: 1 Avg: 3 Violations: 0\n";

    #[test]
    fn parse_verbose_reports_skips_and_unclosed() {
        let res = parse_verbose_with(REPORT, &Options::default());

        assert_eq!(res.report.records.len(), 1);
        assert_eq!(res.details.skipped_lines, vec![7]);
        assert_eq!(res.details.closed_by_total, 1);
        assert_eq!(res.details.closed_by_metadata, 0);
        assert_eq!(res.details.unclosed, Some(UnclosedRecord { opened_at: Some(6), timings: 1, kept: false }));
        assert!(res.details.seen.contains(MetadataMask::VERSION | MetadataMask::SAMPLE_TIME));
        assert!(!res.details.seen.has_full_header());
        assert!(!res.details.is_clean());
        assert_eq!(res.details.lines, 9);
        assert_eq!(res.details.timing_lines, 4);
        assert_eq!(res.details.metadata_lines, 1);
        assert_eq!(res.details.other_lines, 4);
    }

    #[test]
    fn keep_unclosed_pushes_trailing_record() {
        let report = parse_with(REPORT, &Options { keep_unclosed: true });

        assert_eq!(report.records.len(), 2);
        let last = &report.records[1];
        assert_eq!(last.source, Some(Source::Plugin { name: "WorldEdit".into(), version: "7.2".into() }));
        assert_eq!(last.time, None);
        assert_eq!(last.timings.len(), 1);
    }

    #[test]
    fn read_text_replaces_invalid_utf8() {
        let bytes: &[u8] = b"# Version caf\xe9\nMinecraft\n    Total time 1\n";
        let report = parse_reader(bytes, &Options::default()).unwrap();

        assert_eq!(report.version.as_deref(), Some("caf\u{FFFD}"));
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn parse_file_reports_missing_path() {
        let err = parse_file("/definitely/not/here/timings.txt", &Options::default()).unwrap_err();
        match err {
            Error::ReadFile { path, source } => {
                assert_eq!(path, Path::new("/definitely/not/here/timings.txt"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("timings-report-{}.txt", std::process::id()));
        std::fs::write(&path, "# Entities 4\r\nMinecraft\r\n    Total time 2\r\n").unwrap();

        let report = parse_file(&path, &Options::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(report.entities, Some(4));
        assert_eq!(report.records[0].time, Some(2));
    }
}
