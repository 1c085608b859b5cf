//! Parse run metrics.
//!
//! The builder always collects these; they are cheap counters. `parse` throws
//! them away, `parse_verbose_with` hands them back so a caller can tell a clean
//! report from one that had skipped lines or an unclosed trailing record.

use super::classify::LineClass;
use std::time::Duration;

bitflags::bitflags! {
    /// Which report-wide lines were seen during the pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MetadataMask: u8 {
        const VERSION         = 1 << 0;
        const ENTITIES        = 1 << 1;
        const LIVING_ENTITIES = 1 << 2;
        const SAMPLE_TIME     = 1 << 3;
    }
}

impl Default for MetadataMask {
    fn default() -> Self {
        MetadataMask::empty()
    }
}

impl MetadataMask {
    /// True when every `#` header line was present.
    pub fn has_full_header(self) -> bool {
        self.contains(MetadataMask::VERSION | MetadataMask::ENTITIES | MetadataMask::LIVING_ENTITIES)
    }
}

/// Summary of a record still open when the input ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnclosedRecord {
    /// 1-based line of the source line that opened it, if any.
    pub opened_at: Option<usize>,
    pub timings: usize,
    /// Whether it was kept (`Options::keep_unclosed`) rather than dropped.
    pub kept: bool,
}

#[derive(Debug, Default, Clone)]
pub struct ParseMetrics {
    /// Total elapsed time for the pass.
    pub total: Duration,
    /// Number of lines after line-ending normalization.
    pub lines: usize,
    pub timing_lines: usize,
    pub metadata_lines: usize,
    pub other_lines: usize,
    /// 1-based numbers of lines that matched no pattern (blank lines excluded).
    pub skipped: Vec<usize>,
    /// Records closed by a `Total time` line.
    pub closed_by_total: usize,
    /// Records closed because a metadata line followed them.
    pub closed_by_metadata: usize,
    pub unclosed: Option<UnclosedRecord>,
    pub seen: MetadataMask,
}

impl ParseMetrics {
    pub(crate) fn count_line(&mut self, class: LineClass) {
        self.lines += 1;
        match class {
            LineClass::Timing => self.timing_lines += 1,
            LineClass::Metadata => self.metadata_lines += 1,
            LineClass::Other => self.other_lines += 1,
        }
    }
}
