//! Chromosome features and the strict overlap test
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Plus,
    Minus,
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        })
    }
}

/// One genomic feature (a lncRNA or a probe).
///
/// Graph identity is the `name` alone: two features sharing a name are the
/// same entity to [`crate::graph::OverlapGraph`] even when their coordinates
/// disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub stop: u64,
    pub strand: Strand,
    pub name: String,
}

impl Interval {
    pub fn new(chrom: &str, start: u64, stop: u64, strand: Strand, name: &str) -> Self {
        Interval {
            chrom: chrom.to_string(),
            start,
            stop,
            strand,
            name: name.to_string(),
        }
    }

    /// True when the two spans share an interior point (see [`strict_overlap`]).
    /// Chromosome and strand are not compared; partitioning takes care of those.
    pub fn overlaps(&self, other: &Interval) -> bool {
        strict_overlap(self.start, self.stop, other.start, other.stop)
    }

    /// BED-6 row, score is always written as 0
    pub fn to_bed6(&self, delim: char) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}{d}0{d}{}",
            self.chrom,
            self.start,
            self.stop,
            self.name,
            self.strand,
            d = delim
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({}) {}",
            self.chrom, self.start, self.stop, self.strand, self.name
        )
    }
}

/// Four-case overlap test between `[a_start, a_stop]` and `[b_start, b_stop]`.
///
/// A match needs one endpoint strictly inside the other span:
///  1. b's start inside a
///  2. a's start inside b
///  3. b's stop inside a
///  4. a's stop inside b
///
/// Every comparison is strict, so touching spans (`a_stop == b_start`) and
/// even identical spans do not overlap.
#[inline]
pub fn strict_overlap(a_start: u64, a_stop: u64, b_start: u64, b_stop: u64) -> bool {
    (a_start < b_start && b_start < a_stop)
        || (b_start < a_start && a_start < b_stop)
        || (a_start < b_stop && b_stop < a_stop)
        || (b_start < a_stop && a_stop < b_stop)
}
