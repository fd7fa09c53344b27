//! In-memory index of the fully loaded side, bucketed by chromosome then strand
use std::collections::HashMap;
use std::path::Path;

use crate::error::{OverlapError, Result};
use crate::interval::{Interval, Strand};
use crate::layout::{is_skippable, ColumnLayout};

pub type StrandBuckets = HashMap<Strand, Vec<Interval>>;

/// `chrom -> strand -> intervals`, in file order. Built once before matching
/// and only read afterwards.
#[derive(Default, Debug)]
pub struct PartitionIndex {
    buckets: HashMap<String, StrandBuckets>,
    len: usize,
}

impl PartitionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `lines` into an index. Rows off `chrom_filter` are dropped
    /// before insertion. Any unparseable coordinate aborts the build.
    pub fn build<I, E>(
        lines: I,
        path: &Path,
        layout: &ColumnLayout,
        chrom_filter: Option<&str>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = std::result::Result<String, E>>,
        E: Into<std::io::Error>,
    {
        let mut index = PartitionIndex::new();
        let mut num_filtered = 0;
        for (i, line) in lines.into_iter().enumerate() {
            let line = line.map_err(|e| OverlapError::io(path, e.into()))?;
            if is_skippable(&line) {
                continue;
            }
            if let Some(chrom) = chrom_filter {
                if layout.chrom_of(&line) != Some(chrom) {
                    num_filtered += 1;
                    continue;
                }
            }
            index.insert(layout.parse(&line, path, i + 1)?);
        }
        if chrom_filter.is_some() {
            debug!("{} rows of {} outside chromosome filter", num_filtered, path.display());
        }
        Ok(index)
    }

    /// Get-or-create the bucket for `(chrom, strand)`
    pub fn bucket_mut(&mut self, chrom: &str, strand: Strand) -> &mut Vec<Interval> {
        if !self.buckets.contains_key(chrom) {
            debug!("new chromosome bucket {}", chrom);
        }
        self.buckets
            .entry(chrom.to_string())
            .or_default()
            .entry(strand)
            .or_default()
    }

    pub fn insert(&mut self, iv: Interval) {
        let chrom = iv.chrom.clone();
        self.bucket_mut(&chrom, iv.strand).push(iv);
        self.len += 1;
    }

    /// Candidates sharing a chromosome and strand, `None` when that partition
    /// was never created.
    pub fn get(&self, chrom: &str, strand: Strand) -> Option<&[Interval]> {
        self.buckets
            .get(chrom)
            .and_then(|s| s.get(&strand))
            .map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_partitions(&self) -> usize {
        self.buckets.values().map(|s| s.len()).sum()
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(|k| k.as_str())
    }

    /// Every partition with its key
    pub fn partitions(&self) -> impl Iterator<Item = (&str, Strand, &[Interval])> {
        self.buckets.iter().flat_map(|(chrom, strands)| {
            strands
                .iter()
                .map(move |(strand, ivs)| (chrom.as_str(), *strand, ivs.as_slice()))
        })
    }

    /// Whether every partition is ascending by start, which the sorted fast
    /// path relies on.
    pub fn is_sorted_by_start(&self) -> bool {
        self.partitions()
            .all(|(_, _, ivs)| ivs.windows(2).all(|w| w[0].start <= w[1].start))
    }
}
