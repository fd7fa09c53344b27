//! Streaming overlap join of side A against an indexed side B
use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::chunks::Chunks;
use crate::error::{OverlapError, Result};
use crate::graph::OverlapGraph;
use crate::interval::{Interval, Strand};
use crate::io::{read_lines, FeatureSink};
use crate::layout::{is_skippable, ColumnLayout};
use crate::partition::PartitionIndex;

pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

#[derive(Clone, Debug, Serialize)]
pub struct MatchOptions {
    #[serde(rename = "chromosome")]
    pub chrom_filter: Option<String>,
    pub chunk_size: usize,
    /// false: B is the key feature, A the child. true: the reverse.
    pub swap: bool,
    /// Every B partition is ascending by start, so a scan can stop early.
    pub input_sorted: bool,
    #[serde(skip)]
    pub layout: ColumnLayout,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            chrom_filter: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            swap: false,
            input_sorted: false,
            layout: ColumnLayout::default(),
        }
    }
}

/// Everything a matching pass produced
#[derive(Debug)]
pub struct MatchOutcome {
    pub graph: OverlapGraph,
    pub matches: u64,
    pub chunks: usize,
    pub rows_a: usize,
    pub unmatched_a: usize,
    /// B features without a single match, ordered by position
    pub unmatched_b: Vec<Interval>,
}

/// Holds the read-only B index and accumulates the graph while A rows are
/// pushed through it.
pub struct OverlapMatcher<'a> {
    index: &'a PartitionIndex,
    opts: &'a MatchOptions,
    graph: OverlapGraph,
    matches: u64,
    // per partition, which B entries took part in a match
    hit_b: HashMap<(&'a str, Strand), Vec<bool>>,
}

impl<'a> OverlapMatcher<'a> {
    pub fn new(index: &'a PartitionIndex, opts: &'a MatchOptions) -> Self {
        OverlapMatcher {
            index,
            opts,
            graph: OverlapGraph::new(),
            matches: 0,
            hit_b: HashMap::new(),
        }
    }

    /// Test `a` against its (chromosome, strand) partition, recording every
    /// hit. A missing partition just means no matches.
    pub fn match_interval(&mut self, a: &Interval) -> usize {
        let index = self.index;
        let candidates = match index.get(&a.chrom, a.strand) {
            Some(c) => c,
            None => return 0,
        };
        let mut found = 0;
        for (j, b) in candidates.iter().enumerate() {
            if self.opts.input_sorted && a.stop < b.start {
                break;
            }
            // cheap reject for spans entirely apart
            if b.stop < a.start || a.stop < b.start {
                continue;
            }
            if !a.overlaps(b) {
                continue;
            }
            let (key, child) = if self.opts.swap {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            debug!("{} overlaps {}", a, b);
            self.graph.add_match(key, child);
            self.hit_b
                .entry((b.chrom.as_str(), b.strand))
                .or_insert_with(|| vec![false; candidates.len()])[j] = true;
            found += 1;
        }
        self.matches += found as u64;
        found
    }

    /// Stream A's raw `lines` chunk by chunk. Rows matching nothing go to
    /// `unmatched`. The first malformed row aborts the whole pass.
    pub fn run<I, E>(
        mut self,
        lines: I,
        path: &Path,
        unmatched: &mut dyn FeatureSink,
    ) -> Result<MatchOutcome>
    where
        I: IntoIterator<Item = std::result::Result<String, E>>,
        E: Into<std::io::Error>,
    {
        let opts = self.opts;
        let layout = &opts.layout;
        let chrom_filter = opts.chrom_filter.as_deref();
        let mut chunks = 0;
        let mut rows_a = 0;
        let mut unmatched_a = 0;

        #[cfg(feature = "progbars")]
        let bar = indicatif::ProgressBar::new_spinner();

        for chunk in Chunks::new(lines.into_iter().enumerate(), opts.chunk_size)? {
            chunks += 1;
            info!(
                "processing {} chunk {} (matches so far: {})",
                path.display(),
                chunks,
                self.matches
            );
            #[cfg(feature = "progbars")]
            bar.set_message(format!("chunk {} ({} matches)", chunks, self.matches));

            for (i, line) in chunk {
                let line = line.map_err(|e| OverlapError::io(path, e.into()))?;
                if is_skippable(&line) {
                    continue;
                }
                if let Some(chrom) = chrom_filter {
                    if layout.chrom_of(&line) != Some(chrom) {
                        continue;
                    }
                }
                let a = layout.parse(&line, path, i + 1)?;
                rows_a += 1;
                if self.match_interval(&a) == 0 {
                    unmatched_a += 1;
                    unmatched.accept(&a)?;
                }
            }
        }

        #[cfg(feature = "progbars")]
        bar.finish_and_clear();

        let unmatched_b = self.unmatched_b();
        info!(
            "{} matches across {} key features ({} chunks, {} rows of A)",
            self.matches,
            self.graph.len(),
            chunks,
            rows_a
        );
        Ok(MatchOutcome {
            graph: self.graph,
            matches: self.matches,
            chunks,
            rows_a,
            unmatched_a,
            unmatched_b,
        })
    }

    fn unmatched_b(&self) -> Vec<Interval> {
        let mut ret: Vec<Interval> = self
            .index
            .partitions()
            .flat_map(|(chrom, strand, ivs)| {
                let hits = self.hit_b.get(&(chrom, strand));
                ivs.iter()
                    .enumerate()
                    .filter(move |(j, _)| !hits.is_some_and(|h| h[*j]))
                    .map(|(_, iv)| iv.clone())
            })
            .collect();
        ret.sort_by(|x, y| {
            (&x.chrom, x.start, x.stop, &x.name).cmp(&(&y.chrom, y.start, y.stop, &y.name))
        });
        ret
    }
}

/// Index `input_b`, then stream `input_a` through the matcher.
pub fn find_overlaps(
    input_a: &Path,
    input_b: &Path,
    opts: &MatchOptions,
    unmatched_a: &mut dyn FeatureSink,
) -> Result<MatchOutcome> {
    if opts.chunk_size == 0 {
        return Err(OverlapError::InvalidChunkSize(opts.chunk_size));
    }
    info!("reading {} into memory", input_b.display());
    if let Some(chrom) = &opts.chrom_filter {
        info!("including only chromosome {}", chrom);
    }
    let index = PartitionIndex::build(
        read_lines(input_b)?,
        input_b,
        &opts.layout,
        opts.chrom_filter.as_deref(),
    )?;
    info!(
        "indexed {} features in {} partitions",
        index.len(),
        index.num_partitions()
    );
    if opts.input_sorted && !index.is_sorted_by_start() {
        warn!(
            "{} is not sorted by start; --input-sorted may miss overlaps",
            input_b.display()
        );
    }

    info!("computing overlap of {} with {}", input_a.display(), input_b.display());
    let lines = read_lines(input_a)?;
    OverlapMatcher::new(&index, opts).run(lines, input_a, unmatched_a)
}
