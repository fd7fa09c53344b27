//! Command line argument parser
use crate::backend::Backend;
use crate::emit::OutputFormat;
use crate::layout::ColumnLayout;
use crate::matcher::{MatchOptions, DEFAULT_CHUNK_SIZE};
use clap::Parser;

/// Find lncRNA/probe positional overlap between two BED files.
///
/// File B is held in memory while file A is streamed in chunks, so pass the
/// larger file as A.
#[derive(Parser)]
#[command(version)]
pub struct ArgParser {
    /// streamed bed file (chrom\tstart\tstop\tname\tscore\tstrand)
    #[arg(short = 'a', long = "input-a", default_value = "data/probes.bed")]
    pub input_a: std::path::PathBuf,

    /// bed file loaded into memory
    #[arg(short = 'b', long = "input-b", default_value = "data/lncrnas.bed")]
    pub input_b: std::path::PathBuf,

    /// matched features of file A
    #[arg(short = 'A', long = "output-a", default_value = "data/probes.overlap.bed")]
    pub output_a: std::path::PathBuf,

    /// matched features of file B
    #[arg(short = 'B', long = "output-b", default_value = "data/lncrnas.overlap.bed")]
    pub output_b: std::path::PathBuf,

    /// combined overlap file
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,

    /// combined overlap file (when --output is not given)
    #[arg(value_name = "OUTPUT")]
    pub positional_output: Option<std::path::PathBuf>,

    /// only consider this chromosome
    #[arg(short = 'c', long = "chromosome")]
    pub chromosome: Option<String>,

    /// rows of file A per chunk
    #[arg(short = 'z', long = "chunksize", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// make features of A the keys of the overlap file
    #[arg(short, long, default_value_t = false)]
    pub swap: bool,

    /// file B is sorted by chromosome then start (sort -k1,1 -k2,2n)
    #[arg(short = 'd', long = "input-sorted", default_value_t = false)]
    pub input_sorted: bool,

    /// combined overlap file layout
    #[arg(value_enum, long, default_value_t = OutputFormat::Xml)]
    pub format: OutputFormat,

    /// overlap strategy
    #[arg(value_enum, long, default_value_t = Backend::Native)]
    pub backend: Backend,

    /// write features of A without any match here
    #[arg(long = "no-match-a")]
    pub no_match_a: Option<std::path::PathBuf>,

    /// write features of B without any match here
    #[arg(long = "no-match-b")]
    pub no_match_b: Option<std::path::PathBuf>,

    /// output json summary of the run
    #[arg(long)]
    pub summary: Option<std::path::PathBuf>,

    /// column delimiter
    #[arg(long, default_value_t = '\t')]
    pub delimiter: char,

    #[arg(long = "chrom-col", default_value_t = 0)]
    pub chrom_col: usize,

    #[arg(long = "start-col", default_value_t = 1)]
    pub start_col: usize,

    #[arg(long = "stop-col", default_value_t = 2)]
    pub stop_col: usize,

    #[arg(long = "name-col", default_value_t = 3)]
    pub name_col: usize,

    #[arg(long = "strand-col", default_value_t = 5)]
    pub strand_col: usize,

    /// debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

pub const DEFAULT_OUTPUT: &str = "data/overlap.xml";

impl ArgParser {
    /// --output wins over the positional output
    pub fn output_path(&self) -> std::path::PathBuf {
        self.output
            .clone()
            .or_else(|| self.positional_output.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT.into())
    }

    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout {
            delimiter: self.delimiter,
            chrom_col: self.chrom_col,
            start_col: self.start_col,
            stop_col: self.stop_col,
            name_col: self.name_col,
            strand_col: self.strand_col,
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            chrom_filter: self.chromosome.clone(),
            chunk_size: self.chunk_size,
            swap: self.swap,
            input_sorted: self.input_sorted,
            layout: self.layout(),
        }
    }

    /// Validate command line arguments
    pub fn validate(&self) -> bool {
        let mut is_ok = true;
        if !self.input_a.is_file() {
            error!("-a file {} doesn't exist", self.input_a.display());
            is_ok = false;
        }
        if !self.input_b.is_file() {
            error!("-b file {} doesn't exist", self.input_b.display());
            is_ok = false;
        }

        if self.chunk_size < 1 {
            error!("--chunksize must be at least 1");
            is_ok = false;
        }

        if !self.layout().is_distinct() {
            error!("column positions must all differ");
            is_ok = false;
        }

        if self.output.is_some() && self.positional_output.is_some() {
            warn!("both --output and a positional output given; using --output");
        }

        if self.backend == Backend::Bedtools {
            warn!(
                "the bedtools backend writes tab-separated pairs to {}; --format {:?} is ignored",
                self.output_path().display(),
                self.format
            );
            if self.input_sorted {
                warn!("--input-sorted has no effect with the bedtools backend");
            }
            if self.no_match_a.is_some() || self.no_match_b.is_some() {
                warn!("--no-match-a/--no-match-b are ignored by the bedtools backend");
            }
        }

        is_ok
    }
}
