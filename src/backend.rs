//! Interchangeable ways of computing the overlap of two inputs
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{OverlapError, Result};
use crate::io::{create_output, create_path_to_file, read_lines, remove_if_present, write_bed, BedWriter, NullSink};
use crate::layout::{is_skippable, ColumnLayout};
use crate::matcher::{find_overlaps, MatchOptions, MatchOutcome};

pub const BEDTOOLS_ENV_BIN: &str = "LNCOVERLAP_BEDTOOLS";
const DEFAULT_BEDTOOLS_BIN: &str = "bedtools";
const SORT_BIN: &str = "sort";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    // chunked matcher building the key -> children graph
    Native,
    // delegate to `bedtools intersect`, pairs only
    Bedtools,
}

pub enum OverlapResult {
    Graph(MatchOutcome),
    /// Pairs of overlapping features written by an external tool, key
    /// feature columns first.
    PairFile { path: PathBuf, pairs: usize },
}

pub trait OverlapBackend {
    fn compute_overlap(
        &self,
        input_a: &Path,
        input_b: &Path,
        opts: &MatchOptions,
    ) -> Result<OverlapResult>;
}

/// The in-process chunked matcher. Optionally lists features of either side
/// that matched nothing.
#[derive(Default)]
pub struct NativeBackend {
    pub no_match_a: Option<PathBuf>,
    pub no_match_b: Option<PathBuf>,
}

impl OverlapBackend for NativeBackend {
    fn compute_overlap(
        &self,
        input_a: &Path,
        input_b: &Path,
        opts: &MatchOptions,
    ) -> Result<OverlapResult> {
        let outcome = match &self.no_match_a {
            Some(path) => {
                let mut sink = BedWriter::create(path)?;
                let outcome = find_overlaps(input_a, input_b, opts, &mut sink)?;
                let n = sink.finish()?;
                info!("wrote {} unmatched features to {}", n, path.display());
                outcome
            }
            None => find_overlaps(input_a, input_b, opts, &mut NullSink)?,
        };
        if let Some(path) = &self.no_match_b {
            write_bed(&outcome.unmatched_b, path)?;
        }
        Ok(OverlapResult::Graph(outcome))
    }
}

/// Hands both inputs, filtered, cut to BED-6 and sorted, to
/// `bedtools intersect`.
pub struct BedtoolsBackend {
    pub executable: String,
    pub output: PathBuf,
}

impl BedtoolsBackend {
    pub fn new(output: &Path) -> Self {
        BedtoolsBackend {
            executable: bedtools_executable(),
            output: output.to_path_buf(),
        }
    }
}

fn bedtools_executable() -> String {
    std::env::var(BEDTOOLS_ENV_BIN)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BEDTOOLS_BIN.to_string())
}

/// Copy `input` to `dest` as BED-6 sorted by chromosome then start, keeping
/// only `chrom_filter` when set. Rows are streamed to a scratch file next to
/// `dest` and ordered by `sort -k1,1 -k2,2n`, so memory stays flat.
pub fn normalize_bed(
    input: &Path,
    dest: &Path,
    layout: &ColumnLayout,
    chrom_filter: Option<&str>,
) -> Result<usize> {
    create_path_to_file(dest)?;
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let unsorted = tempfile::Builder::new()
        .suffix(".unsorted.bed")
        .tempfile_in(&dir)
        .map_err(|e| OverlapError::io(&dir, e))?;

    let mut writer = BedWriter::new(BufWriter::new(unsorted.as_file()), unsorted.path());
    for (i, line) in read_lines(input)?.enumerate() {
        let line = line.map_err(|e| OverlapError::io(input, e))?;
        if is_skippable(&line) {
            continue;
        }
        if let Some(chrom) = chrom_filter {
            if layout.chrom_of(&line) != Some(chrom) {
                continue;
            }
        }
        writer.write(&layout.parse(&line, input, i + 1)?)?;
    }
    let n = writer.finish()?;

    remove_if_present(dest)?;
    let args: Vec<String> = vec![
        "-t".to_string(),
        "\t".to_string(),
        "-k1,1".to_string(),
        "-k2,2n".to_string(),
        "-o".to_string(),
        dest.display().to_string(),
        unsorted.path().display().to_string(),
    ];
    debug!("running {} {}", SORT_BIN, args.join(" "));
    let output = Command::new(SORT_BIN)
        .env("LC_ALL", "C")
        .args(&args)
        .output()
        .map_err(|e| tool_error(SORT_BIN, &args, e))?;
    check_status(SORT_BIN, &args, &output)?;
    debug!("normalized {} rows of {} into {}", n, input.display(), dest.display());
    Ok(n)
}

fn tool_error(executable: &str, args: &[String], e: std::io::Error) -> OverlapError {
    if e.kind() == ErrorKind::NotFound {
        OverlapError::ToolNotFound {
            executable: executable.to_string(),
        }
    } else {
        OverlapError::ToolFailed {
            executable: executable.to_string(),
            args: args.join(" "),
            status: "not started".to_string(),
            stderr: e.to_string(),
        }
    }
}

fn check_status(executable: &str, args: &[String], output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(OverlapError::ToolFailed {
        executable: executable.to_string(),
        args: args.join(" "),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

impl OverlapBackend for BedtoolsBackend {
    fn compute_overlap(
        &self,
        input_a: &Path,
        input_b: &Path,
        opts: &MatchOptions,
    ) -> Result<OverlapResult> {
        let tmp = tempfile::tempdir().map_err(|e| OverlapError::io(std::env::temp_dir(), e))?;
        let sorted_a = tmp.path().join("a.sorted.bed");
        let sorted_b = tmp.path().join("b.sorted.bed");
        let chrom_filter = opts.chrom_filter.as_deref();
        normalize_bed(input_a, &sorted_a, &opts.layout, chrom_filter)?;
        normalize_bed(input_b, &sorted_b, &opts.layout, chrom_filter)?;

        // the key side goes first so its columns lead each pair
        let (first, second) = if opts.swap {
            (&sorted_a, &sorted_b)
        } else {
            (&sorted_b, &sorted_a)
        };
        let args: Vec<String> = vec![
            "intersect".to_string(),
            "-sorted".to_string(),
            "-s".to_string(),
            "-wa".to_string(),
            "-wb".to_string(),
            "-a".to_string(),
            first.display().to_string(),
            "-b".to_string(),
            second.display().to_string(),
        ];
        info!("running {} {}", self.executable, args.join(" "));
        let output = Command::new(&self.executable)
            .args(&args)
            .output()
            .map_err(|e| tool_error(&self.executable, &args, e))?;
        check_status(&self.executable, &args, &output)?;

        let mut out = create_output(&self.output)?;
        out.write_all(&output.stdout)
            .and_then(|_| out.flush())
            .map_err(|e| OverlapError::io(&self.output, e))?;
        let pairs = output.stdout.split(|&b| b == b'\n').filter(|l| !l.is_empty()).count();
        info!("{} overlapping pairs written to {}", pairs, self.output.display());
        Ok(OverlapResult::PairFile {
            path: self.output.clone(),
            pairs,
        })
    }
}
