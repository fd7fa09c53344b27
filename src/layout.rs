//! Column positions of the tab-delimited positional files
use std::path::Path;

use crate::error::{OverlapError, Result};
use crate::interval::{Interval, Strand};

/// Where each field lives in a row. The default is BED-6 with the score
/// column (4) skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    pub delimiter: char,
    pub chrom_col: usize,
    pub start_col: usize,
    pub stop_col: usize,
    pub name_col: usize,
    pub strand_col: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout {
            delimiter: '\t',
            chrom_col: 0,
            start_col: 1,
            stop_col: 2,
            name_col: 3,
            strand_col: 5,
        }
    }
}

impl ColumnLayout {
    /// Minimum number of columns a row must carry
    pub fn width(&self) -> usize {
        1 + *[
            self.chrom_col,
            self.start_col,
            self.stop_col,
            self.name_col,
            self.strand_col,
        ]
        .iter()
        .max()
        .unwrap_or(&0)
    }

    /// Column indices must not collide
    pub fn is_distinct(&self) -> bool {
        let mut cols = vec![
            self.chrom_col,
            self.start_col,
            self.stop_col,
            self.name_col,
            self.strand_col,
        ];
        cols.sort_unstable();
        cols.dedup();
        cols.len() == 5
    }

    /// Chromosome of a raw row without parsing the rest of it.
    pub fn chrom_of<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.split(self.delimiter).nth(self.chrom_col)
    }

    /// Parse one row into an [`Interval`]. `line_no` is 1-based and only
    /// used for error messages.
    pub fn parse(&self, line: &str, path: &Path, line_no: usize) -> Result<Interval> {
        let cols: Vec<&str> = line.split(self.delimiter).collect();
        if cols.len() < self.width() {
            return Err(OverlapError::MissingColumn {
                path: path.to_path_buf(),
                line: line_no,
                needed: self.width(),
                found: cols.len(),
            });
        }
        let start = self.parse_coord(cols[self.start_col], self.start_col, path, line_no)?;
        let stop = self.parse_coord(cols[self.stop_col], self.stop_col, path, line_no)?;
        if stop < start {
            return Err(OverlapError::InvertedInterval {
                path: path.to_path_buf(),
                line: line_no,
                start,
                stop,
            });
        }
        let strand = cols[self.strand_col]
            .parse::<Strand>()
            .map_err(|value| OverlapError::UnknownStrand {
                path: path.to_path_buf(),
                line: line_no,
                value,
            })?;

        Ok(Interval::new(
            cols[self.chrom_col],
            start,
            stop,
            strand,
            cols[self.name_col],
        ))
    }

    fn parse_coord(&self, value: &str, column: usize, path: &Path, line_no: usize) -> Result<u64> {
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| OverlapError::MalformedInteger {
                path: path.to_path_buf(),
                line: line_no,
                column,
                value: value.to_string(),
            })
    }
}

/// Header, comment and blank lines carry no feature.
pub fn is_skippable(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}
