use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::backend::{Backend, OverlapResult};
use crate::emit::OutputFormat;
use crate::error::{OverlapError, Result};
use crate::io::create_output;
use crate::matcher::MatchOptions;

/// Counts and settings of one run
#[derive(Serialize)]
pub struct RunSummary {
    pub backend: Backend,
    /// Layout of the combined overlap file, `None` when an external tool
    /// wrote a pair file instead
    pub format: Option<OutputFormat>,
    pub pair_file: Option<PathBuf>,
    pub options: MatchOptions,
    pub matches: u64,
    pub key_features: usize,
    pub edges: usize,
    pub chunks: usize,
    pub rows_a: usize,
    pub unmatched_a: usize,
    pub unmatched_b: usize,
}

impl RunSummary {
    pub fn new(backend: Backend, format: OutputFormat, options: &MatchOptions, result: &OverlapResult) -> Self {
        let mut ret = RunSummary {
            backend,
            format: Some(format),
            pair_file: None,
            options: options.clone(),
            matches: 0,
            key_features: 0,
            edges: 0,
            chunks: 0,
            rows_a: 0,
            unmatched_a: 0,
            unmatched_b: 0,
        };
        match result {
            OverlapResult::Graph(outcome) => {
                ret.matches = outcome.matches;
                ret.key_features = outcome.graph.len();
                ret.edges = outcome.graph.num_edges();
                ret.chunks = outcome.chunks;
                ret.rows_a = outcome.rows_a;
                ret.unmatched_a = outcome.unmatched_a;
                ret.unmatched_b = outcome.unmatched_b.len();
            }
            OverlapResult::PairFile { path, pairs } => {
                ret.format = None;
                ret.pair_file = Some(path.clone());
                ret.matches = *pairs as u64;
                ret.edges = *pairs;
            }
        }
        ret
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json_str = serde_json::to_string_pretty(self).map_err(|e| OverlapError::io(path, e.into()))?;
        let mut file = create_output(path)?;
        file.write_all(json_str.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| OverlapError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OverlapGraph;
    use crate::interval::{Interval, Strand};
    use crate::matcher::MatchOutcome;
    use rstest::*;
    use std::path::PathBuf;

    #[rstest]
    fn test_pair_file_summary() {
        let result = OverlapResult::PairFile {
            path: PathBuf::from("pairs.bed"),
            pairs: 3,
        };
        let opts = MatchOptions::default();
        let summary = RunSummary::new(Backend::Bedtools, OutputFormat::Flat, &opts, &result);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        summary.write(&path).unwrap();

        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["backend"], "bedtools");
        assert_eq!(v["format"], serde_json::Value::Null);
        assert_eq!(v["pair_file"], "pairs.bed");
        assert_eq!(v["matches"], 3);
        assert_eq!(v["options"]["chunk_size"], 10000);
        assert_eq!(v["options"]["swap"], false);
        assert_eq!(v["options"]["chromosome"], serde_json::Value::Null);
    }

    #[rstest]
    fn test_graph_summary() {
        let mut graph = OverlapGraph::new();
        graph.add_match(
            Interval::new("chr7", 150, 160, Strand::Plus, "B1"),
            Interval::new("chr7", 100, 200, Strand::Plus, "A1"),
        );
        let result = OverlapResult::Graph(MatchOutcome {
            graph,
            matches: 1,
            chunks: 1,
            rows_a: 2,
            unmatched_a: 1,
            unmatched_b: vec![],
        });
        let opts = MatchOptions {
            chrom_filter: Some("chr7".to_string()),
            ..Default::default()
        };
        let v = serde_json::to_value(RunSummary::new(Backend::Native, OutputFormat::Flat, &opts, &result)).unwrap();
        assert_eq!(v["format"], "flat");
        assert_eq!(v["pair_file"], serde_json::Value::Null);
        assert_eq!(v["options"]["chromosome"], "chr7");
        assert_eq!(v["key_features"], 1);
        assert_eq!(v["unmatched_a"], 1);
    }
}
