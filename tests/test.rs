use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::*;

use lncoverlap::backend::{NativeBackend, OverlapBackend, OverlapResult};
use lncoverlap::emit::{read_overlap_file, write_overlap_file, write_sides, OutputFormat};
use lncoverlap::matcher::MatchOptions;

#[fixture]
fn inputs() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("probes.bed");
    let b = dir.path().join("lncrnas.bed");
    std::fs::write(
        &a,
        "track name=probes\n\
         chr1\t100\t200\tP1\t0\t+\n\
         chr1\t140\t155\tP2\t0\t+\n\
         chr1\t900\t950\tP3\t0\t-\n\
         chr2\t10\t20\tP4\t0\t+\n",
    )
    .unwrap();
    std::fs::write(
        &b,
        "chr1\t150\t160\tL1\t0\t+\n\
         chr1\t120\t130\tL2\t0\t+\n\
         chr1\t900\t950\tL3\t0\t+\n",
    )
    .unwrap();
    (dir, a, b)
}

#[rstest]
#[case(OutputFormat::Xml, false)]
#[case(OutputFormat::Flat, false)]
#[case(OutputFormat::Xml, true)]
fn test_overlap_file_feeds_downstream(
    inputs: (tempfile::TempDir, PathBuf, PathBuf),
    #[case] format: OutputFormat,
    #[case] swap: bool,
) {
    let (dir, a, b) = inputs;
    let opts = MatchOptions {
        swap,
        chunk_size: 2,
        ..Default::default()
    };
    let outcome = match NativeBackend::default().compute_overlap(&a, &b, &opts).unwrap() {
        OverlapResult::Graph(outcome) => outcome,
        OverlapResult::PairFile { .. } => panic!("expected a graph"),
    };
    // P1-L1, P2-L1, P1-L2; P3 is on the other strand
    assert_eq!(outcome.matches, 3);
    assert_eq!(outcome.unmatched_a, 2);

    let path = dir.path().join("out/overlap");
    write_overlap_file(&outcome.graph, &path, format).unwrap();
    write_sides(&outcome.graph, swap, &dir.path().join("out/a.bed"), &dir.path().join("out/b.bed")).unwrap();

    let back = read_overlap_file(&path, format, false).unwrap();
    assert_eq!(back.num_edges(), 3);
    assert_eq!(back.keys().collect::<Vec<_>>(), outcome.graph.keys().collect::<Vec<_>>());

    // reading reversed gives the graph the other key side would have built
    let rev = read_overlap_file(&path, format, true).unwrap();
    let other = MatchOptions { swap: !swap, ..opts };
    let flipped = match NativeBackend::default().compute_overlap(&a, &b, &other).unwrap() {
        OverlapResult::Graph(outcome) => outcome.graph,
        OverlapResult::PairFile { .. } => panic!("expected a graph"),
    };
    let mut got: Vec<&str> = rev.keys().collect();
    let mut want: Vec<&str> = flipped.keys().collect();
    got.sort();
    want.sort();
    assert_eq!(got, want);
    for key in want {
        assert_eq!(rev.children(key).unwrap().len(), flipped.children(key).unwrap().len());
    }
}
