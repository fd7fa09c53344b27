//! Serialising the overlap graph, and reading it back
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{OverlapError, Result};
use crate::graph::OverlapGraph;
use crate::interval::{Interval, Strand};
use crate::io::{create_output, read_lines, write_bed};
use crate::layout::{is_skippable, ColumnLayout};

/// Layout of the combined overlap file
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // <overlap><a>key<b>child</b>...</a>...</overlap>
    // Text is trimmed on reading, so leading or trailing blanks in names are
    // lost. Use Flat when names carry them.
    Xml,
    // one row per key: key BED-6 columns then 6 per child
    Flat,
}

// Tag names stay <a>/<b> whichever side is the key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "overlap")]
struct OverlapXml {
    #[serde(rename = "a", default)]
    entries: Vec<EntryXml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryXml {
    chr: String,
    start: u64,
    stop: u64,
    strand: String,
    name: String,
    #[serde(rename = "b", default)]
    children: Vec<FeatureXml>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FeatureXml {
    chr: String,
    start: u64,
    stop: u64,
    strand: String,
    name: String,
}

impl From<&Interval> for FeatureXml {
    fn from(iv: &Interval) -> Self {
        FeatureXml {
            chr: iv.chrom.clone(),
            start: iv.start,
            stop: iv.stop,
            strand: iv.strand.to_string(),
            name: iv.name.clone(),
        }
    }
}

impl FeatureXml {
    fn into_interval(self, path: &Path) -> Result<Interval> {
        let strand = parse_strand(&self.strand, path)?;
        Ok(Interval {
            chrom: self.chr,
            start: self.start,
            stop: self.stop,
            strand,
            name: self.name,
        })
    }
}

fn parse_strand(value: &str, path: &Path) -> Result<Strand> {
    value
        .parse::<Strand>()
        .map_err(|v| OverlapError::MalformedOverlapFile {
            path: path.to_path_buf(),
            message: format!("unknown strand {:?}", v),
        })
}

/// Write the combined overlap file, replacing anything already at `path`.
pub fn write_overlap_file(graph: &OverlapGraph, path: &Path, format: OutputFormat) -> Result<()> {
    info!("writing overlap file {}", path.display());
    let mut out = create_output(path)?;
    let io_err = |e| OverlapError::io(path, e);
    match format {
        OutputFormat::Xml => {
            let doc = OverlapXml {
                entries: graph
                    .iter()
                    .map(|(key, children)| EntryXml {
                        chr: key.chrom.clone(),
                        start: key.start,
                        stop: key.stop,
                        strand: key.strand.to_string(),
                        name: key.name.clone(),
                        children: children.iter().map(FeatureXml::from).collect(),
                    })
                    .collect(),
            };
            let mut buffer = String::new();
            let mut ser = quick_xml::se::Serializer::new(&mut buffer);
            ser.indent(' ', 2);
            doc.serialize(ser).map_err(|e| OverlapError::MalformedOverlapFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>").map_err(io_err)?;
            writeln!(out, "{}", buffer).map_err(io_err)?;
        }
        OutputFormat::Flat => {
            for (key, children) in graph.iter() {
                let mut row = key.to_bed6('\t');
                for child in children {
                    row.push('\t');
                    row.push_str(&child.to_bed6('\t'));
                }
                writeln!(out, "{}", row).map_err(io_err)?;
            }
        }
    }
    out.flush().map_err(io_err)?;
    info!(
        "wrote {} key features with {} matches",
        graph.len(),
        graph.num_edges()
    );
    Ok(())
}

/// Rebuild a graph from a combined overlap file. With `reverse` the
/// children become the keys.
pub fn read_overlap_file(path: &Path, format: OutputFormat, reverse: bool) -> Result<OverlapGraph> {
    info!("parsing overlap file {}", path.display());
    let graph = match format {
        OutputFormat::Xml => read_xml(path)?,
        OutputFormat::Flat => read_flat(path)?,
    };
    Ok(if reverse { graph.reversed() } else { graph })
}

fn read_xml(path: &Path) -> Result<OverlapGraph> {
    let text = std::fs::read_to_string(path).map_err(|e| OverlapError::io(path, e))?;
    let doc: OverlapXml =
        quick_xml::de::from_str(&text).map_err(|e| OverlapError::MalformedOverlapFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let mut graph = OverlapGraph::new();
    for entry in doc.entries {
        if entry.children.is_empty() {
            warn!("{}: key {} has no <b> children", path.display(), entry.name);
            continue;
        }
        let key = Interval {
            strand: parse_strand(&entry.strand, path)?,
            chrom: entry.chr,
            start: entry.start,
            stop: entry.stop,
            name: entry.name,
        };
        for child in entry.children {
            graph.add_match(key.clone(), child.into_interval(path)?);
        }
    }
    Ok(graph)
}

fn read_flat(path: &Path) -> Result<OverlapGraph> {
    let layout = ColumnLayout::default();
    let mut graph = OverlapGraph::new();
    for (i, line) in read_lines(path)?.enumerate() {
        let line = line.map_err(|e| OverlapError::io(path, e))?;
        if is_skippable(&line) {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 || cols.len() % 6 != 0 {
            return Err(OverlapError::MalformedOverlapFile {
                path: path.to_path_buf(),
                message: format!("line {}: {} columns is not a key plus children", i + 1, cols.len()),
            });
        }
        let mut features = cols
            .chunks(6)
            .map(|c| layout.parse(&c.join("\t"), path, i + 1));
        if let Some(key) = features.next() {
            let key = key?;
            for child in features {
                graph.add_match(key.clone(), child?);
            }
        }
    }
    Ok(graph)
}

/// Split the graph into the two single-sided BED files. Keys are written
/// once per graph entry, children once per edge. The key side is B unless
/// `swap` is set.
pub fn write_sides(graph: &OverlapGraph, swap: bool, output_a: &Path, output_b: &Path) -> Result<()> {
    let (key_path, child_path) = if swap {
        (output_a, output_b)
    } else {
        (output_b, output_a)
    };
    write_bed(graph.key_features(), key_path)?;
    write_bed(graph.child_features(), child_path)?;
    Ok(())
}
