//! Positional overlap of lncRNA loci with microarray probes.
//!
//! Side B is indexed by (chromosome, strand) while side A is streamed in
//! chunks through [`matcher::OverlapMatcher`]. The result is an
//! [`graph::OverlapGraph`] that [`emit`] writes out and reads back.
#[macro_use]
extern crate log;

pub mod backend;
pub mod chunks;
pub mod cli;
pub mod emit;
pub mod error;
pub mod graph;
pub mod interval;
pub mod io;
pub mod layout;
pub mod matcher;
pub mod partition;
pub mod summary;
