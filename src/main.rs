extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use clap::Parser;

// go through the library crate to get the interfaces
use lncoverlap::backend::{Backend, BedtoolsBackend, NativeBackend, OverlapBackend, OverlapResult};
use lncoverlap::error::Result;
use lncoverlap::{cli, emit, summary};

fn run(args: &cli::ArgParser) -> Result<()> {
    let output = args.output_path();
    let opts = args.match_options();

    let backend: Box<dyn OverlapBackend> = match args.backend {
        Backend::Native => Box::new(NativeBackend {
            no_match_a: args.no_match_a.clone(),
            no_match_b: args.no_match_b.clone(),
        }),
        Backend::Bedtools => Box::new(BedtoolsBackend::new(&output)),
    };

    info!(
        "getting overlap b/w {} and {}",
        args.input_a.display(),
        args.input_b.display()
    );
    let result = backend.compute_overlap(&args.input_a, &args.input_b, &opts)?;

    if let OverlapResult::Graph(outcome) = &result {
        info!(
            "found {} elements in file {} with matches in file {}",
            outcome.graph.len(),
            if opts.swap { "A" } else { "B" },
            if opts.swap { "B" } else { "A" },
        );
        emit::write_overlap_file(&outcome.graph, &output, args.format)?;
        emit::write_sides(&outcome.graph, opts.swap, &args.output_a, &args.output_b)?;
    }

    if let Some(path) = &args.summary {
        summary::RunSummary::new(args.backend, args.format, &opts, &result).write(path)?;
    }
    Ok(())
}

fn main() {
    let args = cli::ArgParser::parse();

    pretty_env_logger::formatted_timed_builder()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if !args.validate() {
        error!("please fix arguments");
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("finished");
}
