use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;

use double_digest::report::{write_json, write_summary};
use double_digest::{run_digest, DigestConfig, EnzymeCatalog};

#[derive(Parser)]
#[command(name = "double-digest")]
#[command(about = "Perform an in silico double digest of a fasta sequence and estimate \
                   what fraction of the genome falls into the target fragment size range")]
struct Args {
    #[arg(short = 'i', long, required_unless_present = "list_enzymes", help = "Input fasta file (optionally .gz) with the sequences to digest")]
    input_fasta: Option<PathBuf>,

    #[arg(short = 'l', long, required_unless_present = "list_enzymes", allow_negative_numbers = true, help = "Lower bound (bp) of the size range of interest")]
    lower_bound: Option<i64>,

    #[arg(short = 'u', long, required_unless_present = "list_enzymes", allow_negative_numbers = true, help = "Upper bound (bp) of the size range of interest")]
    upper_bound: Option<i64>,

    #[arg(short = 't', long, default_value = "4", value_parser = clap::value_parser!(u16).range(1..), help = "Number of worker threads")]
    threads: u16,

    #[arg(short = 'b', long, default_value = "64", value_parser = clap::value_parser!(u32).range(1..), help = "Sequences per batch handed to a worker")]
    batch_size: u32,

    #[arg(short = 'e', long, help = "JSON enzyme catalog to use instead of the built-in one")]
    enzyme_file: Option<PathBuf>,

    #[arg(long, default_value = "false", help = "Write the full result as JSON to stdout")]
    json: bool,

    #[arg(long, default_value = "false", help = "List the available enzyme names and exit")]
    list_enzymes: bool,

    #[arg(num_args = 2, required_unless_present = "list_enzymes", help = "The two enzymes to use, in standard naming, e.g. EcoRI (not ecori or EcoR1)")]
    enzyme_names: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let catalog = match &args.enzyme_file {
        Some(path) => EnzymeCatalog::from_path(path)?,
        None => EnzymeCatalog::builtin()?,
    };

    if args.list_enzymes {
        for name in catalog.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    // clap enforces presence unless --list-enzymes
    let (Some(input), Some(lower), Some(upper)) =
        (args.input_fasta, args.lower_bound, args.upper_bound)
    else {
        anyhow::bail!("--input-fasta, --lower-bound and --upper-bound are required");
    };
    let enzymes: [String; 2] = args
        .enzyme_names
        .try_into()
        .map_err(|names: Vec<String>| anyhow::anyhow!("exactly two enzymes are required, got {}", names.len()))?;

    let mut config = DigestConfig::new(input, lower, upper, enzymes);
    config.threads = args.threads as usize;
    config.batch_size = args.batch_size as usize;

    let result = run_digest(&config, &catalog)?;

    write_summary(&mut io::stderr(), &result)?;
    if args.json {
        write_json(&mut io::stdout().lock(), &result)?;
    }

    Ok(())
}
