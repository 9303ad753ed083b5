use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use uniref_annotator::check::check_path;
use uniref_annotator::domain::SeqType;
use uniref_annotator::error::AnnotError;
use uniref_annotator::output::{JsonOutput, OutputMode};
use uniref_annotator::pipeline::{AnnotateRequest, Annotator};
use uniref_annotator::search::DiamondSearch;

#[derive(Parser)]
#[command(name = "uniref-annotate")]
#[command(about = "Annotate a fasta of coding sequences against HUMAnN2-formatted UniRef90/UniRef50 databases")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true, help = "Print results as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search both tiers and annotate the fasta headers")]
    Annotate(AnnotateArgs),
    #[command(about = "Report agreement between two annotation layers")]
    Check(CheckArgs),
}

#[derive(Args)]
struct AnnotateArgs {
    #[arg(help = "Sequences to annotate")]
    fasta: Utf8PathBuf,

    #[arg(long, value_enum, default_value_t = SeqType::Nuc, help = "Sequence type")]
    seqtype: SeqType,

    #[arg(long, default_value = "diamond", help = "Path to diamond binary")]
    diamond: String,

    #[arg(long, help = "Path to HUMAnN2-formatted UniRef90 database")]
    uniref90db: Utf8PathBuf,

    #[arg(long, help = "Path to HUMAnN2-formatted UniRef50 database")]
    uniref50db: Utf8PathBuf,

    #[arg(long, help = "Path to UniRef90->UniRef50 idmapping file")]
    transitive_map: Option<Utf8PathBuf>,

    #[arg(long, default_value = ".", help = "Path for temp files")]
    temp: Utf8PathBuf,

    #[arg(long, help = "Path for output file [default: <fasta>.annotated]")]
    out: Option<Utf8PathBuf>,

    #[arg(long, help = "Rerun searches, even if expected outputs exist")]
    force_search: bool,

    #[arg(long, help = "Additional flags to pass to diamond, e.g. --threads 4")]
    flags: Option<String>,
}

#[derive(Args)]
struct CheckArgs {
    #[arg(help = "Doubly-annotated fasta to tally")]
    fasta: Utf8PathBuf,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(annot) = report.downcast_ref::<AnnotError>() {
            return ExitCode::from(map_exit_code(annot));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AnnotError) -> u8 {
    match error {
        AnnotError::MissingPath(_) | AnnotError::TierInference(_) => 2,
        AnnotError::MissingTool(_) | AnnotError::Search(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Commands::Annotate(args) => run_annotate(args, output_mode),
        Commands::Check(args) => run_check(args, output_mode),
    }
}

fn run_annotate(args: AnnotateArgs, output_mode: OutputMode) -> miette::Result<()> {
    let AnnotateArgs {
        fasta,
        seqtype,
        diamond,
        uniref90db,
        uniref50db,
        transitive_map,
        temp,
        out,
        force_search,
        flags,
    } = args;

    let engine = DiamondSearch::new(&diamond).into_diagnostic()?;
    let annotator = Annotator::new(engine);
    let request = AnnotateRequest {
        fasta,
        seqtype,
        uniref90db,
        uniref50db,
        transitive_map,
        temp,
        out,
        force_search,
        flags: flags
            .map(|value| value.split_whitespace().map(String::from).collect())
            .unwrap_or_default(),
    };

    let summary = annotator.run(&request).into_diagnostic()?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_summary(&summary).into_diagnostic()?,
        OutputMode::Human => {
            println!("wrote {}", summary.out);
            println!(
                "headers: {} (uniref90: {}, uniref50: {}, overridden: {})",
                summary.headers,
                summary.uniref90_annotated,
                summary.uniref50_annotated,
                summary.overridden
            );
        }
    }
    Ok(())
}

fn run_check(args: CheckArgs, output_mode: OutputMode) -> miette::Result<()> {
    let report = check_path(&args.fasta).into_diagnostic()?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_check(&report).into_diagnostic()?,
        OutputMode::Human => {
            for (category, count) in &report.counts {
                println!("{category} {:.3} {count}", report.fraction(category));
            }
        }
    }
    Ok(())
}
