//! papergraph CLI: classify the feed, merge the corpus, rebuild the graph.
//!
//! Usage:
//!   papergraph [--config file] [--data-dir dir] [--policy file] [-v] <command>
//!
//! Commands: classify, merge [--from file], build, run, policy

use clap::{Parser, Subcommand};
use papergraph::classify::ClassifyReport;
use papergraph::graph::GraphMetadata;
use papergraph::storage::read_papers;
use papergraph::{GraphBuilder, JsonStore, Pipeline, PipelineConfig, PipelineError, Policy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "papergraph",
    version,
    about = "Curated research-paper corpus and knowledge graph"
)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the pipeline's JSON documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Policy YAML replacing the embedded keyword tables
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    /// Reject graph labels outside the policy's taxonomies
    #[arg(long, global = true)]
    strict: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and tag new raw records
    Classify,
    /// Merge accepted (or enriched) records into the corpus
    Merge {
        /// Records to merge instead of the latest accepted file
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Rebuild the knowledge graph from the corpus
    Build,
    /// Classify, merge and build in one pass
    Run,
    /// Print the effective policy as YAML
    Policy,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig, PipelineError> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_yaml_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(policy) = &cli.policy {
        config.policy = Some(policy.clone());
    }
    if cli.strict {
        config.strict_taxonomy = true;
    }
    match cli.verbose {
        0 => {}
        1 => config.log_level = "debug".to_string(),
        _ => config.log_level = "trace".to_string(),
    }
    Ok(config)
}

fn init_logging(config: &PipelineConfig) -> Result<(), PipelineError> {
    let level = config.level()?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn open_pipeline(config: &PipelineConfig, policy: &Policy) -> Result<Pipeline<JsonStore>, PipelineError> {
    let store = config.open_store()?;
    let builder = if config.strict_taxonomy {
        GraphBuilder::with_taxonomy(policy)
    } else {
        GraphBuilder::new()
    };
    Ok(Pipeline::new(store, policy)?.with_builder(builder))
}

fn print_classify(report: &ClassifyReport) {
    println!("Accepted:  {}", report.accepted);
    println!("Excluded:  {}", report.excluded);
    println!("Weak:      {}", report.weak);
    println!("Skipped:   {}", report.skipped);
}

fn print_graph(meta: &GraphMetadata) {
    println!("Total nodes: {}", meta.total_nodes);
    println!("  - Papers: {}", meta.total_papers);
    println!("  - Authors: {}", meta.total_authors);
    println!("  - Domains: {}", meta.total_domains);
    println!("  - Techniques: {}", meta.total_techniques);
    println!("  - Representations: {}", meta.total_representations);
    println!("Total edges: {}", meta.total_edges);

    let mut domains: Vec<_> = meta.domain_distribution.iter().collect();
    domains.sort_by(|a, b| b.1.cmp(a.1));
    if !domains.is_empty() {
        println!("\nDomain distribution:");
        for (domain, count) in domains {
            println!("  {}: {}", domain, count);
        }
    }

    if !meta.top_authors.is_empty() {
        println!("\nTop authors by paper count:");
        for (author, count) in meta.top_authors.iter().take(5) {
            println!("  {}: {}", author, count);
        }
    }
}

fn execute(cli: Cli, config: PipelineConfig) -> Result<(), PipelineError> {
    let policy = config.load_policy()?;

    match cli.command {
        Commands::Policy => {
            print!("{}", policy.to_yaml()?);
        }
        Commands::Classify => {
            let report = open_pipeline(&config, &policy)?.classify()?;
            print_classify(&report);
        }
        Commands::Merge { from } => {
            let pipeline = open_pipeline(&config, &policy)?;
            let report = match from {
                Some(path) => pipeline.merge_papers(read_papers(&path)?)?,
                None => pipeline.merge()?,
            };
            println!("Added: {}, already present: {}", report.added, report.skipped);
        }
        Commands::Build => {
            let graph = open_pipeline(&config, &policy)?.build()?;
            print_graph(&graph.metadata);
        }
        Commands::Run => {
            let report = open_pipeline(&config, &policy)?.run()?;
            print_classify(&report.classify);
            println!("Corpus size: {}\n", report.corpus_size);
            print_graph(&report.graph);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = init_logging(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = execute(cli, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
