use anyhow::Result;
use clap::Parser;
use weft::cli::{AppContext, Cli, Commands};

fn main() -> Result<()> {
    // RUST_LOG-controlled diagnostics on stderr; silent by default
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Import(args) => weft::core::import_run(args, &ctx),
        Commands::Export(args) => weft::core::export_run(args, &ctx),
        Commands::Init(args) => weft::infra::config::init(args, &ctx),
        Commands::Completions(args) => weft::completion::run(args),
    }
}
