use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::engine::EngineKind;
use crate::infra::config::ContentType;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "weft")]
#[command(
    about = "Round-trips backend template tags through placeholder-based front-end templates and YAML sidecar documents"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress bars and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import backend files into front-end templates and sidecars
    Import(ImportArgs),

    /// Export a front-end file back to its backend location
    Export(ExportArgs),

    /// Initialize a weft.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Backend source file to import; sweeps the front-end tree when omitted
    pub file: Option<PathBuf>,

    /// Restrict the operation to one content type
    #[arg(long, value_enum)]
    pub only: Option<ContentType>,

    /// Backend template engine (overrides the configured default)
    #[arg(long, value_enum)]
    pub engine: Option<EngineKind>,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Front-end file to export (absolute or relative)
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_flags_parse() {
        let argv = vec!["weft", "import", "backend/views/home.erb", "--engine", "jsp"];
        let cli = Cli::parse_from(argv);

        match cli.command {
            Commands::Import(ImportArgs { file, engine, only }) => {
                assert!(file.is_some());
                assert_eq!(engine, Some(EngineKind::Jsp));
                assert!(only.is_none());
            }
            _ => panic!("expected Import command"),
        }
    }

    #[test]
    fn import_only_restricts_type() {
        let cli = Cli::parse_from(vec!["weft", "import", "--only", "styles"]);

        match cli.command {
            Commands::Import(ImportArgs { file, only, .. }) => {
                assert!(file.is_none());
                assert_eq!(only, Some(ContentType::Styles));
            }
            _ => panic!("expected Import command"),
        }
    }

    #[test]
    fn export_requires_a_file() {
        assert!(Cli::try_parse_from(vec!["weft", "export"]).is_err());

        let cli = Cli::parse_from(vec!["weft", "export", "src/templates/home.hbs"]);
        match cli.command {
            Commands::Export(ExportArgs { file }) => {
                assert!(file.to_string_lossy().ends_with("home.hbs"));
            }
            _ => panic!("expected Export command"),
        }
    }

    #[test]
    fn global_flags_are_global() {
        let cli = Cli::parse_from(vec!["weft", "import", "--dry-run", "--quiet"]);
        assert!(cli.dry_run);
        assert!(cli.quiet);
    }
}
