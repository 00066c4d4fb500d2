mod analyze;
mod config_cmd;
mod frame;
mod grade;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use volley_coach::{PoseAnalysisService, ScoringProfile};

use crate::config::Config;

pub use analyze::AnalyzeCommand;
pub use frame::FrameCommand;
pub use grade::GradeCommand;

#[derive(Parser)]
#[command(name = "volley-coach")]
#[command(about = "Score volleyball forearm passes from pose landmark sequences", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "VOLLEY_COACH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a whole landmark sequence
    Analyze(AnalyzeCommand),

    /// Score a single frame
    Frame(FrameCommand),

    /// Grade a score, optionally blended with a sequence score
    Grade(GradeCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Settings shared by the scoring commands
pub struct Session {
    pub config: Config,
}

impl Session {
    /// Load the configuration and apply its output settings
    pub fn open(path: &Path, no_color: bool) -> Result<Self> {
        let config = Config::load_from(path)?;
        if no_color || !config.output.color {
            colored::control::set_override(false);
        }
        Ok(Self { config })
    }

    /// Build the engine, optionally overriding the configured profile
    pub fn service(&self, profile: Option<ScoringProfile>) -> Result<PoseAnalysisService> {
        let mut scoring = self.config.scoring.clone();
        if let Some(profile) = profile {
            scoring.profile = profile;
        }
        PoseAnalysisService::new(scoring).context("Invalid scoring configuration")
    }

    pub fn json(&self, flag: bool) -> bool {
        flag || self.config.output.json
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        let config_path = Config::resolve_path(self.config.as_deref())?;

        match self.command {
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&config_path).await,
                ConfigSubcommands::Path => config_cmd::print_path(&config_path).await,
                ConfigSubcommands::Init { force } => {
                    config_cmd::init_config(&config_path, force).await
                }
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
            Commands::Analyze(cmd) => cmd.execute(&Session::open(&config_path, self.no_color)?).await,
            Commands::Frame(cmd) => cmd.execute(&Session::open(&config_path, self.no_color)?).await,
            Commands::Grade(cmd) => cmd.execute(&Session::open(&config_path, self.no_color)?).await,
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
