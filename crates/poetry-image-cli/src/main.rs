mod commands;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use poetry_image_core::Software;

#[derive(Parser)]
#[command(
    name = "poetry-image",
    about = "Generate Poetry Docker image Dockerfiles and CI/CD matrices"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the current-matrix Dockerfiles, or print a single one
    Dockerfiles {
        /// Print the Dockerfile for POETRY-pythonPYTHON-VARIANT instead
        #[arg(long, short = 'v', value_name = "STR")]
        version: Option<String>,
    },
    /// Print the CI job matrix as JSON
    Ci,
    /// Print the CD job matrix, with image tags, as JSON
    Cd,
    /// Check for or apply upstream Poetry/Python releases
    Update(UpdateArgs),
}

#[derive(Args)]
#[group(id = "software", required = true, multiple = false)]
struct SoftwareFlags {
    /// Track Poetry releases from GitHub
    #[arg(long)]
    poetry: bool,
    /// Track Python image releases from Docker Hub
    #[arg(long)]
    python: bool,
}

#[derive(Args)]
struct UpdateArgs {
    #[command(flatten)]
    software: SoftwareFlags,
    /// Only report missing versions; exit code is their count
    #[arg(long)]
    check: bool,
    /// Token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

impl SoftwareFlags {
    fn software(&self) -> Software {
        if self.poetry {
            Software::Poetry
        } else {
            Software::Python
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new("info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dockerfiles { version } => commands::dockerfiles(version.as_deref())?,
        Commands::Ci => commands::ci()?,
        Commands::Cd => commands::cd()?,
        Commands::Update(args) => {
            let options = commands::UpdateOptions {
                software: args.software.software(),
                check: args.check,
                github_token: args.github_token,
            };
            return commands::update(options).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}
