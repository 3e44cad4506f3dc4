use clap::{Parser, Subcommand};

mod commands;
mod report;

#[derive(Parser)]
#[command(
    name = "volscale",
    about = "volscale: capacity manager for cloud file-storage volumes",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every volume in a project and grow the ones that
    /// could run out of space before the next run.
    Sweep {
        /// Project whose volumes are swept
        #[arg(long, env = "DEVSHELL_PROJECT_ID")]
        project: String,
        /// Service-account key: base64-encoded document or a path to
        /// a key file
        #[arg(long, env = "SERVICE_ACCOUNT_CREDENTIAL", hide_env_values = true)]
        credential: String,
        /// Minutes between runs; 0 selects the static free-space
        /// strategy instead of the interval projection
        #[arg(long, env = "CVS_CAPACITY_INTERVAL", default_value_t = 60)]
        interval: u32,
        /// Safety margin in percent
        #[arg(long, env = "CVS_CAPACITY_MARGIN", default_value_t = 20)]
        margin: u32,
        /// Compute and report, but do not resize
        #[arg(long)]
        dry_run: bool,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Handle a queued invocation message: a scheduled sweep or a
    /// monitoring alert for a single volume.
    Event {
        /// Service-account key: base64-encoded document or a path to
        /// a key file
        #[arg(long, env = "SERVICE_ACCOUNT_CREDENTIAL", hide_env_values = true)]
        credential: String,
        /// Path to the JSON payload, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        payload: String,
        /// Safety margin in percent (a scheduled message may carry
        /// its own)
        #[arg(long, env = "CVS_CAPACITY_MARGIN", default_value_t = 20)]
        margin: u32,
        /// Compute and report, but do not resize
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("volscale=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep {
            project,
            credential,
            interval,
            margin,
            dry_run,
            format,
        } => {
            commands::sweep::run(
                project,
                &credential,
                interval,
                margin,
                dry_run || dry_mode_env(),
                &format,
            )
            .await
        }
        Commands::Event {
            credential,
            payload,
            margin,
            dry_run,
        } => commands::event::run(&credential, &payload, margin, dry_run || dry_mode_env()).await,
    }
}

/// The deployment signals dry mode by the variable's presence, not
/// its value.
fn dry_mode_env() -> bool {
    std::env::var_os("CVS_DRY_MODE").is_some()
}
