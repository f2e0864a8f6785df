use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repomirror::{
    Config, FileSource, GitHubClient, HealthCheck, Source, StarredSource, SyncAction, SyncEngine,
    SyncResult,
};

#[derive(Parser)]
#[command(name = "repomirror")]
#[command(about = "Periodic GitHub repository mirroring tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and the destination directory
    Init {
        /// Destination directory for mirrored repositories
        #[arg(short, long, default_value = "~/synced_repos")]
        dest_dir: String,
    },

    /// Mirror repositories according to configuration
    Sync {
        /// Override the configured repository source
        #[arg(long, value_enum)]
        source: Option<SourceMode>,

        /// Show clone/update decisions without touching git
        #[arg(long)]
        dry_run: bool,
    },

    /// List repositories the configured source produces
    List {
        /// Override the configured repository source
        #[arg(long, value_enum)]
        source: Option<SourceMode>,
    },

    /// System health check and diagnostics
    Doctor,
}

#[derive(ValueEnum, Clone, Copy)]
enum SourceMode {
    /// Parse the repos list file
    File,
    /// Paginate the configured user's starred repositories
    Starred,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    info!("Starting repomirror v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Init { dest_dir } => cmd_init(dest_dir, &config),
        Commands::Sync { source, dry_run } => cmd_sync(source, dry_run, &config).await,
        Commands::List { source } => cmd_list(source, &config).await,
        Commands::Doctor => cmd_doctor(&config),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<std::path::PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => Config::load_or_default(),
    }
}

/// Build the repository source for a command, honoring a CLI override
fn build_source(mode: Option<SourceMode>, config: &Config) -> Result<Box<dyn Source>> {
    let mode = match mode {
        Some(SourceMode::File) => "file",
        Some(SourceMode::Starred) => "starred",
        None => config.source.mode.as_str(),
    };

    match mode {
        "file" => Ok(Box::new(FileSource::new(config.repos_file_path()))),
        "starred" => {
            let username = config
                .github
                .username
                .clone()
                .ok_or_else(|| anyhow!("github.username must be set for starred mode"))?;
            let client = GitHubClient::new(config)?;
            Ok(Box::new(StarredSource::new(client, username)))
        }
        other => Err(anyhow!("Unknown source mode: {}", other)),
    }
}

/// Initialize repomirror configuration and the destination directory
fn cmd_init(dest_dir: String, config: &Config) -> Result<()> {
    info!("Initializing repomirror...");

    // Create directory structure
    let expanded_dest_dir = shellexpand::full(&dest_dir)?;
    std::fs::create_dir_all(expanded_dest_dir.as_ref())?;

    info!("Destination directory set to: {}", expanded_dest_dir);

    // Update config with new destination if different
    let mut new_config = config.clone();
    new_config.destination = dest_dir.clone();

    // Save updated config
    let config_path = Config::default_config_path()?;
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    new_config.save(&config_path)?;

    info!("Configuration saved to: {:?}", config_path);

    println!("✅ repomirror initialized successfully!");
    println!("   Config: {:?}", config_path);
    println!("   Destination: {}", expanded_dest_dir);
    println!("   Next: add repositories to the repos file and run 'repomirror sync'");

    Ok(())
}

/// Mirror repositories according to configuration
async fn cmd_sync(mode: Option<SourceMode>, dry_run: bool, config: &Config) -> Result<()> {
    let engine = SyncEngine::new(config.clone());
    let source = build_source(mode, config)?;

    if dry_run {
        println!("🔍 Dry run mode - listing clone/update decisions");

        let descriptors = source.list().await?;
        let plan = engine.plan(&descriptors);

        let mut to_clone = 0;
        let mut to_update = 0;

        for (descriptor, action) in &plan {
            match action {
                SyncAction::Clone => {
                    to_clone += 1;
                    println!("   📥 Clone: {}", descriptor.full_name());
                }
                SyncAction::Update => {
                    to_update += 1;
                    println!("   🔄 Update: {}", descriptor.full_name());
                }
            }
        }

        println!("\n📈 Summary:");
        println!("   📥 Repositories to clone: {}", to_clone);
        println!("   🔄 Repositories to update: {}", to_update);

        return Ok(());
    }

    let summary = engine.run(source.as_ref()).await?;

    println!("\n🎉 Synchronization Complete!");
    println!("   📊 Total repositories: {}", summary.total_repositories);
    println!("   📥 Cloned: {}", summary.cloned);
    println!("   🔄 Updated: {}", summary.updated);
    println!("   ⏭️  No remote branches: {}", summary.no_ops);
    println!("   ❌ Failed: {}", summary.failed);
    println!("   ⏱️  Duration: {:.2}s", summary.duration.as_secs_f64());

    if summary.failed > 0 {
        println!("\n🔍 Failed Operations:");
        for result in &summary.results {
            if let SyncResult::Failed { path, error } = result {
                println!("   ❌ {}: {}", path.display(), error);
            }
        }
    }

    Ok(())
}

/// List repositories the configured source produces
async fn cmd_list(mode: Option<SourceMode>, config: &Config) -> Result<()> {
    let source = build_source(mode, config)?;

    let descriptors = source.list().await?;

    println!("Repositories ({}):", descriptors.len());
    for descriptor in &descriptors {
        println!("  📁 {}", descriptor.full_name());
    }

    Ok(())
}

/// System health check and diagnostics
fn cmd_doctor(config: &Config) -> Result<()> {
    let health = HealthCheck::run(config);
    print_health_report(&health);
    Ok(())
}

/// Print health check report to stdout
fn print_health_report(health: &HealthCheck) {
    use repomirror::health::CheckResult;

    fn print_check(name: &str, result: &CheckResult) {
        println!("{}:", name);
        let icon = if result.passed {
            if result.is_warning {
                "⚠️ "
            } else {
                "✅"
            }
        } else {
            "❌"
        };
        println!("  {} {}", icon, result.message);
        if let Some(details) = &result.details {
            for line in details.lines() {
                println!("     {}", line);
            }
        }
    }

    println!("🔍 repomirror System Diagnostics");
    println!();

    for (name, result) in health.all_checks() {
        print_check(name, result);
        println!();
    }

    if health.all_passed() {
        println!("✅ All checks passed");
    } else {
        println!("❌ Some checks failed");
    }
}
