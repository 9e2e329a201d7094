//! exhibitd - voice skill daemon
//!
//! Main entry point for the daemon binary.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::path::PathBuf;

use clap::Parser;
use exhibit_core::Config;
use exhibitd::Daemon;
use eyre::WrapErr;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "exhibitd", about = "Met exhibits and building color voice skills", version)]
struct Cli {
    /// Config file (default: ~/.config/exhibitd/config if present)
    #[arg(long, env = "EXHIBITD_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Listings feed URL
    #[arg(long)]
    feed_url: Option<String>,

    /// Lighting schedule file (YAML)
    #[arg(long)]
    schedule: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    runtime.block_on(async {
        let daemon = match Daemon::new(config) {
            Ok(daemon) => daemon,
            Err(e) => {
                error!("failed to initialize daemon: {}", e);
                std::process::exit(1);
            }
        };

        tokio::select! {
            result = daemon.run() => {
                if let Err(e) = result {
                    error!("daemon error: {}", e);
                    std::process::exit(1);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received SIGINT, shutting down");
            }
        }
    });
}

/// Build config: CLI flags > config file > defaults.
fn load_config(cli: &Cli) -> eyre::Result<Config> {
    let path = cli.config.clone().or_else(default_config_path);

    let mut config = Config::default();
    if let Some(path) = path {
        config
            .load_file(&path)
            .wrap_err_with(|| format!("reading {}", path.display()))?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
    }

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(ref feed_url) = cli.feed_url {
        config.feed_url.clone_from(feed_url);
    }
    if let Some(ref schedule) = cli.schedule {
        config.schedule_path = Some(schedule.clone());
    }

    Ok(config)
}

/// `~/.config/exhibitd/config`, only when it exists.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("exhibitd").join("config"))
        .filter(|path| path.exists())
}
