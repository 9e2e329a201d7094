//! exhibitctl - CLI client for exhibitd
//!
//! Sends a voice request to one of the daemon's skills and prints the answer.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod client;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use client::{Client, ClientError};
use exhibit_core::config::{DEFAULT_COLOR_APP_ID, DEFAULT_EXHIBITS_APP_ID, DEFAULT_PORT};
use exhibit_core::voice::{SkillRequest, COLOR_INTENT, HELP_INTENT, NEXT_EXHIBITS_INTENT};

/// CLI client for the exhibitd voice skills.
#[derive(Parser)]
#[command(name = "exhibitctl")]
#[command(about = "Ask the exhibitd voice skills a question")]
#[command(version)]
struct Cli {
    /// Daemon address (default: http://127.0.0.1:7710)
    #[arg(long, global = true, env = "EXHIBITD_ADDR")]
    addr: Option<String>,

    /// Application ID to present (default: the skill's built-in ID)
    #[arg(long, global = true)]
    app_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask which Met exhibits end next
    Exhibits {
        /// Date slot value, e.g. 2016-03-01, 2016-03, 2016 or PRESENT_REF
        #[arg(long)]
        date: Option<String>,
    },

    /// Ask what the Empire State Building is lit for
    Color {
        /// Date slot value, e.g. 2016-03-17 or PRESENT_REF
        #[arg(long)]
        date: Option<String>,
    },

    /// Ask a skill for its help text
    Help {
        #[arg(value_enum)]
        skill: Skill,
    },

    /// Check whether the daemon is up
    Health,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Skill {
    Exhibits,
    Color,
}

impl Skill {
    fn path(self) -> &'static str {
        match self {
            Self::Exhibits => "exhibits",
            Self::Color => "color",
        }
    }

    fn intent(self) -> &'static str {
        match self {
            Self::Exhibits => NEXT_EXHIBITS_INTENT,
            Self::Color => COLOR_INTENT,
        }
    }

    fn default_app_id(self) -> &'static str {
        match self {
            Self::Exhibits => DEFAULT_EXHIBITS_APP_ID,
            Self::Color => DEFAULT_COLOR_APP_ID,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let addr = cli
        .addr
        .unwrap_or_else(|| format!("http://127.0.0.1:{DEFAULT_PORT}"));
    let client = Client::new(&addr);

    let result = match cli.command {
        Command::Exhibits { date } => {
            ask_intent(&client, Skill::Exhibits, cli.app_id.as_deref(), date.as_deref()).await
        }
        Command::Color { date } => {
            ask_intent(&client, Skill::Color, cli.app_id.as_deref(), date.as_deref()).await
        }
        Command::Help { skill } => ask_help(&client, skill, cli.app_id.as_deref()).await,
        Command::Health => run_health(&client).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn ask_intent(
    client: &Client,
    skill: Skill,
    app_id: Option<&str>,
    date: Option<&str>,
) -> Result<(), ClientError> {
    let app_id = app_id.unwrap_or(skill.default_app_id());
    let request = SkillRequest::intent(app_id, skill.intent(), date);
    let response = client.ask(skill.path(), &request).await?;
    render::print_response(&response);
    Ok(())
}

async fn ask_help(client: &Client, skill: Skill, app_id: Option<&str>) -> Result<(), ClientError> {
    let app_id = app_id.unwrap_or(skill.default_app_id());
    let request = SkillRequest::intent(app_id, HELP_INTENT, None);
    let response = client.ask(skill.path(), &request).await?;
    render::print_response(&response);
    Ok(())
}

async fn run_health(client: &Client) -> Result<(), ClientError> {
    if client.check_health().await? {
        println!("exhibitd is up at {}", client.addr());
    } else {
        println!("exhibitd at {} reported unhealthy", client.addr());
    }
    Ok(())
}
