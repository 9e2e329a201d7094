//! exhibitd - voice skill daemon
//!
//! Serves the Met exhibits skill and the Empire State Building color skill
//! over HTTP.

pub mod feed;
pub mod schedule;
pub mod server;
pub mod skills;

use std::sync::Arc;

use exhibit_core::clock::{Clock, SystemClock};
use exhibit_core::Config;
use schedule::{LightingSchedule, ScheduleError, ScheduleFile};
use server::AppState;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Daemon state.
#[derive(Debug)]
pub struct Daemon {
    state: Arc<AppState>,
}

impl Daemon {
    /// Create a daemon reading the system clock.
    pub fn new(config: Config) -> Result<Self, DaemonError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, DaemonError> {
        let schedule = match &config.schedule_path {
            Some(path) => {
                let schedule: Arc<dyn LightingSchedule> = Arc::new(ScheduleFile::load(path)?);
                Some(schedule)
            }
            None => None,
        };

        Ok(Self {
            state: Arc::new(AppState::new(config, clock, schedule)),
        })
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Serve until the listener fails.
    pub async fn run(&self) -> Result<(), DaemonError> {
        let config = &self.state.config;
        info!("exhibitd starting on port {}", config.port);
        info!("listings feed: {}", config.feed_url);
        match &config.schedule_path {
            Some(path) => info!("lighting schedule: {}", path.display()),
            None => info!("lighting schedule: none"),
        }

        server::start_server(Arc::clone(&self.state)).await?;
        Ok(())
    }
}
