//! Met exhibits skill: which exhibitions are ending soon.

use exhibit_core::date::{DateResolution, DateResolver};
use exhibit_core::select::select_next_ending;
use exhibit_core::speech::format_listings;
use exhibit_core::voice::{
    Intent, SkillRequest, SkillResponse, DATE_SLOT, HELP_INTENT, INTENT_REQUEST, LAUNCH_REQUEST,
    NEXT_EXHIBITS_INTENT, SESSION_ENDED_REQUEST,
};
use tracing::{debug, warn};

use super::{check_application_id, intent_of, SkillError};
use crate::server::AppState;

pub const TITLE: &str = "Met Exhibits";

pub const HELP: &str = "To learn about ongoing Met Exhibits, ask me about the next exhibits or the next exhibits after a date";
pub const BAD_DATE: &str =
    "I didn't understand what date you asked for. Try asking for a specific date or month.";

/// Handle one exhibits skill request.
pub async fn handle(state: &AppState, request: &SkillRequest) -> Result<SkillResponse, SkillError> {
    check_application_id(&state.config.exhibits_app_id, request)?;

    match request.request.request_type.as_str() {
        LAUNCH_REQUEST => Ok(help()),
        INTENT_REQUEST => {
            let intent = intent_of(request)?;
            match intent.name.as_str() {
                NEXT_EXHIBITS_INTENT => on_next_exhibits(state, intent).await,
                HELP_INTENT => Ok(help()),
                other => Err(SkillError::UnknownIntent(other.to_string())),
            }
        }
        SESSION_ENDED_REQUEST => Ok(SkillResponse::session_ended()),
        other => Err(SkillError::UnknownRequestType(other.to_string())),
    }
}

fn help() -> SkillResponse {
    SkillResponse::simple(TITLE, HELP)
}

async fn on_next_exhibits(state: &AppState, intent: &Intent) -> Result<SkillResponse, SkillError> {
    let resolver = DateResolver::new(state.config.exhibits_policy());
    let cutoff = match resolver.resolve_slot(intent.slot_value(DATE_SLOT), state.clock.now()) {
        DateResolution::Date(date) => Some(date),
        DateResolution::NotSupplied => None,
        DateResolution::Unparseable { token, reason } => {
            warn!(token = %token, reason = %reason, "unexpected date");
            return Ok(bad_date(state));
        }
    };

    let listings = state.catalog.lock().await.current_listings().await?;
    let selected = select_next_ending(&listings, cutoff, state.config.listing_limit);
    debug!(
        cutoff = ?cutoff,
        available = listings.len(),
        selected = selected.len(),
        "selected exhibits"
    );

    Ok(SkillResponse::simple(TITLE, &format_listings(selected)))
}

fn bad_date(state: &AppState) -> SkillResponse {
    if state.config.reprompt_on_bad_date {
        SkillResponse::with_reprompt(TITLE, BAD_DATE, HELP)
    } else {
        SkillResponse::simple(TITLE, BAD_DATE)
    }
}
