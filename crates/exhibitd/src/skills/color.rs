//! Empire State Building color skill: what the tower is lit for on a date.

use chrono::NaiveDate;
use exhibit_core::date::{DateResolution, DateResolver};
use exhibit_core::speech::month_day;
use exhibit_core::voice::{
    Intent, SkillRequest, SkillResponse, COLOR_INTENT, DATE_SLOT, HELP_INTENT, INTENT_REQUEST,
    LAUNCH_REQUEST, SESSION_ENDED_REQUEST,
};
use tracing::warn;

use super::{check_application_id, intent_of, SkillError};
use crate::schedule::LightingSchedule;
use crate::server::AppState;

pub const TITLE: &str = "Empire State Building Color";

pub const HELP: &str = "Ask me about a date to learn the color of the Empire State Building.";
pub const BAD_DATE: &str = "I didn't understand what date you asked for. Try asking for a specific date or day this week.";

/// Handle one color skill request.
pub fn handle(state: &AppState, request: &SkillRequest) -> Result<SkillResponse, SkillError> {
    check_application_id(&state.config.color_app_id, request)?;

    match request.request.request_type.as_str() {
        LAUNCH_REQUEST => Ok(help()),
        INTENT_REQUEST => {
            let intent = intent_of(request)?;
            match intent.name.as_str() {
                COLOR_INTENT => on_color(state, intent),
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

fn on_color(state: &AppState, intent: &Intent) -> Result<SkillResponse, SkillError> {
    let now = state.clock.now();
    let resolver = DateResolver::new(state.config.color_policy());
    let date = match resolver.resolve_slot(intent.slot_value(DATE_SLOT), now) {
        DateResolution::Date(date) => date,
        // No slot at all asks about right now, with no early-morning adjustment.
        DateResolution::NotSupplied => now.date(),
        DateResolution::Unparseable { token, reason } => {
            warn!(token = %token, reason = %reason, "unexpected date");
            return Ok(if state.config.reprompt_on_bad_date {
                SkillResponse::with_reprompt(TITLE, BAD_DATE, HELP)
            } else {
                SkillResponse::simple(TITLE, BAD_DATE)
            });
        }
    };

    let schedule = state
        .schedule
        .as_deref()
        .ok_or(SkillError::ScheduleUnavailable)?;

    Ok(SkillResponse::simple(TITLE, &lighting_answer(schedule, date)))
}

/// Spoken answer for `date`.
pub fn lighting_answer(schedule: &dyn LightingSchedule, date: NaiveDate) -> String {
    match schedule.lighting_for(date) {
        Some(lighting) => format!(
            "On {}, the Empire State Building is lit {lighting}.",
            month_day(date)
        ),
        None => format!(
            "I don't have lighting information for {}.",
            month_day(date)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleFile;

    #[test]
    fn answers_from_schedule() {
        let schedule =
            ScheduleFile::from_yaml("- date: 2016-03-17\n  lighting: green\n").unwrap();
        let date = NaiveDate::from_ymd_opt(2016, 3, 17).unwrap();
        assert_eq!(
            lighting_answer(&schedule, date),
            "On March 17, the Empire State Building is lit green."
        );
        let other = NaiveDate::from_ymd_opt(2016, 3, 18).unwrap();
        assert_eq!(
            lighting_answer(&schedule, other),
            "I don't have lighting information for March 18."
        );
    }
}
