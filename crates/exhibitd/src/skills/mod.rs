//! Voice skill request handling.
//!
//! Each skill validates the application ID, dispatches on request and intent
//! type, and turns its answer into a speech response. Errors are rendered to
//! speech once, at the HTTP boundary.

pub mod color;
pub mod exhibits;

use exhibit_core::catalog::CatalogError;
use exhibit_core::voice::{Intent, SkillRequest};
use thiserror::Error;

/// Prefix of the spoken message for any failed request.
const ERROR_PREFIX: &str = "There was an error: ";

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Invalid Application ID: {0}")]
    InvalidApplicationId(String),
    #[error("Unknown request type: {0}")]
    UnknownRequestType(String),
    #[error("Unknown intent type: {0}")]
    UnknownIntent(String),
    #[error("intent request carried no intent")]
    MissingIntent,
    #[error("no lighting schedule is configured")]
    ScheduleUnavailable,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl SkillError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidApplicationId(_) => "invalid_application_id",
            Self::UnknownRequestType(_) => "unknown_request_type",
            Self::UnknownIntent(_) => "unknown_intent",
            Self::MissingIntent => "missing_intent",
            Self::ScheduleUnavailable => "schedule_unavailable",
            Self::Catalog(_) => "catalog",
        }
    }

    /// Spoken form of the error.
    pub fn speech(&self) -> String {
        format!("{ERROR_PREFIX}{self}")
    }
}

/// Reject requests addressed to another application. An empty `expected` disables the check.
fn check_application_id(expected: &str, request: &SkillRequest) -> Result<(), SkillError> {
    let actual = request.application_id();
    if expected.is_empty() || actual == expected {
        Ok(())
    } else {
        Err(SkillError::InvalidApplicationId(actual.to_string()))
    }
}

fn intent_of(request: &SkillRequest) -> Result<&Intent, SkillError> {
    request
        .request
        .intent
        .as_ref()
        .ok_or(SkillError::MissingIntent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exhibit_core::catalog::FeedError;

    #[test]
    fn application_id_check() {
        let request = SkillRequest::launch("app-1");
        assert!(check_application_id("app-1", &request).is_ok());
        assert!(check_application_id("", &request).is_ok());
        assert!(matches!(
            check_application_id("app-2", &request),
            Err(SkillError::InvalidApplicationId(id)) if id == "app-1"
        ));
    }

    #[test]
    fn errors_render_as_speech() {
        assert_eq!(
            SkillError::UnknownIntent("Foo".to_string()).speech(),
            "There was an error: Unknown intent type: Foo"
        );
        let err = SkillError::from(CatalogError::Feed(FeedError::Request("timed out".to_string())));
        assert_eq!(err.kind(), "catalog");
        assert_eq!(
            err.speech(),
            "There was an error: listings request failed: timed out"
        );
    }

    #[test]
    fn launch_request_has_no_intent() {
        let request = SkillRequest::launch("app");
        assert!(matches!(intent_of(&request), Err(SkillError::MissingIntent)));
    }
}
