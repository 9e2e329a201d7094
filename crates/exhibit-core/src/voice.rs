//! Voice platform request and response envelopes.
//!
//! Only the fields the skills read or write are modeled; everything else in the
//! platform's JSON is ignored on input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const LAUNCH_REQUEST: &str = "LaunchRequest";
pub const INTENT_REQUEST: &str = "IntentRequest";
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const NEXT_EXHIBITS_INTENT: &str = "GetNextExhibits";
pub const COLOR_INTENT: &str = "GetESBColor";

/// Name of the slot carrying the requested date.
pub const DATE_SLOT: &str = "Date";

const RESPONSE_VERSION: &str = "1.0";
const PLAIN_TEXT: &str = "PlainText";
const SIMPLE_CARD: &str = "Simple";
const CARD_TITLE_PREFIX: &str = "SessionSpeechlet - ";

// --- Request ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub session: Session,
    pub request: RequestBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub application: Application,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Intent {
    /// Value of a slot, if the slot exists and carries a value.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|slot| slot.value.as_deref())
    }
}

impl SkillRequest {
    pub fn launch(application_id: &str) -> Self {
        Self::new(application_id, LAUNCH_REQUEST, None)
    }

    /// Intent request with an optional `Date` slot value.
    pub fn intent(application_id: &str, intent_name: &str, date: Option<&str>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(
            DATE_SLOT.to_string(),
            Slot {
                name: DATE_SLOT.to_string(),
                value: date.map(String::from),
            },
        );
        let intent = Intent {
            name: intent_name.to_string(),
            slots,
        };
        Self::new(application_id, INTENT_REQUEST, Some(intent))
    }

    fn new(application_id: &str, request_type: &str, intent: Option<Intent>) -> Self {
        Self {
            version: Some(RESPONSE_VERSION.to_string()),
            session: Session {
                application: Application {
                    application_id: application_id.to_string(),
                },
            },
            request: RequestBody {
                request_type: request_type.to_string(),
                request_id: None,
                intent,
            },
        }
    }

    pub fn application_id(&self) -> &str {
        &self.session.application.application_id
    }
}

// --- Response ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub version: String,
    pub session_attributes: HashMap<String, serde_json::Value>,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub card_type: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl OutputSpeech {
    fn plain(text: Option<&str>) -> Self {
        Self {
            speech_type: PLAIN_TEXT.to_string(),
            text: text.map(String::from),
        }
    }
}

impl SkillResponse {
    /// Speak `text` and end the session.
    pub fn simple(title: &str, text: &str) -> Self {
        Self::speechlet(title, text, None, true)
    }

    /// Speak `text` and keep the session open, prompting with `reprompt`.
    pub fn with_reprompt(title: &str, text: &str, reprompt: &str) -> Self {
        Self::speechlet(title, text, Some(reprompt), false)
    }

    /// Acknowledgement for a session the platform already closed.
    pub fn session_ended() -> Self {
        Self::wrap(ResponseBody {
            output_speech: None,
            card: None,
            reprompt: None,
            should_end_session: true,
        })
    }

    fn speechlet(title: &str, text: &str, reprompt: Option<&str>, should_end_session: bool) -> Self {
        Self::wrap(ResponseBody {
            output_speech: Some(OutputSpeech::plain(Some(text))),
            card: Some(Card {
                card_type: SIMPLE_CARD.to_string(),
                title: format!("{CARD_TITLE_PREFIX}{title}"),
                content: format!("{CARD_TITLE_PREFIX}{text}"),
            }),
            reprompt: Some(Reprompt {
                output_speech: OutputSpeech::plain(reprompt),
            }),
            should_end_session,
        })
    }

    fn wrap(response: ResponseBody) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes: HashMap::new(),
            response,
        }
    }

    /// The spoken text, if any.
    pub fn speech(&self) -> Option<&str> {
        self.response
            .output_speech
            .as_ref()
            .and_then(|speech| speech.text.as_deref())
    }

    /// The reprompt text, if any.
    pub fn reprompt(&self) -> Option<&str> {
        self.response
            .reprompt
            .as_ref()
            .and_then(|reprompt| reprompt.output_speech.text.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_platform_intent_request() {
        let body = json!({
            "version": "1.0",
            "session": {
                "new": true,
                "sessionId": "SessionId.1",
                "application": { "applicationId": "amzn1.ask.skill.test" }
            },
            "request": {
                "type": "IntentRequest",
                "requestId": "EdwRequestId.1",
                "locale": "en-US",
                "intent": {
                    "name": "GetNextExhibits",
                    "slots": { "Date": { "name": "Date", "value": "2016-03-01" } }
                }
            }
        });

        let request: SkillRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.application_id(), "amzn1.ask.skill.test");
        assert_eq!(request.request.request_type, INTENT_REQUEST);
        assert_eq!(request.request.request_id.as_deref(), Some("EdwRequestId.1"));
        let intent = request.request.intent.unwrap();
        assert_eq!(intent.slot_value(DATE_SLOT), Some("2016-03-01"));
    }

    #[test]
    fn slot_without_value_reads_as_none() {
        let body = json!({
            "session": { "application": { "applicationId": "app" } },
            "request": {
                "type": "IntentRequest",
                "intent": { "name": "GetNextExhibits", "slots": { "Date": { "name": "Date" } } }
            }
        });
        let request: SkillRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.request.intent.unwrap().slot_value(DATE_SLOT), None);
    }

    #[test]
    fn simple_response_matches_platform_shape() {
        let response = SkillResponse::simple("Met Exhibits", "Hello");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "version": "1.0",
                "sessionAttributes": {},
                "response": {
                    "outputSpeech": { "type": "PlainText", "text": "Hello" },
                    "card": {
                        "type": "Simple",
                        "title": "SessionSpeechlet - Met Exhibits",
                        "content": "SessionSpeechlet - Hello"
                    },
                    "reprompt": { "outputSpeech": { "type": "PlainText", "text": null } },
                    "shouldEndSession": true
                }
            })
        );
    }

    #[test]
    fn reprompt_response_keeps_session_open() {
        let response = SkillResponse::with_reprompt("Met Exhibits", "Pardon?", "Ask again");
        assert_eq!(response.speech(), Some("Pardon?"));
        assert_eq!(response.reprompt(), Some("Ask again"));
        assert!(!response.response.should_end_session);
    }

    #[test]
    fn intent_builder_round_trips_date_slot() {
        let request = SkillRequest::intent("app", "GetESBColor", Some("PRESENT_REF"));
        let text = serde_json::to_string(&request).unwrap();
        let parsed: SkillRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, request);
        assert_eq!(
            parsed.request.intent.unwrap().slot_value(DATE_SLOT),
            Some("PRESENT_REF")
        );
    }
}
