//! Output rendering for exhibitctl.

use exhibit_core::voice::SkillResponse;

/// Print what the skill would say.
pub fn print_response(response: &SkillResponse) {
    match response.speech() {
        Some(text) => println!("{text}"),
        None => println!("(no speech)"),
    }

    if let Some(reprompt) = response.reprompt() {
        println!();
        println!("  Reprompt: {reprompt}");
    }
    if !response.response.should_end_session {
        println!("  Session:  open");
    }
}
