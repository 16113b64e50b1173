//! Speech readout for detection results

use tracing::{debug, warn};

/// Thin wrapper around the platform speech engine.
///
/// Speech is cosmetic: if the engine cannot be created or an utterance
/// fails, the event is logged and everything else keeps working.
pub struct Narrator {
    engine: Option<tts::Tts>,
}

impl Narrator {
    pub fn new() -> Self {
        let engine = match tts::Tts::default() {
            Ok(tts) => Some(tts),
            Err(e) => {
                warn!(error = %e, "Speech synthesis unavailable");
                None
            }
        };
        Self { engine }
    }

    /// Announce the detected group, interrupting any ongoing utterance.
    pub fn announce(&mut self, blood_group: &str) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let message = format!("Detected blood group is {}", blood_group);
        debug!(text = %message, "Speaking");
        if let Err(e) = engine.speak(message, true) {
            warn!(error = %e, "Speech synthesis failed");
        }
    }
}
