//! Fixed spoken phrases.

pub const WELCOME: &str =
    "Hello, I am an Artificial Intelligence in Training. Please wait while I get ready to assist you.";
pub const READY: &str = "Initialization complete. I am ready to help!";
pub const HAPPILY: &str = "Happily.";
pub const UNKNOWN_REQUEST: &str = "Sorry, I don't understand that request.";
pub const RESEARCH_HOLD: &str = "I understand you want me to give a more detailed response, please hold while I load this rather hefty model.";
pub const RESEARCH_FAILED: &str = "Sorry, I couldn't come up with an answer to that.";
pub const CLASSIFY_FAILED: &str = "Sorry, something went wrong while I was listening. Please try again.";
pub const LIGHTS_FAILED: &str = "Sorry, I couldn't reach the lights.";
pub const MUSIC_FAILED: &str = "Sorry, I couldn't control the music.";

pub fn routing(intent: &str) -> String {
    format!("Routing you to: {intent}")
}

pub fn unsupported(intent: &str) -> String {
    format!("I don't have the functionality for {intent} yet.")
}

pub fn weather_failed(city: &str) -> String {
    format!("Sorry, I couldn't fetch the weather information for {city}.")
}
