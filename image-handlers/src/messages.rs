//! User-facing replies.

pub const MSG_NOT_ALLOWED: &str = "You are not allowed to use this command.";
pub const MSG_REGISTER_FIRST: &str = "Please register first using /register command";
pub const MSG_ALREADY_REGISTERED: &str = "You are already registered!";
pub const MSG_REGISTERED: &str = "You have been successfully registered!";
pub const MSG_GENERATION_STARTED: &str = "Your image is being generated. Please wait for a while. 🧙‍♂️";
pub const MSG_NOT_UNDERSTOOD: &str = "I do not understand what you are saying. 😔";
pub const MSG_GENERATION_FAILED: &str = "Sorry, image generation failed. Please try again later.";

pub fn welcome_message(name: &str) -> String {
    format!("Hello, {}! Welcome! 🧙‍♂️", name)
}
