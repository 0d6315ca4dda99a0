//! Plain-text presentation of chats, messages and backend failures.

use std::fmt::Write;

use codechat::types::{Chat, ChatDetail, Role, UserProfile};

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
pub const GENERATE_FAILED: &str = "Failed to generate code";
pub const SESSION_NOT_SAVED: &str = "Authenticated, but the session could not be saved; check the state directory";
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Backend message, or `fallback` when the backend sent none.
#[must_use]
pub fn failure_message(message: &str, fallback: &str) -> String {
    let message = message.trim();
    if message.is_empty() { fallback.to_owned() } else { message.to_owned() }
}

#[must_use]
pub fn user_line(user: &UserProfile) -> String {
    format!("{} <{}> (id {})", user.name, user.email, user.id)
}

#[must_use]
pub fn chat_list(chats: &[Chat]) -> String {
    if chats.is_empty() {
        return "No chats yet. Start one with `codechat generate`.".to_owned();
    }
    let width = chats
        .iter()
        .map(|c| c.id.to_string().len())
        .max()
        .unwrap_or(1);
    let mut out = String::new();
    for chat in chats {
        let _ = writeln!(out, "{:>width$}  {}  ({})", chat.id, chat.title, chat.updated_at);
    }
    out
}

#[must_use]
pub fn chat_detail(detail: &ChatDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} (chat {})", detail.chat.title, detail.chat.id);
    if detail.messages.is_empty() {
        out.push_str("\nNo messages in this chat.\n");
        return out;
    }
    for message in &detail.messages {
        out.push('\n');
        match message.role {
            Role::User => {
                let _ = writeln!(out, "> {}", message.content);
            }
            Role::Assistant => {
                let language = message.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
                let _ = writeln!(out, "--- generated code ({language}) ---");
                let _ = writeln!(out, "{}", message.content);
                out.push_str("---\n");
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
