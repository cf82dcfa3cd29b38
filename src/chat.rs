use chrono::Local;
use rand::Rng;

use crate::models::{ChatMessage, Role};
use crate::responder::Responder;

/// Ordered, append-only coach transcript.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> ChatSession {
        ChatSession::default()
    }

    /// Resumes a transcript loaded from storage.
    pub fn from_messages(messages: Vec<ChatMessage>) -> ChatSession {
        ChatSession { messages }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    /// Records the user's message and the coach's answer.
    ///
    /// Blank input is ignored and returns `None`.
    pub fn send<R: Rng + ?Sized>(
        &mut self,
        content: &str,
        responder: &Responder,
        rng: &mut R,
    ) -> Option<(&ChatMessage, &ChatMessage)> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let answer = responder.reply(content, rng);
        self.push(Role::User, content.to_string());
        self.push(Role::Assistant, answer);
        let n = self.messages.len();
        Some((&self.messages[n - 2], &self.messages[n - 1]))
    }

    fn push(&mut self, role: Role, content: String) {
        let id = self.messages.last().map(|m| m.id).unwrap_or(0) + 1;
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            timestamp: Local::now().to_rfc3339(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn send_appends_user_then_assistant() {
        let mut session = ChatSession::new();
        let mut rng = StdRng::seed_from_u64(7);
        let responder = Responder::default();

        let (user, coach) = session.send("  thanks coach ", &responder, &mut rng).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "thanks coach");
        assert_eq!(coach.role, Role::Assistant);
        assert!(coach.content.starts_with("You're very welcome!"));

        session.send("hello", &responder, &mut rng).unwrap();
        let ids: Vec<u64> = session.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut session = ChatSession::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(session.send("   ", &Responder::default(), &mut rng).is_none());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn ids_continue_after_resume() {
        let mut session = ChatSession::new();
        let mut rng = StdRng::seed_from_u64(7);
        session.send("hi", &Responder::default(), &mut rng);
        let mut resumed = ChatSession::from_messages(session.into_messages());
        resumed.send("hi again", &Responder::default(), &mut rng);
        assert_eq!(resumed.messages().last().unwrap().id, 4);
    }
}
