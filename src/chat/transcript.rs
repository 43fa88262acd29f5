//! Session transcript built from whole user/assistant exchanges.

use crate::types::{Message, Role};

/// One completed turn: the user prompt and the assembled reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    user: Message,
    assistant: Message,
}

impl Exchange {
    pub fn new(prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user: Message::user(prompt),
            assistant: Message::assistant(reply),
        }
    }
}

/// Chronological message log for one chat session.
///
/// Messages only enter through [`Transcript::push_exchange`], so the log
/// always alternates user, assistant and never holds an unpaired entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append both halves of a completed exchange.
    pub fn push_exchange(&mut self, exchange: Exchange) {
        self.messages.reserve(2);
        self.messages.push(exchange.user);
        self.messages.push(exchange.assistant);
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed exchanges.
    pub fn exchange_count(&self) -> usize {
        self.messages.len() / 2
    }

    /// Iterate `(user, assistant)` pairs.
    pub fn exchanges(&self) -> impl Iterator<Item = (&Message, &Message)> {
        self.messages.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Whether roles strictly alternate user, assistant.
    pub fn is_well_formed(&self) -> bool {
        self.messages.len() % 2 == 0
            && self
                .exchanges()
                .all(|(user, assistant)| user.role == Role::User && assistant.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_is_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.exchange_count(), 0);
        assert!(transcript.is_well_formed());
    }

    #[test]
    fn exchanges_append_as_alternating_pairs() {
        let mut transcript = Transcript::new();
        for n in 0..3 {
            transcript.push_exchange(Exchange::new(format!("q{n}"), format!("a{n}")));
        }

        assert_eq!(transcript.len(), 6);
        assert_eq!(transcript.exchange_count(), 3);
        assert!(transcript.is_well_formed());
        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
        let (user, assistant) = transcript.exchanges().nth(1).unwrap();
        assert_eq!(user.content, "q1");
        assert_eq!(assistant.content, "a1");
    }

    #[test]
    fn empty_prompt_and_reply_still_form_a_pair() {
        let mut transcript = Transcript::new();
        transcript.push_exchange(Exchange::new("", ""));
        assert_eq!(transcript.messages()[0], Message::user(""));
        assert_eq!(transcript.messages()[1], Message::assistant(""));
    }
}
