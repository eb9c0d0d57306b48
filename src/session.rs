//! Session-scoped owner of the conversation and the in-flight request slot.
//!
//! A turn goes Idle → Sending → (Succeeded | Failed) → Idle. Only one turn
//! can be Sending: [`ChatSession::begin_turn`] hands out a [`RequestToken`]
//! and refuses new turns until that token comes back through
//! [`ChatSession::finish_turn`].

use crate::ai::{ChatResult, CompletionClient};
use crate::conversation::Conversation;
use crate::types::ChatMessage;

/// Identifies the single outstanding request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending(RequestToken),
}

/// Why a submission did not start a turn. Neither case changes any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnRejected {
    #[error("message is empty")]
    EmptyInput,
    #[error("a reply is still pending")]
    Busy,
}

/// How a finished turn ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Succeeded(String),
    Failed { fallback: &'static str, reason: String },
}

impl TurnOutcome {
    /// The assistant text that was appended.
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Succeeded(reply) => reply,
            TurnOutcome::Failed { fallback, .. } => fallback,
        }
    }
}

/// A started turn: the token to finish it with and what to send.
#[derive(Clone, Debug)]
pub struct PendingTurn {
    pub token: RequestToken,
    pub user_text: String,
    /// Transcript before this turn's user message.
    pub prior: Vec<ChatMessage>,
}

pub struct ChatSession {
    conversation: Conversation,
    client: CompletionClient,
    phase: TurnPhase,
    next_token: u64,
}

impl ChatSession {
    pub fn new(client: CompletionClient, conversation: Conversation) -> Self {
        Self {
            conversation,
            client,
            phase: TurnPhase::Idle,
            next_token: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.phase, TurnPhase::Sending(_))
    }

    /// Validate input, append the user message, and claim the request slot.
    pub fn begin_turn(&mut self, input: &str) -> Result<PendingTurn, TurnRejected> {
        let text = input.trim();
        if text.is_empty() {
            return Err(TurnRejected::EmptyInput);
        }
        if self.is_sending() {
            tracing::debug!("turn rejected while a request is outstanding");
            return Err(TurnRejected::Busy);
        }

        let prior = self.conversation.messages().to_vec();
        self.conversation.append(ChatMessage::user(text));

        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.phase = TurnPhase::Sending(token);
        tracing::debug!(?token, transcript = prior.len(), "turn started");

        Ok(PendingTurn {
            token,
            user_text: text.to_string(),
            prior,
        })
    }

    /// Append the reply (or its fallback) and release the request slot.
    ///
    /// Returns `None` and leaves the session untouched when `token` is not
    /// the outstanding one.
    pub fn finish_turn(
        &mut self,
        token: RequestToken,
        result: ChatResult<String>,
    ) -> Option<TurnOutcome> {
        if self.phase != TurnPhase::Sending(token) {
            tracing::debug!(?token, "ignoring reply for a request that is not outstanding");
            return None;
        }

        Some(self.settle(result))
    }

    fn settle(&mut self, result: ChatResult<String>) -> TurnOutcome {
        let outcome = match result {
            Ok(reply) => TurnOutcome::Succeeded(reply),
            Err(err) => {
                tracing::warn!(error = %err, "turn failed, showing fallback");
                TurnOutcome::Failed {
                    fallback: err.fallback_text(),
                    reason: err.to_string(),
                }
            }
        };

        self.conversation.append(ChatMessage::assistant(outcome.text()));
        self.phase = TurnPhase::Idle;
        outcome
    }

    /// Run a whole turn for callers that own the session across the await.
    pub async fn send_turn(&mut self, input: &str) -> Result<TurnOutcome, TurnRejected> {
        let turn = self.begin_turn(input)?;
        let client = self.client.clone();
        let result = client.complete(&turn.user_text, &turn.prior).await;
        Ok(self.settle(result))
    }
}
