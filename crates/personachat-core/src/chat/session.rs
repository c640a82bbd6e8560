//! Streaming chat session.
//!
//! Owns the transcript for one conversation with one bot. Every transition
//! is a synchronous step so a host can interleave them with the model
//! service stream however it likes:
//!
//! 1. `submit` appends the user message and an empty model placeholder
//! 2. `begin_streaming` once the request is issued
//! 3. `apply_fragment` for each text fragment, addressed by placeholder id
//! 4. `complete` or `fail`

use tracing::{debug, warn};

use personachat_types::bot::Bot;
use personachat_types::chat::{CONNECTION_ERROR_MARKER, ChatStatus, Message, MessageId};
use personachat_types::error::SessionError;
use personachat_types::llm::{CompletionRequest, LlmError, Turn};

/// An accepted submit: the placeholder to stream into and the request to send.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    pub placeholder_id: MessageId,
    pub request: CompletionRequest,
}

/// One conversation with one bot.
#[derive(Debug, Clone)]
pub struct StreamingChatSession {
    bot: Bot,
    transcript: Vec<Message>,
    status: ChatStatus,
    /// Placeholder receiving fragments. Set only while loading or streaming.
    active: Option<MessageId>,
    temperature: Option<f64>,
}

impl StreamingChatSession {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            transcript: Vec::new(),
            status: ChatStatus::Idle,
            active: None,
            temperature: None,
        }
    }

    /// Sampling temperature attached to every request from this session.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn persona(&self) -> &str {
        &self.bot.persona
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.transcript.iter().find(|m| &m.id == id)
    }

    /// The placeholder currently accepting fragments, if an exchange is in flight.
    pub fn active_target(&self) -> Option<&MessageId> {
        self.active.as_ref()
    }

    /// Transcript framed for the model service: blank messages dropped.
    pub fn history(&self) -> Vec<Turn> {
        self.transcript
            .iter()
            .filter(|m| !m.is_blank())
            .map(|m| Turn {
                role: m.role,
                content: m.text.clone(),
            })
            .collect()
    }

    /// Accept a user turn.
    ///
    /// Rejected without touching the transcript while an exchange is in
    /// flight or when `text` is blank. On success the user message and an
    /// empty model placeholder are appended and the session is `loading`.
    pub fn submit(&mut self, text: &str) -> Result<PendingExchange, SessionError> {
        if self.status.is_busy() {
            debug!(status = %self.status, "submit rejected, exchange in flight");
            return Err(SessionError::Busy(self.status));
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let history = self.history();

        let user = Message::user(text);
        let placeholder = Message::model_placeholder();
        let placeholder_id = placeholder.id.clone();
        self.transcript.push(user);
        self.transcript.push(placeholder);
        self.active = Some(placeholder_id.clone());
        self.status = ChatStatus::Loading;

        let mut request = CompletionRequest::open(self.bot.persona.clone(), history).send(text);
        request.temperature = self.temperature;

        debug!(
            message_id = %placeholder_id,
            history_len = request.history().len(),
            "exchange submitted"
        );

        Ok(PendingExchange {
            placeholder_id,
            request,
        })
    }

    /// The request has been issued: `loading -> streaming`.
    pub fn begin_streaming(&mut self, id: &MessageId) -> Result<(), SessionError> {
        self.ensure_target(id)?;
        match self.status {
            ChatStatus::Loading => {
                self.status = ChatStatus::Streaming;
                Ok(())
            }
            ChatStatus::Streaming => Ok(()),
            from => Err(SessionError::InvalidTransition {
                from,
                to: ChatStatus::Streaming,
            }),
        }
    }

    /// Append a fragment to the active placeholder.
    ///
    /// A fragment arriving while still `loading` moves the session to
    /// `streaming`.
    pub fn apply_fragment(&mut self, id: &MessageId, fragment: &str) -> Result<(), SessionError> {
        self.ensure_target(id)?;
        if self.status == ChatStatus::Loading {
            self.status = ChatStatus::Streaming;
        }
        let message = self.message_mut(id)?;
        message.text.push_str(fragment);
        Ok(())
    }

    /// End of stream: keep whatever was accumulated and return to `idle`.
    pub fn complete(&mut self, id: &MessageId) -> Result<(), SessionError> {
        self.ensure_target(id)?;
        self.active = None;
        self.status = ChatStatus::Idle;
        Ok(())
    }

    /// The exchange failed. Partial text is kept; an empty placeholder gets
    /// the connection error marker.
    pub fn fail(&mut self, id: &MessageId, error: &LlmError) -> Result<(), SessionError> {
        self.ensure_target(id)?;
        let message = self.message_mut(id)?;
        let partial = !message.text.is_empty();
        if !partial {
            message.text = CONNECTION_ERROR_MARKER.to_string();
        }
        self.active = None;
        self.status = ChatStatus::Error;
        warn!(message_id = %id, partial, error = %error, "exchange failed");
        Ok(())
    }

    /// Drop the transcript. Not allowed mid-exchange.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        if self.status.is_busy() {
            return Err(SessionError::Busy(self.status));
        }
        self.transcript.clear();
        self.status = ChatStatus::Idle;
        Ok(())
    }

    fn ensure_target(&self, id: &MessageId) -> Result<(), SessionError> {
        match &self.active {
            Some(active) if active == id => Ok(()),
            _ if self.message(id).is_some() => Err(SessionError::NotActiveTarget(id.clone())),
            _ => Err(SessionError::UnknownMessage(id.clone())),
        }
    }

    fn message_mut(&mut self, id: &MessageId) -> Result<&mut Message, SessionError> {
        self.transcript
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| SessionError::UnknownMessage(id.clone()))
    }
}
