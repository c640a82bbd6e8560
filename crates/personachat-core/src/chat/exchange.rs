//! Drives one exchange of a [`StreamingChatSession`] against a model provider.
//!
//! The provider stream is the only suspension point. Fragments are applied
//! to the session in the order the stream yields them.

use futures_util::StreamExt;
use tracing::{debug, info};

use personachat_types::chat::{ChatStatus, MessageId};
use personachat_types::error::SessionError;
use personachat_types::llm::{LlmError, StreamEvent};

use super::session::{PendingExchange, StreamingChatSession};
use crate::llm::box_provider::BoxLlmProvider;

/// How an exchange ended.
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    /// The model message that received the reply.
    pub message_id: MessageId,
    /// Session status after the exchange (`Idle` or `Error`).
    pub status: ChatStatus,
    /// Number of text fragments applied.
    pub fragments: usize,
    /// Final text of the model message.
    pub text: String,
    /// The provider failure, when `status` is `Error`.
    pub error: Option<LlmError>,
}

impl ExchangeOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Stream the reply for an accepted submit into the session.
///
/// `on_fragment` sees each fragment right after it was applied, for hosts
/// that render incrementally. Provider failures are recorded in the session
/// and reported in the outcome; `Err` is only returned when the session
/// itself rejects a step.
pub async fn run_exchange<F>(
    session: &mut StreamingChatSession,
    provider: &BoxLlmProvider,
    pending: PendingExchange,
    mut on_fragment: F,
) -> Result<ExchangeOutcome, SessionError>
where
    F: FnMut(&str),
{
    let PendingExchange {
        placeholder_id: id,
        request,
    } = pending;

    info!(
        message_id = %id,
        provider = provider.name(),
        model = provider.model(),
        history_len = request.history().len(),
        "starting exchange"
    );

    let mut stream = provider.stream(request);
    session.begin_streaming(&id)?;

    let mut fragments = 0usize;
    let mut failure = None;

    while let Some(event) = stream.next().await {
        match event {
            Ok(StreamEvent::TextDelta { text }) => {
                if text.is_empty() {
                    continue;
                }
                session.apply_fragment(&id, &text)?;
                on_fragment(&text);
                fragments += 1;
            }
            Ok(StreamEvent::Done) => break,
            Ok(StreamEvent::MessageDelta { stop_reason }) => {
                debug!(message_id = %id, %stop_reason, "stop reason received");
            }
            Ok(StreamEvent::Usage(usage)) => {
                debug!(
                    message_id = %id,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "usage reported"
                );
            }
            Ok(StreamEvent::Connected) => {}
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    match &failure {
        Some(e) => session.fail(&id, e)?,
        None => {
            session.complete(&id)?;
            info!(message_id = %id, fragments, "exchange complete");
        }
    }

    let text = session
        .message(&id)
        .map(|m| m.text.clone())
        .unwrap_or_default();

    Ok(ExchangeOutcome {
        message_id: id,
        status: session.status(),
        fragments,
        text,
        error: failure,
    })
}

/// Submit `text` and stream the reply.
pub async fn send<F>(
    session: &mut StreamingChatSession,
    provider: &BoxLlmProvider,
    text: &str,
    on_fragment: F,
) -> Result<ExchangeOutcome, SessionError>
where
    F: FnMut(&str),
{
    let pending = session.submit(text)?;
    run_exchange(session, provider, pending, on_fragment).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{EventStream, LlmProvider};
    use chrono::Utc;
    use personachat_types::bot::{Bot, BotId};
    use personachat_types::chat::{CONNECTION_ERROR_MARKER, MessageRole};
    use personachat_types::llm::{CompletionRequest, StopReason, Usage};
    use std::sync::{Arc, Mutex};

    /// Replays a fixed script of events and records every request it saw.
    struct ScriptedProvider {
        script: Vec<Result<StreamEvent, LlmError>>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<StreamEvent, LlmError>>) -> Self {
            Self {
                script,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        fn stream(&self, request: CompletionRequest) -> EventStream {
            self.requests.lock().unwrap().push(request);
            let script = self.script.clone();
            Box::pin(async_stream::stream! {
                for event in script {
                    yield event;
                }
            })
        }
    }

    fn delta(text: &str) -> Result<StreamEvent, LlmError> {
        Ok(StreamEvent::TextDelta {
            text: text.to_string(),
        })
    }

    fn test_session() -> StreamingChatSession {
        StreamingChatSession::new(Bot {
            id: BotId::new(),
            name: "Sage".to_string(),
            persona: "You are a calm sage.".to_string(),
            avatar_url: String::new(),
            created_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_fragments_streamed_in_order() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![
            Ok(StreamEvent::Connected),
            delta("Hel"),
            delta("lo"),
            delta(" there"),
            Ok(StreamEvent::MessageDelta {
                stop_reason: StopReason::EndTurn,
            }),
            Ok(StreamEvent::Usage(Usage {
                input_tokens: 5,
                output_tokens: 3,
            })),
            Ok(StreamEvent::Done),
        ]));
        let mut session = test_session();
        let mut seen = Vec::new();

        let outcome = send(&mut session, &provider, "Hi", |f| seen.push(f.to_string()))
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.text, "Hello there");
        assert_eq!(outcome.fragments, 3);
        assert_eq!(outcome.status, ChatStatus::Idle);
        assert_eq!(seen, vec!["Hel", "lo", " there"]);
        assert_eq!(
            session.message(&outcome.message_id).unwrap().text,
            "Hello there"
        );
        assert_eq!(session.status(), ChatStatus::Idle);
    }

    #[tokio::test]
    async fn test_end_of_stream_without_done_completes() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![delta("ok")]));
        let mut session = test_session();
        let outcome = send(&mut session, &provider, "Hi", |_| {}).await.unwrap();
        assert_eq!(outcome.status, ChatStatus::Idle);
        assert_eq!(outcome.text, "ok");
    }

    #[tokio::test]
    async fn test_failure_after_partial_text() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![
            delta("Par"),
            Err(LlmError::Stream("connection reset".to_string())),
            delta("never"),
        ]));
        let mut session = test_session();

        let outcome = send(&mut session, &provider, "Hi", |_| {}).await.unwrap();

        assert_eq!(outcome.status, ChatStatus::Error);
        assert_eq!(outcome.text, "Par");
        assert!(matches!(outcome.error, Some(LlmError::Stream(_))));
        assert_eq!(session.status(), ChatStatus::Error);
    }

    #[tokio::test]
    async fn test_failure_before_any_fragment() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![Err(
            LlmError::AuthenticationFailed,
        )]));
        let mut session = test_session();

        let outcome = send(&mut session, &provider, "Hi", |_| {}).await.unwrap();

        assert_eq!(outcome.status, ChatStatus::Error);
        assert_eq!(outcome.fragments, 0);
        assert_eq!(outcome.text, CONNECTION_ERROR_MARKER);
    }

    #[tokio::test]
    async fn test_empty_reply_completes_empty() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![
            delta(""),
            Ok(StreamEvent::Done),
        ]));
        let mut session = test_session();

        let outcome = send(&mut session, &provider, "Hi", |_| {}).await.unwrap();

        assert_eq!(outcome.status, ChatStatus::Idle);
        assert_eq!(outcome.fragments, 0);
        assert!(outcome.text.is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_persona_and_framed_history() {
        let scripted = ScriptedProvider::new(vec![Err(LlmError::Stream("down".to_string()))]);
        let requests = Arc::clone(&scripted.requests);
        let provider = BoxLlmProvider::new(scripted);
        let mut session = test_session();

        // The failed exchange leaves a user turn and the error marker reply.
        send(&mut session, &provider, "first", |_| {}).await.unwrap();
        send(&mut session, &provider, "second", |_| {}).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        let first = &requests[0];
        assert_eq!(first.system.as_deref(), Some("You are a calm sage."));
        assert!(first.history().is_empty());
        assert_eq!(first.messages.len(), 1);

        let second = &requests[1];
        let roles: Vec<MessageRole> = second.messages.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Model, MessageRole::User]
        );
        assert_eq!(second.messages[2].content, "second");
    }

    #[tokio::test]
    async fn test_send_rejects_blank_input() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![]));
        let mut session = test_session();
        let err = send(&mut session, &provider, "  ", |_| {}).await.unwrap_err();
        assert_eq!(err, SessionError::EmptyInput);
        assert!(session.transcript().is_empty());
    }
}
