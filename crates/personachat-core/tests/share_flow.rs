//! End-to-end flow through the core: create a bot, share it, open the link
//! elsewhere and chat with the decoded copy.

use std::collections::HashMap;
use std::sync::Mutex;

use personachat_core::chat::exchange;
use personachat_core::chat::session::StreamingChatSession;
use personachat_core::llm::box_provider::BoxLlmProvider;
use personachat_core::llm::provider::{EventStream, LlmProvider};
use personachat_core::service::bot::BotService;
use personachat_core::share::link;
use personachat_core::storage::bot_store::LocalBotStore;
use personachat_core::storage::kv_store::KvStore;
use personachat_types::bot::CreateBotRequest;
use personachat_types::chat::{ChatStatus, MessageRole};
use personachat_types::error::{DecodeError, RepositoryError};
use personachat_types::llm::{CompletionRequest, StreamEvent};

#[derive(Default)]
struct MemoryKv(Mutex<HashMap<String, String>>);

impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.0
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
        self.0.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Echoes the persona name and the user's text back in three fragments.
struct EchoProvider;

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }

    fn stream(&self, request: CompletionRequest) -> EventStream {
        let persona = request.system.unwrap_or_default();
        let last = request
            .messages
            .last()
            .map(|t| t.content.clone())
            .unwrap_or_default();
        Box::pin(async_stream::stream! {
            yield Ok(StreamEvent::Connected);
            yield Ok(StreamEvent::TextDelta { text: format!("[{persona}] ") });
            yield Ok(StreamEvent::TextDelta { text: "you said: ".to_string() });
            yield Ok(StreamEvent::TextDelta { text: last });
            yield Ok(StreamEvent::Done);
        })
    }
}

#[tokio::test]
async fn test_create_share_open_and_chat() {
    let service = BotService::new(
        LocalBotStore::new(MemoryKv::default()),
        "http://localhost:3000",
    );
    let created = service
        .create_bot(CreateBotRequest {
            name: "Pirate Pete".to_string(),
            persona: "Pirate".to_string(),
            avatar_url: None,
        })
        .await
        .unwrap();

    // The recipient only has the link.
    let shared = link::open_shared_bot(&created.link).unwrap();
    assert_eq!(shared.name, "Pirate Pete");
    assert_eq!(shared.avatar_url, created.bot.avatar_url);

    let provider = BoxLlmProvider::new(EchoProvider);
    let mut session = StreamingChatSession::new(shared);

    let outcome = exchange::send(&mut session, &provider, "ahoy", |_| {})
        .await
        .unwrap();
    assert_eq!(outcome.text, "[Pirate] you said: ahoy");
    assert_eq!(session.status(), ChatStatus::Idle);

    let outcome = exchange::send(&mut session, &provider, "again", |_| {})
        .await
        .unwrap();
    assert_eq!(outcome.text, "[Pirate] you said: again");

    let roles: Vec<MessageRole> = session.transcript().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::User,
            MessageRole::Model,
            MessageRole::User,
            MessageRole::Model,
        ]
    );
}

#[test]
fn test_broken_link_is_rejected() {
    let err = link::open_shared_bot("http://localhost:3000/#/chat/share?data=%%%").unwrap_err();
    assert!(matches!(err, DecodeError::Encoding(_)));

    let err = link::open_shared_bot("http://localhost:3000/#/chat/share").unwrap_err();
    assert_eq!(err, DecodeError::MissingField("data"));
}
