//! LlmProvider trait definition.
//!
//! The boundary to the external model service. `stream` returns
//! `Pin<Box<dyn Stream>>` so the trait stays usable behind `BoxLlmProvider`.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use personachat_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Boxed stream of provider events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for model service backends.
///
/// A stream is finite and not restartable: it yields text fragments in the
/// order the service produced them, then ends, or yields an error at any
/// point. Implementations live in personachat-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Model used when the request does not override it.
    fn model(&self) -> &str;

    /// Send a request and stream the reply.
    fn stream(&self, request: CompletionRequest) -> EventStream;

    /// Send a request and collect the whole reply text.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send {
        collect_text(self.stream(request))
    }
}

/// Drain a stream, concatenating every text delta in order.
pub async fn collect_text(mut stream: EventStream) -> Result<String, LlmError> {
    let mut text = String::new();
    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::TextDelta { text: delta } => text.push_str(&delta),
            StreamEvent::Done => break,
            _ => {}
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(Vec<Result<StreamEvent, LlmError>>);

    impl LlmProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        fn stream(&self, _request: CompletionRequest) -> EventStream {
            let events = self.0.clone();
            Box::pin(async_stream::stream! {
                for event in events {
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

    #[tokio::test]
    async fn test_complete_concatenates_deltas() {
        let provider = Scripted(vec![
            Ok(StreamEvent::Connected),
            delta("Hel"),
            delta("lo"),
            Ok(StreamEvent::Done),
            delta("ignored"),
        ]);
        let text = provider
            .complete(CompletionRequest::open("persona", vec![]).send("hi"))
            .await
            .unwrap();
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn test_complete_surfaces_stream_error() {
        let provider = Scripted(vec![delta("Par"), Err(LlmError::Stream("reset".into()))]);
        let err = provider
            .complete(CompletionRequest::open("persona", vec![]).send("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Stream(_)));
    }
}
