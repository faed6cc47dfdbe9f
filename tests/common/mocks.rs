use async_trait::async_trait;
use prompt_gateway::{
    Error, Result,
    llm::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, LlmClient, Part},
    upload::UploadStorage,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Ordered record of side effects shared between mocks.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Mock LLM client for testing
#[derive(Debug, Default)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<GenerateContentResponse>>>,
    pub requests: Arc<Mutex<Vec<GenerateContentRequest>>>,
    pub error: Option<String>,
    pub delay: Option<Duration>,
    pub events: Option<EventLog>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, text: &str) -> Self {
        self.responses.lock().unwrap().push(create_text_response(text));
        self
    }

    pub fn with_responses(self, responses: Vec<GenerateContentResponse>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn get_requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.requests.lock().unwrap().push(request);
        if let Some(ref events) = self.events {
            events.lock().unwrap().push("provider".to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref error) = self.error {
            return Err(Error::provider(error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::provider("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

/// In-memory upload storage that records every write.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    pub writes: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    pub fail_with: Option<String>,
    pub events: Option<EventLog>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, error: &str) -> Self {
        self.fail_with = Some(error.to_string());
        self
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn written_names(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl UploadStorage for RecordingStorage {
    async fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        if let Some(ref events) = self.events {
            events.lock().unwrap().push("storage".to_string());
        }
        if let Some(ref error) = self.fail_with {
            return Err(Error::storage(error.clone()));
        }

        self.writes
            .lock()
            .unwrap()
            .push((name.to_string(), data.to_vec()));
        Ok(PathBuf::from("memory").join(name))
    }
}

// Helper functions for creating test data

pub fn create_text_response(text: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".to_string()),
                parts: vec![Part::text(text)],
            }),
            finish_reason: Some("STOP".to_string()),
        }],
        prompt_feedback: None,
        usage_metadata: None,
    }
}

pub fn create_blocked_response() -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: None,
            finish_reason: Some("SAFETY".to_string()),
        }],
        prompt_feedback: None,
        usage_metadata: None,
    }
}
