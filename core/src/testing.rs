//! Test doubles shared by the unit tests in this crate.

use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, Tool, ToolResult};
use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
}

/// Replays canned responses in order and records every request it receives.
/// Errors once the script runs out.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: request.messages.to_vec(),
            tool_names: request
                .tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.name.clone())
                .collect(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted provider exhausted"))
    }
}

pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo the text argument"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let text = crate::tools::extract_string_arg(&args, "text")?;
        Ok(ToolResult::success(text))
    }
}

#[derive(Debug, Clone)]
pub struct StubRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl StubRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct StubState {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    requests: Mutex<Vec<StubRequest>>,
}

/// Local HTTP server that answers every request with one canned response
/// and records what it received.
pub struct StubServer {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubServer {
    pub async fn json(status: u16, body: impl Into<String>) -> Self {
        Self::start(status, "application/json", body.into()).await
    }

    pub async fn html(status: u16, body: impl Into<String>) -> Self {
        Self::start(status, "text/html; charset=utf-8", body.into()).await
    }

    async fn start(status: u16, content_type: &'static str, body: String) -> Self {
        let state = Arc::new(StubState {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.requests.lock().unwrap().push(StubRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.body.clone(),
    )
}
