use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, ToolCall, ToolSpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OllamaTool>>,
    options: OllamaOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCallRequest>>,
}

#[derive(Debug, Serialize)]
struct OllamaToolCallRequest {
    function: OllamaFunctionRequest,
}

#[derive(Debug, Serialize)]
struct OllamaFunctionRequest {
    name: String,
    arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OllamaTool {
    r#type: String,
    function: OllamaToolFunction,
}

#[derive(Debug, Serialize)]
struct OllamaToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OllamaToolCallResponse>>,
}

#[derive(Debug, Deserialize)]
struct OllamaToolCallResponse {
    function: OllamaFunctionResponse,
}

#[derive(Debug, Deserialize)]
struct OllamaFunctionResponse {
    name: String,
    arguments: serde_json::Value,
}

pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
}

impl OllamaProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.7,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Ollama has no tool role, so consecutive tool results are folded into a
    /// single user turn.
    fn convert_messages(messages: &[ChatMessage]) -> Vec<OllamaMessage> {
        let mut result = Vec::new();
        let mut pending_results: Vec<String> = Vec::new();

        let flush = |pending: &mut Vec<String>, out: &mut Vec<OllamaMessage>| {
            if pending.is_empty() {
                return;
            }
            out.push(OllamaMessage {
                role: "user".to_string(),
                content: Some(format!("[Tool results]\n{}", pending.join("\n"))),
                tool_calls: None,
            });
            pending.clear();
        };

        for m in messages {
            if m.role == "tool" {
                let id = m.tool_call_id.as_deref().unwrap_or("unknown");
                pending_results.push(format!(
                    "<tool_result id=\"{}\">\n{}\n</tool_result>",
                    id, m.content
                ));
                continue;
            }

            flush(&mut pending_results, &mut result);

            let tool_calls = m.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| OllamaToolCallRequest {
                        function: OllamaFunctionRequest {
                            name: tc.name.clone(),
                            arguments: serde_json::from_str(&tc.arguments)
                                .unwrap_or(serde_json::Value::Null),
                        },
                    })
                    .collect()
            });

            result.push(OllamaMessage {
                role: m.role.clone(),
                content: (!m.content.is_empty()).then(|| m.content.clone()),
                tool_calls,
            });
        }

        flush(&mut pending_results, &mut result);
        result
    }

    fn convert_tools(tools: &[ToolSpec]) -> Vec<OllamaTool> {
        tools
            .iter()
            .map(|t| OllamaTool {
                r#type: "function".to_string(),
                function: OllamaToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters_schema.clone(),
                },
            })
            .collect()
    }

    /// Ollama returns arguments as JSON objects and no call ids; both are
    /// normalized to the OpenAI shape the agent loop expects.
    fn parse_response(response: OllamaResponse) -> ChatResponse {
        let tool_calls: Vec<ToolCall> = response
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: format!("ollama_{}", uuid::Uuid::new_v4()),
                name: tc.function.name,
                arguments: serde_json::to_string(&tc.function.arguments).unwrap_or_default(),
            })
            .collect();

        ChatResponse {
            text: response.message.content,
            tool_calls,
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        let ollama_request = OllamaRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(request.messages),
            tools: request.tools.map(Self::convert_tools),
            options: OllamaOptions {
                temperature: self.temperature,
            },
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&ollama_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Ollama API error ({}): {}",
                status,
                error_text
            ));
        }

        Ok(Self::parse_response(response.json().await?))
    }
}
