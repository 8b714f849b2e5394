use crate::config::SearchConfig;
use crate::tools::extract_string_arg;
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Default, Deserialize)]
struct SerperResponse {
    #[serde(default, rename = "answerBox")]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    title: Option<String>,
    answer: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Google search through the Serper API.
pub struct WebSearchTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    results: usize,
}

impl WebSearchTool {
    pub fn new(config: &SearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            results: config.results.max(1),
        }
    }

    fn format_results(query: &str, response: &SerperResponse) -> String {
        let mut out = String::new();

        if let Some(answer) = &response.answer_box
            && let Some(text) = answer.answer.as_ref().or(answer.snippet.as_ref())
        {
            let title = answer.title.as_deref().unwrap_or("Answer");
            let _ = writeln!(out, "Answer: {}\n{}\n---", title, text);
        }

        for result in &response.organic {
            let _ = writeln!(
                out,
                "Title: {}\nLink: {}\nSnippet: {}\n---",
                result.title, result.link, result.snippet
            );
        }

        if out.is_empty() {
            format!("No search results found for '{}'", query)
        } else {
            format!("Search results for '{}':\n\n{}", query, out.trim_end())
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "search_the_internet"
    }

    fn description(&self) -> &str {
        "Search the internet with a query and return titles, links and snippets of the top results"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "search_query": {
                    "type": "string",
                    "description": "Mandatory search query you want to use to search the internet"
                }
            },
            "required": ["search_query"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let query = extract_string_arg(&args, "search_query")?;

        if self.api_key.is_empty() {
            return Ok(ToolResult::error("Web search is not configured (SERPER_API_KEY missing)"));
        }

        tracing::debug!(%query, "Searching the internet");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest {
                q: &query,
                num: self.results,
            })
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => return Ok(ToolResult::error(format!("Search request failed: {}", e))),
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Ok(ToolResult::error(format!(
                "Search API error {}: {}",
                status, body
            )));
        }

        let parsed: SerperResponse = response.json().await?;
        Ok(ToolResult::success(Self::format_results(&query, &parsed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubServer;

    #[test]
    fn formats_answer_box_before_organic_results() {
        let response: SerperResponse = serde_json::from_value(json!({
            "answerBox": {"title": "Migraine", "snippet": "A headache disorder."},
            "organic": [
                {"title": "Migraine - NHS", "link": "https://nhs.uk/migraine", "snippet": "Symptoms and causes"},
                {"title": "No snippet", "link": "https://example.org"}
            ]
        }))
        .unwrap();

        let text = WebSearchTool::format_results("migraine", &response);
        let answer_at = text.find("Answer: Migraine").unwrap();
        let organic_at = text.find("Title: Migraine - NHS").unwrap();
        assert!(answer_at < organic_at);
        assert!(text.contains("Link: https://example.org"));
        assert!(text.starts_with("Search results for 'migraine'"));
    }

    #[test]
    fn empty_response_reports_no_results() {
        let text = WebSearchTool::format_results("zzz", &SerperResponse::default());
        assert_eq!(text, "No search results found for 'zzz'");
    }

    fn tool_for(server: &StubServer) -> WebSearchTool {
        WebSearchTool::new(&SearchConfig {
            api_key: "serper-test".into(),
            base_url: format!("{}/", server.base_url),
            results: 5,
        })
    }

    #[tokio::test]
    async fn posts_query_with_api_key() {
        let server = StubServer::json(
            200,
            r#"{"organic":[{"title":"Asthma","link":"https://who.int/asthma","snippet":"Chronic"}]}"#,
        )
        .await;

        let result = tool_for(&server)
            .execute(json!({"search_query": " wheezing at night "}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("Title: Asthma\nLink: https://who.int/asthma"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/search");
        assert_eq!(requests[0].header("x-api-key"), Some("serper-test"));
        assert_eq!(requests[0].json(), json!({"q": "wheezing at night", "num": 5}));
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_body() {
        let server = StubServer::json(403, r#"{"message":"Invalid API key"}"#).await;
        let result = tool_for(&server)
            .execute(json!({"search_query": "fever"}))
            .await
            .unwrap();

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("Search API error 403"));
        assert!(error.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_tool_error() {
        let tool = WebSearchTool::new(&SearchConfig::default());
        let result = tool
            .execute(json!({"search_query": "chest pain"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("SERPER_API_KEY"));
    }
}
