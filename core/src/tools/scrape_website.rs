use crate::config::ScrapeConfig;
use crate::tools::{extract_string_arg, truncate_chars};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

static SKIPPED_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|svg|head)\b.*?</(script|style|noscript|svg|head)\s*>")
        .expect("valid regex")
});
static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static BLOCK_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(br|/p|/div|/li|/h[1-6]|/tr|/section|/article)\b[^>]*>")
        .expect("valid regex")
});
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static INLINE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\f\v]+").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid regex"));

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

/// Reduces an HTML document to readable text.
pub fn html_to_text(html: &str) -> String {
    let text = SKIPPED_BLOCKS.replace_all(html, " ");
    let text = COMMENTS.replace_all(&text, " ");
    let text = BLOCK_BREAKS.replace_all(&text, "\n");
    let text = TAGS.replace_all(&text, " ");

    let mut text = text.into_owned();
    // &amp; last so escaped entities are not decoded twice.
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }

    let text = INLINE_SPACE.replace_all(&text, " ");
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let text = lines.join("\n");
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

pub struct ScrapeWebsiteTool {
    client: reqwest::Client,
    max_chars: usize,
    max_bytes: usize,
}

/// Reads the body chunk by chunk and stops once `max_bytes` are buffered.
async fn read_body_limited(
    mut response: reqwest::Response,
    max_bytes: usize,
) -> anyhow::Result<String> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = max_bytes.saturating_sub(body.len());
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

impl ScrapeWebsiteTool {
    pub fn new(config: &ScrapeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(concat!("medcrew/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            max_chars: config.max_chars,
            max_bytes: config.max_bytes.max(1),
        }
    }
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    fn name(&self) -> &str {
        "read_website_content"
    }

    fn description(&self) -> &str {
        "Read the text content of a website page given its full URL"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "website_url": {
                    "type": "string",
                    "description": "Mandatory website url to read the content of (http or https)"
                }
            },
            "required": ["website_url"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let url = extract_string_arg(&args, "website_url")?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Ok(ToolResult::error(format!(
                "Unsupported URL '{}': only http and https are allowed",
                url
            )));
        }

        tracing::debug!(%url, "Reading website content");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(ToolResult::error(format!("Failed to fetch {}: {}", url, e))),
        };

        if !response.status().is_success() {
            return Ok(ToolResult::error(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes as u64
        {
            tracing::debug!(
                %url,
                length,
                max_bytes = self.max_bytes,
                "Page exceeds byte budget, reading a prefix"
            );
        }

        let body = read_body_limited(response, self.max_bytes).await?;
        let text = html_to_text(&body);
        if text.is_empty() {
            return Ok(ToolResult::error(format!("No readable content at {}", url)));
        }

        Ok(ToolResult::success(truncate_chars(&text, self.max_chars)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubServer;

    #[test]
    fn strips_markup_scripts_and_styles() {
        let html = r#"<html><head><title>x</title><style>p { color: red; }</style></head>
            <body><script>alert("hi")</script>
            <h1>Influenza</h1><p>Fever &amp; cough are&nbsp;common.</p>
            <!-- hidden --><ul><li>Rest</li><li>Fluids</li></ul></body></html>"#;

        let text = html_to_text(html);
        assert!(text.contains("Influenza"));
        assert!(text.contains("Fever & cough are common."));
        assert!(text.contains("Rest\n"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn escaped_ampersand_decodes_once() {
        assert_eq!(html_to_text("<p>&amp;lt;</p>"), "&lt;");
    }

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let tool = ScrapeWebsiteTool::new(&ScrapeConfig::default());
        let result = tool
            .execute(json!({"website_url": "file:///etc/passwd"}))
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn reads_at_most_the_byte_budget() {
        let page = format!("<html><body><p>{}</p></body></html>", "a".repeat(50_000));
        let server = StubServer::html(200, page).await;
        let tool = ScrapeWebsiteTool::new(&ScrapeConfig {
            max_chars: 100_000,
            max_bytes: 1_000,
            ..ScrapeConfig::default()
        });

        let result = tool
            .execute(json!({"website_url": format!("{}/article", server.base_url)}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.starts_with("aaa"));
        assert!(result.output.len() <= 1_000);
        assert!(!result.output.contains("truncated"));
        assert_eq!(server.requests()[0].path, "/article");
    }

    #[tokio::test]
    async fn http_errors_are_reported_to_the_agent() {
        let server = StubServer::html(404, "<h1>Not Found</h1>").await;
        let tool = ScrapeWebsiteTool::new(&ScrapeConfig::default());
        let result = tool
            .execute(json!({"website_url": server.base_url}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn missing_url_is_an_execution_error() {
        let tool = ScrapeWebsiteTool::new(&ScrapeConfig::default());
        assert!(tool.execute(json!({})).await.is_err());
    }
}
