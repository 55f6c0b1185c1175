use super::extract::parse_hint_text;
use super::{HintRequest, HintSource, map_transport_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use shopwright_common::{Hint, HintError};
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You locate elements on e-commerce web pages. \
Answer with a single JSON object and nothing else.";

/// OpenAI-compatible chat completions client (Groq by default).
#[derive(Clone)]
pub struct ChatHintSource {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl ChatHintSource {
    pub fn new(
        api_key: String,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

/// The analysis prompt sent as the user message.
pub fn build_prompt(request: &HintRequest) -> String {
    let snapshot = &request.snapshot;
    let elements = serde_json::to_string_pretty(&snapshot.interactive_elements).unwrap_or_default();
    let forms = serde_json::to_string_pretty(&snapshot.forms).unwrap_or_default();

    format!(
        r#"Analyze this web page data and find {description}.

PAGE INFORMATION:
Title: {title}
URL: {url}

HEADER/NAVIGATION CONTENT:
{header}

INTERACTIVE ELEMENTS:
{elements}

FORMS:
{forms}

Respond with JSON in this exact format:
{{
    "found": true/false,
    "primary": {{
        "text": "exact visible text of the element",
        "tag": "button/a/input/etc",
        "selector": "CSS selector to use",
        "coordinates": {{"x": number, "y": number}},
        "confidence": "high/medium/low"
    }},
    "reasoning": "why this element was chosen",
    "alternatives": [
        {{"text": "...", "selector": "...", "confidence": "..."}}
    ]
}}"#,
        description = request.description,
        title = snapshot.title,
        url = snapshot.url,
        header = snapshot.header_text,
    )
}

#[async_trait]
impl HintSource for ChatHintSource {
    async fn suggest(&self, request: &HintRequest) -> Result<Hint, HintError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(request)},
            ],
            "temperature": 0.1,
            "max_tokens": 1000,
        });

        debug!(model = %self.model, goal = %request.goal, "requesting hint from chat model");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HintError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| HintError::Malformed(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| HintError::Malformed("response has no message content".into()))?;

        parse_hint_text(&content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopwright_common::{InteractiveElement, PageSnapshot};

    #[test]
    fn test_prompt_carries_snapshot_and_goal() {
        let request = HintRequest {
            goal: "login.login_button".into(),
            description: "the login or sign-in button or link".into(),
            snapshot: PageSnapshot {
                title: "AJIO".into(),
                url: "https://www.ajio.com/".into(),
                interactive_elements: vec![InteractiveElement {
                    tag: "a".into(),
                    text: "Sign In / Join AJIO".into(),
                    ..Default::default()
                }],
                ..Default::default()
            },
        };

        let prompt = build_prompt(&request);
        assert!(prompt.contains("find the login or sign-in button or link"));
        assert!(prompt.contains("Title: AJIO"));
        assert!(prompt.contains("Sign In / Join AJIO"));
        assert!(prompt.contains("\"found\": true/false"));
    }
}
