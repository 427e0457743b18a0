//! Text-generation API client.
//!
//! Fetches the source article and asks an OpenAI-compatible chat-completions
//! endpoint for strict JSON with the enrichment fields. Model output is
//! tolerated with or without a code fence.

use serde::Deserialize;

use docket_config::EnrichmentConfig;
use docket_core::entities::SourceEnrichment;
use docket_core::enums::ImpactLevel;

use crate::error::EnrichError;

/// Risk areas the model is asked to choose from.
pub const RISK_AREAS: &[&str] = &[
    "Data Protection",
    "Corporate Governance",
    "Securities Law",
    "Tax",
    "Employment",
    "Intellectual Property",
    "Antitrust",
    "Banking",
    "Insurance",
    "Real Estate",
    "Environmental",
    "Healthcare",
];

/// HTTP client for article fetching and summarization calls.
pub struct EnrichmentClient {
    http: reqwest::Client,
    config: EnrichmentConfig,
}

impl EnrichmentClient {
    /// Create a new client with the configured timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: EnrichmentConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("docket/0.1")
                .timeout(config.request_timeout())
                .build()
                .expect("reqwest client should build"),
            config,
        }
    }

    /// Fetch the article behind a source URL, capped at the configured
    /// character limit.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] if the request fails or the server answers with
    /// a non-success status.
    pub async fn fetch_page(&self, url: &str) -> Result<String, EnrichError> {
        let resp = check_response(self.http.get(url).send().await?).await?;
        let text = resp.text().await?;
        Ok(truncate_chars(&text, self.config.content_char_limit))
    }

    /// Ask the model for a structured summary of one article.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] if the request fails, the API answers with a
    /// non-success status, or the model output is not the requested JSON.
    pub async fn summarize(
        &self,
        title: &str,
        url: &str,
        content: &str,
    ) -> Result<SourceEnrichment, EnrichError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{"role": "user", "content": build_prompt(title, url, content)}],
        });
        let resp = check_response(
            self.http
                .post(&self.config.api_url)
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send()
                .await?,
        )
        .await?;

        let completion: ChatCompletion = resp.json().await?;
        let content = completion
            .first_content()
            .ok_or_else(|| EnrichError::Parse("completion carried no choices".to_string()))?;
        parse_enrichment(content)
    }
}

/// Check an HTTP response, mapping non-success statuses to [`EnrichError::Api`]
/// with the response body as the message.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, EnrichError> {
    if !resp.status().is_success() {
        return Err(EnrichError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn build_prompt(title: &str, url: &str, content: &str) -> String {
    format!(
        "Analyze this legal news article and extract the following information in JSON format:\n\
         \n\
         1. risk_area: Choose from ({})\n\
         2. summary: Provide a 2-3 sentence summary\n\
         3. key_points: List 3-5 relevant keywords\n\
         4. jurisdiction: Country or region (e.g., \"United States\", \"European Union\", \"Global\")\n\
         5. impact_level: Choose from (low, medium, high)\n\
         6. source: Name of the publishing organization\n\
         7. published_date: Publication date if stated, else null\n\
         \n\
         Article Title: {title}\n\
         Article URL: {url}\n\
         Article Content: {content}\n\
         \n\
         Return ONLY valid JSON with these exact keys.",
        RISK_AREAS.join(", ")
    )
}

fn truncate_chars(input: &str, limit: usize) -> String {
    input.chars().take(limit).collect()
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

impl ChatCompletion {
    fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct EnrichmentWire {
    risk_area: Option<String>,
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
    jurisdiction: Option<String>,
    impact_level: Option<String>,
    source: Option<String>,
    published_date: Option<String>,
}

/// Parse model output into an enrichment payload. Tolerates a Markdown code
/// fence around the JSON; an unrecognized impact level is dropped rather than
/// failing the whole payload.
fn parse_enrichment(raw: &str) -> Result<SourceEnrichment, EnrichError> {
    let stripped = strip_code_fence(raw);
    let wire: EnrichmentWire = serde_json::from_str(stripped)
        .map_err(|e| EnrichError::Parse(format!("model output is not the requested JSON: {e}")))?;
    Ok(SourceEnrichment {
        risk_area: wire.risk_area,
        summary: wire.summary,
        key_points: wire.key_points,
        jurisdiction: wire.jurisdiction,
        impact: wire.impact_level.as_deref().and_then(ImpactLevel::parse),
        source_name: wire.source,
        published_date: wire.published_date,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"{
        "choices": [
            {
                "message": {
                    "content": "{\"risk_area\": \"Data Protection\", \"summary\": \"A ruling tightens consent requirements.\", \"key_points\": [\"consent\", \"processing\"], \"jurisdiction\": \"European Union\", \"impact_level\": \"High\", \"source\": \"Example Times\", \"published_date\": null}"
                }
            }
        ]
    }"#;

    #[test]
    fn parse_completion_fixture() {
        let completion: ChatCompletion = serde_json::from_str(FIXTURE).unwrap();
        let enrichment = parse_enrichment(completion.first_content().unwrap()).unwrap();
        assert_eq!(enrichment.risk_area.as_deref(), Some("Data Protection"));
        assert_eq!(enrichment.key_points, vec!["consent", "processing"]);
        assert_eq!(enrichment.impact, Some(ImpactLevel::High));
        assert_eq!(enrichment.source_name.as_deref(), Some("Example Times"));
        assert!(enrichment.published_date.is_none());
    }

    #[test]
    fn parse_enrichment_with_code_fence() {
        let fenced = "```json\n{\"summary\": \"Short.\", \"risk_area\": null, \"key_points\": [], \"jurisdiction\": null, \"impact_level\": null, \"source\": null, \"published_date\": null}\n```";
        let enrichment = parse_enrichment(fenced).unwrap();
        assert_eq!(enrichment.summary, "Short.");
        assert!(enrichment.risk_area.is_none());
    }

    #[test]
    fn unknown_impact_level_is_dropped() {
        let raw = r#"{"summary": "S.", "impact_level": "catastrophic"}"#;
        let enrichment = parse_enrichment(raw).unwrap();
        assert!(enrichment.impact.is_none());
    }

    #[test]
    fn non_json_output_is_a_parse_error() {
        let result = parse_enrichment("I could not analyze this article.");
        assert!(matches!(result, Err(EnrichError::Parse(_))));
    }

    #[test]
    fn prompt_names_the_fixed_risk_areas() {
        let prompt = build_prompt("T", "https://example.com", "body");
        assert!(prompt.contains("Data Protection"));
        assert!(prompt.contains("Healthcare"));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
