//! Recommendation adapter
//!
//! Ranks existing catalog papers against a subject paper with a hosted
//! generative model. The model only ever sees and returns catalog paper
//! ids; anything it hallucinates is filtered out, and a short result is
//! topped up from the candidate list in catalog order.

mod auth;
mod parse;

pub use auth::GoogleTokenProvider;
pub use parse::{parse_recommended_ids, MAX_RESPONSE_BYTES};

use crate::config::RecommendConfig;
use crate::db::CatalogPaper;
use crate::errors::{AppError, Result};
use crate::metrics;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, warn};

/// Ranks candidate papers against a subject paper
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Return up to `count` candidate paper ids, most relevant first
    async fn recommend(
        &self,
        subject: &CatalogPaper,
        candidates: &[CatalogPaper],
        count: usize,
    ) -> Result<Vec<String>>;
}

/// Build the ranking prompt: subject paper, then the candidate catalog
/// with ids, then the output contract.
fn build_prompt(subject: &CatalogPaper, candidates: &[CatalogPaper], count: usize) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str("You are ranking research papers by topical relevance.\n\n");
    prompt.push_str("Subject paper:\n");
    prompt.push_str(&format!("Title: {}\n", subject.paper_title));
    if let Some(ref abstract_text) = subject.abstract_text {
        prompt.push_str(&format!("Abstract: {}\n", abstract_text));
    }

    prompt.push_str("\nCandidate papers:\n");
    for candidate in candidates {
        prompt.push_str(&format!(
            "- id: {} | title: {}\n",
            candidate.paper_id, candidate.paper_title
        ));
    }

    prompt.push_str(&format!(
        "\nReturn a JSON array of exactly {count} candidate ids from the list \
         above, ordered most relevant first. Respond with the JSON array only, \
         no prose and no code fences."
    ));

    prompt
}

/// Pad a short result with unused candidates in catalog order
pub fn top_up(mut ids: Vec<String>, candidates: &[CatalogPaper], count: usize) -> Vec<String> {
    for candidate in candidates {
        if ids.len() >= count {
            break;
        }
        if !ids.contains(&candidate.paper_id) {
            ids.push(candidate.paper_id.clone());
        }
    }
    ids.truncate(count);
    ids
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Hosted Gemini model behind the Vertex `generateContent` endpoint
pub struct GeminiRecommender {
    config: RecommendConfig,
    http: reqwest::Client,
    tokens: GoogleTokenProvider,
}

impl GeminiRecommender {
    /// Build from config; requires project id and a credentials file
    pub fn new(config: RecommendConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(AppError::Configuration {
                message: "recommendation service requires a project id".into(),
            });
        }
        let credentials_path =
            config
                .credentials_path
                .clone()
                .ok_or_else(|| AppError::Configuration {
                    message: "recommendation service requires a credentials file".into(),
                })?;

        let http = reqwest::Client::new();
        let tokens = GoogleTokenProvider::from_file(&credentials_path, http.clone())?;

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    fn endpoint(&self) -> String {
        let project = self.config.project_id.as_deref().unwrap_or_default();
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{project}/locations/{loc}/publishers/google/models/{model}:generateContent",
            loc = self.config.location,
            model = self.config.model,
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let token = self.tokens.token().await?;

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0.2,
                "responseMimeType": "application/json"
            }
        });

        // per-call deadline so a stalled model call cannot hold the request
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&body)
            .timeout(self.config.timeout())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Model endpoint returned an error");
            return Err(AppError::Recommendation {
                message: format!("model endpoint returned {status}: {detail}"),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Recommendation {
                message: "model returned no candidates".into(),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl Recommender for GeminiRecommender {
    async fn recommend(
        &self,
        subject: &CatalogPaper,
        candidates: &[CatalogPaper],
        count: usize,
    ) -> Result<Vec<String>> {
        let start = Instant::now();

        let prompt = build_prompt(subject, candidates, count);
        let catalog: Vec<String> = candidates.iter().map(|c| c.paper_id.clone()).collect();

        let result = async {
            let text = self.generate(&prompt).await?;
            debug!(bytes = text.len(), "Model response received");
            parse_recommended_ids(&text, &catalog, count)
        }
        .await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(AppError::Unavailable { .. }) => "unparseable",
            Err(_) => "error",
        };
        metrics::record_recommendation(outcome, start.elapsed().as_secs_f64());

        result.map(|ids| top_up(ids, candidates, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, title: &str) -> CatalogPaper {
        CatalogPaper {
            paper_id: id.to_string(),
            paper_title: title.to_string(),
            abstract_text: None,
        }
    }

    /// Test double returning a canned model response
    struct MockRecommender {
        response: String,
    }

    #[async_trait]
    impl Recommender for MockRecommender {
        async fn recommend(
            &self,
            _subject: &CatalogPaper,
            candidates: &[CatalogPaper],
            count: usize,
        ) -> Result<Vec<String>> {
            let catalog: Vec<String> = candidates.iter().map(|c| c.paper_id.clone()).collect();
            parse_recommended_ids(&self.response, &catalog, count)
                .map(|ids| top_up(ids, candidates, count))
        }
    }

    #[test]
    fn test_prompt_names_subject_and_candidates() {
        let subject = CatalogPaper {
            paper_id: "P001".into(),
            paper_title: "Attention Is All You Need".into(),
            abstract_text: Some("We propose the Transformer.".into()),
        };
        let candidates = vec![paper("P002", "BERT"), paper("P003", "GPT")];

        let prompt = build_prompt(&subject, &candidates, 2);
        assert!(prompt.contains("Attention Is All You Need"));
        assert!(prompt.contains("We propose the Transformer."));
        assert!(prompt.contains("id: P002"));
        assert!(prompt.contains("id: P003"));
        assert!(prompt.contains("exactly 2"));
    }

    #[test]
    fn test_top_up_pads_in_catalog_order() {
        let candidates = vec![paper("P001", "a"), paper("P002", "b"), paper("P003", "c")];
        let ids = top_up(vec!["P003".into()], &candidates, 3);
        assert_eq!(ids, vec!["P003", "P001", "P002"]);
    }

    #[test]
    fn test_top_up_truncates_overlong_input() {
        let candidates = vec![paper("P001", "a")];
        let ids = top_up(vec!["P001".into(), "P002".into()], &candidates, 1);
        assert_eq!(ids, vec!["P001"]);
    }

    #[tokio::test]
    async fn test_mock_recommender_filters_and_pads() {
        let rec = MockRecommender {
            response: r#"["P002", "P999"]"#.into(),
        };
        let subject = paper("P001", "subject");
        let candidates = vec![paper("P002", "b"), paper("P003", "c"), paper("P004", "d")];

        let ids = rec.recommend(&subject, &candidates, 3).await.unwrap();
        assert_eq!(ids, vec!["P002", "P003", "P004"]);
    }

    #[tokio::test]
    async fn test_mock_recommender_unparseable_is_unavailable() {
        let rec = MockRecommender {
            response: "no recommendations today".into(),
        };
        let subject = paper("P001", "subject");
        let candidates = vec![paper("P002", "b")];

        let err = rec.recommend(&subject, &candidates, 3).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
    }
}
