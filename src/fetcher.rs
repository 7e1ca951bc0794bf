use crate::config::{Config, GeneratorKind};
use crate::model::{VideoCard, VideoPayload};
use crate::schema::{
    GenerateRequest, GenerateResponse, GeneratedDescription, ListResponse, PROMPTS_TABLE,
    PromptRecord, Row, VIDEO_TABLE, VideoRecord, WriteResponse,
};
use crate::topics;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },
    #[error("response does not match the expected schema: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no BaaS project id configured")]
    NoProject,
}

/// Where feed content comes from.
///
/// Neither operation fails from the caller's point of view: a page that
/// could not be fetched is empty and a generation that failed yields the
/// fallback card for the topic.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Vec<VideoCard>;
    async fn generate_item(&self, topic: &str) -> VideoCard;
}

pub struct HttpSource {
    client: Client,
    db_url: Option<String>,
    token: String,
    generator: GeneratorKind,
    local_url: String,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            db_url: config.baas.db_url(),
            token: config.baas.token.trim().to_string(),
            generator: config.generator,
            local_url: config.local_url.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/json");
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }

    async fn send_json<T: DeserializeOwned>(
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn list_videos(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<VideoRecord>, FetchError> {
        let db_url = self.db_url.as_deref().ok_or(FetchError::NoProject)?;
        let endpoint = VIDEO_TABLE.endpoint(db_url);
        tracing::debug!(%endpoint, limit, offset, "fetching video page");

        let request = self
            .authorized(self.client.get(&endpoint))
            .query(&[("limit", limit), ("offset", offset)]);
        let page: ListResponse = Self::send_json(&endpoint, request).await?;

        let mut records = Vec::new();
        for (row, decoded) in page.rows::<VideoRecord>().enumerate() {
            match decoded {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(error = %e, row, offset, "skipping malformed video row")
                }
            }
        }
        Ok(records)
    }

    /// Stores a prompt for `topic` and returns the row the store echoed back.
    pub async fn store_prompt(&self, topic: &str) -> Result<PromptRecord, FetchError> {
        let db_url = self.db_url.as_deref().ok_or(FetchError::NoProject)?;
        let endpoint = PROMPTS_TABLE.endpoint(db_url);

        let body = Row {
            value: PromptRecord {
                topic: topic.to_string(),
                output: topics::fallback_description(topic),
                top_text: topics::fallback_top_text(topic),
                bottom_text: topics::FALLBACK_BOTTOM_TEXT.to_string(),
                metadata: json!({
                    "generated": true,
                    "generated_at": chrono::Utc::now().to_rfc3339(),
                }),
            },
        };
        tracing::debug!(%endpoint, topic, "storing prompt");

        let request = self.authorized(self.client.post(&endpoint)).json(&body);
        let stored: WriteResponse<PromptRecord> = Self::send_json(&endpoint, request).await?;
        Ok(stored.data.value)
    }

    pub async fn describe_locally(&self, topic: &str) -> Result<GeneratedDescription, FetchError> {
        tracing::debug!(endpoint = %self.local_url, topic, "requesting local description");

        let request = self
            .client
            .post(&self.local_url)
            .header(ACCEPT, "application/json")
            .json(&GenerateRequest { topic });
        let response: GenerateResponse = Self::send_json(&self.local_url, request).await?;

        Ok(serde_json::from_str(&response.result)?)
    }

    async fn try_generate(&self, topic: &str) -> Result<VideoCard, FetchError> {
        let (description, top_text, bottom_text) = match self.generator {
            GeneratorKind::Baas => {
                let stored = self.store_prompt(topic).await?;
                (stored.output, stored.top_text, stored.bottom_text)
            }
            GeneratorKind::Local => {
                let generated = self.describe_locally(topic).await?;
                (
                    generated.video_description,
                    generated.top_text,
                    generated.bottom_text,
                )
            }
        };

        Ok(VideoCard {
            color: topics::random_color(&mut rand::rng()),
            top_text,
            bottom_text,
            description,
            video: None,
        })
    }
}

/// Listed rows show the prompt on top and the description twice below.
pub fn card_from_record(record: VideoRecord) -> VideoCard {
    let video = record
        .content
        .filter(|content| !content.trim().is_empty())
        .map(VideoPayload::new);

    VideoCard {
        color: topics::random_color(&mut rand::rng()),
        top_text: record.prompt,
        bottom_text: record.description.clone(),
        description: record.description,
        video,
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Vec<VideoCard> {
        match self.list_videos(limit, offset).await {
            Ok(records) => {
                tracing::info!(count = records.len(), limit, offset, "fetched video page");
                records.into_iter().map(card_from_record).collect()
            }
            Err(FetchError::NoProject) => {
                tracing::debug!("no project id, skipping list fetch");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, limit, offset, "video page fetch failed");
                Vec::new()
            }
        }
    }

    async fn generate_item(&self, topic: &str) -> VideoCard {
        match self.try_generate(topic).await {
            Ok(card) => card,
            Err(e) => {
                tracing::warn!(error = %e, topic, "generation failed, using fallback card");
                topics::fallback_card(topic, topics::random_color(&mut rand::rng()))
            }
        }
    }
}
