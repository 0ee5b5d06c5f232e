use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{Provider, ProviderError};
use crate::domain::{Job, JobStatus, ProviderJob};

/// Amara credentials and endpoint, taken from settings at construction.
/// Credential validity is only checked at first use.
#[derive(Debug, Clone)]
pub struct AmaraConfig {
    pub base_url: String,
    pub username: String,
    pub team: String,
    pub api_key: String,
}

/// Reference provider: captions via the Amara REST API.
pub struct AmaraProvider {
    client: reqwest::Client,
    base_url: String,
    username: String,
    team: String,
    api_key: String,
}

#[derive(Deserialize)]
struct VideoResponse {
    #[serde(default)]
    id: String,
}

#[derive(Deserialize)]
struct SubtitlesResponse {
    #[serde(default)]
    subtitles: String,
    #[serde(default)]
    version_number: u32,
}

#[derive(Deserialize)]
struct LanguageResponse {
    #[serde(default)]
    subtitles_complete: bool,
}

impl AmaraProvider {
    pub fn new(config: AmaraConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username,
            team: config.team,
            api_key: config.api_key,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-api-username", &self.username)
            .header("X-api-key", &self.api_key)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("parse response: {}", e)))
    }

    async fn get_subtitles(
        &self,
        video_id: &str,
        language: &str,
        sub_format: Option<&str>,
    ) -> Result<SubtitlesResponse, ProviderError> {
        let mut request = self.request(
            reqwest::Method::GET,
            &format!("/api/videos/{}/languages/{}/subtitles/", video_id, language),
        );
        if let Some(format) = sub_format {
            request = request.query(&[("sub_format", format)]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("request: {}", e)))?;
        Self::parse(response).await
    }

    async fn get_language(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<LanguageResponse, ProviderError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/api/videos/{}/languages/{}/", video_id, language),
            )
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("request: {}", e)))?;
        Self::parse(response).await
    }
}

#[async_trait]
impl Provider for AmaraProvider {
    fn name(&self) -> &str {
        "amara"
    }

    async fn dispatch_job(&self, job: &mut Job) -> Result<(), ProviderError> {
        let mut params: Vec<(String, String)> = job
            .provider_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        params.push(("team".to_string(), self.team.clone()));
        params.push(("video_url".to_string(), job.media_url.clone()));

        tracing::debug!(media_url = %job.media_url, "Creating Amara video");

        let response = self
            .request(reqwest::Method::POST, "/api/videos/")
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("request: {}", e)))?;
        let video: VideoResponse = Self::parse(response).await?;
        if video.id.is_empty() {
            return Err(ProviderError::DispatchRejected(
                "amara returned no video id".to_string(),
            ));
        }

        let response = self
            .request(
                reqwest::Method::POST,
                &format!(
                    "/api/videos/{}/languages/{}/subtitles/",
                    video.id, job.language
                ),
            )
            .form(&[("sub_format", "vtt")])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("request: {}", e)))?;
        let subs: SubtitlesResponse = Self::parse(response).await?;

        // Leave the language unpublished until editors sign off.
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/api/videos/{}/languages/{}/", video.id, job.language),
            )
            .json(&serde_json::json!({ "subtitles_complete": false }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("request: {}", e)))?;
        let _: LanguageResponse = Self::parse(response).await?;

        job.provider_params
            .insert("ProviderID".to_string(), video.id);
        job.provider_params
            .insert("SubVersion".to_string(), subs.version_number.to_string());
        Ok(())
    }

    async fn provider_job(&self, id: &str) -> Result<ProviderJob, ProviderError> {
        let subs = self.get_subtitles(id, "en", None).await?;
        let lang = self.get_language(id, "en").await?;

        let status = if lang.subtitles_complete {
            JobStatus::Delivered
        } else {
            JobStatus::InReview
        };

        Ok(ProviderJob {
            id: id.to_string(),
            status,
            details: format!("Version {}", subs.version_number),
            params: HashMap::from([(
                "SubVersion".to_string(),
                subs.version_number.to_string(),
            )]),
        })
    }

    async fn download(&self, id: &str, format: &str) -> Result<Vec<u8>, ProviderError> {
        let subs = self.get_subtitles(id, "en", Some(format)).await?;
        Ok(subs.subtitles.into_bytes())
    }
}
