use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::domain::ImageRef;
use tracing::debug;
use url::Url;

use crate::error::GenerationError;

const STYLE_INSTRUCTION: &str = "Create a camera obscura style photograph. Heavy grain, slightly soft towards the edges, gentle contrast, 19th century photographic look with vignetting. Black and white only. Avoid modern elements.";
const ASPECT_RATIO: &str = "3:4";
const DEFAULT_MIME_TYPE: &str = "image/png";

#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn request_image(&self, scene_description: &str) -> Result<ImageRef, GenerationError>;
}

/// Stand-in when no provider is configured; every request falls back.
pub struct UnavailableImageProvider;

#[async_trait]
impl ImageProvider for UnavailableImageProvider {
    async fn request_image(&self, _scene_description: &str) -> Result<ImageRef, GenerationError> {
        Err(GenerationError::Unavailable)
    }
}

#[derive(Debug, Serialize)]
struct GenerateImageRequest<'a> {
    prompt: String,
    aspect_ratio: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateImageResponse {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image_b64: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

pub struct HttpImageProvider {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpImageProvider {
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    pub fn prompt_for(scene_description: &str) -> String {
        format!("{STYLE_INSTRUCTION} Theme: {}", scene_description.trim())
    }
}

#[async_trait]
impl ImageProvider for HttpImageProvider {
    async fn request_image(&self, scene_description: &str) -> Result<ImageRef, GenerationError> {
        let mut request = self.http.post(self.endpoint.clone()).json(&GenerateImageRequest {
            prompt: Self::prompt_for(scene_description),
            aspect_ratio: ASPECT_RATIO,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body: GenerateImageResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Malformed(err.to_string()))?;
        let image = image_ref_from_response(body)?;
        debug!("image provider: resolved scene={scene_description:?}");
        Ok(image)
    }
}

fn image_ref_from_response(body: GenerateImageResponse) -> Result<ImageRef, GenerationError> {
    if let Some(url) = body.url.filter(|url| !url.trim().is_empty()) {
        Url::parse(&url).map_err(|err| GenerationError::Malformed(format!("bad url: {err}")))?;
        return Ok(ImageRef::new(url));
    }

    let Some(data) = body.image_b64.filter(|data| !data.is_empty()) else {
        return Err(GenerationError::Malformed(
            "response carries no image".to_string(),
        ));
    };
    STANDARD
        .decode(data.as_bytes())
        .map_err(|err| GenerationError::Malformed(format!("bad image data: {err}")))?;
    let mime_type = body.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE);
    Ok(ImageRef::new(format!("data:{mime_type};base64,{data}")))
}

#[cfg(test)]
#[path = "tests/image_provider_tests.rs"]
mod tests;
