use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use stashfill_logging::fill_debug;
use url::Url;

use crate::LookupError;

const FIND_SCENE_QUERY: &str = "query FindScene($id: ID!) { findScene(id: $id) { id title files { id basename path format width height video_codec audio_codec duration bit_rate frame_rate } } }";

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: Url,
    /// Sent as the `ApiKey` header when present.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl CatalogSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogScene {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub files: Vec<CatalogFile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogFile {
    pub id: String,
    #[serde(default)]
    pub basename: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub video_codec: Option<String>,
    #[serde(default)]
    pub audio_codec: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub bit_rate: Option<u64>,
    #[serde(default)]
    pub frame_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<FindSceneData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct FindSceneData {
    #[serde(rename = "findScene")]
    find_scene: Option<CatalogScene>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Resolves a scene id; a scene without files is a lookup failure.
    async fn find_scene(&self, scene_id: &str) -> Result<CatalogScene, LookupError>;
}

#[derive(Debug, Clone)]
pub struct GraphqlCatalog {
    settings: CatalogSettings,
    client: reqwest::Client,
}

impl GraphqlCatalog {
    pub fn new(settings: CatalogSettings) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| LookupError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl Catalog for GraphqlCatalog {
    async fn find_scene(&self, scene_id: &str) -> Result<CatalogScene, LookupError> {
        let url = self
            .settings
            .base_url
            .join("graphql")
            .map_err(|err| LookupError::Network(err.to_string()))?;
        let body = json!({
            "query": FIND_SCENE_QUERY,
            "variables": { "id": scene_id },
        });

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());
        if let Some(key) = &self.settings.api_key {
            request = request.header("ApiKey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| LookupError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| LookupError::Network(err.to_string()))?;
        let parsed: GraphqlResponse = serde_json::from_slice(&bytes)
            .map_err(|err| LookupError::InvalidResponse(err.to_string()))?;

        if let Some(first) = parsed.errors.first() {
            return Err(LookupError::InvalidResponse(first.message.clone()));
        }
        let scene = parsed
            .data
            .and_then(|data| data.find_scene)
            .ok_or_else(|| LookupError::NotFound(scene_id.to_string()))?;
        if scene.files.is_empty() {
            return Err(LookupError::NoFiles(scene_id.to_string()));
        }
        fill_debug!("Scene {} has {} files", scene.id, scene.files.len());
        Ok(scene)
    }
}
