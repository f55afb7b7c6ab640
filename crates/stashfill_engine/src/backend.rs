use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use stashfill_logging::{fill_debug, fill_info};
use url::Url;

use crate::{Frame, FrameReader, ReaderSettings, StreamDecoder, StreamError, SubmissionError};

pub type FrameStream = FrameReader<BoxStream<'static, Result<Bytes, StreamError>>>;

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Whole-request limit for the short calls; the fill stream is bounded per chunk instead.
    pub request_timeout: Duration,
    pub reader: ReaderSettings,
    pub allowed_content_types: Vec<String>,
}

impl BackendSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            reader: ReaderSettings::default(),
            allowed_content_types: vec![
                "application/json".to_string(),
                "application/x-ndjson".to_string(),
                "text/plain".to_string(),
            ],
        }
    }
}

/// Body of `POST /fill`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillRequestBody {
    pub scene_id: String,
    pub file_id: Option<String>,
    pub announce_url: String,
    pub template: Option<String>,
    pub screens: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedTag {
    pub name: String,
    pub emp: String,
}

/// Body of `POST /suggestions`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SuggestionsRequest {
    pub accept: Vec<AcceptedTag>,
    pub ignore: Vec<String>,
}

#[derive(Debug, Serialize)]
struct StartTorrentBody<'a> {
    torrent_path: &'a str,
}

#[async_trait::async_trait]
pub trait JobBackend: Send + Sync {
    /// Starts a fill job and returns the reader over its frame stream.
    async fn open_fill(&self, request: &FillRequestBody) -> Result<FrameStream, StreamError>;

    /// Sends accept/ignore decisions; returns the backend's acknowledgment message.
    async fn submit_suggestions(
        &self,
        request: &SuggestionsRequest,
    ) -> Result<Option<String>, SubmissionError>;

    /// Template key and display label pairs, in backend order.
    async fn templates(&self) -> Result<Vec<(String, String)>, SubmissionError>;

    async fn start_torrent(&self, torrent_path: &str) -> Result<(), SubmissionError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| SubmissionError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, String> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| format!("invalid backend url: {err}"))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SubmissionError> {
        let url = self.endpoint(path).map_err(SubmissionError::Network)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| SubmissionError::InvalidResponse(err.to_string()))?;
        let response = self
            .client
            .post(url)
            .timeout(self.settings.request_timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_submission_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl JobBackend for ReqwestBackend {
    async fn open_fill(&self, request: &FillRequestBody) -> Result<FrameStream, StreamError> {
        let url = self.endpoint("fill").map_err(StreamError::Connection)?;
        let payload = serde_json::to_vec(request)
            .map_err(|err| StreamError::Connection(err.to_string()))?;
        fill_info!(
            "Requesting fill for scene {} (file {:?}, template {:?}, screens {})",
            request.scene_id,
            request.file_id,
            request.template,
            request.screens
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_stream_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(StreamError::UnsupportedContentType(ct.to_string()));
            }
        }

        let decoder = StreamDecoder::for_content_type(content_type.as_deref());
        fill_debug!("Fill stream open, decoding as {}", decoder.encoding_name());
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_stream_error))
            .boxed();
        Ok(FrameReader::new(body, decoder, self.settings.reader.clone()))
    }

    async fn submit_suggestions(
        &self,
        request: &SuggestionsRequest,
    ) -> Result<Option<String>, SubmissionError> {
        fill_info!(
            "Submitting {} accepted and {} ignored tags",
            request.accept.len(),
            request.ignore.len()
        );
        let frame: Frame = self.post_json("suggestions", request).await?;
        envelope_message(frame)
    }

    async fn templates(&self) -> Result<Vec<(String, String)>, SubmissionError> {
        let url = self.endpoint("templates").map_err(SubmissionError::Network)?;
        let response = self
            .client
            .get(url)
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_submission_error)?;
        let map: Map<String, Value> = read_json(response).await?;
        Ok(map
            .into_iter()
            .map(|(key, label)| {
                let label = match label {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                (key, label)
            })
            .collect())
    }

    async fn start_torrent(&self, torrent_path: &str) -> Result<(), SubmissionError> {
        let frame: Frame = self
            .post_json("submit", &StartTorrentBody { torrent_path })
            .await?;
        envelope_message(frame).map(|_| ())
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SubmissionError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SubmissionError::HttpStatus(status.as_u16()));
    }
    let body = response.bytes().await.map_err(map_submission_error)?;
    serde_json::from_slice(&body).map_err(|err| SubmissionError::InvalidResponse(err.to_string()))
}

fn envelope_message(frame: Frame) -> Result<Option<String>, SubmissionError> {
    match frame {
        Frame::Success { data } => Ok(data.and_then(|data| data.message)),
        Frame::Error { message } => Err(SubmissionError::Rejected(message)),
    }
}

fn map_stream_error(err: reqwest::Error) -> StreamError {
    StreamError::Connection(err.to_string())
}

fn map_submission_error(err: reqwest::Error) -> SubmissionError {
    if err.is_timeout() {
        return SubmissionError::Timeout;
    }
    SubmissionError::Network(err.to_string())
}
