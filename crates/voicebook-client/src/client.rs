use crate::config::ServiceConfig;
use crate::error::ClientError;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;
use url::Url;
use voicebook_types::{BookingReply, Greeting};

/// Path of the greeting endpoint, relative to the service base URL.
pub const GREETING_PATH: &str = "welcome-doctor";

/// Path of the audio booking endpoint, relative to the service base URL.
pub const BOOKING_PATH: &str = "voice-chat/book-appointment";

/// Multipart field name carrying the recorded audio.
pub const UPLOAD_FIELD: &str = "file";

/// File name announced for the recorded audio.
pub const UPLOAD_FILE_NAME: &str = "myFile.wav";

/// Content type declared for the recorded audio.
pub const UPLOAD_CONTENT_TYPE: &str = "audio/mpeg";

/// The two calls the conversation needs from the remote booking service.
///
/// Implemented over HTTP by [`HttpBookingClient`]; tests substitute their own.
pub trait BookingApi: Send + Sync + 'static {
    /// Fetches the assistant's opening line.
    fn greet(&self) -> impl Future<Output = Result<Greeting, ClientError>> + Send;

    /// Uploads a recorded utterance and returns the transcript plus the
    /// booking outcome.
    fn book_appointment(
        &self,
        audio: Vec<u8>,
    ) -> impl Future<Output = Result<BookingReply, ClientError>> + Send;

    /// Turns an audio path returned by the service into something a browser
    /// can fetch. Defaults to the path unchanged.
    fn resolve_audio_url(&self, path: &str) -> String {
        path.to_string()
    }
}

/// reqwest-backed client for the remote booking service.
#[derive(Debug, Clone)]
pub struct HttpBookingClient {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBookingClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        if !config.is_configured() {
            return Err(ClientError::InvalidBaseUrl(
                "service api_url is empty".to_string(),
            ));
        }

        let mut raw = config.api_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url =
            Url::parse(&raw).map_err(|e| ClientError::InvalidBaseUrl(format!("{raw}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("voicebook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{path}: {e}")))
    }
}

/// Reads a response body, mapping non-2xx statuses to [`ClientError::Status`].
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl BookingApi for HttpBookingClient {
    async fn greet(&self) -> Result<Greeting, ClientError> {
        let url = self.endpoint(GREETING_PATH)?;
        debug!(%url, "requesting greeting");

        let resp = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        decode(resp).await
    }

    async fn book_appointment(&self, audio: Vec<u8>) -> Result<BookingReply, ClientError> {
        let url = self.endpoint(BOOKING_PATH)?;
        debug!(%url, bytes = audio.len(), "uploading recording");

        let part = Part::bytes(audio)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let resp = self.http.post(url).multipart(form).send().await?;

        decode(resp).await
    }

    fn resolve_audio_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        match self.base_url.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> HttpBookingClient {
        HttpBookingClient::new(&ServiceConfig::new(url)).unwrap()
    }

    #[test]
    fn trailing_slash_is_added() {
        let c = client("http://svc.local/api");
        assert_eq!(c.base_url().as_str(), "http://svc.local/api/");
        assert_eq!(
            c.endpoint(GREETING_PATH).unwrap().as_str(),
            "http://svc.local/api/welcome-doctor"
        );
        assert_eq!(
            c.endpoint(BOOKING_PATH).unwrap().as_str(),
            "http://svc.local/api/voice-chat/book-appointment"
        );
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = HttpBookingClient::new(&ServiceConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }

    #[test]
    fn garbage_url_is_rejected() {
        let err = HttpBookingClient::new(&ServiceConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }

    #[test]
    fn relative_audio_paths_resolve_against_base() {
        let c = client("http://svc.local/api/");
        assert_eq!(
            c.resolve_audio_url("audio/reply.mp3"),
            "http://svc.local/api/audio/reply.mp3"
        );
        assert_eq!(
            c.resolve_audio_url("/static/reply.mp3"),
            "http://svc.local/static/reply.mp3"
        );
    }

    #[test]
    fn absolute_audio_urls_pass_through() {
        let c = client("http://svc.local/api/");
        assert_eq!(
            c.resolve_audio_url("https://cdn.example.com/r.mp3"),
            "https://cdn.example.com/r.mp3"
        );
    }
}
