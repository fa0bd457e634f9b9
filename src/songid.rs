//! Song identification for captured video clips.
//!
//! Pulls the audio track out of a local video with the system `ffmpeg`,
//! uploads it to a recognition service (shazam's response shape), and
//! reports title, artist, and primary genre. The extracted MP3 is a
//! throwaway: written next to the input, removed once recognition ends.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Default recognition endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5051/recognize";

/// Errors extracting audio or identifying the song.
#[derive(Debug, thiserror::Error)]
pub enum SongIdError {
    /// ffmpeg could not be spawned at all.
    #[error("could not run ffmpeg (is it installed?): {source}")]
    FfmpegMissing {
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// ffmpeg ran but exited non-zero.
    #[error("ffmpeg failed on '{}': {stderr}", input.display())]
    FfmpegFailed {
        /// Input video path.
        input: PathBuf,
        /// What ffmpeg printed to stderr.
        stderr: String,
    },

    /// The extracted audio file could not be read back.
    #[error("failed to read extracted audio '{}': {source}", path.display())]
    AudioFile {
        /// Location of the extracted file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The recognition request could not be sent.
    #[error("recognition request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The recognition service answered with a non-success status.
    #[error("recognition service returned {status}")]
    ServiceStatus {
        /// Status code from the service.
        status: reqwest::StatusCode,
    },

    /// The service answered but matched nothing.
    #[error("no track matched the audio")]
    NoMatch,
}

#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    track: Option<Track>,
}

/// An identified track.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    /// Song title.
    pub title: String,
    /// Artist line.
    pub subtitle: String,
    /// Genre block; absent when the service has no genre data.
    pub genres: Option<Genres>,
}

/// Genre block of an identified track.
#[derive(Debug, Clone, Deserialize)]
pub struct Genres {
    /// Primary genre label.
    pub primary: String,
}

impl Track {
    /// Primary genre, when the service supplied one.
    #[must_use]
    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.as_ref().map(|genres| genres.primary.as_str())
    }
}

/// Extracts the audio track of `video` to an MP3 beside it.
///
/// The output path is the input with its extension swapped to `.mp3`.
///
/// # Errors
///
/// Returns [`SongIdError::FfmpegMissing`] when ffmpeg cannot be spawned
/// and [`SongIdError::FfmpegFailed`] with ffmpeg's stderr when it exits
/// non-zero.
#[instrument(skip_all, fields(input = %video.display()))]
pub fn extract_audio(video: &Path) -> Result<PathBuf, SongIdError> {
    let mp3 = video.with_extension("mp3");

    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(video)
        .args(["-vn", "-acodec", "libmp3lame"])
        .arg(&mp3)
        .output()
        .map_err(|source| SongIdError::FfmpegMissing { source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(SongIdError::FfmpegFailed {
            input: video.to_path_buf(),
            stderr,
        });
    }

    debug!(audio = %mp3.display(), "extracted audio track");
    Ok(mp3)
}

/// Client for the song-recognition service.
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for RecognitionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionClient {
    /// Creates a client for the default local endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates a client for a specific endpoint (also used by tests with
    /// wiremock).
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Uploads an audio file and returns the identified track.
    ///
    /// # Errors
    ///
    /// Returns [`SongIdError::NoMatch`] when the service answers without a
    /// track, plus the usual request and status failures.
    #[instrument(skip(self), fields(audio = %audio.display()))]
    pub async fn recognize(&self, audio: &Path) -> Result<Track, SongIdError> {
        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|source| SongIdError::AudioFile {
                path: audio.to_path_buf(),
                source,
            })?;
        let file_name = audio
            .file_name()
            .map_or_else(|| "audio.mp3".to_string(), |n| n.to_string_lossy().into_owned());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SongIdError::ServiceStatus { status });
        }

        let parsed: RecognitionResponse = response.json().await?;
        parsed.track.ok_or(SongIdError::NoMatch)
    }
}

/// Identifies the song in a video file.
///
/// # Errors
///
/// Returns [`SongIdError`] from the extraction or recognition stage.
pub async fn identify(client: &RecognitionClient, video: &Path) -> Result<Track, SongIdError> {
    let audio = extract_audio(video)?;
    recognize_and_discard(client, &audio).await
}

/// Recognizes an already-extracted audio file, then removes it.
///
/// The MP3 is a throwaway: it is removed whether recognition succeeds or
/// fails, and a failed removal is logged rather than masking the
/// recognition result.
async fn recognize_and_discard(
    client: &RecognitionClient,
    audio: &Path,
) -> Result<Track, SongIdError> {
    let result = client.recognize(audio).await;

    if let Err(source) = std::fs::remove_file(audio) {
        warn!(audio = %audio.display(), error = %source, "failed to remove extracted audio");
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn audio_fixture(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("clip.mp3");
        fs::write(&path, b"fake mp3 bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn test_recognize_parses_track() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "track": {
                    "title": "Midnight City",
                    "subtitle": "M83",
                    "genres": {"primary": "Electronic"},
                }
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = audio_fixture(&dir);
        let client = RecognitionClient::with_endpoint(format!("{}/recognize", server.uri()));

        let track = client.recognize(&audio).await.unwrap();
        assert_eq!(track.title, "Midnight City");
        assert_eq!(track.subtitle, "M83");
        assert_eq!(track.primary_genre(), Some("Electronic"));
    }

    #[tokio::test]
    async fn test_recognize_track_without_genres() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "track": {"title": "Obscure B-Side", "subtitle": "Nobody"}
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = audio_fixture(&dir);
        let client = RecognitionClient::with_endpoint(format!("{}/recognize", server.uri()));

        let track = client.recognize(&audio).await.unwrap();
        assert_eq!(track.primary_genre(), None);
    }

    #[tokio::test]
    async fn test_recognize_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"matches": []})),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = audio_fixture(&dir);
        let client = RecognitionClient::with_endpoint(format!("{}/recognize", server.uri()));

        let result = client.recognize(&audio).await;
        assert!(matches!(result, Err(SongIdError::NoMatch)));
    }

    #[tokio::test]
    async fn test_recognize_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = audio_fixture(&dir);
        let client = RecognitionClient::with_endpoint(format!("{}/recognize", server.uri()));

        let result = client.recognize(&audio).await;
        assert!(matches!(result, Err(SongIdError::ServiceStatus { .. })));
    }

    #[tokio::test]
    async fn test_recognize_missing_audio_file() {
        let dir = TempDir::new().unwrap();
        let client = RecognitionClient::with_endpoint("http://127.0.0.1:1/recognize");

        let result = client.recognize(&dir.path().join("ghost.mp3")).await;
        assert!(matches!(result, Err(SongIdError::AudioFile { .. })));
    }

    #[tokio::test]
    async fn test_discard_removes_audio_after_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "track": {"title": "Midnight City", "subtitle": "M83"}
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = audio_fixture(&dir);
        let client = RecognitionClient::with_endpoint(format!("{}/recognize", server.uri()));

        let track = recognize_and_discard(&client, &audio).await.unwrap();
        assert_eq!(track.title, "Midnight City");
        assert!(!audio.exists(), "extracted audio should be removed");
    }

    #[tokio::test]
    async fn test_discard_removes_audio_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let audio = audio_fixture(&dir);
        let client = RecognitionClient::with_endpoint(format!("{}/recognize", server.uri()));

        let result = recognize_and_discard(&client, &audio).await;

        assert!(matches!(result, Err(SongIdError::ServiceStatus { .. })));
        assert!(
            !audio.exists(),
            "extracted audio should be removed even on failure"
        );
    }
}
