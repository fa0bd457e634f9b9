//! Speech playback through an external synthesis service.
//!
//! The service is a black box: it takes text and a voice name over HTTP and
//! answers with encoded audio. This module sanitizes the text the way the
//! service needs it, picks a voice, and plays the returned audio on the
//! default output device.

use std::io::Cursor;

use rand::Rng;
use rodio::{Decoder, OutputStreamBuilder, Sink};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Longest text the synthesis service is asked to speak, in characters.
pub const MAX_SPOKEN_CHARS: usize = 300;

/// Default synthesis endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5050/synthesize";

/// English neural voices the synthesis service accepts.
pub const VOICES: &[&str] = &[
    "en-AU-NatashaNeural",
    "en-AU-WilliamNeural",
    "en-CA-ClaraNeural",
    "en-CA-LiamNeural",
    "en-GB-LibbyNeural",
    "en-GB-MaisieNeural",
    "en-GB-RyanNeural",
    "en-GB-SoniaNeural",
    "en-GB-ThomasNeural",
    "en-HK-SamNeural",
    "en-HK-YanNeural",
    "en-IE-ConnorNeural",
    "en-IE-EmilyNeural",
    "en-IN-NeerjaExpressiveNeural",
    "en-IN-NeerjaNeural",
    "en-IN-PrabhatNeural",
    "en-KE-AsiliaNeural",
    "en-KE-ChilembaNeural",
    "en-NG-AbeoNeural",
    "en-NG-EzinneNeural",
    "en-NZ-MitchellNeural",
    "en-NZ-MollyNeural",
    "en-PH-JamesNeural",
    "en-PH-RosaNeural",
    "en-SG-LunaNeural",
    "en-SG-WayneNeural",
    "en-TZ-ElimuNeural",
    "en-TZ-ImaniNeural",
    "en-US-AnaNeural",
    "en-US-AndrewMultilingualNeural",
    "en-US-AndrewNeural",
    "en-US-AriaNeural",
    "en-US-AvaMultilingualNeural",
    "en-US-AvaNeural",
    "en-US-BrianMultilingualNeural",
    "en-US-BrianNeural",
    "en-US-ChristopherNeural",
    "en-US-EmmaMultilingualNeural",
    "en-US-EmmaNeural",
    "en-US-EricNeural",
    "en-US-GuyNeural",
    "en-US-JennyNeural",
    "en-US-MichelleNeural",
    "en-US-RogerNeural",
    "en-US-SteffanNeural",
    "en-ZA-LeahNeural",
    "en-ZA-LukeNeural",
];

/// Errors synthesizing or playing speech.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The requested voice is not in the table.
    #[error("unknown voice '{voice}'; valid voices are: {}", VOICES.join(", "))]
    UnknownVoice {
        /// Voice name that was requested.
        voice: String,
    },

    /// Sanitizing left nothing to speak.
    #[error("nothing left to speak after sanitizing the text")]
    EmptyText,

    /// The synthesis request could not be sent.
    #[error("synthesis request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The synthesis service answered with a non-success status.
    #[error("synthesis service returned {status}")]
    ServiceStatus {
        /// Status code from the service.
        status: reqwest::StatusCode,
    },

    /// The returned audio could not be decoded.
    #[error("could not decode the synthesized audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    /// No audio output device could be opened.
    #[error("audio output unavailable: {0}")]
    Output(#[from] rodio::StreamError),
}

/// Strips text down to what the synthesis service accepts.
///
/// Keeps only Basic Multilingual Plane characters (the service rejects
/// supplementary-plane input such as emoji), drops backslashes, and
/// truncates to [`MAX_SPOKEN_CHARS`] characters.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|&c| u32::from(c) <= 0xFFFF && c != '\\')
        .take(MAX_SPOKEN_CHARS)
        .collect()
}

/// Picks the voice for one utterance.
///
/// An explicit request must name a voice from [`VOICES`]; without one, a
/// voice is drawn at random per call.
///
/// # Errors
///
/// Returns [`SpeechError::UnknownVoice`] when the requested name is not in
/// the table.
pub fn pick_voice(requested: Option<&str>) -> Result<&'static str, SpeechError> {
    match requested {
        Some(name) => VOICES
            .iter()
            .find(|&&voice| voice == name)
            .copied()
            .ok_or_else(|| SpeechError::UnknownVoice {
                voice: name.to_string(),
            }),
        None => {
            let idx = rand::thread_rng().gen_range(0..VOICES.len());
            Ok(VOICES[idx])
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

/// Client for the speech-synthesis service.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for SpeechClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechClient {
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

    /// Synthesizes `text` with `voice`, returning the encoded audio.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Request`] when the request fails outright and
    /// [`SpeechError::ServiceStatus`] when the service answers non-2xx.
    #[instrument(skip(self, text))]
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SynthesisRequest { text, voice })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::ServiceStatus { status });
        }

        let audio = response.bytes().await?;
        debug!(voice, bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}

/// Plays encoded audio on the default output device, blocking until the
/// sink drains.
///
/// # Errors
///
/// Returns [`SpeechError::Output`] when no output device can be opened and
/// [`SpeechError::Decode`] when the bytes are not decodable audio.
pub fn play_audio(audio: Vec<u8>) -> Result<(), SpeechError> {
    let stream = OutputStreamBuilder::open_default_stream()?;
    let sink = Sink::connect_new(stream.mixer());
    let source = Decoder::new(Cursor::new(audio))?;
    sink.append(source);
    sink.sleep_until_end();
    info!("playback finished");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sanitize_strips_non_bmp() {
        assert_eq!(sanitize_text("nice play 🎸 really"), "nice play  really");
    }

    #[test]
    fn test_sanitize_keeps_bmp_accents() {
        assert_eq!(sanitize_text("café naïve"), "café naïve");
    }

    #[test]
    fn test_sanitize_drops_backslashes() {
        assert_eq!(sanitize_text(r"a\b\\c"), "abc");
    }

    #[test]
    fn test_sanitize_truncates_by_characters() {
        let long: String = "é".repeat(400);
        let sanitized = sanitize_text(&long);
        assert_eq!(sanitized.chars().count(), MAX_SPOKEN_CHARS);
    }

    #[test]
    fn test_sanitize_short_text_untouched() {
        assert_eq!(sanitize_text("hello chat"), "hello chat");
    }

    #[test]
    fn test_voice_table_shape() {
        assert_eq!(VOICES.len(), 47);
        assert!(VOICES.iter().all(|voice| voice.starts_with("en-")));
        let mut sorted: Vec<&str> = VOICES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), VOICES.len(), "voice names must be unique");
    }

    #[test]
    fn test_pick_voice_explicit() {
        let voice = pick_voice(Some("en-US-AriaNeural")).unwrap();
        assert_eq!(voice, "en-US-AriaNeural");
    }

    #[test]
    fn test_pick_voice_unknown() {
        let result = pick_voice(Some("en-US-NopeNeural"));
        assert!(matches!(result, Err(SpeechError::UnknownVoice { .. })));
    }

    #[test]
    fn test_pick_voice_random_comes_from_table() {
        for _ in 0..20 {
            let voice = pick_voice(None).unwrap();
            assert!(VOICES.contains(&voice));
        }
    }

    #[tokio::test]
    async fn test_synthesize_posts_text_and_voice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .and(body_json(serde_json::json!({
                "text": "hello chat",
                "voice": "en-US-AriaNeural",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake-audio"))
            .mount(&server)
            .await;

        let client = SpeechClient::with_endpoint(format!("{}/synthesize", server.uri()));
        let audio = client
            .synthesize("hello chat", "en-US-AriaNeural")
            .await
            .unwrap();
        assert_eq!(audio, b"fake-audio");
    }

    #[tokio::test]
    async fn test_synthesize_surfaces_service_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SpeechClient::with_endpoint(format!("{}/synthesize", server.uri()));
        let result = client.synthesize("hello", "en-US-AriaNeural").await;

        match result {
            Err(SpeechError::ServiceStatus { status }) => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
            }
            other => panic!("expected ServiceStatus, got: {other:?}"),
        }
    }
}
