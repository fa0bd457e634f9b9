//! Speak command handler: sanitize the line, synthesize it, play it.

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use roadie::speech::{self, SpeechClient, SpeechError};

use crate::cli::SpeakArgs;

pub async fn run_speak_command(args: &SpeakArgs) -> Result<()> {
    let voice = speech::pick_voice(args.voice.as_deref())?;
    let text = speech::sanitize_text(&args.text);
    if text.is_empty() {
        return Err(SpeechError::EmptyText.into());
    }

    debug!(voice, chars = text.chars().count(), "Synthesizing speech");

    let client = SpeechClient::with_endpoint(args.endpoint.clone());
    let audio = client.synthesize(&text, voice).await?;

    // Audio playback blocks until the clip finishes, so keep it off the
    // async runtime threads.
    tokio::task::spawn_blocking(move || speech::play_audio(audio))
        .await
        .map_err(|error| anyhow!("Playback task failed: {error}"))??;

    info!(voice, "Spoken");

    Ok(())
}
