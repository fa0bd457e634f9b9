//! Song identification command handler.

use anyhow::{Result, bail};
use tracing::info;

use roadie::songid::{self, RecognitionClient};

use crate::cli::SongIdArgs;

pub async fn run_song_id_command(args: &SongIdArgs) -> Result<()> {
    let client = RecognitionClient::with_endpoint(args.endpoint.clone());
    let track = songid::identify(&client, &args.video).await?;

    info!(video = %args.video.display(), "Recognition complete");

    if args.genre_only {
        match track.primary_genre() {
            Some(genre) => println!("{genre}"),
            None => bail!("No genre reported for '{} - {}'", track.subtitle, track.title),
        }
        return Ok(());
    }

    println!("{} - {}", track.subtitle, track.title);
    if let Some(genre) = track.primary_genre() {
        println!("genre: {genre}");
    }

    Ok(())
}
