use async_trait::async_trait;

use vigia_utils::embed::{ColorTag, Embed};

use crate::Error;
use crate::surface::ChatSurface;

/// A request to start or enqueue playback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayRequest {
    pub guild_id: u64,
    pub voice_channel_id: u64,
    pub text_channel_id: u64,
    pub requested_by: u64,
    pub query: String,
}

/// The external audio queue. Search, decoding and streaming all live behind it.
///
/// Implementations report queue lifecycle changes by calling [`announce`] with
/// a [`PlaybackEvent`] for the request's text channel.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    async fn play(&self, request: PlayRequest) -> Result<(), Error>;

    async fn skip(&self, guild_id: u64) -> Result<(), Error>;

    async fn stop(&self, guild_id: u64) -> Result<(), Error>;

    async fn pause(&self, guild_id: u64) -> Result<(), Error>;

    async fn resume(&self, guild_id: u64) -> Result<(), Error>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongInfo {
    pub title: String,
    pub duration: String,
    pub requested_by: u64,
    pub source: String,
    pub thumbnail: Option<String>,
}

/// Lifecycle callbacks raised by the engine and rendered by [`announce`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    SongStarted {
        text_channel_id: u64,
        song: SongInfo,
    },
    SongQueued {
        text_channel_id: u64,
        song: SongInfo,
        position: usize,
    },
    PlaylistQueued {
        text_channel_id: u64,
        name: String,
        song_count: usize,
        duration: String,
        requested_by: u64,
        thumbnail: Option<String>,
    },
    QueueEmpty {
        text_channel_id: u64,
    },
    QueueFinished {
        text_channel_id: u64,
    },
    Disconnected {
        text_channel_id: u64,
    },
    Error {
        text_channel_id: Option<u64>,
        message: String,
    },
}

/// What to post for an event, and where.
pub enum Announcement {
    Embed(u64, Embed),
    Text(u64, String),
}

impl PlaybackEvent {
    pub fn announcement(&self) -> Option<Announcement> {
        let announcement = match self {
            PlaybackEvent::SongStarted {
                text_channel_id,
                song,
            } => Announcement::Embed(
                *text_channel_id,
                Embed::new("Now Playing", ColorTag::Default)
                    .description(format!("**{}**", song.title))
                    .thumbnail(song.thumbnail.clone())
                    .field("Duration", song.duration.clone(), true)
                    .field("Requested by", format!("<@{}>", song.requested_by), true)
                    .field("Source", song.source.clone(), true),
            ),
            PlaybackEvent::SongQueued {
                text_channel_id,
                song,
                position,
            } => Announcement::Embed(
                *text_channel_id,
                Embed::new("Added to Queue", ColorTag::Green)
                    .description(format!("**{}**", song.title))
                    .thumbnail(song.thumbnail.clone())
                    .field("Duration", song.duration.clone(), true)
                    .field("Position", position.to_string(), true)
                    .field("Requested by", format!("<@{}>", song.requested_by), true),
            ),
            PlaybackEvent::PlaylistQueued {
                text_channel_id,
                name,
                song_count,
                duration,
                requested_by,
                thumbnail,
            } => Announcement::Embed(
                *text_channel_id,
                Embed::new("Playlist Added to Queue", ColorTag::Purple)
                    .description(format!("**{name}** - {song_count} songs"))
                    .thumbnail(thumbnail.clone())
                    .field("Duration", duration.clone(), true)
                    .field("Requested by", format!("<@{requested_by}>"), true),
            ),
            PlaybackEvent::QueueEmpty { text_channel_id } => Announcement::Text(
                *text_channel_id,
                "Voice channel is empty. Leaving the channel...".to_owned(),
            ),
            PlaybackEvent::QueueFinished { text_channel_id } => Announcement::Text(
                *text_channel_id,
                "There are no more songs in the queue.".to_owned(),
            ),
            PlaybackEvent::Disconnected { text_channel_id } => Announcement::Text(
                *text_channel_id,
                "Disconnected from the voice channel.".to_owned(),
            ),
            PlaybackEvent::Error {
                text_channel_id,
                message,
            } => Announcement::Text(
                (*text_channel_id)?,
                format!("Playback error: {message}"),
            ),
        };

        Some(announcement)
    }
}

/// Post the event's announcement; failures are traced and dropped.
///
/// This is the entry point for engine integrations; nothing in the bot raises
/// playback events on its own.
pub async fn announce(surface: &dyn ChatSurface, event: &PlaybackEvent) {
    if let PlaybackEvent::Error { message, .. } = event {
        tracing::error!(message = %message, "playback engine error");
    }

    let result = match event.announcement() {
        Some(Announcement::Embed(channel_id, embed)) => {
            surface.send_embed(channel_id, embed).await.map(|_| ())
        }
        Some(Announcement::Text(channel_id, text)) => {
            surface.send(channel_id, &text).await.map(|_| ())
        }
        None => Ok(()),
    };

    if let Err(source) = result {
        tracing::warn!(?source, "failed to announce playback event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSurface;

    fn song() -> SongInfo {
        SongInfo {
            title: "Song".to_owned(),
            duration: "3:21".to_owned(),
            requested_by: 7,
            source: "YouTube".to_owned(),
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn announces_in_the_request_channel() {
        let surface = FakeSurface::new();

        announce(
            surface.as_ref(),
            &PlaybackEvent::SongQueued {
                text_channel_id: 33,
                song: song(),
                position: 2,
            },
        )
        .await;
        announce(surface.as_ref(), &PlaybackEvent::QueueFinished { text_channel_id: 33 }).await;

        let sent = surface.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|message| message.id.channel_id == 33));
        assert_eq!(sent[0].embed.as_ref().map(|embed| embed.title.as_str()), Some("Added to Queue"));
        assert_eq!(
            sent[1].content.as_deref(),
            Some("There are no more songs in the queue.")
        );
    }

    #[tokio::test]
    async fn errors_without_a_channel_are_only_traced() {
        let surface = FakeSurface::new();

        announce(
            surface.as_ref(),
            &PlaybackEvent::Error {
                text_channel_id: None,
                message: "decoder crashed".to_owned(),
            },
        )
        .await;

        assert!(surface.sent().is_empty());
    }

    #[tokio::test]
    async fn send_failures_are_swallowed() {
        let surface = FakeSurface::new();
        surface.fail_sends(true);

        announce(surface.as_ref(), &PlaybackEvent::SongStarted { text_channel_id: 1, song: song() }).await;

        assert!(surface.sent().is_empty());
    }
}
