mod common;

use pretty_assertions::assert_eq;

use vigia_core::testing::{GUILD, PlaybackCall};
use vigia_core::{Outcome, PlayRequest};
use vigia_database::ConfigUpdate;

use common::{Bot, CHANNEL, MEMBER, OWNER, member};

const VOICE: u64 = 700;
const LISTENER: u64 = 50;
const DJ_ROLE: u64 = 77;

fn bot() -> Bot {
    let bot = Bot::new();
    let mut listener = member(LISTENER);
    listener.voice_channel_id = Some(VOICE);
    bot.add_member(listener);
    bot
}

#[tokio::test]
async fn play_forwards_the_query_to_the_engine() {
    let bot = bot();

    assert_eq!(bot.send(LISTENER, "!p never gonna give you up").await, Outcome::Succeeded);

    assert_eq!(
        bot.playback.calls(),
        vec![PlaybackCall::Play(PlayRequest {
            guild_id: GUILD,
            voice_channel_id: VOICE,
            text_channel_id: CHANNEL,
            requested_by: LISTENER,
            query: "never gonna give you up".to_owned(),
        })]
    );
}

#[tokio::test]
async fn play_requires_a_voice_channel() {
    let bot = bot();

    bot.send(MEMBER, "!play something").await;

    assert_eq!(bot.last_reply(), "You need to be in a voice channel to play music.");
    assert!(bot.playback.calls().is_empty());
}

#[tokio::test]
async fn play_without_a_query_shows_usage() {
    let bot = bot();

    bot.send(LISTENER, "!play").await;

    assert_eq!(bot.last_reply(), "Usage: `!play <link|search>`");
}

#[tokio::test]
async fn music_channel_restricts_every_music_command() {
    let bot = bot();
    bot.data()
        .store
        .set(GUILD, ConfigUpdate::MusicChannel(Some(CHANNEL + 1)))
        .await
        .expect("set");

    bot.send(LISTENER, "!play song").await;
    assert_eq!(
        bot.last_reply(),
        format!("Music commands can only be used in <#{}>.", CHANNEL + 1)
    );

    bot.send(LISTENER, "!pause").await;
    assert!(bot.playback.calls().is_empty());
}

#[tokio::test]
async fn engine_failures_become_command_failures() {
    let bot = bot();
    bot.playback.fail(true);

    let outcome = bot.send(LISTENER, "!play nothing matches").await;

    assert_eq!(outcome, Outcome::Failed("no results found".to_owned()));
    assert_eq!(bot.audit.titles(), vec!["Command Error".to_owned()]);
}

#[tokio::test]
async fn missing_engine_is_reported() {
    let bot = Bot::without_playback();

    bot.send(MEMBER, "!resume").await;

    assert_eq!(bot.last_reply(), "Music playback is not available right now.");
}

#[tokio::test]
async fn dj_role_guards_skip_and_stop_only() {
    let bot = bot();
    bot.data()
        .store
        .set(GUILD, ConfigUpdate::DjRole(Some(DJ_ROLE)))
        .await
        .expect("set");

    bot.send(MEMBER, "!skip").await;
    assert_eq!(
        bot.last_reply(),
        format!("You need the <@&{DJ_ROLE}> role to use this command.")
    );
    bot.send(MEMBER, "!stop").await;
    bot.send(MEMBER, "!pause").await;

    let mut dj = member(60);
    dj.roles = vec![DJ_ROLE];
    bot.add_member(dj);
    bot.send(60, "!skip").await;
    bot.send(OWNER, "!stop").await;

    assert_eq!(
        bot.playback.calls(),
        vec![
            PlaybackCall::Pause(GUILD),
            PlaybackCall::Skip(GUILD),
            PlaybackCall::Stop(GUILD),
        ]
    );
}
