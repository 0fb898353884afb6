mod common;

use pretty_assertions::assert_eq;

use vigia_core::ChannelKind;
use vigia_core::testing::GUILD;

use common::{Bot, MEMBER};

fn help_text(bot: &Bot) -> String {
    bot.surface
        .sent()
        .pop()
        .and_then(|sent| sent.embed)
        .and_then(|embed| embed.description)
        .unwrap_or_default()
}

#[test]
fn registry_has_no_clashing_names() {
    let registry = vigia_commands::registry().expect("registry");

    assert_eq!(registry.len(), 10);
    assert_eq!(registry.canonical_name("configurar"), Some("config"));
    assert_eq!(registry.canonical_name("GUILDINFO"), Some("serverinfo"));
}

#[tokio::test]
async fn ping_reports_latency() {
    let bot = Bot::new();

    bot.send(MEMBER, "!ping").await;

    assert_eq!(bot.last_reply(), "Pong! Gateway latency: 42ms");
}

#[tokio::test]
async fn help_groups_commands_and_hides_disabled_ones() {
    let bot = Bot::new();

    bot.send(MEMBER, "!help").await;
    let all = help_text(&bot);
    assert!(all.starts_with("**Admin**"));
    assert!(all.contains("`!play`"));

    bot.data()
        .store
        .disable_command(GUILD, "play")
        .await
        .expect("disable");
    bot.send(MEMBER, "!h").await;
    assert!(!help_text(&bot).contains("`!play`"));
}

#[tokio::test]
async fn help_filters_by_category_and_describes_commands() {
    let bot = Bot::new();

    bot.send(MEMBER, "!help music").await;
    let music = help_text(&bot);
    assert!(music.contains("`!skip`"));
    assert!(!music.contains("`!ping`"));

    bot.send(MEMBER, "!help si").await;
    let detail = bot.surface.sent().pop().and_then(|sent| sent.embed).expect("detail");
    assert_eq!(detail.title, "Command: serverinfo");
    assert!(detail.fields.iter().any(|field| field.name == "Cooldown" && field.value == "5s"));

    bot.send(MEMBER, "!help dance").await;
    assert!(bot.last_reply().starts_with("Unknown command or category: dance"));
}

#[tokio::test]
async fn serverinfo_counts_channels_by_kind() {
    let bot = Bot::new();
    bot.surface
        .with_channel(1, ChannelKind::Text)
        .with_channel(2, ChannelKind::Text)
        .with_channel(3, ChannelKind::Voice);

    bot.send(MEMBER, "!serverinfo").await;

    let embed = bot.surface.sent().pop().and_then(|sent| sent.embed).expect("embed");
    assert_eq!(embed.title, "Test Guild");
    let channels = embed
        .fields
        .iter()
        .find(|field| field.name == "Channels")
        .expect("channels field");
    assert!(channels.value.starts_with("Text: 2\nVoice: 1"));
}
