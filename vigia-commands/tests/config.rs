mod common;

use pretty_assertions::assert_eq;

use vigia_core::testing::GUILD;
use vigia_core::{ChannelKind, DenyReason, Outcome};
use vigia_database::{GuildConfig, LogCategory};

use common::{Bot, MEMBER, OWNER, member};

const TEXT: u64 = 301;
const VOICE: u64 = 302;
const ROLE: u64 = 401;

fn bot() -> Bot {
    let bot = Bot::new();
    bot.surface
        .with_channel(TEXT, ChannelKind::Text)
        .with_channel(VOICE, ChannelKind::Voice)
        .with_role(ROLE, "Moderators");
    bot
}

#[tokio::test]
async fn sets_a_short_prefix() {
    let bot = bot();

    assert_eq!(bot.send(OWNER, "!config set prefix ?").await, Outcome::Succeeded);
    assert_eq!(bot.config().await.prefix, "?");
    assert!(bot.last_reply().starts_with("✅"));

    assert_eq!(bot.send(OWNER, "?ping").await, Outcome::Succeeded);
}

#[tokio::test]
async fn rejects_long_prefixes_without_writing() {
    let bot = bot();

    assert_eq!(bot.send(OWNER, "!config set prefix abcd").await, Outcome::Succeeded);
    assert_eq!(
        bot.last_reply(),
        "❌ The prefix must be at most 3 characters long."
    );
    assert_eq!(bot.config().await, GuildConfig::default());
}

#[tokio::test]
async fn rejects_unknown_options() {
    let bot = bot();

    bot.send(OWNER, "!config set color red").await;

    assert!(bot.last_reply().starts_with("❌ Invalid option `color`"));
}

#[tokio::test]
async fn channel_options_need_an_existing_text_channel() {
    let bot = bot();

    bot.send(OWNER, &format!("!config set logchannel <#{VOICE}>")).await;
    assert_eq!(bot.last_reply(), "❌ The channel must be a text channel.");

    bot.send(OWNER, "!config set logchannel 999").await;
    assert_eq!(bot.last_reply(), "❌ Channel not found.");

    bot.send(OWNER, &format!("!config set logchannel <#{TEXT}>")).await;
    assert_eq!(bot.config().await.log_channel, Some(TEXT));

    bot.send(OWNER, "!config set logchannel nenhum").await;
    assert_eq!(bot.config().await.log_channel, None);
}

#[tokio::test]
async fn role_options_need_an_existing_role() {
    let bot = bot();

    bot.send(OWNER, "!config set djrole <@&12345>").await;
    assert_eq!(bot.last_reply(), "❌ Role not found.");

    bot.send(OWNER, &format!("!settings definir DJROLE <@&{ROLE}>")).await;
    assert_eq!(bot.config().await.dj_role, Some(ROLE));
}

#[tokio::test]
async fn toggles_log_categories() {
    let bot = bot();

    bot.send(OWNER, "!config toggle logs voice").await;
    assert!(!bot.config().await.enabled_logs.is_enabled(LogCategory::Voice));

    bot.send(OWNER, "!config alternar logs VOICE").await;
    assert!(bot.config().await.enabled_logs.is_enabled(LogCategory::Voice));

    bot.send(OWNER, "!config toggle logs reactions").await;
    assert!(bot.last_reply().starts_with("❌ Invalid log type `reactions`"));
}

#[tokio::test]
async fn toggling_a_command_by_alias_disables_its_canonical_name() {
    let bot = bot();

    bot.send(OWNER, "!config toggle command p").await;

    assert!(bot.config().await.disabled_commands.contains("play"));
    assert_eq!(
        bot.send(MEMBER, "!play some song").await,
        Outcome::Denied(DenyReason::CommandDisabled)
    );

    bot.send(OWNER, "!config toggle command play").await;
    assert!(bot.config().await.disabled_commands.is_empty());
}

#[tokio::test]
async fn config_cannot_disable_itself() {
    let bot = bot();

    bot.send(OWNER, "!config toggle command settings").await;

    assert_eq!(bot.last_reply(), "❌ The config command cannot be disabled.");
    assert!(bot.config().await.disabled_commands.is_empty());
}

#[tokio::test]
async fn unknown_commands_cannot_be_toggled() {
    let bot = bot();

    bot.send(OWNER, "!config toggle command dance").await;

    assert_eq!(bot.last_reply(), "❌ Command `dance` not found.");
}

#[tokio::test]
async fn mod_roles_grant_moderation() {
    let bot = bot();
    let mut moderator = member(20);
    moderator.roles = vec![ROLE];
    moderator.highest_role_position = 5;
    bot.add_member(moderator);

    assert_eq!(
        bot.send(20, "!moderate <@8> warn").await,
        Outcome::Denied(DenyReason::InsufficientPermission)
    );

    bot.send(OWNER, &format!("!config toggle modrole <@&{ROLE}>")).await;
    assert!(bot.config().await.mod_roles.contains(&ROLE));
    assert_eq!(bot.send(20, "!moderate <@8> warn").await, Outcome::Succeeded);

    bot.send(OWNER, &format!("!config toggle modrole {ROLE}")).await;
    assert!(bot.config().await.mod_roles.is_empty());
}

#[tokio::test]
async fn reset_requires_confirmation() {
    let bot = bot();
    bot.send(OWNER, "!config set prefix ?").await;

    bot.surface.queue_reply(Some("no"));
    bot.send(OWNER, "?config reset").await;
    assert_eq!(bot.last_reply(), "Reset cancelled.");
    assert_eq!(bot.config().await.prefix, "?");

    bot.surface.queue_reply(None);
    bot.send(OWNER, "?config reset").await;
    assert_eq!(bot.last_reply(), "Reset timed out. Nothing was changed.");

    bot.surface.queue_reply(Some(" SIM "));
    bot.send(OWNER, "?config resetar").await;
    assert_eq!(bot.config().await, GuildConfig::default());
}

#[tokio::test]
async fn view_and_help_render_embeds() {
    let bot = bot();

    bot.send(OWNER, "!config view").await;
    let view = bot.surface.sent().pop().and_then(|sent| sent.embed).expect("view embed");
    assert_eq!(view.title, "Server Configuration");
    assert!(view.fields.iter().any(|field| field.name == "Prefix" && field.value == "`!`"));

    bot.send(OWNER, "!config").await;
    let help = bot.surface.sent().pop().and_then(|sent| sent.embed).expect("help embed");
    assert_eq!(help.title, "Configuration Commands");
}

#[tokio::test]
async fn members_without_administrator_are_denied() {
    let bot = bot();

    assert_eq!(
        bot.send(MEMBER, "!config set prefix ?").await,
        Outcome::Denied(DenyReason::InsufficientPermission)
    );
    assert_eq!(bot.config().await.prefix, "!");
}

#[tokio::test]
async fn changes_are_audited_only_when_server_logs_are_enabled() {
    let bot = bot();

    bot.send(OWNER, "!config set prefix ?").await;
    assert_eq!(bot.audit.titles(), vec!["Configuration Changed".to_owned()]);

    bot.data()
        .store
        .toggle_log(GUILD, LogCategory::Server)
        .await
        .expect("toggle");
    bot.send(OWNER, "?config set prefix !").await;
    assert_eq!(bot.audit.records().len(), 1);
}
