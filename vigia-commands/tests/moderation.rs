mod common;

use std::time::Duration;

use poise::serenity_prelude as serenity;
use pretty_assertions::assert_eq;

use vigia_core::testing::{GUILD, ModerationCall};
use vigia_core::{DenyReason, Outcome};
use vigia_database::LogCategory;

use common::{Bot, MEMBER, OWNER, TARGET, member};

const MODERATOR: u64 = 30;

fn bot() -> Bot {
    let bot = Bot::new();

    let mut moderator = member(MODERATOR);
    moderator.permissions = serenity::Permissions::MANAGE_MESSAGES;
    moderator.highest_role_position = 10;
    bot.add_member(moderator);

    let mut target = member(TARGET);
    target.highest_role_position = 2;
    bot.add_member(target);

    bot
}

#[tokio::test]
async fn mutes_for_the_requested_duration() {
    let bot = bot();

    let outcome = bot
        .send(MODERATOR, &format!("!moderate <@{TARGET}> mute 30m spamming links"))
        .await;

    assert_eq!(outcome, Outcome::Succeeded);
    assert_eq!(
        bot.surface.actions(),
        vec![ModerationCall::Timeout {
            user_id: TARGET,
            duration: Duration::from_secs(1800),
            reason: "spamming links".to_owned(),
        }]
    );

    let records = bot.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].embed.title, "Moderation Action: Mute");
    assert!(records[0]
        .embed
        .fields
        .iter()
        .any(|field| field.name == "Duration" && field.value == "30m"));
}

#[tokio::test]
async fn mute_defaults_to_ten_minutes() {
    let bot = bot();

    bot.send(MODERATOR, &format!("!mod {TARGET} mute being rude")).await;

    assert_eq!(
        bot.surface.actions(),
        vec![ModerationCall::Timeout {
            user_id: TARGET,
            duration: Duration::from_secs(600),
            reason: "being rude".to_owned(),
        }]
    );
}

#[tokio::test]
async fn mute_is_capped_at_twenty_eight_days() {
    let bot = bot();

    bot.send(MODERATOR, &format!("!mod <@{TARGET}> mute 29d")).await;

    assert_eq!(bot.last_reply(), "Timeout duration cannot exceed 28 days.");
    assert!(bot.surface.actions().is_empty());
}

#[tokio::test]
async fn kick_and_ban_carry_the_reason() {
    let bot = bot();

    bot.send(MODERATOR, &format!("!mod <@{TARGET}> kick")).await;
    bot.send(MODERATOR, &format!("!mod <@!{TARGET}> ban raiding")).await;

    assert_eq!(
        bot.surface.actions(),
        vec![
            ModerationCall::Kick {
                user_id: TARGET,
                reason: "No reason provided".to_owned(),
            },
            ModerationCall::Ban {
                user_id: TARGET,
                reason: "raiding".to_owned(),
            },
        ]
    );
}

#[tokio::test]
async fn warn_sends_a_direct_message() {
    let bot = bot();

    bot.send(MODERATOR, &format!("!mod <@{TARGET}> warn please stop")).await;

    let dms = bot.surface.direct_messages();
    assert_eq!(dms.len(), 1);
    assert_eq!(dms[0].0, TARGET);
    assert_eq!(dms[0].1.title, "You have been warned in Test Guild");
    assert!(bot.surface.actions().is_empty());
}

#[tokio::test]
async fn refuses_self_bots_and_higher_roles() {
    let bot = bot();

    bot.send(MODERATOR, &format!("!mod <@{MODERATOR}> warn")).await;
    assert_eq!(bot.last_reply(), "You can't moderate yourself.");

    let mut robot = member(40);
    robot.is_bot = true;
    bot.add_member(robot);
    bot.send(MODERATOR, "!mod <@40> kick").await;
    assert_eq!(
        bot.last_reply(),
        "You can't use moderation actions on bots or application accounts."
    );

    let mut senior = member(41);
    senior.highest_role_position = 10;
    bot.add_member(senior);
    bot.send(MODERATOR, "!mod <@41> ban").await;
    assert_eq!(
        bot.last_reply(),
        "You can't moderate a member whose highest role is equal to or above yours."
    );

    bot.send(MODERATOR, &format!("!mod <@{OWNER}> ban")).await;
    assert_eq!(
        bot.last_reply(),
        "You can't moderate a member whose highest role is equal to or above yours."
    );

    assert!(bot.surface.actions().is_empty());
}

#[tokio::test]
async fn owner_is_still_bound_by_the_bot_role() {
    let bot = bot();
    bot.surface.set_bot_position(2);

    bot.send(OWNER, &format!("!mod <@{TARGET}> kick")).await;

    assert_eq!(
        bot.last_reply(),
        "I can't moderate that member: their highest role is equal to or above mine."
    );
    assert!(bot.surface.actions().is_empty());
}

#[tokio::test]
async fn unknown_targets_and_missing_arguments() {
    let bot = bot();

    bot.send(MODERATOR, "!mod <@999> kick").await;
    assert_eq!(bot.last_reply(), "❌ User not found.");

    bot.send(MODERATOR, "!mod").await;
    assert_eq!(
        bot.last_reply(),
        "Usage: `!moderate <@user> <warn|mute|kick|ban> [duration] [reason]`"
    );

    bot.send(MODERATOR, &format!("!mod <@{TARGET}> yeet")).await;
    assert!(bot.last_reply().starts_with("Usage:"));
}

#[tokio::test]
async fn disabled_moderation_logs_skip_the_audit_record() {
    let bot = bot();
    bot.data()
        .store
        .toggle_log(GUILD, LogCategory::Moderation)
        .await
        .expect("toggle");

    bot.send(MODERATOR, &format!("!mod <@{TARGET}> kick")).await;

    assert_eq!(bot.surface.actions().len(), 1);
    assert!(bot.audit.records().is_empty());
}

#[tokio::test]
async fn members_without_permission_are_denied() {
    let bot = bot();

    assert_eq!(
        bot.send(MEMBER, &format!("!mod <@{TARGET}> ban")).await,
        Outcome::Denied(DenyReason::InsufficientPermission)
    );
}
