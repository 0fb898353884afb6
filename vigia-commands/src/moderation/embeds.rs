use vigia_utils::embed::{ColorTag, Embed};
use vigia_utils::formatting::escape_mentions;

pub fn moderation_action_embed(
    target_tag: &str,
    target_user_id: u64,
    target_avatar: Option<String>,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> Embed {
    let reason = escape_mentions(reason.unwrap_or("No reason provided"));

    let description = match duration {
        Some(duration) => format!(
            "**Target :** <@{target_user_id}>\n**Reason :** {reason}\n**Duration :** {duration}"
        ),
        None => format!("**Target :** <@{target_user_id}>\n**Reason :** {reason}"),
    };

    Embed::new(format!("{target_tag} has been {action_past_tense}"), ColorTag::Default)
        .thumbnail(target_avatar)
        .description(description)
}

pub fn moderation_target_dm_embed(
    guild_name: &str,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> Embed {
    let mut details = Vec::new();

    if let Some(reason) = reason {
        details.push(format!("**Reason :** {}", escape_mentions(reason)));
    }

    if let Some(duration) = duration {
        details.push(format!("**Duration :** {duration}"));
    }

    let description = if details.is_empty() {
        "No additional details were provided.".to_owned()
    } else {
        details.join("\n")
    };

    Embed::new(
        format!("You have been {action_past_tense} in {guild_name}"),
        ColorTag::Yellow,
    )
    .description(description)
}

pub fn moderation_self_action_message() -> &'static str {
    "You can't moderate yourself."
}

pub fn moderation_bot_target_message() -> &'static str {
    "You can't use moderation actions on bots or application accounts."
}

pub fn hierarchy_message() -> &'static str {
    "You can't moderate a member whose highest role is equal to or above yours."
}

pub fn bot_hierarchy_message() -> &'static str {
    "I can't moderate that member: their highest role is equal to or above mine."
}
