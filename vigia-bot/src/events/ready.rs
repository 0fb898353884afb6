use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::info;

use vigia_core::Data;
use vigia_core::audit::{AuditRecord, send_log_quietly};
use vigia_utils::embed::{ColorTag, Embed};

pub const PRESENCE_ROTATION: Duration = Duration::from_secs(5 * 60);

// Ready fires again after every reconnect.
static PRESENCE_STARTED: AtomicBool = AtomicBool::new(false);

pub async fn handle_ready(ctx: &serenity::Context, ready: &serenity::Ready, data: &Data) {
    let guild_count = ready.guilds.len();
    info!(user = %ready.user.tag(), guild_count, "Vigia is online.");

    let embed = Embed::new("Bot Started", ColorTag::Green)
        .description(format!("Logged in as **{}**", ready.user.tag()))
        .field("Servers", guild_count.to_string(), true)
        .field("Storage", data.store.backend().describe(), true)
        .timestamp();
    send_log_quietly(data.audit.as_ref(), AuditRecord::new(None, embed)).await;

    spawn_presence_rotation(ctx.clone(), data.settings.default_prefix.clone());
}

fn presence_lines(prefix: &str, guild_count: usize) -> Vec<String> {
    vec![
        format!("{prefix}help"),
        format!("{guild_count} servers"),
        "music and moderation".to_owned(),
    ]
}

fn spawn_presence_rotation(ctx: serenity::Context, prefix: String) {
    if PRESENCE_STARTED.swap(true, Ordering::SeqCst) {
        return;
    }

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRESENCE_ROTATION);
        let mut index = 0_usize;

        loop {
            interval.tick().await;
            let lines = presence_lines(&prefix, ctx.cache.guild_count());
            let line = &lines[index % lines.len()];
            ctx.set_activity(Some(serenity::ActivityData::watching(line.clone())));
            index = index.wrapping_add(1);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::presence_lines;

    #[test]
    fn presence_mentions_prefix_and_server_count() {
        let lines = presence_lines("?", 3);
        assert_eq!(lines[0], "?help");
        assert_eq!(lines[1], "3 servers");
    }
}
