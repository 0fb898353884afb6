/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    if hours > 0 {
        let mut parts = vec![format!("{}h", hours)];
        if minutes > 0 {
            parts.push(format!("{}m", minutes));
        }
        if seconds > 0 {
            parts.push(format!("{}s", seconds));
        }
        return parts.join(" ");
    }

    if minutes > 0 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    format!("{}s", seconds)
}

/// Absolute plus relative platform timestamp markup.
pub fn format_timestamp(unix_secs: u64) -> String {
    format!("<t:{unix_secs}:F> (<t:{unix_secs}:R>)")
}

/// Remaining cooldown as shown to users, one decimal place.
pub fn format_seconds_one_decimal(seconds: f64) -> String {
    format!("{seconds:.1}s")
}

pub fn format_channel(channel_id: Option<u64>) -> String {
    match channel_id {
        Some(id) => format!("<#{id}> ({id})"),
        None => "Not set".to_owned(),
    }
}

pub fn format_role(role_id: Option<u64>) -> String {
    match role_id {
        Some(id) => format!("<@&{id}> ({id})"),
        None => "Not set".to_owned(),
    }
}

/// `tag (id)` label used in log fields.
pub fn user_label(tag: &str, user_id: u64) -> String {
    format!("{tag} ({user_id})")
}

/// Neutralise mentions in user-supplied text before echoing it.
pub fn escape_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}
