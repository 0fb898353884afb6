use poise::serenity_prelude as serenity;

use vigia_core::Data;
use vigia_core::audit::{AuditRecord, send_log_quietly};
use vigia_database::LogCategory;
use vigia_utils::embed::{ColorTag, Embed};
use vigia_utils::formatting::user_label;

/// The parts of a voice state that produce audit records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoiceSnapshot {
    pub channel_id: Option<u64>,
    pub muted: bool,
    pub deafened: bool,
    pub streaming: bool,
    pub video: bool,
}

impl From<&serenity::VoiceState> for VoiceSnapshot {
    fn from(state: &serenity::VoiceState) -> Self {
        Self {
            channel_id: state.channel_id.map(|id| id.get()),
            muted: state.self_mute || state.mute,
            deafened: state.self_deaf || state.deaf,
            streaming: state.self_stream.unwrap_or(false),
            video: state.self_video,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceChange {
    Joined(u64),
    Left(u64),
    Moved { from: u64, to: u64 },
    Muted(bool),
    Deafened(bool),
    Streaming(bool),
    Video(bool),
}

impl VoiceChange {
    fn embed(self, user: &str) -> Embed {
        let (title, color, description) = match self {
            VoiceChange::Joined(channel) => (
                "Voice Channel Joined",
                ColorTag::Green,
                format!("{user} joined <#{channel}>"),
            ),
            VoiceChange::Left(channel) => (
                "Voice Channel Left",
                ColorTag::Red,
                format!("{user} left <#{channel}>"),
            ),
            VoiceChange::Moved { from, to } => (
                "Voice Channel Moved",
                ColorTag::Blue,
                format!("{user} moved from <#{from}> to <#{to}>"),
            ),
            VoiceChange::Muted(on) => (
                if on { "Member Muted" } else { "Member Unmuted" },
                ColorTag::Yellow,
                format!("{user} {} their microphone", if on { "muted" } else { "unmuted" }),
            ),
            VoiceChange::Deafened(on) => (
                if on { "Member Deafened" } else { "Member Undeafened" },
                ColorTag::Yellow,
                format!("{user} {}", if on { "deafened" } else { "undeafened" }),
            ),
            VoiceChange::Streaming(on) => (
                if on { "Stream Started" } else { "Stream Ended" },
                ColorTag::Purple,
                format!("{user} {} streaming", if on { "started" } else { "stopped" }),
            ),
            VoiceChange::Video(on) => (
                if on { "Camera On" } else { "Camera Off" },
                ColorTag::Purple,
                format!("{user} turned their camera {}", if on { "on" } else { "off" }),
            ),
        };

        Embed::new(title, color).description(description).timestamp()
    }
}

/// Every audited change between two voice states.
///
/// Toggles are only reported while the member stays connected.
pub fn voice_changes(old: Option<VoiceSnapshot>, new: VoiceSnapshot) -> Vec<VoiceChange> {
    let old = old.unwrap_or_default();
    let mut changes = Vec::new();

    match (old.channel_id, new.channel_id) {
        (None, Some(channel)) => changes.push(VoiceChange::Joined(channel)),
        (Some(channel), None) => changes.push(VoiceChange::Left(channel)),
        (Some(from), Some(to)) if from != to => changes.push(VoiceChange::Moved { from, to }),
        _ => {}
    }

    if old.channel_id.is_none() || new.channel_id.is_none() {
        return changes;
    }

    if old.muted != new.muted {
        changes.push(VoiceChange::Muted(new.muted));
    }
    if old.deafened != new.deafened {
        changes.push(VoiceChange::Deafened(new.deafened));
    }
    if old.streaming != new.streaming {
        changes.push(VoiceChange::Streaming(new.streaming));
    }
    if old.video != new.video {
        changes.push(VoiceChange::Video(new.video));
    }

    changes
}

pub async fn handle_voice_state_update(
    data: &Data,
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) {
    let Some(guild_id) = new.guild_id else {
        return;
    };
    let Some(member) = new.member.as_ref() else {
        return;
    };
    if member.user.bot {
        return;
    }
    if !data.store.is_log_enabled(guild_id.get(), LogCategory::Voice).await {
        return;
    }

    let user = user_label(&member.user.tag(), member.user.id.get());
    let changes = voice_changes(old.map(VoiceSnapshot::from), VoiceSnapshot::from(new));

    for change in changes {
        let embed = change
            .embed(&user)
            .thumbnail(Some(member.user.face()));
        send_log_quietly(data.audit.as_ref(), AuditRecord::new(Some(guild_id.get()), embed)).await;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn in_channel(channel_id: u64) -> VoiceSnapshot {
        VoiceSnapshot {
            channel_id: Some(channel_id),
            ..VoiceSnapshot::default()
        }
    }

    #[test]
    fn join_move_and_leave() {
        assert_eq!(voice_changes(None, in_channel(1)), vec![VoiceChange::Joined(1)]);
        assert_eq!(
            voice_changes(Some(in_channel(1)), in_channel(2)),
            vec![VoiceChange::Moved { from: 1, to: 2 }]
        );
        assert_eq!(
            voice_changes(Some(in_channel(2)), VoiceSnapshot::default()),
            vec![VoiceChange::Left(2)]
        );
    }

    #[test]
    fn toggles_while_connected() {
        let old = in_channel(1);
        let new = VoiceSnapshot {
            muted: true,
            video: true,
            ..old
        };

        assert_eq!(
            voice_changes(Some(old), new),
            vec![VoiceChange::Muted(true), VoiceChange::Video(true)]
        );
        assert_eq!(
            voice_changes(Some(new), old),
            vec![VoiceChange::Muted(false), VoiceChange::Video(false)]
        );
    }

    #[test]
    fn leaving_muted_reports_only_the_leave() {
        let old = VoiceSnapshot {
            muted: true,
            deafened: true,
            ..in_channel(3)
        };

        assert_eq!(
            voice_changes(Some(old), VoiceSnapshot::default()),
            vec![VoiceChange::Left(3)]
        );
    }

    #[test]
    fn unchanged_state_is_silent() {
        assert!(voice_changes(Some(in_channel(4)), in_channel(4)).is_empty());
    }
}
