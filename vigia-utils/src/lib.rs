/// Platform-neutral embeds and their serenity conversion.
pub mod embed;
/// Shared formatting helpers (durations, mentions, timestamps).
pub mod formatting;
/// Single source of truth for the default message-command prefix.
pub const DEFAULT_PREFIX: &str = "!";
/// Pure parser helpers.
pub mod parse;
/// Permission tags and member permission resolution.
pub mod permissions;
/// Shared time helpers.
pub mod time;
