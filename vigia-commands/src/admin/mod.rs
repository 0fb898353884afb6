pub mod config;
pub(crate) mod embeds;
