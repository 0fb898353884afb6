pub(crate) mod embeds;
pub mod moderate;
