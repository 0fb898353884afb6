use thiserror::Error;

/// Rejected user input. Handlers show the message and stop; nothing is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The prefix must be at most {max} characters long.")]
    PrefixTooLong { max: usize },
    #[error("Invalid option `{0}`. Valid options: prefix, logchannel, welcomechannel, autorole, musicchannel, djrole.")]
    InvalidOption(String),
    #[error("Invalid log type `{0}`. Valid types: messages, voice, moderation, server, join, leave.")]
    InvalidLogCategory(String),
    #[error("Command `{0}` not found.")]
    UnknownCommand(String),
    #[error("Channel not found.")]
    ChannelNotFound,
    #[error("The channel must be a text channel.")]
    NotTextChannel,
    #[error("Role not found.")]
    RoleNotFound,
    #[error("User not found.")]
    UserNotFound,
    #[error("Missing argument: {0}.")]
    MissingArgument(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("`{token}` is registered by both `{first}` and `{second}`")]
    Duplicate {
        token: String,
        first: &'static str,
        second: &'static str,
    },
}
