pub mod admin;
pub mod moderation;
pub mod music;
pub mod utility;

use vigia_core::{CommandRecord, CommandRegistry, Error, Invocation, RegistryError, ValidationError};

/// Every command the bot ships, in help order.
pub fn commands() -> Vec<CommandRecord> {
    vec![
        CommandRecord::new(admin::config::META, admin::config::Config),
        CommandRecord::new(moderation::moderate::META, moderation::moderate::Moderate),
        CommandRecord::new(music::play::META, music::play::Play),
        CommandRecord::new(music::controls::SKIP, music::controls::Control::Skip),
        CommandRecord::new(music::controls::STOP, music::controls::Control::Stop),
        CommandRecord::new(music::controls::PAUSE, music::controls::Control::Pause),
        CommandRecord::new(music::controls::RESUME, music::controls::Control::Resume),
        CommandRecord::new(utility::help::META, utility::help::Help),
        CommandRecord::new(utility::ping::META, utility::ping::Ping),
        CommandRecord::new(utility::serverinfo::META, utility::serverinfo::ServerInfo),
    ]
}

pub fn registry() -> Result<CommandRegistry, RegistryError> {
    CommandRegistry::new(commands())
}

/// Turn a [`ValidationError`] into a reply; any other error keeps propagating.
pub(crate) async fn reply_on_invalid(ctx: &Invocation<'_>, result: Result<(), Error>) -> Result<(), Error> {
    let Err(err) = result else {
        return Ok(());
    };

    match err.downcast::<ValidationError>() {
        Ok(invalid) => {
            ctx.reply(format!("❌ {invalid}")).await?;
            Ok(())
        }
        Err(err) => Err(err),
    }
}
