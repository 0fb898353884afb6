use std::sync::Arc;

use poise::serenity_prelude as serenity;

use vigia_database::GuildConfig;
use vigia_utils::permissions::{Permission, grants};

use crate::registry::{Category, CommandRegistry};
use crate::surface::MemberInfo;

/// The facts about an actor the gate decides on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: u64,
    pub is_guild_owner: bool,
    pub roles: Vec<u64>,
    pub permissions: serenity::Permissions,
}

impl From<&MemberInfo> for ActorContext {
    fn from(member: &MemberInfo) -> Self {
        Self {
            user_id: member.user_id,
            is_guild_owner: member.is_owner,
            roles: member.roles.clone(),
            permissions: member.permissions,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    UnknownCommand,
    CommandDisabled,
    InsufficientPermission,
}

impl DenyReason {
    pub fn notice(self) -> &'static str {
        match self {
            DenyReason::UnknownCommand => "That command does not exist.",
            DenyReason::CommandDisabled => "This command is disabled in this server.",
            DenyReason::InsufficientPermission => {
                "You do not have permission to use this command."
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allowed
    }
}

/// Decides whether an actor may run a command in a guild. Performs no I/O.
#[derive(Clone, Debug)]
pub struct AuthorizationGate {
    registry: Arc<CommandRegistry>,
    super_admin_role_id: Option<u64>,
}

impl AuthorizationGate {
    pub fn new(registry: Arc<CommandRegistry>, super_admin_role_id: Option<u64>) -> Self {
        Self {
            registry,
            super_admin_role_id,
        }
    }

    pub fn authorize(&self, actor: &ActorContext, config: &GuildConfig, command: &str) -> Decision {
        let Some(record) = self.registry.resolve(command) else {
            return Decision::Denied(DenyReason::UnknownCommand);
        };
        let meta = &record.meta;

        // Disabled commands are off for everyone, owner included.
        if config.is_command_disabled(meta.name) {
            return Decision::Denied(DenyReason::CommandDisabled);
        }

        if meta.category.is_open() || actor.is_guild_owner {
            return Decision::Allowed;
        }

        if self
            .super_admin_role_id
            .is_some_and(|role| actor.roles.contains(&role))
        {
            return Decision::Allowed;
        }

        if meta.category == Category::Moderation
            && actor.roles.iter().any(|role| config.is_mod_role(*role))
        {
            return Decision::Allowed;
        }

        let required = meta.permission.unwrap_or(Permission::Administrator);
        if grants(actor.permissions, required) {
            return Decision::Allowed;
        }

        Decision::Denied(DenyReason::InsufficientPermission)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::Error;
    use crate::invocation::Invocation;
    use crate::registry::{CommandHandler, CommandMeta, CommandRecord};

    const SUPER_ADMIN: u64 = 900;
    const MOD_ROLE: u64 = 42;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn run(&self, _ctx: Invocation<'_>) -> Result<(), Error> {
            Ok(())
        }
    }

    fn command(
        name: &'static str,
        aliases: &'static [&'static str],
        category: Category,
        permission: Option<Permission>,
    ) -> CommandRecord {
        CommandRecord::new(
            CommandMeta {
                name,
                aliases,
                desc: "",
                category,
                usage: name,
                cooldown_secs: 3,
                permission,
            },
            Noop,
        )
    }

    fn gate() -> AuthorizationGate {
        let registry = CommandRegistry::new(vec![
            command("moderate", &["mod"], Category::Moderation, Some(Permission::ManageMessages)),
            command("config", &["settings"], Category::Admin, Some(Permission::Administrator)),
            command("play", &["p"], Category::Music, None),
            command("ping", &[], Category::Utility, None),
        ])
        .expect("registry");

        AuthorizationGate::new(Arc::new(registry), Some(SUPER_ADMIN))
    }

    fn member(user_id: u64) -> ActorContext {
        ActorContext {
            user_id,
            ..ActorContext::default()
        }
    }

    fn owner() -> ActorContext {
        ActorContext {
            is_guild_owner: true,
            ..member(1)
        }
    }

    #[test]
    fn owner_may_moderate_without_mod_role() {
        let decision = gate().authorize(&owner(), &GuildConfig::default(), "moderate");
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn plain_member_is_denied_moderation() {
        let decision = gate().authorize(&member(7), &GuildConfig::default(), "mod");
        assert_eq!(decision, Decision::Denied(DenyReason::InsufficientPermission));
    }

    #[test]
    fn plain_member_may_use_music() {
        let decision = gate().authorize(&member(7), &GuildConfig::default(), "P");
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn disabled_command_blocks_owner() {
        let mut config = GuildConfig::default();
        config.disabled_commands.insert("moderate".to_owned());

        assert_eq!(
            gate().authorize(&owner(), &config, "mod"),
            Decision::Denied(DenyReason::CommandDisabled)
        );
    }

    #[test]
    fn disabled_open_command_blocks_everyone() {
        let mut config = GuildConfig::default();
        config.disabled_commands.insert("play".to_owned());

        assert_eq!(
            gate().authorize(&member(7), &config, "play"),
            Decision::Denied(DenyReason::CommandDisabled)
        );
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            gate().authorize(&owner(), &GuildConfig::default(), "nope"),
            Decision::Denied(DenyReason::UnknownCommand)
        );
    }

    #[test]
    fn mod_role_elevates_moderation_only() {
        let mut config = GuildConfig::default();
        config.mod_roles.insert(MOD_ROLE);
        let actor = ActorContext {
            roles: vec![MOD_ROLE],
            ..member(7)
        };

        assert!(gate().authorize(&actor, &config, "moderate").is_allowed());
        assert_eq!(
            gate().authorize(&actor, &config, "config"),
            Decision::Denied(DenyReason::InsufficientPermission)
        );
    }

    #[test]
    fn super_admin_role_is_allowed_everywhere() {
        let actor = ActorContext {
            roles: vec![SUPER_ADMIN],
            ..member(7)
        };

        assert!(gate().authorize(&actor, &GuildConfig::default(), "config").is_allowed());
    }

    #[test]
    fn declared_permission_elevates_its_command() {
        let actor = ActorContext {
            permissions: serenity::Permissions::MANAGE_MESSAGES,
            ..member(7)
        };
        let config = GuildConfig::default();

        assert!(gate().authorize(&actor, &config, "moderate").is_allowed());
        assert!(!gate().authorize(&actor, &config, "config").is_allowed());
    }

    #[test]
    fn administrator_satisfies_any_tag() {
        let actor = ActorContext {
            permissions: serenity::Permissions::ADMINISTRATOR,
            ..member(7)
        };

        assert!(gate().authorize(&actor, &GuildConfig::default(), "moderate").is_allowed());
        assert!(gate().authorize(&actor, &GuildConfig::default(), "config").is_allowed());
    }
}
