use std::fmt;

use poise::serenity_prelude as serenity;

/// Permission tags a command can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    Administrator,
    ManageGuild,
    ManageMessages,
    BanMembers,
    KickMembers,
    ModerateMembers,
}

impl Permission {
    pub fn flag(self) -> serenity::Permissions {
        match self {
            Permission::Administrator => serenity::Permissions::ADMINISTRATOR,
            Permission::ManageGuild => serenity::Permissions::MANAGE_GUILD,
            Permission::ManageMessages => serenity::Permissions::MANAGE_MESSAGES,
            Permission::BanMembers => serenity::Permissions::BAN_MEMBERS,
            Permission::KickMembers => serenity::Permissions::KICK_MEMBERS,
            Permission::ModerateMembers => serenity::Permissions::MODERATE_MEMBERS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Permission::Administrator => "Administrator",
            Permission::ManageGuild => "Manage Server",
            Permission::ManageMessages => "Manage Messages",
            Permission::BanMembers => "Ban Members",
            Permission::KickMembers => "Kick Members",
            Permission::ModerateMembers => "Timeout Members",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `perms` satisfies `required`. `ADMINISTRATOR` satisfies everything.
pub fn grants(perms: serenity::Permissions, required: Permission) -> bool {
    perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required.flag())
}

/// Everything the gateway adapter learns about a member in one lookup.
#[derive(Clone, Debug)]
pub struct ResolvedMember {
    pub is_owner: bool,
    pub roles: Vec<serenity::RoleId>,
    pub permissions: serenity::Permissions,
    pub highest_role_position: u16,
}

/// Resolve the member's ownership, roles, effective guild permissions and top
/// role position from the guild's role table.
pub fn resolve_member(guild: &serenity::PartialGuild, member: &serenity::Member) -> ResolvedMember {
    let everyone_role_id = serenity::RoleId::new(guild.id.get());
    let mut permissions = serenity::Permissions::empty();
    let mut highest_role_position = 0_u16;

    for role in guild.roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            permissions |= role.permissions;
        }
        if member.roles.contains(&role.id) {
            highest_role_position = highest_role_position.max(role.position);
        }
    }

    let is_owner = guild.owner_id == member.user.id;
    if is_owner {
        permissions = serenity::Permissions::all();
    }

    ResolvedMember {
        is_owner,
        roles: member.roles.clone(),
        permissions,
        highest_role_position,
    }
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{Permission, grants};

    #[test]
    fn administrator_grants_every_tag() {
        let admin = serenity::Permissions::ADMINISTRATOR;
        assert!(grants(admin, Permission::BanMembers));
        assert!(grants(admin, Permission::ManageGuild));
    }

    #[test]
    fn specific_flags_grant_only_themselves() {
        let perms = serenity::Permissions::KICK_MEMBERS | serenity::Permissions::MANAGE_MESSAGES;
        assert!(grants(perms, Permission::KickMembers));
        assert!(grants(perms, Permission::ManageMessages));
        assert!(!grants(perms, Permission::BanMembers));
        assert!(!grants(serenity::Permissions::empty(), Permission::Administrator));
    }
}
