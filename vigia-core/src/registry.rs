use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vigia_utils::permissions::Permission;

use crate::Error;
use crate::error::RegistryError;
use crate::invocation::Invocation;

/// Cooldown applied when a command declares `cooldown_secs: 0`.
pub const DEFAULT_COOLDOWN_SECS: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Admin,
    Moderation,
    Music,
    Utility,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Admin,
        Category::Moderation,
        Category::Music,
        Category::Utility,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Admin => "Admin",
            Category::Moderation => "Moderation",
            Category::Music => "Music",
            Category::Utility => "Utility",
        }
    }

    /// Open categories skip every role and permission check.
    pub fn is_open(self) -> bool {
        matches!(self, Category::Music | Category::Utility)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(raw.trim()))
            .ok_or(())
    }
}

/// Static description of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandMeta {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub desc: &'static str,
    pub category: Category,
    pub usage: &'static str,
    /// Zero means "not declared" and falls back to [`DEFAULT_COOLDOWN_SECS`].
    pub cooldown_secs: u64,
    pub permission: Option<Permission>,
}

impl CommandMeta {
    pub fn cooldown(&self) -> Duration {
        match self.cooldown_secs {
            0 => Duration::from_secs(DEFAULT_COOLDOWN_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Usage line rendered with the guild's active prefix.
    pub fn usage_with_prefix(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.usage)
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct CommandRecord {
    pub meta: CommandMeta,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandRecord {
    pub fn new(meta: CommandMeta, handler: impl CommandHandler + 'static) -> Self {
        Self {
            meta,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRecord")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Commands registered at startup. Immutable afterwards.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    records: Vec<CommandRecord>,
    tokens: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Build the registry, rejecting any name or alias claimed twice.
    pub fn new(records: Vec<CommandRecord>) -> Result<Self, RegistryError> {
        let mut tokens: HashMap<String, usize> = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            let claimed = std::iter::once(record.meta.name).chain(record.meta.aliases.iter().copied());
            for token in claimed {
                let token = token.to_lowercase();
                if let Some(&existing) = tokens.get(&token) {
                    return Err(RegistryError::Duplicate {
                        token,
                        first: records[existing].meta.name,
                        second: record.meta.name,
                    });
                }
                tokens.insert(token, index);
            }
        }

        Ok(Self { records, tokens })
    }

    /// Resolve a command name or alias, case-insensitively.
    pub fn resolve(&self, token: &str) -> Option<&CommandRecord> {
        self.tokens
            .get(&token.to_lowercase())
            .map(|&index| &self.records[index])
    }

    pub fn canonical_name(&self, token: &str) -> Option<&'static str> {
        self.resolve(token).map(|record| record.meta.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandRecord> {
        self.records.iter()
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &CommandRecord> {
        self.records
            .iter()
            .filter(move |record| record.meta.category == category)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
