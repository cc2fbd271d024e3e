// Discord commands module.
// Each feature gets its own command file; this catalog maps every command
// the bot knows to its poise constructor.

pub mod general;
pub mod google;
pub mod help;
pub mod presence;

use crate::discord::moderation::{channel_commands, commands as member_commands};
use crate::discord::{Data, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    Core,
    Moderation,
    Utility,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 3] = [
        CommandCategory::Core,
        CommandCategory::Moderation,
        CommandCategory::Utility,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CommandCategory::Core => "Core",
            CommandCategory::Moderation => "Moderation",
            CommandCategory::Utility => "Utility",
        }
    }
}

/// Every slash command the bot registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Ping,
    Avatar,
    ServerInfo,
    Help,
    Warn,
    Warnings,
    Mute,
    Unmute,
    Kick,
    Ban,
    Unban,
    Purge,
    Slowmode,
    Lock,
    Google,
}

impl CommandKind {
    pub const ALL: [CommandKind; 15] = [
        CommandKind::Ping,
        CommandKind::Avatar,
        CommandKind::ServerInfo,
        CommandKind::Help,
        CommandKind::Warn,
        CommandKind::Warnings,
        CommandKind::Mute,
        CommandKind::Unmute,
        CommandKind::Kick,
        CommandKind::Ban,
        CommandKind::Unban,
        CommandKind::Purge,
        CommandKind::Slowmode,
        CommandKind::Lock,
        CommandKind::Google,
    ];

    /// Slash command name as registered with Discord.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Ping => "ping",
            CommandKind::Avatar => "avatar",
            CommandKind::ServerInfo => "serverinfo",
            CommandKind::Help => "help",
            CommandKind::Warn => "warn",
            CommandKind::Warnings => "warnings",
            CommandKind::Mute => "mute",
            CommandKind::Unmute => "unmute",
            CommandKind::Kick => "kick",
            CommandKind::Ban => "ban",
            CommandKind::Unban => "unban",
            CommandKind::Purge => "purge",
            CommandKind::Slowmode => "slowmode",
            CommandKind::Lock => "lock",
            CommandKind::Google => "google",
        }
    }

    pub fn category(self) -> CommandCategory {
        match self {
            CommandKind::Ping | CommandKind::Avatar | CommandKind::ServerInfo | CommandKind::Help => {
                CommandCategory::Core
            }
            CommandKind::Google => CommandCategory::Utility,
            _ => CommandCategory::Moderation,
        }
    }

    /// Usage line shown by `/help`.
    pub fn usage(self) -> &'static str {
        match self {
            CommandKind::Ping => "/ping",
            CommandKind::Avatar => "/avatar [user]",
            CommandKind::ServerInfo => "/serverinfo",
            CommandKind::Help => "/help",
            CommandKind::Warn => "/warn user reason",
            CommandKind::Warnings => "/warnings user [clear]",
            CommandKind::Mute => "/mute user duration [reason]",
            CommandKind::Unmute => "/unmute user [reason]",
            CommandKind::Kick => "/kick user [reason]",
            CommandKind::Ban => "/ban user [delete_days] [reason]",
            CommandKind::Unban => "/unban user_id [reason]",
            CommandKind::Purge => "/purge amount",
            CommandKind::Slowmode => "/slowmode duration [channel] [reason]",
            CommandKind::Lock => "/lock [channel] [enabled] [reason]",
            CommandKind::Google => "/google query [results]",
        }
    }

    pub fn from_name(name: &str) -> Option<CommandKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Poise constructor for a command kind.
pub fn build(kind: CommandKind) -> poise::Command<Data, Error> {
    match kind {
        CommandKind::Ping => general::ping(),
        CommandKind::Avatar => general::avatar(),
        CommandKind::ServerInfo => general::serverinfo(),
        CommandKind::Help => help::help(),
        CommandKind::Warn => member_commands::warn(),
        CommandKind::Warnings => member_commands::warnings(),
        CommandKind::Mute => member_commands::mute(),
        CommandKind::Unmute => member_commands::unmute(),
        CommandKind::Kick => member_commands::kick(),
        CommandKind::Ban => member_commands::ban(),
        CommandKind::Unban => member_commands::unban(),
        CommandKind::Purge => channel_commands::purge(),
        CommandKind::Slowmode => channel_commands::slowmode(),
        CommandKind::Lock => channel_commands::lock(),
        CommandKind::Google => google::google(),
    }
}

/// Every command, in catalog order.
pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    CommandKind::ALL.into_iter().map(build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn built_commands_match_their_kind() {
        for kind in CommandKind::ALL {
            assert_eq!(build(kind).name, kind.name(), "{:?}", kind);
        }
    }

    #[test]
    fn names_are_unique_and_resolvable() {
        let names: HashSet<&str> = CommandKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), CommandKind::ALL.len());

        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CommandKind::from_name("nonexistent"), None);
    }

    #[test]
    fn every_command_is_registered_once() {
        let commands = all_commands();
        assert_eq!(commands.len(), 15);

        let registered: HashSet<String> = commands.into_iter().map(|c| c.name).collect();
        assert_eq!(registered.len(), 15);
    }

    #[test]
    fn commands_fall_into_expected_categories() {
        let in_category = |category| {
            CommandKind::ALL
                .iter()
                .filter(|k| k.category() == category)
                .count()
        };

        assert_eq!(in_category(CommandCategory::Core), 4);
        assert_eq!(in_category(CommandCategory::Moderation), 10);
        assert_eq!(in_category(CommandCategory::Utility), 1);
    }

    #[test]
    fn usage_starts_with_the_command_name() {
        for kind in CommandKind::ALL {
            assert!(kind.usage().starts_with(&format!("/{}", kind.name())));
        }
    }
}
