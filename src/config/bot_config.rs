// Bot configuration loaded from the environment (and `.env` via dotenv).
//
// Everything is validated up front so a bad deployment fails at startup
// instead of on the first command that needs the missing value.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::warnings::DEFAULT_RETENTION_DAYS;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DATA_DIR: &str = "data";
const DATABASE_FILE: &str = "hearth-bot.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("COMMAND_SCOPE=guild needs DISCORD_GUILD_ID to be set")]
    GuildScopeWithoutGuild,
}

/// Which runtime profile we're in. Controls log formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Production,
    Test,
}

/// Where slash commands get registered on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    /// Instant updates, scoped to one guild
    Guild(u64),
    /// Can take up to an hour to propagate
    Global,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GoogleSearchConfig {
    pub api_key: String,
    pub cse_id: String,
}

impl fmt::Debug for GoogleSearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleSearchConfig")
            .field("api_key", &"<redacted>")
            .field("cse_id", &self.cse_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub command_scope: CommandScope,
    /// Roles that may moderate even without the MODERATE_MEMBERS permission
    pub moderator_role_ids: Vec<u64>,
    pub runtime_env: RuntimeEnv,
    pub log_level: String,
    pub warning_retention_days: u32,
    /// `None` disables `/google`
    pub google: Option<GoogleSearchConfig>,
    pub data_dir: PathBuf,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("command_scope", &self.command_scope)
            .field("moderator_role_ids", &self.moderator_role_ids)
            .field("runtime_env", &self.runtime_env)
            .field("log_level", &self.log_level)
            .field("warning_retention_days", &self.warning_retention_days)
            .field("google", &self.google)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl BotConfig {
    /// Load from the process environment. Call `dotenv` before this.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let guild_id = get("DISCORD_GUILD_ID")
            .map(|raw| parse_snowflake("DISCORD_GUILD_ID", &raw))
            .transpose()?;

        let command_scope = match (get("COMMAND_SCOPE").as_deref(), guild_id) {
            (Some("guild"), Some(id)) | (None, Some(id)) => CommandScope::Guild(id),
            (Some("guild"), None) => return Err(ConfigError::GuildScopeWithoutGuild),
            (Some("global"), _) | (None, None) => CommandScope::Global,
            (Some(other), _) => {
                return Err(ConfigError::Invalid {
                    key: "COMMAND_SCOPE",
                    value: other.to_string(),
                    reason: "expected \"guild\" or \"global\"",
                })
            }
        };

        let moderator_role_ids = match get("MODERATOR_ROLE_IDS") {
            Some(raw) => parse_role_list(&raw)?,
            None => Vec::new(),
        };

        let runtime_env = match get("BOT_ENV").as_deref() {
            None | Some("development") => RuntimeEnv::Development,
            Some("production") => RuntimeEnv::Production,
            Some("test") => RuntimeEnv::Test,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "BOT_ENV",
                    value: other.to_string(),
                    reason: "expected development, production or test",
                })
            }
        };

        let warning_retention_days = match get("WARNING_RETENTION_DAYS") {
            None => DEFAULT_RETENTION_DAYS,
            Some(raw) => match raw.parse::<u32>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "WARNING_RETENTION_DAYS",
                        value: raw,
                        reason: "expected a positive whole number of days",
                    })
                }
            },
        };

        // Search needs both halves; one without the other just leaves it off.
        let google = match (get("GOOGLE_API_KEY"), get("GOOGLE_CSE_ID")) {
            (Some(api_key), Some(cse_id)) => Some(GoogleSearchConfig { api_key, cse_id }),
            _ => None,
        };

        Ok(Self {
            token,
            command_scope,
            moderator_role_ids,
            runtime_env,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            warning_retention_days,
            google,
            data_dir: PathBuf::from(
                get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            ),
        })
    }

    /// Path of the SQLite database file inside the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn parse_snowflake(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected a Discord snowflake",
        }),
    }
}

fn parse_role_list(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| parse_snowflake("MODERATOR_ROLE_IDS", id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn token_is_required() {
        assert_eq!(
            load(&[]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
        assert_eq!(
            load(&[("DISCORD_TOKEN", "   ")]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = load(&[("DISCORD_TOKEN", "abc")]).unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.command_scope, CommandScope::Global);
        assert!(config.moderator_role_ids.is_empty());
        assert_eq!(config.runtime_env, RuntimeEnv::Development);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.warning_retention_days, 180);
        assert!(config.google.is_none());
        assert_eq!(config.database_path(), PathBuf::from("data/hearth-bot.db"));
    }

    #[test]
    fn guild_id_defaults_scope_to_guild() {
        let config = load(&[("DISCORD_TOKEN", "abc"), ("DISCORD_GUILD_ID", "42")]).unwrap();
        assert_eq!(config.command_scope, CommandScope::Guild(42));

        let config = load(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_GUILD_ID", "42"),
            ("COMMAND_SCOPE", "global"),
        ])
        .unwrap();
        assert_eq!(config.command_scope, CommandScope::Global);
    }

    #[test]
    fn guild_scope_without_guild_id_fails() {
        let err = load(&[("DISCORD_TOKEN", "abc"), ("COMMAND_SCOPE", "guild")]).unwrap_err();
        assert_eq!(err, ConfigError::GuildScopeWithoutGuild);
    }

    #[test]
    fn moderator_roles_are_split_and_trimmed() {
        let config = load(&[
            ("DISCORD_TOKEN", "abc"),
            ("MODERATOR_ROLE_IDS", " 111, 222 ,,333 "),
        ])
        .unwrap();

        assert_eq!(config.moderator_role_ids, vec![111, 222, 333]);
    }

    #[test]
    fn malformed_role_id_fails() {
        let err = load(&[("DISCORD_TOKEN", "abc"), ("MODERATOR_ROLE_IDS", "111,mods")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "MODERATOR_ROLE_IDS",
                ..
            }
        ));
    }

    #[test]
    fn retention_must_be_positive() {
        for bad in ["0", "-3", "ten", "1.5"] {
            let err = load(&[("DISCORD_TOKEN", "abc"), ("WARNING_RETENTION_DAYS", bad)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: "WARNING_RETENTION_DAYS", .. }),
                "{} should be rejected",
                bad
            );
        }

        let config = load(&[("DISCORD_TOKEN", "abc"), ("WARNING_RETENTION_DAYS", "30")]).unwrap();
        assert_eq!(config.warning_retention_days, 30);
    }

    #[test]
    fn google_search_needs_both_keys() {
        let config = load(&[("DISCORD_TOKEN", "abc"), ("GOOGLE_API_KEY", "key")]).unwrap();
        assert!(config.google.is_none());

        let config = load(&[
            ("DISCORD_TOKEN", "abc"),
            ("GOOGLE_API_KEY", "key"),
            ("GOOGLE_CSE_ID", "cx"),
        ])
        .unwrap();
        assert_eq!(
            config.google,
            Some(GoogleSearchConfig {
                api_key: "key".into(),
                cse_id: "cx".into()
            })
        );
    }

    #[test]
    fn unknown_runtime_env_fails() {
        let err = load(&[("DISCORD_TOKEN", "abc"), ("BOT_ENV", "staging")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BOT_ENV", .. }));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load(&[
            ("DISCORD_TOKEN", "super-secret"),
            ("GOOGLE_API_KEY", "also-secret"),
            ("GOOGLE_CSE_ID", "cx"),
        ])
        .unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("also-secret"));
    }
}
