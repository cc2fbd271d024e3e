// Discord layer - commands and event handlers.

use std::sync::Arc;

use crate::config::BotConfig;
use crate::core::search::SearchService;
use crate::core::warnings::WarningService;
use crate::infra::search::GoogleSearchClient;
use crate::infra::warnings::SqliteWarningStore;

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "moderation/mod.rs"]
pub mod moderation;

pub mod dispatcher;
pub mod events;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command. Built once in `main`.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub warnings: Arc<WarningService<SqliteWarningStore>>,
    /// `None` when Google credentials aren't configured
    pub search: Option<Arc<SearchService<GoogleSearchClient>>>,
}
