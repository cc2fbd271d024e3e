// Moderation slash commands plus the guards every one of them runs first.

pub mod channel_commands;
pub mod commands;
pub mod guards;
