// Non-command gateway events.

use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Ready { data_about_bot } = event {
        tracing::info!(
            tag = %data_about_bot.user.tag(),
            id = data_about_bot.user.id.get(),
            guilds = data_about_bot.guilds.len(),
            "Bot connected to Discord"
        );
        presence::on_ready(ctx);
    }

    Ok(())
}
