// Framework error handling. Poise routes every failed or unroutable
// interaction here.

use crate::discord::commands::CommandKind;
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

pub const COMMAND_FAILED_MESSAGE: &str = "There was an error while executing this command.";
pub const COMMAND_UNAVAILABLE_MESSAGE: &str = "This command is not available right now.";

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                user_id = ctx.author().id.get(),
                error = %error,
                "Command execution failed"
            );

            // Poise sends a follow-up instead if we already responded or deferred.
            let reply = poise::CreateReply::default()
                .content(COMMAND_FAILED_MESSAGE)
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                tracing::error!("Failed to report command error: {}", e);
            }
        }
        poise::FrameworkError::UnknownInteraction {
            ctx, interaction, ..
        } => {
            // Catalogued but unknown means the registered set is stale.
            tracing::warn!(
                command = %interaction.data.name,
                catalogued = CommandKind::from_name(&interaction.data.name).is_some(),
                "Received unknown command"
            );

            let response = serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(COMMAND_UNAVAILABLE_MESSAGE)
                    .ephemeral(true),
            );
            if let Err(e) = interaction.create_response(ctx, response).await {
                tracing::error!("Failed to answer unknown command: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}
