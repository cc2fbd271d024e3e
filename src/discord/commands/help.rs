use crate::discord::commands::{CommandCategory, CommandKind};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// List available commands.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let registered = &ctx.framework().options().commands;

    let mut embed = serenity::CreateEmbed::new()
        .title("Available Commands")
        .color(0xBFA5FF)
        .footer(serenity::CreateEmbedFooter::new(
            "Moderation commands need Moderate Members or a moderator role.",
        ));

    for category in CommandCategory::ALL {
        let entries: Vec<String> = CommandKind::ALL
            .iter()
            .filter(|kind| kind.category() == category)
            .map(|kind| {
                let description = registered
                    .iter()
                    .find(|c| c.name == kind.name())
                    .and_then(|c| c.description.as_deref());
                match description {
                    Some(text) => format!("`{}` - {}", kind.usage(), text),
                    None => format!("`{}`", kind.usage()),
                }
            })
            .collect();

        if !entries.is_empty() {
            embed = embed.field(category.label(), entries.join("\n"), false);
        }
    }

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .ephemeral(true),
    )
    .await?;

    Ok(())
}
